//! Persisted/undo snapshot format
//!
//! The one serialization boundary of the core. A snapshot is a complete,
//! immutable copy of game state: it restores wholesale or gets rejected
//! wholesale, never applied in part. The shell persists the JSON wherever it
//! likes; a rejected save means "start fresh."

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::consts::SNAPSHOT_VERSION;
use crate::error::GameError;
use crate::sim::{Direction, Player, RingState, Tile, TileKind};

/// Wire form of one tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileRecord {
    pub id: u32,
    pub type_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

/// Wire form of one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRecord {
    pub id: usize,
    pub filled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile: Option<TileRecord>,
}

/// A complete, serializable copy of game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u32,
    pub player_count: u32,
    pub slot_count: usize,
    pub slots: Vec<SlotRecord>,
    pub current_player_index: u32,
    pub player_resources: BTreeMap<u32, u32>,
    pub player_victory_points: BTreeMap<u32, u32>,
    pub player_rotation_points: BTreeMap<u32, u32>,
    /// Player ring alignments; absent in older saves, defaults to an even
    /// spread
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_slots: Option<BTreeMap<u32, usize>>,
    /// Turn counter; absent in older saves, defaults to 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_index: Option<u64>,
}

fn corrupt(reason: impl Into<String>) -> GameError {
    GameError::CorruptSnapshot(reason.into())
}

impl Snapshot {
    /// Capture the live state as a snapshot
    pub fn capture(state: &RingState, turn_index: u64) -> Self {
        let slots = state
            .slots
            .iter()
            .enumerate()
            .map(|(id, slot)| SlotRecord {
                id,
                filled: slot.is_some(),
                tile: slot.as_ref().map(|tile| TileRecord {
                    id: tile.id,
                    type_id: tile.kind.type_id(),
                    value: tile.value,
                    owner_id: tile.owner,
                    direction: tile.direction,
                }),
            })
            .collect();

        Self {
            version: SNAPSHOT_VERSION,
            player_count: state.player_count(),
            slot_count: state.slot_count(),
            slots,
            current_player_index: state.current_player,
            player_resources: state.players.iter().map(|p| (p.id, p.resources)).collect(),
            player_victory_points: state
                .players
                .iter()
                .map(|p| (p.id, p.victory_points))
                .collect(),
            player_rotation_points: state
                .players
                .iter()
                .map(|p| (p.id, p.rotation_points))
                .collect(),
            player_slots: Some(state.players.iter().map(|p| (p.id, p.slot_index)).collect()),
            turn_index: Some(turn_index),
        }
    }

    /// Serialize for persistence
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse and validate a persisted snapshot.
    ///
    /// Any rejection comes back as `CorruptSnapshot`; the caller falls back
    /// to a fresh game instead of applying a partial state.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let snapshot: Self = serde_json::from_str(json).map_err(|err| {
            log::warn!("Rejected snapshot: {}", err);
            corrupt(err.to_string())
        })?;
        if let Err(err) = snapshot.validate() {
            log::warn!("Rejected snapshot: {}", err);
            return Err(err);
        }
        log::info!(
            "Loaded snapshot: {} slots, {} players, turn {}",
            snapshot.slot_count,
            snapshot.player_count,
            snapshot.turn_index.unwrap_or(0)
        );
        Ok(snapshot)
    }

    /// Check internal consistency without building a state
    pub fn validate(&self) -> Result<(), GameError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(corrupt(format!("unsupported version {}", self.version)));
        }
        if self.player_count == 0 {
            return Err(corrupt("no players"));
        }
        if self.slots.len() != self.slot_count {
            return Err(corrupt(format!(
                "expected {} slots, found {}",
                self.slot_count,
                self.slots.len()
            )));
        }
        if self.current_player_index >= self.player_count {
            return Err(corrupt(format!(
                "current player {} out of range",
                self.current_player_index
            )));
        }

        let mut tile_ids = BTreeSet::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.id != index {
                return Err(corrupt(format!(
                    "slot id {} at position {}",
                    slot.id, index
                )));
            }
            if slot.filled != slot.tile.is_some() {
                return Err(corrupt(format!(
                    "slot {} filled flag disagrees with tile",
                    index
                )));
            }
            if let Some(tile) = &slot.tile {
                if TileKind::from_type_id(tile.type_id).is_none() {
                    return Err(corrupt(format!(
                        "slot {}: unknown tile type {}",
                        index, tile.type_id
                    )));
                }
                if let Some(owner) = tile.owner_id {
                    if owner >= self.player_count {
                        return Err(corrupt(format!(
                            "slot {}: tile owner {} out of range",
                            index, owner
                        )));
                    }
                }
                if !tile_ids.insert(tile.id) {
                    return Err(corrupt(format!("duplicate tile id {}", tile.id)));
                }
            }
        }

        for key in self
            .player_resources
            .keys()
            .chain(self.player_victory_points.keys())
            .chain(self.player_rotation_points.keys())
        {
            if *key >= self.player_count {
                return Err(corrupt(format!("counter for unknown player {}", key)));
            }
        }
        if let Some(player_slots) = &self.player_slots {
            for (player, slot) in player_slots {
                if *player >= self.player_count {
                    return Err(corrupt(format!("alignment for unknown player {}", player)));
                }
                if *slot >= self.slot_count {
                    return Err(corrupt(format!(
                        "player {} aligned with slot {} off the ring",
                        player, slot
                    )));
                }
            }
        }

        Ok(())
    }

    /// Rebuild the full state this snapshot captured.
    ///
    /// Validates first, so a hand-assembled or corrupt snapshot is rejected
    /// here too rather than producing a half-broken state.
    pub fn restore(&self) -> Result<RingState, GameError> {
        self.validate()?;

        let slots = self
            .slots
            .iter()
            .map(|record| {
                record.tile.as_ref().and_then(|tile| {
                    TileKind::from_type_id(tile.type_id).map(|kind| Tile {
                        id: tile.id,
                        kind,
                        value: tile.value,
                        owner: tile.owner_id,
                        direction: tile.direction,
                    })
                })
            })
            .collect();

        let players = (0..self.player_count)
            .map(|id| {
                let slot_index = self
                    .player_slots
                    .as_ref()
                    .and_then(|slots| slots.get(&id).copied())
                    .unwrap_or((id as usize * self.slot_count) / self.player_count as usize);
                Player {
                    id,
                    slot_index,
                    resources: self.player_resources.get(&id).copied().unwrap_or(0),
                    victory_points: self.player_victory_points.get(&id).copied().unwrap_or(0),
                    rotation_points: self.player_rotation_points.get(&id).copied().unwrap_or(0),
                }
            })
            .collect();

        Ok(RingState::from_parts(
            slots,
            players,
            self.current_player_index,
        ))
    }
}
