//! Ring state and core simulation types
//!
//! All state that must be persisted for undo/determinism lives here. The ring
//! is an arena-style fixed-length array of slots; adjacency is pure index
//! arithmetic, so there is no graph structure anywhere.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Travel direction around the ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Index delta for one step of travel
    #[inline]
    pub fn sign(self) -> isize {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// What a tile does when a player is aligned with it (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    /// Grants `value` resources
    Resource,
    /// Converts `value` resources into victory points
    Victory,
    /// Pushes the aligned player `value` slots in `direction`
    Movement,
    /// Reserved - needs a player-chosen target slot, not auto-resolved
    Swap,
    /// Hands the turn to `owner`
    Skip,
    /// Reserved - needs blocked-player state not modeled here
    Block,
    /// Drains the aligned player's resources to `owner`
    Transfer,
    /// No effect
    Blank,
}

impl TileKind {
    /// Numeric id used by the snapshot schema
    pub fn type_id(self) -> u32 {
        match self {
            TileKind::Resource => 0,
            TileKind::Victory => 1,
            TileKind::Movement => 2,
            TileKind::Swap => 3,
            TileKind::Skip => 4,
            TileKind::Block => 5,
            TileKind::Transfer => 6,
            TileKind::Blank => 7,
        }
    }

    /// Inverse of [`TileKind::type_id`]; `None` for unknown ids
    pub fn from_type_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(TileKind::Resource),
            1 => Some(TileKind::Victory),
            2 => Some(TileKind::Movement),
            3 => Some(TileKind::Swap),
            4 => Some(TileKind::Skip),
            5 => Some(TileKind::Block),
            6 => Some(TileKind::Transfer),
            7 => Some(TileKind::Blank),
            _ => None,
        }
    }
}

/// A tile on the ring
///
/// Identity is the `id`, unique within a game. Exactly one slot owns a tile
/// at any time; moving a tile relocates it, never copies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub id: u32,
    pub kind: TileKind,
    /// Magnitude for Resource (gain), Victory (conversion), Movement (steps)
    pub value: Option<u32>,
    /// Beneficiary for Skip/Block/Transfer; provenance for the rest
    pub owner: Option<u32>,
    /// Travel direction, Movement tiles only
    pub direction: Option<Direction>,
}

/// A player on the outer track
///
/// Players never move themselves; only a Movement tile effect changes
/// `slot_index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: u32,
    /// The ring slot this player is aligned with
    pub slot_index: usize,
    pub resources: u32,
    pub victory_points: u32,
    pub rotation_points: u32,
}

impl Player {
    pub fn new(id: u32, slot_index: usize) -> Self {
        Self {
            id,
            slot_index,
            resources: 0,
            victory_points: 0,
            rotation_points: 0,
        }
    }
}

/// An owned set of slot indices chosen for a move
///
/// Always passed by value between the shell and the movement engine; there is
/// no shared-mutable selection anywhere in the core.
pub type Selection = BTreeSet<usize>;

/// Complete board state (deterministic, restorable from a snapshot)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingState {
    /// The ring itself; length is fixed for the lifetime of a game
    pub slots: Vec<Option<Tile>>,
    /// Players indexed by id
    pub players: Vec<Player>,
    /// Id of the player whose turn it is
    pub current_player: u32,
    /// Next tile id to mint
    next_tile_id: u32,
}

impl RingState {
    /// Create an empty ring with players spread evenly around it
    pub fn new(slot_count: usize, player_count: u32) -> Self {
        let players = (0..player_count)
            .map(|id| Player::new(id, (id as usize * slot_count) / player_count as usize))
            .collect();
        Self {
            slots: vec![None; slot_count],
            players,
            current_player: 0,
            next_tile_id: 0,
        }
    }

    /// Rebuild a state from restored parts. The tile-id counter resumes past
    /// the highest id present so future mints stay unique.
    pub(crate) fn from_parts(
        slots: Vec<Option<Tile>>,
        players: Vec<Player>,
        current_player: u32,
    ) -> Self {
        let next_tile_id = slots
            .iter()
            .flatten()
            .map(|tile| tile.id + 1)
            .max()
            .unwrap_or(0);
        Self {
            slots,
            players,
            current_player,
            next_tile_id,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn player_count(&self) -> u32 {
        self.players.len() as u32
    }

    /// Mint a tile with the next unique id
    pub fn mint_tile(
        &mut self,
        kind: TileKind,
        value: Option<u32>,
        owner: Option<u32>,
        direction: Option<Direction>,
    ) -> Tile {
        let id = self.next_tile_id;
        self.next_tile_id += 1;
        Tile {
            id,
            kind,
            value,
            owner,
            direction,
        }
    }

    /// Check that `slot` can accept a tile, without mutating anything
    pub fn placeable(&self, slot: usize) -> Result<(), GameError> {
        if slot >= self.slots.len() {
            return Err(GameError::SlotOutOfRange(slot));
        }
        if self.slots[slot].is_some() {
            return Err(GameError::SlotOccupied(slot));
        }
        Ok(())
    }

    /// Put `tile` into an empty slot. Placement never triggers effect
    /// resolution; that happens only after a move.
    pub fn place(&mut self, slot: usize, tile: Tile) -> Result<(), GameError> {
        self.placeable(slot)?;
        self.slots[slot] = Some(tile);
        Ok(())
    }

    /// True iff no empty slot remains; gates full-ring rotation
    pub fn is_fully_occupied(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_some())
    }

    /// Number of slots currently holding a tile
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Tile at `slot`, if any
    pub fn tile_at(&self, slot: usize) -> Option<&Tile> {
        self.slots.get(slot).and_then(|slot| slot.as_ref())
    }

    /// Player by id
    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.get(id as usize)
    }
}
