//! Tile effect resolution
//!
//! Runs once after every committed move. Every player is resolved against
//! the counters and positions captured at the start of the pass, so one
//! player's gain cannot change what another player's precondition sees
//! mid-pass. Players resolve in ascending id order; for the one shared write
//! (Skip seizing the turn) the last writer wins.

use serde::{Deserialize, Serialize};

use super::state::{RingState, TileKind};
use crate::wrap_index;

/// One applied effect, reported to the shell in resolution order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectEvent {
    ResourcesGained { player: u32, amount: u32 },
    VictoryConverted { player: u32, amount: u32 },
    PlayerMoved { player: u32, from: usize, to: usize },
    ResourcesTransferred { from: u32, to: u32, amount: u32 },
    TurnSeized { player: u32 },
}

/// Resolve the aligned tile for every player and apply the deltas.
///
/// Preconditions and transfer amounts read from the pass baseline; writes
/// land on the live state. Blank tiles, empty slots, and the reserved
/// Swap/Block kinds contribute nothing.
pub fn resolve_effects(state: &mut RingState) -> Vec<EffectEvent> {
    let n = state.slot_count();
    let baseline = state.players.clone();
    let mut events = Vec::new();

    for (index, before) in baseline.iter().enumerate() {
        let Some(Some(tile)) = state.slots.get(before.slot_index).cloned() else {
            continue;
        };
        let player = before.id;

        match tile.kind {
            TileKind::Resource => {
                if let Some(value) = tile.value {
                    if value > 0 {
                        state.players[index].resources += value;
                        events.push(EffectEvent::ResourcesGained {
                            player,
                            amount: value,
                        });
                    }
                }
            }
            TileKind::Victory => {
                if let Some(value) = tile.value {
                    // Checked against the baseline: a transfer landing in
                    // the same pass cannot fund the conversion.
                    if value > 0 && before.resources >= value {
                        state.players[index].resources -= value;
                        state.players[index].victory_points += value;
                        events.push(EffectEvent::VictoryConverted {
                            player,
                            amount: value,
                        });
                    }
                }
            }
            TileKind::Movement => {
                if let (Some(value), Some(direction)) = (tile.value, tile.direction) {
                    if value > 0 {
                        let from = before.slot_index;
                        let to =
                            wrap_index(from as isize + direction.sign() * value as isize, n);
                        state.players[index].slot_index = to;
                        events.push(EffectEvent::PlayerMoved { player, from, to });
                    }
                }
            }
            TileKind::Transfer => {
                if let Some(owner) = tile.owner {
                    let amount = before.resources;
                    if owner != player && (owner as usize) < state.players.len() && amount > 0 {
                        state.players[index].resources -= amount;
                        state.players[owner as usize].resources += amount;
                        events.push(EffectEvent::ResourcesTransferred {
                            from: player,
                            to: owner,
                            amount,
                        });
                    }
                }
            }
            TileKind::Skip => {
                if let Some(owner) = tile.owner {
                    if (owner as usize) < state.players.len() {
                        state.current_player = owner;
                        events.push(EffectEvent::TurnSeized { player: owner });
                    }
                }
            }
            TileKind::Swap | TileKind::Block | TileKind::Blank => {}
        }
    }

    events
}
