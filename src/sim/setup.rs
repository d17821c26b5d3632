//! Deterministic initial board generation
//!
//! Everything the shell hands over at game start funnels through here. The
//! board is a pure function of the config: the same seed always yields the
//! same ring, bit for bit.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Direction, RingState, TileKind};
use crate::consts::*;

/// Per-kind weights for the setup roll; a zero weight disables the kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindWeights {
    pub resource: u32,
    pub victory: u32,
    pub movement: u32,
    pub swap: u32,
    pub skip: u32,
    pub block: u32,
    pub transfer: u32,
    pub blank: u32,
}

impl Default for KindWeights {
    fn default() -> Self {
        Self {
            resource: 5,
            victory: 3,
            movement: 2,
            swap: 1,
            skip: 1,
            block: 1,
            transfer: 2,
            blank: 3,
        }
    }
}

impl KindWeights {
    fn total(&self) -> u32 {
        self.resource
            + self.victory
            + self.movement
            + self.swap
            + self.skip
            + self.block
            + self.transfer
            + self.blank
    }

    /// Map a roll in `[0, total)` to a kind
    fn pick(&self, roll: u32) -> TileKind {
        let mut threshold = self.resource;
        if roll < threshold {
            return TileKind::Resource;
        }
        threshold += self.victory;
        if roll < threshold {
            return TileKind::Victory;
        }
        threshold += self.movement;
        if roll < threshold {
            return TileKind::Movement;
        }
        threshold += self.swap;
        if roll < threshold {
            return TileKind::Swap;
        }
        threshold += self.skip;
        if roll < threshold {
            return TileKind::Skip;
        }
        threshold += self.block;
        if roll < threshold {
            return TileKind::Block;
        }
        threshold += self.transfer;
        if roll < threshold {
            return TileKind::Transfer;
        }
        TileKind::Blank
    }
}

/// Parameters for a new game, supplied by the shell
#[derive(Debug, Clone, PartialEq)]
pub struct SetupConfig {
    pub seed: u64,
    pub slot_count: usize,
    pub player_count: u32,
    /// Fraction of slots left empty, clamped to `[0, 1]`
    pub empty_fraction: f32,
    pub weights: KindWeights,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            slot_count: DEFAULT_SLOT_COUNT,
            player_count: DEFAULT_PLAYER_COUNT,
            empty_fraction: DEFAULT_EMPTY_FRACTION,
            weights: KindWeights::default(),
        }
    }
}

/// Generate the starting ring for a new game.
///
/// Draw order is part of the format: occupancy first, then kind, then the
/// kind's parameters, slot by slot in index order. Reordering the draws
/// would silently change every seeded board.
pub fn generate_board(config: &SetupConfig) -> RingState {
    let mut state = RingState::new(config.slot_count, config.player_count);
    let total = config.weights.total();
    if total == 0 {
        log::info!("Generated empty board: all kind weights are zero");
        return state;
    }

    let mut rng = Pcg32::seed_from_u64(config.seed);
    let empty = if config.empty_fraction.is_finite() {
        f64::from(config.empty_fraction.clamp(0.0, 1.0))
    } else {
        0.0
    };

    for slot in 0..config.slot_count {
        if rng.random_bool(empty) {
            continue;
        }
        let kind = config.weights.pick(rng.random_range(0..total));
        let tile = match kind {
            TileKind::Resource => {
                let value = rng.random_range(RESOURCE_VALUE_MIN..=RESOURCE_VALUE_MAX);
                state.mint_tile(kind, Some(value), None, None)
            }
            TileKind::Victory => {
                let value = rng.random_range(VICTORY_VALUE_MIN..=VICTORY_VALUE_MAX);
                state.mint_tile(kind, Some(value), None, None)
            }
            TileKind::Movement => {
                let value = rng.random_range(MOVEMENT_VALUE_MIN..=MOVEMENT_VALUE_MAX);
                let direction = if rng.random_bool(0.5) {
                    Direction::Right
                } else {
                    Direction::Left
                };
                state.mint_tile(kind, Some(value), None, Some(direction))
            }
            TileKind::Skip | TileKind::Block | TileKind::Transfer => {
                let owner = if config.player_count > 0 {
                    Some(rng.random_range(0..config.player_count))
                } else {
                    None
                };
                state.mint_tile(kind, None, owner, None)
            }
            TileKind::Swap | TileKind::Blank => state.mint_tile(kind, None, None, None),
        };
        state.slots[slot] = Some(tile);
    }

    log::info!(
        "Generated board: {} slots, {} tiles, {} players (seed {})",
        config.slot_count,
        state.occupied_count(),
        config.player_count,
        config.seed
    );
    state
}
