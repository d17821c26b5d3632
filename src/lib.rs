//! Ring Shift - a turn-based board game where the ring moves, not the players
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ring state, movement, tile effects, setup)
//! - `snapshot`: Serializable save/undo format with validation
//! - `ledger`: Action-level and turn-level undo/redo histories
//! - `game`: Intent surface driven by the UI shell (place / move / end turn)
//!
//! The core is pure and synchronous: every intent runs to completion and
//! either commits or returns a typed [`GameError`] leaving state untouched.
//! Rendering, input, and storage are the shell's problem.

pub mod error;
pub mod game;
pub mod ledger;
pub mod sim;
pub mod snapshot;

pub use error::GameError;
pub use game::{Game, MoveOutcome, TileSpec};
pub use snapshot::Snapshot;

/// Game configuration constants
pub mod consts {
    /// Snapshot schema version written by this build
    pub const SNAPSHOT_VERSION: u32 = 1;

    /// Default ring size
    pub const DEFAULT_SLOT_COUNT: usize = 16;
    /// Default number of players
    pub const DEFAULT_PLAYER_COUNT: u32 = 2;
    /// Default fraction of slots left empty by board generation
    pub const DEFAULT_EMPTY_FRACTION: f32 = 0.4;

    /// Value ranges rolled by board generation (inclusive)
    pub const RESOURCE_VALUE_MIN: u32 = 1;
    pub const RESOURCE_VALUE_MAX: u32 = 3;
    pub const VICTORY_VALUE_MIN: u32 = 1;
    pub const VICTORY_VALUE_MAX: u32 = 3;
    pub const MOVEMENT_VALUE_MIN: u32 = 1;
    pub const MOVEMENT_VALUE_MAX: u32 = 2;
}

/// Wrap a possibly-negative index onto a ring of `slot_count` slots
#[inline]
pub fn wrap_index(index: isize, slot_count: usize) -> usize {
    index.rem_euclid(slot_count as isize) as usize
}

/// Step `index` by `delta` slots around a ring of `slot_count` slots
#[inline]
pub fn offset_index(index: usize, delta: isize, slot_count: usize) -> usize {
    wrap_index(index as isize + delta, slot_count)
}
