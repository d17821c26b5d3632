//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Discrete turns only, no wall-clock time
//! - Seeded RNG only (board generation)
//! - Stable iteration order (slot index, player id)
//! - No rendering or platform dependencies

pub mod connect;
pub mod effects;
pub mod movement;
pub mod setup;
pub mod state;

pub use connect::connected_group;
pub use effects::{EffectEvent, resolve_effects};
pub use movement::move_group;
pub use setup::{KindWeights, SetupConfig, generate_board};
pub use state::{Direction, Player, RingState, Selection, Tile, TileKind};
