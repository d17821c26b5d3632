//! Error types for core game operations.
//!
//! Every failure is a value returned to the shell; nothing here is fatal.
//! A failed operation leaves the game state untouched.

/// Rejections a caller can receive from the game core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// place() targeted a slot that already holds a tile.
    #[error("slot {0} is already occupied")]
    SlotOccupied(usize),
    /// place() targeted an index off the ring.
    #[error("slot {0} is not on the ring")]
    SlotOutOfRange(usize),
    /// move() was given an empty selection, or one that includes an empty
    /// or out-of-range slot.
    #[error("selection is empty or includes a slot with no tile")]
    InvalidGroup,
    /// A rotation cost is configured and the acting player cannot pay it.
    #[error("player {player} needs {required} rotation points but has {available}")]
    OutOfRotationBudget {
        player: u32,
        required: u32,
        available: u32,
    },
    /// The acting player already moved a group this turn.
    #[error("a group was already moved this turn")]
    MoveAlreadyTaken,
    /// The acting player already placed a tile this turn.
    #[error("a tile was already placed this turn")]
    PlaceAlreadyTaken,
    /// A persisted or undo snapshot failed validation and was discarded.
    #[error("snapshot rejected: {0}")]
    CorruptSnapshot(String),
}
