//! Action-level and turn-level undo histories
//!
//! Two independent LIFO stacks of snapshots, no diffs: restoring is always
//! wholesale. The action stacks reset at every turn boundary; the turn stack
//! spans the whole game.

use crate::snapshot::Snapshot;

/// State captured immediately before a committed place or move, plus the
/// per-turn flags the snapshot schema does not carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    pub snapshot: Snapshot,
    pub has_moved: bool,
    pub has_placed: bool,
}

/// The two nested histories wrapping the ring state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnLedger {
    action_undo: Vec<ActionRecord>,
    action_redo: Vec<ActionRecord>,
    turn_undo: Vec<Snapshot>,
    turn_redo: Vec<Snapshot>,
    turn_start: Snapshot,
}

impl TurnLedger {
    /// Start tracking a game whose current turn began at `turn_start`
    pub fn new(turn_start: Snapshot) -> Self {
        Self {
            action_undo: Vec::new(),
            action_redo: Vec::new(),
            turn_undo: Vec::new(),
            turn_redo: Vec::new(),
            turn_start,
        }
    }

    /// Push the state captured just before a committed action. Committing
    /// drops any redo future.
    pub fn record_action(&mut self, record: ActionRecord) {
        self.action_undo.push(record);
        self.action_redo.clear();
    }

    /// True when the current turn has at least one committed action to undo
    pub fn can_undo_action(&self) -> bool {
        !self.action_undo.is_empty()
    }

    /// True when an undone action can be replayed
    pub fn can_redo_action(&self) -> bool {
        !self.action_redo.is_empty()
    }

    /// Trade `current` for the most recent action record. `current` is only
    /// consumed when there is something to undo.
    pub fn undo_action(&mut self, current: ActionRecord) -> Option<ActionRecord> {
        let record = self.action_undo.pop()?;
        self.action_redo.push(current);
        Some(record)
    }

    /// Inverse of [`TurnLedger::undo_action`]
    pub fn redo_action(&mut self, current: ActionRecord) -> Option<ActionRecord> {
        let record = self.action_redo.pop()?;
        self.action_undo.push(current);
        Some(record)
    }

    /// The snapshot the current turn started from
    pub fn turn_start(&self) -> &Snapshot {
        &self.turn_start
    }

    /// Close the current turn: its start snapshot moves into turn history,
    /// `new_start` becomes the reference for the next turn, any forward turn
    /// history is dropped, and the action stacks reset.
    pub fn end_turn(&mut self, new_start: Snapshot) {
        let previous = std::mem::replace(&mut self.turn_start, new_start);
        self.turn_undo.push(previous);
        self.turn_redo.clear();
        self.action_undo.clear();
        self.action_redo.clear();
    }

    /// Restart the current turn from its start snapshot.
    ///
    /// `None` when no action has been committed this turn; the shell
    /// degrades the control to `prev_turn` in that case.
    pub fn restart_turn(&mut self) -> Option<Snapshot> {
        if self.action_undo.is_empty() {
            return None;
        }
        self.action_undo.clear();
        self.action_redo.clear();
        Some(self.turn_start.clone())
    }

    /// Step back one whole turn; the abandoned turn start becomes redoable
    pub fn prev_turn(&mut self) -> Option<Snapshot> {
        let start = self.turn_undo.pop()?;
        let abandoned = std::mem::replace(&mut self.turn_start, start.clone());
        self.turn_redo.push(abandoned);
        self.action_undo.clear();
        self.action_redo.clear();
        Some(start)
    }

    /// Step forward one whole turn after [`TurnLedger::prev_turn`]
    pub fn next_turn(&mut self) -> Option<Snapshot> {
        let start = self.turn_redo.pop()?;
        let revisited = std::mem::replace(&mut self.turn_start, start.clone());
        self.turn_undo.push(revisited);
        self.action_undo.clear();
        self.action_redo.clear();
        Some(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{RingState, TileKind};

    /// Distinguishable snapshots: each carries `tiles` placed tiles.
    fn snapshot_with(tiles: usize, turn_index: u64) -> Snapshot {
        let mut state = RingState::new(8, 2);
        for slot in 0..tiles {
            let tile = state.mint_tile(TileKind::Blank, None, None, None);
            state.place(slot, tile).unwrap();
        }
        Snapshot::capture(&state, turn_index)
    }

    fn record_with(tiles: usize) -> ActionRecord {
        ActionRecord {
            snapshot: snapshot_with(tiles, 0),
            has_moved: false,
            has_placed: false,
        }
    }

    #[test]
    fn test_undo_redo_swap_records() {
        let mut ledger = TurnLedger::new(snapshot_with(0, 0));
        ledger.record_action(record_with(1));
        ledger.record_action(record_with(2));

        let undone = ledger.undo_action(record_with(3)).unwrap();
        assert_eq!(undone, record_with(2));
        assert!(ledger.can_redo_action());

        let redone = ledger.redo_action(record_with(2)).unwrap();
        assert_eq!(redone, record_with(3));
        assert!(!ledger.can_redo_action());
    }

    #[test]
    fn test_undo_on_empty_stack_keeps_current() {
        let mut ledger = TurnLedger::new(snapshot_with(0, 0));
        assert_eq!(ledger.undo_action(record_with(1)), None);
        // The failed undo must not have seeded the redo stack.
        assert!(!ledger.can_redo_action());
    }

    #[test]
    fn test_committing_clears_the_redo_future() {
        let mut ledger = TurnLedger::new(snapshot_with(0, 0));
        ledger.record_action(record_with(1));
        ledger.undo_action(record_with(2)).unwrap();
        assert!(ledger.can_redo_action());

        ledger.record_action(record_with(4));
        assert!(!ledger.can_redo_action());
    }

    #[test]
    fn test_end_turn_resets_action_history() {
        let mut ledger = TurnLedger::new(snapshot_with(0, 0));
        ledger.record_action(record_with(1));

        ledger.end_turn(snapshot_with(2, 1));

        assert!(!ledger.can_undo_action());
        assert!(!ledger.can_redo_action());
        assert_eq!(ledger.turn_start(), &snapshot_with(2, 1));
    }

    #[test]
    fn test_restart_turn_requires_actions() {
        let mut ledger = TurnLedger::new(snapshot_with(0, 0));
        assert_eq!(ledger.restart_turn(), None);

        ledger.record_action(record_with(1));
        assert_eq!(ledger.restart_turn(), Some(snapshot_with(0, 0)));
        // Restarting consumed the action history.
        assert_eq!(ledger.restart_turn(), None);
    }

    #[test]
    fn test_turn_walk_round_trip() {
        let mut ledger = TurnLedger::new(snapshot_with(0, 0));
        ledger.end_turn(snapshot_with(1, 1));
        ledger.end_turn(snapshot_with(2, 2));

        assert_eq!(ledger.prev_turn(), Some(snapshot_with(1, 1)));
        assert_eq!(ledger.prev_turn(), Some(snapshot_with(0, 0)));
        assert_eq!(ledger.prev_turn(), None);

        assert_eq!(ledger.next_turn(), Some(snapshot_with(1, 1)));
        assert_eq!(ledger.next_turn(), Some(snapshot_with(2, 2)));
        assert_eq!(ledger.next_turn(), None);
    }

    #[test]
    fn test_end_turn_drops_forward_history() {
        let mut ledger = TurnLedger::new(snapshot_with(0, 0));
        ledger.end_turn(snapshot_with(1, 1));
        ledger.end_turn(snapshot_with(2, 2));
        ledger.prev_turn();

        ledger.end_turn(snapshot_with(3, 2));

        assert_eq!(ledger.next_turn(), None);
    }
}
