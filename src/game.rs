//! Intent surface driven by the UI shell
//!
//! One [`Game`] per match. Every intent runs to completion - the whole
//! chain-collision sequence and the full effect-resolution pass included -
//! and either commits or returns a [`GameError`] leaving everything
//! untouched, the ledger included. There is no locking anywhere: the
//! per-turn gates are the only writer discipline the core needs.

use crate::error::GameError;
use crate::ledger::{ActionRecord, TurnLedger};
use crate::sim::{
    Direction, EffectEvent, RingState, Selection, SetupConfig, TileKind, connected_group,
    generate_board, move_group, resolve_effects,
};
use crate::snapshot::Snapshot;

/// Parameters for a tile about to be placed; the game mints the id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSpec {
    pub kind: TileKind,
    pub value: Option<u32>,
    pub owner: Option<u32>,
    pub direction: Option<Direction>,
}

/// What the shell gets back from a committed move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The selection after travel, re-derived by connectivity; grows when
    /// the move merged groups, never shrinks
    pub selection: Selection,
    /// Effects applied by the post-move resolution pass, in order
    pub effects: Vec<EffectEvent>,
}

/// A running match: ring state plus turn bookkeeping and undo histories
#[derive(Debug, Clone)]
pub struct Game {
    state: RingState,
    ledger: TurnLedger,
    turn_index: u64,
    has_moved: bool,
    has_placed: bool,
    /// Rotation-point cost per move; `None` leaves the budget unenforced
    rotation_cost: Option<u32>,
}

impl Game {
    /// Start a new game from setup parameters
    pub fn new(config: &SetupConfig) -> Self {
        Self::from_state(generate_board(config), 0)
    }

    fn from_state(state: RingState, turn_index: u64) -> Self {
        let ledger = TurnLedger::new(Snapshot::capture(&state, turn_index));
        Self {
            state,
            ledger,
            turn_index,
            has_moved: false,
            has_placed: false,
            rotation_cost: None,
        }
    }

    /// Resume from a validated snapshot
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, GameError> {
        let state = snapshot.restore()?;
        Ok(Self::from_state(state, snapshot.turn_index.unwrap_or(0)))
    }

    /// Parse, validate, and resume from persisted JSON.
    ///
    /// On `CorruptSnapshot` the shell starts a fresh game instead; a corrupt
    /// save is never applied in part.
    pub fn from_saved_json(json: &str) -> Result<Self, GameError> {
        Self::from_snapshot(&Snapshot::from_json(json)?)
    }

    pub fn state(&self) -> &RingState {
        &self.state
    }

    pub fn turn_index(&self) -> u64 {
        self.turn_index
    }

    pub fn current_player(&self) -> u32 {
        self.state.current_player
    }

    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    pub fn has_placed(&self) -> bool {
        self.has_placed
    }

    /// Snapshot of the live state, for saving
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, self.turn_index)
    }

    /// Enable or disable the per-move rotation-point cost
    pub fn set_rotation_cost(&mut self, cost: Option<u32>) {
        self.rotation_cost = cost;
    }

    /// Maximal contiguous occupied run around `start`; selection helper for
    /// the shell
    pub fn group_at(&self, start: usize) -> Selection {
        connected_group(&self.state, start)
    }

    /// Place a freshly minted tile into an empty slot.
    ///
    /// At most one placement per turn. Placement triggers no effect
    /// resolution. Returns the minted tile id.
    pub fn place_tile(&mut self, slot: usize, spec: TileSpec) -> Result<u32, GameError> {
        if self.has_placed {
            return Err(GameError::PlaceAlreadyTaken);
        }
        self.state.placeable(slot)?;

        let record = self.action_record();
        let tile = self
            .state
            .mint_tile(spec.kind, spec.value, spec.owner, spec.direction);
        let id = tile.id;
        self.state.place(slot, tile)?;
        self.ledger.record_action(record);
        self.has_placed = true;
        Ok(id)
    }

    /// Move the selected group, then resolve effects for every player.
    ///
    /// At most one move per turn. The outcome reports the merged selection
    /// and the applied effects.
    pub fn move_selection(
        &mut self,
        group: &Selection,
        direction: Direction,
        amount: u32,
    ) -> Result<MoveOutcome, GameError> {
        if self.has_moved {
            return Err(GameError::MoveAlreadyTaken);
        }
        let acting = self.state.current_player;
        if let Some(required) = self.rotation_cost {
            let available = self
                .state
                .player(acting)
                .map(|player| player.rotation_points)
                .unwrap_or(0);
            if available < required {
                return Err(GameError::OutOfRotationBudget {
                    player: acting,
                    required,
                    available,
                });
            }
        }

        let record = self.action_record();
        let selection = move_group(&mut self.state, group, direction, amount)?;
        if let Some(cost) = self.rotation_cost {
            self.state.players[acting as usize].rotation_points -= cost;
        }
        let effects = resolve_effects(&mut self.state);
        self.ledger.record_action(record);
        self.has_moved = true;
        Ok(MoveOutcome { selection, effects })
    }

    /// Close the current turn: the next player takes over, the per-turn
    /// gates reset, and the turn history advances.
    pub fn end_turn(&mut self) {
        let player_count = self.state.player_count().max(1);
        self.state.current_player = (self.state.current_player + 1) % player_count;
        self.has_moved = false;
        self.has_placed = false;
        self.turn_index += 1;
        self.ledger.end_turn(self.snapshot());
    }

    /// Step back one committed action within the current turn
    pub fn undo_action(&mut self) -> bool {
        let current = self.action_record();
        match self.ledger.undo_action(current) {
            Some(record) => self.apply_record(record),
            None => false,
        }
    }

    /// Replay the most recently undone action
    pub fn redo_action(&mut self) -> bool {
        let current = self.action_record();
        match self.ledger.redo_action(current) {
            Some(record) => self.apply_record(record),
            None => false,
        }
    }

    /// True when the restart control applies; otherwise the shell offers
    /// `prev_turn` in its place
    pub fn can_restart_turn(&self) -> bool {
        self.ledger.can_undo_action()
    }

    /// Reload the current turn's start snapshot, independent of how many
    /// actions were committed since
    pub fn restart_turn(&mut self) -> bool {
        match self.ledger.restart_turn() {
            Some(snapshot) => self.apply_turn_start(&snapshot),
            None => false,
        }
    }

    /// Step back one whole turn
    pub fn prev_turn(&mut self) -> bool {
        match self.ledger.prev_turn() {
            Some(snapshot) => self.apply_turn_start(&snapshot),
            None => false,
        }
    }

    /// Step forward one whole turn after [`Game::prev_turn`]
    pub fn next_turn(&mut self) -> bool {
        match self.ledger.next_turn() {
            Some(snapshot) => self.apply_turn_start(&snapshot),
            None => false,
        }
    }

    fn action_record(&self) -> ActionRecord {
        ActionRecord {
            snapshot: self.snapshot(),
            has_moved: self.has_moved,
            has_placed: self.has_placed,
        }
    }

    fn apply_record(&mut self, record: ActionRecord) -> bool {
        let Ok(state) = record.snapshot.restore() else {
            return false;
        };
        self.state = state;
        self.turn_index = record.snapshot.turn_index.unwrap_or(0);
        self.has_moved = record.has_moved;
        self.has_placed = record.has_placed;
        true
    }

    fn apply_turn_start(&mut self, snapshot: &Snapshot) -> bool {
        let Ok(state) = snapshot.restore() else {
            return false;
        };
        self.state = state;
        self.turn_index = snapshot.turn_index.unwrap_or(0);
        self.has_moved = false;
        self.has_placed = false;
        true
    }
}
