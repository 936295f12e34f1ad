//! Pure state transitions.
//!
//! Each function takes the current state by reference and returns the next one,
//! leaving the input untouched. Containers that publish immutable snapshots (see the
//! session crate) apply these and swap the result in.

use crate::game_state::{ConcealTicket, GameState};
use crate::types::{GameAction, SelectOutcome};

/// Deal a new board.
pub fn start(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.start();
    next
}

/// Reveal a tile; see [`GameState::select`] for the rules and panics.
pub fn select(state: &GameState, index: usize) -> (GameState, SelectOutcome) {
    let mut next = state.clone();
    let outcome = next.select(index);
    (next, outcome)
}

/// Run a scheduled conceal. Stale tickets yield an unchanged copy.
pub fn conceal(state: &GameState, ticket: ConcealTicket) -> GameState {
    let mut next = state.clone();
    next.conceal(ticket);
    next
}

/// Advance the conceal timer by `elapsed_ms`.
pub fn tick(state: &GameState, elapsed_ms: u32) -> GameState {
    let mut next = state.clone();
    next.tick(elapsed_ms);
    next
}

/// Apply a presentation-layer action.
pub fn reduce(state: &GameState, action: GameAction) -> GameState {
    let mut next = state.clone();
    next.apply_action(action);
    next
}
