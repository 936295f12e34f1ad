//! Game state module - manages the complete game state
//!
//! This module ties together the board, the selection buffer and the deck.
//! It enforces the matching rule and owns the single piece of deferred work in the
//! game: concealing a completed pair once the resolve delay has passed.
//!
//! The deferred conceal is identified by a [`ConcealTicket`]. Hosts either drive it
//! through [`GameState::tick`] or schedule their own timer and hand the ticket back to
//! [`GameState::conceal`]. A ticket from an earlier board (or an earlier pair) is
//! ignored, so a timer that outlives a restart cannot touch the new board.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::rng::{ordered_deck, Deck};
use crate::snapshot::{GameSnapshot, Phase, TileSnapshot};
use crate::types::*;

/// Identifies one scheduled conceal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConcealTicket {
    /// Board generation the pair was completed on
    pub generation: u32,
    /// Attempt number of the pair within that board (1-based)
    pub attempt: u32,
}

/// A completed pair waiting to be concealed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingConceal {
    pub ticket: ConcealTicket,
    pub pair: [u8; 2],
    /// Time left before [`GameState::tick`] runs the conceal
    pub remaining_ms: u32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    selection: ArrayVec<u8, SELECTION_CAPACITY>,
    deck: Deck,
    /// Monotonic board generation (increments on every deal).
    generation: u32,
    pending: Option<PendingConceal>,
    resolve_delay_ms: u32,
    /// Pairs resolved on the current board, matched or not.
    attempts: u32,
    matches: u32,
    /// Id handed to the first tile of the next deal.
    next_tile_id: u32,
    started: bool,
}

impl GameState {
    /// Create a new game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self::with_resolve_delay(seed, RESOLVE_DELAY_MS)
    }

    /// Create a new game with a custom resolve delay
    pub fn with_resolve_delay(seed: u32, resolve_delay_ms: u32) -> Self {
        Self {
            // Placeholder until the first deal; never selectable.
            board: Board::from_colors(ordered_deck(), 0),
            selection: ArrayVec::new(),
            deck: Deck::new(seed),
            generation: 0,
            pending: None,
            resolve_delay_ms,
            attempts: 0,
            matches: 0,
            next_tile_id: 0,
            started: false,
        }
    }

    /// Deal a new board, discarding the current one.
    ///
    /// Clears the selection and any pending conceal. Every call bumps the generation,
    /// which invalidates tickets handed out for the previous board.
    pub fn start(&mut self) {
        let colors = self.deck.deal();
        self.board = Board::from_colors(colors, self.next_tile_id);
        self.next_tile_id = self.next_tile_id.wrapping_add(TILE_COUNT as u32);
        self.generation = self.generation.wrapping_add(1);
        self.selection.clear();
        self.pending = None;
        self.attempts = 0;
        self.matches = 0;
        self.started = true;
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Indices awaiting resolution, in selection order
    pub fn selection(&self) -> &[u8] {
        &self.selection
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn matches(&self) -> u32 {
        self.matches
    }

    pub fn seed(&self) -> u32 {
        self.deck.seed()
    }

    pub fn pending(&self) -> Option<PendingConceal> {
        self.pending
    }

    /// All 16 tiles matched
    pub fn is_won(&self) -> bool {
        self.started && self.board.all_matched()
    }

    pub fn phase(&self) -> Phase {
        if !self.started {
            Phase::NotStarted
        } else if self.board.all_matched() {
            Phase::Won
        } else if self.pending.is_some() {
            Phase::Resolving
        } else {
            Phase::Playing
        }
    }

    /// Reveal the tile at `index`.
    ///
    /// Selecting a matched tile, a tile already in the buffer, or any tile while a
    /// completed pair is waiting to be concealed is a no-op reported as
    /// [`SelectOutcome::Ignored`].
    ///
    /// # Panics
    ///
    /// Panics if `index >= TILE_COUNT`.
    pub fn select(&mut self, index: usize) -> SelectOutcome {
        assert!(
            self.board.is_valid_index(index),
            "tile index {index} out of range (board has {TILE_COUNT} tiles)"
        );

        if !self.started {
            return SelectOutcome::Ignored(IgnoreReason::NotStarted);
        }
        if self.board.tiles()[index].matched {
            return SelectOutcome::Ignored(IgnoreReason::AlreadyMatched);
        }
        let slot = index as u8;
        if self.selection.contains(&slot) {
            return SelectOutcome::Ignored(IgnoreReason::AlreadySelected);
        }
        if self.selection.is_full() {
            return SelectOutcome::Ignored(IgnoreReason::SelectionFull);
        }

        self.board.tile_mut(index).revealed = true;
        self.selection.push(slot);

        if self.selection.is_full() {
            self.resolve_pair()
        } else {
            SelectOutcome::Revealed
        }
    }

    /// Compare the two selected tiles and schedule the conceal
    fn resolve_pair(&mut self) -> SelectOutcome {
        let pair = [self.selection[0], self.selection[1]];
        let [first, second] = pair.map(usize::from);

        self.attempts = self.attempts.wrapping_add(1);
        self.pending = Some(PendingConceal {
            ticket: ConcealTicket {
                generation: self.generation,
                attempt: self.attempts,
            },
            pair,
            remaining_ms: self.resolve_delay_ms,
        });

        let tiles = self.board.tiles();
        if tiles[first].color == tiles[second].color {
            self.board.tile_mut(first).matched = true;
            self.board.tile_mut(second).matched = true;
            self.matches += 1;
            SelectOutcome::Matched {
                finished: self.board.all_matched(),
            }
        } else {
            SelectOutcome::Mismatched { pair }
        }
    }

    /// Run the pending conceal if `ticket` refers to it.
    ///
    /// Unmatched tiles of the pair are hidden again, matched tiles stay face-up, and the
    /// selection buffer is cleared. Returns false (and changes nothing) for stale tickets.
    pub fn conceal(&mut self, ticket: ConcealTicket) -> bool {
        let Some(pending) = self.pending else {
            return false;
        };
        if pending.ticket != ticket {
            return false;
        }

        for index in pending.pair.map(usize::from) {
            let tile = self.board.tile_mut(index);
            if !tile.matched {
                tile.revealed = false;
            }
        }
        self.selection.clear();
        self.pending = None;
        true
    }

    /// Advance the pending conceal timer. Returns true if a conceal ran.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };

        pending.remaining_ms = pending.remaining_ms.saturating_sub(elapsed_ms);
        if pending.remaining_ms > 0 {
            return false;
        }

        let ticket = pending.ticket;
        self.conceal(ticket)
    }

    /// Apply a game action. Returns true if the state changed.
    ///
    /// Unlike [`GameState::select`], an out-of-range `Select` is reported as false
    /// rather than a panic, since actions usually come from parsed input.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Select(index) => {
                let index = index as usize;
                if !self.board.is_valid_index(index) {
                    return false;
                }
                !self.select(index).is_ignored()
            }
            GameAction::Restart => {
                self.start();
                true
            }
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        for (slot, tile) in out.tiles.iter_mut().zip(self.board.tiles()) {
            *slot = TileSnapshot::from(*tile);
        }
        out.selection = self.selection.clone();
        out.generation = self.generation;
        out.attempts = self.attempts;
        out.matches = self.matches;
        out.phase = self.phase();
        out.seed = self.deck.seed();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
