//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and resolution logic.
//! It has **zero dependencies** on UI, timers, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical deals
//! - **Testable**: Unit tests for every rule and edge case
//! - **Portable**: Can run in any environment (terminal, GUI, headless, async session)
//!
//! # Module Structure
//!
//! - [`board`]: 4x4 board of tiles with identity, color and matched/revealed flags
//! - [`game_state`]: Board + selection buffer + deferred conceal
//! - [`reducer`]: Pure `state -> state` wrappers around the game state operations
//! - [`rng`]: Seeded Fisher-Yates deck dealing
//! - [`snapshot`]: Immutable copies of the state for observers
//!
//! # Game Rules
//!
//! - **Deal**: Two tiles of each of the 8 palette colors, uniformly shuffled
//! - **Select**: Reveals a tile; matched tiles, already-selected tiles and any tile while
//!   a pair is resolving are ignored
//! - **Resolve**: The second selection compares colors; equal colors become matched
//!   permanently
//! - **Conceal**: 500ms later the unmatched tiles of the pair flip back and the
//!   selection clears
//! - **Win**: All 16 tiles matched
//!
//! # Example
//!
//! ```
//! use color_match_core::GameState;
//! use color_match_types::{SelectOutcome, RESOLVE_DELAY_MS};
//!
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! // Reveal the first tile and its partner
//! let partner = game.board().partner_of(0).unwrap();
//! assert_eq!(game.select(0), SelectOutcome::Revealed);
//! assert!(matches!(game.select(partner), SelectOutcome::Matched { .. }));
//!
//! // The pair resolves after the delay
//! assert!(game.tick(RESOLVE_DELAY_MS));
//! assert!(game.selection().is_empty());
//! assert_eq!(game.matches(), 1);
//! ```
//!
//! # Timing
//!
//! The core never sleeps. Hosts either call [`GameState::tick`](game_state::GameState::tick)
//! with elapsed time, or schedule their own timer and pass the pending
//! [`ConcealTicket`] to [`GameState::conceal`](game_state::GameState::conceal).

pub mod board;
pub mod game_state;
pub mod reducer;
pub mod rng;
pub mod snapshot;

pub use color_match_types as types;

// Re-export commonly used types for convenience
pub use board::{index_of, row_col, Board, Tile, TileId};
pub use game_state::{ConcealTicket, GameState, PendingConceal};
pub use rng::{Deck, SimpleRng};
pub use snapshot::{GameSnapshot, Phase, TileSnapshot};
