//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, async session, line protocol).
//!
//! # Board Dimensions
//!
//! The playfield is a fixed 4x4 grid:
//!
//! - **Grid size**: 4 rows by 4 columns
//! - **Tiles**: 16, indexed 0-15 in row-major display order
//! - **Pairs**: 8, one per palette color
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `RESOLVE_DELAY_MS` | 500 | Time a completed pair stays face-up before it is concealed |
//! | `TICK_MS` | 16 | Fixed timestep for hosts that drive time explicitly (~60 FPS) |
//!
//! # Examples
//!
//! ```
//! use color_match_types::{GameAction, TileColor, PALETTE, TILE_COUNT};
//!
//! // Parse a color (case-insensitive)
//! assert_eq!(TileColor::from_str("Cyan"), Some(TileColor::Cyan));
//!
//! // Parse a game action
//! assert_eq!(GameAction::from_str("select:3"), Some(GameAction::Select(3)));
//! assert_eq!(GameAction::from_str("restart"), Some(GameAction::Restart));
//!
//! // Board dimensions
//! assert_eq!(TILE_COUNT, 16);
//! assert_eq!(PALETTE.len() * 2, TILE_COUNT);
//! ```

/// Rows and columns of the square grid (4)
pub const GRID_SIZE: u8 = 4;

/// Number of tiles on the board (16)
pub const TILE_COUNT: usize = (GRID_SIZE as usize) * (GRID_SIZE as usize);

/// Number of color pairs on the board (8)
pub const PAIR_COUNT: usize = TILE_COUNT / 2;

/// Maximum number of unresolved selections
pub const SELECTION_CAPACITY: usize = 2;

/// Delay before a completed pair is concealed (500ms).
pub const RESOLVE_DELAY_MS: u32 = 500;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// The eight tile colors, each dealt exactly twice.
///
/// Declaration order is the palette order used when building a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TileColor {
    Red,
    Green,
    Blue,
    Yellow,
    Orange,
    Purple,
    Pink,
    Cyan,
}

/// Palette in deck order.
pub const PALETTE: [TileColor; PAIR_COUNT] = [
    TileColor::Red,
    TileColor::Green,
    TileColor::Blue,
    TileColor::Yellow,
    TileColor::Orange,
    TileColor::Purple,
    TileColor::Pink,
    TileColor::Cyan,
];

impl TileColor {
    /// Parse color from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use color_match_types::TileColor;
    ///
    /// assert_eq!(TileColor::from_str("red"), Some(TileColor::Red));
    /// assert_eq!(TileColor::from_str("PURPLE"), Some(TileColor::Purple));
    /// assert_eq!(TileColor::from_str("magenta"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(TileColor::Red),
            "green" => Some(TileColor::Green),
            "blue" => Some(TileColor::Blue),
            "yellow" => Some(TileColor::Yellow),
            "orange" => Some(TileColor::Orange),
            "purple" => Some(TileColor::Purple),
            "pink" => Some(TileColor::Pink),
            "cyan" => Some(TileColor::Cyan),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TileColor::Red => "red",
            TileColor::Green => "green",
            TileColor::Blue => "blue",
            TileColor::Yellow => "yellow",
            TileColor::Orange => "orange",
            TileColor::Purple => "purple",
            TileColor::Pink => "pink",
            TileColor::Cyan => "cyan",
        }
    }

    /// Position of this color in [`PALETTE`].
    pub fn palette_index(&self) -> usize {
        *self as usize
    }

    /// Suggested sRGB value for renderers.
    pub fn rgb(&self) -> u32 {
        match self {
            TileColor::Red => 0xff3b30,
            TileColor::Green => 0x34c759,
            TileColor::Blue => 0x007aff,
            TileColor::Yellow => 0xffcc00,
            TileColor::Orange => 0xff9500,
            TileColor::Purple => 0xaf52de,
            TileColor::Pink => 0xff2d55,
            TileColor::Cyan => 0x32ade6,
        }
    }
}

/// Game actions that can be applied to modify game state
///
/// These actions are what a presentation layer sends in response to taps and buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Reveal the tile at the given board index
    Select(u8),
    /// Deal a fresh board (also used for the very first game)
    Restart,
}

impl GameAction {
    /// Parse action from string
    ///
    /// Accepts `restart` and `select:<index>` (case-insensitive). The index is parsed
    /// but not range-checked.
    ///
    /// # Examples
    ///
    /// ```
    /// use color_match_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("Restart"), Some(GameAction::Restart));
    /// assert_eq!(GameAction::from_str("select:15"), Some(GameAction::Select(15)));
    /// assert_eq!(GameAction::from_str("select:x"), None);
    /// assert_eq!(GameAction::from_str("flip"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        if lower == "restart" {
            return Some(GameAction::Restart);
        }
        let index = lower.strip_prefix("select:")?;
        index.trim().parse::<u8>().ok().map(GameAction::Select)
    }

    /// Short name for the protocol and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Select(_) => "select",
            GameAction::Restart => "restart",
        }
    }
}

/// Why a selection was dropped without changing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// No board has been dealt yet
    NotStarted,
    /// The tile already belongs to a matched pair
    AlreadyMatched,
    /// The tile is already in the selection buffer
    AlreadySelected,
    /// Two tiles are awaiting their delayed conceal
    SelectionFull,
}

impl IgnoreReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            IgnoreReason::NotStarted => "not_started",
            IgnoreReason::AlreadyMatched => "already_matched",
            IgnoreReason::AlreadySelected => "already_selected",
            IgnoreReason::SelectionFull => "selection_full",
        }
    }
}

/// Result of a single `select` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectOutcome {
    /// First tile of a pair is now face-up
    Revealed,
    /// Second tile matched the first; `finished` is set when it was the last pair
    Matched { finished: bool },
    /// Second tile did not match; both will be concealed after the resolve delay
    Mismatched { pair: [u8; 2] },
    /// Nothing changed
    Ignored(IgnoreReason),
}

impl SelectOutcome {
    /// Whether this selection completed a pair (and therefore scheduled a conceal).
    pub fn completes_pair(&self) -> bool {
        matches!(
            self,
            SelectOutcome::Matched { .. } | SelectOutcome::Mismatched { .. }
        )
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, SelectOutcome::Ignored(_))
    }

    /// Short name for the protocol and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectOutcome::Revealed => "revealed",
            SelectOutcome::Matched { .. } => "matched",
            SelectOutcome::Mismatched { .. } => "mismatched",
            SelectOutcome::Ignored(_) => "ignored",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_dimensions() {
        assert_eq!(GRID_SIZE, 4);
        assert_eq!(TILE_COUNT, 16);
        assert_eq!(PAIR_COUNT, 8);
        assert_eq!(SELECTION_CAPACITY, 2);
    }

    #[test]
    fn resolve_delay_is_half_a_second() {
        assert_eq!(RESOLVE_DELAY_MS, 500);
    }

    #[test]
    fn palette_is_distinct_and_ordered() {
        for (i, color) in PALETTE.iter().enumerate() {
            assert_eq!(color.palette_index(), i);
            assert_eq!(TileColor::from_str(color.as_str()), Some(*color));
        }
        let mut sorted = PALETTE.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), PAIR_COUNT);
    }

    #[test]
    fn palette_rgb_values_are_distinct() {
        let mut values: Vec<u32> = PALETTE.iter().map(|c| c.rgb()).collect();
        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), PAIR_COUNT);
    }

    #[test]
    fn action_parsing() {
        assert_eq!(GameAction::from_str(" SELECT: 7 "), Some(GameAction::Select(7)));
        assert_eq!(GameAction::from_str("select:"), None);
        assert_eq!(GameAction::from_str("select:300"), None);
        assert_eq!(GameAction::Select(2).as_str(), "select");
        assert_eq!(GameAction::Restart.as_str(), "restart");
    }

    #[test]
    fn outcome_helpers() {
        assert!(SelectOutcome::Matched { finished: false }.completes_pair());
        assert!(SelectOutcome::Mismatched { pair: [0, 1] }.completes_pair());
        assert!(!SelectOutcome::Revealed.completes_pair());
        assert!(SelectOutcome::Ignored(IgnoreReason::SelectionFull).is_ignored());
        assert_eq!(IgnoreReason::AlreadyMatched.as_str(), "already_matched");
    }
}
