use arrayvec::ArrayVec;

use crate::board::Tile;
use crate::types::{TileColor, SELECTION_CAPACITY, TILE_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSnapshot {
    pub id: u32,
    pub color: TileColor,
    pub matched: bool,
    pub revealed: bool,
}

impl TileSnapshot {
    pub fn face_up(&self) -> bool {
        self.matched || self.revealed
    }
}

impl From<Tile> for TileSnapshot {
    fn from(value: Tile) -> Self {
        Self {
            id: value.id.0,
            color: value.color,
            matched: value.matched,
            revealed: value.revealed,
        }
    }
}

impl Default for TileSnapshot {
    fn default() -> Self {
        Self {
            id: 0,
            color: TileColor::Red,
            matched: false,
            revealed: false,
        }
    }
}

/// Whole-board lifecycle as seen by observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    NotStarted,
    /// Accepting selections
    Playing,
    /// A completed pair is waiting for its conceal; selections are rejected
    Resolving,
    /// Every tile matched
    Won,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub tiles: [TileSnapshot; TILE_COUNT],
    pub selection: ArrayVec<u8, SELECTION_CAPACITY>,
    pub generation: u32,
    pub attempts: u32,
    pub matches: u32,
    pub phase: Phase,
    pub seed: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.tiles = [TileSnapshot::default(); TILE_COUNT];
        self.selection.clear();
        self.generation = 0;
        self.attempts = 0;
        self.matches = 0;
        self.phase = Phase::NotStarted;
        self.seed = 0;
    }

    /// Selections would currently be accepted
    pub fn playable(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn face_up_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.face_up()).count()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            tiles: [TileSnapshot::default(); TILE_COUNT],
            selection: ArrayVec::new(),
            generation: 0,
            attempts: 0,
            matches: 0,
            phase: Phase::NotStarted,
            seed: 0,
        }
    }
}
