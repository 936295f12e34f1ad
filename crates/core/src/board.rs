//! Board module - the 4x4 grid of tiles
//!
//! The board is a flat, row-major array of 16 tiles. Display order is the array order
//! and never changes after a deal; only the per-tile flags are mutated during play.
//! Coordinates: (row, col) where both range 0..3, index = row * 4 + col.

use crate::types::{TileColor, GRID_SIZE, TILE_COUNT};

/// Identity of a tile, unique for the lifetime of a [`crate::GameState`].
///
/// Ids keep increasing across restarts so a renderer can key animations on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

/// One grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub color: TileColor,
    /// Part of a matched pair (terminal)
    pub matched: bool,
    /// Currently shown because it is in the selection buffer
    pub revealed: bool,
}

impl Tile {
    pub fn new(id: TileId, color: TileColor) -> Self {
        Self {
            id,
            color,
            matched: false,
            revealed: false,
        }
    }

    /// Whether a renderer should show the tile's color
    pub fn face_up(&self) -> bool {
        self.matched || self.revealed
    }
}

/// Row and column of a board index
pub fn row_col(index: usize) -> (u8, u8) {
    let size = GRID_SIZE as usize;
    ((index / size) as u8, (index % size) as u8)
}

/// Board index of (row, col), or None if out of bounds
pub fn index_of(row: u8, col: u8) -> Option<usize> {
    if row >= GRID_SIZE || col >= GRID_SIZE {
        return None;
    }
    Some(row as usize * GRID_SIZE as usize + col as usize)
}

/// The game board - 4 columns x 4 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    tiles: [Tile; TILE_COUNT],
}

impl Board {
    /// Build a board from dealt colors, assigning ids `first_id..first_id + 16`
    pub fn from_colors(colors: [TileColor; TILE_COUNT], first_id: u32) -> Self {
        let tiles = core::array::from_fn(|i| {
            Tile::new(TileId(first_id.wrapping_add(i as u32)), colors[i])
        });
        Self { tiles }
    }

    #[inline(always)]
    pub fn is_valid_index(&self, index: usize) -> bool {
        index < TILE_COUNT
    }

    /// Get tile at index, None if out of bounds
    pub fn get(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub(crate) fn tile_mut(&mut self, index: usize) -> &mut Tile {
        &mut self.tiles[index]
    }

    pub fn tiles(&self) -> &[Tile; TILE_COUNT] {
        &self.tiles
    }

    pub fn colors(&self) -> [TileColor; TILE_COUNT] {
        core::array::from_fn(|i| self.tiles[i].color)
    }

    /// Number of tiles with the given color
    pub fn count_color(&self, color: TileColor) -> usize {
        self.tiles.iter().filter(|t| t.color == color).count()
    }

    pub fn matched_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.matched).count()
    }

    pub fn revealed_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.revealed).count()
    }

    pub fn all_matched(&self) -> bool {
        self.tiles.iter().all(|t| t.matched)
    }

    /// Index of the other tile with the same color
    pub fn partner_of(&self, index: usize) -> Option<usize> {
        let color = self.get(index)?.color;
        self.tiles
            .iter()
            .enumerate()
            .position(|(i, t)| i != index && t.color == color)
    }
}
