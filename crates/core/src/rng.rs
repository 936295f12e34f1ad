//! RNG module - shuffled deck generation
//!
//! A deck holds two copies of each palette color. Every deal reshuffles the full
//! 16-tile multiset with Fisher-Yates, drawing from a single seeded stream so a
//! given seed always produces the same sequence of boards.
//!
//! Also provides a simple LCG for deterministic testing.

use crate::types::{TileColor, PALETTE, TILE_COUNT};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits of the next state; the low bits of a power-of-two LCG
    /// cycle with very short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// The unshuffled deck: palette order, two of each color.
pub fn ordered_deck() -> [TileColor; TILE_COUNT] {
    let mut deck = [TileColor::Red; TILE_COUNT];
    for (i, color) in PALETTE.iter().enumerate() {
        deck[i * 2] = *color;
        deck[i * 2 + 1] = *color;
    }
    deck
}

/// Seeded dealer of shuffled boards
#[derive(Debug, Clone)]
pub struct Deck {
    /// Seed the deck was created with
    seed: u32,
    /// RNG for shuffling
    rng: SimpleRng,
    /// Number of boards dealt so far
    deals: u32,
}

impl Deck {
    /// Create a new deck with the given seed
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            rng: SimpleRng::new(seed),
            deals: 0,
        }
    }

    /// Deal a freshly shuffled board
    pub fn deal(&mut self) -> [TileColor; TILE_COUNT] {
        let mut colors = ordered_deck();
        self.rng.shuffle(&mut colors);
        self.deals = self.deals.wrapping_add(1);
        colors
    }

    /// Seed the deck was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Number of boards dealt so far
    pub fn deals(&self) -> u32 {
        self.deals
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new(1)
    }
}
