use crate::game::tile::{full_set, Tile};
use crate::rng::GameRng;

/// The shuffled boneyard for one round
#[derive(Debug, Clone)]
pub struct Deck {
    tiles: Vec<Tile>,
}

impl Deck {
    /// Build every tile `(a, b)` with `a <= b` up to `domino_size` and shuffle
    pub fn new(domino_size: i32, rng: &mut GameRng) -> Self {
        let mut tiles = full_set(domino_size);
        rng.shuffle(&mut tiles);
        Deck { tiles }
    }

    /// Deck with a fixed order, front of the slice drawn first
    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        Deck { tiles }
    }

    /// Take up to `n` tiles off the front. An exhausted deck answers with a
    /// single [`Tile::EMPTY`] instead of an empty list.
    pub fn draw(&mut self, n: usize) -> Vec<Tile> {
        if self.tiles.is_empty() {
            return vec![Tile::EMPTY];
        }
        let n = n.min(self.tiles.len());
        self.tiles.drain(..n).collect()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}
