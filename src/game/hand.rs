use crate::game::tile::{pip_sum, Tile};

/// Tiles held by one player, with the penalty they would score right now
#[derive(Debug, Clone, Default)]
pub struct Hand {
    tiles: Vec<Tile>,
    score: u32,
}

impl Hand {
    pub fn new(tiles: Vec<Tile>) -> Self {
        let mut hand = Hand { tiles, score: 0 };
        hand.tiles.retain(|t| !t.is_empty());
        hand.update_score();
        hand
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    fn update_score(&mut self) {
        self.score = pip_sum(&self.tiles);
    }

    /// Drop every held tile equal to `tile` in either orientation
    pub fn remove(&mut self, tile: Tile) {
        self.tiles.retain(|held| !held.same_as(&tile));
        self.update_score();
    }

    /// Take drawn tiles; sentinel tiles from an exhausted deck are discarded
    pub fn add(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        self.tiles.extend(tiles);
        self.tiles.retain(|t| !t.is_empty());
        self.update_score();
    }

    pub fn contains(&self, tile: Tile) -> bool {
        self.tiles.iter().any(|held| held.same_as(&tile))
    }

    pub fn has_double(&self, value: i32) -> bool {
        self.contains(Tile(value, value))
    }

    pub fn is_winning(&self) -> bool {
        self.tiles.is_empty()
    }
}
