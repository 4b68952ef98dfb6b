use serde::{Deserialize, Serialize};
use std::fmt;

/// A domino tile. The pair is stored in play orientation: when a tile sits
/// on a train, `.0` is the end touching the previous tile and `.1` is the
/// open end. Equality between tiles ignores orientation via [`Tile::same_as`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile(pub i32, pub i32);

impl Tile {
    /// "No more tiles" signal handed out by an exhausted deck
    pub const EMPTY: Tile = Tile(-1, -1);

    pub fn is_empty(&self) -> bool {
        *self == Tile::EMPTY
    }

    pub fn is_double(&self) -> bool {
        self.0 == self.1
    }

    /// Penalty value of the tile
    pub fn pips(&self) -> u32 {
        (self.0 + self.1).max(0) as u32
    }

    pub fn touches(&self, value: i32) -> bool {
        self.0 == value || self.1 == value
    }

    pub fn flipped(&self) -> Tile {
        Tile(self.1, self.0)
    }

    /// Same tile regardless of orientation
    pub fn same_as(&self, other: &Tile) -> bool {
        *self == *other || *self == other.flipped()
    }

    /// Orient the tile so that `value` is the connecting end
    pub fn oriented_from(&self, value: i32) -> Option<Tile> {
        if self.0 == value {
            Some(*self)
        } else if self.1 == value {
            Some(self.flipped())
        } else {
            None
        }
    }

    /// Smaller value first, the form every tile takes in a fresh deck
    pub fn canonical(&self) -> Tile {
        Tile(self.0.min(self.1), self.0.max(self.1))
    }

    pub fn is_valid(&self, domino_size: i32) -> bool {
        (0..=domino_size).contains(&self.0) && (0..=domino_size).contains(&self.1)
    }

    /// Position of the tile in canonical deck order, the same for both
    /// orientations. None if the tile does not belong to the set.
    pub fn index(&self, domino_size: i32) -> Option<usize> {
        if !self.is_valid(domino_size) {
            return None;
        }
        let Tile(low, high) = self.canonical();
        let (n, x, y) = (domino_size as usize, low as usize, high as usize);
        // rows 0..x hold (n + 1 - row) tiles each
        Some(x * (n + 1) - x * x.saturating_sub(1) / 2 + (y - x))
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}|{}]", self.0, self.1)
    }
}

/// Number of distinct tiles in a set of the given size
pub fn tile_count(domino_size: i32) -> usize {
    if domino_size < 0 {
        return 0;
    }
    let n = domino_size as usize;
    (n + 1) * (n + 2) / 2
}

/// Every tile of the set in canonical deck order
pub fn full_set(domino_size: i32) -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(tile_count(domino_size));
    for x in 0..=domino_size {
        for y in x..=domino_size {
            tiles.push(Tile(x, y));
        }
    }
    tiles
}

/// Total penalty of a group of tiles
pub fn pip_sum(tiles: &[Tile]) -> u32 {
    tiles.iter().map(Tile::pips).sum()
}
