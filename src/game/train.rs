use crate::game::tile::Tile;

/// A chain of tiles running out from the round's hub double
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Train {
    tiles: Vec<Tile>,
    marker: bool,
}

impl Train {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// No legality check here, the engine validates before calling
    pub fn append(&mut self, tile: Tile) {
        self.tiles.push(tile);
    }

    pub fn append_many(&mut self, tiles: &[Tile]) {
        self.tiles.extend_from_slice(tiles);
    }

    /// Open ("marker up") trains accept tiles from any player
    pub fn set_marker(&mut self, marker: bool) {
        self.marker = marker;
    }

    pub fn is_open(&self) -> bool {
        self.marker
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Last tile laid, or [`Tile::EMPTY`] when nothing has been laid yet
    /// (the open end is then the round's hub value)
    pub fn last_tile(&self) -> Tile {
        self.tiles.last().copied().unwrap_or(Tile::EMPTY)
    }

    /// Value a new tile has to match
    pub fn open_value(&self, round_value: i32) -> i32 {
        match self.tiles.last() {
            Some(tile) => tile.1,
            None => round_value,
        }
    }

    /// True if `chain` can be laid in order onto this train's open end
    pub fn accepts(&self, chain: &[Tile], round_value: i32) -> bool {
        let mut open = self.open_value(round_value);
        for tile in chain {
            if tile.is_empty() || tile.0 != open {
                return false;
            }
            open = tile.1;
        }
        !chain.is_empty()
    }

    /// Every tile connects to the one before it, the first to the hub value
    pub fn is_connected(&self, round_value: i32) -> bool {
        self.tiles.is_empty() || Train::new().accepts(&self.tiles, round_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_train() {
        let train = Train::new();
        assert!(train.is_empty());
        assert_eq!(train.last_tile(), Tile::EMPTY);
        assert_eq!(train.open_value(9), 9);
        assert!(!train.is_open());
    }

    #[test]
    fn test_append_and_open_value() {
        let mut train = Train::new();
        train.append(Tile(9, 4));
        train.append_many(&[Tile(4, 4), Tile(4, 1)]);
        assert_eq!(train.last_tile(), Tile(4, 1));
        assert_eq!(train.open_value(9), 1);
        assert!(train.is_connected(9));
        assert!(!train.is_connected(8));
    }

    #[test]
    fn test_accepts() {
        let mut train = Train::new();
        assert!(train.accepts(&[Tile(6, 2), Tile(2, 0)], 6));
        assert!(!train.accepts(&[Tile(2, 6)], 6));
        assert!(!train.accepts(&[], 6));

        train.append(Tile(6, 3));
        assert!(train.accepts(&[Tile(3, 3), Tile(3, 8)], 6));
        assert!(!train.accepts(&[Tile(3, 3), Tile(8, 3)], 6));
        assert!(!train.accepts(&[Tile::EMPTY], 6));
    }

    #[test]
    fn test_marker() {
        let mut train = Train::new();
        train.set_marker(true);
        assert!(train.is_open());
        train.set_marker(false);
        assert!(!train.is_open());
    }
}
