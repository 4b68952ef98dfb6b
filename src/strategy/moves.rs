//! Candidate-move enumeration shared by every strategy.

use crate::game::state::TableView;
use crate::game::tile::{full_set, Tile};
use crate::game::train::Train;
use serde::{Deserialize, Serialize};

/// An open end a player may build on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub train: usize,
    pub value: i32,
}

/// One legal way to extend a train this turn. Tiles are stored oriented
/// for the train they would be laid on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Candidate {
    Single { train: usize, tile: Tile },
    /// Lay a double and cover it straight away
    GoodDouble { train: usize, double: Tile, follow: Tile },
    /// Lay a double with nothing in hand to cover it
    BadDouble { train: usize, double: Tile },
}

impl Candidate {
    pub fn train(&self) -> usize {
        match *self {
            Candidate::Single { train, .. }
            | Candidate::GoodDouble { train, .. }
            | Candidate::BadDouble { train, .. } => train,
        }
    }

    pub fn tiles(&self) -> Vec<Tile> {
        match *self {
            Candidate::Single { tile, .. } => vec![tile],
            Candidate::GoodDouble { double, follow, .. } => vec![double, follow],
            Candidate::BadDouble { double, .. } => vec![double],
        }
    }

    /// Tile that ends up as the train's new open end
    pub fn last_tile(&self) -> Tile {
        match *self {
            Candidate::Single { tile, .. } => tile,
            Candidate::GoodDouble { follow, .. } => follow,
            Candidate::BadDouble { double, .. } => double,
        }
    }

    pub fn pips(&self) -> u32 {
        self.tiles().iter().map(Tile::pips).sum()
    }
}

/// Every candidate for a turn, grouped in enumeration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidates {
    pub singles: Vec<Candidate>,
    pub good_doubles: Vec<Candidate>,
    pub bad_doubles: Vec<Candidate>,
}

impl Candidates {
    pub fn enumerate(hand: &[Tile], targets: &[Target]) -> Self {
        Candidates {
            singles: single_plays(hand, targets),
            good_doubles: good_double_plays(hand, targets),
            bad_doubles: bad_double_plays(hand, targets),
        }
    }

    /// Singles, then good doubles, then bad doubles
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.singles
            .iter()
            .chain(&self.good_doubles)
            .chain(&self.bad_doubles)
    }

    pub fn len(&self) -> usize {
        self.singles.len() + self.good_doubles.len() + self.bad_doubles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The tile each candidate would leave at the open end
    pub fn last_tiles(&self) -> Vec<Tile> {
        self.iter().map(Candidate::last_tile).collect()
    }
}

/// Open ends of every open train plus the player's own, in train order
pub fn targets(view: &TableView<'_>) -> Vec<Target> {
    view.trains
        .iter()
        .enumerate()
        .filter(|(index, train)| train.is_open() || *index == view.player)
        .map(|(index, train)| Target {
            train: index,
            value: train.open_value(view.round_number),
        })
        .collect()
}

/// Non-double tiles matching a target, matching end first
pub fn single_plays(hand: &[Tile], targets: &[Target]) -> Vec<Candidate> {
    let mut plays = Vec::new();
    for target in targets {
        for tile in hand.iter().filter(|t| !t.is_double()) {
            if tile.0 == target.value {
                plays.push(Candidate::Single { train: target.train, tile: *tile });
            }
            if tile.1 == target.value {
                plays.push(Candidate::Single { train: target.train, tile: tile.flipped() });
            }
        }
    }
    plays
}

/// A matching double together with each tile that could cover it
pub fn good_double_plays(hand: &[Tile], targets: &[Target]) -> Vec<Candidate> {
    let mut plays = Vec::new();
    for target in targets {
        for double in hand.iter().filter(|t| t.is_double() && t.0 == target.value) {
            for follow in hand.iter().filter(|t| !t.same_as(double)) {
                if let Some(follow) = follow.oriented_from(double.0) {
                    plays.push(Candidate::GoodDouble {
                        train: target.train,
                        double: *double,
                        follow,
                    });
                }
            }
        }
    }
    plays
}

/// A matching double that nothing else in hand can cover
pub fn bad_double_plays(hand: &[Tile], targets: &[Target]) -> Vec<Candidate> {
    let mut plays = Vec::new();
    for target in targets {
        for double in hand.iter().filter(|t| t.is_double() && t.0 == target.value) {
            let coverable = hand
                .iter()
                .any(|t| !t.same_as(double) && t.touches(double.0));
            if !coverable {
                plays.push(Candidate::BadDouble { train: target.train, double: *double });
            }
        }
    }
    plays
}

/// Whether the hand still has a single or a covered double to play
pub fn has_follow_up(hand: &[Tile], targets: &[Target]) -> bool {
    !single_plays(hand, targets).is_empty() || !good_double_plays(hand, targets).is_empty()
}

/// Tiles that can cover the double at the end of `train`, oriented to fit
pub fn cover_options(hand: &[Tile], train: &Train) -> Vec<Tile> {
    let needed = train.last_tile();
    if needed.is_empty() {
        return Vec::new();
    }
    let target = Target { train: 0, value: needed.1 };
    single_plays(hand, &[target])
        .iter()
        .map(Candidate::last_tile)
        .collect()
}

/// Cover with the heaviest tile, first found on ties
pub fn heaviest_cover(options: &[Tile]) -> Option<Tile> {
    first_max_by(options.iter(), |tile| tile.pips() as f64).copied()
}

/// Tiles the player has not seen: not in hand, not on a train, not the hub double
pub fn infer_unknown(domino_size: i32, hand: &[Tile], trains: &[Train], round_value: i32) -> Vec<Tile> {
    let hub = Tile(round_value, round_value);
    full_set(domino_size)
        .into_iter()
        .filter(|tile| !tile.same_as(&hub))
        .filter(|tile| !hand.iter().any(|h| h.same_as(tile)))
        .filter(|tile| {
            !trains
                .iter()
                .any(|train| train.tiles().iter().any(|t| t.same_as(tile)))
        })
        .collect()
}

/// First item with the strictly greatest score; NaN scores never win
pub fn first_max_by<'a, T, F>(items: impl Iterator<Item = &'a T>, mut score: F) -> Option<&'a T>
where
    T: 'a,
    F: FnMut(&T) -> f64,
{
    let mut best: Option<(&T, f64)> = None;
    for item in items {
        let value = score(item);
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if value <= top => {}
            _ => best = Some((item, value)),
        }
    }
    best.map(|(item, _)| item)
}
