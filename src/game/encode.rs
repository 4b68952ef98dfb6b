//! Presence-vector encoding of tile groups and the per-play feature row
//! shared by the observation hook and the learned strategy.

use crate::game::tile::{tile_count, Tile};
use crate::game::train::Train;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("malformed tile {tile} for domino size {domino_size}")]
    MalformedTile { tile: Tile, domino_size: i32 },
}

/// One slot per distinct tile, 1 where the tile is present
pub fn presence_vector(domino_size: i32, tiles: &[Tile]) -> Result<Vec<u8>, EncodeError> {
    let mut slots = vec![0u8; tile_count(domino_size)];
    for tile in tiles {
        let index = tile
            .index(domino_size)
            .ok_or(EncodeError::MalformedTile { tile: *tile, domino_size })?;
        slots[index] = 1;
    }
    Ok(slots)
}

/// Length of [`FeatureRow::to_vector`] for a game shape
pub fn feature_len(domino_size: i32, num_players: usize) -> usize {
    let tiles = tile_count(domino_size);
    3 + 4 * tiles + (num_players + 1) * (1 + tiles)
}

/// Public picture of one play decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub round_number: i32,
    /// Turns elapsed divided by the number of players
    pub turn_number: f64,
    pub train_index: usize,
    pub play: Vec<u8>,
    pub hand: Vec<u8>,
    pub unknown: Vec<u8>,
    pub candidates: Vec<u8>,
    pub trains: Vec<Vec<u8>>,
    pub markers: Vec<bool>,
}

/// Everything needed to build a [`FeatureRow`]
pub struct FeatureInput<'a> {
    pub domino_size: i32,
    pub round_number: i32,
    pub turn_number: u32,
    pub num_players: usize,
    pub train_index: usize,
    pub play: &'a [Tile],
    pub hand: &'a [Tile],
    pub unknown: &'a [Tile],
    pub candidates: &'a [Tile],
    pub trains: &'a [Train],
}

impl FeatureRow {
    pub fn build(input: &FeatureInput<'_>) -> Result<Self, EncodeError> {
        let size = input.domino_size;
        let trains = input
            .trains
            .iter()
            .map(|train| presence_vector(size, train.tiles()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeatureRow {
            round_number: input.round_number,
            turn_number: input.turn_number as f64 / input.num_players.max(1) as f64,
            train_index: input.train_index,
            play: presence_vector(size, input.play)?,
            hand: presence_vector(size, input.hand)?,
            unknown: presence_vector(size, input.unknown)?,
            candidates: presence_vector(size, input.candidates)?,
            trains,
            markers: input.trains.iter().map(Train::is_open).collect(),
        })
    }

    /// Flatten in model column order: scalars, then the four per-tile
    /// vectors interleaved by tile, then each train's marker and tiles.
    pub fn to_vector(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(
            3 + 4 * self.play.len() + self.trains.len() * (1 + self.play.len()),
        );
        out.push(self.round_number as f64);
        out.push(self.turn_number);
        out.push(self.train_index as f64);
        for k in 0..self.play.len() {
            out.push(self.play[k] as f64);
            out.push(self.hand[k] as f64);
            out.push(self.unknown[k] as f64);
            out.push(self.candidates[k] as f64);
        }
        for (train, marker) in self.trains.iter().zip(&self.markers) {
            out.push(if *marker { 1.0 } else { 0.0 });
            out.extend(train.iter().map(|&slot| slot as f64));
        }
        out
    }
}
