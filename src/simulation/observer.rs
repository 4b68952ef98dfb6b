use crate::game::encode::FeatureRow;
use serde::{Deserialize, Serialize};

/// One applied play as seen by a data-collection pipeline. `points` is the
/// acting player's hand penalty when the round ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayRecord {
    pub player_number: usize,
    #[serde(flatten)]
    pub features: FeatureRow,
    pub points: Option<u32>,
}

impl PlayRecord {
    pub fn new(player_number: usize, features: FeatureRow) -> Self {
        PlayRecord {
            player_number,
            features,
            points: None,
        }
    }
}

/// Receives labelled play records at the end of every round
pub trait PlayObserver {
    /// Whether the engine should build records at all
    fn wants_records(&self) -> bool {
        true
    }

    fn observe(&mut self, record: PlayRecord);
}

impl PlayObserver for Vec<PlayRecord> {
    fn observe(&mut self, record: PlayRecord) {
        self.push(record);
    }
}

/// Discards everything; the engine skips encoding entirely
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl PlayObserver for NullObserver {
    fn wants_records(&self) -> bool {
        false
    }

    fn observe(&mut self, _record: PlayRecord) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::encode::FeatureInput;
    use crate::game::tile::Tile;
    use crate::game::train::Train;

    fn row() -> FeatureRow {
        let trains = vec![Train::new(); 3];
        FeatureRow::build(&FeatureInput {
            domino_size: 1,
            round_number: 1,
            turn_number: 2,
            num_players: 2,
            train_index: 2,
            play: &[Tile(1, 0)],
            hand: &[Tile(0, 0)],
            unknown: &[],
            candidates: &[Tile(1, 0)],
            trains: &trains,
        })
        .unwrap()
    }

    #[test]
    fn test_vec_collects_records() {
        let mut records: Vec<PlayRecord> = Vec::new();
        assert!(records.wants_records());
        records.observe(PlayRecord::new(1, row()));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].points, None);
        assert!(!NullObserver.wants_records());
    }

    #[test]
    fn test_record_serialises_flat() {
        let mut record = PlayRecord::new(0, row());
        record.points = Some(7);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["player_number"], 0);
        assert_eq!(json["train_index"], 2);
        assert_eq!(json["turn_number"], 1.0);
        assert_eq!(json["points"], 7);
        assert_eq!(json["play"], serde_json::json!([0, 1, 0]));

        let back: PlayRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
