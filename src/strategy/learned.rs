use crate::game::encode::{FeatureInput, FeatureRow};
use crate::game::state::TableView;
use crate::game::tile::Tile;
use crate::game::train::Train;
use crate::strategy::chain::longest_chain;
use crate::strategy::model::PlayScorer;
use crate::strategy::moves::{cover_options, heaviest_cover, infer_unknown, targets, Candidates};
use crate::strategy::{CoverDecision, NormalDecision, Strategy, StrategyError, StrategyKind};
use std::sync::Arc;

/// Scores every candidate with a trained model and plays the one predicted
/// to leave the lowest penalty. Opening trains and forced covers are played
/// the greedy way.
pub struct LearnedStrategy {
    domino_size: i32,
    scorer: Arc<dyn PlayScorer>,
}

impl LearnedStrategy {
    pub fn new(domino_size: i32, scorer: Arc<dyn PlayScorer>) -> Self {
        LearnedStrategy { domino_size, scorer }
    }

    /// Predicted penalty per candidate, in enumeration order
    pub fn predictions(
        &self,
        hand: &[Tile],
        view: &TableView<'_>,
        candidates: &Candidates,
    ) -> Result<Vec<f64>, StrategyError> {
        let unknown = infer_unknown(self.domino_size, hand, view.trains, view.round_number);
        let last_tiles = candidates.last_tiles();

        candidates
            .iter()
            .map(|candidate| -> Result<f64, StrategyError> {
                let play = [candidate.last_tile()];
                let row = FeatureRow::build(&FeatureInput {
                    domino_size: self.domino_size,
                    round_number: view.round_number,
                    turn_number: view.turn_number,
                    num_players: view.num_players(),
                    train_index: candidate.train(),
                    play: &play,
                    hand,
                    unknown: &unknown,
                    candidates: &last_tiles,
                    trains: view.trains,
                })?;
                Ok(self.scorer.predict(&row.to_vector()))
            })
            .collect()
    }
}

impl Strategy for LearnedStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Learned
    }

    fn play_train(&mut self, hand: &[Tile], start_value: i32) -> Vec<Tile> {
        longest_chain(hand, start_value)
    }

    fn play_forced_double(&mut self, hand: &[Tile], train: &Train) -> CoverDecision {
        let options = cover_options(hand, train);
        CoverDecision {
            tile: heaviest_cover(&options),
            options,
        }
    }

    fn play_normally(
        &mut self,
        hand: &[Tile],
        view: &TableView<'_>,
    ) -> Result<NormalDecision, StrategyError> {
        let candidates = Candidates::enumerate(hand, &targets(view));
        let predictions = self.predictions(hand, view, &candidates)?;

        let mut best: Option<(usize, f64)> = None;
        for (index, &predicted) in predictions.iter().enumerate() {
            if predicted.is_nan() {
                continue;
            }
            match best {
                Some((_, lowest)) if predicted >= lowest => {}
                _ => best = Some((index, predicted)),
            }
        }

        let choice = best.and_then(|(index, _)| candidates.iter().nth(index).copied());
        Ok(NormalDecision::from_choice(choice, candidates))
    }
}
