use crate::game::state::TableView;
use crate::game::tile::Tile;
use crate::game::train::Train;
use crate::rng::GameRng;
use crate::strategy::chain::longest_chain;
use crate::strategy::moves::{cover_options, targets, Candidate, Candidates};
use crate::strategy::{CoverDecision, NormalDecision, Strategy, StrategyError, StrategyKind};

/// Plays any legal tile, leaving an uncovered double only as a last resort
pub struct RandomStrategy {
    rng: GameRng,
}

impl RandomStrategy {
    pub fn new(rng: GameRng) -> Self {
        RandomStrategy { rng }
    }
}

impl Strategy for RandomStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Random
    }

    fn play_train(&mut self, hand: &[Tile], start_value: i32) -> Vec<Tile> {
        longest_chain(hand, start_value)
    }

    fn play_forced_double(&mut self, hand: &[Tile], train: &Train) -> CoverDecision {
        let options = cover_options(hand, train);
        CoverDecision {
            tile: self.rng.pick(&options).copied(),
            options,
        }
    }

    fn play_normally(
        &mut self,
        hand: &[Tile],
        view: &TableView<'_>,
    ) -> Result<NormalDecision, StrategyError> {
        let candidates = Candidates::enumerate(hand, &targets(view));
        let preferred: Vec<Candidate> = candidates
            .singles
            .iter()
            .chain(&candidates.good_doubles)
            .copied()
            .collect();

        let choice = if preferred.is_empty() {
            self.rng.pick(&candidates.bad_doubles).copied()
        } else {
            self.rng.pick(&preferred).copied()
        };
        Ok(NormalDecision::from_choice(choice, candidates))
    }
}
