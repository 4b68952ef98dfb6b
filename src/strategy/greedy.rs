use crate::game::state::TableView;
use crate::game::tile::Tile;
use crate::game::train::Train;
use crate::strategy::chain::longest_chain;
use crate::strategy::moves::{cover_options, first_max_by, heaviest_cover, targets, Candidates};
use crate::strategy::{CoverDecision, NormalDecision, Strategy, StrategyError, StrategyKind};

/// Always unloads the most pips it can this turn
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyStrategy;

impl Strategy for GreedyStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Greedy
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
        let choice = first_max_by(candidates.iter(), |c| c.pips() as f64).copied();
        Ok(NormalDecision::from_choice(choice, candidates))
    }
}
