use crate::game::state::TableView;
use crate::game::tile::Tile;
use crate::game::train::Train;
use crate::strategy::chain::longest_chain;
use crate::strategy::moves::{
    cover_options, first_max_by, has_follow_up, heaviest_cover, infer_unknown, targets, Candidate,
    Candidates, Target,
};
use crate::strategy::{CoverDecision, NormalDecision, Strategy, StrategyError, StrategyKind};

/// Weighs the pips a play unloads against how easily opponents could
/// follow the open end it leaves behind.
#[derive(Debug, Clone)]
pub struct ProbabilityStrategy {
    domino_size: i32,
}

impl ProbabilityStrategy {
    pub fn new(domino_size: i32) -> Self {
        ProbabilityStrategy { domino_size }
    }

    /// Chance, per value, that a tile the player cannot see carries it
    pub fn playability(&self, unknown: &[Tile]) -> Vec<f64> {
        (0..=self.domino_size)
            .map(|value| {
                if unknown.is_empty() {
                    return 0.0;
                }
                let touching = unknown.iter().filter(|t| t.touches(value)).count();
                touching as f64 / unknown.len() as f64
            })
            .collect()
    }

    /// Combined score: half normalised pips, half how safe the new open end
    /// is when the play leaves the player without a follow-up
    pub fn score(
        &self,
        candidate: &Candidate,
        hand: &[Tile],
        targets: &[Target],
        playability: &[f64],
    ) -> f64 {
        let max_pips = (self.domino_size * 2) as f64;
        let pip_share = if max_pips > 0.0 {
            candidate.pips() as f64 / max_pips
        } else {
            0.0
        };

        let open = candidate.last_tile().1;
        let probability = usize::try_from(open)
            .ok()
            .and_then(|v| playability.get(v))
            .copied()
            .unwrap_or(0.0);

        let dead_end = if is_dead_end(candidate, hand, targets) { 1.0 } else { 0.0 };
        0.5 * pip_share + 0.5 * (1.0 - probability) * dead_end
    }
}

/// True when nothing else in hand could be played after `candidate`
fn is_dead_end(candidate: &Candidate, hand: &[Tile], targets: &[Target]) -> bool {
    let played = candidate.tiles();
    let remaining: Vec<Tile> = hand
        .iter()
        .filter(|t| !played.iter().any(|p| p.same_as(t)))
        .copied()
        .collect();

    // every open end showing the value just covered is gone, not only the
    // one the tile went on
    let played_on = match *candidate {
        Candidate::Single { tile, .. } => tile.0,
        Candidate::GoodDouble { double, .. } | Candidate::BadDouble { double, .. } => double.0,
    };
    let mut next_targets: Vec<Target> = targets
        .iter()
        .filter(|t| t.train != candidate.train() && t.value != played_on)
        .copied()
        .collect();
    next_targets.push(Target {
        train: candidate.train(),
        value: candidate.last_tile().1,
    });

    !has_follow_up(&remaining, &next_targets)
}

impl Strategy for ProbabilityStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Probability
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
        let targets = targets(view);
        let candidates = Candidates::enumerate(hand, &targets);

        let unknown = infer_unknown(self.domino_size, hand, view.trains, view.round_number);
        let playability = self.playability(&unknown);

        let choice = first_max_by(candidates.iter(), |c| {
            self.score(c, hand, &targets, &playability)
        })
        .copied();
        Ok(NormalDecision::from_choice(choice, candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Play;

    #[test]
    fn test_playability() {
        let strategy = ProbabilityStrategy::new(3);
        let probs = strategy.playability(&[Tile(0, 1), Tile(1, 1), Tile(2, 3), Tile(3, 3)]);
        assert_eq!(probs, vec![0.25, 0.5, 0.25, 0.5]);
        assert_eq!(strategy.playability(&[]), vec![0.0; 4]);
    }

    #[test]
    fn test_dead_end_detection() {
        let targets = [Target { train: 0, value: 4 }];
        let single = Candidate::Single { train: 0, tile: Tile(4, 2) };
        assert!(is_dead_end(&single, &[Tile(4, 2), Tile(9, 9)], &targets));
        assert!(!is_dead_end(&single, &[Tile(4, 2), Tile(2, 7)], &targets));
    }

    #[test]
    fn test_dead_end_drops_every_end_with_the_covered_value() {
        // trains 0 and 2 both show a 4; once the 4 is covered the 4-5 counts
        // as having nowhere to go
        let targets = [
            Target { train: 0, value: 4 },
            Target { train: 1, value: 6 },
            Target { train: 2, value: 4 },
        ];
        let single = Candidate::Single { train: 0, tile: Tile(4, 2) };
        assert!(is_dead_end(&single, &[Tile(4, 2), Tile(4, 5)], &targets));
        assert!(!is_dead_end(&single, &[Tile(4, 2), Tile(6, 5)], &targets));

        let double = Candidate::GoodDouble { train: 2, double: Tile(4, 4), follow: Tile(4, 1) };
        assert!(is_dead_end(&double, &[Tile(4, 4), Tile(4, 1), Tile(0, 4)], &targets));
        assert!(!is_dead_end(&double, &[Tile(4, 4), Tile(4, 1), Tile(1, 3)], &targets));
    }

    #[test]
    fn test_score_formula() {
        let strategy = ProbabilityStrategy::new(6);
        let targets = [Target { train: 0, value: 6 }];
        let candidate = Candidate::Single { train: 0, tile: Tile(6, 3) };
        let mut playability = vec![0.0; 7];
        playability[3] = 0.4;

        // dead end: 0.5 * 9/12 + 0.5 * 0.6
        let score = strategy.score(&candidate, &[Tile(6, 3)], &targets, &playability);
        assert!((score - (0.375 + 0.3)).abs() < 1e-12);

        // follow-up available: pips only
        let score = strategy.score(&candidate, &[Tile(6, 3), Tile(3, 0)], &targets, &playability);
        assert!((score - 0.375).abs() < 1e-12);
    }

    #[test]
    fn test_prefers_safe_dead_end() {
        // domino size 4, round 4, only the player's own train is playable
        let mut trains = vec![Train::new(), Train::new(), Train::new()];
        trains[0].append(Tile(4, 2));
        trains[1].append_many(&[Tile(4, 1), Tile(1, 1), Tile(1, 0)]);
        let view = TableView {
            player: 0,
            domino_size: 4,
            round_number: 4,
            turn_number: 5,
            trains: &trains,
        };

        // both plays end the player's options; a 3 is far easier for the
        // others to follow than a 1, which outweighs the two extra pips
        let hand = [Tile(2, 3), Tile(2, 1)];
        let mut strategy = ProbabilityStrategy::new(4);
        let decision = strategy.play_normally(&hand, &view).unwrap();
        assert_eq!(decision.candidates.len(), 2);
        assert_eq!(decision.play, Some(Play { train: 0, tiles: vec![Tile(2, 1)] }));

        let greedy = crate::strategy::GreedyStrategy.play_normally(&hand, &view).unwrap();
        assert_eq!(greedy.play, Some(Play { train: 0, tiles: vec![Tile(2, 3)] }));
    }

    #[test]
    fn test_zero_size_scores_without_pips() {
        let strategy = ProbabilityStrategy::new(0);
        let candidate = Candidate::BadDouble { train: 0, double: Tile(0, 0) };
        let score = strategy.score(&candidate, &[Tile(0, 0)], &[Target { train: 0, value: 0 }], &[0.0]);
        assert!((score - 0.5).abs() < 1e-12);
    }
}
