//! Many games at once, run in parallel with one seed per game.

use crate::config::GameConfig;
use crate::game::turns::RoundEnd;
use crate::rng::GameRng;
use crate::simulation::engine::{run_game, run_game_with_observer, GameError, GameResult};
use crate::simulation::observer::PlayRecord;
use crate::strategy::StrategyKind;
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;

/// Strategies drawn from when collecting training data
const COLLECTION_POOL: [StrategyKind; 3] = [
    StrategyKind::Random,
    StrategyKind::Greedy,
    StrategyKind::Probability,
];

/// Fork stream reserved for picking a collection game's line-up
const LINEUP_STREAM: u64 = u64::MAX;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub seat: usize,
    pub strategy: StrategyKind,
    pub average_score: f64,
    pub wins: usize,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub games: usize,
    pub base_seed: u64,
    pub players: Vec<PlayerSummary>,
    /// Rounds that ended with nobody able to play
    pub stalled_rounds: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[GameResult], strategies: &[StrategyKind], base_seed: u64) -> Self {
        let games = results.len();
        let per_game = |count: f64| if games == 0 { 0.0 } else { count / games as f64 };

        let players = strategies
            .iter()
            .enumerate()
            .map(|(seat, strategy)| {
                let total: u64 = results.iter().map(|r| r.totals[seat] as u64).sum();
                let wins = results.iter().filter(|r| r.winner == seat).count();
                PlayerSummary {
                    seat,
                    strategy: *strategy,
                    average_score: per_game(total as f64),
                    wins,
                    win_rate: per_game(wins as f64),
                }
            })
            .collect();

        let stalled_rounds = results
            .iter()
            .flat_map(|r| &r.rounds)
            .filter(|round| round.end == RoundEnd::Stalled)
            .count();

        BatchSummary {
            games,
            base_seed,
            players,
            stalled_rounds,
        }
    }
}

/// Play `num_games` games with seeds `base_seed + i`
pub fn simulate_games(
    config: &GameConfig,
    num_games: usize,
    base_seed: u64,
    progress: Option<&ProgressBar>,
) -> Result<BatchSummary, GameError> {
    config.validate()?;
    let results: Vec<GameResult> = (0..num_games)
        .into_par_iter()
        .map(|i| {
            let result = run_game(config, base_seed.wrapping_add(i as u64));
            if let Some(bar) = progress {
                bar.inc(1);
            }
            result
        })
        .collect::<Result<_, _>>()?;

    Ok(BatchSummary::from_results(&results, &config.strategies, base_seed))
}

/// Strategies for one data-collection game, picked uniformly per seat
pub fn collection_lineup(num_players: usize, seed: u64) -> Vec<StrategyKind> {
    let mut rng = GameRng::new(Some(seed)).fork(LINEUP_STREAM);
    (0..num_players)
        .map(|_| COLLECTION_POOL[rng.random_range(COLLECTION_POOL.len())])
        .collect()
}

/// Data-collection mode: play games with random line-ups and return every
/// labelled play record, in game order
pub fn collect_records(
    num_players: usize,
    domino_size: i32,
    num_games: usize,
    base_seed: u64,
    progress: Option<&ProgressBar>,
) -> Result<Vec<PlayRecord>, GameError> {
    let per_game: Vec<Vec<PlayRecord>> = (0..num_games)
        .into_par_iter()
        .map(|i| {
            let seed = base_seed.wrapping_add(i as u64);
            let config = GameConfig {
                num_players,
                domino_size,
                strategies: collection_lineup(num_players, seed),
                model: None,
            };
            let mut records = Vec::new();
            let result = run_game_with_observer(&config, seed, &mut records).map(|_| records);
            if let Some(bar) = progress {
                bar.inc(1);
            }
            result
        })
        .collect::<Result<_, _>>()?;

    Ok(per_game.into_iter().flatten().collect())
}
