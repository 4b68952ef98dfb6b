//! Player strategies and the factory that builds them from tags.

pub mod chain;
pub mod greedy;
pub mod learned;
pub mod model;
pub mod moves;
pub mod probability;
pub mod random;

pub use chain::longest_chain;
pub use greedy::GreedyStrategy;
pub use learned::LearnedStrategy;
pub use model::{LinearModel, PlayScorer};
pub use moves::{Candidate, Candidates, Target};
pub use probability::ProbabilityStrategy;
pub use random::RandomStrategy;

use crate::game::encode::EncodeError;
use crate::game::state::TableView;
use crate::game::tile::Tile;
use crate::game::train::Train;
use crate::rng::GameRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("unknown strategy '{0}' (expected Greedy, Random, Probability or Learned)")]
    UnknownStrategy(String),
    #[error("expected {expected} strategies, got {found}")]
    PlayerCountMismatch { expected: usize, found: usize },
    #[error("the Learned strategy needs a model file")]
    MissingModel,
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("model parsing error: {0}")]
    ModelFormat(#[from] serde_json::Error),
    #[error("model has {found} weights but the game produces {expected} features")]
    FeatureMismatch { expected: usize, found: usize },
    #[error("encoding error: {0}")]
    Encode(#[from] EncodeError),
}

/// Which policy a seat plays with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    Greedy,
    Random,
    Probability,
    Learned,
}

impl StrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Greedy => "Greedy",
            StrategyKind::Random => "Random",
            StrategyKind::Probability => "Probability",
            StrategyKind::Learned => "Learned",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(StrategyKind::Greedy),
            "random" => Ok(StrategyKind::Random),
            "probability" => Ok(StrategyKind::Probability),
            "learned" => Ok(StrategyKind::Learned),
            _ => Err(StrategyError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Choice for covering a double, with every tile that could have covered it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverDecision {
    pub tile: Option<Tile>,
    pub options: Vec<Tile>,
}

/// Tiles to lay on one train, oriented and in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Play {
    pub train: usize,
    pub tiles: Vec<Tile>,
}

/// A normal-turn choice plus everything that was on offer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalDecision {
    pub play: Option<Play>,
    pub candidates: Candidates,
}

impl NormalDecision {
    pub fn from_choice(choice: Option<Candidate>, candidates: Candidates) -> Self {
        NormalDecision {
            play: choice.map(|c| Play {
                train: c.train(),
                tiles: c.tiles(),
            }),
            candidates,
        }
    }
}

/// A player's decision policy. Strategies only ever see borrowed state and
/// hand their choice back to the engine, which validates and applies it.
pub trait Strategy: Send {
    fn kind(&self) -> StrategyKind;

    /// Chain to lay as the player's own train this round, empty if nothing
    /// connects to `start_value`
    fn play_train(&mut self, hand: &[Tile], start_value: i32) -> Vec<Tile>;

    /// Cover the double at the end of `train`
    fn play_forced_double(&mut self, hand: &[Tile], train: &Train) -> CoverDecision;

    /// Pick a play among every open end available to the player
    fn play_normally(
        &mut self,
        hand: &[Tile],
        view: &TableView<'_>,
    ) -> Result<NormalDecision, StrategyError>;
}

/// Build one strategy per seat. `rng` seeds the Random players so a game is
/// reproducible from its seed.
pub fn create_players(
    num_players: usize,
    kinds: &[StrategyKind],
    domino_size: i32,
    model_path: Option<&Path>,
    rng: &GameRng,
) -> Result<Vec<Box<dyn Strategy>>, StrategyError> {
    if kinds.len() != num_players {
        return Err(StrategyError::PlayerCountMismatch {
            expected: num_players,
            found: kinds.len(),
        });
    }

    let model: Option<Arc<dyn PlayScorer>> = if kinds.contains(&StrategyKind::Learned) {
        let path = model_path.ok_or(StrategyError::MissingModel)?;
        let model = LinearModel::from_file(path)?;
        model.check_shape(domino_size, num_players)?;
        let scorer: Arc<dyn PlayScorer> = Arc::new(model);
        Some(scorer)
    } else {
        None
    };

    kinds
        .iter()
        .enumerate()
        .map(|(seat, kind)| -> Result<Box<dyn Strategy>, StrategyError> {
            let strategy: Box<dyn Strategy> = match kind {
                StrategyKind::Greedy => Box::new(GreedyStrategy),
                StrategyKind::Random => Box::new(RandomStrategy::new(rng.fork(seat as u64))),
                StrategyKind::Probability => Box::new(ProbabilityStrategy::new(domino_size)),
                StrategyKind::Learned => {
                    let scorer = model.clone().ok_or(StrategyError::MissingModel)?;
                    Box::new(LearnedStrategy::new(domino_size, scorer))
                }
            };
            Ok(strategy)
        })
        .collect()
}
