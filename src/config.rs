use crate::simulation::engine::{GameError, MAX_PLAYERS, MIN_PLAYERS};
use crate::strategy::{StrategyError, StrategyKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("config parsing error: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] GameError),
}

/// Table setup for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub num_players: usize,
    /// Highest pip value on a tile, also the first round's hub double
    pub domino_size: i32,
    /// One per seat
    pub strategies: Vec<StrategyKind>,
    /// Serialised model for Learned players
    pub model: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            num_players: 2,
            domino_size: 12,
            strategies: vec![StrategyKind::Greedy, StrategyKind::Random],
            model: None,
        }
    }
}

impl GameConfig {
    /// Load and validate a config from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.num_players) {
            return Err(GameError::InvalidPlayerCount(self.num_players));
        }
        if self.domino_size < 0 {
            return Err(GameError::InvalidDominoSize(self.domino_size));
        }
        if self.strategies.len() != self.num_players {
            return Err(StrategyError::PlayerCountMismatch {
                expected: self.num_players,
                found: self.strategies.len(),
            }
            .into());
        }
        if self.strategies.contains(&StrategyKind::Learned) && self.model.is_none() {
            return Err(StrategyError::MissingModel.into());
        }
        Ok(())
    }
}
