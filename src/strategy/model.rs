use crate::game::encode::feature_len;
use crate::strategy::StrategyError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Predicts the end-of-round penalty a play leads to. Lower is better.
pub trait PlayScorer: Send + Sync {
    fn predict(&self, features: &[f64]) -> f64;
}

/// Linear regressor over a flattened feature row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub bias: f64,
    pub weights: Vec<f64>,
}

impl LinearModel {
    pub fn new(bias: f64, weights: Vec<f64>) -> Self {
        LinearModel { bias, weights }
    }

    /// Load a model from a JSON file of the form `{"bias": .., "weights": [..]}`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StrategyError> {
        let content = std::fs::read_to_string(path)?;
        let model: LinearModel = serde_json::from_str(&content)?;
        Ok(model)
    }

    /// Check the weights line up with the features of a game shape
    pub fn check_shape(&self, domino_size: i32, num_players: usize) -> Result<(), StrategyError> {
        let expected = feature_len(domino_size, num_players);
        if self.weights.len() != expected {
            return Err(StrategyError::FeatureMismatch {
                expected,
                found: self.weights.len(),
            });
        }
        Ok(())
    }
}

impl PlayScorer for LinearModel {
    fn predict(&self, features: &[f64]) -> f64 {
        self.bias
            + self
                .weights
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}
