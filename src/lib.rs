pub mod config;
pub mod game;
pub mod logging;
pub mod rng;
pub mod simulation;
pub mod strategy;
