pub mod batch;
pub mod engine;
pub mod observer;

pub use batch::{collect_records, simulate_games, BatchSummary, PlayerSummary};
pub use engine::{play_round, run_game, run_game_with_observer, GameError, GameResult, RoundOutcome};
pub use observer::{NullObserver, PlayObserver, PlayRecord};
