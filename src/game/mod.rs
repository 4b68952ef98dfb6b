pub mod deck;
pub mod encode;
pub mod hand;
pub mod state;
pub mod tile;
pub mod train;
pub mod turns;

pub use deck::Deck;
pub use encode::{feature_len, presence_vector, EncodeError, FeatureInput, FeatureRow};
pub use hand::Hand;
pub use state::{RoundError, RoundState, TableView};
pub use tile::{full_set, pip_sum, tile_count, Tile};
pub use train::Train;
pub use turns::{RoundEnd, TurnPhase};
