use crate::game::state::RoundState;
use crate::game::tile::tile_count;

/// Tiles dealt per player for 2..=8 players
const HAND_SIZES: [usize; 7] = [16, 16, 15, 14, 12, 10, 9];

/// Doom turns allowed per player before a round counts as stalled
pub const DOOM_TURNS_PER_PLAYER: usize = 5;

/// Hand size for a table, capped so every player gets an equal share of a
/// small set
pub fn hand_size(num_players: usize, domino_size: i32) -> usize {
    let listed = num_players
        .checked_sub(2)
        .and_then(|i| HAND_SIZES.get(i))
        .copied()
        .unwrap_or(0);
    listed.min(tile_count(domino_size) / num_players.max(1))
}

/// What the active player has to do this turn, checked in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// A double on this train is waiting to be covered
    DoubleCovering(usize),
    /// The player has not started their own train this round
    OwnTrainEmpty,
    Normal,
}

/// Why a round finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEnd {
    /// This player laid their last tile
    Domino(usize),
    /// Nobody managed to play for too long
    Stalled,
}

pub fn current_phase(state: &RoundState) -> TurnPhase {
    if let Some(train) = state.double_up {
        TurnPhase::DoubleCovering(train)
    } else if state.trains[state.current].is_empty() {
        TurnPhase::OwnTrainEmpty
    } else {
        TurnPhase::Normal
    }
}

/// A turn that ended without a play: marker up, doom counter grows
pub fn pass_turn(state: &mut RoundState) {
    let player = state.current;
    state.open_own_train(player);
    state.doom_counter += 1;
}

/// Check the player who just acted for a finished round
pub fn round_end(state: &RoundState) -> Option<RoundEnd> {
    if state.hands[state.current].is_winning() {
        Some(RoundEnd::Domino(state.current))
    } else if state.doom_counter > state.num_players() * DOOM_TURNS_PER_PLAYER {
        Some(RoundEnd::Stalled)
    } else {
        None
    }
}

/// Hand the turn to the next seat
pub fn advance_turn(state: &mut RoundState) {
    state.current = (state.current + 1) % state.num_players();
    state.turn_number += 1;
}
