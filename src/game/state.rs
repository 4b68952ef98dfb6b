use crate::game::deck::Deck;
use crate::game::hand::Hand;
use crate::game::tile::Tile;
use crate::game::train::Train;
use crate::game::turns::hand_size;
use crate::rng::GameRng;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoundError {
    #[error("no player could find the [{0}|{0}] double before the deck ran out")]
    StartingDoubleMissing(i32),
    #[error("illegal play by player {player} on train {train}: {reason}")]
    IllegalPlay {
        player: usize,
        train: usize,
        reason: String,
    },
}

/// Everything the engine owns for one round
#[derive(Debug, Clone)]
pub struct RoundState {
    pub domino_size: i32,
    /// Value of the hub double, also the round's number
    pub round_value: i32,
    pub deck: Deck,
    pub hands: Vec<Hand>,
    /// One train per player, the shared hub train last
    pub trains: Vec<Train>,
    pub current: usize,
    /// Train whose trailing double still has to be covered
    pub double_up: Option<usize>,
    pub doom_counter: usize,
    pub turn_number: u32,
}

impl RoundState {
    /// Deal hands from a shuffled deck and find who holds the hub double
    pub fn deal(
        domino_size: i32,
        round_value: i32,
        num_players: usize,
        rng: &mut GameRng,
    ) -> Result<Self, RoundError> {
        Self::deal_from(Deck::new(domino_size, rng), domino_size, round_value, num_players)
    }

    /// Same as [`RoundState::deal`] with a prepared deck
    pub fn deal_from(
        mut deck: Deck,
        domino_size: i32,
        round_value: i32,
        num_players: usize,
    ) -> Result<Self, RoundError> {
        let size = hand_size(num_players, domino_size);
        let mut hands: Vec<Hand> = (0..num_players)
            .map(|_| Hand::new(deck.draw(size)))
            .collect();

        // everyone draws one until somebody holds the hub double
        let starter = loop {
            if let Some(holder) = hands.iter().position(|h| h.has_double(round_value)) {
                break holder;
            }
            if deck.is_empty() {
                return Err(RoundError::StartingDoubleMissing(round_value));
            }
            for hand in hands.iter_mut() {
                hand.add(deck.draw(1));
            }
        };
        hands[starter].remove(Tile(round_value, round_value));

        let mut trains = vec![Train::new(); num_players + 1];
        trains[num_players].set_marker(true);

        Ok(RoundState {
            domino_size,
            round_value,
            deck,
            hands,
            trains,
            current: starter,
            double_up: None,
            doom_counter: 0,
            turn_number: 1,
        })
    }

    pub fn num_players(&self) -> usize {
        self.hands.len()
    }

    pub fn hub(&self) -> usize {
        self.num_players()
    }

    pub fn hand(&self, player: usize) -> &Hand {
        &self.hands[player]
    }

    /// Draw one tile into a player's hand, returning what was drawn
    pub fn draw_for(&mut self, player: usize) -> Option<Tile> {
        let drawn = self.deck.draw(1);
        let tile = drawn.first().copied().filter(|t| !t.is_empty());
        self.hands[player].add(drawn);
        tile
    }

    /// Put the player's marker up so anyone may play on their train
    pub fn open_own_train(&mut self, player: usize) {
        self.trains[player].set_marker(true);
    }

    /// Read-only picture of the table for one player's decision
    pub fn view(&self, player: usize) -> TableView<'_> {
        TableView {
            player,
            domino_size: self.domino_size,
            round_number: self.round_value,
            turn_number: self.turn_number,
            trains: &self.trains,
        }
    }

    pub fn can_play_on(&self, player: usize, train: usize) -> bool {
        train == player || self.trains[train].is_open() || self.double_up == Some(train)
    }

    /// Tiles the player cannot see: the boneyard and the other hands
    pub fn unknown_to(&self, player: usize) -> Vec<Tile> {
        let mut unknown = self.deck.tiles().to_vec();
        for (seat, hand) in self.hands.iter().enumerate() {
            if seat != player {
                unknown.extend_from_slice(hand.tiles());
            }
        }
        unknown
    }

    /// Validate a play and move its tiles from hand to train
    pub fn apply(&mut self, player: usize, train: usize, tiles: &[Tile]) -> Result<(), RoundError> {
        let illegal = |reason: &str| RoundError::IllegalPlay {
            player,
            train,
            reason: reason.to_string(),
        };

        if train >= self.trains.len() {
            return Err(illegal("no such train"));
        }
        if !self.can_play_on(player, train) {
            return Err(illegal("train is closed to this player"));
        }
        if let Some(missing) = tiles.iter().find(|t| !self.hands[player].contains(**t)) {
            return Err(illegal(&format!("{} is not in hand", missing)));
        }
        if !self.trains[train].accepts(tiles, self.round_value) {
            return Err(illegal("tiles do not connect to the open end"));
        }

        self.trains[train].append_many(tiles);
        for tile in tiles {
            self.hands[player].remove(*tile);
        }
        Ok(())
    }

    pub fn penalties(&self) -> Vec<u32> {
        self.hands.iter().map(Hand::score).collect()
    }
}

/// What a strategy is allowed to see when deciding a normal play
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a> {
    pub player: usize,
    pub domino_size: i32,
    pub round_number: i32,
    pub turn_number: u32,
    pub trains: &'a [Train],
}

impl TableView<'_> {
    pub fn num_players(&self) -> usize {
        self.trains.len().saturating_sub(1)
    }

    pub fn own_train(&self) -> &Train {
        &self.trains[self.player]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(hands: Vec<Vec<Tile>>, round_value: i32) -> RoundState {
        let num_players = hands.len();
        let mut trains = vec![Train::new(); num_players + 1];
        trains[num_players].set_marker(true);
        RoundState {
            domino_size: 12,
            round_value,
            deck: Deck::from_tiles(vec![Tile(0, 1)]),
            hands: hands.into_iter().map(Hand::new).collect(),
            trains,
            current: 0,
            double_up: None,
            doom_counter: 0,
            turn_number: 1,
        }
    }

    #[test]
    fn test_deal_finds_starting_double() {
        let mut rng = GameRng::new(Some(11));
        let state = RoundState::deal(12, 12, 4, &mut rng).unwrap();

        assert_eq!(state.trains.len(), 5);
        assert!(state.trains[4].is_open());
        assert!(state.hands.iter().all(|h| !h.has_double(12)));
        assert!(state.deck.tiles().iter().all(|t| !t.same_as(&Tile(12, 12))));
    }

    #[test]
    fn test_deal_draws_until_found() {
        // size 3 with 3 players deals 3 tiles each, the double is the one left over
        let deck = Deck::from_tiles(crate::game::tile::full_set(3));
        let state = RoundState::deal_from(deck, 3, 3, 3).unwrap();
        assert_eq!(state.current, 0);
        assert!(state.deck.is_empty());
        assert_eq!(state.hands[0].tiles(), &[Tile(0, 0), Tile(0, 1), Tile(0, 2)]);
        assert_eq!(state.hands[1].len(), 3);
        assert_eq!(state.hands[2].len(), 3);
    }

    #[test]
    fn test_deal_missing_double_is_reported() {
        let deck = Deck::from_tiles(vec![Tile(0, 1), Tile(1, 1)]);
        let err = RoundState::deal_from(deck, 1, 0, 2).unwrap_err();
        assert_eq!(err, RoundError::StartingDoubleMissing(0));
    }

    #[test]
    fn test_single_tile_set_does_not_loop() {
        let mut rng = GameRng::new(Some(3));
        let state = RoundState::deal(0, 0, 2, &mut rng).unwrap();
        assert_eq!(state.current, 0);
        assert!(state.hands.iter().all(Hand::is_winning));
        assert!(state.deck.is_empty());
    }

    #[test]
    fn test_apply_moves_tiles() {
        let mut state = state_with(vec![vec![Tile(5, 6), Tile(3, 3)], vec![]], 6);
        state.apply(0, 0, &[Tile(6, 5)]).unwrap();
        assert_eq!(state.trains[0].tiles(), &[Tile(6, 5)]);
        assert_eq!(state.hands[0].tiles(), &[Tile(3, 3)]);
    }

    #[test]
    fn test_apply_rejects_closed_train() {
        let mut state = state_with(vec![vec![Tile(6, 1)], vec![]], 6);
        let err = state.apply(0, 1, &[Tile(6, 1)]).unwrap_err();
        assert!(matches!(err, RoundError::IllegalPlay { train: 1, .. }));

        state.trains[1].set_marker(true);
        assert!(state.apply(0, 1, &[Tile(6, 1)]).is_ok());
    }

    #[test]
    fn test_apply_rejects_unheld_and_disconnected_tiles() {
        let mut state = state_with(vec![vec![Tile(6, 1), Tile(2, 3)], vec![]], 6);
        assert!(state.apply(0, 0, &[Tile(6, 4)]).is_err());
        assert!(state.apply(0, 0, &[Tile(2, 3)]).is_err());
        assert!(state.apply(0, 2, &[Tile(1, 6)]).is_err());
        assert_eq!(state.hands[0].len(), 2);
    }

    #[test]
    fn test_unknown_excludes_own_hand() {
        let state = state_with(vec![vec![Tile(1, 2)], vec![Tile(3, 4)]], 6);
        let unknown = state.unknown_to(0);
        assert_eq!(unknown, vec![Tile(0, 1), Tile(3, 4)]);
    }

    #[test]
    fn test_draw_for_exhausted_deck() {
        let mut state = state_with(vec![vec![], vec![]], 6);
        assert_eq!(state.draw_for(0), Some(Tile(0, 1)));
        assert_eq!(state.draw_for(0), None);
        assert_eq!(state.hands[0].tiles(), &[Tile(0, 1)]);
    }
}
