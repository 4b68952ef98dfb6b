use crate::config::GameConfig;
use crate::game::encode::{EncodeError, FeatureInput, FeatureRow};
use crate::game::state::{RoundError, RoundState};
use crate::game::tile::Tile;
use crate::game::train::Train;
use crate::game::turns::{advance_turn, current_phase, pass_turn, round_end, RoundEnd, TurnPhase};
use crate::rng::GameRng;
use crate::simulation::observer::{NullObserver, PlayObserver, PlayRecord};
use crate::strategy::{create_players, NormalDecision, Strategy, StrategyError, StrategyKind};
use log::{debug, info, warn};
use thiserror::Error;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 8;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("invalid player count {0} (expected 2 to 8)")]
    InvalidPlayerCount(usize),
    #[error("invalid domino size {0}")]
    InvalidDominoSize(i32),
    #[error("strategy error: {0}")]
    Strategy(#[from] StrategyError),
    #[error("encoding error: {0}")]
    Encode(#[from] EncodeError),
    #[error("illegal play by player {player} on train {train}: {reason}")]
    IllegalPlay {
        player: usize,
        train: usize,
        reason: String,
    },
    #[error("no player could find the [{0}|{0}] double before the deck ran out")]
    StartingDoubleMissing(i32),
}

impl From<RoundError> for GameError {
    fn from(err: RoundError) -> Self {
        match err {
            RoundError::StartingDoubleMissing(value) => GameError::StartingDoubleMissing(value),
            RoundError::IllegalPlay {
                player,
                train,
                reason,
            } => GameError::IllegalPlay {
                player,
                train,
                reason,
            },
        }
    }
}

/// How one round finished
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    pub round_value: i32,
    pub starter: usize,
    pub end: RoundEnd,
    /// Hand penalty per player
    pub penalties: Vec<u32>,
    pub turns: u32,
    /// Trains as they stood at the end, hub last
    pub trains: Vec<Train>,
}

/// Result of a full game, one round per value from the domino size down to 0
#[derive(Debug, Clone, PartialEq)]
pub struct GameResult {
    pub seed: u64,
    pub strategies: Vec<StrategyKind>,
    pub rounds: Vec<RoundOutcome>,
    pub totals: Vec<u32>,
    /// Lowest total, first seat on ties
    pub winner: usize,
}

/// Play a game without recording plays
pub fn run_game(config: &GameConfig, seed: u64) -> Result<GameResult, GameError> {
    run_game_with_observer(config, seed, &mut NullObserver)
}

/// Play a game, handing every labelled play record to `observer`
pub fn run_game_with_observer(
    config: &GameConfig,
    seed: u64,
    observer: &mut dyn PlayObserver,
) -> Result<GameResult, GameError> {
    config.validate()?;

    let mut rng = GameRng::new(Some(seed));
    let mut players = create_players(
        config.num_players,
        &config.strategies,
        config.domino_size,
        config.model.as_deref(),
        &rng,
    )?;

    let mut totals = vec![0u32; config.num_players];
    let mut rounds = Vec::with_capacity(config.domino_size as usize + 1);
    for round_value in (0..=config.domino_size).rev() {
        let outcome = play_round(&mut players, config.domino_size, round_value, &mut rng, observer)?;
        for (total, penalty) in totals.iter_mut().zip(&outcome.penalties) {
            *total += penalty;
        }
        info!(
            "Round {} over after {} turns: {:?} (totals {:?})",
            round_value, outcome.turns, outcome.penalties, totals
        );
        rounds.push(outcome);
    }

    let winner = totals
        .iter()
        .enumerate()
        .min_by_key(|(_, total)| **total)
        .map(|(seat, _)| seat)
        .unwrap_or(0);
    info!(
        "Game {} won by player {} ({}) with {} points",
        seed, winner, config.strategies[winner], totals[winner]
    );

    Ok(GameResult {
        seed,
        strategies: config.strategies.clone(),
        rounds,
        totals,
        winner,
    })
}

/// Deal and play one round to completion
pub fn play_round(
    players: &mut [Box<dyn Strategy>],
    domino_size: i32,
    round_value: i32,
    rng: &mut GameRng,
    observer: &mut dyn PlayObserver,
) -> Result<RoundOutcome, GameError> {
    let state = RoundState::deal(domino_size, round_value, players.len(), rng)?;
    info!(
        "Round {}: player {} holds the starting double",
        round_value, state.current
    );

    let (outcome, records) = Round::new(state, players, observer.wants_records()).run()?;
    for mut record in records {
        record.points = outcome.penalties.get(record.player_number).copied();
        observer.observe(record);
    }
    Ok(outcome)
}

/// Turn state machine for one round
pub(crate) struct Round<'a> {
    state: RoundState,
    players: &'a mut [Box<dyn Strategy>],
    records: Option<Vec<PlayRecord>>,
}

impl<'a> Round<'a> {
    pub(crate) fn new(
        state: RoundState,
        players: &'a mut [Box<dyn Strategy>],
        record_plays: bool,
    ) -> Self {
        Round {
            state,
            players,
            records: record_plays.then(Vec::new),
        }
    }

    pub(crate) fn run(mut self) -> Result<(RoundOutcome, Vec<PlayRecord>), GameError> {
        let starter = self.state.current;
        let end = match round_end(&self.state) {
            Some(end) => end,
            None => loop {
                self.play_turn()?;
                if let Some(end) = round_end(&self.state) {
                    break end;
                }
                advance_turn(&mut self.state);
            },
        };

        match end {
            RoundEnd::Domino(player) => debug!("Player {} dominoes", player),
            RoundEnd::Stalled => warn!(
                "Round {} stalled after {} turns without progress",
                self.state.round_value, self.state.doom_counter
            ),
        }

        let outcome = RoundOutcome {
            round_value: self.state.round_value,
            starter,
            end,
            penalties: self.state.penalties(),
            turns: self.state.turn_number,
            trains: self.state.trains.clone(),
        };
        Ok((outcome, self.records.unwrap_or_default()))
    }

    /// Play whichever phase the current player is in
    pub(crate) fn play_turn(&mut self) -> Result<(), GameError> {
        match current_phase(&self.state) {
            TurnPhase::DoubleCovering(train) => self.cover_pending_double(train),
            TurnPhase::OwnTrainEmpty => self.lay_own_train(),
            TurnPhase::Normal => self.play_normal(),
        }
    }

    fn cover_pending_double(&mut self, train: usize) -> Result<(), GameError> {
        let player = self.state.current;
        match self.find_cover(train) {
            Some((tile, options)) => {
                debug!("Player {} covers the double on train {} with {}", player, train, tile);
                self.record(train, &[tile], &options)?;
                self.state.apply(player, train, &[tile])?;
                self.state.double_up = None;
                self.state.doom_counter = 0;
            }
            None => {
                debug!("Player {} cannot cover the double on train {}", player, train);
                pass_turn(&mut self.state);
            }
        }
        Ok(())
    }

    fn lay_own_train(&mut self) -> Result<(), GameError> {
        let player = self.state.current;
        let start = self.state.round_value;

        let mut chain = self.players[player].play_train(self.state.hand(player).tiles(), start);
        if chain.is_empty() {
            self.state.draw_for(player);
            chain = self.players[player].play_train(self.state.hand(player).tiles(), start);
        }
        if chain.is_empty() {
            debug!("Player {} cannot start a train", player);
            pass_turn(&mut self.state);
            return Ok(());
        }

        debug!("Player {} lays a train of {} tiles", player, chain.len());
        self.state.doom_counter = 0;
        self.record(player, &chain, &chain)?;
        self.state.apply(player, player, &chain)?;

        let ends_on_double = chain.last().is_some_and(Tile::is_double);
        if ends_on_double && !self.state.hand(player).is_empty() {
            match self.find_cover(player) {
                Some((tile, options)) => {
                    self.record(player, &[tile], &options)?;
                    self.state.apply(player, player, &[tile])?;
                }
                None => {
                    debug!("Player {} leaves their own train on a double", player);
                    self.state.open_own_train(player);
                    self.state.doom_counter += 1;
                }
            }
        }
        Ok(())
    }

    fn play_normal(&mut self) -> Result<(), GameError> {
        let player = self.state.current;
        let decision = self.decide_normal()?;
        let Some(play) = decision.play else {
            debug!("Player {} has no play", player);
            pass_turn(&mut self.state);
            return Ok(());
        };

        self.state.doom_counter = 0;
        self.record(play.train, &play.tiles, &decision.candidates.last_tiles())?;

        match play.tiles.as_slice() {
            [double] if double.is_double() => {
                debug!("Player {} plays {} on train {}", player, double, play.train);
                self.state.apply(player, play.train, &play.tiles)?;
                if self.state.hand(player).is_empty() {
                    return Ok(());
                }
                match self.find_cover(play.train) {
                    Some((tile, options)) => {
                        self.record(play.train, &[tile], &options)?;
                        self.state.apply(player, play.train, &[tile])?;
                    }
                    None => {
                        debug!("Player {} leaves {} uncovered", player, double);
                        self.state.double_up = Some(play.train);
                        self.state.open_own_train(player);
                    }
                }
            }
            [_] => {
                self.state.apply(player, play.train, &play.tiles)?;
            }
            [double, _] if double.is_double() => {
                self.state.apply(player, play.train, &play.tiles)?;
            }
            _ => {
                return Err(GameError::IllegalPlay {
                    player,
                    train: play.train,
                    reason: format!("a normal play is one tile or a covered double, got {:?}", play.tiles),
                });
            }
        }
        Ok(())
    }

    /// Ask the current player for a normal play, drawing once if they have none
    fn decide_normal(&mut self) -> Result<NormalDecision, GameError> {
        let player = self.state.current;
        let decision = self.players[player]
            .play_normally(self.state.hand(player).tiles(), &self.state.view(player))?;
        if decision.play.is_some() {
            return Ok(decision);
        }

        let drawn = self.state.draw_for(player);
        debug!("Player {} draws {:?}", player, drawn);
        let decision = self.players[player]
            .play_normally(self.state.hand(player).tiles(), &self.state.view(player))?;
        Ok(decision)
    }

    /// Ask the current player to cover the double ending `train`, drawing
    /// once if they cannot
    fn find_cover(&mut self, train: usize) -> Option<(Tile, Vec<Tile>)> {
        let player = self.state.current;
        for attempt in 0..2 {
            if attempt > 0 {
                let drawn = self.state.draw_for(player);
                debug!("Player {} draws {:?} to cover train {}", player, drawn, train);
            }
            let decision = self.players[player]
                .play_forced_double(self.state.hand(player).tiles(), &self.state.trains[train]);
            if let Some(tile) = decision.tile {
                return Some((tile, decision.options));
            }
        }
        None
    }

    /// Snapshot the table before a play is applied
    fn record(&mut self, train: usize, play: &[Tile], candidates: &[Tile]) -> Result<(), GameError> {
        let Some(records) = self.records.as_mut() else {
            return Ok(());
        };
        let player = self.state.current;
        let unknown = self.state.unknown_to(player);
        let features = FeatureRow::build(&FeatureInput {
            domino_size: self.state.domino_size,
            round_number: self.state.round_value,
            turn_number: self.state.turn_number,
            num_players: self.state.num_players(),
            train_index: train,
            play,
            hand: self.state.hand(player).tiles(),
            unknown: &unknown,
            candidates,
            trains: &self.state.trains,
        })?;
        records.push(PlayRecord::new(player, features));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::deck::Deck;
    use crate::game::hand::Hand;
    use crate::game::state::TableView;
    use crate::strategy::{CoverDecision, GreedyStrategy, Play, ProbabilityStrategy, RandomStrategy};
    // named so the glob from proptest's prelude cannot shadow it
    use crate::strategy::Strategy;
    use proptest::prelude::*;

    fn greedy_pair() -> Vec<Box<dyn Strategy>> {
        vec![Box::new(GreedyStrategy), Box::new(GreedyStrategy)]
    }

    /// Two players at round 6; player 0 to act
    fn table(hand: Vec<Tile>, deck: Vec<Tile>) -> RoundState {
        let mut trains = vec![Train::new(); 3];
        trains[2].set_marker(true);
        RoundState {
            domino_size: 6,
            round_value: 6,
            deck: Deck::from_tiles(deck),
            hands: vec![Hand::new(hand), Hand::new(vec![Tile(1, 1)])],
            trains,
            current: 0,
            double_up: None,
            doom_counter: 0,
            turn_number: 3,
        }
    }

    fn play_one_turn(state: RoundState) -> (RoundState, Vec<PlayRecord>) {
        let mut players = greedy_pair();
        let mut round = Round::new(state, &mut players, true);
        round.play_turn().unwrap();
        let records = round.records.take().unwrap_or_default();
        (round.state, records)
    }

    #[test]
    fn test_covers_pending_double() {
        let mut state = table(vec![Tile(4, 2), Tile(4, 5), Tile(1, 2)], vec![Tile(0, 0)]);
        state.trains[1].append_many(&[Tile(6, 4), Tile(4, 4)]);
        state.double_up = Some(1);
        state.doom_counter = 3;

        let (state, records) = play_one_turn(state);
        assert_eq!(state.trains[1].tiles(), &[Tile(6, 4), Tile(4, 4), Tile(4, 5)]);
        assert_eq!(state.double_up, None);
        assert_eq!(state.doom_counter, 0);
        assert_eq!(state.hand(0).tiles(), &[Tile(4, 2), Tile(1, 2)]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].features.train_index, 1);
    }

    #[test]
    fn test_failed_cover_draws_then_passes() {
        let mut state = table(vec![Tile(1, 2)], vec![Tile(2, 3)]);
        state.trains[1].append_many(&[Tile(6, 4), Tile(4, 4)]);
        state.double_up = Some(1);
        state.doom_counter = 3;

        let (state, records) = play_one_turn(state);
        assert_eq!(state.double_up, Some(1));
        assert_eq!(state.doom_counter, 4);
        assert!(state.trains[0].is_open());
        assert_eq!(state.hand(0).len(), 2);
        assert!(records.is_empty());
    }

    #[test]
    fn test_own_train_ending_on_double() {
        let state = table(vec![Tile(6, 3), Tile(3, 3), Tile(1, 2)], vec![Tile(0, 5)]);

        let (state, records) = play_one_turn(state);
        assert_eq!(state.trains[0].tiles(), &[Tile(6, 3), Tile(3, 3)]);
        assert!(state.trains[0].is_open());
        assert_eq!(state.doom_counter, 1);
        assert_eq!(state.double_up, None);
        assert_eq!(state.hand(0).tiles(), &[Tile(1, 2), Tile(0, 5)]);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_own_train_double_covered() {
        let state = table(vec![Tile(6, 3), Tile(3, 3), Tile(1, 2)], vec![Tile(3, 5)]);

        let (state, records) = play_one_turn(state);
        assert_eq!(state.trains[0].tiles(), &[Tile(6, 3), Tile(3, 3), Tile(3, 5)]);
        assert!(!state.trains[0].is_open());
        assert_eq!(state.doom_counter, 0);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_own_train_draws_before_passing() {
        let state = table(vec![Tile(1, 2)], vec![Tile(6, 0)]);
        let (state, _) = play_one_turn(state);
        assert_eq!(state.trains[0].tiles(), &[Tile(6, 0)]);
        assert_eq!(state.hand(0).tiles(), &[Tile(1, 2)]);

        let state = table(vec![Tile(1, 2)], vec![Tile(5, 0)]);
        let (state, _) = play_one_turn(state);
        assert!(state.trains[0].is_empty());
        assert!(state.trains[0].is_open());
        assert_eq!(state.doom_counter, 1);
    }

    #[test]
    fn test_uncovered_double_registers_obligation() {
        let mut state = table(vec![Tile(2, 2), Tile(5, 5)], vec![Tile(0, 1)]);
        state.trains[0].append(Tile(6, 2));
        state.doom_counter = 2;

        let (state, _) = play_one_turn(state);
        assert_eq!(state.trains[0].tiles(), &[Tile(6, 2), Tile(2, 2)]);
        assert_eq!(state.double_up, Some(0));
        assert!(state.trains[0].is_open());
        assert_eq!(state.doom_counter, 0);
        assert_eq!(state.hand(0).tiles(), &[Tile(5, 5), Tile(0, 1)]);
    }

    #[test]
    fn test_good_double_lays_both_tiles() {
        let mut state = table(vec![Tile(2, 2), Tile(2, 5), Tile(0, 0)], vec![]);
        state.trains[0].append(Tile(6, 2));

        let (state, records) = play_one_turn(state);
        assert_eq!(state.trains[0].tiles(), &[Tile(6, 2), Tile(2, 2), Tile(2, 5)]);
        assert_eq!(state.hand(0).tiles(), &[Tile(0, 0)]);
        assert_eq!(state.double_up, None);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_normal_play_draws_and_retries() {
        let mut state = table(vec![Tile(0, 1)], vec![Tile(2, 3)]);
        state.trains[0].append(Tile(6, 2));
        let (state, _) = play_one_turn(state);
        assert_eq!(state.trains[0].tiles(), &[Tile(6, 2), Tile(2, 3)]);
        assert_eq!(state.hand(0).tiles(), &[Tile(0, 1)]);

        let mut state = table(vec![Tile(0, 1)], vec![Tile(3, 4)]);
        state.trains[0].append(Tile(6, 2));
        state.doom_counter = 1;
        let (state, _) = play_one_turn(state);
        assert!(state.trains[0].is_open());
        assert_eq!(state.doom_counter, 2);
        assert_eq!(state.hand(0).len(), 2);
    }

    struct Cheater;

    impl Strategy for Cheater {
        fn kind(&self) -> StrategyKind {
            StrategyKind::Greedy
        }

        fn play_train(&mut self, _hand: &[Tile], _start_value: i32) -> Vec<Tile> {
            Vec::new()
        }

        fn play_forced_double(&mut self, _hand: &[Tile], _train: &Train) -> CoverDecision {
            CoverDecision::default()
        }

        fn play_normally(
            &mut self,
            _hand: &[Tile],
            _view: &TableView<'_>,
        ) -> Result<NormalDecision, StrategyError> {
            Ok(NormalDecision {
                play: Some(Play { train: 1, tiles: vec![Tile(6, 1)] }),
                candidates: Default::default(),
            })
        }
    }

    #[test]
    fn test_illegal_play_is_rejected() {
        let mut state = table(vec![Tile(6, 1)], vec![]);
        state.trains[0].append(Tile(6, 2));
        let mut players: Vec<Box<dyn Strategy>> = vec![Box::new(Cheater), Box::new(Cheater)];
        let mut round = Round::new(state, &mut players, false);

        let err = round.play_turn().unwrap_err();
        assert!(matches!(err, GameError::IllegalPlay { player: 0, train: 1, .. }));
        assert_eq!(round.state.hand(0).tiles(), &[Tile(6, 1)]);
    }

    #[test]
    fn test_invalid_player_count() {
        let config = GameConfig {
            num_players: 9,
            strategies: vec![StrategyKind::Greedy; 9],
            ..GameConfig::default()
        };
        assert!(matches!(run_game(&config, 1), Err(GameError::InvalidPlayerCount(9))));
    }

    #[test]
    fn test_single_tile_game() {
        let config = GameConfig {
            domino_size: 0,
            ..GameConfig::default()
        };
        let result = run_game(&config, 5).unwrap();
        assert_eq!(result.rounds.len(), 1);
        assert_eq!(result.rounds[0].end, RoundEnd::Domino(0));
        assert_eq!(result.totals, vec![0, 0]);
        assert_eq!(result.winner, 0);
    }

    #[test]
    fn test_records_are_labelled_per_round() {
        let config = GameConfig {
            domino_size: 4,
            ..GameConfig::default()
        };
        let mut records: Vec<PlayRecord> = Vec::new();
        let result = run_game_with_observer(&config, 17, &mut records).unwrap();

        assert!(!records.is_empty());
        for record in &records {
            let round = result
                .rounds
                .iter()
                .find(|r| r.round_value == record.features.round_number)
                .unwrap();
            assert_eq!(record.points, Some(round.penalties[record.player_number]));
        }
    }

    fn mixed_players(num_players: usize, domino_size: i32, seed: u64) -> Vec<Box<dyn Strategy>> {
        let rng = GameRng::new(Some(seed));
        (0..num_players)
            .map(|seat| -> Box<dyn Strategy> {
                match seat % 3 {
                    0 => Box::new(GreedyStrategy),
                    1 => Box::new(RandomStrategy::new(rng.fork(seat as u64))),
                    _ => Box::new(ProbabilityStrategy::new(domino_size)),
                }
            })
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn rounds_terminate_with_connected_trains(
            seed in any::<u64>(),
            num_players in 2usize..=4,
            domino_size in 1i32..=12,
        ) {
            let mut players = mixed_players(num_players, domino_size, seed);
            let mut rng = GameRng::new(Some(seed));
            let outcome = play_round(&mut players, domino_size, domino_size, &mut rng, &mut NullObserver)
                .unwrap();

            for train in &outcome.trains {
                prop_assert!(train.is_connected(domino_size));
            }
            match outcome.end {
                RoundEnd::Domino(player) => prop_assert_eq!(outcome.penalties[player], 0),
                RoundEnd::Stalled => {}
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn default_games_run_to_completion(seed in any::<u64>(), four_players in any::<bool>()) {
            let config = if four_players {
                GameConfig {
                    num_players: 4,
                    strategies: vec![
                        StrategyKind::Greedy,
                        StrategyKind::Probability,
                        StrategyKind::Random,
                        StrategyKind::Greedy,
                    ],
                    ..GameConfig::default()
                }
            } else {
                GameConfig::default()
            };
            let result = run_game(&config, seed).unwrap();
            prop_assert_eq!(result.rounds.len(), 13);
            for round in &result.rounds {
                for train in &round.trains {
                    prop_assert!(train.is_connected(round.round_value));
                }
            }
        }
    }
}
