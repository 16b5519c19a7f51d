//! Game state module - everything the driver carries between turns
//!
//! A turn goes through the turn resolver, then updates score, collection
//! progress and K, and finally applies the turn effect to the turn budget.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SimConfig};
use crate::core::{apply_move, Board, IdSource, RandomSource, TurnResult};
use crate::types::Move;

/// Mutable state of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    /// Tile types currently spawning.
    pub k: u8,
    pub turns_left: i32,
    pub score: u32,
    /// Clears per type not yet converted into a collection event.
    pub collection_counters: Vec<u32>,
    pub collection_events: u32,
    /// Highest K reached so far.
    pub max_k: u8,
    pub turns_played: u32,
}

impl GameState {
    /// Validate `config` and deal a fresh, match-free board.
    pub fn new<R: RandomSource>(
        config: &SimConfig,
        ids: &mut IdSource,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::generate(config.start_k, config.board_size, ids, rng)?;

        Ok(Self {
            board,
            k: config.start_k,
            turns_left: config.start_turns as i32,
            score: 0,
            collection_counters: vec![0; config.start_k as usize],
            collection_events: 0,
            max_k: config.start_k,
            turns_played: 0,
        })
    }

    /// True when the turn budget is spent.
    pub fn out_of_turns(&self) -> bool {
        self.turns_left <= 0
    }

    /// Fold one move's clears into the collection counters.
    ///
    /// Each time a counter reaches the threshold it is reduced by the
    /// threshold, a collection event is recorded, and K grows by one until
    /// `max_k`.
    fn collect(&mut self, type_clears: &[u32], config: &SimConfig) {
        for (t, &cleared) in type_clears.iter().enumerate() {
            if cleared == 0 {
                continue;
            }
            if t >= self.collection_counters.len() {
                self.collection_counters.resize(t + 1, 0);
            }
            self.collection_counters[t] += cleared;

            while self.collection_counters[t] >= config.collection_threshold {
                self.collection_counters[t] -= config.collection_threshold;
                self.collection_events += 1;
                if self.k < config.max_k {
                    self.k += 1;
                    self.max_k = self.max_k.max(self.k);
                    if self.collection_counters.len() < self.k as usize {
                        self.collection_counters.resize(self.k as usize, 0);
                    }
                }
            }
        }
    }
}

/// Play `mv` and update the state.
///
/// The move is not validated here; the driver only passes moves taken from
/// the valid set.
pub fn advance_turn<R: RandomSource>(
    state: &mut GameState,
    mv: Move,
    config: &SimConfig,
    ids: &mut IdSource,
    rng: &mut R,
) -> TurnResult {
    let result = apply_move(&state.board, mv.a, mv.b, state.k, ids, rng);

    state.board = result.board.clone();
    state.score += result.total_score_gained;
    state.turns_played += 1;
    state.collect(&result.type_clears, config);
    state.turns_left += result.effect.turn_delta();

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SeededRng;
    use crate::types::Pos;

    fn small_config() -> SimConfig {
        SimConfig {
            board_size: 5,
            start_k: 4,
            max_k: 5,
            start_turns: 3,
            collection_threshold: 3,
            reshuffle_dead_boards: false,
        }
    }

    #[rustfmt::skip]
    const SCENARIO: [u8; 25] = [
        0, 0, 1, 0, 2,
        1, 2, 3, 1, 3,
        2, 3, 1, 2, 1,
        3, 1, 2, 3, 2,
        1, 2, 3, 1, 3,
    ];

    fn scenario_state(ids: &mut IdSource) -> GameState {
        let config = small_config();
        GameState {
            board: Board::from_types(5, &SCENARIO, ids).unwrap(),
            k: config.start_k,
            turns_left: config.start_turns as i32,
            score: 0,
            collection_counters: vec![0; 4],
            collection_events: 0,
            max_k: config.start_k,
            turns_played: 0,
        }
    }

    #[test]
    fn test_new_state_from_config() {
        let mut ids = IdSource::default();
        let mut rng = SeededRng::new(1);
        let state = GameState::new(&small_config(), &mut ids, &mut rng).unwrap();
        assert_eq!(state.board.size(), 5);
        assert_eq!(state.turns_left, 3);
        assert_eq!(state.collection_counters, vec![0; 4]);
        assert!(!state.out_of_turns());
    }

    #[test]
    fn test_new_state_rejects_bad_config() {
        let mut ids = IdSource::default();
        let mut rng = SeededRng::new(1);
        let config = SimConfig {
            start_k: 2,
            ..small_config()
        };
        assert!(GameState::new(&config, &mut ids, &mut rng).is_err());
    }

    #[test]
    fn test_advance_turn_updates_counters() {
        let mut ids = IdSource::default();
        let mut rng = SeededRng::new(42);
        let mut state = scenario_state(&mut ids);
        let config = small_config();

        let mv = Move::new(Pos::new(0, 2), Pos::new(0, 3));
        let result = advance_turn(&mut state, mv, &config, &mut ids, &mut rng);

        assert_eq!(state.turns_played, 1);
        assert_eq!(state.score, result.total_score_gained);
        assert_eq!(state.board, result.board);
        let expected_turns = 3 + result.effect.turn_delta();
        assert_eq!(state.turns_left, expected_turns);
        // At least three type-0 clears with a threshold of 3 is one event.
        assert!(state.collection_events >= 1);
        assert_eq!(state.k, 5);
        assert_eq!(state.max_k, 5);
        assert_eq!(state.collection_counters.len(), 5);
    }

    #[test]
    fn test_collect_caps_k() {
        let mut ids = IdSource::default();
        let mut state = scenario_state(&mut ids);
        let config = small_config();

        state.collect(&[9, 0, 0, 0], &config);
        assert_eq!(state.collection_events, 3);
        assert_eq!(state.k, 5);
        assert_eq!(state.collection_counters[0], 0);
    }
}
