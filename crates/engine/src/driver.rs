//! Simulation driver
//!
//! Plays one game turn by turn under solver control. Each turn:
//!
//! 1. stop if the turn budget is spent
//! 2. enumerate valid moves; a dead board ends the game unless
//!    `reshuffle_dead_boards` is set
//! 3. ask the solver (awaited once per turn for async solvers)
//! 4. substitute the first valid move if the answer is not in the offered set
//! 5. resolve the move and update the state
//!
//! Board generation, spawns and reshuffles all draw from one [`SeededRng`]
//! seeded per game, so a deterministic solver reproduces the game exactly.

use log::{debug, info};

use crate::config::{ConfigError, SimConfig};
use crate::core::{get_all_valid_moves, reshuffle_if_dead, Board, IdSource, SeededRng};
use crate::record::{EndReason, GameReplay, GameSummary, MoveRecord};
use crate::solver::{AsyncSolver, Solver, SolverContext};
use crate::state::{advance_turn, GameState};
use crate::types::Move;

/// Check a solver answer against the offered moves (either orientation).
///
/// Returns the move to play and whether it had to be substituted. Callers
/// guarantee `valid` is non-empty.
pub fn resolve_solver_move(requested: Move, valid: &[Move]) -> (Move, bool) {
    match valid.iter().find(|m| m.same_pair(&requested)) {
        Some(_) => (requested, false),
        None => (valid.first().copied().unwrap_or(requested), true),
    }
}

/// A turn that is ready for a solver decision.
struct PendingTurn {
    context: SolverContext,
    reshuffled: Option<Board>,
}

/// One game in progress.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    seed: u32,
    state: GameState,
    initial_board: Board,
    ids: IdSource,
    rng: SeededRng,
    end: Option<EndReason>,
    reshuffles: u32,
    substitutions: u32,
    record: bool,
    moves: Vec<MoveRecord>,
}

impl Simulation {
    /// Deal the opening board for `seed`.
    pub fn new(config: SimConfig, seed: u32) -> Result<Self, ConfigError> {
        let mut ids = IdSource::default();
        let mut rng = SeededRng::new(seed);
        let state = GameState::new(&config, &mut ids, &mut rng)?;
        debug!(
            "game {} dealt: {}x{} board, K={}, {} turns",
            seed, config.board_size, config.board_size, config.start_k, config.start_turns
        );

        Ok(Self {
            initial_board: state.board.clone(),
            config,
            seed,
            state,
            ids,
            rng,
            end: None,
            reshuffles: 0,
            substitutions: 0,
            record: false,
            moves: Vec::new(),
        })
    }

    /// Keep a [`MoveRecord`] for every turn (needed by [`Simulation::into_replay`]).
    pub fn recording(mut self) -> Self {
        self.record = true;
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn is_over(&self) -> bool {
        self.end.is_some()
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end
    }

    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    /// Play one turn. Returns `None` once the game has ended.
    pub fn step<S: Solver + ?Sized>(&mut self, solver: &mut S) -> Option<MoveRecord> {
        let pending = self.prepare()?;
        let requested = solver.choose_move(&pending.context);
        Some(self.commit(pending, requested))
    }

    /// [`Simulation::step`] for async solvers.
    pub async fn step_async<S: AsyncSolver>(&mut self, solver: &mut S) -> Option<MoveRecord> {
        let pending = self.prepare()?;
        let requested = solver.choose_move(&pending.context).await;
        Some(self.commit(pending, requested))
    }

    /// Play until the game ends.
    pub fn run<S: Solver + ?Sized>(&mut self, solver: &mut S) -> EndReason {
        while self.step(solver).is_some() {}
        self.finished_reason()
    }

    pub async fn run_async<S: AsyncSolver>(&mut self, solver: &mut S) -> EndReason {
        while self.step_async(solver).await.is_some() {}
        self.finished_reason()
    }

    /// Totals so far. `end_reason` stays `None` until the game has ended.
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            seed: self.seed,
            final_score: self.state.score,
            turns_played: self.state.turns_played,
            max_k: self.state.max_k,
            final_k: self.state.k,
            collection_events: self.state.collection_events,
            turns_left: self.state.turns_left,
            end_reason: self.end,
            reshuffles: self.reshuffles,
            substitutions: self.substitutions,
        }
    }

    pub fn into_replay(self) -> GameReplay {
        let summary = self.summary();
        GameReplay {
            seed: self.seed,
            config: self.config,
            initial_board: self.initial_board,
            moves: self.moves,
            summary,
        }
    }

    // `step` only returns `None` after `finish`, so the fallback is not reached.
    fn finished_reason(&self) -> EndReason {
        self.end.unwrap_or(if self.state.out_of_turns() {
            EndReason::OutOfTurns
        } else {
            EndReason::DeadBoard
        })
    }

    fn finish(&mut self, reason: EndReason) {
        info!(
            "game {} over ({}): score {} in {} turns, max K {}",
            self.seed,
            reason.as_str(),
            self.state.score,
            self.state.turns_played,
            self.state.max_k
        );
        self.end = Some(reason);
    }

    /// Check end conditions and build the solver context.
    fn prepare(&mut self) -> Option<PendingTurn> {
        if self.end.is_some() {
            return None;
        }
        if self.state.out_of_turns() {
            self.finish(EndReason::OutOfTurns);
            return None;
        }

        let mut valid_moves = get_all_valid_moves(&self.state.board);
        let mut reshuffled = None;

        if valid_moves.is_empty() {
            if !self.config.reshuffle_dead_boards {
                self.finish(EndReason::DeadBoard);
                return None;
            }

            let outcome = reshuffle_if_dead(&self.state.board, &mut self.ids, &mut self.rng);
            if !outcome.is_playable() {
                self.finish(EndReason::DeadBoard);
                return None;
            }
            self.reshuffles += 1;
            debug!(
                "game {} reshuffled before turn {} ({} attempt(s))",
                self.seed,
                self.state.turns_played + 1,
                outcome.attempts
            );
            self.state.board = outcome.board;
            valid_moves = get_all_valid_moves(&self.state.board);
            if valid_moves.is_empty() {
                self.finish(EndReason::DeadBoard);
                return None;
            }
            reshuffled = Some(self.state.board.clone());
        }

        let context = SolverContext {
            board: self.state.board.clone(),
            k: self.state.k,
            board_size: self.config.board_size,
            turns_left: self.state.turns_left,
            start_turns: self.config.start_turns,
            score: self.state.score,
            collection_counters: self.state.collection_counters.clone(),
            collection_threshold: self.config.collection_threshold,
            valid_moves,
        };
        Some(PendingTurn {
            context,
            reshuffled,
        })
    }

    /// Validate the solver's answer and play it.
    fn commit(&mut self, pending: PendingTurn, requested: Move) -> MoveRecord {
        let (applied, substituted) =
            resolve_solver_move(requested, &pending.context.valid_moves);
        if substituted {
            self.substitutions += 1;
            debug!(
                "game {} turn {}: solver move {:?} not valid, playing {:?}",
                self.seed,
                self.state.turns_played + 1,
                requested,
                applied
            );
        }

        let result = advance_turn(
            &mut self.state,
            applied,
            &self.config,
            &mut self.ids,
            &mut self.rng,
        );
        debug!(
            "game {} turn {}: +{} ({} level(s), {})",
            self.seed,
            self.state.turns_played,
            result.total_score_gained,
            result.cascade_steps.len(),
            result.effect.as_str()
        );

        let record = MoveRecord {
            turn: self.state.turns_played,
            requested,
            applied,
            substituted,
            reshuffled: pending.reshuffled,
            result,
            turns_left: self.state.turns_left,
            score: self.state.score,
            k: self.state.k,
        };
        if self.record {
            self.moves.push(record.clone());
        }
        record
    }
}

/// Play one game and keep only the summary.
pub fn simulate_game_summary<S: Solver>(
    config: &SimConfig,
    seed: u32,
    mut solver: S,
) -> Result<GameSummary, ConfigError> {
    let mut sim = Simulation::new(config.clone(), seed)?;
    sim.run(&mut solver);
    Ok(sim.summary())
}

/// Play one game and keep every move's cascade.
pub fn simulate_game_replay<S: Solver>(
    config: &SimConfig,
    seed: u32,
    mut solver: S,
) -> Result<GameReplay, ConfigError> {
    let mut sim = Simulation::new(config.clone(), seed)?.recording();
    sim.run(&mut solver);
    Ok(sim.into_replay())
}

pub async fn simulate_game_summary_async<S: AsyncSolver>(
    config: &SimConfig,
    seed: u32,
    mut solver: S,
) -> Result<GameSummary, ConfigError> {
    let mut sim = Simulation::new(config.clone(), seed)?;
    sim.run_async(&mut solver).await;
    Ok(sim.summary())
}

pub async fn simulate_game_replay_async<S: AsyncSolver>(
    config: &SimConfig,
    seed: u32,
    mut solver: S,
) -> Result<GameReplay, ConfigError> {
    let mut sim = Simulation::new(config.clone(), seed)?.recording();
    sim.run_async(&mut solver).await;
    Ok(sim.into_replay())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::has_valid_move;
    use crate::solver::{Blocking, FirstMoveSolver};
    use crate::types::Pos;

    fn small() -> SimConfig {
        SimConfig {
            board_size: 6,
            start_k: 4,
            max_k: 6,
            start_turns: 8,
            collection_threshold: 12,
            reshuffle_dead_boards: false,
        }
    }

    #[test]
    fn test_resolve_solver_move_accepts_either_orientation() {
        let valid = [
            Move::new(Pos::new(0, 0), Pos::new(0, 1)),
            Move::new(Pos::new(2, 2), Pos::new(3, 2)),
        ];
        assert_eq!(resolve_solver_move(valid[1], &valid), (valid[1], false));
        let flipped = valid[1].reversed();
        assert_eq!(resolve_solver_move(flipped, &valid), (flipped, false));

        let bogus = Move::new(Pos::new(5, 5), Pos::new(5, 4));
        assert_eq!(resolve_solver_move(bogus, &valid), (valid[0], true));
    }

    #[test]
    fn test_game_ends_and_stops_stepping() {
        let mut sim = Simulation::new(small(), 3).unwrap();
        let reason = sim.run(&mut FirstMoveSolver);
        assert!(sim.is_over());
        assert_eq!(sim.end_reason(), Some(reason));
        assert!(sim.step(&mut FirstMoveSolver).is_none());
        if reason == EndReason::OutOfTurns {
            assert!(sim.state().turns_left <= 0);
        }
    }

    #[test]
    fn test_bad_solver_is_substituted() {
        let mut sim = (1..50)
            .map(|seed| Simulation::new(small(), seed).unwrap())
            .find(|sim| has_valid_move(sim.board()))
            .unwrap();
        let mut bogus = |_: &SolverContext| Move::new(Pos::new(0, 0), Pos::new(5, 5));
        let record = sim.step(&mut bogus).unwrap();
        assert!(record.substituted);
        assert!(record.result.matched());
        assert_eq!(sim.summary().substitutions, 1);
    }

    #[test]
    fn test_replay_matches_summary() {
        let replay = simulate_game_replay(&small(), 21, FirstMoveSolver).unwrap();
        let summary = simulate_game_summary(&small(), 21, FirstMoveSolver).unwrap();
        assert_eq!(replay.summary, summary);
        assert_eq!(replay.moves.len() as u32, summary.turns_played);
        assert_eq!(replay.replayed_score(), summary.final_score);
    }

    #[test]
    fn test_summary_has_no_end_reason_while_live() {
        let mut sim = (1..50)
            .map(|seed| Simulation::new(small(), seed).unwrap())
            .find(|sim| has_valid_move(sim.board()))
            .unwrap();
        assert_eq!(sim.summary().end_reason, None);
        sim.step(&mut FirstMoveSolver).unwrap();
        assert_eq!(sim.summary().end_reason, None);

        let reason = sim.run(&mut FirstMoveSolver);
        assert_eq!(sim.summary().end_reason, Some(reason));
        assert_eq!(sim.into_replay().summary.end_reason, Some(reason));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SimConfig {
            board_size: 2,
            ..small()
        };
        assert!(matches!(
            Simulation::new(config, 1),
            Err(ConfigError::BoardTooSmall { .. })
        ));
    }

    #[tokio::test]
    async fn test_async_twin_agrees_with_sync() {
        let sync = simulate_game_summary(&small(), 5, FirstMoveSolver).unwrap();
        let asynced = simulate_game_summary_async(&small(), 5, Blocking(FirstMoveSolver))
            .await
            .unwrap();
        assert_eq!(sync, asynced);
    }
}
