//! Solver protocol
//!
//! A solver receives a read-only [`SolverContext`] and returns one of the
//! offered moves. The driver checks the answer against the offered set and
//! silently substitutes the first valid move if it is not there, so scripted,
//! random or learned policies can all be plugged in without trusting them.
//!
//! [`Solver`] answers synchronously. [`AsyncSolver`] returns a future, for
//! policies that wait on out-of-process inference; see
//! [`crate::remote::ChannelSolver`].

use std::future::{ready, Future};

use serde::{Deserialize, Serialize};

use crate::core::scoring::{effect_for_len, score_cascade_level};
use crate::core::{find_matches, Board, RandomSource, SeededRng};
use crate::types::{Move, Pos, TurnEffect};

/// What a solver sees before choosing a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverContext {
    pub board: Board,
    pub k: u8,
    pub board_size: usize,
    pub turns_left: i32,
    pub start_turns: u32,
    pub score: u32,
    pub collection_counters: Vec<u32>,
    pub collection_threshold: u32,
    /// Never empty when handed out by the driver.
    pub valid_moves: Vec<Move>,
}

impl SolverContext {
    /// First offered move, or a no-op swap on an empty offer.
    pub fn fallback_move(&self) -> Move {
        self.valid_moves
            .first()
            .copied()
            .unwrap_or_else(|| Move::new(Pos::new(0, 0), Pos::new(0, 0)))
    }
}

/// Synchronous move policy.
pub trait Solver {
    fn choose_move(&mut self, ctx: &SolverContext) -> Move;
}

impl<F> Solver for F
where
    F: FnMut(&SolverContext) -> Move,
{
    fn choose_move(&mut self, ctx: &SolverContext) -> Move {
        self(ctx)
    }
}

/// Move policy that may suspend while deciding.
///
/// The driver awaits exactly one call per turn.
pub trait AsyncSolver {
    fn choose_move(&mut self, ctx: &SolverContext) -> impl Future<Output = Move> + Send;
}

/// Runs a synchronous solver through the async driver.
#[derive(Debug, Clone, Default)]
pub struct Blocking<S>(pub S);

impl<S: Solver> AsyncSolver for Blocking<S> {
    fn choose_move(&mut self, ctx: &SolverContext) -> impl Future<Output = Move> + Send {
        ready(self.0.choose_move(ctx))
    }
}

/// Always plays the first offered move.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstMoveSolver;

impl Solver for FirstMoveSolver {
    fn choose_move(&mut self, ctx: &SolverContext) -> Move {
        ctx.fallback_move()
    }
}

/// Picks uniformly among the offered moves with its own seeded generator.
#[derive(Debug, Clone)]
pub struct RandomSolver {
    rng: SeededRng,
}

impl RandomSolver {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SeededRng::new(seed),
        }
    }
}

impl Solver for RandomSolver {
    fn choose_move(&mut self, ctx: &SolverContext) -> Move {
        if ctx.valid_moves.is_empty() {
            return ctx.fallback_move();
        }
        ctx.valid_moves[self.rng.next_index(ctx.valid_moves.len())]
    }
}

/// One-ply lookahead: rank moves by the turn effect and score of the
/// immediate clear. Cascades are not simulated, so no randomness is consumed.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySolver;

impl GreedySolver {
    /// `(effect, level-0 score)` of a swap; the earliest move wins ties.
    pub fn evaluate(board: &Board, mv: Move) -> (TurnEffect, u32) {
        let matches = find_matches(&board.swapped(mv.a, mv.b));
        let longest = matches.iter().map(|m| m.len()).max().unwrap_or(0);
        (effect_for_len(longest), score_cascade_level(&matches, 0))
    }
}

impl Solver for GreedySolver {
    fn choose_move(&mut self, ctx: &SolverContext) -> Move {
        let mut best: Option<(Move, (TurnEffect, u32))> = None;
        for &mv in &ctx.valid_moves {
            let value = Self::evaluate(&ctx.board, mv);
            if best.map_or(true, |(_, v)| value > v) {
                best = Some((mv, value));
            }
        }
        best.map(|(mv, _)| mv).unwrap_or_else(|| ctx.fallback_move())
    }
}

/// Built-in policy selected by name, as used by the batch binary.
#[derive(Debug, Clone)]
pub enum NamedSolver {
    First(FirstMoveSolver),
    Random(RandomSolver),
    Greedy(GreedySolver),
}

impl NamedSolver {
    /// Parse a solver name (case-insensitive). `seed` feeds the random policy.
    pub fn from_name(name: &str, seed: u32) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "first" => Some(Self::First(FirstMoveSolver)),
            "random" => Some(Self::Random(RandomSolver::new(seed))),
            "greedy" => Some(Self::Greedy(GreedySolver)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::First(_) => "first",
            Self::Random(_) => "random",
            Self::Greedy(_) => "greedy",
        }
    }
}

impl Solver for NamedSolver {
    fn choose_move(&mut self, ctx: &SolverContext) -> Move {
        match self {
            Self::First(s) => s.choose_move(ctx),
            Self::Random(s) => s.choose_move(ctx),
            Self::Greedy(s) => s.choose_move(ctx),
        }
    }
}
