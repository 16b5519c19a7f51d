//! Turn resolution - the cascade loop
//!
//! A turn starts from a swapped board and runs clear → gravity → spawn →
//! score until the board has no matches left:
//!
//! ```text
//! Swapped ──► Matching ──(matches found)──► Matching
//!                │
//!                └──(no matches)──► Settled
//! ```
//!
//! [`Cascade`] exposes that loop one level at a time as an iterator;
//! [`apply_move`] and [`resolve_cascade`] drive it to completion.
//!
//! The resolver does not check that the initiating swap was legal. A swap that
//! produces no match settles immediately with no steps and no score; rejecting
//! it is the caller's job (or use [`try_apply_move`]).

use serde::{Deserialize, Serialize};

use crate::board::{Board, IdSource};
use crate::error::MoveError;
use crate::gravity::{apply_gravity, spawn_new_tiles, SpawnOrigins};
use crate::matching::{find_matches, Match};
use crate::rng::RandomSource;
use crate::scoring::{compute_turn_effect, score_cascade_level};
use crate::types::{Pos, TileType, TurnEffect};

/// One level of a cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeStep {
    /// 0 for the clear caused directly by the swap.
    pub level: u32,
    pub matches: Vec<Match>,
    pub after_clear: Board,
    pub after_gravity: Board,
    pub after_fill: Board,
    /// Spawned tile id → rows above the board it falls from.
    pub origins: SpawnOrigins,
    pub score: u32,
}

/// Everything one move did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    pub cascade_steps: Vec<CascadeStep>,
    pub total_score_gained: u32,
    pub effect: TurnEffect,
    /// Tiles cleared per type over the whole move.
    pub type_clears: Vec<u32>,
    /// Settled board (the swapped board itself when nothing matched).
    pub board: Board,
}

impl TurnResult {
    /// True when the swap produced at least one match.
    pub fn matched(&self) -> bool {
        !self.cascade_steps.is_empty()
    }

    /// Deepest cascade level reached, if any.
    pub fn max_level(&self) -> Option<u32> {
        self.cascade_steps.last().map(|s| s.level)
    }

    /// Total number of tiles cleared.
    pub fn tiles_cleared(&self) -> u32 {
        self.type_clears.iter().sum()
    }
}

/// Cascade state machine, yielding one [`CascadeStep`] per level.
///
/// Returns `None` once the board is settled; the settled board is then
/// available from [`Cascade::board`].
pub struct Cascade<'a, R: RandomSource> {
    current: Board,
    level: u32,
    k: u8,
    type_clears: Vec<u32>,
    settled: bool,
    ids: &'a mut IdSource,
    rng: &'a mut R,
}

impl<'a, R: RandomSource> Cascade<'a, R> {
    /// Start a cascade from a board that has already been swapped.
    ///
    /// Refills draw from `[0, k)`; a `k` below `MIN_TILE_TYPES` refills as
    /// `MIN_TILE_TYPES`.
    pub fn new(board: Board, k: u8, ids: &'a mut IdSource, rng: &'a mut R) -> Self {
        Self {
            current: board,
            level: 0,
            k,
            type_clears: vec![0; k as usize],
            settled: false,
            ids,
            rng,
        }
    }

    /// Board as of the last completed level.
    pub fn board(&self) -> &Board {
        &self.current
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Clears per type so far.
    pub fn type_clears(&self) -> &[u32] {
        &self.type_clears
    }

    fn count_clear(&mut self, kind: TileType) {
        let t = kind as usize;
        if t >= self.type_clears.len() {
            self.type_clears.resize(t + 1, 0);
        }
        self.type_clears[t] += 1;
    }

    /// Run to completion and package the result.
    ///
    /// Steps already taken through the iterator are not repeated in
    /// `cascade_steps`, but their clears still count in `type_clears`.
    pub fn finish(mut self) -> TurnResult {
        let cascade_steps: Vec<CascadeStep> = self.by_ref().collect();
        let total_score_gained = cascade_steps.iter().map(|s| s.score).sum();
        let effect = compute_turn_effect(&cascade_steps);
        TurnResult {
            cascade_steps,
            total_score_gained,
            effect,
            type_clears: self.type_clears,
            board: self.current,
        }
    }
}

impl<R: RandomSource> Iterator for Cascade<'_, R> {
    type Item = CascadeStep;

    fn next(&mut self) -> Option<CascadeStep> {
        if self.settled {
            return None;
        }

        let matches = find_matches(&self.current);
        if matches.is_empty() {
            self.settled = true;
            return None;
        }

        // Shared cells of merged shapes are cleared (and counted) once.
        let mut after_clear = self.current.clone();
        for pos in matches.iter().flat_map(|m| m.positions.iter().copied()) {
            if let Some(tile) = after_clear.tile(pos) {
                after_clear.set(pos, None);
                self.count_clear(tile.kind);
            }
        }

        let after_gravity = apply_gravity(&after_clear);
        let spawned = spawn_new_tiles(&after_gravity, self.k, self.ids, self.rng);
        let score = score_cascade_level(&matches, self.level);

        let step = CascadeStep {
            level: self.level,
            matches,
            after_clear,
            after_gravity,
            after_fill: spawned.board.clone(),
            origins: spawned.origins,
            score,
        };

        self.current = spawned.board;
        self.level += 1;
        Some(step)
    }
}

/// Resolve a board that may already contain matches.
pub fn resolve_cascade<R: RandomSource>(
    board: Board,
    k: u8,
    ids: &mut IdSource,
    rng: &mut R,
) -> TurnResult {
    Cascade::new(board, k, ids, rng).finish()
}

/// Swap `a` and `b`, then cascade until settled.
///
/// The swap is not validated: a non-matching or out-of-bounds swap returns no
/// cascade steps and zero score. A `k` below `MIN_TILE_TYPES` refills as
/// `MIN_TILE_TYPES`.
pub fn apply_move<R: RandomSource>(
    board: &Board,
    a: Pos,
    b: Pos,
    k: u8,
    ids: &mut IdSource,
    rng: &mut R,
) -> TurnResult {
    resolve_cascade(board.swapped(a, b), k, ids, rng)
}

/// Like [`apply_move`], but refuses swaps that are off-board, non-adjacent,
/// touch an empty cell, or produce no match.
pub fn try_apply_move<R: RandomSource>(
    board: &Board,
    a: Pos,
    b: Pos,
    k: u8,
    ids: &mut IdSource,
    rng: &mut R,
) -> Result<TurnResult, MoveError> {
    for p in [a, b] {
        match board.get(p) {
            None => return Err(MoveError::OutOfBounds(p)),
            Some(None) => return Err(MoveError::EmptyCell(p)),
            Some(Some(_)) => {}
        }
    }
    if !a.is_adjacent(b) {
        return Err(MoveError::NotAdjacent);
    }

    let result = apply_move(board, a, b, k, ids, rng);
    if !result.matched() {
        return Err(MoveError::NoMatch);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRng;
    use crate::types::MIN_TILE_TYPES;

    #[rustfmt::skip]
    const SCENARIO: [u8; 25] = [
        0, 0, 1, 0, 2,
        1, 2, 3, 1, 3,
        2, 3, 1, 2, 1,
        3, 1, 2, 3, 2,
        1, 2, 3, 1, 3,
    ];

    #[test]
    fn test_no_match_swap_is_empty() {
        let mut ids = IdSource::default();
        let mut rng = SeededRng::new(1);
        let board = Board::from_types(5, &SCENARIO, &mut ids).unwrap();
        let before = ids.peek();

        let result = apply_move(&board, Pos::new(4, 0), Pos::new(4, 1), 4, &mut ids, &mut rng);
        assert!(result.cascade_steps.is_empty());
        assert_eq!(result.total_score_gained, 0);
        assert_eq!(result.effect, TurnEffect::None);
        assert_eq!(result.tiles_cleared(), 0);
        assert_eq!(ids.peek(), before);
    }

    #[test]
    fn test_cascade_settles() {
        let mut ids = IdSource::default();
        let mut rng = SeededRng::new(42);
        let board = Board::from_types(5, &SCENARIO, &mut ids).unwrap();

        let result = apply_move(&board, Pos::new(0, 2), Pos::new(0, 3), 4, &mut ids, &mut rng);
        assert!(result.matched());
        assert!(result.type_clears[0] >= 3);
        assert_eq!(result.cascade_steps[0].level, 0);

        let last = result.cascade_steps.last().unwrap();
        assert!(find_matches(&last.after_fill).is_empty());
        assert_eq!(last.after_fill, result.board);

        let sum: u32 = result.cascade_steps.iter().map(|s| s.score).sum();
        assert_eq!(sum, result.total_score_gained);
    }

    #[test]
    fn test_steps_are_consistent_snapshots() {
        let mut ids = IdSource::default();
        let mut rng = SeededRng::new(7);
        let board = Board::from_types(5, &SCENARIO, &mut ids).unwrap();

        let result = apply_move(&board, Pos::new(0, 2), Pos::new(0, 3), 4, &mut ids, &mut rng);
        for (i, step) in result.cascade_steps.iter().enumerate() {
            assert_eq!(step.level as usize, i);
            let holes = step.after_clear.cells().iter().filter(|c| c.is_none()).count();
            assert_eq!(holes, step.origins.len());
            assert_eq!(apply_gravity(&step.after_clear), step.after_gravity);
            assert!(step.after_fill.is_full());
        }
        for pair in result.cascade_steps.windows(2) {
            assert!(!find_matches(&pair[0].after_fill).is_empty());
        }
    }

    #[test]
    fn test_cascade_iterator_stops_when_settled() {
        let mut ids = IdSource::default();
        let mut rng = SeededRng::new(3);
        let board = Board::from_types(5, &SCENARIO, &mut ids).unwrap();

        let mut cascade = Cascade::new(board.clone(), 4, &mut ids, &mut rng);
        assert!(cascade.next().is_none());
        assert!(cascade.is_settled());
        assert!(cascade.next().is_none());
        assert_eq!(cascade.board(), &board);
    }

    #[test]
    fn test_try_apply_move_rejections() {
        let mut ids = IdSource::default();
        let mut rng = SeededRng::new(1);
        let board = Board::from_types(5, &SCENARIO, &mut ids).unwrap();

        let err = try_apply_move(&board, Pos::new(0, 0), Pos::new(0, 5), 4, &mut ids, &mut rng);
        assert_eq!(err, Err(MoveError::OutOfBounds(Pos::new(0, 5))));

        let err = try_apply_move(&board, Pos::new(0, 0), Pos::new(1, 1), 4, &mut ids, &mut rng);
        assert_eq!(err, Err(MoveError::NotAdjacent));

        let err = try_apply_move(&board, Pos::new(4, 0), Pos::new(4, 1), 4, &mut ids, &mut rng);
        assert_eq!(err, Err(MoveError::NoMatch));
        assert_eq!(MoveError::NoMatch.code(), "no_match");

        assert!(try_apply_move(&board, Pos::new(0, 2), Pos::new(0, 3), 4, &mut ids, &mut rng).is_ok());
    }

    #[test]
    fn test_zero_k_refills_with_minimum_types() {
        let mut ids = IdSource::default();
        let board = Board::from_types(5, &SCENARIO, &mut ids).unwrap();
        let first_spawned = ids.peek();

        for seed in 0..20 {
            let mut ids = ids.clone();
            let mut rng = SeededRng::new(seed);
            let result = apply_move(&board, Pos::new(0, 2), Pos::new(0, 3), 0, &mut ids, &mut rng);

            assert!(result.board.is_full());
            assert!(find_matches(&result.board).is_empty());
            for tile in result.board.cells().iter().flatten() {
                if tile.id >= first_spawned {
                    assert!(tile.kind < MIN_TILE_TYPES);
                }
            }
        }
    }
}
