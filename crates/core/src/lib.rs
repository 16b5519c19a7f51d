//! Core match-3 logic - pure, deterministic, and testable
//!
//! This crate contains the board model and every rule of a turn. It has no
//! UI, I/O or global state, which makes it:
//!
//! - **Deterministic**: randomness is injected, so the same seed reproduces the same game
//! - **Testable**: every rule is a value-in/value-out function
//! - **Portable**: runs headless for solvers and batch experiments
//!
//! # Module Structure
//!
//! - [`board`]: square grid, tile identity allocation, match-free generation
//! - [`matching`]: run detection, shape merging, move validation
//! - [`gravity`]: column compaction and refill with spawn origins
//! - [`scoring`]: match value curve, cascade bonus, turn effect
//! - [`turn`]: the cascade loop that resolves one move
//! - [`reshuffle`]: dead-board detection and bounded reshuffle
//! - [`rng`]: the random-source capability and a seeded LCG
//!
//! # Example
//!
//! ```
//! use match3_core::{apply_move, find_matches, Board, IdSource, SeededRng};
//! use match3_core::types::Pos;
//!
//! let mut ids = IdSource::default();
//! let mut rng = SeededRng::new(12345);
//!
//! #[rustfmt::skip]
//! let board = Board::from_types(5, &[
//!     0, 0, 1, 0, 2,
//!     1, 2, 3, 1, 3,
//!     2, 3, 1, 2, 1,
//!     3, 1, 2, 3, 2,
//!     1, 2, 3, 1, 3,
//! ], &mut ids).unwrap();
//!
//! let result = apply_move(&board, Pos::new(0, 2), Pos::new(0, 3), 4, &mut ids, &mut rng);
//! assert!(result.total_score_gained >= 3);
//! assert!(find_matches(&result.board).is_empty());
//! ```

pub mod board;
pub mod error;
pub mod gravity;
pub mod matching;
pub mod reshuffle;
pub mod rng;
pub mod scoring;
pub mod turn;

pub use match3_types as types;

// Re-export commonly used types for convenience
pub use board::{idx, pos_from_idx, Board, IdSource};
pub use error::{EngineError, MoveError};
pub use gravity::{apply_gravity, spawn_new_tiles, SpawnOrigin, SpawnOrigins, Spawned};
pub use matching::{
    find_matches, get_all_valid_moves, has_valid_move, is_adjacent, is_valid_move, Match,
};
pub use reshuffle::{reshuffle_if_dead, Reshuffle};
pub use rng::{seeded_rng, CycleRng, RandomSource, SeededRng};
pub use scoring::{compute_turn_effect, score_cascade_level, score_match};
pub use turn::{apply_move, resolve_cascade, try_apply_move, Cascade, CascadeStep, TurnResult};
