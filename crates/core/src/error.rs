//! Error types for the hard preconditions of the engine.
//!
//! Gameplay outcomes (no match, dead board, failed reshuffle) are ordinary
//! return values. Only malformed inputs end up here.

use thiserror::Error;

use crate::types::Pos;

/// Rejected board construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("need at least {min} tile types for a match-free board, got {k}")]
    TooFewTileTypes { k: u8, min: u8 },

    #[error("board size must be at least {min}, got {size}")]
    BoardTooSmall { size: usize, min: usize },

    #[error("a {size}x{size} board needs {expected} cells, got {actual}")]
    CellCountMismatch {
        size: usize,
        expected: usize,
        actual: usize,
    },

    #[error("tile id {0} appears more than once")]
    DuplicateTileId(u64),
}

/// Why a checked move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("position ({}, {}) is off the board", .0.row, .0.col)]
    OutOfBounds(Pos),

    #[error("cells are not adjacent")]
    NotAdjacent,

    #[error("position ({}, {}) is empty", .0.row, .0.col)]
    EmptyCell(Pos),

    #[error("swap does not produce a match")]
    NoMatch,
}

impl MoveError {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            MoveError::OutOfBounds(_) | MoveError::EmptyCell(_) => "invalid_cell",
            MoveError::NotAdjacent => "not_adjacent",
            MoveError::NoMatch => "no_match",
        }
    }
}
