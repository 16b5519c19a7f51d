//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental values passed between the match-3 engine,
//! the simulation driver and any solver. All types are plain data with serde
//! derives, so they can be dropped straight into a summary or replay record.
//!
//! # Board Geometry
//!
//! A board is a square grid of `size × size` cells stored row-major:
//!
//! - **Rows** are indexed top to bottom, `0..size`
//! - **Columns** are indexed left to right, `0..size`
//! - Flat index is `row * size + col`
//! - Gravity pulls tiles toward the highest row index
//!
//! # Engine Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_TILE_TYPES` | 3 | Smallest K that guarantees a match-free initial board |
//! | `MIN_BOARD_SIZE` | 3 | Smallest board that can hold a run |
//! | `MIN_MATCH_LEN` | 3 | Shortest run that counts as a match |
//! | `MAX_RESHUFFLE_ATTEMPTS` | 100 | Shuffle attempts before giving up on a dead board |
//! | `MAX_LENGTH_BONUS` | 2 | Cap on the `N - 3` bonus for long matches |
//! | `CASCADE_LEVEL_BONUS` | 3 | Points added per match for each cascade level |
//!
//! # Examples
//!
//! ```
//! use match3_types::{Move, Pos, TurnEffect};
//!
//! let a = Pos::new(0, 2);
//! let b = Pos::new(0, 3);
//! assert!(a.is_adjacent(b));
//!
//! // Moves are unordered pairs
//! assert!(Move::new(a, b).same_pair(&Move::new(b, a)));
//!
//! assert_eq!(TurnEffect::from_str("refund"), Some(TurnEffect::Refund));
//! ```

use serde::{Deserialize, Serialize};

/// Smallest number of tile types for which board generation is match-free.
pub const MIN_TILE_TYPES: u8 = 3;

/// Smallest supported board edge.
pub const MIN_BOARD_SIZE: usize = 3;

/// Shortest same-type run that counts as a match.
pub const MIN_MATCH_LEN: usize = 3;

/// Cap on the per-match length bonus (`N - 3`).
pub const MAX_LENGTH_BONUS: usize = 2;

/// Match length that refunds the turn.
pub const REFUND_MATCH_LEN: usize = 4;

/// Match length that grants an extra turn.
pub const EXTRA_TURN_MATCH_LEN: usize = 5;

/// Points added to every match per cascade level (level 0 adds nothing).
pub const CASCADE_LEVEL_BONUS: u32 = 3;

/// Maximum number of shuffles tried when a board is dead.
pub const MAX_RESHUFFLE_ATTEMPTS: u32 = 100;

/// Stable, never-reused tile identity.
pub type TileId = u64;

/// Opaque tile type in `[0, K)`.
pub type TileType = u8;

/// One gem on the board.
///
/// The id survives gravity and swaps; only spawning and reshuffling hand out
/// new ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    #[serde(rename = "type")]
    pub kind: TileType,
}

impl Tile {
    pub fn new(id: TileId, kind: TileType) -> Self {
        Self { id, kind }
    }
}

/// A cell on the board
///
/// - `None`: transient hole (only between clear and refill inside a cascade)
/// - `Some(Tile)`: occupied cell
pub type Cell = Option<Tile>;

/// Grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two positions.
    pub fn distance(self, other: Pos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// True iff the positions share an edge.
    ///
    /// # Examples
    ///
    /// ```
    /// use match3_types::Pos;
    ///
    /// assert!(Pos::new(1, 1).is_adjacent(Pos::new(2, 1)));
    /// assert!(!Pos::new(1, 1).is_adjacent(Pos::new(2, 2)));
    /// assert!(!Pos::new(1, 1).is_adjacent(Pos::new(1, 1)));
    /// ```
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.distance(other) == 1
    }
}

/// A swap of two cells. Orientation carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub a: Pos,
    pub b: Pos,
}

impl Move {
    pub fn new(a: Pos, b: Pos) -> Self {
        Self { a, b }
    }

    /// The same swap with the endpoints exchanged.
    pub fn reversed(self) -> Self {
        Self {
            a: self.b,
            b: self.a,
        }
    }

    /// True when both moves swap the same two cells, in either orientation.
    pub fn same_pair(&self, other: &Move) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }
}

/// Direction of an unmerged straight run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Row,
    Col,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Col => "col",
        }
    }
}

/// How a move changes the player's turn budget.
///
/// - **None**: the turn is consumed
/// - **Refund**: the turn is not consumed (best match was exactly 4)
/// - **Extra**: an additional turn is granted (best match was 5 or more)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnEffect {
    #[default]
    None,
    Refund,
    Extra,
}

impl TurnEffect {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(TurnEffect::None),
            "refund" => Some(TurnEffect::Refund),
            "extra" => Some(TurnEffect::Extra),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TurnEffect::None => "none",
            TurnEffect::Refund => "refund",
            TurnEffect::Extra => "extra",
        }
    }

    /// Change applied to the remaining turn count.
    pub fn turn_delta(&self) -> i32 {
        match self {
            TurnEffect::None => -1,
            TurnEffect::Refund => 0,
            TurnEffect::Extra => 1,
        }
    }
}
