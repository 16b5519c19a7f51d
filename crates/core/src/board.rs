//! Board module - manages the game grid and tile identity
//!
//! The board is a `size × size` grid where each cell holds a tile or, briefly
//! during a cascade, nothing. Cells live in a flat row-major `Vec`
//! (`row * size + col`). Boards are values: operations that change layout
//! return a new board rather than mutating the caller's copy.

use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::rng::RandomSource;
use crate::types::{Cell, Pos, Tile, TileId, TileType, MIN_BOARD_SIZE, MIN_TILE_TYPES};

/// Monotonic tile id allocator.
///
/// Ids are never recycled, so a presentation layer can track a gem across
/// gravity and swaps by id alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSource {
    next: TileId,
}

impl IdSource {
    /// Start handing out ids at `start`.
    pub fn new(start: TileId) -> Self {
        Self { next: start }
    }

    /// Allocate the next id.
    pub fn next(&mut self) -> TileId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The id the next call to [`IdSource::next`] will return.
    pub fn peek(&self) -> TileId {
        self.next
    }

    /// Allocate a tile of the given type.
    pub fn tile(&mut self, kind: TileType) -> Tile {
        Tile::new(self.next(), kind)
    }
}

impl Default for IdSource {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Flat index of `(row, col)` on a board of edge `size`.
#[inline(always)]
pub fn idx(pos: Pos, size: usize) -> usize {
    pos.row * size + pos.col
}

/// Inverse of [`idx`].
#[inline(always)]
pub fn pos_from_idx(index: usize, size: usize) -> Pos {
    Pos::new(index / size, index % size)
}

/// Square match-3 board with flat cell storage
///
/// Deserializing runs the same checks as [`Board::from_cells`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BoardRepr")]
pub struct Board {
    size: usize,
    /// Flat array of cells, row-major order (row * size + col)
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
struct BoardRepr {
    size: usize,
    cells: Vec<Cell>,
}

impl TryFrom<BoardRepr> for Board {
    type Error = EngineError;

    fn try_from(repr: BoardRepr) -> Result<Self, Self::Error> {
        Board::from_cells(repr.size, repr.cells)
    }
}

impl Board {
    /// Create a board with every cell empty.
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Generate a fresh board with no pre-existing matches.
    ///
    /// Cells are filled row-major. A type is forbidden for a cell when the two
    /// cells to its left (or the two above it) already share that type; the
    /// cell draws uniformly from what remains. At most two types are ever
    /// forbidden, so `k >= 3` always leaves a candidate.
    pub fn generate<R: RandomSource>(
        k: u8,
        size: usize,
        ids: &mut IdSource,
        rng: &mut R,
    ) -> Result<Self, EngineError> {
        if k < MIN_TILE_TYPES {
            return Err(EngineError::TooFewTileTypes {
                k,
                min: MIN_TILE_TYPES,
            });
        }
        if size < MIN_BOARD_SIZE {
            return Err(EngineError::BoardTooSmall {
                size,
                min: MIN_BOARD_SIZE,
            });
        }

        let mut board = Self::empty(size);
        let mut allowed: Vec<TileType> = Vec::with_capacity(k as usize);

        for row in 0..size {
            for col in 0..size {
                let forbidden = board.forbidden_types(row, col);
                allowed.clear();
                allowed.extend((0..k).filter(|t| !forbidden.contains(t)));

                let kind = allowed[rng.next_index(allowed.len())];
                board.cells[row * size + col] = Some(ids.tile(kind));
            }
        }

        Ok(board)
    }

    /// Types that would complete a run of three ending at `(row, col)`.
    fn forbidden_types(&self, row: usize, col: usize) -> ArrayVec<TileType, 2> {
        let mut forbidden = ArrayVec::new();

        if col >= 2 {
            if let (Some(a), Some(b)) = (
                self.kind_at(Pos::new(row, col - 1)),
                self.kind_at(Pos::new(row, col - 2)),
            ) {
                if a == b {
                    forbidden.push(a);
                }
            }
        }

        if row >= 2 {
            if let (Some(a), Some(b)) = (
                self.kind_at(Pos::new(row - 1, col)),
                self.kind_at(Pos::new(row - 2, col)),
            ) {
                if a == b && !forbidden.contains(&a) {
                    forbidden.push(a);
                }
            }
        }

        forbidden
    }

    /// Build a fully occupied board from a row-major list of types, drawing ids from `ids`.
    pub fn from_types(
        size: usize,
        types: &[TileType],
        ids: &mut IdSource,
    ) -> Result<Self, EngineError> {
        let cells = types.iter().map(|&t| Some(ids.tile(t))).collect();
        Self::from_cells(size, cells)
    }

    /// Build a board from explicit cells. Tile ids must be unique.
    pub fn from_cells(size: usize, cells: Vec<Cell>) -> Result<Self, EngineError> {
        if size == 0 {
            return Err(EngineError::BoardTooSmall { size, min: 1 });
        }
        let expected = size * size;
        if cells.len() != expected {
            return Err(EngineError::CellCountMismatch {
                size,
                expected,
                actual: cells.len(),
            });
        }

        let mut seen: Vec<TileId> = cells.iter().flatten().map(|t| t.id).collect();
        seen.sort_unstable();
        if let Some(pair) = seen.windows(2).find(|w| w[0] == w[1]) {
            return Err(EngineError::DuplicateTileId(pair[0]));
        }

        Ok(Self { size, cells })
    }

    /// Board edge length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of cells (`size²`).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check if position is on the board
    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Flat index, or None if out of bounds
    pub fn index(&self, pos: Pos) -> Option<usize> {
        self.contains(pos).then(|| idx(pos, self.size))
    }

    /// Get cell at position. Returns None if out of bounds
    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Tile at position, None if empty or out of bounds
    pub fn tile(&self, pos: Pos) -> Option<Tile> {
        self.get(pos).flatten()
    }

    /// Type at position, None if empty or out of bounds
    pub fn kind_at(&self, pos: Pos) -> Option<TileType> {
        self.tile(pos).map(|t| t.kind)
    }

    /// Set cell at position. Returns false if out of bounds
    pub fn set(&mut self, pos: Pos, cell: Cell) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Swap two cells in place. Returns false if either is out of bounds
    pub fn swap(&mut self, a: Pos, b: Pos) -> bool {
        match (self.index(a), self.index(b)) {
            (Some(i), Some(j)) => {
                self.cells.swap(i, j);
                true
            }
            _ => false,
        }
    }

    /// Copy of this board with two cells swapped.
    pub fn swapped(&self, a: Pos, b: Pos) -> Self {
        let mut copy = self.clone();
        copy.swap(a, b);
        copy
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, pos: Pos) -> bool {
        matches!(self.get(pos), Some(Some(_)))
    }

    /// True when no cell is empty.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Count of tiles per type. The vector is long enough for the largest type present.
    pub fn type_counts(&self) -> Vec<u32> {
        let mut counts = Vec::new();
        for tile in self.cells.iter().flatten() {
            let t = tile.kind as usize;
            if t >= counts.len() {
                counts.resize(t + 1, 0);
            }
            counts[t] += 1;
        }
        counts
    }

    /// Types as a 2D grid, for tests and logging.
    pub fn to_type_rows(&self) -> Vec<Vec<Option<TileType>>> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().map(|c| c.map(|t| t.kind)).collect())
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.chunks(self.size).enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for (c, cell) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, " ")?;
                }
                match cell {
                    Some(tile) => write!(f, "{}", tile.kind)?,
                    None => write!(f, ".")?,
                }
            }
        }
        Ok(())
    }
}
