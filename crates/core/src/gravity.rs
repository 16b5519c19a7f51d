//! Gravity and refill
//!
//! After a clear, surviving tiles fall to the bottom of their column and the
//! holes left at the top are refilled with fresh tiles.

use serde::{Deserialize, Serialize};

use crate::board::{Board, IdSource};
use crate::rng::RandomSource;
use crate::types::{Pos, TileId, MIN_TILE_TYPES};

/// Compact each column downward, keeping relative order and tile ids.
///
/// Empty cells end up contiguous at the top of each column. Idempotent.
pub fn apply_gravity(board: &Board) -> Board {
    let size = board.size();
    let mut out = Board::empty(size);

    for col in 0..size {
        let mut write = size;
        for row in (0..size).rev() {
            if let Some(tile) = board.tile(Pos::new(row, col)) {
                write -= 1;
                out.set(Pos::new(write, col), Some(tile));
            }
        }
    }

    out
}

/// Where a spawned tile conceptually fell from.
///
/// `offset` is negative: `-n` means the tile starts `n` rows above its final
/// row. Only a presentation layer cares about this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnOrigin {
    pub id: TileId,
    pub offset: i32,
}

/// Ordered association list of spawned tile id → origin offset.
///
/// Serializes as a plain array of `{id, offset}` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpawnOrigins(Vec<SpawnOrigin>);

impl SpawnOrigins {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, id: TileId, offset: i32) {
        self.0.push(SpawnOrigin { id, offset });
    }

    /// Offset for a spawned tile, if it was spawned in this step.
    pub fn get(&self, id: TileId) -> Option<i32> {
        self.0.iter().find(|o| o.id == id).map(|o| o.offset)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpawnOrigin> {
        self.0.iter()
    }
}

/// Board after refill plus the origin of every new tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spawned {
    pub board: Board,
    pub origins: SpawnOrigins,
}

/// Replace each column's leading run of empty cells with new tiles.
///
/// Types are uniform in `[0, k)`; a `k` below [`MIN_TILE_TYPES`] is raised to
/// it. Columns are filled left to right, top to bottom within a column, which
/// fixes the order of `rng` draws.
pub fn spawn_new_tiles<R: RandomSource>(
    board: &Board,
    k: u8,
    ids: &mut IdSource,
    rng: &mut R,
) -> Spawned {
    let k = k.max(MIN_TILE_TYPES);
    let size = board.size();
    let mut out = board.clone();
    let mut origins = SpawnOrigins::new();

    for col in 0..size {
        let holes = (0..size)
            .take_while(|&row| !board.is_occupied(Pos::new(row, col)))
            .count();

        for row in 0..holes {
            let kind = rng.next_index(k as usize) as u8;
            let tile = ids.tile(kind);
            out.set(Pos::new(row, col), Some(tile));
            origins.push(tile.id, row as i32 - holes as i32);
        }
    }

    Spawned {
        board: out,
        origins,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{CycleRng, SeededRng};
    use crate::types::Tile;

    fn column_board() -> Board {
        // 3x3, column 0 = [A, ., B], column 1 = [., ., C], column 2 full.
        let mut cells = vec![None; 9];
        cells[0] = Some(Tile::new(1, 0));
        cells[6] = Some(Tile::new(2, 1));
        cells[7] = Some(Tile::new(3, 2));
        cells[2] = Some(Tile::new(4, 0));
        cells[5] = Some(Tile::new(5, 1));
        cells[8] = Some(Tile::new(6, 2));
        Board::from_cells(3, cells).unwrap()
    }

    #[test]
    fn test_gravity_compacts_and_keeps_order() {
        let settled = apply_gravity(&column_board());

        assert_eq!(settled.tile(Pos::new(0, 0)), None);
        assert_eq!(settled.tile(Pos::new(1, 0)).map(|t| t.id), Some(1));
        assert_eq!(settled.tile(Pos::new(2, 0)).map(|t| t.id), Some(2));

        assert_eq!(settled.tile(Pos::new(1, 1)), None);
        assert_eq!(settled.tile(Pos::new(2, 1)).map(|t| t.id), Some(3));

        let full: Vec<_> = (0..3).map(|r| settled.tile(Pos::new(r, 2)).unwrap().id).collect();
        assert_eq!(full, vec![4, 5, 6]);
    }

    #[test]
    fn test_gravity_idempotent() {
        let once = apply_gravity(&column_board());
        assert_eq!(apply_gravity(&once), once);
    }

    #[test]
    fn test_spawn_fills_every_hole() {
        let settled = apply_gravity(&column_board());
        let mut ids = IdSource::new(100);
        let mut rng = SeededRng::new(4);
        let spawned = spawn_new_tiles(&settled, 4, &mut ids, &mut rng);

        assert!(spawned.board.is_full());
        assert_eq!(spawned.origins.len(), 3);
        assert_eq!(ids.peek(), 103);
        // Existing tiles untouched
        assert_eq!(spawned.board.tile(Pos::new(2, 1)).map(|t| t.id), Some(3));
    }

    #[test]
    fn test_spawn_origin_offsets() {
        let settled = apply_gravity(&column_board());
        let mut ids = IdSource::new(100);
        let mut rng = CycleRng::new(vec![0.0, 0.5, 0.9]);
        let spawned = spawn_new_tiles(&settled, 3, &mut ids, &mut rng);

        // Column 0 has one hole, column 1 has two.
        assert_eq!(spawned.origins.get(100), Some(-1));
        assert_eq!(spawned.origins.get(101), Some(-2));
        assert_eq!(spawned.origins.get(102), Some(-1));
        assert_eq!(spawned.origins.get(6), None);

        assert_eq!(spawned.board.tile(Pos::new(0, 0)), Some(Tile::new(100, 0)));
        assert_eq!(spawned.board.tile(Pos::new(0, 1)), Some(Tile::new(101, 1)));
        assert_eq!(spawned.board.tile(Pos::new(1, 1)), Some(Tile::new(102, 2)));
    }

    #[test]
    fn test_spawn_raises_tiny_k() {
        let settled = apply_gravity(&column_board());
        let mut ids = IdSource::new(100);
        let mut rng = CycleRng::new(vec![0.9]);
        let spawned = spawn_new_tiles(&settled, 0, &mut ids, &mut rng);

        assert!(spawned.board.is_full());
        for id in 100..103 {
            let tile = spawned.board.cells().iter().flatten().find(|t| t.id == id);
            assert_eq!(tile.map(|t| t.kind), Some(2));
        }
    }

    #[test]
    fn test_spawn_on_full_board_is_noop() {
        let mut ids = IdSource::default();
        let full = Board::from_types(3, &[0, 1, 2, 1, 2, 0, 2, 0, 1], &mut ids).unwrap();
        let mut rng = SeededRng::new(1);
        let spawned = spawn_new_tiles(&full, 3, &mut ids, &mut rng);
        assert_eq!(spawned.board, full);
        assert!(spawned.origins.is_empty());
    }

    #[test]
    fn test_origins_serialize_as_pairs() {
        let mut origins = SpawnOrigins::new();
        origins.push(9, -2);
        let json = serde_json::to_string(&origins).unwrap();
        assert_eq!(json, r#"[{"id":9,"offset":-2}]"#);
    }
}
