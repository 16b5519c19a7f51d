//! Match detection and move validation
//!
//! Rows and columns are scanned independently for maximal same-type runs of
//! three or more. Runs that share a cell are then merged into one compound
//! match (L, T and cross shapes) with a disjoint set that lives only for the
//! duration of one [`find_matches`] call.

use serde::{Deserialize, Serialize};

use crate::board::{idx, Board};
use crate::types::{Axis, Move, Pos, TileType, MIN_MATCH_LEN};

/// A run, or a union of same-type runs, of three or more tiles.
///
/// `axis` is set only for a single straight run. Merged shapes drop it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    pub positions: Vec<Pos>,
    #[serde(rename = "type")]
    pub kind: TileType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<Axis>,
}

impl Match {
    /// Number of distinct cells in the match.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// True when this is a merged shape rather than a straight run.
    pub fn is_compound(&self) -> bool {
        self.axis.is_none()
    }
}

/// Call-scoped union-find over run indices.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Attach the root of `b` under the root of `a`.
    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

/// Append every maximal run of `MIN_MATCH_LEN`+ in one line.
///
/// `at(i)` maps the i-th cell of the line to a board position. Position `len`
/// acts as an empty sentinel so the last run is flushed without a special case.
fn scan_line<F>(board: &Board, len: usize, axis: Axis, at: F, out: &mut Vec<Match>)
where
    F: Fn(usize) -> Pos,
{
    let mut start = 0;
    let mut run_kind = board.kind_at(at(0));

    for i in 1..=len {
        let kind = if i < len { board.kind_at(at(i)) } else { None };
        if kind.is_some() && kind == run_kind {
            continue;
        }

        if let Some(k) = run_kind {
            if i - start >= MIN_MATCH_LEN {
                out.push(Match {
                    positions: (start..i).map(&at).collect(),
                    kind: k,
                    axis: Some(axis),
                });
            }
        }
        start = i;
        run_kind = kind;
    }
}

/// Find every match on the board.
///
/// Pure and total: an empty board, a partially empty board, or one with no
/// runs all yield an empty vector. Ordering of the result is not significant.
pub fn find_matches(board: &Board) -> Vec<Match> {
    let size = board.size();
    if size == 0 {
        return Vec::new();
    }

    let mut runs = Vec::new();
    for row in 0..size {
        scan_line(board, size, Axis::Row, |c| Pos::new(row, c), &mut runs);
    }
    for col in 0..size {
        scan_line(board, size, Axis::Col, |r| Pos::new(r, col), &mut runs);
    }
    if runs.len() < 2 {
        return runs;
    }

    // A cell belongs to the first run that claimed it; later runs touching it
    // are unioned with that owner.
    let mut sets = DisjointSet::new(runs.len());
    let mut owner: Vec<Option<usize>> = vec![None; board.len()];
    for (r, run) in runs.iter().enumerate() {
        for &pos in &run.positions {
            let i = idx(pos, size);
            match owner[i] {
                Some(first) => sets.union(first, r),
                None => owner[i] = Some(r),
            }
        }
    }

    // Group runs by root, in order of first appearance.
    let mut groups: Vec<(usize, Vec<usize>)> = Vec::new();
    for r in 0..runs.len() {
        let root = sets.find(r);
        match groups.iter_mut().find(|(g, _)| *g == root) {
            Some((_, members)) => members.push(r),
            None => groups.push((root, vec![r])),
        }
    }

    if groups.len() == runs.len() {
        return runs;
    }

    let mut merged = Vec::with_capacity(groups.len());
    let mut claimed = vec![false; board.len()];
    for (_, members) in groups {
        if let [single] = members[..] {
            merged.push(runs[single].clone());
            continue;
        }

        let kind = runs[members[0]].kind;
        let mut positions = Vec::new();
        for &m in &members {
            for &pos in &runs[m].positions {
                let i = idx(pos, size);
                if !claimed[i] {
                    claimed[i] = true;
                    positions.push(pos);
                }
            }
        }
        merged.push(Match {
            positions,
            kind,
            axis: None,
        });
    }
    merged
}

/// True iff the two positions are orthogonal neighbours.
pub fn is_adjacent(a: Pos, b: Pos) -> bool {
    a.is_adjacent(b)
}

/// A swap is valid when the cells are adjacent, both occupied, and the
/// swapped board contains at least one match. The board is not modified.
pub fn is_valid_move(board: &Board, a: Pos, b: Pos) -> bool {
    if !is_adjacent(a, b) || !board.is_occupied(a) || !board.is_occupied(b) {
        return false;
    }
    !find_matches(&board.swapped(a, b)).is_empty()
}

/// Every valid swap, each unordered pair listed once (right and down neighbours).
///
/// An empty result means the board is dead.
pub fn get_all_valid_moves(board: &Board) -> Vec<Move> {
    let size = board.size();
    let mut moves = Vec::new();
    for row in 0..size {
        for col in 0..size {
            let here = Pos::new(row, col);
            if col + 1 < size {
                let right = Pos::new(row, col + 1);
                if is_valid_move(board, here, right) {
                    moves.push(Move::new(here, right));
                }
            }
            if row + 1 < size {
                let down = Pos::new(row + 1, col);
                if is_valid_move(board, here, down) {
                    moves.push(Move::new(here, down));
                }
            }
        }
    }
    moves
}

/// Dead-board check that stops at the first valid swap.
pub fn has_valid_move(board: &Board) -> bool {
    let size = board.size();
    (0..size).any(|row| {
        (0..size).any(|col| {
            let here = Pos::new(row, col);
            (col + 1 < size && is_valid_move(board, here, Pos::new(row, col + 1)))
                || (row + 1 < size && is_valid_move(board, here, Pos::new(row + 1, col)))
        })
    })
}
