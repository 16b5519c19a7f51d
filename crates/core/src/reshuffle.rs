//! Dead-board handling
//!
//! A board with no valid swap is "dead". Reshuffling keeps the multiset of
//! tile types but permutes it (Fisher-Yates) and hands every tile a brand-new
//! id, so a presentation layer treats it as a full reshuffle rather than a set
//! of moves.

use log::{debug, warn};

use crate::board::{Board, IdSource};
use crate::matching::{find_matches, has_valid_move};
use crate::rng::RandomSource;
use crate::types::{TileType, MAX_RESHUFFLE_ATTEMPTS};

/// Outcome of [`reshuffle_if_dead`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reshuffle {
    pub board: Board,
    /// False when the board already had a valid move and was returned as-is.
    pub reshuffled: bool,
    /// Shuffles tried (0 when not reshuffled).
    pub attempts: u32,
    /// Every attempt failed; `board` is the last attempt and may still be dead
    /// or contain matches.
    pub exhausted: bool,
}

impl Reshuffle {
    /// True when the returned board is guaranteed playable and match-free.
    pub fn is_playable(&self) -> bool {
        !self.exhausted
    }
}

/// Reshuffle `board` if it has no valid move.
///
/// An attempt is accepted when it has no pre-existing matches and at least one
/// valid move. After [`MAX_RESHUFFLE_ATTEMPTS`] failures the last attempt is
/// returned with `exhausted` set. Empty cells, if any, stay where they are.
pub fn reshuffle_if_dead<R: RandomSource>(
    board: &Board,
    ids: &mut IdSource,
    rng: &mut R,
) -> Reshuffle {
    if has_valid_move(board) {
        return Reshuffle {
            board: board.clone(),
            reshuffled: false,
            attempts: 0,
            exhausted: false,
        };
    }

    let mut types: Vec<TileType> = board.cells().iter().flatten().map(|t| t.kind).collect();
    let mut candidate = board.clone();

    for attempt in 1..=MAX_RESHUFFLE_ATTEMPTS {
        rng.shuffle(&mut types);

        let mut next = types.iter();
        for cell in candidate.cells_mut().iter_mut().filter(|c| c.is_some()) {
            if let Some(&kind) = next.next() {
                *cell = Some(ids.tile(kind));
            }
        }

        if find_matches(&candidate).is_empty() && has_valid_move(&candidate) {
            debug!("dead board reshuffled after {} attempt(s)", attempt);
            return Reshuffle {
                board: candidate,
                reshuffled: true,
                attempts: attempt,
                exhausted: false,
            };
        }
    }

    warn!(
        "reshuffle gave up after {} attempts on a {}x{} board",
        MAX_RESHUFFLE_ATTEMPTS,
        board.size(),
        board.size()
    );
    Reshuffle {
        board: candidate,
        reshuffled: true,
        attempts: MAX_RESHUFFLE_ATTEMPTS,
        exhausted: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::get_all_valid_moves;
    use crate::rng::SeededRng;

    #[rustfmt::skip]
    const LATIN: [u8; 9] = [
        0, 1, 2,
        1, 2, 0,
        2, 0, 1,
    ];

    #[test]
    fn test_live_board_untouched() {
        let mut ids = IdSource::default();
        let board = Board::from_types(3, &[0, 0, 1, 1, 2, 0, 2, 1, 2], &mut ids).unwrap();
        assert!(!get_all_valid_moves(&board).is_empty());

        let mut rng = SeededRng::new(1);
        let before = ids.peek();
        let out = reshuffle_if_dead(&board, &mut ids, &mut rng);
        assert!(!out.reshuffled);
        assert_eq!(out.board, board);
        assert_eq!(ids.peek(), before);
    }

    #[test]
    fn test_dead_board_reshuffled_preserving_counts() {
        let mut ids = IdSource::default();
        let board = Board::from_types(3, &LATIN, &mut ids).unwrap();
        assert!(get_all_valid_moves(&board).is_empty());

        let mut rng = SeededRng::new(11);
        let out = reshuffle_if_dead(&board, &mut ids, &mut rng);
        assert!(out.reshuffled);
        assert_eq!(out.board.type_counts(), board.type_counts());

        if !out.exhausted {
            assert!(find_matches(&out.board).is_empty());
            assert!(!get_all_valid_moves(&out.board).is_empty());
        }
    }

    #[test]
    fn test_reshuffle_issues_fresh_ids() {
        let mut ids = IdSource::default();
        let board = Board::from_types(3, &LATIN, &mut ids).unwrap();
        let old_max = ids.peek();

        let mut rng = SeededRng::new(5);
        let out = reshuffle_if_dead(&board, &mut ids, &mut rng);
        assert!(out
            .board
            .cells()
            .iter()
            .flatten()
            .all(|t| t.id >= old_max));
    }

    #[test]
    fn test_unsatisfiable_board_exhausts() {
        // Nine tiles of distinct types can never form a match.
        let mut ids = IdSource::default();
        let board = Board::from_types(3, &[0, 1, 2, 3, 4, 5, 6, 7, 8], &mut ids).unwrap();

        let mut rng = SeededRng::new(2);
        let out = reshuffle_if_dead(&board, &mut ids, &mut rng);
        assert!(out.reshuffled);
        assert!(out.exhausted);
        assert!(!out.is_playable());
        assert_eq!(out.attempts, MAX_RESHUFFLE_ATTEMPTS);
        assert_eq!(out.board.type_counts(), board.type_counts());
    }
}
