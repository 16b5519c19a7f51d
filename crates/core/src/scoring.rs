//! Scoring module - match value curve, cascade bonus, and turn effects
//!
//! - A match of `N` tiles is worth `N` plus a length bonus of `N - 3`, capped
//!   at 2: 3→3, 4→5, 5→7, 6→8, 7→9.
//! - Every match at cascade level `L` (0-based) adds `L * 3` on top.
//! - The longest match anywhere in a move decides the turn effect; effects
//!   from different cascade levels do not stack.

use crate::matching::Match;
use crate::turn::CascadeStep;
use crate::types::{
    TurnEffect, CASCADE_LEVEL_BONUS, EXTRA_TURN_MATCH_LEN, MAX_LENGTH_BONUS, MIN_MATCH_LEN,
    REFUND_MATCH_LEN,
};

/// Base value of one match.
pub fn score_match(m: &Match) -> u32 {
    score_len(m.len())
}

/// Base value of a match with `n` cells.
pub fn score_len(n: usize) -> u32 {
    let bonus = n.saturating_sub(MIN_MATCH_LEN).min(MAX_LENGTH_BONUS);
    (n + bonus) as u32
}

/// Total for all matches cleared at one cascade level.
pub fn score_cascade_level(matches: &[Match], level: u32) -> u32 {
    matches
        .iter()
        .map(|m| score_match(m) + level * CASCADE_LEVEL_BONUS)
        .sum()
}

/// Turn effect for a given best match length.
pub fn effect_for_len(max_len: usize) -> TurnEffect {
    if max_len >= EXTRA_TURN_MATCH_LEN {
        TurnEffect::Extra
    } else if max_len == REFUND_MATCH_LEN {
        TurnEffect::Refund
    } else {
        TurnEffect::None
    }
}

/// Classify a whole move by its longest match across every cascade step.
pub fn compute_turn_effect(steps: &[CascadeStep]) -> TurnEffect {
    let max_len = steps
        .iter()
        .flat_map(|s| s.matches.iter())
        .map(Match::len)
        .max()
        .unwrap_or(0);
    effect_for_len(max_len)
}
