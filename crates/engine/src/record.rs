//! Game records: per-move log, end-of-game summary and full replay.

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::core::{Board, TurnResult};
use crate::types::Move;

/// Why a game stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    OutOfTurns,
    /// No valid move and reshuffling was disabled or gave up.
    DeadBoard,
}

impl EndReason {
    pub fn as_str(self) -> &'static str {
        match self {
            EndReason::OutOfTurns => "out_of_turns",
            EndReason::DeadBoard => "dead_board",
        }
    }
}

/// One played turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 1-based turn number.
    pub turn: u32,
    /// What the solver asked for.
    pub requested: Move,
    /// What was actually played.
    pub applied: Move,
    /// The request was not a valid move and the first valid one was used.
    pub substituted: bool,
    /// Board after a dead-board reshuffle that preceded this move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reshuffled: Option<Board>,
    pub result: TurnResult,
    pub turns_left: i32,
    pub score: u32,
    pub k: u8,
}

/// End-of-game numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub seed: u32,
    pub final_score: u32,
    pub turns_played: u32,
    pub max_k: u8,
    pub final_k: u8,
    pub collection_events: u32,
    pub turns_left: i32,
    /// `None` for a game that is still being played.
    pub end_reason: Option<EndReason>,
    pub reshuffles: u32,
    pub substitutions: u32,
}

/// Everything needed to inspect or re-render a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameReplay {
    pub seed: u32,
    pub config: SimConfig,
    pub initial_board: Board,
    pub moves: Vec<MoveRecord>,
    pub summary: GameSummary,
}

impl GameReplay {
    /// Score reconstructed from the move log.
    pub fn replayed_score(&self) -> u32 {
        self.moves.iter().map(|m| m.result.total_score_gained).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_reason_wire_names() {
        assert_eq!(
            serde_json::to_string(&EndReason::DeadBoard).unwrap(),
            format!("\"{}\"", EndReason::DeadBoard.as_str())
        );
        assert_eq!(
            serde_json::from_str::<EndReason>("\"out_of_turns\"").unwrap(),
            EndReason::OutOfTurns
        );
    }
}
