//! Parallel batch runs over many seeds.
//!
//! Every game owns its own id source, generator and solver, so results do
//! not depend on thread scheduling: the output order follows `seeds`.

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SimConfig};
use crate::driver::simulate_game_summary;
use crate::record::{EndReason, GameSummary};
use crate::solver::Solver;

/// Consecutive seeds starting at `base`.
pub fn seed_range(base: u32, games: u32) -> Vec<u32> {
    (0..games).map(|i| base.wrapping_add(i)).collect()
}

/// Play one game per seed in parallel.
///
/// `make_solver` builds a fresh solver for each game from its seed.
pub fn simulate_batch<S, F>(
    config: &SimConfig,
    seeds: &[u32],
    make_solver: F,
) -> Result<Vec<GameSummary>, ConfigError>
where
    S: Solver,
    F: Fn(u32) -> S + Sync,
{
    config.validate()?;
    let summaries = seeds
        .par_iter()
        .map(|&seed| simulate_game_summary(config, seed, make_solver(seed)))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(stats) = BatchStats::from_summaries(&summaries) {
        info!(
            "batch of {} games: mean score {:.1} (min {}, max {}), {} dead-board endings",
            stats.games, stats.mean_score, stats.min_score, stats.max_score, stats.dead_board_endings
        );
    }
    Ok(summaries)
}

/// Aggregate numbers over a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    pub games: usize,
    pub mean_score: f64,
    pub min_score: u32,
    pub max_score: u32,
    pub mean_turns_played: f64,
    pub mean_max_k: f64,
    pub dead_board_endings: usize,
}

impl BatchStats {
    /// `None` for an empty batch.
    pub fn from_summaries(summaries: &[GameSummary]) -> Option<Self> {
        if summaries.is_empty() {
            return None;
        }
        let n = summaries.len() as f64;
        let total_score: u64 = summaries.iter().map(|s| s.final_score as u64).sum();
        let total_turns: u64 = summaries.iter().map(|s| s.turns_played as u64).sum();
        let total_max_k: u64 = summaries.iter().map(|s| s.max_k as u64).sum();

        Some(Self {
            games: summaries.len(),
            mean_score: total_score as f64 / n,
            min_score: summaries.iter().map(|s| s.final_score).min()?,
            max_score: summaries.iter().map(|s| s.final_score).max()?,
            mean_turns_played: total_turns as f64 / n,
            mean_max_k: total_max_k as f64 / n,
            dead_board_endings: summaries
                .iter()
                .filter(|s| s.end_reason == Some(EndReason::DeadBoard))
                .count(),
        })
    }
}
