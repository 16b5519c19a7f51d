//! Simulation configuration
//!
//! Defaults describe a standard 8×8 game. Values can be overridden from the
//! environment:
//!
//! - `MATCH3_BOARD_SIZE`: board edge (default: 8)
//! - `MATCH3_START_K`: tile types at the start (default: 5)
//! - `MATCH3_MAX_K`: tile types reachable through collection (default: 8)
//! - `MATCH3_TURNS`: starting turn budget (default: 20)
//! - `MATCH3_COLLECTION_THRESHOLD`: clears of one type per collection event (default: 30)
//! - `MATCH3_RESHUFFLE`: set to "1" or "true" to reshuffle dead boards instead of ending the game

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::EngineError;
use crate::types::{MIN_BOARD_SIZE, MIN_TILE_TYPES};

/// Rejected configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("start_k must be at least {min}, got {k}")]
    TooFewTileTypes { k: u8, min: u8 },

    #[error("board_size must be at least {min}, got {size}")]
    BoardTooSmall { size: usize, min: usize },

    #[error("max_k ({max_k}) is below start_k ({start_k})")]
    MaxKBelowStart { start_k: u8, max_k: u8 },

    #[error("collection_threshold must be positive")]
    ZeroCollectionThreshold,

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Parameters of one simulated game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    pub board_size: usize,
    pub start_k: u8,
    /// Upper bound for K growth through collection events.
    pub max_k: u8,
    pub start_turns: u32,
    pub collection_threshold: u32,
    /// Reshuffle a dead board instead of ending the game.
    pub reshuffle_dead_boards: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            board_size: 8,
            start_k: 5,
            max_k: 8,
            start_turns: 20,
            collection_threshold: 30,
            reshuffle_dead_boards: false,
        }
    }
}

impl SimConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SimConfig::from_env`] with an explicit variable source.
    ///
    /// Missing or unparseable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let start_k = parse_var(&lookup, "MATCH3_START_K").unwrap_or(defaults.start_k);
        Self {
            board_size: parse_var(&lookup, "MATCH3_BOARD_SIZE").unwrap_or(defaults.board_size),
            start_k,
            max_k: parse_var(&lookup, "MATCH3_MAX_K").unwrap_or(defaults.max_k.max(start_k)),
            start_turns: parse_var(&lookup, "MATCH3_TURNS").unwrap_or(defaults.start_turns),
            collection_threshold: parse_var(&lookup, "MATCH3_COLLECTION_THRESHOLD")
                .unwrap_or(defaults.collection_threshold),
            reshuffle_dead_boards: lookup("MATCH3_RESHUFFLE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.reshuffle_dead_boards),
        }
    }

    /// Check the hard preconditions of the engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_k < MIN_TILE_TYPES {
            return Err(ConfigError::TooFewTileTypes {
                k: self.start_k,
                min: MIN_TILE_TYPES,
            });
        }
        if self.board_size < MIN_BOARD_SIZE {
            return Err(ConfigError::BoardTooSmall {
                size: self.board_size,
                min: MIN_BOARD_SIZE,
            });
        }
        if self.max_k < self.start_k {
            return Err(ConfigError::MaxKBelowStart {
                start_k: self.start_k,
                max_k: self.max_k,
            });
        }
        if self.collection_threshold == 0 {
            return Err(ConfigError::ZeroCollectionThreshold);
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|s| s.trim().parse().ok())
}
