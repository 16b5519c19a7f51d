//! Simulation layer - games under solver control
//!
//! Built on `match3-core`, this crate owns everything that spans more than one
//! move: configuration, the per-game state, the solver protocol, the turn
//! driver, game records and parallel batches.
//!
//! # Module Structure
//!
//! - [`config`]: `SimConfig` with defaults, environment overrides and validation
//! - [`state`]: `GameState` and `advance_turn` (score, collection, K growth, turn budget)
//! - [`solver`]: sync and async solver traits plus built-in policies
//! - [`remote`]: channel-backed async solver for out-of-process policies
//! - [`driver`]: the turn loop, summary and replay runners
//! - [`record`]: move records, summaries and replays
//! - [`batch`]: parallel multi-seed runs and aggregate stats
//!
//! # Example
//!
//! ```
//! use match3_engine::{simulate_game_summary, GreedySolver, SimConfig};
//!
//! let config = SimConfig { board_size: 6, start_turns: 5, ..SimConfig::default() };
//! let a = simulate_game_summary(&config, 7, GreedySolver).unwrap();
//! let b = simulate_game_summary(&config, 7, GreedySolver).unwrap();
//! assert_eq!(a, b);
//! ```

pub mod batch;
pub mod config;
pub mod driver;
pub mod record;
pub mod remote;
pub mod solver;
pub mod state;

pub use match3_core as core;
pub use match3_types as types;

pub use batch::{seed_range, simulate_batch, BatchStats};
pub use config::{ConfigError, SimConfig};
pub use driver::{
    resolve_solver_move, simulate_game_replay, simulate_game_replay_async, simulate_game_summary,
    simulate_game_summary_async, Simulation,
};
pub use record::{EndReason, GameReplay, GameSummary, MoveRecord};
pub use remote::{ChannelSolver, MoveRequest};
pub use solver::{
    AsyncSolver, Blocking, FirstMoveSolver, GreedySolver, NamedSolver, RandomSolver, Solver,
    SolverContext,
};
pub use state::{advance_turn, GameState};
