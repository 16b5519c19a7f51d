//! Match-3 puzzle engine (workspace facade crate).
//!
//! Re-exports the member crates under one name so tools and tests can use
//! `match3::{core,engine,types}` while the implementation lives under `crates/`.

pub use match3_core as core;
pub use match3_engine as engine;
pub use match3_types as types;
