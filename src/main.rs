//! Headless batch runner (default binary).
//!
//! Plays a batch of seeded games with a built-in solver and prints one JSON
//! line per game summary followed by a JSON stats line. With `--replay` it
//! prints the full replay of the first seed instead.
//!
//! Defaults come from `SimConfig::from_env()`; flags override them. Logs go
//! to stderr, filtered by `RUST_LOG` (default "info").

use anyhow::{anyhow, Context, Result};
use flexi_logger::Logger;
use log::info;

use match3::engine::{
    seed_range, simulate_batch, simulate_game_replay, BatchStats, NamedSolver, SimConfig,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct SimArgs {
    games: u32,
    seed: u32,
    solver: String,
    replay: bool,
    config: SimConfig,
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T> {
    let v = args
        .get(i)
        .ok_or_else(|| anyhow!("missing value for {}", flag))?;
    v.parse::<T>()
        .map_err(|_| anyhow!("invalid {} value: {}", flag, v))
}

fn parse_args(args: &[String], mut config: SimConfig) -> Result<SimArgs> {
    let mut games = 10u32;
    let mut seed = 1u32;
    let mut solver = String::from("greedy");
    let mut replay = false;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                i += 1;
                games = parse_value(args, i, "--games")?;
            }
            "--seed" => {
                i += 1;
                seed = parse_value(args, i, "--seed")?;
            }
            "--solver" => {
                i += 1;
                solver = parse_value(args, i, "--solver")?;
            }
            "--size" => {
                i += 1;
                config.board_size = parse_value(args, i, "--size")?;
            }
            "--k" => {
                i += 1;
                config.start_k = parse_value(args, i, "--k")?;
                config.max_k = config.max_k.max(config.start_k);
            }
            "--turns" => {
                i += 1;
                config.start_turns = parse_value(args, i, "--turns")?;
            }
            "--replay" => replay = true,
            "--reshuffle" => config.reshuffle_dead_boards = true,
            other => return Err(anyhow!("unknown argument: {}", other)),
        }
        i += 1;
    }

    if NamedSolver::from_name(&solver, seed).is_none() {
        return Err(anyhow!("unknown solver: {} (expected first|random|greedy)", solver));
    }

    Ok(SimArgs {
        games,
        seed,
        solver,
        replay,
        config,
    })
}

fn make_solver(name: &str, seed: u32) -> NamedSolver {
    // Names are checked in parse_args.
    NamedSolver::from_name(name, seed).unwrap_or(NamedSolver::First(Default::default()))
}

fn main() -> Result<()> {
    Logger::try_with_env_or_str("info")?
        .format(flexi_logger::colored_default_format)
        .start()?;

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&argv, SimConfig::from_env())?;
    args.config.validate().context("invalid simulation config")?;

    info!(
        "{} solver, {}x{} board, K={}, {} turns",
        args.solver,
        args.config.board_size,
        args.config.board_size,
        args.config.start_k,
        args.config.start_turns
    );

    if args.replay {
        let replay = simulate_game_replay(
            &args.config,
            args.seed,
            make_solver(&args.solver, args.seed),
        )?;
        println!("{}", serde_json::to_string(&replay)?);
        return Ok(());
    }

    let seeds = seed_range(args.seed, args.games);
    let summaries = simulate_batch(&args.config, &seeds, |seed| {
        make_solver(&args.solver, seed)
    })?;

    for summary in &summaries {
        println!("{}", serde_json::to_string(summary)?);
    }
    if let Some(stats) = BatchStats::from_summaries(&summaries) {
        println!("{}", serde_json::to_string(&stats)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_defaults() {
        let args = parse_args(&[], SimConfig::default()).unwrap();
        assert_eq!(args.games, 10);
        assert_eq!(args.solver, "greedy");
        assert!(!args.replay);
        assert_eq!(args.config, SimConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let args = parse_args(
            &argv("--games 3 --seed 9 --solver random --size 6 --k 9 --turns 12 --replay"),
            SimConfig::default(),
        )
        .unwrap();
        assert_eq!(args.games, 3);
        assert_eq!(args.seed, 9);
        assert_eq!(args.solver, "random");
        assert!(args.replay);
        assert_eq!(args.config.board_size, 6);
        assert_eq!(args.config.start_k, 9);
        assert_eq!(args.config.max_k, 9);
        assert_eq!(args.config.start_turns, 12);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse_args(&argv("--games"), SimConfig::default()).is_err());
        assert!(parse_args(&argv("--size big"), SimConfig::default()).is_err());
        assert!(parse_args(&argv("--solver oracle"), SimConfig::default()).is_err());
        assert!(parse_args(&argv("--verbose"), SimConfig::default()).is_err());
    }
}
