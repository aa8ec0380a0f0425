//! `AgeGrid` CLI - Command-line interface for running `AgeGrid` episodes.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use agegrid::AgentKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// `AgeGrid` - A deterministic two-faction grid economy simulation
#[derive(Parser, Debug)]
#[command(name = "agegrid")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Log simulation events to stderr (-v info, -vv debug, -vvv trace).
    /// Without it, `RUST_LOG` selects the filter.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single episode between two agents
    Run {
        /// Agent playing Red: greedy or random
        #[arg(long, default_value = "greedy")]
        red: AgentKind,

        /// Agent playing Blue: greedy or random
        #[arg(long, default_value = "random")]
        blue: AgentKind,

        /// Map seed (default: from config)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum turns (default: from config)
        #[arg(short = 't', long)]
        max_turns: Option<u32>,

        /// JSON config file; missing fields take defaults
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Suppress turn-by-turn output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run many episodes in parallel and aggregate statistics
    Tournament {
        /// Agent playing Red: greedy or random
        #[arg(long, default_value = "greedy")]
        red: AgentKind,

        /// Agent playing Blue: greedy or random
        #[arg(long, default_value = "random")]
        blue: AgentKind,

        /// Number of episodes to run (default: 100)
        #[arg(short, long, default_value = "100")]
        episodes: u64,

        /// Starting seed (increments for each episode)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Maximum turns per episode (default: from config)
        #[arg(short = 't', long)]
        max_turns: Option<u32>,

        /// JSON config file; missing fields take defaults
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TournamentFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

/// Log filter for a `-v` count, or `None` to defer to `RUST_LOG`.
fn verbosity_filter(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Install a stderr subscriber so stdout stays clean for JSON and CSV.
fn init_tracing(verbose: u8) {
    let filter = match verbosity_filter(verbose) {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Commands::Run {
            red,
            blue,
            seed,
            max_turns,
            config,
            format,
            quiet,
        } => cli::load_config(config.as_deref(), seed, max_turns)
            .and_then(|config| cli::run::execute(config, red, blue, format, quiet)),

        Commands::Tournament {
            red,
            blue,
            episodes,
            seed,
            threads,
            max_turns,
            config,
            format,
            progress,
        } => cli::load_config(config.as_deref(), seed, max_turns).and_then(|config| {
            cli::tournament::execute(config, red, blue, episodes, threads, format, progress)
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(verbosity_filter(0), None);
        assert_eq!(verbosity_filter(1), Some("info"));
        assert_eq!(verbosity_filter(2), Some("debug"));
        assert_eq!(verbosity_filter(7), Some("trace"));
    }

    #[test]
    fn test_verbose_flag_is_global() {
        let args = Args::try_parse_from(["agegrid", "run", "-vv", "--quiet"]).unwrap();
        assert_eq!(args.verbose, 2);
        let args = Args::try_parse_from(["agegrid", "-v", "tournament", "-e", "4"]).unwrap();
        assert_eq!(args.verbose, 1);
        assert!(matches!(args.command, Commands::Tournament { episodes: 4, .. }));
    }
}
