//! Tournament command implementation.

// Throughput is reported with f64 precision
#![allow(clippy::cast_precision_loss)]

use super::output::{JsonTournamentResult, format_tournament_csv, format_tournament_text};
use super::{CliError, TournamentFormat};
use agegrid::runner::run_batch_observed;
use agegrid::{AgentKind, BatchStats, Faction, GameConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;

/// Execute the tournament command.
///
/// # Errors
///
/// Returns an error if the config is invalid, the thread pool cannot be
/// built, or output fails.
pub(crate) fn execute(
    config: GameConfig,
    red: AgentKind,
    blue: AgentKind,
    episodes: u64,
    threads: Option<usize>,
    format: TournamentFormat,
    progress: bool,
) -> Result<(), CliError> {
    let agents = [red, blue];

    // Progress bar
    let pb = if progress {
        let pb = ProgressBar::new(episodes);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} episodes ({per_sec})",
                )
                .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    let run = || {
        run_batch_observed(
            config,
            episodes,
            |seed| red.build_for(Faction::Red, seed),
            |seed| blue.build_for(Faction::Blue, seed),
            |_| {
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
            },
        )
    };

    // A dedicated pool keeps -j local to this command
    let stats: BatchStats = match threads {
        Some(num_threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| CliError::new(format!("Failed to build thread pool: {e}")))?
            .install(run)?,
        None => run()?,
    };

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let episodes_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.episodes as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    // Output based on format
    match format {
        TournamentFormat::Text => {
            println!();
            print!("{}", format_tournament_text(&stats, agents));
            println!();
            println!(
                "Duration: {:.2}s ({:.0} episodes/sec)",
                duration.as_secs_f64(),
                episodes_per_sec
            );
        }
        TournamentFormat::Json => {
            let json_result = JsonTournamentResult::from_stats(&stats, agents);
            let json = serde_json::to_string_pretty(&json_result)?;
            println!("{json}");
        }
        TournamentFormat::Csv => {
            print!("{}", format_tournament_csv(&stats, agents));
        }
    }

    Ok(())
}
