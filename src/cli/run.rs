//! Run command implementation.

use super::output::{JsonEpisodeResult, format_episode_text};
use super::{CliError, OutputFormat};
use agegrid::runner::run_episode_observed;
use agegrid::{AgentKind, Faction, GameConfig, render_summary};

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the world cannot be set up or output fails.
pub(crate) fn execute(
    config: GameConfig,
    red: AgentKind,
    blue: AgentKind,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let agents = [red, blue];
    let red_agent = red.build_for(Faction::Red, config.seed);
    let blue_agent = blue.build_for(Faction::Blue, config.seed);

    let print_turns = !quiet && format == OutputFormat::Text;
    if print_turns {
        println!("Running episode with seed {}...", config.seed);
        println!("Red: {red} | Blue: {blue}");
        println!();
    }

    // JSON keeps the log in the document instead of streaming it
    let mut log_lines = Vec::new();
    let mut last_summary = String::new();
    let result = run_episode_observed(config, &red_agent, &blue_agent, |world, log| {
        if print_turns {
            println!("{log}");
            last_summary = render_summary(world);
        } else if !quiet {
            log_lines.push(log.to_string());
        }
    })?;

    match format {
        OutputFormat::Text => {
            if print_turns {
                println!();
                println!("{last_summary}");
                println!();
            }
            print!("{}", format_episode_text(&result, agents));
        }
        OutputFormat::Json => {
            let log = (!quiet).then_some(log_lines);
            let json_result = JsonEpisodeResult::from_episode(&result, agents, log);
            let json = serde_json::to_string_pretty(&json_result)?;
            println!("{json}");
        }
    }

    Ok(())
}
