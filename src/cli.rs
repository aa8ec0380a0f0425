//! CLI command implementations for `AgeGrid`.

pub(crate) mod run;
pub(crate) mod tournament;

mod output;

use agegrid::{ConfigError, GameConfig, SetupError};
use clap::ValueEnum;
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<SetupError> for CliError {
    fn from(e: SetupError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

/// Load the config file (or defaults) and apply command-line overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the result is invalid.
pub(crate) fn load_config(
    path: Option<&Path>,
    seed: Option<u64>,
    max_turns: Option<u32>,
) -> Result<GameConfig, CliError> {
    let mut config = match path {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    if let Some(max_turns) = max_turns {
        config.max_turns = max_turns;
    }
    config.validate()?;
    Ok(config)
}
