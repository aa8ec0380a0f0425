//! Error types for world setup and configuration loading.
//!
//! Rejected player proposals are not errors; they are reported through
//! [`crate::game::ActionOutcome`] and never surface here.

use std::fmt;
use std::path::PathBuf;

/// Fatal failure while constructing or resetting a world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// The configuration cannot describe a playable world.
    InvalidConfig(String),
    /// The map generator ran out of sampling attempts before placing every node.
    ResourcePlacement {
        /// Number of nodes requested (after rounding up to an even count).
        requested: u32,
        /// Number of nodes placed when the attempt cap was hit.
        placed: u32,
        /// Sampling attempts consumed.
        attempts: u32,
    },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(reason) => write!(f, "invalid configuration: {reason}"),
            Self::ResourcePlacement {
                requested,
                placed,
                attempts,
            } => write!(
                f,
                "failed to place symmetric resources ({placed}/{requested} after {attempts} attempts); \
                 try a different seed or config"
            ),
        }
    }
}

impl std::error::Error for SetupError {}

/// Failure while loading a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid configuration JSON.
    Parse(serde_json::Error),
    /// The file parsed but describes an unplayable world.
    Invalid(SetupError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            Self::Parse(e) => write!(f, "failed to parse config: {e}"),
            Self::Invalid(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
            Self::Invalid(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<SetupError> for ConfigError {
    fn from(e: SetupError) -> Self {
        Self::Invalid(e)
    }
}
