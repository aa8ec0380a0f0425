//! Simulation parameters.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SetupError};

/// Smallest grid edge that fits both bases and their starting workers.
pub const MIN_GRID_EDGE: u16 = 4;

/// Immutable simulation parameters.
///
/// Deserialisation fills any missing field with its default, so a config
/// file only needs to name the values it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Grid width in tiles.
    pub width: u16,
    /// Grid height in tiles.
    pub height: u16,
    /// Turn cap for an episode.
    pub max_turns: u32,
    /// Successful actions a faction may take per turn.
    pub actions_per_turn: u32,
    /// Proposals (valid or not) a faction may make per turn.
    pub max_attempts_per_turn: u32,
    /// Hit points of each base.
    pub base_hp: u32,
    /// Opening bank balance of each faction.
    pub starting_resources: u32,
    /// Resource nodes to place (rounded up to even).
    pub num_resource_nodes: u32,
    /// Currency held by each node at start.
    pub resource_per_node: u32,
    /// Currency moved by one gather.
    pub worker_gather_amount: u32,
    /// Bank cost of spawning a worker.
    pub worker_spawn_cost: u32,
    /// Worker cap per faction.
    pub max_workers: u32,
    /// Bank balance that wins the episode.
    pub target_bank: u32,
    /// Seed for map generation.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 12,
            height: 12,
            max_turns: 200,
            actions_per_turn: 3,
            max_attempts_per_turn: 10,
            base_hp: 30,
            starting_resources: 30,
            num_resource_nodes: 8,
            resource_per_node: 60,
            worker_gather_amount: 5,
            worker_spawn_cost: 20,
            max_workers: 10,
            target_bank: 200,
            seed: 42,
        }
    }
}

impl GameConfig {
    /// Same config with a different seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check that the parameters describe a playable world.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.width < MIN_GRID_EDGE || self.height < MIN_GRID_EDGE {
            return Err(SetupError::InvalidConfig(format!(
                "grid {}x{} is smaller than {MIN_GRID_EDGE}x{MIN_GRID_EDGE}",
                self.width, self.height
            )));
        }
        let free_tiles = u32::from(self.width) * u32::from(self.height) - 2;
        let nodes = self.num_resource_nodes.saturating_add(self.num_resource_nodes % 2);
        if nodes > free_tiles {
            return Err(SetupError::InvalidConfig(format!(
                "{nodes} resource nodes do not fit the {free_tiles} free tiles of a {}x{} grid",
                self.width, self.height
            )));
        }
        if self.actions_per_turn == 0 {
            return Err(SetupError::InvalidConfig(
                "actions_per_turn must be at least 1".to_string(),
            ));
        }
        if self.max_attempts_per_turn < self.actions_per_turn {
            return Err(SetupError::InvalidConfig(format!(
                "max_attempts_per_turn ({}) is below actions_per_turn ({})",
                self.max_attempts_per_turn, self.actions_per_turn
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, names an unknown field, or
    /// fails [`GameConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!((config.width, config.height), (12, 12));
        assert_eq!(config.actions_per_turn, 3);
        assert_eq!(config.max_attempts_per_turn, 10);
        assert_eq!(config.target_bank, 200);
        assert_eq!(config.seed, 42);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json_str(r#"{"seed": 7, "width": 16}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.width, 16);
        assert_eq!(config.height, 12);
        assert_eq!(config.resource_per_node, 60);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = GameConfig::from_json_str(r#"{"widht": 16}"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_tiny_grid_rejected() {
        let config = GameConfig {
            width: 3,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(SetupError::InvalidConfig(_))));
    }

    #[test]
    fn test_attempts_below_actions_rejected() {
        let config = GameConfig {
            actions_per_turn: 5,
            max_attempts_per_turn: 4,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_node_count_beyond_grid_rejected() {
        let config = GameConfig {
            num_resource_nodes: u32::MAX,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(SetupError::InvalidConfig(_))));

        let result = GameConfig::from_json_str(r#"{"num_resource_nodes": 4000000000}"#);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid(SetupError::InvalidConfig(_)))
        ));

        // 12x12 leaves 142 tiles once the bases are placed
        let config = GameConfig {
            num_resource_nodes: 142,
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());
        let config = GameConfig {
            num_resource_nodes: 143,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_missing_file() {
        let result = GameConfig::from_json_file(Path::new("/nonexistent/agegrid.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
