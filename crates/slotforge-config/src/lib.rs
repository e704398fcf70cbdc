//! Configuration system for SlotForge.
//!
//! Load scheduler configuration from TOML or YAML files to control the
//! optimiser run budget, adjacency threshold and logging verbosity
//! without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use slotforge_config::SchedulerConfig;
//! use chrono::TimeDelta;
//!
//! let config = SchedulerConfig::from_toml_str(r#"
//!     max_cycles = 80
//!     verbosity = 2
//!     adjacency_gap_minutes = 15
//! "#).unwrap();
//!
//! assert_eq!(config.max_cycles, 80);
//! assert_eq!(config.adjacency_gap(), TimeDelta::minutes(15));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use slotforge_config::SchedulerConfig;
//!
//! let config = SchedulerConfig::load("scheduler.toml").unwrap_or_default();
//! assert_eq!(config.max_cycles, 160);
//! ```

use std::path::Path;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default optimiser run budget.
pub const DEFAULT_MAX_CYCLES: u32 = 160;

/// Default adjacency threshold in minutes.
pub const DEFAULT_ADJACENCY_GAP_MINUTES: i64 = 30;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct SchedulerConfig {
    /// Maximum number of optimiser runs.
    pub max_cycles: u32,

    /// Diagnostic narration level. Consumed by logging only.
    pub verbosity: u8,

    /// Largest gap between two slots in the same room that still counts
    /// as adjacent.
    pub adjacency_gap_minutes: i64,

    /// Random seed for reproducible results.
    pub random_seed: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_cycles: DEFAULT_MAX_CYCLES,
            verbosity: 1,
            adjacency_gap_minutes: DEFAULT_ADJACENCY_GAP_MINUTES,
            random_seed: None,
        }
    }
}

impl SchedulerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML or
    /// fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cycles == 0 {
            return Err(ConfigError::Invalid(
                "max_cycles must be a positive integer".to_string(),
            ));
        }
        if self.adjacency_gap_minutes < 0 {
            return Err(ConfigError::Invalid(format!(
                "adjacency_gap_minutes must not be negative, got {}",
                self.adjacency_gap_minutes
            )));
        }
        if TimeDelta::try_minutes(self.adjacency_gap_minutes).is_none() {
            return Err(ConfigError::Invalid(format!(
                "adjacency_gap_minutes is out of range, got {}",
                self.adjacency_gap_minutes
            )));
        }
        Ok(())
    }

    /// Sets the optimiser run budget.
    pub fn with_max_cycles(mut self, max_cycles: u32) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_adjacency_gap_minutes(mut self, minutes: i64) -> Self {
        self.adjacency_gap_minutes = minutes;
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Returns the adjacency threshold as a duration, saturating for
    /// values `validate` would reject.
    pub fn adjacency_gap(&self) -> TimeDelta {
        TimeDelta::try_minutes(self.adjacency_gap_minutes.max(0)).unwrap_or(TimeDelta::MAX)
    }
}

#[cfg(test)]
mod tests;
