//! Configuration and constants for the engine and CLI.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default bound on breakdown queue passes before giving up
pub const DEFAULT_MAX_QUEUE_PASSES: usize = 64;

/// Default number of resolved nodes between progress reports
pub const DEFAULT_PROGRESS_EVERY: usize = 100_000;

/// Node types whose `name` holds a literal value rather than a constructor.
/// These are grouped under their type name when aggregating by prototype.
pub const VALUE_NAMED_TYPES: &[&str] = &["string", "regexp"];

/// Tunables for one engine instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on passes over the breakdown work queue
    pub max_queue_passes: usize,

    /// Drop per-node breakdown maps once aggregates are built
    pub release_breakdowns: bool,

    /// Resolved nodes between progress reports
    pub progress_every: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_queue_passes: DEFAULT_MAX_QUEUE_PASSES,
            release_breakdowns: false,
            progress_every: DEFAULT_PROGRESS_EVERY,
        }
    }
}

impl EngineConfig {
    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_queue_passes == 0 {
            return Err(ConfigError::Invalid(
                "max_queue_passes must be greater than 0".to_string(),
            ));
        }
        if self.progress_every == 0 {
            return Err(ConfigError::Invalid(
                "progress_every must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load engine configuration from a TOML file
///
/// Missing keys fall back to their defaults.
///
/// # Example
/// ```ignore
/// let config = load_config("engine.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: EngineConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}
