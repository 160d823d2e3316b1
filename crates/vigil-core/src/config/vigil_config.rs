//! Top-level Vigil configuration with layered resolution.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{DispatchConfig, ObservabilityConfig, RunLoopConfig, ScoringConfig, StorageConfig};
use crate::constants::ENV_PREFIX;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`VIGIL_*`)
/// 2. TOML config file
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VigilConfig {
    /// The validator's own identity on the ledger.
    pub identity: String,
    pub runloop: RunLoopConfig,
    pub scoring: ScoringConfig,
    pub dispatch: DispatchConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

impl VigilConfig {
    /// Load configuration from an optional TOML file, then apply `VIGIL_*`
    /// environment overrides and validate the result.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(std::env::vars())?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file. Does not validate.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `VIGIL_*` overrides from an iterator of `(name, value)` pairs.
    /// Unknown variables are ignored.
    pub fn apply_overrides<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            let Some(key) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match key {
                "IDENTITY" => self.identity = value,
                "EPOCH_LENGTH" => self.runloop.epoch_length = parse_override(&name, &value)?,
                "POLL_INTERVAL_MS" => {
                    self.runloop.poll_interval_ms = parse_override(&name, &value)?
                }
                "NUM_CONCURRENT_FORWARDS" => {
                    self.runloop.num_concurrent_forwards = parse_override(&name, &value)?
                }
                "DISABLE_SET_WEIGHTS" => {
                    self.runloop.disable_set_weights = parse_override(&name, &value)?
                }
                "ALPHA" => self.scoring.moving_average_alpha = parse_override(&name, &value)?,
                "SAMPLE_SIZE" => self.dispatch.sample_size = parse_override(&name, &value)?,
                "QUERY_TIMEOUT_MS" => {
                    self.dispatch.query_timeout_ms = parse_override(&name, &value)?
                }
                "DB_PATH" => self.storage.db_path = value,
                "JSON_LOGS" => self.observability.json_logs = parse_override(&name, &value)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identity.trim().is_empty() {
            return Err(invalid("identity", "must not be empty"));
        }
        let alpha = self.scoring.moving_average_alpha;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(invalid("scoring.moving_average_alpha", "must be in (0, 1]"));
        }
        if self.runloop.epoch_length == 0 {
            return Err(invalid("runloop.epoch_length", "must be greater than 0"));
        }
        if self.runloop.poll_interval_ms == 0 {
            return Err(invalid("runloop.poll_interval_ms", "must be greater than 0"));
        }
        if self.runloop.num_concurrent_forwards == 0 {
            return Err(invalid(
                "runloop.num_concurrent_forwards",
                "must be greater than 0",
            ));
        }
        if self.runloop.weights_every_epochs == 0 {
            return Err(invalid("runloop.weights_every_epochs", "must be greater than 0"));
        }
        if self.runloop.save_every_epochs == 0 {
            return Err(invalid("runloop.save_every_epochs", "must be greater than 0"));
        }
        if self.runloop.ledger_write_timeout_ms == 0 {
            return Err(invalid(
                "runloop.ledger_write_timeout_ms",
                "must be greater than 0",
            ));
        }
        if self.dispatch.sample_size == 0 {
            return Err(invalid("dispatch.sample_size", "must be greater than 0"));
        }
        if self.dispatch.query_timeout_ms == 0 {
            return Err(invalid("dispatch.query_timeout_ms", "must be greater than 0"));
        }
        if self.dispatch.max_in_flight == 0 {
            return Err(invalid("dispatch.max_in_flight", "must be greater than 0"));
        }
        if self.storage.db_path.trim().is_empty() {
            return Err(invalid("storage.db_path", "must not be empty"));
        }
        Ok(())
    }
}

fn parse_override<T: FromStr>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidOverride {
            var: var.to_string(),
            message: e.to_string(),
        })
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
