//! Configuration loader for YAML files and environment overrides
//!
//! Values are read from YAML first, then `RUNLET_TIMEOUT`, `RUNLET_MAX_WORKERS`
//! and `RUNLET_RUNNER_TIMEOUT` override them, then the result is validated.

use std::env;
use std::path::Path;
use std::str::FromStr;
use tokio::fs;

use crate::config::types::ExecutorConfig;
use crate::errors::ExecutorError;

pub const ENV_TIMEOUT: &str = "RUNLET_TIMEOUT";
pub const ENV_MAX_WORKERS: &str = "RUNLET_MAX_WORKERS";
pub const ENV_RUNNER_TIMEOUT: &str = "RUNLET_RUNNER_TIMEOUT";

/// Configuration loader with environment resolution
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<ExecutorConfig, ExecutorError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).await.map_err(|e| {
            ExecutorError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_str(content: &str) -> Result<ExecutorConfig, ExecutorError> {
        // An empty document means "all defaults".
        let mut config: ExecutorConfig = if content.trim().is_empty() {
            ExecutorConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| {
                ExecutorError::Config(format!("Failed to parse YAML config: {}", e))
            })?
        };

        Self::apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a config file.
    pub fn from_env() -> Result<ExecutorConfig, ExecutorError> {
        let mut config = ExecutorConfig::default();
        Self::apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(config: &mut ExecutorConfig) -> Result<(), ExecutorError> {
        if let Some(timeout) = Self::env_value(ENV_TIMEOUT)? {
            config.timeout = timeout;
        }
        if let Some(max_workers) = Self::env_value(ENV_MAX_WORKERS)? {
            config.max_workers = max_workers;
        }
        if let Some(runner_timeout) = Self::env_value(ENV_RUNNER_TIMEOUT)? {
            config.runner_timeout = runner_timeout;
        }
        Ok(())
    }

    fn env_value<T: FromStr>(key: &str) -> Result<Option<T>, ExecutorError>
    where
        T::Err: std::fmt::Display,
    {
        match env::var(key) {
            Ok(raw) => raw.trim().parse().map(Some).map_err(|e| {
                ExecutorError::Config(format!("Invalid value '{}' for {}: {}", raw, key, e))
            }),
            Err(_) => Ok(None),
        }
    }
}
