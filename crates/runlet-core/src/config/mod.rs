//! Configuration module for the execution scheduler
//!
//! Settings come from an optional YAML file, environment overrides and
//! programmatic builders, and are validated before a scheduler is built.

pub mod loader;
pub mod types;

pub use loader::*;
pub use types::*;

#[cfg(test)]
mod tests;

use crate::errors::ExecutorError;
use std::path::Path;

/// Load a configuration from a YAML file
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<ExecutorConfig, ExecutorError> {
    ConfigLoader::from_file(path).await
}
