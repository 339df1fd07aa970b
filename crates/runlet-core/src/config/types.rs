//! Configuration types for the execution scheduler

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ExecutorError;
use crate::executors::language::Language;

/// Scheduler and runner settings. All durations are whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Overall per-request deadline enforced by the scheduler
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Size of the concurrency slot pool
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    /// Deadline each runner applies around its child process
    #[serde(default = "default_runner_timeout")]
    pub runner_timeout: u64,
    #[serde(default)]
    pub interpreters: InterpreterConfig,
}

/// Interpreter binaries, looked up on `PATH` unless given as paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpreterConfig {
    #[serde(default = "default_python_binary")]
    pub python3: String,
    #[serde(default = "default_node_binary")]
    pub nodejs: String,
}

fn default_timeout() -> u64 {
    10
}

fn default_max_workers() -> usize {
    4
}

fn default_runner_timeout() -> u64 {
    30
}

fn default_python_binary() -> String {
    Language::Python3.default_binary().to_string()
}

fn default_node_binary() -> String {
    Language::NodeJs.default_binary().to_string()
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            max_workers: default_max_workers(),
            runner_timeout: default_runner_timeout(),
            interpreters: InterpreterConfig::default(),
        }
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            python3: default_python_binary(),
            nodejs: default_node_binary(),
        }
    }
}

impl InterpreterConfig {
    pub fn binary_for(&self, language: Language) -> &str {
        match language {
            Language::Python3 => &self.python3,
            Language::NodeJs => &self.nodejs,
        }
    }
}

impl ExecutorConfig {
    pub fn new(timeout: u64, max_workers: usize) -> Self {
        Self {
            timeout,
            max_workers,
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_runner_timeout(mut self, runner_timeout: u64) -> Self {
        self.runner_timeout = runner_timeout;
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn runner_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.runner_timeout)
    }

    pub fn validate(&self) -> Result<(), ExecutorError> {
        if self.timeout == 0 {
            return Err(ExecutorError::Config(
                "timeout must be at least 1 second".to_string(),
            ));
        }
        if self.max_workers == 0 {
            return Err(ExecutorError::Config(
                "max_workers must be at least 1".to_string(),
            ));
        }
        if self.runner_timeout == 0 {
            return Err(ExecutorError::Config(
                "runner_timeout must be at least 1 second".to_string(),
            ));
        }
        for language in Language::ALL {
            if self.interpreters.binary_for(language).trim().is_empty() {
                return Err(ExecutorError::Config(format!(
                    "interpreter binary for {} cannot be empty",
                    language
                )));
            }
        }
        if self.runner_timeout > self.timeout {
            log::debug!(
                "runner_timeout ({}s) exceeds timeout ({}s); the scheduler deadline will fire first",
                self.runner_timeout,
                self.timeout
            );
        }
        Ok(())
    }
}
