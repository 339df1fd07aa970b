//! Code execution through short-lived interpreter processes.
//!
//! Layered leaves first: [`runner`] stages source and drives one child process,
//! [`availability`] probes optional runtimes once, [`dispatcher`] maps a language
//! tag to a runner, and [`scheduler`] bounds concurrency and races each request
//! against its overall deadline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::errors::ExecutorError;

pub mod availability;
pub mod dispatcher;
pub mod language;
pub mod runner;
pub mod scheduler;
mod staging;

/// Outcome of one execution. `success` is authoritative; `output` may be
/// non-empty on failure when the child wrote to stdout before dying.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub output: String,
    pub error: String,
}

impl ExecutionResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: String::new(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: error.into(),
        }
    }

    pub fn failure_with_output(output: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
            error: error.into(),
        }
    }
}

impl From<ExecutorError> for ExecutionResult {
    fn from(err: ExecutorError) -> Self {
        let output = err.partial_output().unwrap_or_default().to_string();
        ExecutionResult::failure_with_output(output, err.to_string())
    }
}

/// A single submitted snippet. The language tag is deliberately a free string;
/// it is only classified at dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub code: String,
    pub language: String,
}

impl ExecutionRequest {
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
        }
    }
}

/// Runs source text for one language.
///
/// Implementations must stop promptly once `cancel` fires and must never panic
/// on bad input; every failure is reported through the returned result.
#[async_trait]
pub trait CodeRunner: Send + Sync {
    async fn run(&self, code: &str, cancel: CancellationToken) -> ExecutionResult;
}

/// Entry point for callers that only need "run this code in that language".
#[async_trait]
pub trait CodeExecutor: Send + Sync {
    async fn execute_code(&self, language: &str, code: &str) -> ExecutionResult;
}
