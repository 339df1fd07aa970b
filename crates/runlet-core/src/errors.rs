//! Error types for every way a snippet execution can fail
//!
//! Each variant corresponds to the boundary where the failure happens: staging the
//! source, classifying the language, finding the runtime, running the child process,
//! or waiting on the overall deadline. None of these reach the caller of
//! `ExecutionScheduler::execute` as an `Err`; they are folded into a failed
//! `ExecutionResult` whose error text is the variant's `Display` output.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("failed to stage source: {0}")]
    Staging(#[source] std::io::Error),
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("{0} runtime is not installed or not available")]
    RuntimeUnavailable(String),
    #[error("failed to start {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{}", failure_message(.exit_code, .stderr))]
    ProcessFailed {
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    #[error("process killed: {reason}")]
    Killed { reason: String, stdout: String },
    #[error("execution timed out after {0}s")]
    Timeout(u64),
    #[error("execution task failed: {0}")]
    TaskFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExecutorError {
    /// Standard output the child produced before failing, if any.
    pub fn partial_output(&self) -> Option<&str> {
        match self {
            ExecutorError::ProcessFailed { stdout, .. } | ExecutorError::Killed { stdout, .. } => {
                Some(stdout.as_str())
            }
            _ => None,
        }
    }
}

// Standard error is passed through verbatim; the exit status only stands in when
// the interpreter failed silently.
fn failure_message(exit_code: &Option<i32>, stderr: &str) -> String {
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    match exit_code {
        Some(code) => format!("process exited with status {}", code),
        None => "process terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_failure_uses_stderr_verbatim() {
        let err = ExecutorError::ProcessFailed {
            exit_code: Some(1),
            stdout: "partial\n".to_string(),
            stderr: "Traceback (most recent call last):\n".to_string(),
        };
        assert_eq!(err.to_string(), "Traceback (most recent call last):\n");
        assert_eq!(err.partial_output(), Some("partial\n"));
    }

    #[test]
    fn silent_process_failure_reports_status() {
        let err = ExecutorError::ProcessFailed {
            exit_code: Some(3),
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "process exited with status 3");

        let err = ExecutorError::ProcessFailed {
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "process terminated by signal");
    }

    #[test]
    fn timeout_message_names_duration() {
        assert_eq!(
            ExecutorError::Timeout(7).to_string(),
            "execution timed out after 7s"
        );
        assert!(ExecutorError::Timeout(7).partial_output().is_none());
    }
}
