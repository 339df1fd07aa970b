// src/executors/runner.rs
use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tokio_util::task::AbortOnDropHandle;

use super::language::Language;
use super::staging::StagedSource;
use super::{CodeRunner, ExecutionResult};
use crate::errors::ExecutorError;

/// How long to keep reading a child's pipes after it exits or is killed. A
/// grandchild that inherited the pipes can hold them open indefinitely.
const PIPE_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Runs staged source with an external interpreter: `<binary> <staged file>`.
#[derive(Debug, Clone)]
pub struct InterpreterRunner {
    binary: String,
    prefix: String,
    suffix: String,
    runner_timeout: Duration,
}

enum Outcome {
    Exited(std::io::Result<ExitStatus>),
    Killed(String),
}

impl InterpreterRunner {
    pub fn new(
        binary: impl Into<String>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
        runner_timeout: Duration,
    ) -> Self {
        Self {
            binary: binary.into(),
            prefix: prefix.into(),
            suffix: suffix.into(),
            runner_timeout,
        }
    }

    pub fn for_language(
        language: Language,
        binary: impl Into<String>,
        runner_timeout: Duration,
    ) -> Self {
        Self::new(
            binary,
            format!("runlet-{}-", language.tag()),
            language.file_suffix(),
            runner_timeout,
        )
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn runner_timeout(&self) -> Duration {
        self.runner_timeout
    }

    async fn run_staged(
        &self,
        code: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ExecutorError> {
        let staged = StagedSource::write(&self.prefix, &self.suffix, code)?;

        let mut child = Command::new(&self.binary)
            .arg(staged.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecutorError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;
        log::debug!(
            "Spawned {} (pid {:?}) for {}",
            self.binary,
            child.id(),
            staged.path().display()
        );

        let stdout_reader = drain(child.stdout.take());
        let stderr_reader = drain(child.stderr.take());

        let outcome = tokio::select! {
            status = child.wait() => Outcome::Exited(status),
            _ = tokio::time::sleep(self.runner_timeout) => {
                log::warn!(
                    "{} exceeded runner deadline of {}s, killing it",
                    self.binary,
                    self.runner_timeout.as_secs()
                );
                Outcome::Killed(format!(
                    "exceeded runner deadline of {}s",
                    self.runner_timeout.as_secs()
                ))
            }
            _ = cancel.cancelled() => {
                log::debug!("Execution cancelled, killing {}", self.binary);
                Outcome::Killed("execution cancelled".to_string())
            }
        };

        if matches!(outcome, Outcome::Killed(_)) {
            if let Err(e) = child.kill().await {
                log::error!("Failed to kill {}: {}", self.binary, e);
            }
        }

        let stdout = collect(stdout_reader).await;
        let stderr = collect(stderr_reader).await;

        match outcome {
            Outcome::Exited(Ok(status)) if status.success() => Ok(stdout),
            Outcome::Exited(Ok(status)) => Err(ExecutorError::ProcessFailed {
                exit_code: status.code(),
                stdout,
                stderr,
            }),
            Outcome::Exited(Err(e)) => Err(ExecutorError::Io(e)),
            Outcome::Killed(reason) => Err(ExecutorError::Killed { reason, stdout }),
        }
    }
}

#[async_trait]
impl CodeRunner for InterpreterRunner {
    async fn run(&self, code: &str, cancel: CancellationToken) -> ExecutionResult {
        match self.run_staged(code, &cancel).await {
            Ok(output) => ExecutionResult::success(output),
            Err(e) => e.into(),
        }
    }
}

type SharedBuffer = Arc<Mutex<Vec<u8>>>;

// Readers are aborted if the runner future is dropped before collecting them.
fn drain<R>(reader: Option<R>) -> (SharedBuffer, AbortOnDropHandle<()>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let buffer = SharedBuffer::default();
    let sink = buffer.clone();
    let handle = AbortOnDropHandle::new(tokio::spawn(async move {
        let Some(mut reader) = reader else {
            return;
        };
        let mut chunk = [0u8; 8192];
        loop {
            match reader.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => match sink.lock() {
                    Ok(mut buf) => buf.extend_from_slice(&chunk[..n]),
                    Err(_) => break,
                },
                Err(e) => {
                    log::debug!("Error reading child output: {}", e);
                    break;
                }
            }
        }
    }));
    (buffer, handle)
}

// Whatever was read before the grace period ran out is kept.
async fn collect((buffer, mut reader): (SharedBuffer, AbortOnDropHandle<()>)) -> String {
    if tokio::time::timeout(PIPE_DRAIN_GRACE, &mut reader).await.is_err() {
        log::debug!("Child output still open after {:?}, giving up", PIPE_DRAIN_GRACE);
        reader.abort();
    }
    match buffer.lock() {
        Ok(buf) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) => String::new(),
    }
}
