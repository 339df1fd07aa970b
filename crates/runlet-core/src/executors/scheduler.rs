//! Admission control and deadline racing for snippet executions.
//!
//! Every request takes a slot from a fixed-size pool, dispatches on its own task
//! and races that task against the configured overall deadline. The slot is held
//! until the task has finished or been torn down, so the pool size is a hard
//! bound on live executions, not just on waiting callers.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::availability::RunnerAvailability;
use super::dispatcher::Dispatcher;
use super::{CodeExecutor, ExecutionRequest, ExecutionResult};
use crate::config::ExecutorConfig;
use crate::errors::ExecutorError;

/// How long a cancelled dispatch task gets to wind down before it is aborted.
const CANCEL_GRACE: Duration = Duration::from_millis(500);

pub struct ExecutionScheduler {
    slots: Arc<Semaphore>,
    slot_count: u32,
    timeout: Duration,
    dispatcher: Arc<Dispatcher>,
}

impl ExecutionScheduler {
    /// Validate `config`, probe optional runtimes once and register the default runners.
    pub async fn new(config: ExecutorConfig) -> Result<Self, ExecutorError> {
        config.validate()?;
        let availability = RunnerAvailability::detect(&config).await;
        let dispatcher = Dispatcher::new(&config, availability);
        Self::with_dispatcher(config, dispatcher)
    }

    pub fn with_dispatcher(
        config: ExecutorConfig,
        dispatcher: Dispatcher,
    ) -> Result<Self, ExecutorError> {
        config.validate()?;
        let slot_count = u32::try_from(config.max_workers)
            .ok()
            .filter(|n| (*n as usize) <= Semaphore::MAX_PERMITS)
            .ok_or_else(|| {
                ExecutorError::Config(format!("max_workers {} is too large", config.max_workers))
            })?;

        log::info!(
            "Execution scheduler ready: {} slots, {}s timeout",
            slot_count,
            config.timeout
        );

        Ok(Self {
            slots: Arc::new(Semaphore::new(config.max_workers)),
            slot_count,
            timeout: config.timeout_duration(),
            dispatcher: Arc::new(dispatcher),
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_workers(&self) -> usize {
        self.slot_count as usize
    }

    pub fn availability(&self) -> &RunnerAvailability {
        self.dispatcher.availability()
    }

    /// Run `code` as `language`. Never fails: every problem is reported in the result.
    pub async fn execute(&self, code: &str, language: &str) -> ExecutionResult {
        let id = Uuid::new_v4();

        let slot = match self.slots.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => return ExecutorError::TaskFailed(e.to_string()).into(),
        };
        log::debug!("[{}] admitted {} request", id, language);

        let cancel = CancellationToken::new();
        // Dropping this future mid-flight must still stop the child.
        let _cancel_on_drop = cancel.clone().drop_guard();

        // The task owns the slot: it is freed when the task ends or is aborted,
        // not when the caller stops waiting.
        let mut task = tokio::spawn({
            let dispatcher = self.dispatcher.clone();
            let code = code.to_string();
            let language = language.to_string();
            let cancel = cancel.clone();
            async move {
                let _slot = slot;
                dispatcher.dispatch(&code, &language, cancel).await
            }
        });

        let result = tokio::select! {
            joined = &mut task => match joined {
                Ok(result) => result,
                Err(e) => {
                    log::error!("[{}] dispatch task failed: {}", id, e);
                    ExecutorError::TaskFailed(e.to_string()).into()
                }
            },
            _ = tokio::time::sleep(self.timeout) => {
                log::warn!(
                    "[{}] {} request exceeded {}s, cancelling",
                    id,
                    language,
                    self.timeout.as_secs()
                );
                cancel.cancel();
                if tokio::time::timeout(CANCEL_GRACE, &mut task).await.is_err() {
                    log::warn!("[{}] dispatch task ignored cancellation, aborting", id);
                    task.abort();
                }
                ExecutorError::Timeout(self.timeout.as_secs()).into()
            }
        };

        log::info!(
            "[{}] {} request finished (success: {})",
            id,
            language,
            result.success
        );
        result
    }

    pub async fn execute_request(&self, request: &ExecutionRequest) -> ExecutionResult {
        self.execute(&request.code, &request.language).await
    }

    /// Wait until every slot is free, i.e. no execution is in flight.
    ///
    /// Nothing is cancelled and new admissions are not blocked afterwards; callers
    /// must stop submitting work themselves.
    pub async fn shutdown(&self) {
        log::info!("Draining {} execution slots", self.slot_count);
        match self.slots.acquire_many(self.slot_count).await {
            Ok(all) => {
                drop(all);
                log::info!("All executions finished");
            }
            Err(e) => log::error!("Slot pool unavailable during shutdown: {}", e),
        }
    }
}

#[async_trait]
impl CodeExecutor for ExecutionScheduler {
    async fn execute_code(&self, language: &str, code: &str) -> ExecutionResult {
        self.execute(code, language).await
    }
}
