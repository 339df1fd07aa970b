//! Running a batch of requests and rendering the results for stdout

use anyhow::Result;
use runlet_core::{ExecutionRequest, ExecutionResult, ExecutionScheduler};
use std::sync::Arc;

/// Exit code when at least one execution failed.
pub const EXIT_FAILURE: i32 = 1;

/// JSON lines to print, in request order, and the process exit code.
#[derive(Debug, PartialEq, Eq)]
pub struct RunReport {
    pub lines: Vec<String>,
    pub exit_code: i32,
}

/// Submit every request at once and return results in submission order.
pub async fn execute_all(
    scheduler: Arc<ExecutionScheduler>,
    requests: Vec<ExecutionRequest>,
) -> Vec<ExecutionResult> {
    let handles: Vec<_> = requests
        .into_iter()
        .map(|request| {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.execute_request(&request).await })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle
            .await
            .unwrap_or_else(|e| ExecutionResult::failure(format!("execution task failed: {}", e)));
        results.push(result);
    }
    results
}

pub fn render(results: &[ExecutionResult]) -> Result<RunReport> {
    let lines = results
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    let exit_code = if results.iter().all(|r| r.success) {
        0
    } else {
        EXIT_FAILURE
    };
    Ok(RunReport { lines, exit_code })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use runlet_core::{CodeRunner, Dispatcher, ExecutorConfig, Language, RunnerAvailability};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    /// Echoes the code back; `fail` fails. Earlier requests sleep longer so they
    /// finish last.
    struct EchoRunner;

    #[async_trait]
    impl CodeRunner for EchoRunner {
        async fn run(&self, code: &str, _cancel: CancellationToken) -> ExecutionResult {
            let delay = code.trim_start_matches(|c: char| !c.is_ascii_digit());
            let delay = delay.parse::<u64>().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            if code.starts_with("fail") {
                ExecutionResult::failure_with_output("partial", "boom")
            } else {
                ExecutionResult::success(code)
            }
        }
    }

    fn scheduler() -> Arc<ExecutionScheduler> {
        let config = ExecutorConfig::new(5, 4);
        let dispatcher = Dispatcher::new(&config, RunnerAvailability::default())
            .with_runner(Language::Python3, Arc::new(EchoRunner));
        Arc::new(ExecutionScheduler::with_dispatcher(config, dispatcher).unwrap())
    }

    #[tokio::test]
    async fn test_lines_follow_argument_order() {
        let requests = vec![
            ExecutionRequest::new("ok 300", "python3"),
            ExecutionRequest::new("ok 150", "python3"),
            ExecutionRequest::new("ok 0", "python3"),
        ];
        let results = execute_all(scheduler(), requests).await;
        let report = render(&results).unwrap();

        assert_eq!(
            report,
            RunReport {
                lines: vec![
                    r#"{"success":true,"output":"ok 300","error":""}"#.to_string(),
                    r#"{"success":true,"output":"ok 150","error":""}"#.to_string(),
                    r#"{"success":true,"output":"ok 0","error":""}"#.to_string(),
                ],
                exit_code: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_any_failure_sets_exit_code() {
        let requests = vec![
            ExecutionRequest::new("ok 0", "python3"),
            ExecutionRequest::new("fail 0", "python3"),
            ExecutionRequest::new("ok 0", "ruby"),
        ];
        let results = execute_all(scheduler(), requests).await;
        let report = render(&results).unwrap();

        assert_eq!(report.exit_code, EXIT_FAILURE);
        assert_eq!(report.lines.len(), 3);
        assert_eq!(
            report.lines[1],
            r#"{"success":false,"output":"partial","error":"boom"}"#
        );
        assert_eq!(
            report.lines[2],
            r#"{"success":false,"output":"","error":"unsupported language: ruby"}"#
        );
    }

    #[test]
    fn test_empty_batch_succeeds() {
        let report = render(&[]).unwrap();
        assert!(report.lines.is_empty());
        assert_eq!(report.exit_code, 0);
    }
}
