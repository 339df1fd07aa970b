use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::availability::RunnerAvailability;
use super::language::Language;
use super::runner::InterpreterRunner;
use super::{CodeRunner, ExecutionResult};
use crate::config::ExecutorConfig;
use crate::errors::ExecutorError;

/// Maps a language tag to its runner. Holds no concurrency of its own.
#[derive(Clone)]
pub struct Dispatcher {
    runners: HashMap<Language, Arc<dyn CodeRunner>>,
    availability: RunnerAvailability,
}

impl Dispatcher {
    /// Registers an [`InterpreterRunner`] for every known language.
    pub fn new(config: &ExecutorConfig, availability: RunnerAvailability) -> Self {
        let runners = Language::ALL
            .into_iter()
            .map(|language| {
                let runner: Arc<dyn CodeRunner> = Arc::new(InterpreterRunner::for_language(
                    language,
                    config.interpreters.binary_for(language),
                    config.runner_timeout_duration(),
                ));
                (language, runner)
            })
            .collect();

        Self {
            runners,
            availability,
        }
    }

    /// Replace the runner used for `language`.
    pub fn with_runner(mut self, language: Language, runner: Arc<dyn CodeRunner>) -> Self {
        self.runners.insert(language, runner);
        self
    }

    pub fn availability(&self) -> &RunnerAvailability {
        &self.availability
    }

    pub async fn dispatch(
        &self,
        code: &str,
        language: &str,
        cancel: CancellationToken,
    ) -> ExecutionResult {
        match self.resolve(language) {
            Ok(runner) => runner.run(code, cancel).await,
            Err(e) => {
                log::debug!("Refusing dispatch: {}", e);
                e.into()
            }
        }
    }

    fn resolve(&self, tag: &str) -> Result<&Arc<dyn CodeRunner>, ExecutorError> {
        let language = Language::from_tag(tag)
            .ok_or_else(|| ExecutorError::UnsupportedLanguage(tag.to_string()))?;

        if !self.availability.is_available(language) {
            return Err(ExecutorError::RuntimeUnavailable(
                language.display_name().to_string(),
            ));
        }

        self.runners
            .get(&language)
            .ok_or_else(|| ExecutorError::UnsupportedLanguage(tag.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRunner {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CodeRunner for CountingRunner {
        async fn run(&self, code: &str, _cancel: CancellationToken) -> ExecutionResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ExecutionResult::success(format!("ran: {}", code))
        }
    }

    fn dispatcher_with(node_available: bool) -> (Dispatcher, Arc<CountingRunner>) {
        let runner = Arc::new(CountingRunner {
            calls: AtomicUsize::new(0),
        });
        let dispatcher = Dispatcher::new(
            &ExecutorConfig::default(),
            RunnerAvailability::fixed([(Language::NodeJs, node_available)]),
        )
        .with_runner(Language::Python3, runner.clone())
        .with_runner(Language::NodeJs, runner.clone());
        (dispatcher, runner)
    }

    #[tokio::test]
    async fn routes_known_tags_to_runner() {
        let (dispatcher, runner) = dispatcher_with(true);
        let result = dispatcher
            .dispatch("x = 1", "python3", CancellationToken::new())
            .await;
        assert_eq!(result, ExecutionResult::success("ran: x = 1"));

        dispatcher
            .dispatch("1", "nodejs", CancellationToken::new())
            .await;
        assert_eq!(runner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unsupported_language_names_the_tag() {
        let (dispatcher, runner) = dispatcher_with(true);
        for code in ["", "print(1)", "\0garbage"] {
            let result = dispatcher
                .dispatch(code, "unsupported-xyz", CancellationToken::new())
                .await;
            assert!(!result.success);
            assert_eq!(result.error, "unsupported language: unsupported-xyz");
        }
        assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unavailable_node_is_refused_without_running() {
        let (dispatcher, runner) = dispatcher_with(false);
        let result = dispatcher
            .dispatch("console.log(1)", "nodejs", CancellationToken::new())
            .await;
        assert!(!result.success);
        assert_eq!(
            result.error,
            "Node.js runtime is not installed or not available"
        );
        assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
    }
}
