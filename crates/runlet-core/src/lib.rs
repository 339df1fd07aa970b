//! Bounded execution of untrusted code snippets through external interpreters.
//!
//! A caller hands over source text and a language tag; the crate stages the text
//! into a scoped temporary file, runs the matching interpreter as a child process
//! and returns the captured output as an [`ExecutionResult`]. The interesting part
//! is the scheduling layer around that:
//!
//! - **Admission control**: a fixed pool of slots caps how many executions run at once
//! - **Deadlines**: an overall per-request deadline raced against the runner, plus the
//!   runner's own deadline around the child process
//! - **Cancellation**: a timed-out request cancels its runner, which kills the child
//! - **Uniform results**: every failure mode is folded into one result shape
//!
//! No process isolation is attempted here. Anything needing real sandboxing must
//! layer it underneath the [`CodeRunner`] seam.

pub mod config;
pub mod errors;
pub mod executors;

pub use config::{ConfigLoader, ExecutorConfig, InterpreterConfig};
pub use errors::ExecutorError;
pub use executors::availability::RunnerAvailability;
pub use executors::dispatcher::Dispatcher;
pub use executors::language::Language;
pub use executors::runner::InterpreterRunner;
pub use executors::scheduler::ExecutionScheduler;
pub use executors::{CodeExecutor, CodeRunner, ExecutionRequest, ExecutionResult};
