//! Error types for worker supervision

use thiserror::Error;

/// Failures that prevent the supervisor from observing a worker run at all.
///
/// Everything that happens after a successful launch, including timeouts and a failing
/// worker, is reported through [`Outcome`](crate::Outcome) instead.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Invalid worker request: {reason}")]
    InvalidRequest { reason: String },

    #[error("Failed to spawn worker '{program}': {reason}")]
    Spawn { program: String, reason: String },

    #[error("Worker {stream} was not captured")]
    MissingPipe { stream: &'static str },

    #[error("Failed to wait for worker: {reason}")]
    Wait { reason: String },
}
