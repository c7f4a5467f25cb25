//! Error types for the genhost worker

use thiserror::Error;

use genhost_protocol::ProtocolError;

/// Worker-level failures.
///
/// These are the only failures the worker reports on standard error. Failures of
/// individual generators or tasks are logged and never become a `WorkerError`.
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("Failed to write the result frame: {0}")]
    Emit(#[source] std::io::Error),

    #[error("Failed to start the async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
