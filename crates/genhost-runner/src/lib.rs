//! Supervision of the genhost worker process
//!
//! [`Supervisor`] launches a worker described by a [`CommandSpec`], captures its output
//! line by line while waiting for it to exit, and interprets the captured streams:
//! any non-blank standard error fails the run, otherwise the sentinel-framed token on
//! standard output is decoded into a [`GenerationResult`](genhost_protocol::GenerationResult).
//!
//! A worker that outlives its timeout is killed, unless a debugger is attached to it, in
//! which case the supervisor waits for it without a bound.
//!
//! # Security Model
//!
//! All process execution goes through [`CommandSpec`], so arguments are passed as
//! discrete argv elements and never through a shell.

mod capture;
pub mod command_spec;
pub mod debugger;
pub mod error;
mod platform;
pub mod supervisor;
pub mod timeout;

pub use command_spec::CommandSpec;
pub use debugger::{DebuggerProbe, FixedDebuggerProbe, SystemDebuggerProbe};
pub use error::RunnerError;
pub use supervisor::{
    DEFAULT_DRAIN_WINDOW, Outcome, Supervisor, SupervisorReport, SupervisorState, WaitOutcome,
    interpret,
};
pub use timeout::TimeoutPolicy;
