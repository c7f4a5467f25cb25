//! Generation tracer
//!
//! A [`GenerationTracer`] is created once per worker run and handed to every generator.
//! Generators use it to register deferred file-producing tasks and to append log
//! entries; the worker then runs every registered task in a single concurrent fan-out
//! and reads back the produced files and logs.
//!
//! All accumulators are [`AppendLog`]s: safe for any number of concurrent writers,
//! read by a single consumer once execution completes.

mod append;
mod log;
mod tracer;

pub use append::AppendLog;
pub use log::{LogEntry, LogSink, NullSink, Severity, TracingSink};
pub use tracer::{GenerationTask, GenerationTracer, TaskFuture, TracedResult};

/// Cancellation signal observed cooperatively by generation tasks.
pub use tokio_util::sync::CancellationToken;
