//! The per-run generation tracer and its concurrent task fan-out

use std::future::Future;
use std::sync::Arc;

use anyhow::anyhow;
use futures::future::BoxFuture;
use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::append::AppendLog;
use crate::log::{LogEntry, LogSink, Severity, TracingSink};

/// Future returned by a generation task: the produced file path, or a failure.
///
/// A blank path means the task intentionally produced nothing.
pub type TaskFuture = BoxFuture<'static, anyhow::Result<String>>;

/// Deferred unit of work, executed exactly once.
pub type GenerationTask = Box<dyn FnOnce(CancellationToken) -> TaskFuture + Send>;

/// Snapshot of a tracer after execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TracedResult {
    /// Outputs of successful tasks, in completion order. May contain duplicates.
    pub generated_files: Vec<String>,
    /// Log entries in the order they were appended.
    pub logs: Vec<LogEntry>,
}

impl TracedResult {
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.logs
            .iter()
            .filter(|entry| entry.severity == severity)
            .count()
    }
}

struct Inner {
    generated_files: AppendLog<String>,
    logs: AppendLog<LogEntry>,
    pending: AppendLog<GenerationTask>,
    sink: Arc<dyn LogSink>,
}

/// Per-run coordination object for task registration, logging, and execution.
///
/// Cloning is cheap and every clone shares the same accumulators, so generators may
/// move clones into their tasks or into concurrent sub-operations.
#[derive(Clone)]
pub struct GenerationTracer {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for GenerationTracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationTracer")
            .field("generated_files", &self.inner.generated_files.len())
            .field("logs", &self.inner.logs.len())
            .field("pending", &self.inner.pending.len())
            .finish()
    }
}

impl Default for GenerationTracer {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl GenerationTracer {
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            inner: Arc::new(Inner {
                generated_files: AppendLog::new(),
                logs: AppendLog::new(),
                pending: AppendLog::new(),
                sink,
            }),
        }
    }

    pub fn add_info_log(&self, text: impl Into<String>) {
        self.append(LogEntry::now(Severity::Info, text));
    }

    pub fn add_warning_log(&self, text: impl Into<String>) {
        self.append(LogEntry::now(Severity::Warning, text));
    }

    /// Record a failure with its full cause chain and optional context.
    pub fn add_error_log(&self, error: &anyhow::Error, context: Option<&str>) {
        let mut message = format!("{error:?}");
        if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
            message.push_str("\nAdditional info: ");
            message.push_str(context);
        }
        self.append(LogEntry::now(Severity::Error, message));
    }

    /// Register a deferred task.
    ///
    /// The task receives a cancellation token when it eventually runs and decides
    /// for itself where to observe it, typically just before writing.
    pub fn add_generation_task<F, Fut>(&self, task: F)
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
    {
        self.inner
            .pending
            .push(Box::new(move |token: CancellationToken| {
                Box::pin(task(token)) as TaskFuture
            }));
    }

    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.inner.pending.len()
    }

    /// Run every registered task concurrently and return the resulting snapshot.
    ///
    /// There is no concurrency cap and no ordering between tasks. A failing or
    /// panicking task becomes an Error entry and does not affect its siblings; this
    /// method itself never fails. Tasks registered while execution is in progress run
    /// in a follow-up round of the same call.
    pub async fn execute_generation_tasks(&self, cancel: &CancellationToken) -> TracedResult {
        if Handle::try_current().is_err() {
            self.add_error_log(
                &anyhow!("no async runtime available to execute generation tasks"),
                None,
            );
            return self.snapshot();
        }

        loop {
            let tasks = self.inner.pending.drain();
            if tasks.is_empty() {
                break;
            }

            tracing::debug!(count = tasks.len(), "Executing generation tasks");

            let mut set = JoinSet::new();
            for task in tasks {
                let tracer = self.clone();
                let token = cancel.child_token();
                set.spawn(async move { tracer.execute_generation_task(task, token).await });
            }

            while let Some(joined) = set.join_next().await {
                if let Err(join_error) = joined {
                    self.add_error_log(
                        &anyhow::Error::new(join_error),
                        Some("generation task did not run to completion"),
                    );
                }
            }
        }

        self.snapshot()
    }

    async fn execute_generation_task(&self, task: GenerationTask, token: CancellationToken) {
        match task(token).await {
            Ok(path) if path.trim().is_empty() => {}
            Ok(path) => self.inner.generated_files.push(path),
            Err(error) => self.add_error_log(&error, None),
        }
    }

    /// Files produced so far, duplicates included.
    #[must_use]
    pub fn generated_files(&self) -> Vec<String> {
        self.inner.generated_files.snapshot()
    }

    #[must_use]
    pub fn logs(&self) -> Vec<LogEntry> {
        self.inner.logs.snapshot()
    }

    #[must_use]
    pub fn snapshot(&self) -> TracedResult {
        TracedResult {
            generated_files: self.generated_files(),
            logs: self.logs(),
        }
    }

    fn append(&self, entry: LogEntry) {
        self.inner.sink.record(&entry);
        self.inner.logs.push(entry);
    }
}
