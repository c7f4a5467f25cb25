//! Worker Runner: drives one generation run inside the worker process
//!
//! Generators run one at a time. Each one's `generate` step registers tasks on the
//! shared [`GenerationTracer`]; its `cleanup` step always follows. Once every generator
//! has run, all registered tasks execute together, the result is assembled, and a
//! non-empty result is framed for the supervisor.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use genhost_api::{CancellationToken, GeneratorConfiguration, GeneratorOptions};
use genhost_protocol::{BuildId, GenerationResult, SentinelFrame, encode};
use genhost_resolver::{GeneratorLoader, GeneratorResolver, ResolvedGenerator};
use genhost_runner::{DebuggerProbe, SystemDebuggerProbe};
use genhost_tracer::{GenerationTracer, LogSink, TracedResult, TracingSink};

use crate::error::WorkerError;

/// Name of the run log written when configuration enables logging
pub const RUN_LOG_FILE: &str = "genhost.log";

const DEBUGGER_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Outcome of one worker run.
#[derive(Debug, Clone, Default)]
pub struct WorkerRun {
    pub result: GenerationResult,
    /// Tracer snapshot after task execution
    pub traced: TracedResult,
    /// The framed token to print, absent when the result is empty or nothing ran
    pub frame: Option<String>,
}

/// Runs resolved generators against a project.
#[derive(Clone)]
pub struct Worker {
    resolver: GeneratorResolver,
    sink: Arc<dyn LogSink>,
    probe: Arc<dyn DebuggerProbe>,
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl Worker {
    pub fn new(loader: impl GeneratorLoader + 'static) -> Self {
        Self {
            resolver: GeneratorResolver::new(loader),
            sink: Arc::new(TracingSink),
            probe: Arc::new(SystemDebuggerProbe),
        }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub fn with_probe(mut self, probe: impl DebuggerProbe + 'static) -> Self {
        self.probe = Arc::new(probe);
        self
    }

    /// Execute one run.
    ///
    /// A blank build id or disabled configuration skips all generators and produces an
    /// empty run.
    ///
    /// # Errors
    ///
    /// Returns an error for an unusable build id or a result that cannot be encoded.
    /// Generator and task failures are logged on the tracer instead.
    pub async fn run(
        &self,
        options: &GeneratorOptions,
        config: &GeneratorConfiguration,
        cancel: &CancellationToken,
    ) -> Result<WorkerRun, WorkerError> {
        if options.build_id.trim().is_empty() {
            tracing::warn!("No build id supplied, skipping generation");
            return Ok(WorkerRun::default());
        }
        let build_id = BuildId::new(options.build_id.as_str())?;

        if config.disabled {
            tracing::info!("Code generation is disabled for this project");
            return Ok(WorkerRun::default());
        }

        if config.host_debugging {
            self.wait_for_debugger(Duration::from_secs(config.debugger_wait_secs))
                .await;
        }

        let tracer = GenerationTracer::new(Arc::clone(&self.sink));

        for resolved in self.resolver.resolve(&options.generators) {
            run_generator(&resolved, &tracer, config, options, cancel).await;
        }

        let traced = tracer.execute_generation_tasks(cancel).await;
        tracing::info!(
            files = traced.generated_files.len(),
            errors = traced.count(genhost_tracer::Severity::Error),
            "Generation tasks finished"
        );

        let mut plain_files = Vec::new();
        if config.logging
            && let Some(log_file) = write_run_log(options, &traced)
        {
            plain_files.push(log_file);
        }

        let result = assemble_result(&options.output_dir(), &traced.generated_files, &plain_files);

        let frame = if result.is_empty() {
            tracing::info!("No files generated, nothing to report");
            None
        } else {
            let token = encode(&result)?;
            Some(SentinelFrame::for_build(&build_id).wrap(&token))
        };

        Ok(WorkerRun {
            result,
            traced,
            frame,
        })
    }

    async fn wait_for_debugger(&self, limit: Duration) {
        let pid = std::process::id();
        tracing::info!(pid, "Waiting for a debugger to attach");

        let started = Instant::now();
        while started.elapsed() < limit {
            if self.probe.is_debugger_attached(pid) {
                tracing::info!(pid, "Debugger attached");
                return;
            }
            tokio::time::sleep(DEBUGGER_POLL_INTERVAL).await;
        }

        tracing::warn!(pid, ?limit, "No debugger attached, continuing");
    }
}

async fn run_generator(
    resolved: &ResolvedGenerator,
    tracer: &GenerationTracer,
    config: &GeneratorConfiguration,
    options: &GeneratorOptions,
    cancel: &CancellationToken,
) {
    let generator = resolved.generator();
    let name = generator.name().to_string();
    tracing::debug!(generator = %name, reference = resolved.reference(), "Running generator");

    let generated = AssertUnwindSafe(generator.generate(tracer, config, options, cancel))
        .catch_unwind()
        .await;
    match generated {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracer.add_error_log(&e, Some(&format!("generator {name} failed"))),
        Err(_) => tracer.add_error_log(
            &anyhow::anyhow!("generator panicked"),
            Some(&format!("generator {name} failed")),
        ),
    }

    let cleaned = AssertUnwindSafe(generator.cleanup()).catch_unwind().await;
    match cleaned {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracer.add_error_log(&e, Some(&format!("cleanup of {name} failed"))),
        Err(_) => tracer.add_error_log(
            &anyhow::anyhow!("cleanup panicked"),
            Some(&format!("cleanup of {name} failed")),
        ),
    }
}

/// Write the run options and every tracer log line next to the generated files.
fn write_run_log(options: &GeneratorOptions, traced: &TracedResult) -> Option<String> {
    let path = options.output_dir().join(RUN_LOG_FILE);

    let mut content = String::new();
    for (name, value) in options.entries() {
        let _ = writeln!(content, "{name} {value}");
    }
    content.push('\n');
    for entry in &traced.logs {
        let _ = writeln!(content, "{entry}");
    }

    let written = path
        .parent()
        .map_or(Ok(()), |dir| std::fs::create_dir_all(dir))
        .and_then(|()| std::fs::write(&path, content));

    match written {
        Ok(()) => Some(path.to_string_lossy().into_owned()),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to write run log");
            None
        }
    }
}

/// Build the final result: files deduplicated in first-seen order, plus the distinct
/// directories holding them.
#[must_use]
pub fn assemble_result(
    output_dir: &Path,
    code_files: &[String],
    plain_files: &[String],
) -> GenerationResult {
    let code_files = dedupe(code_files);
    let plain_files = dedupe(plain_files);
    let paths = generated_paths(output_dir, code_files.iter().chain(&plain_files));

    GenerationResult::new(code_files, plain_files, paths)
}

fn dedupe(items: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(item.as_str()))
        .cloned()
        .collect()
}

/// Distinct parent directories of `files`, excluding `output_dir` itself and empty
/// parents, sorted descending. A relative parent names the output directory when it is
/// a trailing part of it.
fn generated_paths<'a>(output_dir: &Path, files: impl Iterator<Item = &'a String>) -> Vec<String> {
    let is_output_dir =
        |dir: &Path| dir == output_dir || (dir.is_relative() && output_dir.ends_with(dir));

    let mut paths: Vec<String> = files
        .filter_map(|file| Path::new(file).parent())
        .filter(|parent| !parent.as_os_str().is_empty() && !is_output_dir(*parent))
        .map(|parent| parent.to_string_lossy().into_owned())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    paths.sort_unstable_by(|a, b| b.cmp(a));
    paths
}
