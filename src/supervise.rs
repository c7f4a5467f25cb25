//! Supervisor side of a generation run

use std::time::Duration;

use genhost_api::GeneratorOptions;
use genhost_protocol::BuildId;
use genhost_runner::{Outcome, RunnerError, Supervisor, SupervisorReport};
use serde::Serialize;

use crate::invocation::{WorkerInvocation, dedupe_generator_list};

/// Result of [`supervise`].
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RunReport {
    /// The generator list was empty, so no worker was started
    NotLaunched {
        build_id: String,
        #[serde(flatten)]
        outcome: Outcome,
    },
    Launched(SupervisorReport),
}

impl RunReport {
    #[must_use]
    pub fn outcome(&self) -> &Outcome {
        match self {
            Self::NotLaunched { outcome, .. } => outcome,
            Self::Launched(report) => &report.outcome,
        }
    }
}

/// Launch a worker for `options` and interpret its output.
///
/// The generator list is deduplicated first; when nothing remains the run is reported
/// as [`Outcome::Empty`] without starting a process. `options.build_id` must already
/// hold a valid build id.
///
/// # Errors
///
/// Returns an error if the build id is invalid or the worker cannot be launched.
pub async fn supervise(
    supervisor: &Supervisor,
    invocation: &WorkerInvocation,
    mut options: GeneratorOptions,
    timeout: Option<Duration>,
) -> Result<RunReport, RunnerError> {
    options.generators = dedupe_generator_list(&options.generators);

    if options.generators.is_empty() {
        tracing::info!("No generators configured, skipping worker");
        return Ok(RunReport::NotLaunched {
            build_id: options.build_id,
            outcome: Outcome::Empty,
        });
    }

    let build_id =
        BuildId::new(options.build_id.as_str()).map_err(|e| RunnerError::InvalidRequest {
            reason: e.to_string(),
        })?;
    let command = invocation.command(&options);

    tracing::info!(build_id = %build_id, generators = %options.generators, "Launching worker");
    let report = supervisor.run(&command, &build_id, timeout).await?;

    match &report.outcome {
        Outcome::Failed { stderr } => tracing::warn!(%stderr, "Worker failed"),
        Outcome::Empty => tracing::info!("Worker reported no generated files"),
        Outcome::Success(result) => tracing::info!(
            code_files = result.generated_code_files.len(),
            plain_files = result.generated_plain_files.len(),
            "Worker reported generated files"
        ),
    }

    Ok(RunReport::Launched(report))
}
