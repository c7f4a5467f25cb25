use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use genhost_protocol::{BuildId, GenerationResult, SentinelFrame, decode};
use serde::Serialize;
use tokio::time::timeout;

use crate::capture::LineCapture;
use crate::command_spec::CommandSpec;
use crate::debugger::{DebuggerProbe, SystemDebuggerProbe};
use crate::error::RunnerError;
use crate::platform;
use crate::timeout::TimeoutPolicy;

/// How long stream readers may keep running once the worker has exited.
pub const DEFAULT_DRAIN_WINDOW: Duration = Duration::from_secs(2);

/// States a supervised run passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SupervisorState {
    NotStarted,
    Running,
    Completed,
    TimedOutDebugging,
    Killed,
    Finished,
    Failed,
    Empty,
    Success,
}

/// How the wait for the worker ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitOutcome {
    /// Exited within the timeout
    Completed,
    /// Outlived the timeout with a debugger attached and was awaited until it exited
    TimedOutDebugging,
    /// Outlived the timeout and was terminated
    Killed,
}

impl From<WaitOutcome> for SupervisorState {
    fn from(wait: WaitOutcome) -> Self {
        match wait {
            WaitOutcome::Completed => Self::Completed,
            WaitOutcome::TimedOutDebugging => Self::TimedOutDebugging,
            WaitOutcome::Killed => Self::Killed,
        }
    }
}

/// Terminal interpretation of a worker run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The worker wrote to standard error
    Failed { stderr: String },
    /// No framed token, an undecodable token, or an empty result
    Empty,
    Success(GenerationResult),
}

impl Outcome {
    fn state(&self) -> SupervisorState {
        match self {
            Self::Failed { .. } => SupervisorState::Failed,
            Self::Empty => SupervisorState::Empty,
            Self::Success(_) => SupervisorState::Success,
        }
    }
}

/// Everything observed about one supervised run.
#[derive(Debug, Clone, Serialize)]
pub struct SupervisorReport {
    pub build_id: String,
    pub states: Vec<SupervisorState>,
    pub wait: WaitOutcome,
    /// `None` when the worker was ended by a signal
    pub exit_code: Option<i32>,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Launches worker processes and interprets their output.
#[derive(Clone)]
pub struct Supervisor {
    policy: TimeoutPolicy,
    probe: Arc<dyn DebuggerProbe>,
    drain_window: Duration,
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("policy", &self.policy)
            .field("drain_window", &self.drain_window)
            .finish_non_exhaustive()
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new(TimeoutPolicy::default())
    }
}

impl Supervisor {
    #[must_use]
    pub fn new(policy: TimeoutPolicy) -> Self {
        Self {
            policy,
            probe: Arc::new(SystemDebuggerProbe),
            drain_window: DEFAULT_DRAIN_WINDOW,
        }
    }

    #[must_use]
    pub fn with_probe(mut self, probe: impl DebuggerProbe + 'static) -> Self {
        self.probe = Arc::new(probe);
        self
    }

    #[must_use]
    pub fn with_drain_window(mut self, drain_window: Duration) -> Self {
        self.drain_window = drain_window;
        self
    }

    #[must_use]
    pub fn policy(&self) -> TimeoutPolicy {
        self.policy
    }

    /// Run a worker to completion and interpret its output.
    ///
    /// `timeout` is resolved through the [`TimeoutPolicy`]. A worker still running when
    /// it elapses is killed together with its process group, unless a debugger is
    /// attached to it.
    ///
    /// # Errors
    ///
    /// Returns an error only if the worker cannot be launched or awaited. A failing,
    /// silent or killed worker is reported through [`SupervisorReport::outcome`].
    pub async fn run(
        &self,
        command: &CommandSpec,
        build_id: &BuildId,
        timeout_request: Option<Duration>,
    ) -> Result<SupervisorReport, RunnerError> {
        let mut states = vec![SupervisorState::NotStarted];

        let mut cmd = command.to_tokio_command();
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        platform::isolate(&mut cmd);

        let mut child = cmd.spawn().map_err(|e| RunnerError::Spawn {
            program: command.program.to_string_lossy().into_owned(),
            reason: e.to_string(),
        })?;
        states.push(SupervisorState::Running);

        let pid = child.id();
        tracing::debug!(pid, command = %command.display(), "Worker started");

        let stdout = child
            .stdout
            .take()
            .ok_or(RunnerError::MissingPipe { stream: "stdout" })?;
        let stderr = child
            .stderr
            .take()
            .ok_or(RunnerError::MissingPipe { stream: "stderr" })?;
        let stdout = LineCapture::spawn(stdout, "stdout");
        let stderr = LineCapture::spawn(stderr, "stderr");

        let limit = self.policy.resolve(timeout_request);
        let wait_error = |e: std::io::Error| RunnerError::Wait {
            reason: e.to_string(),
        };

        let (wait, status) = match timeout(limit, child.wait()).await {
            Ok(status) => (WaitOutcome::Completed, Some(status.map_err(wait_error)?)),
            Err(_) if pid.is_some_and(|pid| self.probe.is_debugger_attached(pid)) => {
                tracing::info!(pid, ?limit, "Worker timed out with a debugger attached, waiting");
                let status = child.wait().await.map_err(wait_error)?;
                (WaitOutcome::TimedOutDebugging, Some(status))
            }
            Err(_) => {
                tracing::warn!(pid, ?limit, "Worker timed out, killing it");
                platform::terminate(&mut child);
                (WaitOutcome::Killed, child.wait().await.ok())
            }
        };
        states.push(wait.into());
        states.push(SupervisorState::Finished);

        let stdout = stdout.finish(self.drain_window).await;
        let stderr = stderr.finish(self.drain_window).await;

        let outcome = interpret(build_id, &stdout, &stderr);
        states.push(outcome.state());

        tracing::debug!(?wait, outcome = ?outcome.state(), "Worker finished");

        Ok(SupervisorReport {
            build_id: build_id.to_string(),
            states,
            wait,
            exit_code: status.and_then(|status| status.code()),
            stdout,
            stderr,
            outcome,
        })
    }
}

/// Interpret captured worker output.
///
/// Non-blank standard error fails the run regardless of standard output. Otherwise the
/// first token framed for `build_id` is decoded; a missing frame, an undecodable token
/// and an empty result are all [`Outcome::Empty`].
#[must_use]
pub fn interpret(build_id: &BuildId, stdout: &[String], stderr: &[String]) -> Outcome {
    let stderr = stderr.join("\n");
    if !stderr.trim().is_empty() {
        return Outcome::Failed { stderr };
    }

    let stdout = stdout.join("\n");
    let frame = SentinelFrame::for_build(build_id);

    match frame.extract(&stdout).and_then(decode) {
        Some(result) if !result.is_empty() => Outcome::Success(result),
        _ => Outcome::Empty,
    }
}
