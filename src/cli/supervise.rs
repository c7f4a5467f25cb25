use std::time::Duration;

use genhost_api::GeneratorOptions;
use genhost_protocol::BuildId;
use genhost_runner::{Outcome, RunnerError, Supervisor, TimeoutPolicy};

use super::args::RunArgs;
use crate::ExitCode;
use crate::invocation::WorkerInvocation;
use crate::logging::{LogTarget, init_tracing};
use crate::supervise::supervise;

/// Launch a worker for the given options and print the report as JSON on stdout.
pub fn run_supervised(args: RunArgs, verbose: bool) -> Result<(), ExitCode> {
    let _ = init_tracing(verbose, LogTarget::Stderr);

    let build_id = match args.build_id.as_deref() {
        Some(id) => BuildId::new(id).map_err(|e| {
            eprintln!("✗ {e}");
            ExitCode::CLI_ARGS
        })?,
        None => BuildId::generate(),
    };

    let invocation = match args.worker {
        Some(ref worker) => WorkerInvocation::binary(worker),
        None => WorkerInvocation::current_exe().map_err(|e| {
            eprintln!("✗ Failed to locate the genhost executable: {e}");
            ExitCode::FAILURE
        })?,
    };

    let options = GeneratorOptions {
        build_id: build_id.to_string(),
        project_dir: args.project_dir,
        output_path: args.output_path,
        root_namespace: args.root_namespace,
        external_references: args.external_references,
        generators: args.generators,
    };

    let runtime = tokio::runtime::Runtime::new().map_err(|e| {
        eprintln!("✗ Failed to create async runtime: {e}");
        ExitCode::FAILURE
    })?;

    let supervisor = Supervisor::new(TimeoutPolicy::default());
    let timeout = args.timeout_ms.map(Duration::from_millis);

    let report = runtime
        .block_on(supervise(&supervisor, &invocation, options, timeout))
        .map_err(|e| {
            eprintln!("✗ {e}");
            match e {
                RunnerError::Spawn { .. } => ExitCode::SPAWN_FAILURE,
                _ => ExitCode::FAILURE,
            }
        })?;

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("✗ Failed to serialize report: {e}");
            return Err(ExitCode::FAILURE);
        }
    }

    match report.outcome() {
        Outcome::Failed { .. } => Err(ExitCode::WORKER_FAILURE),
        Outcome::Empty | Outcome::Success(_) => Ok(()),
    }
}
