use std::io::Write;
use std::path::Path;

use genhost_api::{CancellationToken, GeneratorConfiguration, GeneratorOptions};
use genhost_resolver::GeneratorLoader;

use super::args::WorkerArgs;
use crate::ExitCode;
use crate::error::WorkerError;
use crate::logging::{LogTarget, init_tracing, install_panic_hook};
use crate::worker::{Worker, WorkerRun};

/// Run the worker with generators served by `loader`.
///
/// Logs go to stdout. Standard error is written only for a worker-level failure, which
/// the supervisor treats as a failed run.
pub fn run_worker(
    args: WorkerArgs,
    loader: impl GeneratorLoader + 'static,
    verbose: bool,
) -> Result<(), ExitCode> {
    let _ = init_tracing(verbose, LogTarget::Stdout);
    install_panic_hook();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("genhost worker: {}", WorkerError::Runtime(e));
            return Err(ExitCode::FAILURE);
        }
    };

    let options = GeneratorOptions::from(args);
    let config = load_configuration(&options.project_dir);
    let worker = Worker::new(loader);
    let cancel = CancellationToken::new();

    let outcome = runtime.block_on(async {
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, cancelling generation tasks");
                on_interrupt.cancel();
            }
        });

        worker.run(&options, &config, &cancel).await
    });

    match outcome.and_then(emit) {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("genhost worker: {e}");
            Err(ExitCode::FAILURE)
        }
    }
}

fn load_configuration(project_dir: &Path) -> GeneratorConfiguration {
    match GeneratorConfiguration::discover(project_dir) {
        Ok(Some(config)) => config,
        Ok(None) => GeneratorConfiguration::default(),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unusable configuration file");
            GeneratorConfiguration::default()
        }
    }
}

fn emit(run: WorkerRun) -> Result<(), WorkerError> {
    if let Some(frame) = run.frame {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{frame}")
            .and_then(|()| stdout.flush())
            .map_err(WorkerError::Emit)?;
    }
    Ok(())
}
