//! CLI entry point and dispatch

use clap::Parser;
use genhost_resolver::DylibLoader;

use super::args::{Cli, Commands};
use super::{run_supervised, run_worker};
use crate::ExitCode;

/// Parse arguments and run the selected command.
///
/// All output, including error messages, is written here; `main` only maps the
/// returned code to the process exit status. Invalid arguments make clap exit with
/// status 2 directly.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Worker(args) => run_worker(args, DylibLoader, cli.verbose),
        Commands::Run(args) => run_supervised(args, cli.verbose),
    }
}
