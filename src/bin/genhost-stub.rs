//! Stub worker for end-to-end testing
//!
//! Accepts the same options as `genhost worker`, but resolves generators from the
//! built-in `stub:` registry instead of loading plugin libraries:
//!
//! - `stub:two-tasks`: produces `a.cs`, one task fails
//! - `stub:write-files`: writes two files under the output directory
//! - `stub:empty`: produces nothing
//! - `stub:sleep`: blocks for a minute
//! - `stub:stderr`: writes to standard error
//! - `stub:panicking`, `stub:panicking-task`, `stub:failing`: failures the worker contains
//! - `stub:helpers-only`: a library without usable generators

use clap::Parser;
use genhost::cli::WorkerArgs;

#[derive(Parser, Debug)]
#[command(name = "genhost-stub", version, about = "Stub genhost worker for testing")]
struct StubCli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(flatten)]
    args: WorkerArgs,
}

fn main() {
    let cli = StubCli::parse();

    if let Err(code) = genhost::cli::run_worker(cli.args, genhost::stub::registry(), cli.verbose) {
        std::process::exit(code.as_i32());
    }
}
