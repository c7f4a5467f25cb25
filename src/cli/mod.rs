//! Command-line interface for genhost
//!
//! - `args`: clap definitions
//! - `run`: entry point and dispatch
//! - `worker`: the `worker` command, shared with the `genhost-stub` binary
//! - `supervise`: the `run` command

pub mod args;
mod run;
mod supervise;
mod worker;

pub use args::{Cli, Commands, RunArgs, WorkerArgs};
pub use run::run;
pub use supervise::run_supervised;
pub use worker::run_worker;
