//! genhost - build-time code generation host
//!
//! A build invokes genhost to run generator plugins for a project. The work is split
//! across a process boundary:
//!
//! - the **worker** ([`Worker`]) resolves generator plugins, lets each register deferred
//!   tasks on a shared tracer, runs every task concurrently, and prints the resulting
//!   file list as a sentinel-framed token on standard output;
//! - the **supervisor** ([`supervise`]) launches the worker, enforces a timeout that is
//!   suspended while a debugger is attached, and decodes the token.
//!
//! The building blocks live in their own crates and are re-exported here:
//!
//! - [`protocol`]: result token codec, build ids, sentinel frames
//! - [`tracer`]: generation tracer and log entries
//! - [`config`]: generator configuration discovery
//! - [`api`]: the generator plugin contract
//! - [`resolver`]: plugin loading
//! - [`runner`]: process supervision
//!
//! # Example
//!
//! ```rust,no_run
//! use genhost::{GeneratorConfiguration, GeneratorOptions, Worker};
//! use genhost::tracer::CancellationToken;
//!
//! # async fn example() -> Result<(), genhost::WorkerError> {
//! let worker = Worker::new(genhost::resolver::DylibLoader);
//! let options = GeneratorOptions {
//!     build_id: "genhost_local".to_string(),
//!     project_dir: ".".into(),
//!     output_path: "obj/gen".to_string(),
//!     generators: "target/release/libwrappers.so".to_string(),
//!     ..GeneratorOptions::default()
//! };
//!
//! let run = worker
//!     .run(&options, &GeneratorConfiguration::default(), &CancellationToken::new())
//!     .await?;
//! println!("{} files", run.result.generated_code_files.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod error;
pub mod exit_codes;
pub mod invocation;
pub mod logging;
#[doc(hidden)]
pub mod stub;
pub mod supervise;
pub mod worker;

pub use genhost_api as api;
pub use genhost_config as config;
pub use genhost_protocol as protocol;
pub use genhost_resolver as resolver;
pub use genhost_runner as runner;
pub use genhost_tracer as tracer;

pub use error::WorkerError;
pub use exit_codes::ExitCode;
pub use genhost_api::{GeneratorConfiguration, GeneratorOptions};
pub use invocation::WorkerInvocation;
pub use supervise::{RunReport, supervise};
pub use worker::{Worker, WorkerRun};
