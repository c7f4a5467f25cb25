//! Composition of worker command lines

use std::collections::HashSet;
use std::path::PathBuf;

use genhost_api::{GeneratorOptions, split_generator_list};
use genhost_runner::CommandSpec;

/// How the supervisor launches a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerInvocation {
    pub program: PathBuf,
    /// Arguments placed before the run options, such as a subcommand
    pub leading_args: Vec<String>,
}

impl WorkerInvocation {
    /// A dedicated worker binary that takes run options directly.
    pub fn binary(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// The `worker` subcommand of a `genhost` executable.
    pub fn subcommand(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: vec!["worker".to_string()],
        }
    }

    /// The `worker` subcommand of the running executable.
    ///
    /// # Errors
    ///
    /// Returns an error if the current executable cannot be located.
    pub fn current_exe() -> std::io::Result<Self> {
        std::env::current_exe().map(Self::subcommand)
    }

    /// Build the command for one run. Empty option values are left out.
    #[must_use]
    pub fn command(&self, options: &GeneratorOptions) -> CommandSpec {
        CommandSpec::new(&self.program)
            .args(&self.leading_args)
            .args(options.to_args())
    }
}

/// Drop duplicate and blank entries from a generator list, keeping first-seen order.
#[must_use]
pub fn dedupe_generator_list(list: &str) -> String {
    let mut seen = HashSet::new();
    split_generator_list(list)
        .filter(|entry| seen.insert(*entry))
        .collect::<Vec<_>>()
        .join(";")
}
