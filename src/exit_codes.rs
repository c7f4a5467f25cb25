//! Process exit codes for the genhost binaries
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success, including runs that generated nothing |
//! | 1 | Internal failure |
//! | 2 | Invalid command-line arguments |
//! | 3 | The supervised worker failed |
//! | 4 | The worker could not be launched |

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);

    pub const FAILURE: ExitCode = ExitCode(1);

    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// The worker wrote to standard error
    pub const WORKER_FAILURE: ExitCode = ExitCode(3);

    pub const SPAWN_FAILURE: ExitCode = ExitCode(4);

    /// Use this with `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}
