//! Generator configuration for genhost
//!
//! Configuration is read from the project directory: `codegen.json` is preferred, then
//! `appsettings.json`. Only the `CodeGenerator` section is consulted; its name and its
//! field names are matched case-insensitively. The whole section is also kept verbatim
//! as [`GeneratorConfiguration::raw`] for generators with settings of their own.

mod discovery;
mod error;
mod model;

pub use discovery::{CONFIG_FILE_CANDIDATES, SECTION_NAME};
pub use error::ConfigError;
pub use model::{DEFAULT_DEBUGGER_WAIT_SECS, GeneratorConfiguration};
