//! Generator plugin resolution
//!
//! [`GeneratorResolver`] turns a `,`/`;` separated list of library references into a lazy
//! sequence of generator instances. How a reference becomes an export table is delegated
//! to a [`GeneratorLoader`]: [`DylibLoader`] opens shared libraries, [`RegistryLoader`]
//! serves in-memory tables, and [`ChainLoader`] tries several loaders in turn.
//!
//! Resolution never fails. A library that cannot be loaded is skipped whole; a type that
//! cannot be instantiated is skipped alone.

mod error;
mod loader;
mod resolver;

pub use error::ResolveError;
pub use loader::{ChainLoader, DylibLoader, GeneratorLoader, LoadedLibrary, RegistryLoader};
pub use resolver::{GeneratorResolver, ResolvedGenerator};
