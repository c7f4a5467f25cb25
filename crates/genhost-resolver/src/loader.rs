//! Loaders turning a library reference into its export table

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use genhost_api::{
    API_VERSION_SYMBOL, ApiVersionFn, EXPORTS_SYMBOL, ExportedType, ExportsFn,
    GENHOST_API_VERSION,
};
use libloading::Library;

use crate::error::ResolveError;

/// Export table of one loaded library.
///
/// `handle` keeps the library mapped; it is shared with every generator constructed
/// from the table.
pub struct LoadedLibrary {
    pub exports: Vec<ExportedType>,
    pub handle: Option<Arc<dyn Any + Send + Sync>>,
}

impl LoadedLibrary {
    #[must_use]
    pub fn new(exports: Vec<ExportedType>) -> Self {
        Self {
            exports,
            handle: None,
        }
    }

    #[must_use]
    pub fn with_handle(exports: Vec<ExportedType>, handle: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            exports,
            handle: Some(handle),
        }
    }
}

impl fmt::Debug for LoadedLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedLibrary")
            .field("exports", &self.exports)
            .field("has_handle", &self.handle.is_some())
            .finish()
    }
}

/// Turns a library reference into its export table.
pub trait GeneratorLoader: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the reference does not name a loadable library.
    fn load(&self, reference: &str) -> Result<LoadedLibrary, ResolveError>;
}

/// In-memory export tables keyed by reference.
#[derive(Debug, Default, Clone)]
pub struct RegistryLoader {
    libraries: HashMap<String, Vec<ExportedType>>,
}

impl RegistryLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, reference: impl Into<String>, exports: Vec<ExportedType>) {
        self.libraries.insert(reference.into(), exports);
    }

    #[must_use]
    pub fn with_library(mut self, reference: impl Into<String>, exports: Vec<ExportedType>) -> Self {
        self.register(reference, exports);
        self
    }
}

impl GeneratorLoader for RegistryLoader {
    fn load(&self, reference: &str) -> Result<LoadedLibrary, ResolveError> {
        self.libraries
            .get(reference)
            .map(|exports| LoadedLibrary::new(exports.clone()))
            .ok_or_else(|| ResolveError::NotFound {
                path: reference.to_string(),
            })
    }
}

/// Loads shared libraries built with `genhost_api::export_generators!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DylibLoader;

impl DylibLoader {
    fn symbol_error(path: &str, symbol: &[u8]) -> ResolveError {
        let symbol = symbol.strip_suffix(b"\0").unwrap_or(symbol);
        ResolveError::MissingSymbol {
            path: path.to_string(),
            symbol: String::from_utf8_lossy(symbol).into_owned(),
        }
    }
}

impl GeneratorLoader for DylibLoader {
    fn load(&self, reference: &str) -> Result<LoadedLibrary, ResolveError> {
        let path = Path::new(reference);
        if !path.is_file() {
            return Err(ResolveError::NotFound {
                path: reference.to_string(),
            });
        }

        // SAFETY: loading runs the library's initializers. Generator libraries are build
        // inputs chosen by the project and are trusted to the same degree as the build.
        let library = unsafe { Library::new(path) }.map_err(|e| ResolveError::Load {
            path: reference.to_string(),
            reason: e.to_string(),
        })?;

        // SAFETY: the symbol types match the signatures emitted by `export_generators!`.
        let version = unsafe {
            let version = library
                .get::<ApiVersionFn>(API_VERSION_SYMBOL)
                .map_err(|_| Self::symbol_error(reference, API_VERSION_SYMBOL))?;
            version()
        };

        if version != GENHOST_API_VERSION {
            return Err(ResolveError::ApiVersionMismatch {
                path: reference.to_string(),
                found: version,
                expected: GENHOST_API_VERSION,
            });
        }

        // SAFETY: as above; the version check guarantees a compatible export table.
        let exports = unsafe {
            let exports = library
                .get::<ExportsFn>(EXPORTS_SYMBOL)
                .map_err(|_| Self::symbol_error(reference, EXPORTS_SYMBOL))?;
            exports()
        };

        Ok(LoadedLibrary::with_handle(exports, Arc::new(library)))
    }
}

/// Tries each loader in order and returns the first success.
#[derive(Default, Clone)]
pub struct ChainLoader {
    loaders: Vec<Arc<dyn GeneratorLoader>>,
}

impl ChainLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, loader: impl GeneratorLoader + 'static) -> Self {
        self.loaders.push(Arc::new(loader));
        self
    }
}

impl fmt::Debug for ChainLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainLoader")
            .field("loaders", &self.loaders.len())
            .finish()
    }
}

impl GeneratorLoader for ChainLoader {
    /// The error of the last loader is returned when none succeeds.
    fn load(&self, reference: &str) -> Result<LoadedLibrary, ResolveError> {
        let mut last_error = ResolveError::NotFound {
            path: reference.to_string(),
        };

        for loader in &self.loaders {
            match loader.load(reference) {
                Ok(library) => return Ok(library),
                Err(e) => last_error = e,
            }
        }

        Err(last_error)
    }
}
