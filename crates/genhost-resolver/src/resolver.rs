//! Lazy resolution of library references into generator instances

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use genhost_api::{CodeGenerator, ExportedType, split_generator_list};

use crate::error::ResolveError;
use crate::loader::{GeneratorLoader, LoadedLibrary};

/// A generator instance together with where it came from.
pub struct ResolvedGenerator {
    generator: Arc<dyn CodeGenerator>,
    type_name: String,
    reference: String,
    // Declared last so the generator is dropped before its library is unmapped.
    _library: Option<Arc<dyn Any + Send + Sync>>,
}

impl ResolvedGenerator {
    #[must_use]
    pub fn generator(&self) -> &Arc<dyn CodeGenerator> {
        &self.generator
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Library reference the generator was resolved from
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }
}

impl fmt::Debug for ResolvedGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedGenerator")
            .field("type_name", &self.type_name)
            .field("reference", &self.reference)
            .finish_non_exhaustive()
    }
}

/// Resolves generator lists through a [`GeneratorLoader`].
#[derive(Clone)]
pub struct GeneratorResolver {
    loader: Arc<dyn GeneratorLoader>,
}

impl fmt::Debug for GeneratorResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorResolver").finish_non_exhaustive()
    }
}

impl GeneratorResolver {
    pub fn new(loader: impl GeneratorLoader + 'static) -> Self {
        Self {
            loader: Arc::new(loader),
        }
    }

    #[must_use]
    pub fn from_shared(loader: Arc<dyn GeneratorLoader>) -> Self {
        Self { loader }
    }

    /// Lazily resolve every generator named by `generators`.
    ///
    /// Libraries are loaded in list order as the sequence is consumed; within a library,
    /// generators follow the library's export order.
    pub fn resolve<'a>(&'a self, generators: &'a str) -> impl Iterator<Item = ResolvedGenerator> + 'a {
        split_generator_list(generators)
            .filter_map(move |reference| self.load(reference))
            .flat_map(|(reference, library)| instantiate_all(reference, library))
    }

    fn load<'a>(&self, reference: &'a str) -> Option<(&'a str, LoadedLibrary)> {
        match self.loader.load(reference) {
            Ok(library) => {
                tracing::debug!(
                    reference,
                    exports = library.exports.len(),
                    "Loaded generator library"
                );
                Some((reference, library))
            }
            Err(e) => {
                tracing::debug!(reference, error = %e, "Skipping generator library");
                None
            }
        }
    }
}

fn instantiate_all(reference: &str, library: LoadedLibrary) -> impl Iterator<Item = ResolvedGenerator> {
    let LoadedLibrary { exports, handle } = library;
    let reference = reference.to_string();

    exports
        .into_iter()
        .filter(ExportedType::is_candidate)
        .filter_map(move |export| match instantiate(&export) {
            Ok(generator) => Some(ResolvedGenerator {
                generator,
                type_name: export.name,
                reference: reference.clone(),
                _library: handle.clone(),
            }),
            Err(e) => {
                tracing::debug!(reference = %reference, error = %e, "Skipping generator type");
                None
            }
        })
}

fn instantiate(export: &ExportedType) -> Result<Arc<dyn CodeGenerator>, ResolveError> {
    let constructor = export.constructor.ok_or_else(|| ResolveError::NoConstructor {
        type_name: export.name.clone(),
    })?;

    let instance = panic::catch_unwind(AssertUnwindSafe(constructor))
        .map_err(|_| ResolveError::ConstructorPanicked {
            type_name: export.name.clone(),
        })?
        .map_err(|e| ResolveError::ConstructionFailed {
            type_name: export.name.clone(),
            reason: format!("{e:#}"),
        })?;

    instance
        .downcast::<Arc<dyn CodeGenerator>>()
        .map(|generator| *generator)
        .map_err(|_| ResolveError::NotAGenerator {
            type_name: export.name.clone(),
        })
}
