//! Export table describing the types a plugin library makes available

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::generator::CodeGenerator;

/// Version of the plugin ABI. Libraries built against another version are not loaded.
pub const GENHOST_API_VERSION: u32 = 1;

/// Symbol returning the library's [`GENHOST_API_VERSION`]
pub const API_VERSION_SYMBOL: &[u8] = b"genhost_api_version\0";
/// Symbol returning the library's export table
pub const EXPORTS_SYMBOL: &[u8] = b"genhost_generator_exports\0";

pub type ApiVersionFn = unsafe extern "C" fn() -> u32;
pub type ExportsFn = unsafe extern "Rust" fn() -> Vec<ExportedType>;

/// A constructed value of an exported type.
///
/// Values that satisfy the generator capability hold an `Arc<dyn CodeGenerator>`; see
/// [`into_instance`].
pub type Instance = Box<dyn Any + Send>;

/// Zero-argument constructor of an exported type
pub type Constructor = fn() -> anyhow::Result<Instance>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Concrete,
    Abstract,
}

/// One publicly exported type of a plugin library.
#[derive(Clone)]
pub struct ExportedType {
    pub name: String,
    pub kind: ExportKind,
    /// Whether the type declares the generator capability
    pub implements_generator: bool,
    pub constructor: Option<Constructor>,
}

impl fmt::Debug for ExportedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportedType")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("implements_generator", &self.implements_generator)
            .field("has_constructor", &self.constructor.is_some())
            .finish()
    }
}

impl ExportedType {
    pub fn new(
        name: impl Into<String>,
        kind: ExportKind,
        implements_generator: bool,
        constructor: Option<Constructor>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            implements_generator,
            constructor,
        }
    }

    /// A concrete generator type built through its `Default` implementation.
    pub fn generator<T>(name: impl Into<String>) -> Self
    where
        T: CodeGenerator + Default + 'static,
    {
        Self::new(name, ExportKind::Concrete, true, Some(construct_default::<T>))
    }

    /// Whether the resolver should try to construct this type.
    #[must_use]
    pub fn is_candidate(&self) -> bool {
        self.kind == ExportKind::Concrete && self.implements_generator
    }
}

/// Wrap a generator so the resolver recognizes it as satisfying the capability.
pub fn into_instance<T: CodeGenerator + 'static>(generator: T) -> Instance {
    Box::new(Arc::new(generator) as Arc<dyn CodeGenerator>)
}

/// Constructor for any `Default` generator.
///
/// # Errors
///
/// Never fails; the signature matches [`Constructor`].
pub fn construct_default<T>() -> anyhow::Result<Instance>
where
    T: CodeGenerator + Default + 'static,
{
    Ok(into_instance(T::default()))
}
