use thiserror::Error;

/// Reasons a library or type is skipped during resolution.
///
/// These never escape [`GeneratorResolver::resolve`](crate::GeneratorResolver::resolve);
/// they are logged at debug level and the offending entry is left out.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Generator library not found: {path}")]
    NotFound { path: String },

    #[error("Failed to load generator library {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("Generator library {path} does not export {symbol}")]
    MissingSymbol { path: String, symbol: String },

    #[error("Generator library {path} targets API version {found}, expected {expected}")]
    ApiVersionMismatch {
        path: String,
        found: u32,
        expected: u32,
    },

    #[error("Type {type_name} has no zero-argument constructor")]
    NoConstructor { type_name: String },

    #[error("Constructing {type_name} failed: {reason}")]
    ConstructionFailed { type_name: String, reason: String },

    #[error("Constructor of {type_name} panicked")]
    ConstructorPanicked { type_name: String },

    #[error("Constructed {type_name} does not implement the generator capability")]
    NotAGenerator { type_name: String },
}
