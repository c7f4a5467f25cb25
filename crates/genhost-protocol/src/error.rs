//! Error types for the protocol crate

use thiserror::Error;

/// Errors raised while building protocol values.
///
/// Decoding never produces one of these; a token that cannot be decoded is simply absent.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Build id must not be blank")]
    BlankBuildId,

    #[error("Build id '{id}' is not usable for framing: {reason}")]
    InvalidBuildId { id: String, reason: String },

    #[error("Value cannot be represented in the result document: {value:?}")]
    UnrepresentableText { value: String },

    #[error("Failed to compress result document: {0}")]
    Compression(#[from] std::io::Error),
}
