//! JOSE error types.

use thiserror::Error;

/// Errors raised while handling JOSE key material.
#[derive(Debug, Error)]
pub enum JoseError {
    /// The JWA algorithm name is unknown or not usable for signatures.
    #[error("unsupported signature algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A key is missing a parameter required for its key type.
    #[error("key is missing required parameter '{0}'")]
    MissingParameter(&'static str),

    /// Key material could not be converted into a verification key.
    #[error("invalid key material: {0}")]
    InvalidKey(String),
}

/// Result type for JOSE operations.
pub type JoseResult<T> = Result<T, JoseError>;
