//! Error taxonomy for the edge cache core.

use thiserror::Error;

/// Error taxonomy for cache and provider operations (spec §7).
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    /// Missing or invalid inbound parameter.
    #[error("validation error: {0}")]
    Validation(String),

    /// Provider responded with a semantic "no such entity".
    #[error("not found: {0}")]
    NotFound(String),

    /// Timeout, connection refused, or other transport-level failure.
    #[error("upstream transport error: {0}")]
    UpstreamTransport(String),

    /// Provider returned 2xx with an embedded failure indicator.
    #[error("upstream semantic error: {0}")]
    UpstreamSemantic(String),

    /// Coalescer or worker failure not covered by the above.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias used throughout the crate family.
pub type Result<T> = std::result::Result<T, CoreError>;
