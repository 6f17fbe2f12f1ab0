//! Error types for store backends.

use thiserror::Error;

/// Result type for backend operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur talking to a store backend.
///
/// `Provider` is the recognizable vendor error — the repository passes its
/// code, name and message through verbatim. Everything else collapses into
/// the caller-facing unknown error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("network error: {0}")]
    Network(String),

    /// The store rejected the request and said why.
    #[error("{name} ({code}): {message}")]
    Provider {
        code: String,
        name: String,
        message: String,
    },

    /// Payload could not be serialized or the response could not be parsed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
