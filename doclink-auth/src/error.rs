//! Error types for the identity layer.

use thiserror::Error;

/// Result type for raw identity-provider calls.
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors that can occur talking to the identity provider.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The provider rejected the request and said why.
    #[error("{name} ({code}): {message}")]
    Provider {
        code: String,
        name: String,
        message: String,
    },

    /// An operation that needs an active session was called without one.
    #[error("no active session")]
    NotSignedIn,

    /// Response could not be parsed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
