//! Error types for the Connect resource reconciler

use thiserror::Error;

use crate::client::ApiError;

/// Result type alias using the reconciler's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Reconciler error types
///
/// `MalformedIdentifier`, `RemoteOperationFailed` and `ValidationRejected` are terminal for
/// the operation that produced them; nothing in this crate retries them.
#[derive(Error, Debug)]
pub enum Error {
    /// Composite identifier could not be decoded
    #[error("Malformed identifier '{id}': expected {expected}")]
    MalformedIdentifier { id: String, expected: String },

    /// Remote call failed or returned an unusable response
    #[error("{operation} failed for {kind} ({target}): {source}")]
    RemoteOperationFailed {
        kind: &'static str,
        operation: &'static str,
        target: String,
        #[source]
        source: ApiError,
    },

    /// Declared attributes violate a cross-field rule
    #[error("Validation error: {0}")]
    ValidationRejected(String),

    /// Operation aborted through the context's cancellation token
    #[error("{operation} cancelled for {kind} ({target})")]
    Cancelled {
        kind: &'static str,
        operation: &'static str,
        target: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metrics encoding error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::ValidationRejected(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a remote operation error
    pub fn remote(
        kind: &'static str,
        operation: &'static str,
        target: impl Into<String>,
        source: ApiError,
    ) -> Self {
        Error::RemoteOperationFailed {
            kind,
            operation,
            target: target.into(),
            source,
        }
    }

    /// Whether the remote API reported the entity as missing
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::RemoteOperationFailed {
                source: ApiError::NotFound(_),
                ..
            }
        )
    }
}
