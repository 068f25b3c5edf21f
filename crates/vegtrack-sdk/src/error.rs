//! Error types for the vegtrack SDK

use thiserror::Error;

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK error types
#[derive(Error, Debug)]
pub enum SdkError {
    /// Input rejected before any remote call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transient remote failure (network or service error)
    #[error("Remote error: {0}")]
    Remote(String),

    /// Local durable store unavailable
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Entry or catalog item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bearer credential rejected mid-operation
    #[error("Session expired")]
    SessionExpired,
}

impl From<vegtrack_api_client::ApiError> for SdkError {
    fn from(err: vegtrack_api_client::ApiError) -> Self {
        match err {
            vegtrack_api_client::ApiError::Unauthorized => SdkError::SessionExpired,
            vegtrack_api_client::ApiError::NotFound(what) => SdkError::NotFound(what),
            other => SdkError::Remote(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Persistence(err.to_string())
    }
}
