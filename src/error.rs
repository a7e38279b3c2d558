//! Error types for the village atlas.

use thiserror::Error;

/// Main error type for atlas operations.
///
/// No variant is fatal; every failure leaves the local mirror untouched and
/// is recoverable by retrying the operation.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("Remote store error: {0}")]
    Remote(String),

    #[error("Write failed for village {id}: {reason}")]
    WriteFailed { id: String, reason: String },

    #[error("Delete failed for village {id}: {reason}")]
    DeleteFailed { id: String, reason: String },

    #[error("Subscription error: {0}")]
    Subscription(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("CSV export error: {0}")]
    Export(String),
}

impl From<serde_json::Error> for AtlasError {
    fn from(e: serde_json::Error) -> Self {
        AtlasError::Serialization(e.to_string())
    }
}

impl From<csv::Error> for AtlasError {
    fn from(e: csv::Error) -> Self {
        AtlasError::Export(e.to_string())
    }
}

impl From<std::string::FromUtf8Error> for AtlasError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        AtlasError::Export(e.to_string())
    }
}

/// Result type for atlas operations.
pub type Result<T> = std::result::Result<T, AtlasError>;
