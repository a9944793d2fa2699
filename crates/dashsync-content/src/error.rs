//! Error types for dashsync-content

/// Result type for dashsync-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing a canonical form
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to serialize canonical form: {0}")]
    Json(#[from] serde_json::Error),
}
