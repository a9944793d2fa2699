//! Error types for dashsync-core

use std::path::PathBuf;

/// Result type for dashsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reconciling a dashboard
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote service has no dashboard with this uid
    #[error("Dashboard not found: {uid}")]
    NotFound { uid: String },

    /// The requested uid is already taken by another dashboard
    #[error("Dashboard uid already in use: {uid}")]
    Conflict { uid: String },

    /// The folder reference does not resolve to an existing folder
    #[error("Folder not found: {folder}")]
    Reference { folder: String },

    /// The remote service could not be reached or is unavailable
    #[error("Transient remote error: {message}")]
    Transient { message: String },

    /// The desired configuration cannot be sent to the remote service
    #[error("Malformed dashboard config: {reason}")]
    MalformedConfig { reason: String },

    /// Settings could not be read
    #[error("Invalid settings in {path}: {message}")]
    Settings { path: PathBuf, message: String },

    /// Normalization error from dashsync-content
    #[error(transparent)]
    Content(#[from] dashsync_content::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    pub fn not_found(uid: impl Into<String>) -> Self {
        Self::NotFound { uid: uid.into() }
    }

    pub fn conflict(uid: impl Into<String>) -> Self {
        Self::Conflict { uid: uid.into() }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedConfig {
            reason: reason.into(),
        }
    }

    /// Whether a later reconciliation pass can recover from this error
    ///
    /// `NotFound` leads to recreation, `Transient` to a caller retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Transient { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
