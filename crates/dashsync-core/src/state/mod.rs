//! Persisted dashboard state
//!
//! [`PersistedDashboard`] is what the surrounding configuration layer keeps
//! between reconciliation passes. [`StateFile`] is a file-backed store for it.

mod file;

pub use file::{StateEntry, StateFile};

use dashsync_content::StoredFormat;
use serde::{Deserialize, Serialize};

/// Last-applied state of one dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedDashboard {
    /// Stable handle, also the remote lookup key
    pub uid: String,
    /// Server-assigned numeric id
    pub dashboard_id: i64,
    /// Remote version at the last read or write
    pub version: i64,
    /// Numeric parent folder id
    pub folder: i64,
    /// Folder reference the configuration asked for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_ref: Option<String>,
    /// Absolute dashboard URL, derived from uid and title
    pub url: String,
    /// Canonical JSON text, or its SHA-256 digest in hashing mode
    pub config_json: String,
    /// Whether the configuration sets the uid itself
    ///
    /// When it does not, the server-assigned uid is kept out of
    /// `config_json` so the configuration keeps matching.
    #[serde(default)]
    pub uid_pinned: bool,
}

impl PersistedDashboard {
    /// Format of `config_json`
    pub fn stored_format(&self) -> StoredFormat {
        StoredFormat::of(&self.config_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_format_detects_digest() {
        let mut state = PersistedDashboard {
            uid: "basic".to_string(),
            dashboard_id: 1,
            version: 1,
            folder: 0,
            folder_ref: None,
            url: "http://localhost/d/basic/t".to_string(),
            config_json: r#"{"title":"T","uid":"basic"}"#.to_string(),
            uid_pinned: true,
        };
        assert_eq!(state.stored_format(), StoredFormat::Json);

        state.config_json = dashsync_content::compute_digest(&state.config_json);
        assert_eq!(state.stored_format(), StoredFormat::Digest);
    }
}
