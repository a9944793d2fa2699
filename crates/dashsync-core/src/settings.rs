//! Session settings
//!
//! Settings are read once when a reconciliation session starts and handed to
//! the [`crate::Reconciler`] explicitly. Nothing in the engine reads the
//! environment on its own.
//!
//! ```toml
//! url = "https://dashboards.example.com/"
//! store_dashboard_sha256 = true
//! ```

use dashsync_content::StorageMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::{Error, Result};

/// Base URL of the dashboard service
pub const URL_ENV: &str = "DASHSYNC_URL";

/// Store digests instead of canonical JSON when truthy
pub const STORE_SHA256_ENV: &str = "DASHSYNC_STORE_DASHBOARD_SHA256";

/// Settings for one reconciliation session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Base URL used to derive dashboard URLs
    pub url: String,
    /// Persist a SHA-256 digest of the canonical form instead of the text
    pub store_dashboard_sha256: bool,
}

impl Settings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            store_dashboard_sha256: false,
        }
    }

    pub fn with_sha256(mut self, enabled: bool) -> Self {
        self.store_dashboard_sha256 = enabled;
        self
    }

    /// Settings from the process environment only
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Settings from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().with_overrides(lookup)
    }

    /// Load settings from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid settings TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Apply the process environment on top of these settings
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply variables from `lookup` on top of these settings
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(URL_ENV) {
            self.url = url;
        }
        if let Some(flag) = lookup(STORE_SHA256_ENV) {
            self.store_dashboard_sha256 = parse_flag(&flag);
        }
        self
    }

    pub fn storage_mode(&self) -> StorageMode {
        StorageMode::from_flag(self.store_dashboard_sha256)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
