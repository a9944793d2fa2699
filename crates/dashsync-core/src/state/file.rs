//! File-backed state store

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Read;
use std::path::Path;

use super::PersistedDashboard;
use crate::Result;

const FORMAT_VERSION: &str = "1.0";

/// One named dashboard in the state file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    /// When this entry was last written
    pub applied_at: DateTime<Utc>,
    pub dashboard: PersistedDashboard,
}

/// Persisted state for a set of named dashboards
///
/// Entries are keyed by a caller-chosen resource name rather than by uid,
/// because the uid of a dashboard can change between passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    /// State format version for forward compatibility
    version: String,
    #[serde(default)]
    dashboards: BTreeMap<String, StateEntry>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self::new()
    }
}

impl StateFile {
    /// Create a new empty state file
    pub fn new() -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            dashboards: BTreeMap::new(),
        }
    }

    /// Load a state file with a shared lock
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, locked, or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        file.lock_shared()?;

        let mut content = String::new();
        (&file).read_to_string(&mut content)?;
        let state: StateFile = toml::from_str(&content)?;

        Ok(state)
    }

    /// Load a state file, or start empty if it does not exist yet
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    /// Save atomically: exclusive lock, write to a temp file, rename
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or locked.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        lock_file.lock_exclusive()?;

        let temp_path = path.with_extension("toml.tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&PersistedDashboard> {
        self.dashboards.get(name).map(|entry| &entry.dashboard)
    }

    pub fn entry(&self, name: &str) -> Option<&StateEntry> {
        self.dashboards.get(name)
    }

    /// Record the state of a dashboard, stamping it with the current time
    pub fn insert(&mut self, name: impl Into<String>, dashboard: PersistedDashboard) {
        self.dashboards.insert(
            name.into(),
            StateEntry {
                applied_at: Utc::now(),
                dashboard,
            },
        );
    }

    pub fn remove(&mut self, name: &str) -> Option<PersistedDashboard> {
        self.dashboards.remove(name).map(|entry| entry.dashboard)
    }

    /// Find the resource name currently bound to a uid
    pub fn name_for_uid(&self, uid: &str) -> Option<&str> {
        self.dashboards
            .iter()
            .find(|(_, entry)| entry.dashboard.uid == uid)
            .map(|(name, _)| name.as_str())
    }

    /// All entries, ordered by name
    pub fn entries(&self) -> impl Iterator<Item = (&str, &StateEntry)> {
        self.dashboards.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.dashboards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dashboards.is_empty()
    }
}
