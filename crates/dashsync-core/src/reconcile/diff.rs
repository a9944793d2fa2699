//! Desired vs persisted comparison

use dashsync_content::{Normalizer, StorageMode, StoredFormat};
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::client::ROOT_FOLDER_ID;
use crate::desired::DesiredConfig;
use crate::state::PersistedDashboard;

/// Why a dashboard needs a write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeReason {
    /// Canonical forms differ
    Content,
    /// The stored value was written in the other storage mode
    StorageModeMismatch,
    /// The folder reference differs
    Folder,
}

/// Outcome of comparing desired and persisted state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigDiff {
    Unchanged,
    Changed(ChangeReason),
}

impl ConfigDiff {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed(_))
    }
}

/// Compare the desired body with the persisted `config_json`
///
/// Only canonical forms (or their digests) are compared. A persisted value
/// in the other mode's format is always [`ChangeReason::StorageModeMismatch`].
pub fn compute_diff(
    normalizer: &Normalizer,
    desired: &DesiredConfig,
    persisted: &PersistedDashboard,
    mode: StorageMode,
) -> Result<ConfigDiff> {
    if persisted.stored_format() != mode.format() {
        return Ok(ConfigDiff::Changed(ChangeReason::StorageModeMismatch));
    }

    let canonical = normalizer.canonicalize(desired.body.clone(), mode)?;
    if canonical.stored_value() == persisted.config_json {
        Ok(ConfigDiff::Unchanged)
    } else {
        Ok(ConfigDiff::Changed(ChangeReason::Content))
    }
}

/// Compare content, then the folder when the content matches
///
/// This is the full check a reconciliation pass uses to decide on a write.
pub fn diff_dashboard(
    normalizer: &Normalizer,
    desired: &DesiredConfig,
    persisted: &PersistedDashboard,
    mode: StorageMode,
) -> Result<ConfigDiff> {
    let diff = compute_diff(normalizer, desired, persisted, mode)?;
    if !diff.is_changed() && folder_changed(desired, persisted) {
        return Ok(ConfigDiff::Changed(ChangeReason::Folder));
    }
    Ok(diff)
}

/// Whether the desired folder differs from the persisted one
pub fn folder_changed(desired: &DesiredConfig, persisted: &PersistedDashboard) -> bool {
    match desired.folder_ref() {
        Some(folder) => persisted.folder_ref.as_deref() != Some(folder),
        None => persisted.folder_ref.is_some() || persisted.folder != ROOT_FOLDER_ID,
    }
}

/// Folder reference recorded for a numeric folder id seen on the remote
pub fn folder_ref_for(folder_id: i64) -> Option<String> {
    (folder_id != ROOT_FOLDER_ID).then(|| folder_id.to_string())
}
