//! Reconciler implementation
//!
//! The Reconciler converges one remote dashboard towards its desired
//! configuration, writing only when the canonical forms differ.

use std::sync::Arc;

use dashsync_content::{Normalizer, StorageMode};
use serde_json::Value;

use super::check::{CheckReport, DriftItem};
use super::diff::{ChangeReason, ConfigDiff, diff_dashboard, folder_ref_for};
use crate::client::{DashboardClient, ROOT_FOLDER_ID, RemoteRecord, SaveRequest};
use crate::desired::DesiredConfig;
use crate::settings::Settings;
use crate::state::PersistedDashboard;
use crate::url::dashboard_url;
use crate::{Error, Result};

/// Result of an update call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Canonical forms matched; nothing was sent
    Unchanged,
    /// A full replace was issued; holds the new persisted state
    Updated(PersistedDashboard),
}

/// Drives create, read, update, delete and import for dashboards
///
/// The remote client and the session settings are injected here; the
/// storage mode is fixed for the lifetime of the Reconciler.
pub struct Reconciler {
    client: Arc<dyn DashboardClient>,
    settings: Settings,
    normalizer: Normalizer,
}

impl Reconciler {
    /// Create a Reconciler with the default dashboard normalizer
    pub fn new(client: Arc<dyn DashboardClient>, settings: Settings) -> Self {
        Self {
            client,
            settings,
            normalizer: Normalizer::default(),
        }
    }

    /// Replace the normalizer, e.g. to add strip rules
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn storage_mode(&self) -> StorageMode {
        self.settings.storage_mode()
    }

    /// Map a folder reference to a numeric folder id
    ///
    /// No reference means the root folder and costs no remote call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Reference`] if the folder does not exist.
    pub fn resolve_folder(&self, folder_ref: Option<&str>) -> Result<i64> {
        let Some(folder) = folder_ref else {
            return Ok(ROOT_FOLDER_ID);
        };
        self.client.fetch_folder(folder).map_err(|e| match e {
            Error::NotFound { .. } => Error::Reference {
                folder: folder.to_string(),
            },
            other => other,
        })
    }

    /// Create the dashboard on the remote service
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedConfig`] for bodies without a title,
    /// [`Error::Reference`] for unknown folders (before any write) and
    /// [`Error::Conflict`] when the requested uid is taken.
    pub fn create(&self, desired: &DesiredConfig) -> Result<PersistedDashboard> {
        let request = self.save_request(desired, None)?;

        tracing::info!(
            uid = desired.uid().unwrap_or("<server-assigned>"),
            folder_id = request.folder_id,
            "Creating dashboard"
        );
        let record = self.client.create_record(&request)?;

        self.persist(
            record,
            desired.uid().is_some(),
            owned_ref(desired),
            self.storage_mode(),
        )
    }

    /// Refresh persisted state from the remote service
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the dashboard is gone; callers treat
    /// that as "needs recreation".
    ///
    /// The refreshed `config_json` keeps the storage format of `current`, so
    /// a later diff still sees a state written in the other mode.
    pub fn read(&self, current: &PersistedDashboard) -> Result<PersistedDashboard> {
        let record = self.client.fetch_by_uid(&current.uid)?;

        let folder_ref = if record.folder_id == current.folder {
            current.folder_ref.clone()
        } else {
            tracing::debug!(
                uid = %current.uid,
                from = current.folder,
                to = record.folder_id,
                "Dashboard moved outside of reconciliation"
            );
            folder_ref_for(record.folder_id)
        };

        let mode = current.stored_format().mode();
        self.persist(record, current.uid_pinned, folder_ref, mode)
    }

    /// Build state for a dashboard that already exists remotely
    ///
    /// The uid is treated as set by the configuration, so the result equals
    /// what create/update produce for a config carrying this uid.
    pub fn import(&self, uid: &str) -> Result<PersistedDashboard> {
        let record = self.client.fetch_by_uid(uid)?;
        let folder_ref = folder_ref_for(record.folder_id);
        tracing::info!(uid, "Importing dashboard");
        self.persist(record, true, folder_ref, self.storage_mode())
    }

    /// Compare desired config and folder with persisted state
    pub fn diff(
        &self,
        desired: &DesiredConfig,
        persisted: &PersistedDashboard,
    ) -> Result<ConfigDiff> {
        diff_dashboard(&self.normalizer, desired, persisted, self.storage_mode())
    }

    /// Converge an existing dashboard to the desired config
    ///
    /// Issues no remote call at all when nothing changed. Otherwise sends a
    /// full replace addressed by the current uid; a different desired uid in
    /// the body rebinds the dashboard's identity.
    pub fn update(
        &self,
        current: &PersistedDashboard,
        desired: &DesiredConfig,
    ) -> Result<UpdateOutcome> {
        let reason = match self.diff(desired, current)? {
            ConfigDiff::Unchanged => {
                tracing::debug!(uid = %current.uid, "Dashboard unchanged, skipping write");
                return Ok(UpdateOutcome::Unchanged);
            }
            ConfigDiff::Changed(reason) => reason,
        };
        if reason == ChangeReason::StorageModeMismatch {
            tracing::warn!(
                uid = %current.uid,
                mode = ?self.storage_mode(),
                "Stored config was written in another storage mode, rewriting"
            );
        }

        let request = self.save_request(desired, Some(&current.uid))?;
        let target_uid = request
            .body
            .get("uid")
            .and_then(Value::as_str)
            .unwrap_or(&current.uid);
        if target_uid != current.uid {
            tracing::info!(from = %current.uid, to = target_uid, "Rebinding dashboard uid");
        }

        tracing::info!(uid = %current.uid, ?reason, "Replacing dashboard");
        let record = self.client.replace_record(&current.uid, &request)?;

        let state = self.persist(
            record,
            desired.uid().is_some(),
            owned_ref(desired),
            self.storage_mode(),
        )?;
        Ok(UpdateOutcome::Updated(state))
    }

    /// Delete the dashboard; a dashboard that is already gone counts as deleted
    pub fn delete(&self, uid: &str) -> Result<()> {
        match self.client.delete_by_uid(uid) {
            Ok(()) => {
                tracing::info!(uid, "Deleted dashboard");
                Ok(())
            }
            Err(Error::NotFound { .. }) => {
                tracing::warn!(uid, "Dashboard already absent, nothing to delete");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Check one dashboard for drift against its desired config
    ///
    /// Reads the remote and compares; never writes.
    pub fn check(
        &self,
        name: &str,
        current: &PersistedDashboard,
        desired: &DesiredConfig,
    ) -> Result<CheckReport> {
        let refreshed = match self.read(current) {
            Ok(refreshed) => refreshed,
            Err(Error::NotFound { .. }) => {
                return Ok(CheckReport::with_missing(vec![DriftItem {
                    name: name.to_string(),
                    uid: current.uid.clone(),
                    description: "Dashboard not found".to_string(),
                }]));
            }
            Err(e) => return Err(e),
        };

        match self.diff(desired, &refreshed)? {
            ConfigDiff::Unchanged => Ok(CheckReport::healthy()),
            ConfigDiff::Changed(reason) => Ok(CheckReport::with_drifted(vec![DriftItem {
                name: name.to_string(),
                uid: refreshed.uid,
                description: describe(reason).to_string(),
            }])),
        }
    }

    /// Build the full-body write for a desired config
    ///
    /// `current_uid` keeps the existing identity when the config sets none.
    fn save_request(
        &self,
        desired: &DesiredConfig,
        current_uid: Option<&str>,
    ) -> Result<SaveRequest> {
        let body = desired.writable_body()?;
        let folder_id = self.resolve_folder(desired.folder_ref())?;

        let mut body = self.normalizer.clean(body.clone());
        if let (None, Some(uid)) = (desired.uid(), current_uid) {
            body.insert("uid".to_string(), Value::String(uid.to_string()));
        }

        Ok(SaveRequest {
            body,
            folder_id,
            message: desired.message.clone(),
        })
    }

    /// Turn an authoritative remote record into persisted state
    fn persist(
        &self,
        record: RemoteRecord,
        uid_pinned: bool,
        folder_ref: Option<String>,
        mode: StorageMode,
    ) -> Result<PersistedDashboard> {
        let RemoteRecord {
            id,
            uid,
            version,
            folder_id,
            mut body,
            ..
        } = record;

        let url = dashboard_url(
            &self.settings.url,
            &uid,
            body.get("title").and_then(Value::as_str),
        );
        if !uid_pinned {
            body.remove("uid");
        }
        let canonical = self.normalizer.canonicalize(body, mode)?;

        Ok(PersistedDashboard {
            uid,
            dashboard_id: id,
            version,
            folder: folder_id,
            folder_ref,
            url,
            config_json: canonical.stored_value().to_string(),
            uid_pinned,
        })
    }
}

fn owned_ref(desired: &DesiredConfig) -> Option<String> {
    desired.folder_ref().map(str::to_owned)
}

fn describe(reason: ChangeReason) -> &'static str {
    match reason {
        ChangeReason::Content => "Dashboard content differs from config",
        ChangeReason::StorageModeMismatch => "Stored config uses another storage mode",
        ChangeReason::Folder => "Dashboard folder differs from config",
    }
}
