//! In-memory dashboard service implementing [`DashboardClient`].
//!
//! Behaves like the real service where the reconciler can observe it: it
//! assigns ids and uids, bumps `version` on every write, embeds `id`, `uid`
//! and `version` in the returned body, and copies library panel metadata
//! into panels that reference a registered library panel.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use dashsync_content::rules::{Parent, walk_objects_mut};
use dashsync_core::url::dashboard_path;
use dashsync_core::{DashboardClient, Error, ROOT_FOLDER_ID, RemoteRecord, Result, SaveRequest};
use serde_json::{Map, Value, json};
use uuid::Uuid;

/// Number of calls received per operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub create: usize,
    pub fetch: usize,
    pub replace: usize,
    pub delete: usize,
    pub fetch_folder: usize,
}

impl CallCounts {
    /// Calls that may have modified remote state
    pub fn writes(&self) -> usize {
        self.create + self.replace + self.delete
    }

    pub fn total(&self) -> usize {
        self.writes() + self.fetch + self.fetch_folder
    }
}

#[derive(Debug, Clone)]
struct LibraryPanel {
    name: String,
    description: String,
}

#[derive(Debug, Default)]
struct Inner {
    dashboards: BTreeMap<String, RemoteRecord>,
    folders: BTreeMap<i64, String>,
    library_panels: BTreeMap<String, LibraryPanel>,
    messages: BTreeMap<String, Vec<String>>,
    next_dashboard_id: i64,
    next_folder_id: i64,
    calls: CallCounts,
    transient_failures: usize,
}

/// An in-memory dashboard service
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use dashsync_core::{DesiredConfig, Reconciler, Settings};
/// use dashsync_test_utils::FakeDashboardService;
///
/// let service = FakeDashboardService::shared();
/// let reconciler = Reconciler::new(service.clone(), Settings::new("http://localhost:3000"));
/// let state = reconciler.create(&DesiredConfig::new(r#"{"title":"T","uid":"t"}"#)).unwrap();
/// assert_eq!(state.uid, "t");
/// assert_eq!(service.calls().create, 1);
/// ```
#[derive(Debug, Default)]
pub struct FakeDashboardService {
    inner: Mutex<Inner>,
}

impl FakeDashboardService {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new service behind an `Arc`, ready to hand to a `Reconciler`
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("FakeDashboardService: lock poisoned")
    }

    /// Create a folder and return its numeric id
    pub fn add_folder(&self, uid: &str) -> i64 {
        let mut inner = self.lock();
        inner.next_folder_id += 1;
        let id = inner.next_folder_id;
        inner.folders.insert(id, uid.to_string());
        id
    }

    /// Register a library panel whose metadata the service copies into dashboards
    pub fn register_library_panel(&self, uid: &str, name: &str, description: &str) {
        self.lock().library_panels.insert(
            uid.to_string(),
            LibraryPanel {
                name: name.to_string(),
                description: description.to_string(),
            },
        );
    }

    /// Make the next `count` calls fail with [`Error::Transient`]
    pub fn fail_next(&self, count: usize) {
        self.lock().transient_failures = count;
    }

    pub fn calls(&self) -> CallCounts {
        self.lock().calls
    }

    pub fn reset_calls(&self) {
        self.lock().calls = CallCounts::default();
    }

    pub fn dashboard(&self, uid: &str) -> Option<RemoteRecord> {
        self.lock().dashboards.get(uid).cloned()
    }

    pub fn dashboard_count(&self) -> usize {
        self.lock().dashboards.len()
    }

    /// Version messages received for a uid, oldest first
    pub fn messages(&self, uid: &str) -> Vec<String> {
        self.lock().messages.get(uid).cloned().unwrap_or_default()
    }

    /// Delete a dashboard behind the reconciler's back
    pub fn delete_out_of_band(&self, uid: &str) {
        self.lock().dashboards.remove(uid);
    }

    /// Edit a dashboard body behind the reconciler's back
    pub fn edit_out_of_band(&self, uid: &str, edit: impl FnOnce(&mut Map<String, Value>)) {
        let mut inner = self.lock();
        if let Some(record) = inner.dashboards.get_mut(uid) {
            edit(&mut record.body);
            record.version += 1;
            record.body.insert("version".to_string(), json!(record.version));
        }
    }

    /// Move a dashboard to another folder behind the reconciler's back
    pub fn move_out_of_band(&self, uid: &str, folder_id: i64) {
        if let Some(record) = self.lock().dashboards.get_mut(uid) {
            record.folder_id = folder_id;
        }
    }

    /// Count the call and consume an injected failure, if any
    fn begin(&self, inner: &mut Inner, count: impl FnOnce(&mut CallCounts)) -> Result<()> {
        count(&mut inner.calls);
        if inner.transient_failures > 0 {
            inner.transient_failures -= 1;
            return Err(Error::transient("injected failure: service unavailable"));
        }
        Ok(())
    }

    fn check_folder(inner: &Inner, folder_id: i64) -> Result<()> {
        if folder_id == ROOT_FOLDER_ID || inner.folders.contains_key(&folder_id) {
            Ok(())
        } else {
            Err(Error::not_found(format!("folder {folder_id}")))
        }
    }

    fn store(
        inner: &mut Inner,
        id: i64,
        uid: String,
        version: i64,
        request: &SaveRequest,
    ) -> RemoteRecord {
        let mut body = request.body.clone();
        body.insert("id".to_string(), json!(id));
        body.insert("uid".to_string(), json!(uid));
        body.insert("version".to_string(), json!(version));
        populate_library_panels(&mut body, &inner.library_panels);

        let url = dashboard_path(&uid, body.get("title").and_then(Value::as_str));
        let record = RemoteRecord {
            id,
            uid: uid.clone(),
            version,
            folder_id: request.folder_id,
            body,
            url,
        };

        if let Some(message) = &request.message {
            inner
                .messages
                .entry(uid.clone())
                .or_default()
                .push(message.clone());
        }
        inner.dashboards.insert(uid, record.clone());
        record
    }
}

impl DashboardClient for FakeDashboardService {
    fn create_record(&self, request: &SaveRequest) -> Result<RemoteRecord> {
        let mut inner = self.lock();
        self.begin(&mut inner, |c| c.create += 1)?;
        Self::check_folder(&inner, request.folder_id)?;

        let uid = match request.body.get("uid").and_then(Value::as_str) {
            Some(uid) if inner.dashboards.contains_key(uid) => return Err(Error::conflict(uid)),
            Some(uid) => uid.to_string(),
            None => Uuid::new_v4().simple().to_string()[..9].to_string(),
        };

        inner.next_dashboard_id += 1;
        let id = inner.next_dashboard_id;
        Ok(Self::store(&mut inner, id, uid, 1, request))
    }

    fn fetch_by_uid(&self, uid: &str) -> Result<RemoteRecord> {
        let mut inner = self.lock();
        self.begin(&mut inner, |c| c.fetch += 1)?;
        inner
            .dashboards
            .get(uid)
            .cloned()
            .ok_or_else(|| Error::not_found(uid))
    }

    fn replace_record(&self, current_uid: &str, request: &SaveRequest) -> Result<RemoteRecord> {
        let mut inner = self.lock();
        self.begin(&mut inner, |c| c.replace += 1)?;
        Self::check_folder(&inner, request.folder_id)?;

        let (id, version) = match inner.dashboards.get(current_uid) {
            Some(existing) => (existing.id, existing.version),
            None => return Err(Error::not_found(current_uid)),
        };
        let new_uid = request
            .body
            .get("uid")
            .and_then(Value::as_str)
            .unwrap_or(current_uid)
            .to_string();
        if new_uid != current_uid && inner.dashboards.contains_key(&new_uid) {
            return Err(Error::conflict(new_uid));
        }

        inner.dashboards.remove(current_uid);
        Ok(Self::store(&mut inner, id, new_uid, version + 1, request))
    }

    fn delete_by_uid(&self, uid: &str) -> Result<()> {
        let mut inner = self.lock();
        self.begin(&mut inner, |c| c.delete += 1)?;
        inner
            .dashboards
            .remove(uid)
            .map(|_| ())
            .ok_or_else(|| Error::not_found(uid))
    }

    fn fetch_folder(&self, folder_ref: &str) -> Result<i64> {
        let mut inner = self.lock();
        self.begin(&mut inner, |c| c.fetch_folder += 1)?;

        if let Ok(id) = folder_ref.parse::<i64>()
            && inner.folders.contains_key(&id)
        {
            return Ok(id);
        }
        inner
            .folders
            .iter()
            .find(|(_, uid)| uid.as_str() == folder_ref)
            .map(|(id, _)| *id)
            .ok_or_else(|| Error::not_found(format!("folder {folder_ref}")))
    }
}

fn populate_library_panels(
    body: &mut Map<String, Value>,
    library_panels: &BTreeMap<String, LibraryPanel>,
) {
    let mut root = Value::Object(std::mem::take(body));
    walk_objects_mut(&mut root, &mut |parent, object| {
        if parent != Parent::Element("panels") {
            return;
        }
        let Some(Value::Object(reference)) = object.get_mut("libraryPanel") else {
            return;
        };
        let Some(panel) = reference
            .get("uid")
            .and_then(Value::as_str)
            .and_then(|uid| library_panels.get(uid))
        else {
            return;
        };
        reference.insert("name".to_string(), json!(panel.name));
        reference.insert("description".to_string(), json!(panel.description));
        reference.insert("meta".to_string(), json!({"connectedDashboards": 1}));
    });
    if let Value::Object(map) = root {
        *body = map;
    }
}
