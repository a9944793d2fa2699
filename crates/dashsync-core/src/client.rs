//! Remote service collaborator
//!
//! The engine never talks HTTP itself. Everything it needs from the
//! dashboard service goes through [`DashboardClient`], which an HTTP client,
//! a recorded fixture or an in-memory fake can implement.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Result;

/// Folder id of the root folder
pub const ROOT_FOLDER_ID: i64 = 0;

/// The service's view of a dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecord {
    /// Server-assigned numeric id, distinct from `uid`
    pub id: i64,
    /// Stable string identity used for lookups
    pub uid: String,
    /// Bumped by the server on every write
    pub version: i64,
    /// Parent folder, [`ROOT_FOLDER_ID`] for the root
    pub folder_id: i64,
    /// Full payload, with `id`, `uid` and `version` inline
    pub body: Map<String, Value>,
    /// Relative path `/d/<uid>/<slug>`
    pub url: String,
}

/// A full-body write sent to the service
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub body: Map<String, Value>,
    pub folder_id: i64,
    /// Optional version message recorded by the service
    pub message: Option<String>,
}

/// Minimal surface the reconciler requires from the dashboard service
///
/// Implementations map transport failures to [`crate::Error::Transient`],
/// missing dashboards or folders to [`crate::Error::NotFound`] and taken
/// uids to [`crate::Error::Conflict`]. They must not retry on their own.
pub trait DashboardClient: Send + Sync {
    /// Create a new dashboard. A `uid` in the body is the requested identity.
    fn create_record(&self, request: &SaveRequest) -> Result<RemoteRecord>;

    /// Fetch a dashboard by uid
    fn fetch_by_uid(&self, uid: &str) -> Result<RemoteRecord>;

    /// Replace the dashboard currently known as `current_uid`
    ///
    /// When the body carries a different `uid` the service rebinds the
    /// dashboard to it.
    fn replace_record(&self, current_uid: &str, request: &SaveRequest) -> Result<RemoteRecord>;

    /// Delete a dashboard by uid
    fn delete_by_uid(&self, uid: &str) -> Result<()>;

    /// Resolve a folder reference to its numeric id
    fn fetch_folder(&self, folder_ref: &str) -> Result<i64>;
}
