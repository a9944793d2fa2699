//! Reconciliation engine for remotely managed dashboards
//!
//! This crate converges a dashboard owned by an external visualization
//! service towards a user-authored JSON configuration:
//!
//! - **Remote collaborator**: the [`DashboardClient`] trait, injected into the engine
//! - **Reconciler**: create, read, update, delete and import with no-op updates
//!   when canonical forms match
//! - **Lifecycle**: [`ManagedDashboard`] runs a full refresh/create/update pass
//! - **State**: [`PersistedDashboard`] and the TOML-backed [`StateFile`]
//! - **Settings**: base URL and storage mode, read once per session
//!
//! # Architecture
//!
//! ```text
//!        caller (CLI / config front end)
//!                      |
//!                dashsync-core
//!                 /          \
//!   dashsync-content      DashboardClient (remote service)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use dashsync_core::{DesiredConfig, ManagedDashboard, Reconciler, Settings};
//!
//! let reconciler = Reconciler::new(client, Settings::from_env());
//! let mut dashboard = ManagedDashboard::absent();
//! dashboard.reconcile(&reconciler, &DesiredConfig::new(r#"{"title":"Overview"}"#))?;
//! ```

pub mod client;
pub mod desired;
pub mod error;
pub mod reconcile;
pub mod settings;
pub mod state;
pub mod url;

pub use client::{DashboardClient, ROOT_FOLDER_ID, RemoteRecord, SaveRequest};
pub use desired::DesiredConfig;
pub use error::{Error, Result};
pub use reconcile::{
    ApplyOutcome, ChangeReason, CheckReport, CheckStatus, ConfigDiff, DriftItem, ManagedDashboard,
    Phase, Reconciler, UpdateOutcome, compute_diff, diff_dashboard,
};
pub use settings::Settings;
pub use state::{PersistedDashboard, StateEntry, StateFile};

pub use dashsync_content::{ConfigInput, StorageMode};
