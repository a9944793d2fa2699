//! Reconciliation of desired dashboards against the remote service
//!
//! This module provides:
//! - **diff**: Pure comparison of a desired config with persisted state
//! - **engine**: The [`Reconciler`] issuing create/read/update/delete/import calls
//! - **check**: Drift reports for detection tooling
//! - **lifecycle**: The per-dashboard state machine driving a full pass

mod check;
mod diff;
mod engine;
mod lifecycle;

pub use check::{CheckReport, CheckStatus, DriftItem};
pub use diff::{
    ChangeReason, ConfigDiff, compute_diff, diff_dashboard, folder_changed, folder_ref_for,
};
pub use engine::{Reconciler, UpdateOutcome};
pub use lifecycle::{ApplyOutcome, ManagedDashboard, Phase};
