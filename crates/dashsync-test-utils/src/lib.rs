//! Shared test utilities for the dashsync workspace.
//!
//! Used as a dev-dependency by the other crates; never published.
//!
//! # Modules
//!
//! - [`service`]: [`FakeDashboardService`], an in-memory dashboard service

pub mod service;

pub use service::{CallCounts, FakeDashboardService};
