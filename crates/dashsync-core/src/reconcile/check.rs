//! Drift check reports
//!
//! Provides types for reporting whether remote dashboards still match
//! their desired configuration.

use serde::{Deserialize, Serialize};

/// Status of a drift check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    /// Remote state matches the desired configuration
    Healthy,
    /// Some dashboards no longer exist on the remote
    Missing,
    /// Some dashboards differ from their desired configuration
    Drifted,
}

/// A dashboard that has drifted or is missing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftItem {
    /// Resource name in the state file
    pub name: String,
    /// Remote uid the check looked up
    pub uid: String,
    /// Human-readable description of the drift
    pub description: String,
}

/// Report from a drift check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    /// Overall status of the check
    pub status: CheckStatus,
    /// Dashboards that differ from their desired configuration
    pub drifted: Vec<DriftItem>,
    /// Dashboards missing from the remote
    pub missing: Vec<DriftItem>,
}

impl CheckReport {
    /// Create a healthy check report with no issues
    pub fn healthy() -> Self {
        Self {
            status: CheckStatus::Healthy,
            drifted: Vec::new(),
            missing: Vec::new(),
        }
    }

    /// Create a check report with missing items
    pub fn with_missing(missing: Vec<DriftItem>) -> Self {
        Self {
            status: CheckStatus::Missing,
            drifted: Vec::new(),
            missing,
        }
    }

    /// Create a check report with drifted items
    pub fn with_drifted(drifted: Vec<DriftItem>) -> Self {
        Self {
            status: CheckStatus::Drifted,
            drifted,
            missing: Vec::new(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == CheckStatus::Healthy
    }

    /// Merge two check reports, combining their issues
    ///
    /// The resulting status is the "worst" of the two:
    /// Drifted > Missing > Healthy
    pub fn merge(mut self, other: CheckReport) -> Self {
        self.drifted.extend(other.drifted);
        self.missing.extend(other.missing);

        self.status = match (self.status, other.status) {
            (CheckStatus::Drifted, _) | (_, CheckStatus::Drifted) => CheckStatus::Drifted,
            (CheckStatus::Missing, _) | (_, CheckStatus::Missing) => CheckStatus::Missing,
            (CheckStatus::Healthy, CheckStatus::Healthy) => CheckStatus::Healthy,
        };

        self
    }
}
