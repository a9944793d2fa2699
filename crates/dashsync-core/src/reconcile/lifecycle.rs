//! Per-dashboard lifecycle
//!
//! A [`ManagedDashboard`] owns the persisted state of one dashboard and
//! walks it through `Absent -> Creating -> Present -> Updating -> Present`
//! and `Present -> Deleting -> Absent`. Callers must not drive the same
//! dashboard from two passes at once.

use serde::{Deserialize, Serialize};

use super::engine::{Reconciler, UpdateOutcome};
use crate::desired::DesiredConfig;
use crate::state::PersistedDashboard;
use crate::{Error, Result};

/// Lifecycle phase of a managed dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Absent,
    Creating,
    Present,
    Updating,
    Deleting,
}

/// What a reconciliation pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyOutcome {
    /// No prior state; the dashboard was created
    Created,
    /// Prior state existed but the remote dashboard was gone
    Recreated,
    /// A full replace was issued
    Updated,
    /// Remote already matched; no write
    Unchanged,
}

/// One dashboard and its last-applied state
#[derive(Debug, Clone)]
pub struct ManagedDashboard {
    phase: Phase,
    state: Option<PersistedDashboard>,
}

impl Default for ManagedDashboard {
    fn default() -> Self {
        Self::absent()
    }
}

impl ManagedDashboard {
    /// A dashboard with no persisted state
    pub fn absent() -> Self {
        Self {
            phase: Phase::Absent,
            state: None,
        }
    }

    /// A dashboard previously applied with this state
    pub fn from_state(state: PersistedDashboard) -> Self {
        Self {
            phase: Phase::Present,
            state: Some(state),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> Option<&PersistedDashboard> {
        self.state.as_ref()
    }

    pub fn into_state(self) -> Option<PersistedDashboard> {
        self.state
    }

    /// Current lookup key
    pub fn uid(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.uid.as_str())
    }

    /// Re-read the remote dashboard
    ///
    /// Returns `false` and moves to `Absent` when the remote dashboard no
    /// longer exists.
    pub fn refresh(&mut self, reconciler: &Reconciler) -> Result<bool> {
        Ok(self.refreshed_state(reconciler)?.is_some())
    }

    /// Run one full pass: refresh, then create or update
    pub fn reconcile(
        &mut self,
        reconciler: &Reconciler,
        desired: &DesiredConfig,
    ) -> Result<ApplyOutcome> {
        let had_state = self.state.is_some();

        let Some(current) = self.refreshed_state(reconciler)? else {
            self.create(reconciler, desired)?;
            return Ok(if had_state {
                ApplyOutcome::Recreated
            } else {
                ApplyOutcome::Created
            });
        };

        self.transition(Phase::Updating);
        match reconciler.update(&current, desired) {
            Ok(UpdateOutcome::Unchanged) => {
                self.transition(Phase::Present);
                Ok(ApplyOutcome::Unchanged)
            }
            Ok(UpdateOutcome::Updated(state)) => {
                self.state = Some(state);
                self.transition(Phase::Present);
                Ok(ApplyOutcome::Updated)
            }
            Err(e) => {
                // The write may have landed; the next refresh picks it up.
                self.transition(Phase::Present);
                Err(e)
            }
        }
    }

    /// Delete the remote dashboard and drop the persisted state
    pub fn destroy(&mut self, reconciler: &Reconciler) -> Result<()> {
        let Some(uid) = self.uid().map(str::to_owned) else {
            return Ok(());
        };

        self.transition(Phase::Deleting);
        match reconciler.delete(&uid) {
            Ok(()) => {
                self.state = None;
                self.transition(Phase::Absent);
                Ok(())
            }
            Err(e) => {
                self.transition(Phase::Present);
                Err(e)
            }
        }
    }

    fn refreshed_state(&mut self, reconciler: &Reconciler) -> Result<Option<PersistedDashboard>> {
        let Some(current) = &self.state else {
            return Ok(None);
        };

        match reconciler.read(current) {
            Ok(refreshed) => {
                self.state = Some(refreshed.clone());
                Ok(Some(refreshed))
            }
            Err(Error::NotFound { uid }) => {
                tracing::info!(uid = %uid, "Dashboard disappeared, will recreate");
                self.state = None;
                self.transition(Phase::Absent);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn create(&mut self, reconciler: &Reconciler, desired: &DesiredConfig) -> Result<()> {
        self.transition(Phase::Creating);
        match reconciler.create(desired) {
            Ok(state) => {
                self.state = Some(state);
                self.transition(Phase::Present);
                Ok(())
            }
            Err(e) => {
                self.transition(Phase::Absent);
                Err(e)
            }
        }
    }

    fn transition(&mut self, to: Phase) {
        tracing::debug!(from = ?self.phase, to = ?to, "Dashboard phase change");
        self.phase = to;
    }
}
