//! Acceptance scenarios
//!
//! Each test walks one dashboard through a sequence of configurations, the
//! way a configuration front end would across several sessions, and checks
//! the persisted state after every step.

use std::sync::Arc;

use dashsync_core::{
    ApplyOutcome, DesiredConfig, ManagedDashboard, PersistedDashboard, Reconciler, Settings,
    StateFile,
};
use dashsync_test_utils::FakeDashboardService;
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;

const GRAFANA_URL: &str = "http://localhost:3000/";

/// Settings as a session would read them from its environment
fn session_settings(store_sha256: bool) -> Settings {
    Settings::from_lookup(|key| match key {
        "DASHSYNC_URL" => Some(GRAFANA_URL.to_string()),
        "DASHSYNC_STORE_DASHBOARD_SHA256" => Some(store_sha256.to_string()),
        _ => None,
    })
}

struct Session {
    service: Arc<FakeDashboardService>,
    reconciler: Reconciler,
    dashboard: ManagedDashboard,
}

impl Session {
    fn new(store_sha256: bool) -> Self {
        let service = FakeDashboardService::shared();
        let reconciler = Reconciler::new(service.clone(), session_settings(store_sha256));
        Self {
            service,
            reconciler,
            dashboard: ManagedDashboard::absent(),
        }
    }

    fn apply(&mut self, config: &str) -> ApplyOutcome {
        self.apply_desired(&DesiredConfig::new(config))
    }

    fn apply_desired(&mut self, desired: &DesiredConfig) -> ApplyOutcome {
        self.dashboard.reconcile(&self.reconciler, desired).unwrap()
    }

    fn state(&self) -> &PersistedDashboard {
        self.dashboard.state().unwrap()
    }
}

#[rstest]
#[case::json(
    false,
    r#"{"title":"Terraform Acceptance Test","uid":"basic"}"#,
    r#"{"title":"Updated Title","uid":"basic"}"#,
    r#"{"title":"Updated Title","uid":"basic-update"}"#
)]
#[case::sha256(
    true,
    "fadbc115a19bfd7962d8f8d749d22c20d0a44043d390048bf94b698776d9f7f1",
    "4669abda43a4a6d6ae9ecaa19f8508faf4095682b679da0b5ce4176aa9171ab2",
    "2934e80938a672bd09d8e56385159a1bf8176e2a2ef549437f200d82ff398bfb"
)]
fn test_basic_dashboard(
    #[case] store_sha256: bool,
    #[case] initial: &str,
    #[case] updated_title: &str,
    #[case] updated_uid: &str,
) {
    let mut session = Session::new(store_sha256);

    // Create
    let outcome = session.apply(
        r#"{"title": "Terraform Acceptance Test", "uid": "basic", "id": 12, "version": 43}"#,
    );
    assert_eq!(outcome, ApplyOutcome::Created);
    assert_eq!(session.state().uid, "basic");
    assert_eq!(
        session.state().url,
        "http://localhost:3000/d/basic/terraform-acceptance-test"
    );
    assert_eq!(session.state().config_json, initial);

    // Same config again
    assert_eq!(
        session.apply(r#"{"uid": "basic", "title": "Terraform Acceptance Test"}"#),
        ApplyOutcome::Unchanged
    );

    // Update title
    let outcome = session.apply(r#"{"title": "Updated Title", "uid": "basic"}"#);
    assert_eq!(outcome, ApplyOutcome::Updated);
    assert_eq!(session.state().uid, "basic");
    assert_eq!(session.state().config_json, updated_title);

    // Update uid
    let outcome = session.apply(r#"{"title": "Updated Title", "uid": "basic-update"}"#);
    assert_eq!(outcome, ApplyOutcome::Updated);
    assert_eq!(session.state().uid, "basic-update");
    assert_eq!(
        session.state().url,
        "http://localhost:3000/d/basic-update/updated-title"
    );
    assert_eq!(session.state().config_json, updated_uid);
    assert_eq!(session.service.dashboard_count(), 1);

    // Import matches the previous step
    let imported = session.reconciler.import("basic-update").unwrap();
    assert_eq!(&imported, session.state());

    // Destroy
    session.dashboard.destroy(&session.reconciler).unwrap();
    assert_eq!(session.service.dashboard_count(), 0);
    assert!(
        session
            .reconciler
            .read(&imported)
            .unwrap_err()
            .is_not_found()
    );
}

#[test]
fn test_uid_unset() {
    let mut session = Session::new(false);

    session.apply(r#"{"title": "UID Unset"}"#);
    assert_eq!(session.state().config_json, r#"{"title":"UID Unset"}"#);
    let assigned = session.state().uid.clone();
    assert!(!assigned.is_empty());

    session.apply(r#"{"title": "UID Unset", "uid": "uid-previously-unset"}"#);
    assert_eq!(
        session.state().config_json,
        r#"{"title":"UID Unset","uid":"uid-previously-unset"}"#
    );
    assert_eq!(session.state().uid, "uid-previously-unset");

    session.apply(r#"{"title": "UID Unset"}"#);
    assert_eq!(session.state().config_json, r#"{"title":"UID Unset"}"#);

    assert_eq!(
        session.apply(r#"{"title": "UID Unset"}"#),
        ApplyOutcome::Unchanged
    );
    assert_eq!(session.service.dashboard_count(), 1);
}

#[test]
fn test_folder() {
    let mut session = Session::new(false);
    let folder_id = session.service.add_folder("test-folder");

    let desired = DesiredConfig::new(r#"{"title": "Dashboard in folder", "uid": "folder"}"#)
        .with_folder(folder_id.to_string());
    session.apply_desired(&desired);

    assert_eq!(session.state().uid, "folder");
    assert_ne!(session.state().folder, 0);
    assert_eq!(session.state().folder, folder_id);
    assert_eq!(
        session.service.dashboard("folder").unwrap().folder_id,
        folder_id
    );

    session.service.reset_calls();
    assert_eq!(session.apply_desired(&desired), ApplyOutcome::Unchanged);
    assert_eq!(session.service.calls().fetch_folder, 0);

    let imported = session.reconciler.import("folder").unwrap();
    assert_eq!(&imported, session.state());
}

#[test]
fn test_library_panel_dashboard_is_stable() {
    let mut session = Session::new(false);
    session
        .service
        .register_library_panel("lib-uid", "Shared panel", "Maintained elsewhere");
    let config = r#"{
        "title": "Uses library panels",
        "uid": "library",
        "panels": [
            {"gridPos": {"h": 8, "w": 12}, "libraryPanel": {"uid": "lib-uid", "name": "Shared panel"}}
        ]
    }"#;

    assert_eq!(session.apply(config), ApplyOutcome::Created);
    assert_eq!(session.apply(config), ApplyOutcome::Unchanged);
}

#[test]
fn test_sessions_resume_from_state_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("dashsync-state.toml");
    let service = FakeDashboardService::shared();
    let config = r#"{"title": "Terraform Acceptance Test", "uid": "basic"}"#;

    // First session creates and records the dashboard.
    {
        let reconciler = Reconciler::new(service.clone(), session_settings(false));
        let mut dashboard = ManagedDashboard::absent();
        dashboard
            .reconcile(&reconciler, &DesiredConfig::new(config))
            .unwrap();

        let mut state = StateFile::load_or_default(&path).unwrap();
        state.insert("test", dashboard.into_state().unwrap());
        state.save(&path).unwrap();
    }

    // Second session switches to hashing mode and rewrites once.
    {
        let reconciler = Reconciler::new(service.clone(), session_settings(true));
        let mut state = StateFile::load(&path).unwrap();
        let mut dashboard = ManagedDashboard::from_state(state.get("test").cloned().unwrap());

        let outcome = dashboard
            .reconcile(&reconciler, &DesiredConfig::new(config))
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Updated);

        state.insert("test", dashboard.into_state().unwrap());
        state.save(&path).unwrap();
    }

    // Third session in the same mode has nothing to do.
    let reconciler = Reconciler::new(service.clone(), session_settings(true));
    let state = StateFile::load(&path).unwrap();
    assert_eq!(
        state.get("test").unwrap().config_json,
        "fadbc115a19bfd7962d8f8d749d22c20d0a44043d390048bf94b698776d9f7f1"
    );
    let mut dashboard = ManagedDashboard::from_state(state.get("test").cloned().unwrap());
    service.reset_calls();
    assert_eq!(
        dashboard
            .reconcile(&reconciler, &DesiredConfig::new(config))
            .unwrap(),
        ApplyOutcome::Unchanged
    );
    assert_eq!(service.calls().writes(), 0);
}
