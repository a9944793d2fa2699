//! Diff command implementation
//!
//! Compares a dashboard config with a state-file entry without contacting
//! the remote service.

use std::path::Path;

use colored::Colorize;
use serde_json::json;

use dashsync_core::{
    ChangeReason, ConfigDiff, DesiredConfig, PersistedDashboard, Settings, StateFile,
    diff_dashboard,
};
use dashsync_content::Normalizer;

use super::read_input;
use crate::error::{CliError, Result};

/// Run the diff command
pub fn run_diff(
    path: &Path,
    state_path: &Path,
    name: &str,
    folder: Option<&str>,
    settings: &Settings,
    json: bool,
) -> Result<()> {
    let state = StateFile::load(state_path)?;
    let persisted = state.get(name).ok_or_else(|| {
        CliError::user(format!(
            "no dashboard named '{name}' in {}",
            state_path.display()
        ))
    })?;

    let mut desired = DesiredConfig::new(read_input(path)?);
    if let Some(folder) = folder {
        desired = desired.with_folder(folder);
    }

    let diff = diff_dashboard(
        &Normalizer::default(),
        &desired,
        persisted,
        settings.storage_mode(),
    )?;
    tracing::debug!(name, ?diff, "Computed diff");

    if json {
        let output = json!({
            "name": name,
            "uid": persisted.uid,
            "has_changes": diff.is_changed(),
            "diff": diff,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_diff(name, persisted, diff);
    }

    Ok(())
}

fn print_diff(name: &str, persisted: &PersistedDashboard, diff: ConfigDiff) {
    let reason = match diff {
        ConfigDiff::Unchanged => {
            println!(
                "{} {} ({}) is up to date.",
                "OK".green().bold(),
                name.yellow(),
                persisted.uid.cyan()
            );
            return;
        }
        ConfigDiff::Changed(reason) => reason,
    };

    let detail = match reason {
        ChangeReason::Content => "content differs from the last-applied config",
        ChangeReason::StorageModeMismatch => "stored config uses the other storage mode",
        ChangeReason::Folder => "folder differs from the last-applied folder",
    };
    println!(
        "{} {} ({}): {}",
        "CHANGED".yellow().bold(),
        name.yellow(),
        persisted.uid.cyan(),
        detail
    );
    println!("  {} {}", "~".yellow(), persisted.url);
}
