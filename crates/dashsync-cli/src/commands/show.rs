//! Show command implementation

use std::path::Path;

use colored::Colorize;
use dashsync_content::StoredFormat;
use serde_json::json;

use dashsync_core::StateFile;

use crate::error::Result;

/// List state-file entries
pub fn run_show(state_path: &Path, json: bool) -> Result<()> {
    let state = StateFile::load(state_path)?;

    if json {
        let entries: Vec<_> = state
            .entries()
            .map(|(name, entry)| {
                json!({
                    "name": name,
                    "uid": entry.dashboard.uid,
                    "dashboard_id": entry.dashboard.dashboard_id,
                    "version": entry.dashboard.version,
                    "folder": entry.dashboard.folder,
                    "url": entry.dashboard.url,
                    "applied_at": entry.applied_at.to_rfc3339(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if state.is_empty() {
        println!("{}", "No dashboards recorded.".dimmed());
        return Ok(());
    }

    println!("{} {}", "State".blue().bold(), state_path.display().to_string().yellow());
    println!();
    for (name, entry) in state.entries() {
        let dashboard = &entry.dashboard;
        let stored = match dashboard.stored_format() {
            StoredFormat::Json => "json",
            StoredFormat::Digest => "sha256",
        };
        println!(
            "  {} {} v{} [{}]",
            name.bold(),
            dashboard.uid.cyan(),
            dashboard.version,
            stored
        );
        println!("    {}", dashboard.url);
    }
    Ok(())
}
