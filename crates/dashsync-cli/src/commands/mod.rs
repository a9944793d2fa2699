//! Command implementations

mod diff;
mod normalize;
mod show;

pub use diff::run_diff;
pub use normalize::run_normalize;
pub use show::run_show;

use std::io::Read;
use std::path::Path;

use dashsync_core::Settings;

use crate::error::Result;

/// Read a config file, with `-` meaning stdin
pub(crate) fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Session settings: the optional file first, then the environment
pub(crate) fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let settings = match path {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    Ok(settings.with_env_overrides())
}
