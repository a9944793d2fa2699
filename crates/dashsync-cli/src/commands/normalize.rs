//! Normalize command implementation

use std::path::Path;

use dashsync_content::{ConfigInput, Normalizer, StorageMode};

use super::read_input;
use crate::error::Result;

/// Print the canonical form, or its digest, of a config file
pub fn run_normalize(path: &Path, sha256: bool) -> Result<()> {
    let input = ConfigInput::from_text(read_input(path)?);
    if !input.is_structured() {
        tracing::warn!(path = %path.display(), "Input is not a JSON object, passing it through");
    }

    let canonical = Normalizer::default().canonicalize(input, StorageMode::from_flag(sha256))?;
    println!("{}", canonical.stored_value());
    Ok(())
}
