//! `mfmirror import-har <manifest> <har> [output]` – rebuild resources from a capture.

use anyhow::Result;
use mfmirror_core::har;
use std::path::Path;

pub fn run_import_har(manifest: &Path, har_path: &Path, output: Option<&Path>) -> Result<()> {
    let count = har::update_resources(manifest, har_path, output)?;
    let target = output.unwrap_or(manifest);
    println!("Updated {} with {} resources.", target.display(), count);
    Ok(())
}
