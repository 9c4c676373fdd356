//! Verification report: run totals plus a check that every rewritten
//! reference has its artifact on disk.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::walker::RewrittenRef;

/// File name of the report under the output root.
pub const VERIFY_FILE: &str = "verify.json";

/// Contents of `verify.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyReport {
    pub found_urls_count: usize,
    pub downloads_total_bytes: u64,
    pub download_failures: Vec<String>,
    pub rewritten_count: usize,
    pub removed_blocked: usize,
    /// Absolute path of the rewritten manifest.
    pub rewritten_manifest: PathBuf,
    /// Local paths of rewritten references whose artifact is absent.
    #[serde(default)]
    pub missing_files: Vec<PathBuf>,
}

impl VerifyReport {
    pub fn is_complete(&self) -> bool {
        self.download_failures.is_empty() && self.missing_files.is_empty()
    }
}

/// Sorted, deduplicated local paths from `changed` that do not exist.
pub fn missing_files(changed: &[RewrittenRef]) -> Vec<PathBuf> {
    changed
        .iter()
        .filter(|c| !c.local_path.is_file())
        .map(|c| c.local_path.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Writes `report` to `<root>/verify.json` and returns that path.
pub fn write_report(root: &Path, report: &VerifyReport) -> Result<PathBuf> {
    let path = root.join(VERIFY_FILE);
    let json = serde_json::to_string_pretty(report)?;
    fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

pub fn read_report(path: &Path) -> Result<VerifyReport> {
    let data = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parse {}", path.display()))
}
