//! Mirror orchestrator: manifest → URL set → fetched artifacts → rewritten
//! manifest → verification report.
//!
//! Only an unreadable or invalid manifest is fatal, and it is detected
//! before any network activity. Per-URL failures end up in the report.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::fetcher::{fetch_all_with, FetchOptions, FetchOutcome, FetchReport};
use crate::filter::UrlFilter;
use crate::verify::{self, VerifyReport};
use crate::walker::{self, RewriteOutcome};

/// Subdirectory of the output root holding rewritten manifests.
pub const REWRITTEN_DIR: &str = "rewritten-manifests";

/// Inputs of one mirror run.
#[derive(Debug, Clone)]
pub struct MirrorOptions {
    pub manifest_path: PathBuf,
    pub out_root: PathBuf,
    pub fetch: FetchOptions,
    pub filter: UrlFilter,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct MirrorSummary {
    pub report: VerifyReport,
    pub verify_path: PathBuf,
    pub fetch: FetchReport,
    pub rewrite: RewriteOutcome,
}

/// Reads and parses a JSON manifest.
pub fn load_manifest(path: &Path) -> Result<Value> {
    let bytes = fs::read(path).with_context(|| format!("read manifest: {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("parse manifest JSON: {}", path.display()))
}

/// `<root>/rewritten-manifests/<stem>_local.<ext>`.
pub fn rewritten_manifest_path(out_root: &Path, source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "manifest".to_string());
    let name = match source.extension() {
        Some(ext) => format!("{}_local.{}", stem, ext.to_string_lossy()),
        None => format!("{}_local", stem),
    };
    out_root.join(REWRITTEN_DIR).join(name)
}

/// Writes the rewritten manifest as pretty JSON and returns its path.
pub fn save_rewritten_manifest(
    manifest: &Value,
    out_root: &Path,
    source: &Path,
) -> Result<PathBuf> {
    let path = rewritten_manifest_path(out_root, source);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

/// Runs the whole pipeline.
pub fn run_mirror(opts: &MirrorOptions) -> Result<MirrorSummary> {
    run_mirror_with(opts, |_| {})
}

/// Like [`run_mirror`], reporting each fetch outcome as it completes.
pub fn run_mirror_with<F>(opts: &MirrorOptions, on_outcome: F) -> Result<MirrorSummary>
where
    F: FnMut(&FetchOutcome),
{
    let mut manifest = load_manifest(&opts.manifest_path)?;
    fs::create_dir_all(&opts.out_root)
        .with_context(|| format!("create output root: {}", opts.out_root.display()))?;

    let urls = walker::discover(&manifest, &opts.filter);
    tracing::info!(
        "found {} candidate URLs in {} (tracking filtered)",
        urls.len(),
        opts.manifest_path.display()
    );

    let fetch = fetch_all_with(&urls, &opts.out_root, &opts.fetch, on_outcome);

    let rewrite = walker::rewrite(&mut manifest, &opts.filter, &opts.out_root);
    let manifest_out = save_rewritten_manifest(&manifest, &opts.out_root, &opts.manifest_path)?;
    tracing::info!("saved rewritten manifest to {}", manifest_out.display());
    let manifest_out = fs::canonicalize(&manifest_out).unwrap_or(manifest_out);

    let missing = verify::missing_files(&rewrite.changed);
    for path in &missing {
        tracing::warn!("rewritten reference has no local file: {}", path.display());
    }

    let report = VerifyReport {
        found_urls_count: urls.len(),
        downloads_total_bytes: fetch.total_bytes,
        download_failures: fetch.failed.clone(),
        rewritten_count: rewrite.changed.len(),
        removed_blocked: rewrite.removed.len(),
        rewritten_manifest: manifest_out,
        missing_files: missing,
    };
    let verify_path = verify::write_report(&opts.out_root, &report)?;
    tracing::info!(
        failures = report.download_failures.len(),
        missing = report.missing_files.len(),
        "wrote verify summary to {}",
        verify_path.display()
    );

    Ok(MirrorSummary {
        report,
        verify_path,
        fetch,
        rewrite,
    })
}
