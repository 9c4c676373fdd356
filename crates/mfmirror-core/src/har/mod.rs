//! Capture-to-resources converter: turns a HAR capture into the flat
//! `{href, type}` resource list of a manifest.
//!
//! The list replaces the manifest's `resources` field wholesale; there is no
//! merge with what was there before.

mod mime;
mod parse;

pub use mime::{guess_from_url, OCTET_STREAM};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use parse::HarLog;

/// One entry of a manifest's `resources` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub href: String,
    #[serde(rename = "type")]
    pub media_type: String,
}

/// Parses HAR JSON bytes into resource records, in capture order.
///
/// Entries without an `http`-prefixed request URL are skipped. A missing or
/// empty MIME type is guessed from the URL extension, then falls back to
/// `application/octet-stream`.
pub fn resources_from_har_bytes(bytes: &[u8]) -> Result<Vec<ResourceRecord>> {
    let har: HarLog = serde_json::from_slice(bytes).context("parse HAR JSON")?;
    let records = har
        .log
        .entries
        .into_iter()
        .filter_map(|entry| {
            let url = entry.request.url.filter(|u| u.starts_with("http"))?;
            let media_type = entry
                .response
                .content
                .mime_type
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| guess_from_url(&url).unwrap_or(OCTET_STREAM).to_string());
            Some(ResourceRecord {
                href: url,
                media_type,
            })
        })
        .collect();
    Ok(records)
}

/// Reads a HAR file and extracts its resource records.
pub fn extract_resources(har_path: &Path) -> Result<Vec<ResourceRecord>> {
    let bytes =
        fs::read(har_path).with_context(|| format!("read HAR file: {}", har_path.display()))?;
    resources_from_har_bytes(&bytes).with_context(|| format!("HAR file: {}", har_path.display()))
}

/// Replaces `resources` in the manifest at `manifest_path` with the records
/// from `har_path`, writing to `output` (or back in place). Returns the
/// number of records written.
pub fn update_resources(
    manifest_path: &Path,
    har_path: &Path,
    output: Option<&Path>,
) -> Result<usize> {
    let bytes = fs::read(manifest_path)
        .with_context(|| format!("read manifest: {}", manifest_path.display()))?;
    let mut manifest: Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse manifest JSON: {}", manifest_path.display()))?;
    let records = extract_resources(har_path)?;

    let obj = manifest
        .as_object_mut()
        .with_context(|| format!("manifest is not a JSON object: {}", manifest_path.display()))?;
    obj.insert("resources".to_string(), serde_json::to_value(&records)?);

    let out = output.unwrap_or(manifest_path);
    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(out, json).with_context(|| format!("write {}", out.display()))?;
    tracing::info!("updated {} with {} resources", out.display(), records.len());
    Ok(records.len())
}
