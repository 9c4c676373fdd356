//! `mfmirror discover --manifest <path>` – print the URL set, no network.

use anyhow::Result;
use mfmirror_core::config::MirrorConfig;
use mfmirror_core::{mirror, walker};
use std::path::Path;

pub fn run_discover(cfg: &MirrorConfig, manifest_path: &Path) -> Result<()> {
    let manifest = mirror::load_manifest(manifest_path)?;
    let scan = walker::scan(&manifest, &cfg.url_filter());

    let mut urls: Vec<&String> = scan.urls.iter().collect();
    urls.sort();
    for url in &urls {
        println!("{}", url);
    }
    eprintln!(
        "{} URLs in scope, {} blocked by the tracking filter",
        urls.len(),
        scan.blocked.len()
    );
    Ok(())
}
