//! `mfmirror mirror` – download, rewrite, verify.

use anyhow::Result;
use mfmirror_core::config::MirrorConfig;
use mfmirror_core::mirror::{self, MirrorOptions};
use mfmirror_core::walker;
use std::path::PathBuf;

use crate::cli::progress::FetchProgress;

/// Flags of the `mirror` subcommand; `None`/`false` defer to config.
#[derive(Debug, Clone)]
pub struct MirrorArgs {
    pub manifest: PathBuf,
    pub out_root: PathBuf,
    pub concurrency: Option<usize>,
    pub skip_existing: bool,
}

/// Merge CLI flags over config values.
pub fn mirror_options(cfg: &MirrorConfig, args: MirrorArgs) -> Result<MirrorOptions> {
    let mut fetch = cfg.fetch_options()?;
    if let Some(n) = args.concurrency {
        fetch.concurrency = n.max(1);
    }
    fetch.skip_existing |= args.skip_existing;
    Ok(MirrorOptions {
        manifest_path: args.manifest,
        out_root: args.out_root,
        fetch,
        filter: cfg.url_filter(),
    })
}

/// Prints at most this many missing files.
const MISSING_SHOWN: usize = 200;

pub fn run_mirror_command(cfg: &MirrorConfig, args: MirrorArgs) -> Result<()> {
    let opts = mirror_options(cfg, args)?;

    // Cheap pre-count for the progress bar; the run discovers again from the same file.
    let total = walker::discover(&mirror::load_manifest(&opts.manifest_path)?, &opts.filter).len();
    let progress = FetchProgress::new(total as u64);
    let summary = mirror::run_mirror_with(&opts, |outcome| progress.record(outcome))?;
    progress.finish();

    let report = &summary.report;
    println!("Found {} candidate URLs (analytics/tracking filtered).", report.found_urls_count);
    println!(
        "Downloaded total bytes: {}. Failures: {}",
        report.downloads_total_bytes,
        report.download_failures.len()
    );
    for url in &report.download_failures {
        println!("  FAILED: {}", url);
    }
    println!("Saved rewritten manifest to: {}", report.rewritten_manifest.display());
    println!("Wrote verify summary to: {}", summary.verify_path.display());

    if report.missing_files.is_empty() {
        println!("All rewritten files exist locally.");
    } else {
        println!("WARNING: the following rewritten local files are MISSING:");
        for path in report.missing_files.iter().take(MISSING_SHOWN) {
            println!("  MISSING: {}", path.display());
        }
        if report.missing_files.len() > MISSING_SHOWN {
            println!("  ... and {} more", report.missing_files.len() - MISSING_SHOWN);
        }
    }
    Ok(())
}
