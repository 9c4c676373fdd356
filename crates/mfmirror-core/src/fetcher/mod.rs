//! Fetcher: downloads a URL set into the output tree with bounded concurrency.
//!
//! Each URL is mapped before scheduling. With `skip_existing`, an artifact
//! already on disk yields a synthetic success without touching the network.
//! Everything else goes to a fixed pool of workers, each streaming responses
//! to disk through its own reused libcurl handle. Totals are computed after
//! all outcomes are in, so they do not depend on completion order.

mod pool;
mod request;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::mapper::map_url;
use crate::retry::RetryPolicy;

use pool::{run_pool, Job};

pub const DEFAULT_CONCURRENCY: usize = 8;

/// Knobs for one fetch run.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Number of workers (clamped to at least 1).
    pub concurrency: usize,
    /// Reuse artifacts already present at their mapped path.
    pub skip_existing: bool,
    pub retry: RetryPolicy,
    pub connect_timeout: Duration,
    /// Whole-request timeout per attempt.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            skip_existing: false,
            retry: RetryPolicy::default(),
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(60),
            user_agent: concat!("mfmirror/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Result for one URL in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub url: String,
    pub ok: bool,
    /// Final HTTP status; `None` for transport, storage and mapping failures.
    pub status: Option<u32>,
    /// Bytes written (or found on disk when skipped).
    pub bytes: u64,
    pub local_path: PathBuf,
    pub href: String,
    /// True when an existing artifact was reused.
    pub skipped: bool,
    /// Network attempts made (0 when skipped or unmappable).
    pub attempts: u32,
    pub error: Option<String>,
}

/// Aggregate of a fetch run.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    /// In completion order.
    pub outcomes: Vec<FetchOutcome>,
    /// Sum of `bytes` over successful outcomes.
    pub total_bytes: u64,
    /// Original URLs of failed outcomes, sorted.
    pub failed: Vec<String>,
}

impl FetchReport {
    pub fn from_outcomes(outcomes: Vec<FetchOutcome>) -> Self {
        let total_bytes = outcomes.iter().filter(|o| o.ok).map(|o| o.bytes).sum();
        let mut failed: Vec<String> = outcomes
            .iter()
            .filter(|o| !o.ok)
            .map(|o| o.url.clone())
            .collect();
        failed.sort();
        Self {
            outcomes,
            total_bytes,
            failed,
        }
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.skipped).count()
    }
}

/// Fetches every URL in `urls` under `root`.
pub fn fetch_all(urls: &HashSet<String>, root: &Path, opts: &FetchOptions) -> FetchReport {
    fetch_all_with(urls, root, opts, |_| {})
}

/// Like [`fetch_all`], calling `on_outcome` on the calling thread as each
/// outcome is recorded (skipped ones first, then in completion order).
pub fn fetch_all_with<F>(
    urls: &HashSet<String>,
    root: &Path,
    opts: &FetchOptions,
    mut on_outcome: F,
) -> FetchReport
where
    F: FnMut(&FetchOutcome),
{
    let mut ordered: Vec<&String> = urls.iter().collect();
    ordered.sort();

    let mut outcomes = Vec::with_capacity(urls.len());
    let mut jobs = Vec::new();

    for url in ordered {
        let mapped = match map_url(url, root) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("cannot map {}: {}", url, e);
                let outcome = FetchOutcome {
                    url: url.clone(),
                    ok: false,
                    status: None,
                    bytes: 0,
                    local_path: PathBuf::new(),
                    href: String::new(),
                    skipped: false,
                    attempts: 0,
                    error: Some(e.to_string()),
                };
                on_outcome(&outcome);
                outcomes.push(outcome);
                continue;
            }
        };

        if opts.skip_existing {
            if let Some(size) = existing_size(&mapped.local_path) {
                tracing::debug!("skip existing {}", mapped.local_path.display());
                let outcome = FetchOutcome {
                    url: url.clone(),
                    ok: true,
                    status: Some(200),
                    bytes: size,
                    local_path: mapped.local_path,
                    href: mapped.href,
                    skipped: true,
                    attempts: 0,
                    error: None,
                };
                on_outcome(&outcome);
                outcomes.push(outcome);
                continue;
            }
        }

        jobs.push(Job {
            url: url.clone(),
            mapped,
        });
    }

    tracing::info!(
        total = urls.len(),
        scheduled = jobs.len(),
        concurrency = opts.concurrency,
        "fetching assets"
    );

    run_pool(jobs, opts, |outcome| {
        on_outcome(&outcome);
        outcomes.push(outcome);
    });

    let report = FetchReport::from_outcomes(outcomes);
    tracing::info!(
        bytes = report.total_bytes,
        failed = report.failed.len(),
        skipped = report.skipped_count(),
        "fetch finished"
    );
    report
}

fn existing_size(path: &Path) -> Option<u64> {
    let meta = fs::metadata(path).ok()?;
    meta.is_file().then(|| meta.len())
}
