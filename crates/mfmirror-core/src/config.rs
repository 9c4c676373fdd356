use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetcher::FetchOptions;
use crate::filter::UrlFilter;
use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per URL (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for linear backoff (attempt × base).
    pub base_delay_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.5,
        }
    }
}

/// Global configuration loaded from `~/.config/mfmirror/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Number of concurrent download workers.
    pub concurrency: usize,
    /// Reuse artifacts already present under the output root instead of re-fetching.
    #[serde(default)]
    pub skip_existing: bool,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Connect timeout in seconds (None = 30).
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    /// Whole-request timeout in seconds (None = 60).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Replaces the built-in tracking denylist when present.
    #[serde(default)]
    pub blocklist: Option<Vec<String>>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            skip_existing: false,
            retry: None,
            connect_timeout_secs: None,
            timeout_secs: None,
            blocklist: None,
        }
    }
}

impl MirrorConfig {
    /// Fails when `base_delay_secs` is not representable as a delay (infinite or too large).
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        let Some(r) = &self.retry else {
            return Ok(RetryPolicy::default());
        };
        let base_delay = Duration::try_from_secs_f64(r.base_delay_secs.max(0.0))
            .with_context(|| format!("invalid retry.base_delay_secs: {}", r.base_delay_secs))?;
        Ok(RetryPolicy {
            max_attempts: r.max_attempts.max(1),
            base_delay,
        })
    }

    /// Fetch options derived from this config (CLI flags may override afterwards).
    pub fn fetch_options(&self) -> Result<FetchOptions> {
        let mut opts = FetchOptions {
            concurrency: self.concurrency.max(1),
            skip_existing: self.skip_existing,
            retry: self.retry_policy()?,
            ..FetchOptions::default()
        };
        if let Some(secs) = self.connect_timeout_secs {
            opts.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.timeout_secs {
            opts.timeout = Duration::from_secs(secs);
        }
        Ok(opts)
    }

    pub fn url_filter(&self) -> UrlFilter {
        match &self.blocklist {
            Some(patterns) => UrlFilter::new(patterns.clone()),
            None => UrlFilter::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mfmirror")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MirrorConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<MirrorConfig> {
    if !path.exists() {
        let default_cfg = MirrorConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: MirrorConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    cfg.retry_policy().with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
