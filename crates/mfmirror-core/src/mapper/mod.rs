//! Path mapper: remote URL → local artifact path and rewritten reference.
//!
//! `map_url` is a pure function of `(url, root)`. Discovery, fetching and
//! rewriting all call it, and they agree only because it never depends on
//! anything else (no filesystem state, no clock, no counters).
//!
//! Layout: `root/<host>/<decoded path>`. A trailing `/` maps to
//! `index.html`. A non-empty query string is folded into the filename as
//! `__q_<hash8>` before the extension (default `.html`), so URLs differing
//! only by query land in distinct files. Two URLs can still collide if host,
//! decoded path and the 8-hex-digit fingerprint all match; that risk is
//! accepted.

mod decode;
mod sanitize;

use sha1::{Digest, Sha1};
use std::path::{Path, PathBuf};

use decode::percent_decode;
use sanitize::sanitize_segment;

/// Filename used when the URL path is empty or ends in `/`.
pub const DEFAULT_FILENAME: &str = "index.html";

/// Extension inserted when a query-bearing URL has none.
pub const DEFAULT_QUERY_EXT: &str = ".html";

/// Hex digits of the query fingerprint kept in filenames.
pub const FINGERPRINT_LEN: usize = 8;

/// Where a URL is stored locally and how the rewritten manifest refers to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedUrl {
    /// `root/<host>/<mapped path>`.
    pub local_path: PathBuf,
    /// `/<host>/<mapped path>`, absolute from the served root.
    pub href: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("invalid URL {url}: {source}")]
    Invalid {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("URL has no host: {0}")]
    MissingHost(String),
}

/// Maps `url` to its local artifact path under `root` and its rewritten href.
pub fn map_url(url: &str, root: &Path) -> Result<MappedUrl, MapError> {
    let parsed = url::Url::parse(url).map_err(|source| MapError::Invalid {
        url: url.to_string(),
        source,
    })?;
    let host = match parsed.host_str() {
        Some(h) if !h.is_empty() => h,
        _ => return Err(MapError::MissingHost(url.to_string())),
    };
    let host = match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    let mut path = percent_decode(parsed.path());
    if path.is_empty() {
        path.push('/');
    }
    if path.ends_with('/') {
        path.push_str(DEFAULT_FILENAME);
    }

    let mapped = match raw_query(url) {
        Some(q) if !q.is_empty() => splice_fingerprint(&path, &query_fingerprint(q)),
        _ => path,
    };

    let segments: Vec<String> = mapped
        .split('/')
        .filter(|s| !s.is_empty())
        .map(sanitize_segment)
        .collect();

    let mut local_path = root.join(&host);
    let mut href = format!("/{}", host);
    for segment in &segments {
        local_path.push(segment);
        href.push('/');
        href.push_str(segment);
    }

    Ok(MappedUrl { local_path, href })
}

/// The query exactly as written in `url`: after the first `?`, before any `#`.
/// `Url::query` re-encodes it, which would merge `?q=é` with `?q=%C3%A9`.
fn raw_query(url: &str) -> Option<&str> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    without_fragment.split_once('?').map(|(_, q)| q)
}

/// First [`FINGERPRINT_LEN`] hex digits of SHA-1 over the raw query string.
pub fn query_fingerprint(query: &str) -> String {
    let digest = Sha1::digest(query.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(FINGERPRINT_LEN);
    hex
}

/// `/a/b.js` + `h` → `/a/b__q_h.js`; `/a/b` + `h` → `/a/b__q_h.html`.
fn splice_fingerprint(path: &str, fingerprint: &str) -> String {
    let (base, ext) = split_extension(path);
    let ext = if ext.is_empty() { DEFAULT_QUERY_EXT } else { ext };
    format!("{}__q_{}{}", base, fingerprint, ext)
}

/// Splits off the extension of the final segment. Leading dots of the final
/// segment do not start an extension (`.env` has none).
fn split_extension(path: &str) -> (&str, &str) {
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    let name = &path[name_start..];
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name[leading_dots..].rfind('.') {
        Some(dot) => path.split_at(name_start + leading_dots + dot),
        None => (path, ""),
    }
}
