//! URL filter: keeps tracking and analytics endpoints out of the mirror.
//!
//! Matching is a plain substring test over the whole URL, not a host
//! comparison, so `analytics.` also matches `https://cdn.com/analytics.js`.
//! Over-blocking is accepted; a missed tracker is not.

/// Fragments blocked when no custom list is configured.
pub const DEFAULT_BLOCKLIST: &[&str] = &[
    "googletagmanager.com",
    "google-analytics.com",
    "connect.facebook.net",
    "firebaseinstallations.googleapis.com",
    "firebase.googleapis.com",
    "storage.googleapis.com",
    "analytics.",
];

/// Substring denylist applied to candidate URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlFilter {
    patterns: Vec<String>,
}

impl Default for UrlFilter {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCKLIST.iter().map(|s| s.to_string()))
    }
}

impl UrlFilter {
    /// Builds a filter from arbitrary fragments. Empty fragments are dropped,
    /// since they would match every URL.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// True if `url` is empty or contains any denylisted fragment.
    pub fn is_blocked(&self, url: &str) -> bool {
        if url.is_empty() {
            return true;
        }
        self.patterns.iter().any(|p| url.contains(p.as_str()))
    }
}
