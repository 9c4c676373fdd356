//! Manifest walker: URL discovery and in-place rewriting.
//!
//! `scan`/`discover` and `rewrite` are the same [`walk`] with different
//! callbacks. Blocked URLs answer `Remove` in both, so discovery sees the
//! manifest exactly as the rewrite will shape it (a resource dropped for a
//! blocked href takes its nested URLs with it in both passes).

mod traverse;

pub use traverse::{walk, UrlAction, Visitor, LINK_LISTS, RESOURCES};

use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::filter::UrlFilter;
use crate::mapper::map_url;

/// Every reference reachable in one manifest snapshot, split by the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scan {
    /// In-scope references: the URL set to fetch.
    pub urls: HashSet<String>,
    /// References the filter rejected.
    pub blocked: HashSet<String>,
}

/// Walks a copy of `manifest` and classifies every reference it meets.
pub fn scan(manifest: &Value, filter: &UrlFilter) -> Scan {
    let mut out = Scan::default();
    let mut snapshot = manifest.clone();
    walk(&mut snapshot, &mut |url| {
        if filter.is_blocked(url) {
            out.blocked.insert(url.to_string());
            UrlAction::Remove
        } else {
            out.urls.insert(url.to_string());
            UrlAction::Keep
        }
    });
    out
}

/// The in-scope URL set of `manifest`.
pub fn discover(manifest: &Value, filter: &UrlFilter) -> HashSet<String> {
    scan(manifest, filter).urls
}

/// One rewritten reference occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenRef {
    pub original: String,
    pub href: String,
    pub local_path: PathBuf,
}

/// Per-occurrence record of a rewrite pass.
#[derive(Debug, Clone, Default)]
pub struct RewriteOutcome {
    pub changed: Vec<RewrittenRef>,
    /// Original URLs removed because the filter blocked them.
    pub removed: Vec<String>,
}

/// Rewrites every in-scope reference to its mapped href and removes blocked
/// ones, mutating `manifest` in place.
pub fn rewrite(manifest: &mut Value, filter: &UrlFilter, root: &Path) -> RewriteOutcome {
    let mut out = RewriteOutcome::default();
    walk(manifest, &mut |url| {
        if filter.is_blocked(url) {
            out.removed.push(url.to_string());
            return UrlAction::Remove;
        }
        match map_url(url, root) {
            Ok(mapped) => {
                out.changed.push(RewrittenRef {
                    original: url.to_string(),
                    href: mapped.href.clone(),
                    local_path: mapped.local_path,
                });
                UrlAction::Replace(mapped.href)
            }
            Err(e) => {
                tracing::warn!("leaving unmappable reference in place: {}", e);
                UrlAction::Keep
            }
        }
    });
    tracing::debug!(
        changed = out.changed.len(),
        removed = out.removed.len(),
        "manifest rewritten"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::is_absolute_http;
    use serde_json::json;

    fn root() -> PathBuf {
        PathBuf::from("/out")
    }

    fn sample() -> Value {
        json!({
            "metadata": {"identifier": "https://pub.example.com/book/1", "title": "Book"},
            "links": [
                {"href": "https://pub.example.com/manifest.json", "rel": "self"},
                {"href": "https://www.google-analytics.com/collect"},
                "https://pub.example.com/bare-link"
            ],
            "images": [{"href": "https://cdn.example.com/cover.jpg?w=300"}],
            "readingOrder": [{"href": "https://pub.example.com/ch1.html"}],
            "resources": [
                {"href": "https://cdn.example.com/style.css", "type": "text/css"},
                {"href": "https://connect.facebook.net/sdk.js", "extra": "https://cdn.example.com/only-here.js"},
                {"type": "no-href"}
            ],
            "extensions": {
                "deep": [[{"poster": "https://cdn.example.com/p.png"}], "https://cdn.example.com/ch1.html"],
                "tracker": "https://analytics.example.com/t.js",
                "count": 3,
                "flag": true,
                "none": null
            }
        })
    }

    fn strings(v: &Value, out: &mut Vec<String>) {
        match v {
            Value::String(s) => out.push(s.clone()),
            Value::Array(a) => a.iter().for_each(|x| strings(x, out)),
            Value::Object(o) => o.values().for_each(|x| strings(x, out)),
            _ => {}
        }
    }

    #[test]
    fn links_and_blocked_resource_scenario() {
        let mut m = json!({
            "links": [{"href": "https://good.com/a?x=1"}],
            "resources": [{"href": "https://googletagmanager.com/gtm.js"}]
        });
        let filter = UrlFilter::default();
        let found = discover(&m, &filter);
        assert_eq!(found, HashSet::from(["https://good.com/a?x=1".to_string()]));

        let out = rewrite(&mut m, &filter, &root());
        let expected = "/good.com/a__q_7caf6056.html";
        assert_eq!(m, json!({"links": [{"href": expected}], "resources": []}));
        assert_eq!(out.changed.len(), 1);
        assert_eq!(out.removed, ["https://googletagmanager.com/gtm.js"]);
    }

    #[test]
    fn discovery_is_deterministic() {
        let m = sample();
        let filter = UrlFilter::default();
        let first = discover(&m, &filter);
        assert_eq!(discover(&m, &filter), first);
        assert_eq!(discover(&m, &filter), first);
        assert_eq!(m, sample(), "discovery must not mutate the manifest");
    }

    #[test]
    fn discovery_covers_structural_and_deep_refs() {
        let found = discover(&sample(), &UrlFilter::default());
        for url in [
            "https://pub.example.com/book/1",
            "https://pub.example.com/manifest.json",
            "https://pub.example.com/bare-link",
            "https://cdn.example.com/cover.jpg?w=300",
            "https://pub.example.com/ch1.html",
            "https://cdn.example.com/style.css",
            "https://cdn.example.com/p.png",
            "https://cdn.example.com/ch1.html",
        ] {
            assert!(found.contains(url), "missing {}", url);
        }
        assert!(!found.iter().any(|u| u.contains("analytics") || u.contains("facebook")));
        // Lives only inside a resource dropped for its blocked href.
        assert!(!found.contains("https://cdn.example.com/only-here.js"));
    }

    #[test]
    fn rewrite_accounts_for_exactly_the_scan() {
        let mut m = sample();
        let filter = UrlFilter::default();
        let before = scan(&m, &filter);

        let out = rewrite(&mut m, &filter, &root());
        let changed: HashSet<String> = out.changed.iter().map(|c| c.original.clone()).collect();
        let removed: HashSet<String> = out.removed.iter().cloned().collect();
        assert_eq!(changed, before.urls);
        assert_eq!(removed, before.blocked);
        assert!(changed.is_disjoint(&removed));
    }

    #[test]
    fn no_absolute_urls_survive_rewrite() {
        let mut m = sample();
        rewrite(&mut m, &UrlFilter::default(), &root());
        let mut all = Vec::new();
        strings(&m, &mut all);
        assert!(all.iter().all(|s| !is_absolute_http(s)), "{:?}", all);
        assert!(all.contains(&"Book".to_string()));
    }

    #[test]
    fn rewrite_shapes_recognized_fields() {
        let mut m = sample();
        rewrite(&mut m, &UrlFilter::default(), &root());
        assert_eq!(m["metadata"]["identifier"], "/pub.example.com/book/1");
        assert_eq!(m["links"].as_array().unwrap().len(), 3);
        assert!(m["links"][1].as_object().unwrap().is_empty());
        assert_eq!(m["links"][2], "/pub.example.com/bare-link");
        assert_eq!(
            m["resources"],
            json!([
                {"href": "/cdn.example.com/style.css", "type": "text/css"},
                {"type": "no-href"}
            ])
        );
        assert!(m["extensions"].get("tracker").is_none());
        assert_eq!(m["extensions"]["count"], 3);
        assert_eq!(m["extensions"]["none"], Value::Null);
    }

    #[test]
    fn rewrite_uses_mapper_output() {
        let mut m = sample();
        let out = rewrite(&mut m, &UrlFilter::default(), &root());
        for c in &out.changed {
            let mapped = map_url(&c.original, &root()).unwrap();
            assert_eq!(c.href, mapped.href);
            assert_eq!(c.local_path, mapped.local_path);
        }
    }

    #[test]
    fn rewrite_counts_each_occurrence() {
        let mut m = json!({"a": "https://x.com/1", "b": ["https://x.com/1"]});
        let out = rewrite(&mut m, &UrlFilter::default(), &root());
        assert_eq!(out.changed.len(), 2);
        let m = json!({"a": "https://x.com/1", "b": ["https://x.com/1"]});
        assert_eq!(discover(&m, &UrlFilter::default()).len(), 1);
    }

    #[test]
    fn second_rewrite_is_a_no_op() {
        let mut m = sample();
        let filter = UrlFilter::default();
        rewrite(&mut m, &filter, &root());
        let once = m.clone();
        let out = rewrite(&mut m, &filter, &root());
        assert!(out.changed.is_empty());
        assert!(out.removed.is_empty());
        assert_eq!(m, once);
        assert!(discover(&m, &filter).is_empty());
    }

    #[test]
    fn injected_filter_is_honored() {
        let m = json!({"a": "https://keep.com/x", "b": "https://drop.com/y"});
        let found = discover(&m, &UrlFilter::new(["drop.com"]));
        assert_eq!(found, HashSet::from(["https://keep.com/x".to_string()]));
    }
}
