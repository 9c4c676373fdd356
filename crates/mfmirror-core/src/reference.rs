//! Recognizing manifest strings that are absolute HTTP(S) references.

/// Cheap prefix test for `http://` or `https://`.
pub fn is_absolute_http(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// True if `s` is an absolute HTTP(S) URL with a host, i.e. something the
/// path mapper can place on disk. Both walker passes use this predicate, so a
/// prefixed string that fails to parse is ignored consistently by both.
pub fn is_reference(s: &str) -> bool {
    if !is_absolute_http(s) {
        return false;
    }
    match url::Url::parse(s) {
        Ok(u) => u.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_only() {
        assert!(is_absolute_http("http://a.com"));
        assert!(is_absolute_http("https://a.com/x"));
        assert!(!is_absolute_http("HTTPS://a.com"));
        assert!(!is_absolute_http("ftp://a.com"));
        assert!(!is_absolute_http("/a.com/x"));
        assert!(!is_absolute_http("see https://a.com"));
    }

    #[test]
    fn reference_requires_host() {
        assert!(is_reference("https://cdn.example.com/a.png"));
        assert!(is_reference("http://127.0.0.1:8080/"));
        assert!(!is_reference("https://"));
        assert!(!is_reference("http:///path"));
        assert!(!is_reference("urn:isbn:123"));
    }
}
