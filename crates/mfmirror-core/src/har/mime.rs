//! MIME type guess from a URL path extension, for capture entries that
//! recorded none.

/// Fallback when nothing better is known.
pub const OCTET_STREAM: &str = "application/octet-stream";

const BY_EXTENSION: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("htm", "text/html"),
    ("xhtml", "application/xhtml+xml"),
    ("css", "text/css"),
    ("js", "text/javascript"),
    ("mjs", "text/javascript"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("txt", "text/plain"),
    ("svg", "image/svg+xml"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("avif", "image/avif"),
    ("ico", "image/vnd.microsoft.icon"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
    ("otf", "font/otf"),
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/mp4"),
    ("ogg", "audio/ogg"),
    ("wav", "audio/wav"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("pdf", "application/pdf"),
    ("epub", "application/epub+zip"),
    ("zip", "application/zip"),
    ("wasm", "application/wasm"),
];

/// Guesses from the last path segment's extension (query and fragment ignored).
pub fn guess_from_url(url: &str) -> Option<&'static str> {
    let path = match url::Url::parse(url) {
        Ok(u) => u.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or(url).to_string(),
    };
    let name = path.rsplit('/').next()?;
    let (_, ext) = name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    BY_EXTENSION
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(guess_from_url("https://a.com/x/style.CSS?v=1"), Some("text/css"));
        assert_eq!(guess_from_url("https://a.com/cover.jpg#top"), Some("image/jpeg"));
        assert_eq!(guess_from_url("https://a.com/f.woff2"), Some("font/woff2"));
    }

    #[test]
    fn unknown_or_missing_extension() {
        assert_eq!(guess_from_url("https://a.com/api/items"), None);
        assert_eq!(guess_from_url("https://a.com/"), None);
        assert_eq!(guess_from_url("https://a.com/blob.xyz"), None);
    }
}
