//! Minimal HAR 1.2 structures: request URL and response MIME type per entry.
//!
//! Every level defaults when absent, so captures from different browsers
//! (or hand-trimmed ones) still parse.

use serde::Deserialize;

/// Root HAR document (top-level wrapper).
#[derive(Debug, Default, Deserialize)]
pub struct HarLog {
    #[serde(default)]
    pub log: HarRoot,
}

#[derive(Debug, Default, Deserialize)]
pub struct HarRoot {
    #[serde(default)]
    pub entries: Vec<HarEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HarEntry {
    #[serde(default)]
    pub request: HarRequest,
    #[serde(default)]
    pub response: HarResponse,
}

#[derive(Debug, Default, Deserialize)]
pub struct HarRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HarResponse {
    #[serde(default)]
    pub content: HarContent,
}

#[derive(Debug, Default, Deserialize)]
pub struct HarContent {
    #[serde(default, rename = "mimeType")]
    pub mime_type: Option<String>,
}
