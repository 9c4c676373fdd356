//! Classify fetch errors into retry policy error kinds.

use super::error::FetchError;
use super::policy::ErrorKind;

/// Classify a curl error. Anything that can plausibly succeed on a second
/// try counts as transport; malformed input does not.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_url_malformed() || e.is_unsupported_protocol() || e.is_write_error() {
        return ErrorKind::Other;
    }
    ErrorKind::Transport
}

/// Classify a fetch error into an ErrorKind.
pub fn classify(e: &FetchError) -> ErrorKind {
    match e {
        FetchError::Transport(ce) => classify_curl_error(ce),
        FetchError::Http(code) => ErrorKind::Http(*code),
        FetchError::Storage(_) => ErrorKind::Other,
    }
}
