//! Per-URL download error type for retry classification.

use std::fmt;

/// Error returned by a single download attempt (curl failure, HTTP status, or storage failure).
/// Used so we can classify and decide retries before recording the outcome.
#[derive(Debug)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, DNS, etc.).
    Transport(curl::Error),
    /// Final response status was not 200.
    Http(u32),
    /// Creating or writing the local artifact failed. Not retried.
    Storage(std::io::Error),
}

impl FetchError {
    /// HTTP status observed, if the failure was a protocol error.
    pub fn status(&self) -> Option<u32> {
        match self {
            FetchError::Http(code) => Some(*code),
            FetchError::Transport(_) | FetchError::Storage(_) => None,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(e) => write!(f, "{}", e),
            FetchError::Http(code) => write!(f, "HTTP {}", code),
            FetchError::Storage(e) => write!(f, "storage: {}", e),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Transport(e) => Some(e),
            FetchError::Storage(e) => Some(e),
            FetchError::Http(_) => None,
        }
    }
}

impl From<std::io::Error> for FetchError {
    fn from(e: std::io::Error) -> Self {
        FetchError::Storage(e)
    }
}
