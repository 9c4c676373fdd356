//! Retry and backoff policy.
//!
//! Transport faults (connect, DNS, timeout, reset) are retried with linear
//! backoff. A bad HTTP status is assumed stable and ends the attempt loop at
//! once, as does a local storage failure.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error};
pub use error::FetchError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
