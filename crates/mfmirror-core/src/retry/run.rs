//! Retry loop: run a closure until success or policy says stop.

use super::classify;
use super::error::FetchError;
use super::policy::{RetryDecision, RetryPolicy};

/// Runs `f` until it succeeds or the retry policy says to stop, sleeping for
/// the backoff between attempts. `f` receives the 1-based attempt number.
/// Returns the final result and the number of attempts made.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> (Result<T, FetchError>, u32)
where
    F: FnMut(u32) -> Result<T, FetchError>,
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(v) => return (Ok(v), attempt),
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => return (Err(e), attempt),
                    RetryDecision::RetryAfter(d) => {
                        tracing::debug!(
                            attempt,
                            delay_ms = d.as_millis() as u64,
                            "retrying after {}",
                            e
                        );
                        std::thread::sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}
