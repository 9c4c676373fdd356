//! Fixed-size worker pool over scoped threads.
//!
//! Workers pull jobs from a shared queue and send back immutable outcomes;
//! the calling thread receives them in completion order. Nothing is shared
//! between workers except the queue itself.

use curl::easy::Easy;
use std::sync::mpsc::{self, Sender};
use std::sync::Mutex;
use std::thread;

use crate::mapper::MappedUrl;
use crate::retry::run_with_retry;

use super::request::download_once;
use super::{FetchOptions, FetchOutcome};

/// One URL scheduled for download.
pub(super) struct Job {
    pub url: String,
    pub mapped: MappedUrl,
}

type JobQueue = Mutex<std::vec::IntoIter<Job>>;

/// Runs `jobs` on `opts.concurrency` workers, handing each outcome to
/// `on_outcome` as soon as it arrives.
pub(super) fn run_pool<F>(jobs: Vec<Job>, opts: &FetchOptions, mut on_outcome: F)
where
    F: FnMut(FetchOutcome),
{
    let workers = opts.concurrency.max(1).min(jobs.len());
    if workers == 0 {
        return;
    }
    tracing::debug!(jobs = jobs.len(), workers, "starting fetch workers");

    let queue: JobQueue = Mutex::new(jobs.into_iter());
    let (tx, rx) = mpsc::channel();

    thread::scope(|s| {
        for worker in 0..workers {
            let tx = tx.clone();
            let queue = &queue;
            s.spawn(move || worker_loop(worker, queue, opts, tx));
        }
        drop(tx);
        for outcome in rx {
            on_outcome(outcome);
        }
    });
}

fn worker_loop(worker: usize, queue: &JobQueue, opts: &FetchOptions, tx: Sender<FetchOutcome>) {
    let mut easy = Easy::new();
    loop {
        let next = {
            let mut q = match queue.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            q.next()
        };
        let Some(job) = next else {
            break;
        };
        let outcome = fetch_job(&mut easy, worker, job, opts);
        if tx.send(outcome).is_err() {
            break;
        }
    }
}

fn fetch_job(easy: &mut Easy, worker: usize, job: Job, opts: &FetchOptions) -> FetchOutcome {
    let Job { url, mapped } = job;
    tracing::debug!(worker, "GET {}", url);
    let (result, attempts) = run_with_retry(&opts.retry, |_| {
        download_once(easy, &url, &mapped.local_path, opts)
    });
    match result {
        Ok(bytes) => {
            tracing::debug!(
                worker,
                bytes,
                attempts,
                "saved {} -> {}",
                url,
                mapped.local_path.display()
            );
            FetchOutcome {
                url,
                ok: true,
                status: Some(200),
                bytes,
                local_path: mapped.local_path,
                href: mapped.href,
                skipped: false,
                attempts,
                error: None,
            }
        }
        Err(e) => {
            tracing::warn!(worker, attempts, "fetch failed for {}: {}", url, e);
            FetchOutcome {
                url,
                ok: false,
                status: e.status(),
                bytes: 0,
                local_path: mapped.local_path,
                href: mapped.href,
                skipped: false,
                attempts,
                error: Some(e.to_string()),
            }
        }
    }
}
