//! Terminal progress bar for the fetch phase.

use indicatif::{ProgressBar, ProgressStyle};
use mfmirror_core::fetcher::FetchOutcome;

const PB_STYLE: &str = "{spinner:.blue} [{elapsed_precise}] {wide_bar:.cyan/blue} {pos}/{len} files {msg}";

const PB_CHARS: &str = "█▓▒░  ";

pub struct FetchProgress {
    pb: ProgressBar,
}

impl FetchProgress {
    pub fn new(len: u64) -> Self {
        let pb = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::with_template(PB_STYLE) {
            pb.set_style(style.progress_chars(PB_CHARS));
        }
        Self { pb }
    }

    pub fn record(&self, outcome: &FetchOutcome) {
        if !outcome.ok {
            self.pb.println(format!("failed: {}", outcome.url));
        }
        self.pb.inc(1);
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}
