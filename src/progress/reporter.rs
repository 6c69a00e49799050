//! Progress reporter implementation
//!
//! Uses indicatif for progress display during a sync run:
//! - File count progress
//! - Byte transfer progress
//! - Status line with the current operation

use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Progress reporter shared across pool workers
pub struct ProgressReporter {
    multi: MultiProgress,
    /// Byte transfer progress bar
    bytes_bar: ProgressBar,
    /// File count progress bar
    files_bar: ProgressBar,
    /// Current status message
    status: ProgressBar,
    start_time: Instant,
    bytes_done: AtomicU64,
    files_done: AtomicU64,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let multi = MultiProgress::new();

        let status = multi.add(ProgressBar::new_spinner());
        status.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid template"),
        );

        let files_bar = multi.add(ProgressBar::new(0));
        files_bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:.bold.dim} [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%)")
                .expect("Invalid template")
                .progress_chars("=> "),
        );
        files_bar.set_prefix("Files");

        let bytes_bar = multi.add(ProgressBar::new(0));
        bytes_bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:.bold.dim} [{bar:40.green/white}] {bytes}/{total_bytes} ({bytes_per_sec})")
                .expect("Invalid template")
                .progress_chars("=> "),
        );
        bytes_bar.set_prefix("Data ");

        Self {
            multi,
            bytes_bar,
            files_bar,
            status,
            start_time: Instant::now(),
            bytes_done: AtomicU64::new(0),
            files_done: AtomicU64::new(0),
        }
    }

    /// Create a hidden reporter for quiet mode
    pub fn disabled() -> Self {
        let reporter = Self::new();
        reporter.multi.set_draw_target(ProgressDrawTarget::hidden());
        reporter
    }

    /// Set total files to transfer
    pub fn set_total_files(&self, total: u64) {
        self.files_bar.set_length(total);
    }

    /// Set total bytes to transfer
    pub fn set_total_bytes(&self, total: u64) {
        self.bytes_bar.set_length(total);
    }

    /// Increment files transferred
    pub fn increment_files(&self, count: u64) {
        self.files_done.fetch_add(count, Ordering::Relaxed);
        self.files_bar.inc(count);
    }

    /// Increment bytes transferred
    pub fn increment_bytes(&self, bytes: u64) {
        self.bytes_done.fetch_add(bytes, Ordering::Relaxed);
        self.bytes_bar.inc(bytes);
    }

    /// Set current status message
    pub fn set_status(&self, msg: &str) {
        self.status.set_message(msg.to_string());
    }

    /// Elapsed time since creation
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Stop all bars and print a closing status
    pub fn finish(&self, msg: &str) {
        self.status.finish_with_message(style(msg).green().to_string());
        self.files_bar.finish();
        self.bytes_bar.finish();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_reporter_counts() {
        let reporter = ProgressReporter::disabled();
        reporter.set_total_files(10);
        reporter.increment_files(3);
        reporter.increment_bytes(100);

        assert_eq!(reporter.files_done.load(Ordering::Relaxed), 3);
        assert_eq!(reporter.bytes_done.load(Ordering::Relaxed), 100);
    }
}
