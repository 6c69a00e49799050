//! Directory-level sync engine
//!
//! Builds transfer items from a local scan or a remote listing, runs
//! them through the worker pool against an `ObjectStore`, and reports
//! one result per run.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{Direction, SyncConfig};
use crate::core::{run_transfer, TransferItem};
use crate::error::{Result, SyncError};
use crate::fs::scan_local;
use crate::progress::ProgressReporter;
use crate::storage::{normalize_prefix, ObjectStore, RemoteLister};

/// Result of a completed sync run
#[derive(Debug)]
pub struct SyncResult {
    /// Direction of the run
    pub direction: Direction,
    /// Objects transferred
    pub files_transferred: u64,
    /// Bytes transferred
    pub bytes_transferred: u64,
    /// Wall-clock duration
    pub duration: Duration,
    /// Average throughput in bytes/second
    pub throughput: f64,
}

impl SyncResult {
    /// Print summary to console
    pub fn print_summary(&self) {
        println!("\n=== Sync Summary ===");
        println!("Direction:       {}", self.direction);
        println!("Files:           {}", self.files_transferred);
        println!(
            "Bytes:           {}",
            humansize::format_size(self.bytes_transferred, humansize::BINARY)
        );
        println!(
            "Duration:        {}",
            humantime::format_duration(Duration::from_secs(self.duration.as_secs()))
        );
        println!(
            "Throughput:      {}/s",
            humansize::format_size(self.throughput as u64, humansize::BINARY)
        );
    }
}

/// Upload one file: create or overwrite the object at the item's key.
///
/// No local side effect.
pub fn upload_one(store: &dyn ObjectStore, item: &TransferItem) -> Result<u64> {
    store.put_object(&item.remote_key, &item.local_path)
}

/// Download one object into the item's local path, creating any missing
/// ancestor directories first.
///
/// Directory creation is create-if-absent, so concurrent workers
/// materializing the same ancestor never fail each other.
pub fn download_one(store: &dyn ObjectStore, item: &TransferItem) -> Result<u64> {
    if let Some(parent) = item.local_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
    }
    store.get_object(&item.remote_key, &item.local_path)
}

/// Orchestrates directory-level sync runs against one object store.
pub struct SyncEngine {
    store: Arc<dyn ObjectStore>,
    config: SyncConfig,
    progress: Option<ProgressReporter>,
}

impl SyncEngine {
    /// Create an engine over `store` with the given pool settings.
    pub fn new(store: Arc<dyn ObjectStore>, config: SyncConfig) -> Self {
        Self {
            store,
            config,
            progress: None,
        }
    }

    /// Attach a progress reporter.
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Mirror `local_dir` to `remote_prefix`.
    ///
    /// Scans the local tree, uploads every regular file under a key of
    /// the form `prefix/relative-path`, overwriting existing objects.
    /// Objects outside the uploaded relative paths are left untouched.
    pub fn upload_directory(&self, local_dir: &Path, remote_prefix: &str) -> Result<SyncResult> {
        let start = Instant::now();
        let prefix = normalize_prefix(remote_prefix);
        let source_root = local_dir.display().to_string();

        tracing::info!(local = %source_root, remote = %prefix, "start upload");

        let files = scan_local(local_dir)?;
        let total_bytes: u64 = files.iter().map(|f| f.size).sum();

        let items: Vec<TransferItem> = files
            .into_iter()
            .map(|f| TransferItem {
                remote_key: format!("{}{}", prefix, f.relative_path),
                relative_path: f.relative_path,
                local_path: f.path,
            })
            .collect();

        if let Some(progress) = &self.progress {
            progress.set_status("Uploading...");
            progress.set_total_files(items.len() as u64);
            progress.set_total_bytes(total_bytes);
        }

        let store = &*self.store;
        let progress = &self.progress;
        let totals = run_transfer(
            Direction::Upload,
            &source_root,
            &prefix,
            items,
            |item| {
                let bytes = upload_one(store, item)?;
                if let Some(progress) = progress {
                    progress.increment_files(1);
                    progress.increment_bytes(bytes);
                }
                Ok(bytes)
            },
            &self.config,
        )?;

        let duration = start.elapsed();
        tracing::info!(local = %source_root, files = totals.files, "upload complete");

        Ok(SyncResult {
            direction: Direction::Upload,
            files_transferred: totals.files,
            bytes_transferred: totals.bytes,
            duration,
            throughput: totals.bytes as f64 / duration.as_secs_f64().max(f64::EPSILON),
        })
    }

    /// Mirror every object under `remote_prefix` into `local_dir`.
    ///
    /// A listing failure is fatal and aborts the run before any
    /// transfer starts. Directory-marker keys produce no local file;
    /// missing local directories are created as needed. Existing local
    /// files at downloaded paths are overwritten.
    pub fn download_directory(&self, remote_prefix: &str, local_dir: &Path) -> Result<SyncResult> {
        let start = Instant::now();
        let prefix = normalize_prefix(remote_prefix);
        let dest_root = local_dir.display().to_string();

        tracing::info!(remote = %prefix, local = %dest_root, "start download");

        // Listing is materialized before the first transfer so a bad
        // prefix fails the run cleanly.
        let keys: Vec<String> =
            RemoteLister::new(&*self.store, &prefix).collect::<Result<Vec<_>>>()?;

        let items: Vec<TransferItem> = keys
            .into_iter()
            .map(|key| {
                let relative = key
                    .strip_prefix(prefix.as_str())
                    .unwrap_or(key.as_str())
                    .to_string();
                TransferItem {
                    local_path: join_relative(local_dir, &relative),
                    relative_path: relative,
                    remote_key: key,
                }
            })
            .collect();

        if let Some(progress) = &self.progress {
            progress.set_status("Downloading...");
            progress.set_total_files(items.len() as u64);
        }

        let store = &*self.store;
        let progress = &self.progress;
        let totals = run_transfer(
            Direction::Download,
            &prefix,
            &dest_root,
            items,
            |item| {
                let bytes = download_one(store, item)?;
                if let Some(progress) = progress {
                    progress.increment_files(1);
                    progress.increment_bytes(bytes);
                }
                Ok(bytes)
            },
            &self.config,
        )?;

        let duration = start.elapsed();
        tracing::info!(remote = %prefix, files = totals.files, "download complete");

        Ok(SyncResult {
            direction: Direction::Download,
            files_transferred: totals.files,
            bytes_transferred: totals.bytes,
            duration,
            throughput: totals.bytes as f64 / duration.as_secs_f64().max(f64::EPSILON),
        })
    }
}

/// Join a `/`-separated relative key onto a local root, component by
/// component, so the result is portable across path separators.
fn join_relative(root: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|c| !c.is_empty())
        .fold(root.to_path_buf(), |path, component| path.join(component))
}
