//! Bounded worker pool for per-object transfers
//!
//! Streams transfer items in batches over a bounded channel to a fixed
//! set of scoped worker threads. Each worker invokes the transfer
//! function once per item and reports an outcome; a failed item never
//! aborts its siblings. The pool waits for the full item set, then
//! either returns totals or one aggregate error carrying every
//! per-item failure.

use crossbeam::channel::{bounded, unbounded};
use std::path::PathBuf;
use std::thread;

use crate::config::{Direction, SyncConfig};
use crate::error::{Result, SyncError};

/// One unit of transfer work: a file on one side, a key on the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferItem {
    /// Path relative to both roots, `/`-separated
    pub relative_path: String,
    /// Local side of the transfer
    pub local_path: PathBuf,
    /// Remote side of the transfer
    pub remote_key: String,
}

/// Terminal state of one attempted transfer
#[derive(Debug)]
pub struct TransferOutcome {
    /// The item that was attempted
    pub item: TransferItem,
    /// Bytes moved (0 on failure)
    pub bytes: u64,
    /// The failure, if the transfer did not succeed
    pub error: Option<SyncError>,
}

impl TransferOutcome {
    /// Whether the transfer succeeded
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Totals for a fully successful run
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferTotals {
    /// Objects transferred
    pub files: u64,
    /// Bytes transferred
    pub bytes: u64,
}

/// Execute `transfer_fn` over every item with bounded parallelism.
///
/// At most `config.concurrency` transfers are in flight at once;
/// `config.batch_size` only groups items per channel message and never
/// affects correctness or completion order. Every item is attempted
/// exactly once regardless of sibling failures. If any item failed the
/// run fails with a single [`SyncError::Aggregate`] naming the
/// direction and both roots and carrying every per-item failure.
pub fn run_transfer<F>(
    direction: Direction,
    source_root: &str,
    dest_root: &str,
    items: Vec<TransferItem>,
    transfer_fn: F,
    config: &SyncConfig,
) -> Result<TransferTotals>
where
    F: Fn(&TransferItem) -> Result<u64> + Sync,
{
    config.validate().map_err(SyncError::config)?;

    if items.is_empty() {
        return Ok(TransferTotals::default());
    }

    let workers = config.concurrency.min(items.len());
    let batch_size = config.batch_size;

    let (batch_tx, batch_rx) = bounded::<Vec<TransferItem>>(workers * 2);
    let (outcome_tx, outcome_rx) = unbounded::<TransferOutcome>();

    let outcomes: Vec<TransferOutcome> = thread::scope(|scope| {
        let transfer_fn = &transfer_fn;

        for _ in 0..workers {
            let batch_rx = batch_rx.clone();
            let outcome_tx = outcome_tx.clone();

            scope.spawn(move || {
                while let Ok(batch) = batch_rx.recv() {
                    for item in batch {
                        let outcome = match transfer_fn(&item) {
                            Ok(bytes) => TransferOutcome {
                                item,
                                bytes,
                                error: None,
                            },
                            Err(e) => TransferOutcome {
                                item,
                                bytes: 0,
                                error: Some(e),
                            },
                        };
                        if outcome_tx.send(outcome).is_err() {
                            return;
                        }
                    }
                }
            });
        }
        drop(outcome_tx);
        drop(batch_rx);

        // Feed batches from the submitting thread; the bounded channel
        // provides backpressure once all workers are busy.
        let mut items = items;
        let mut feed_failed = false;
        while !items.is_empty() {
            let rest = items.split_off(batch_size.min(items.len()));
            if batch_tx.send(items).is_err() {
                feed_failed = true;
                break;
            }
            items = rest;
        }
        drop(batch_tx);
        debug_assert!(!feed_failed, "workers exited while work remained");

        outcome_rx.iter().collect()
    });

    let mut totals = TransferTotals::default();
    let mut failures = Vec::new();

    for outcome in outcomes {
        match outcome.error {
            None => {
                totals.files += 1;
                totals.bytes += outcome.bytes;
            }
            Some(e) => {
                tracing::warn!(
                    key = %outcome.item.remote_key,
                    error = %e,
                    "transfer failed"
                );
                failures.push((outcome.item.remote_key, e));
            }
        }
    }

    if failures.is_empty() {
        Ok(totals)
    } else {
        Err(SyncError::Aggregate {
            direction,
            source_root: source_root.to_string(),
            dest_root: dest_root.to_string(),
            failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn items(n: usize) -> Vec<TransferItem> {
        (0..n)
            .map(|i| TransferItem {
                relative_path: format!("file-{i}.txt"),
                local_path: PathBuf::from(format!("/src/file-{i}.txt")),
                remote_key: format!("dst/file-{i}.txt"),
            })
            .collect()
    }

    fn config(concurrency: usize, batch_size: usize) -> SyncConfig {
        SyncConfig {
            concurrency,
            batch_size,
        }
    }

    #[test]
    fn test_every_item_invoked_exactly_once() {
        for concurrency in [1, 3, 25] {
            let seen = Mutex::new(Vec::new());
            let totals = run_transfer(
                Direction::Upload,
                "src",
                "dst/",
                items(25),
                |item| {
                    seen.lock().unwrap().push(item.relative_path.clone());
                    Ok(10)
                },
                &config(concurrency, 4),
            )
            .unwrap();

            let seen = seen.into_inner().unwrap();
            assert_eq!(seen.len(), 25);
            assert_eq!(seen.iter().collect::<HashSet<_>>().len(), 25);
            assert_eq!(totals.files, 25);
            assert_eq!(totals.bytes, 250);
        }
    }

    #[test]
    fn test_batch_size_does_not_affect_results() {
        for batch_size in [1, 7, 100] {
            let totals = run_transfer(
                Direction::Download,
                "dst/",
                "out",
                items(13),
                |_| Ok(1),
                &config(4, batch_size),
            )
            .unwrap();
            assert_eq!(totals.files, 13);
        }
    }

    #[test]
    fn test_failures_are_collected_without_aborting_siblings() {
        let attempted = AtomicUsize::new(0);
        let err = run_transfer(
            Direction::Upload,
            "src",
            "dst/",
            items(10),
            |item| {
                attempted.fetch_add(1, Ordering::SeqCst);
                if item.relative_path.contains('3') || item.relative_path.contains('7') {
                    Err(SyncError::transfer(&item.remote_key, "boom"))
                } else {
                    Ok(1)
                }
            },
            &config(4, 2),
        )
        .unwrap_err();

        // Every item was attempted even though some failed
        assert_eq!(attempted.load(Ordering::SeqCst), 10);

        match err {
            SyncError::Aggregate {
                direction,
                source_root,
                dest_root,
                failures,
            } => {
                assert_eq!(direction, Direction::Upload);
                assert_eq!(source_root, "src");
                assert_eq!(dest_root, "dst/");
                assert_eq!(failures.len(), 2);
            }
            other => panic!("expected aggregate error, got {other}"),
        }
    }

    #[test]
    fn test_empty_item_set_is_a_successful_noop() {
        let totals = run_transfer(
            Direction::Upload,
            "src",
            "dst/",
            Vec::new(),
            |_| Ok(1),
            &SyncConfig::default(),
        )
        .unwrap();
        assert_eq!(totals.files, 0);
        assert_eq!(totals.bytes, 0);
    }

    #[test]
    fn test_concurrency_larger_than_item_count() {
        let totals = run_transfer(
            Direction::Upload,
            "src",
            "dst/",
            items(2),
            |_| Ok(5),
            &config(30, 100),
        )
        .unwrap();
        assert_eq!(totals.files, 2);
        assert_eq!(totals.bytes, 10);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = run_transfer(
            Direction::Upload,
            "src",
            "dst/",
            items(1),
            |_| Ok(0),
            &config(0, 100),
        )
        .unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));
    }
}
