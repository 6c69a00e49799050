//! Error types for BucketSync
//!
//! Defines the error taxonomy for sync operations: fatal listing failures,
//! isolated per-object transfer failures, and the aggregate error a run
//! reports when any object failed.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::Direction;

/// Main error type for BucketSync operations
#[derive(Error, Debug)]
pub enum SyncError {
    /// I/O error during local file operations
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File or directory not found
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// Remote listing request failed; fatal, aborts before any transfer
    #[error("Listing failed for prefix '{prefix}': {message}")]
    Listing { prefix: String, message: String },

    /// A single put/get against the object store failed
    #[error("Transfer failed for '{key}': {message}")]
    Transfer { key: String, message: String },

    /// One or more per-object transfers failed during a run
    #[error(
        "{direction} from '{source_root}' to '{dest_root}' failed: \
         {} object(s) failed (first: {})",
        failures.len(),
        failures.first().map(|(key, _)| key.as_str()).unwrap_or("?")
    )]
    Aggregate {
        direction: Direction,
        source_root: String,
        dest_root: String,
        failures: Vec<(String, SyncError)>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Worker pool error
    #[error("Worker pool error: {0}")]
    Pool(String),
}

impl SyncError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a listing error
    pub fn listing(prefix: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Listing {
            prefix: prefix.into(),
            message: message.into(),
        }
    }

    /// Create a per-object transfer error
    pub fn transfer(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transfer {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Number of per-object failures carried by this error
    pub fn failure_count(&self) -> usize {
        match self {
            Self::Aggregate { failures, .. } => failures.len(),
            Self::Transfer { .. } => 1,
            _ => 0,
        }
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } | Self::NotFound(path) => Some(path),
            _ => None,
        }
    }
}

/// Result type alias for BucketSync operations
pub type Result<T> = std::result::Result<T, SyncError>;

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| SyncError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_with_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = SyncError::io("/test/path", io_err);
        assert_eq!(err.path().unwrap(), &PathBuf::from("/test/path"));
    }

    #[test]
    fn test_aggregate_display_names_roots() {
        let err = SyncError::Aggregate {
            direction: Direction::Upload,
            source_root: "data".to_string(),
            dest_root: "backup/".to_string(),
            failures: vec![(
                "backup/a.txt".to_string(),
                SyncError::transfer("backup/a.txt", "connection reset"),
            )],
        };

        let msg = err.to_string();
        assert!(msg.contains("upload"));
        assert!(msg.contains("data"));
        assert!(msg.contains("backup/"));
        assert!(msg.contains("backup/a.txt"));
        assert_eq!(err.failure_count(), 1);
    }

    #[test]
    fn test_failure_count() {
        assert_eq!(SyncError::transfer("k", "m").failure_count(), 1);
        assert_eq!(SyncError::config("bad").failure_count(), 0);
    }
}
