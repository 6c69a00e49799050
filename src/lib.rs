//! # BucketSync - Parallel Directory/Object-Storage Sync
//!
//! BucketSync mirrors a local directory tree to an object-storage bucket
//! prefix, or a bucket prefix back to a local directory, transferring
//! files in parallel with a bounded worker pool. Authentication,
//! transport, multipart handling and per-operation retry live behind the
//! [`storage::ObjectStore`] trait; this crate is the orchestration layer.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bucketsync::config::{S3Config, SyncConfig};
//! use bucketsync::core::SyncEngine;
//! use bucketsync::storage::S3Store;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let store = Arc::new(S3Store::new(S3Config::from_env()).unwrap());
//! let engine = SyncEngine::new(store, SyncConfig::default());
//!
//! let result = engine
//!     .upload_directory(Path::new("./dataset"), "backups/dataset")
//!     .unwrap();
//!
//! println!("Uploaded {} files", result.files_transferred);
//! ```
//!
//! ## Custom stores
//!
//! Any type implementing [`storage::ObjectStore`] can back the engine,
//! which keeps the orchestration testable against in-memory stores and
//! portable across S3-compatible services.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod error;
pub mod fs;
pub mod progress;
pub mod storage;

// Re-export commonly used types
pub use config::{Direction, S3Config, SyncConfig};
pub use core::{SyncEngine, SyncResult};
pub use error::{Result, SyncError};
pub use progress::ProgressReporter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use bucketsync::prelude::*;
    //! ```

    pub use crate::config::{Direction, S3Config, SyncConfig};
    pub use crate::core::{
        download_one, run_transfer, upload_one, SyncEngine, SyncResult, TransferItem,
    };
    pub use crate::error::{Result, SyncError};
    pub use crate::fs::{scan_local, walk_files, LocalFile};
    pub use crate::progress::ProgressReporter;
    pub use crate::storage::{normalize_prefix, ObjectStore, RemoteLister, S3Store};
}
