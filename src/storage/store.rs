//! Object store interface and remote enumeration
//!
//! The sync engine talks to object storage through the `ObjectStore` trait:
//! paginated listing plus single-object put/get. Authentication, transport,
//! multipart handling and per-operation retry all live behind the trait.
//! `RemoteLister` walks a prefix page by page and yields every non-marker
//! key exactly once.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;

use crate::config::LIST_PAGE_SIZE;
use crate::error::{Result, SyncError};

/// Metadata for one remote object returned by a listing page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteObject {
    /// Object key
    pub key: String,
    /// Size in bytes, when the backend reports it
    pub size: Option<u64>,
}

impl RemoteObject {
    /// Create an object entry with just a key
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size: None,
        }
    }

    /// A key ending in the separator is an empty "folder" placeholder,
    /// not a file.
    pub fn is_directory_marker(&self) -> bool {
        self.key.ends_with('/')
    }
}

/// One page of a paginated listing
#[derive(Debug, Clone, Default)]
pub struct ObjectPage {
    /// Keys in this page, in listing order
    pub objects: Vec<RemoteObject>,
    /// Cursor for the next page; `None` means the listing is exhausted
    pub next_marker: Option<String>,
}

/// Capability interface to an object storage bucket.
///
/// Implementations must be safe to invoke concurrently from multiple
/// workers; a sync run shares one handle across its whole pool.
pub trait ObjectStore: Send + Sync {
    /// List up to `max_keys` objects under `prefix`, resuming from `marker`.
    fn list_objects(
        &self,
        prefix: &str,
        marker: Option<&str>,
        max_keys: usize,
    ) -> Result<ObjectPage>;

    /// Create or overwrite the object at `key` with the contents of
    /// `local_path`. Returns bytes transferred.
    fn put_object(&self, key: &str, local_path: &Path) -> Result<u64>;

    /// Fetch the object at `key` into `local_path`, overwriting any
    /// existing file. Returns bytes transferred.
    fn get_object(&self, key: &str, local_path: &Path) -> Result<u64>;
}

/// Normalize a remote prefix to end with exactly one separator.
///
/// Leading and trailing separators are stripped before the single trailing
/// one is appended; an empty or all-separator prefix normalizes to the
/// empty string, which scopes the listing to the whole bucket.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}/", trimmed)
    }
}

/// Iterator over every non-marker key under a prefix.
///
/// Pages through `list_objects` with the returned markers until the
/// listing is exhausted. A failed page yields one `SyncError::Listing`
/// and ends the iteration; retrying a page is the store's concern,
/// not ours.
pub struct RemoteLister<'a> {
    store: &'a dyn ObjectStore,
    prefix: String,
    marker: Option<String>,
    buffer: VecDeque<String>,
    exhausted: bool,
}

impl<'a> RemoteLister<'a> {
    /// Start a listing under `prefix` (normalized to one trailing separator).
    pub fn new(store: &'a dyn ObjectStore, prefix: &str) -> Self {
        Self {
            store,
            prefix: normalize_prefix(prefix),
            marker: None,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    /// The normalized prefix this lister walks.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn fetch_page(&mut self) -> Result<()> {
        let page = self
            .store
            .list_objects(&self.prefix, self.marker.as_deref(), LIST_PAGE_SIZE)
            .map_err(|e| match e {
                err @ SyncError::Listing { .. } => err,
                other => SyncError::listing(&self.prefix, other.to_string()),
            })?;

        self.buffer.extend(
            page.objects
                .into_iter()
                .filter(|obj| !obj.is_directory_marker())
                .map(|obj| obj.key),
        );

        match page.next_marker {
            Some(marker) if !marker.is_empty() => self.marker = Some(marker),
            _ => self.exhausted = true,
        }

        Ok(())
    }
}

impl Iterator for RemoteLister<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(key) = self.buffer.pop_front() {
                return Some(Ok(key));
            }
            if self.exhausted {
                return None;
            }
            if let Err(e) = self.fetch_page() {
                self.exhausted = true;
                return Some(Err(e));
            }
        }
    }
}
