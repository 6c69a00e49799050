//! Local directory scanner
//!
//! Walks a directory tree and yields every regular file with its
//! path relative to the scan root. Relative paths are rendered with
//! `/` separators so they can double as remote key suffixes.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, SyncError};

/// A regular file discovered under a scan root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// Absolute (or root-joined) path to the file
    pub path: PathBuf,
    /// Path relative to the scan root, `/`-separated
    pub relative_path: String,
    /// File size in bytes
    pub size: u64,
}

/// Render a path relative to `root` with `/` separators.
///
/// Falls back to the path itself when it is not under `root`.
pub fn relative_key(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Lazily walk every regular file under `root`, depth-first.
///
/// Symbolic links are not followed: a link to a file is yielded as an
/// entry, a link to a directory is not descended into. Directories
/// themselves are never yielded.
pub fn walk_files(root: &Path) -> impl Iterator<Item = Result<LocalFile>> + '_ {
    WalkDir::new(root).into_iter().filter_map(move |entry| {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                return Some(Err(SyncError::io(path, e.into())));
            }
        };

        if !entry.file_type().is_file() {
            return None;
        }

        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(e) => return Some(Err(SyncError::io(entry.path(), e.into()))),
        };

        Some(Ok(LocalFile {
            relative_path: relative_key(entry.path(), root),
            path: entry.path().to_path_buf(),
            size,
        }))
    })
}

/// Materialize the full file list under `root`.
///
/// Fails with `NotFound` when the root does not exist or is not a
/// directory; an empty directory yields an empty list.
pub fn scan_local(root: &Path) -> Result<Vec<LocalFile>> {
    if !root.is_dir() {
        return Err(SyncError::NotFound(root.to_path_buf()));
    }
    walk_files(root).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;

    fn touch(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_scan_yields_every_file_once() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.txt"), "aa");
        touch(&dir.path().join("sub/b.txt"), "bbb");
        touch(&dir.path().join("sub/deep/c.bin"), "cccc");
        fs::create_dir_all(dir.path().join("empty")).unwrap();

        let files = scan_local(dir.path()).unwrap();
        let relative: HashSet<String> =
            files.iter().map(|f| f.relative_path.clone()).collect();

        assert_eq!(files.len(), 3);
        assert_eq!(
            relative,
            ["a.txt", "sub/b.txt", "sub/deep/c.bin"]
                .into_iter()
                .map(String::from)
                .collect()
        );
    }

    #[test]
    fn test_relative_path_ignores_trailing_separator_on_root() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("sub/b.txt"), "b");

        let with_sep = PathBuf::from(format!("{}/", dir.path().display()));
        let files = scan_local(&with_sep).unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "sub/b.txt");
    }

    #[test]
    fn test_scan_records_sizes() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.txt"), "12345");

        let files = scan_local(dir.path()).unwrap();
        assert_eq!(files[0].size, 5);
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            scan_local(&missing),
            Err(SyncError::NotFound(_))
        ));
    }

    #[test]
    fn test_walk_is_restartable() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.txt"), "a");

        let first: Vec<_> = walk_files(dir.path()).collect::<Result<_>>().unwrap();
        let second: Vec<_> = walk_files(dir.path()).collect::<Result<_>>().unwrap();
        assert_eq!(first, second);
    }
}
