//! Filesystem abstraction for testability.
//!
//! The finder and renderer only ever ask three things of the filesystem:
//! whether a path is a file, what its canonical form is, and what it
//! contains. [`FileSystem`] captures exactly that so tests can observe
//! lookups (see [`MockFs`]) without touching disk.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Abstraction over the filesystem operations used for view lookup.
pub trait FileSystem: Send + Sync {
    /// Returns true if `path` exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Returns the canonical form of `path`, if it can be determined.
    fn canonicalize(&self, path: &Path) -> Option<PathBuf>;

    /// Reads the whole file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Real filesystem access via `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl FileSystem for RealFs {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
        std::fs::canonicalize(path).ok()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

// === Mock implementation for testing ===

/// In-memory filesystem that records how often it is queried.
///
/// Paths are compared exactly as joined; `canonicalize` is the identity for
/// files that exist.
#[derive(Debug, Default)]
pub struct MockFs {
    files: Mutex<HashMap<PathBuf, String>>,
    lookups: AtomicUsize,
}

impl MockFs {
    /// Create an empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Add or replace a file.
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files_guard().insert(path.into(), content.into());
    }

    /// Remove a file, returning whether it existed.
    pub fn remove(&self, path: impl AsRef<Path>) -> bool {
        self.files_guard().remove(path.as_ref()).is_some()
    }

    /// Number of `is_file` calls made so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Reset the lookup counter to zero.
    pub fn reset_lookups(&self) {
        self.lookups.store(0, Ordering::SeqCst);
    }

    fn files_guard(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, String>> {
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl FileSystem for MockFs {
    fn is_file(&self, path: &Path) -> bool {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.files_guard().contains_key(path)
    }

    fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
        self.files_guard()
            .contains_key(path)
            .then(|| path.to_path_buf())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files_guard().get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )
        })
    }
}
