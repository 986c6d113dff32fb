//! View lookup across namespaced search paths.
//!
//! This module provides [`ViewFinder`], which turns a logical view name into
//! the path of a file on disk.
//!
//! # Names
//!
//! A name is either plain (`"users.list"`) or namespaced
//! (`"admin::users.list"`). Plain names are looked up in the default
//! namespace ([`DEFAULT_NAMESPACE`]). Dots in the name separate directories,
//! so `"users.list"` is looked for as `users/list.<ext>`.
//!
//! # Resolution Order
//!
//! For every directory of the namespace, in registration order, every
//! extension is tried in priority order. The first file that exists wins:
//!
//! | Directory | Extension | Candidate |
//! |-----------|-----------|-----------|
//! | `app/views` | `jinja` | `app/views/users/list.jinja` |
//! | `app/views` | `html` | `app/views/users/list.html` |
//! | `vendor/views` | `jinja` | `vendor/views/users/list.jinja` |
//! | ... | ... | ... |
//!
//! # Caching
//!
//! Resolved paths are memoized under the name exactly as requested. Every
//! mutation of the search paths or extensions clears the whole cache, since
//! a newly added directory may hold a higher-priority match.
//!
//! # Example
//!
//! ```rust,ignore
//! use standout_views::ViewFinder;
//!
//! let mut finder = ViewFinder::new();
//! finder.add_path("./views", None);
//! finder.add_path("./admin/views", Some("admin"));
//!
//! let home = finder.find("home")?;
//! let dashboard = finder.find("admin::dashboard")?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, trace};

use crate::error::{Result, ViewError};
use crate::fs::{FileSystem, RealFs};

/// Namespace used for names without a `namespace::` prefix.
pub const DEFAULT_NAMESPACE: &str = "__main__";

/// Separator between namespace and view name.
pub const NAMESPACE_DELIMITER: &str = "::";

/// Extensions tried when none are configured, in priority order.
pub const DEFAULT_EXTENSIONS: &[&str] = &["jinja", "html", "txt"];

/// Resolves view names to files across namespaced search paths.
///
/// The finder is `Send + Sync`: lookups take `&self` and share a mutex-guarded
/// cache, while every mutation takes `&mut self`, so clearing the cache can
/// never interleave with a lookup.
pub struct ViewFinder {
    /// Namespace → directories, in first-registration order.
    namespaces: Vec<(String, Vec<PathBuf>)>,
    /// Candidate extensions without the leading dot, highest priority first.
    extensions: Vec<String>,
    /// Requested name → resolved path.
    cache: Mutex<HashMap<String, PathBuf>>,
    fs: Arc<dyn FileSystem>,
}

impl Default for ViewFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ViewFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewFinder")
            .field("namespaces", &self.namespaces)
            .field("extensions", &self.extensions)
            .field("cached", &self.cache_guard().len())
            .finish_non_exhaustive()
    }
}

impl ViewFinder {
    /// Creates a finder with no paths, the default extensions and the real
    /// filesystem.
    pub fn new() -> Self {
        Self {
            namespaces: Vec::new(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            cache: Mutex::new(HashMap::new()),
            fs: Arc::new(RealFs),
        }
    }

    /// Replaces the extension list.
    ///
    /// Leading dots are stripped, so `".jinja"` and `"jinja"` are equivalent.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| normalize_extension(e.as_ref()).to_string())
            .collect();
        self.flush();
        self
    }

    /// Uses the given filesystem for probing and reading.
    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self.flush();
        self
    }

    /// The filesystem this finder queries.
    pub fn fs(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    /// Appends a directory to a namespace (the default one when `None`).
    pub fn add_path(&mut self, path: impl Into<PathBuf>, namespace: Option<&str>) {
        self.dirs_mut(namespace).push(path.into());
        self.flush();
    }

    /// Inserts a directory at the front of a namespace, ahead of all
    /// previously registered ones.
    pub fn prepend_path(&mut self, path: impl Into<PathBuf>, namespace: Option<&str>) {
        self.dirs_mut(namespace).insert(0, path.into());
        self.flush();
    }

    /// Replaces all directories of a namespace.
    pub fn set_paths<I, P>(&mut self, paths: I, namespace: Option<&str>)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        *self.dirs_mut(namespace) = paths.into_iter().map(Into::into).collect();
        self.flush();
    }

    /// Registers an extension with the highest priority.
    ///
    /// If the extension is already known it is moved to the front.
    pub fn add_extension(&mut self, extension: &str) {
        let extension = normalize_extension(extension);
        self.extensions.retain(|e| e != extension);
        self.extensions.insert(0, extension.to_string());
        self.flush();
    }

    /// Registered extensions, highest priority first.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Directories of a namespace (the default one when `None`).
    ///
    /// Unknown namespaces have no directories.
    pub fn paths(&self, namespace: Option<&str>) -> &[PathBuf] {
        self.dirs(namespace.unwrap_or(DEFAULT_NAMESPACE))
            .unwrap_or_default()
    }

    /// Registered namespaces, in the order they were first added.
    ///
    /// The default namespace appears as [`DEFAULT_NAMESPACE`] once any plain
    /// path has been added.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.iter().map(|(ns, _)| ns.as_str())
    }

    /// Returns true if the namespace has been registered.
    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.dirs(namespace).is_some()
    }

    /// Returns true if the name carries a `namespace::` prefix.
    ///
    /// A delimiter at the very start (`"::home"`) is not a prefix.
    pub fn is_namespaced(name: &str) -> bool {
        name.find(NAMESPACE_DELIMITER).is_some_and(|i| i > 0)
    }

    /// Relative file names tried for a short name, in extension order.
    ///
    /// Leading separators are dropped, so `"/etc/passwd"` is looked for as
    /// `etc/passwd.<ext>` inside each search directory.
    pub fn candidates(&self, short_name: &str) -> Vec<String> {
        let base = short_name
            .replace('.', "/")
            .trim_start_matches(['/', '\\'])
            .to_string();
        self.extensions
            .iter()
            .map(|ext| format!("{}.{}", base, ext))
            .collect()
    }

    /// Resolves a view name to a file path.
    ///
    /// # Errors
    ///
    /// - [`ViewError::InvalidName`] if a namespaced name does not split into
    ///   exactly two non-empty parts, or the name is empty
    /// - [`ViewError::NamespaceNotFound`] if the namespace was never registered
    /// - [`ViewError::TemplateNotFound`] if no candidate file exists
    pub fn find(&self, name: &str) -> Result<PathBuf> {
        if let Some(path) = self.cache_guard().get(name) {
            debug!(view = name, path = %path.display(), "view cache hit");
            return Ok(path.clone());
        }

        let trimmed = name.trim();
        let (namespace, short_name) = self.parse_name(trimmed)?;
        debug!(view = name, namespace, "resolving view");

        let dirs = self.dirs(namespace).unwrap_or_default();
        let path = self
            .find_in_paths(short_name, dirs)
            .ok_or_else(|| ViewError::not_found(trimmed))?;

        debug!(view = name, path = %path.display(), "view resolved");
        self.cache_guard().insert(name.to_string(), path.clone());
        Ok(path)
    }

    /// Returns true if the name resolves to a file.
    ///
    /// Malformed names and unknown namespaces are reported as `false`
    /// rather than errors.
    pub fn exists(&self, name: &str) -> bool {
        self.find(name).is_ok()
    }

    /// Returns true if a resolution for this exact name is memoized.
    pub fn is_cached(&self, name: &str) -> bool {
        self.cache_guard().contains_key(name)
    }

    /// Forgets all resolved paths.
    pub fn flush(&self) {
        self.cache_guard().clear();
    }

    fn parse_name<'a>(&self, name: &'a str) -> Result<(&'a str, &'a str)> {
        if !Self::is_namespaced(name) {
            if name.is_empty() {
                return Err(ViewError::InvalidName {
                    name: name.to_string(),
                });
            }
            return Ok((DEFAULT_NAMESPACE, name));
        }

        let segments: Vec<&str> = name.split(NAMESPACE_DELIMITER).collect();
        let &[namespace, short_name] = segments.as_slice() else {
            return Err(ViewError::InvalidName {
                name: name.to_string(),
            });
        };
        if short_name.is_empty() {
            return Err(ViewError::InvalidName {
                name: name.to_string(),
            });
        }
        if !self.has_namespace(namespace) {
            return Err(ViewError::NamespaceNotFound {
                namespace: namespace.to_string(),
            });
        }
        Ok((namespace, short_name))
    }

    fn find_in_paths(&self, short_name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
        let candidates = self.candidates(short_name);
        for dir in dirs {
            for file in &candidates {
                if !is_relative_below(file) {
                    trace!(file = %file, "skipping view candidate outside search path");
                    continue;
                }
                let path = dir.join(file);
                trace!(path = %path.display(), "probing view candidate");
                if self.fs.is_file(&path) {
                    return Some(self.canonical(path));
                }
            }
        }
        None
    }

    fn canonical(&self, path: PathBuf) -> PathBuf {
        self.fs.canonicalize(&path).unwrap_or(path)
    }

    fn dirs(&self, namespace: &str) -> Option<&[PathBuf]> {
        self.namespaces
            .iter()
            .find(|(ns, _)| ns == namespace)
            .map(|(_, dirs)| dirs.as_slice())
    }

    fn dirs_mut(&mut self, namespace: Option<&str>) -> &mut Vec<PathBuf> {
        let namespace = namespace.unwrap_or(DEFAULT_NAMESPACE);
        let index = match self.namespaces.iter().position(|(ns, _)| ns == namespace) {
            Some(index) => index,
            None => {
                self.namespaces.push((namespace.to_string(), Vec::new()));
                self.namespaces.len() - 1
            }
        };
        &mut self.namespaces[index].1
    }

    // A poisoned cache is still a valid memo.
    fn cache_guard(&self) -> MutexGuard<'_, HashMap<String, PathBuf>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// Only plain segments may follow a search directory.
fn is_relative_below(file: &str) -> bool {
    Path::new(file)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn normalize_extension(extension: &str) -> &str {
    extension.trim().trim_start_matches('.')
}
