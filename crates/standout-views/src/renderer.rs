//! View rendering with captured output.
//!
//! This module provides [`ViewRenderer`], which ties a [`ViewFinder`] to a
//! [`TemplateEngine`]:
//!
//! 1. the view name is resolved to a file by the finder
//! 2. the file is read
//! 3. the renderer's [`Attributes`] are merged under the call's variables
//! 4. the engine executes the source into a fresh [`Capture`]
//! 5. the captured text is returned
//!
//! If step 4 fails the capture is dropped unread and the engine's error is
//! returned as is, so the next render starts from a clean slate.
//!
//! # Example
//!
//! ```rust,ignore
//! use standout_views::ViewRenderer;
//! use serde_json::json;
//!
//! let mut renderer = ViewRenderer::with_paths(["./views"]);
//! renderer.add_path("./admin/views", Some("admin"));
//! renderer.add_attribute("site", "Example");
//!
//! let page = renderer.render("admin::dashboard", json!({ "user": "ana" }))?;
//! ```

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::attributes::Attributes;
use crate::capture::Capture;
use crate::engine::{MiniJinjaEngine, TemplateEngine};
use crate::error::{Result, ViewError};
use crate::finder::{ViewFinder, DEFAULT_NAMESPACE};

/// A registered search directory, as reported by [`ViewRenderer::paths`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePath {
    /// The directory.
    pub path: PathBuf,
    /// The namespace it serves, or `None` for the default namespace.
    pub namespace: Option<String>,
}

impl TemplatePath {
    /// Creates a new template path descriptor.
    pub fn new(path: impl Into<PathBuf>, namespace: Option<&str>) -> Self {
        Self {
            path: path.into(),
            namespace: namespace.map(str::to_string),
        }
    }
}

/// Renders views found by a [`ViewFinder`].
///
/// The renderer holds three pieces of configuration: the finder (search
/// paths, extensions, resolution cache), the engine, and an attribute bag of
/// default variables. Rendering itself only needs `&self`.
pub struct ViewRenderer {
    finder: ViewFinder,
    engine: Box<dyn TemplateEngine>,
    attributes: Attributes,
}

impl Default for ViewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewRenderer {
    /// Creates a renderer with no search paths and the MiniJinja engine.
    pub fn new() -> Self {
        Self::with_finder(ViewFinder::new())
    }

    /// Creates a renderer searching the given directories of the default
    /// namespace, in order.
    pub fn with_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut finder = ViewFinder::new();
        finder.set_paths(paths, None);
        Self::with_finder(finder)
    }

    /// Creates a renderer around an existing finder.
    pub fn with_finder(finder: ViewFinder) -> Self {
        Self {
            finder,
            engine: Box::new(MiniJinjaEngine::new()),
            attributes: Attributes::new(),
        }
    }

    /// Replaces the template engine.
    pub fn with_engine(mut self, engine: Box<dyn TemplateEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Replaces the attribute bag.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn finder(&self) -> &ViewFinder {
        &self.finder
    }

    pub fn finder_mut(&mut self) -> &mut ViewFinder {
        &mut self.finder
    }

    /// Adds a search directory, optionally for a namespace.
    pub fn add_path(&mut self, path: impl Into<PathBuf>, namespace: Option<&str>) {
        self.finder.add_path(path, namespace);
    }

    /// Adds a search directory ahead of the existing ones.
    pub fn prepend_path(&mut self, path: impl Into<PathBuf>, namespace: Option<&str>) {
        self.finder.prepend_path(path, namespace);
    }

    /// Replaces the search directories of a namespace.
    pub fn set_paths<I, P>(&mut self, paths: I, namespace: Option<&str>)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.finder.set_paths(paths, namespace);
    }

    /// Registers an extension with the highest priority.
    pub fn add_extension(&mut self, extension: &str) {
        self.finder.add_extension(extension);
    }

    /// Returns true if the view can be resolved.
    pub fn exists(&self, name: &str) -> bool {
        self.finder.exists(name)
    }

    /// Every registered directory with its namespace.
    ///
    /// Directories are grouped by namespace in registration order.
    pub fn paths(&self) -> Vec<TemplatePath> {
        self.finder
            .namespaces()
            .flat_map(|ns| {
                let namespace = (ns != DEFAULT_NAMESPACE).then_some(ns);
                self.finder
                    .paths(Some(ns))
                    .iter()
                    .map(move |path| TemplatePath::new(path.clone(), namespace))
            })
            .collect()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Replaces the attribute bag.
    pub fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes;
    }

    /// Sets a single default variable.
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.attributes.set(key, value);
    }

    /// Renders a view and returns its output.
    ///
    /// `vars` must serialize to a map (a struct, a `HashMap`, a
    /// `serde_json::json!({...})`) or to unit for no variables. Its entries
    /// override attributes with the same key.
    ///
    /// # Errors
    ///
    /// - the lookup errors of [`ViewFinder::find`]
    /// - [`ViewError::TemplateNotFound`] if the file disappeared after lookup
    /// - [`ViewError::InvalidVariables`] if `vars` is not a map
    /// - [`ViewError::Serialization`] if `vars` cannot be serialized
    /// - [`ViewError::TemplateExecution`] if the view fails to compile or run
    pub fn render<T: Serialize>(&self, name: &str, vars: T) -> Result<String> {
        let path = self.finder.find(name)?;
        let source = self.read_source(name, &path)?;
        let vars = self.attributes.merged(vars)?;

        let mut capture = Capture::begin();
        match self.engine.execute(name, &path, &source, &vars, &mut capture) {
            Ok(()) => {
                debug!(view = name, bytes = capture.len(), "view rendered");
                capture.finish(name)
            }
            Err(err) => {
                debug!(view = name, discarded = capture.len(), error = %err, "view failed");
                capture.discard();
                Err(err)
            }
        }
    }

    /// Renders a view into `out`.
    ///
    /// Nothing is written unless the whole render succeeds.
    pub fn render_to<T, W>(&self, name: &str, vars: T, mut out: W) -> Result<()>
    where
        T: Serialize,
        W: io::Write,
    {
        let text = self.render(name, vars)?;
        out.write_all(text.as_bytes()).map_err(ViewError::Output)
    }

    fn read_source(&self, name: &str, path: &Path) -> Result<String> {
        self.finder
            .fs()
            .read_to_string(path)
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => ViewError::not_found(name),
                _ => ViewError::Io {
                    path: path.to_path_buf(),
                    source,
                },
            })
    }
}
