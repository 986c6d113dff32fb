//! Declarative renderer setup.
//!
//! [`ViewConfig`] describes the extensions and search paths of a renderer so
//! applications can keep them in a YAML (or any serde) document instead of
//! wiring them in code:
//!
//! ```yaml
//! extensions: [jinja, html]
//! paths:
//!   - ./views
//!   - path: ./admin/views
//!     namespace: admin
//! ```
//!
//! Paths are registered in document order. An empty `extensions` list keeps
//! the finder defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::finder::ViewFinder;
use crate::renderer::ViewRenderer;

/// Extensions and search paths for a [`ViewRenderer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Candidate extensions, highest priority first.
    pub extensions: Vec<String>,
    /// Search directories, in registration order.
    pub paths: Vec<PathEntry>,
}

/// One search directory in a [`ViewConfig`].
///
/// Written either as a bare directory (default namespace) or as a
/// `{ path, namespace }` map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathEntry {
    Dir(PathBuf),
    Namespaced {
        path: PathBuf,
        #[serde(default)]
        namespace: Option<String>,
    },
}

impl PathEntry {
    pub fn path(&self) -> &PathBuf {
        match self {
            PathEntry::Dir(path) | PathEntry::Namespaced { path, .. } => path,
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        match self {
            PathEntry::Dir(_) => None,
            PathEntry::Namespaced { namespace, .. } => namespace.as_deref(),
        }
    }
}

impl ViewConfig {
    /// Parses a configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Adds an extension (builder style).
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extensions.push(extension.into());
        self
    }

    /// Adds a search directory (builder style).
    pub fn path(mut self, path: impl Into<PathBuf>, namespace: Option<&str>) -> Self {
        self.paths.push(match namespace {
            None => PathEntry::Dir(path.into()),
            Some(ns) => PathEntry::Namespaced {
                path: path.into(),
                namespace: Some(ns.to_string()),
            },
        });
        self
    }

    /// Applies the configuration to a finder.
    pub fn apply(&self, mut finder: ViewFinder) -> ViewFinder {
        if !self.extensions.is_empty() {
            finder = finder.with_extensions(&self.extensions);
        }
        for entry in &self.paths {
            finder.add_path(entry.path().clone(), entry.namespace());
        }
        finder
    }

    /// Builds a renderer from this configuration.
    pub fn build(&self) -> ViewRenderer {
        ViewRenderer::with_finder(self.apply(ViewFinder::new()))
    }
}

impl ViewRenderer {
    /// Creates a renderer from a [`ViewConfig`].
    pub fn from_config(config: &ViewConfig) -> Self {
        config.build()
    }
}
