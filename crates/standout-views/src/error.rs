//! Error types for view lookup and rendering.
//!
//! [`ViewError`] is the single error type returned by the finder, the
//! renderer and the configuration loader. Callers that only care whether a
//! view is present should use [`ViewFinder::exists`](crate::ViewFinder::exists),
//! which folds the lookup errors into a boolean.

use std::io;
use std::path::PathBuf;

/// Errors that can occur while resolving or rendering a view.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// The name uses the namespace delimiter but does not split into exactly
    /// `namespace::name`.
    #[error("view \"{name}\" has an invalid name")]
    InvalidName { name: String },

    /// The namespace prefix was never registered.
    #[error("no paths registered for namespace \"{namespace}\"")]
    NamespaceNotFound { namespace: String },

    /// No candidate file exists for the name, or the resolved file vanished
    /// before it could be read.
    #[error("view \"{name}\" not found")]
    TemplateNotFound { name: String },

    /// The template failed to compile or raised while executing.
    #[error("failed to render view \"{name}\": {message}")]
    TemplateExecution { name: String, message: String },

    /// Render variables did not serialize to a map.
    #[error("view variables must serialize to a map, got {kind}")]
    InvalidVariables { kind: &'static str },

    /// Render variables or an attribute value could not be serialized.
    #[error("failed to serialize view variables: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The view configuration could not be parsed.
    #[error("invalid view configuration: {0}")]
    Config(String),

    /// Reading a template file failed for a reason other than absence.
    #[error("failed to read \"{}\": {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing rendered text to the caller's writer failed.
    #[error("failed to write rendered view: {0}")]
    Output(#[source] io::Error),
}

impl ViewError {
    /// Create a [`ViewError::TemplateNotFound`].
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::TemplateNotFound { name: name.into() }
    }

    /// Create a [`ViewError::TemplateExecution`].
    pub fn execution(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TemplateExecution {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Returns true for the errors that mean "there is no such view".
    ///
    /// These are the errors [`ViewFinder::exists`](crate::ViewFinder::exists)
    /// reports as `false`.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidName { .. } | Self::NamespaceNotFound { .. } | Self::TemplateNotFound { .. }
        )
    }
}

impl From<serde_json::Error> for ViewError {
    fn from(err: serde_json::Error) -> Self {
        ViewError::Serialization(err)
    }
}

impl From<serde_yaml::Error> for ViewError {
    fn from(err: serde_yaml::Error) -> Self {
        ViewError::Config(err.to_string())
    }
}

// Engine errors carry the template name they were raised from.
impl From<minijinja::Error> for ViewError {
    fn from(err: minijinja::Error) -> Self {
        let name = err.name().unwrap_or("<unknown>").to_string();
        ViewError::TemplateExecution {
            name,
            message: describe_engine_error(&err),
        }
    }
}

/// Formats a MiniJinja error as `kind: detail (line n)`.
pub(crate) fn describe_engine_error(err: &minijinja::Error) -> String {
    let mut message = match err.detail() {
        Some(detail) => format!("{}: {}", err.kind(), detail),
        None => err.kind().to_string(),
    };
    if let Some(line) = err.line() {
        message.push_str(&format!(" (line {})", line));
    }
    message
}

/// Result type for view operations.
pub type Result<T> = std::result::Result<T, ViewError>;
