//! Template engine abstraction.
//!
//! This module defines the [`TemplateEngine`] trait, the seam between the
//! renderer and whatever executes a view file. The default implementation is
//! [`MiniJinjaEngine`].
//!
//! An engine never returns text. It writes into the writer it is handed,
//! which during a render is always a fresh [`Capture`](crate::Capture), and
//! signals failure through its `Result`.

use std::io;
use std::path::Path;

use minijinja::{Environment, Error, ErrorKind, Value};
use serde_json::{Map, Value as JsonValue};

use crate::error::{describe_engine_error, ViewError};

/// Executes a view's source with a set of variables.
pub trait TemplateEngine: Send + Sync {
    /// Runs `source` with `vars` in scope, writing all output to `out`.
    ///
    /// `name` identifies the view in error messages, `path` is the file the
    /// view was resolved to. On error, anything already written to `out` must
    /// be treated as garbage by the caller.
    fn execute(
        &self,
        name: &str,
        path: &Path,
        source: &str,
        vars: &Map<String, JsonValue>,
        out: &mut dyn io::Write,
    ) -> Result<(), ViewError>;
}

/// MiniJinja-based template engine.
///
/// Besides the standard Jinja syntax, views can call `raise(message)` to abort
/// rendering with an error.
///
/// Views are compiled under their file name, so the environment's auto-escape
/// callback sees the real extension: `.html` views are HTML-escaped by default.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use standout_views::{Capture, MiniJinjaEngine, TemplateEngine};
/// use serde_json::{json, Map};
///
/// let engine = MiniJinjaEngine::new();
/// let mut vars = Map::new();
/// vars.insert("name".into(), json!("World"));
///
/// let mut capture = Capture::begin();
/// engine
///     .execute("greeting", Path::new("greeting.txt"), "Hello, {{ name }}!", &vars, &mut capture)
///     .unwrap();
/// assert_eq!(capture.finish("greeting").unwrap(), "Hello, World!");
/// ```
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Creates a new engine with the view functions registered.
    pub fn new() -> Self {
        let mut env = Environment::new();
        register_functions(&mut env);
        Self { env }
    }

    /// Returns a reference to the underlying MiniJinja environment.
    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    /// Returns a mutable reference to the underlying MiniJinja environment.
    ///
    /// This allows registering custom filters, functions or globals.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn execute(
        &self,
        name: &str,
        path: &Path,
        source: &str,
        vars: &Map<String, JsonValue>,
        out: &mut dyn io::Write,
    ) -> Result<(), ViewError> {
        let wrap = |err: Error| ViewError::execution(name, describe_engine_error(&err));

        let file_name = path.file_name().map(|f| f.to_string_lossy());
        let compile_name = file_name.as_deref().unwrap_or(name);

        let tmpl = self
            .env
            .template_from_named_str(compile_name, source)
            .map_err(wrap)?;
        tmpl.render_captured_to(Value::from_serialize(vars), out)
            .map_err(wrap)?;
        Ok(())
    }
}

/// Registers the view functions with a MiniJinja environment.
///
/// This is called automatically by [`MiniJinjaEngine::new`].
pub fn register_functions(env: &mut Environment<'static>) {
    env.add_function("raise", |message: String| -> Result<Value, Error> {
        Err(Error::new(ErrorKind::InvalidOperation, message))
    });
}
