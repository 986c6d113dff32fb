//! # Standout Views - Namespaced View Lookup and Rendering
//!
//! `standout-views` finds view files by logical name and renders them with
//! MiniJinja into a captured `String`.
//!
//! ## Core Concepts
//!
//! - [`ViewFinder`]: resolves `"users.list"` or `"admin::dashboard"` to a file
//!   across ordered search directories and candidate extensions, memoizing
//!   the result
//! - [`ViewRenderer`]: resolves, reads and executes a view, returning its output
//! - [`Attributes`]: default variables merged under every render
//! - [`Capture`]: the isolated buffer a single render writes into
//! - [`TemplateEngine`]: the seam to the template backend ([`MiniJinjaEngine`])
//! - [`ViewConfig`]: declarative extensions and search paths
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use standout_views::ViewRenderer;
//! use serde_json::json;
//!
//! let mut renderer = ViewRenderer::with_paths(["./views"]);
//! renderer.add_path("./admin/views", Some("admin"));
//! renderer.add_attribute("site", "Example");
//!
//! // ./views/home.jinja
//! let home = renderer.render("home", json!({ "user": "ana" })).unwrap();
//!
//! // ./admin/views/users/list.jinja
//! let list = renderer.render("admin::users.list", ()).unwrap();
//! ```
//!
//! ## Failure Isolation
//!
//! Output only leaves a render through its return value. A view that fails
//! halfway (a syntax error, a runtime error, `{{ raise("...") }}`) returns an
//! error and its partial output is discarded, leaving the renderer ready
//! for the next call.

mod attributes;
mod capture;
mod config;
mod engine;
mod error;
mod finder;
pub mod fs;
mod renderer;

pub use attributes::Attributes;
pub use capture::Capture;
pub use config::{PathEntry, ViewConfig};
pub use engine::{register_functions, MiniJinjaEngine, TemplateEngine};
pub use error::{Result, ViewError};
pub use finder::{ViewFinder, DEFAULT_EXTENSIONS, DEFAULT_NAMESPACE, NAMESPACE_DELIMITER};
pub use fs::{FileSystem, MockFs, RealFs};
pub use renderer::{TemplatePath, ViewRenderer};
