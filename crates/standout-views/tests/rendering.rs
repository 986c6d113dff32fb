//! Integration tests for rendering views from disk.
//!
//! These use the checked-in `tests/fixtures` directory for the fixed views
//! and temporary directories for anything that mutates files.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::json;
use standout_views::{Attributes, ViewConfig, ViewError, ViewRenderer};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn renderer() -> ViewRenderer {
    ViewRenderer::with_paths([fixtures()])
}

// ============================================================================
// Basic rendering
// ============================================================================

#[test]
fn renders_variable() {
    let out = renderer()
        .render("testTemplate", json!({ "hello": "Hi" }))
        .unwrap();
    assert_eq!(out, "Hi");
}

#[test]
fn renders_with_hashmap_and_struct_vars() {
    let renderer = renderer();

    let mut vars = HashMap::new();
    vars.insert("hello", "Hi");
    assert_eq!(renderer.render("testTemplate", &vars).unwrap(), "Hi");

    #[derive(Serialize)]
    struct Greeting {
        hello: String,
    }
    let out = renderer
        .render("testTemplate", Greeting { hello: "Hey".into() })
        .unwrap();
    assert_eq!(out, "Hey");
}

#[test]
fn call_values_override_attributes() {
    let attrs: Attributes = [("hello", "Hello")].into_iter().collect();
    let renderer = renderer().with_attributes(attrs);

    assert_eq!(renderer.render("testTemplate", ()).unwrap(), "Hello");
    assert_eq!(
        renderer
            .render("testTemplate", json!({ "hello": "Hi" }))
            .unwrap(),
        "Hi"
    );
}

#[test]
fn failure_does_not_leak_into_next_render() {
    let renderer = renderer();

    let err = renderer.render("testException", ()).unwrap_err();
    assert!(matches!(err, ViewError::TemplateExecution { .. }));
    assert!(err.to_string().contains("template failed"));

    let out = renderer
        .render("testTemplate", json!({ "hello": "Hi" }))
        .unwrap();
    assert_eq!(out, "Hi");
}

#[test]
fn missing_view_is_not_found() {
    let renderer = renderer();
    assert!(!renderer.exists("missingTemplate"));
    assert!(matches!(
        renderer.render("adfadftestTemplate", ()),
        Err(ViewError::TemplateNotFound { .. })
    ));
}

// ============================================================================
// Namespaces
// ============================================================================

#[test]
fn renders_namespaced_views() {
    let mut renderer = renderer();
    renderer.add_path(fixtures().join("admin"), Some("admin"));

    assert_eq!(
        renderer
            .render("admin::dashboard", json!({ "user": "ana" }))
            .unwrap(),
        "Admin ana"
    );
    assert_eq!(
        renderer
            .render("admin::users.list", json!({ "users": ["a", "b"] }))
            .unwrap(),
        "a;b;"
    );
}

#[test]
fn namespace_errors() {
    let renderer = renderer();
    assert!(matches!(
        renderer.render("bogus::name", ()),
        Err(ViewError::NamespaceNotFound { .. })
    ));
    assert!(matches!(
        renderer.render("a::b::c", ()),
        Err(ViewError::InvalidName { .. })
    ));
}

// ============================================================================
// Filesystem changes
// ============================================================================

#[test]
fn resolved_path_is_canonical() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("home.jinja"), "home").unwrap();

    let mut renderer = ViewRenderer::new();
    renderer.add_path(dir.path().join("nested").join(".."), None);

    let path = renderer.finder().find("home").unwrap();
    assert_eq!(path, fs::canonicalize(dir.path().join("home.jinja")).unwrap());
}

#[test]
fn absolute_name_cannot_leave_search_paths() {
    // No dots in the directory names, they would turn into separators.
    let outer = tempfile::Builder::new().prefix("outer").tempdir().unwrap();
    let views = outer.path().join("views");
    fs::create_dir(&views).unwrap();
    fs::write(outer.path().join("secret.jinja"), "SECRET").unwrap();

    let renderer = ViewRenderer::with_paths([&views]);
    let name = format!("{}/secret", outer.path().display());

    assert!(!renderer.exists(&name));
    assert!(matches!(
        renderer.render(&name, ()),
        Err(ViewError::TemplateNotFound { .. })
    ));
}

#[test]
fn prepended_directory_takes_over() {
    let base = tempfile::tempdir().unwrap();
    let theme = tempfile::tempdir().unwrap();
    fs::write(base.path().join("page.jinja"), "base").unwrap();
    fs::write(theme.path().join("page.jinja"), "theme").unwrap();

    let mut renderer = ViewRenderer::with_paths([base.path()]);
    assert_eq!(renderer.render("page", ()).unwrap(), "base");

    renderer.prepend_path(theme.path(), None);
    assert_eq!(renderer.render("page", ()).unwrap(), "theme");
}

#[test]
fn added_extension_is_preferred() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("page.jinja"), "jinja").unwrap();
    fs::write(dir.path().join("page.tpl"), "tpl").unwrap();

    let mut renderer = ViewRenderer::with_paths([dir.path()]);
    assert_eq!(renderer.render("page", ()).unwrap(), "jinja");

    renderer.add_extension("tpl");
    assert_eq!(renderer.render("page", ()).unwrap(), "tpl");
}

#[test]
fn deleted_file_after_lookup_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("gone.jinja");
    fs::write(&file, "soon gone").unwrap();

    let renderer = ViewRenderer::with_paths([dir.path()]);
    assert!(renderer.exists("gone"));

    fs::remove_file(&file).unwrap();
    assert!(matches!(
        renderer.render("gone", ()),
        Err(ViewError::TemplateNotFound { .. })
    ));
}

#[test]
fn edits_are_picked_up_without_flush() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("live.jinja");
    fs::write(&file, "v1").unwrap();

    let renderer = ViewRenderer::with_paths([dir.path()]);
    assert_eq!(renderer.render("live", ()).unwrap(), "v1");

    // Only the path is cached, content is read on every render.
    fs::write(&file, "v2").unwrap();
    assert_eq!(renderer.render("live", ()).unwrap(), "v2");
}

// ============================================================================
// Escaping
// ============================================================================

#[test]
fn html_files_are_escaped() {
    let mut renderer = renderer();
    renderer.add_path(fixtures().join("admin"), Some("admin"));

    // admin/dashboard.html
    assert_eq!(
        renderer
            .render("admin::dashboard", json!({ "user": "<b>" }))
            .unwrap(),
        "Admin &lt;b&gt;"
    );
    // testTemplate.jinja
    assert_eq!(
        renderer
            .render("testTemplate", json!({ "hello": "<b>" }))
            .unwrap(),
        "<b>"
    );
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn renderer_from_yaml_config() {
    let yaml = format!(
        "paths:\n  - {}\n  - path: {}\n    namespace: admin\n",
        fixtures().display(),
        fixtures().join("admin").display()
    );
    let renderer = ViewRenderer::from_config(&ViewConfig::from_yaml(&yaml).unwrap());

    assert!(renderer.exists("testTemplate"));
    assert!(renderer.exists("admin::dashboard"));
    assert_eq!(renderer.paths().len(), 2);
}
