//! Integration tests for Settings config loading with layered merge semantics.
//!
//! These tests run without a global config (temp directories only), so they
//! exercise local config merging on top of compiled defaults.

use std::fs;

use tempfile::TempDir;

use pianoviz::config::{local_config_path, Settings};
use pianoviz::domain::LayoutBounds;

#[test]
fn given_no_config_when_load_then_defaults_anchored_to_project() {
    let project = TempDir::new().unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert_eq!(settings.data_dir, project.path().join("data"));
    assert_eq!(
        settings.history_path(),
        project.path().join("data").join("piano_history.json")
    );
    assert_eq!(settings.layout, LayoutBounds::default());
}

#[test]
fn given_local_config_when_load_then_overrides_only_specified_fields() {
    // Arrange
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        r#"
data_dir = "datasets"
sales_file = "sales_1900_2000.csv"

[layout]
max_bound = 16.0
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(project.path())).expect("load settings");

    // Assert
    assert_eq!(settings.data_dir, project.path().join("datasets"));
    assert_eq!(
        settings.sales_path(),
        project.path().join("datasets").join("sales_1900_2000.csv")
    );
    assert_eq!(settings.timeline_file.to_str(), Some("timeline.csv"));
    assert_eq!(settings.layout.max_bound, 16.0);
    assert_eq!(settings.layout.initial_position, 4.0);
}

#[test]
fn given_inverted_layout_bounds_when_load_then_error() {
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        "[layout]\nmin_bound = 9.0\nmax_bound = 1.0\n",
    )
    .unwrap();

    assert!(Settings::load(Some(project.path())).is_err());
}

#[test]
fn given_malformed_toml_when_load_then_config_error() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), "data_dir = [unclosed").unwrap();

    let err = Settings::load(Some(project.path())).unwrap_err();

    assert!(err.to_string().starts_with("config error"));
}

#[test]
fn given_template_when_parsed_then_equals_defaults() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), Settings::template()).unwrap();

    let from_template = Settings::load(Some(project.path())).unwrap();
    let defaults = Settings::load(Some(TempDir::new().unwrap().path())).unwrap();

    assert_eq!(from_template.layout, defaults.layout);
    assert_eq!(from_template.history_file, defaults.history_file);
}
