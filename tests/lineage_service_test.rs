//! Tests for LineageService

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use pianoviz::application::services::LineageService;
use pianoviz::application::ApplicationError;
use pianoviz::domain::{DomainError, LayoutBounds};
use pianoviz::infrastructure::traits::{FileSystem, RealFileSystem};

fn create_lineage_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write lineage file");
    path
}

fn service() -> LineageService {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    LineageService::new(fs)
}

#[test]
fn given_json_lineage_when_loading_then_positioned_tree() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = create_lineage_file(
        &temp,
        "piano_history.json",
        r#"[
  {"name": "Piano", "parent": "root", "dataAvailable": false},
  {"name": "Grand Piano", "parent": "Piano", "dataAvailable": true},
  {"name": "Electric Piano", "parent": "Piano", "dataAvailable": "true"}
]"#,
    );

    // Act
    let tree = service().load_tree(&path, &LayoutBounds::default()).unwrap();

    // Assert
    assert_eq!(tree.len(), 3);
    let node = |name: &str| tree.get_node(tree.find_by_name(name).unwrap()).unwrap();
    assert_eq!(node("Grand Piano").position(), 2.0);
    assert_eq!(node("Electric Piano").position(), 6.0);
    assert!(node("Electric Piano").data_available);
    assert!(!node("Piano").data_available);
}

#[test]
fn given_record_without_flag_when_loading_then_defaults_to_no_data() {
    let temp = TempDir::new().unwrap();
    let path = create_lineage_file(&temp, "h.json", r#"[{"name": "Piano", "parent": "root"}]"#);

    let records = service().load_records(&path).unwrap();

    assert_eq!(records.len(), 1);
    assert!(!records[0].data_available);
}

#[test]
fn given_missing_file_when_loading_then_not_found() {
    let temp = TempDir::new().unwrap();

    let err = service()
        .load_records(&temp.path().join("absent.json"))
        .unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
}

#[test]
fn given_malformed_json_when_loading_then_dataset_error() {
    let temp = TempDir::new().unwrap();
    let path = create_lineage_file(&temp, "h.json", "{ not json");

    let err = service().load_records(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::Dataset { .. }));
}

#[test]
fn given_two_roots_when_loading_tree_then_domain_error_propagates() {
    let temp = TempDir::new().unwrap();
    let path = create_lineage_file(
        &temp,
        "h.json",
        r#"[{"name": "A", "parent": "root"}, {"name": "B", "parent": "root"}]"#,
    );

    let err = service().load_tree(&path, &LayoutBounds::default()).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::Structure { .. })
    ));
}
