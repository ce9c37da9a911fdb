//! Integration tests for loading and persisting taxonomies on disk.

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use taxotree::application::services::{TableFormat, TaxonomyService};
use taxotree::application::ApplicationError;
use taxotree::domain::{NodeId, SelectionEngine, TaxonomyTree};
use taxotree::infrastructure::traits::RealFileSystem;
use taxotree::util::testing::{init_test_setup, write_table, SCENARIO_TABLE};

fn service() -> TaxonomyService {
    TaxonomyService::new(Arc::new(RealFileSystem))
}

/// Every node decorated under the same selection, in tree order.
fn decorations(tree: &TaxonomyTree, toggled: &str) -> Vec<String> {
    let mut selection = SelectionEngine::new(tree);
    selection
        .apply_toggle(tree, &NodeId::from(toggled))
        .unwrap();
    tree.iter()
        .map(|(_, node)| format!("{} {}", node.id(), selection.decorate(node)))
        .collect()
}

#[test]
fn given_built_table_when_saved_and_reloaded_then_identical_tree() {
    // Arrange
    init_test_setup();
    let dir = TempDir::new().unwrap();
    let table = write_table(dir.path(), "tax.csv", SCENARIO_TABLE).unwrap();
    let snapshot = dir.path().join("out").join("taxonomy.json");
    let built = service().build_from_table(&table).unwrap().tree;

    // Act
    service().save_snapshot(&built, &snapshot).unwrap();
    let loaded = service().load(&snapshot).unwrap();

    // Assert
    assert!(loaded.skipped.is_empty());
    assert_eq!(loaded.tree.to_snapshot(), built.to_snapshot());
    assert_eq!(
        decorations(&loaded.tree, "01001001"),
        decorations(&built, "01001001")
    );
}

#[test]
fn given_missing_table_when_loading_then_input_unavailable() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.csv");

    let err = service().load(&missing).unwrap_err();

    match err {
        ApplicationError::InputUnavailable { path, .. } => assert_eq!(path, missing),
        other => panic!("expected InputUnavailable, got {other:?}"),
    }
}

#[test]
fn given_missing_snapshot_when_loading_then_input_unavailable() {
    let err = service()
        .load(Path::new("/nonexistent/taxotree/taxonomy.json"))
        .unwrap_err();
    assert!(matches!(err, ApplicationError::InputUnavailable { .. }));
}

#[test]
fn given_malformed_snapshot_when_loading_then_snapshot_format_error() {
    let dir = TempDir::new().unwrap();
    let path = write_table(dir.path(), "broken.json", "{\"id\": ").unwrap();

    let err = service().load(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::SnapshotFormat { .. }));
}

#[test]
fn given_snapshot_with_duplicate_ids_when_loading_then_domain_error() {
    let dir = TempDir::new().unwrap();
    let json = r#"{"id":"root","children":[{"id":"01000000","title":"A"},{"id":"01000000","title":"B"}]}"#;
    let path = write_table(dir.path(), "dup.json", json).unwrap();

    let err = service().load(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::Domain(_)));
}

#[test]
fn given_tab_separated_table_with_header_when_loading_then_rows_read() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let content = "code\tlabel\n01000000\tCat A\nbogus\tNope\n01001001\tItem\n";
    let path = write_table(dir.path(), "tax.tsv", content).unwrap();
    let service = TaxonomyService::with_format(
        Arc::new(RealFileSystem),
        TableFormat {
            delimiter: b'\t',
            has_header: true,
        },
    );

    // Act
    let loaded = service.load(&path).unwrap();

    // Assert
    assert_eq!(loaded.skipped.len(), 1);
    assert_eq!(loaded.skipped[0].code, "bogus");
    let tree = &loaded.tree;
    assert_eq!(
        tree.parent_of(&NodeId::from("01001001")).map(|p| p.as_str()),
        Some("01001000")
    );
}

#[test]
fn given_latin1_table_on_disk_when_loading_then_tree_built() {
    let dir = TempDir::new().unwrap();
    let table = dir.path().join("latin1.csv");
    std::fs::write(&table, b"01000000,Caf\xe9\n02000000,Plain\n").unwrap();

    let loaded = service().load(&table).unwrap();

    assert_eq!(loaded.tree.len(), 3);
    let node = loaded.tree.node_by_id(&NodeId::from("02000000")).unwrap();
    assert_eq!(node.title(), "Plain");
}

#[test]
fn given_non_utf8_snapshot_when_loading_then_snapshot_format_error() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("broken.json");
    std::fs::write(&snapshot, b"{\"id\":\"root\",\"title\":\"\xff\",\"children\":[]}").unwrap();

    let err = service().load(&snapshot).unwrap_err();

    assert!(matches!(err, ApplicationError::SnapshotFormat { .. }));
}
