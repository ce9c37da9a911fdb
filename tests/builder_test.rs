//! Integration tests for building taxonomies from coded rows.

use std::collections::BTreeSet;

use itertools::Itertools;
use rstest::rstest;

use taxotree::domain::{
    CodedRow, NodeId, RowOutcome, SkipReason, TaxonomyBuilder, TaxonomyTree, ROOT_ID,
};
use taxotree::util::testing::init_test_setup;

/// `(id, parent id, title)` for every node except the root.
fn edges(tree: &TaxonomyTree) -> BTreeSet<(String, String, String)> {
    tree.iter()
        .filter(|(_, node)| node.id().as_str() != ROOT_ID)
        .map(|(_, node)| {
            let parent = tree
                .parent_of(node.id())
                .map(|p| p.to_string())
                .unwrap_or_default();
            (node.id().to_string(), parent, node.title().to_string())
        })
        .collect()
}

fn rows(raw: &[(&str, &str)]) -> Vec<CodedRow> {
    raw.iter().map(|(code, label)| CodedRow::new(*code, *label)).collect()
}

fn parent(tree: &TaxonomyTree, id: &str) -> String {
    tree.parent_of(&NodeId::from(id))
        .map(|p| p.to_string())
        .unwrap_or_default()
}

fn title<'a>(tree: &'a TaxonomyTree, id: &str) -> &'a str {
    tree.node_by_id(&NodeId::from(id))
        .map(|node| node.title())
        .unwrap_or("<missing>")
}

#[test]
fn given_rows_in_any_order_when_building_then_same_edges() {
    init_test_setup();
    let input = [
        ("01000000", "Cat A"),
        ("01001000", "Sub A1"),
        ("01001001", "Item A1a"),
        ("02000000", "Cat B"),
        ("01002005", "Item A2e"),
    ];
    let expected = edges(&TaxonomyBuilder::from_rows(rows(&input)).unwrap().tree);

    for order in input.iter().permutations(input.len()) {
        let shuffled: Vec<CodedRow> = order
            .iter()
            .map(|(code, label)| CodedRow::new(*code, *label))
            .collect();
        let report = TaxonomyBuilder::from_rows(shuffled).unwrap();
        assert_eq!(edges(&report.tree), expected, "order {:?}", order);
    }
}

#[test]
fn given_same_row_twice_when_building_then_no_duplicate_node() {
    // Arrange
    let mut builder = TaxonomyBuilder::new();
    builder.insert_row("01000000", "Cat A").unwrap();
    let before = builder.tree().len();

    // Act
    let outcome = builder.insert_row("01000000", "Cat A").unwrap();

    // Assert
    assert_eq!(outcome, RowOutcome::Updated);
    assert_eq!(builder.tree().len(), before);
    assert_eq!(builder.tree().root_node().child_count(), 1);
}

#[test]
fn given_item_before_ancestors_when_subcategory_arrives_then_placeholder_resolved() {
    // Arrange
    let mut builder = TaxonomyBuilder::new();
    assert_eq!(
        builder.insert_row("12345678", "Gadget").unwrap(),
        RowOutcome::Created
    );
    assert_eq!(title(builder.tree(), "12345000"), "");
    assert_eq!(title(builder.tree(), "12000000"), "");

    // Act
    let outcome = builder.insert_row("12345000", "Widgets").unwrap();

    // Assert
    assert_eq!(outcome, RowOutcome::Resolved);
    let report = builder.finish();
    let tree = &report.tree;
    assert_eq!(title(tree, "12345000"), "Widgets");
    assert_eq!(parent(tree, "12345678"), "12345000");
    assert_eq!(parent(tree, "12345000"), "12000000");
    assert_eq!(parent(tree, "12000000"), ROOT_ID);
    assert_eq!(report.placeholders, 1, "only the category stays unnamed");
}

#[test]
fn given_category_present_and_subcategory_missing_when_item_arrives_then_nested_under_category() {
    let report = TaxonomyBuilder::from_rows(rows(&[
        ("01000000", "Cat A"),
        ("01002003", "Item"),
    ]))
    .unwrap();
    let tree = &report.tree;

    assert_eq!(parent(tree, "01002000"), "01000000");
    assert_eq!(parent(tree, "01002003"), "01002000");
    assert_eq!(tree.root_node().child_count(), 1);
    assert_eq!(tree.depth(), 4);
}

#[rstest]
#[case("1234", SkipReason::UnrecognizedCode)]
#[case("0100000x", SkipReason::UnrecognizedCode)]
#[case("010000001", SkipReason::UnrecognizedCode)]
#[case("٠١٠٠٠٠٠٠", SkipReason::UnrecognizedCode)]
#[case("０１０００１００", SkipReason::UnrecognizedCode)]
#[case("01000005", SkipReason::AmbiguousCode)]
fn given_bad_code_when_building_then_row_skipped(#[case] code: &str, #[case] reason: SkipReason) {
    let report = TaxonomyBuilder::from_rows(rows(&[("01000000", "Cat A"), (code, "Bad")])).unwrap();

    assert_eq!(report.tree.len(), 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].reason, reason);
    assert_eq!(report.skipped[0].line, 2);
    assert_eq!(report.skipped[0].code, code);
}

#[test]
fn given_no_rows_when_building_then_root_only() {
    let report = TaxonomyBuilder::from_rows(Vec::<CodedRow>::new()).unwrap();
    assert_eq!(report.tree.len(), 1);
    assert!(report.tree.root_node().is_leaf());
    assert_eq!(report.created, 0);
}
