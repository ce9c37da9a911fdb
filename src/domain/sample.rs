//! Built-in taxonomy used when no input is configured.

use crate::domain::arena::{TaxonomyTree, ROOT_ID};
use crate::domain::error::DomainResult;
use crate::domain::snapshot::SnapshotNode;

/// category 1 → A (x, y), B, C; category 2.
pub fn sample_snapshot() -> SnapshotNode {
    SnapshotNode::with_children(
        ROOT_ID,
        "",
        vec![
            SnapshotNode::with_children(
                "0",
                "category 1",
                vec![
                    SnapshotNode::with_children(
                        "1",
                        "A",
                        vec![SnapshotNode::leaf("5", "x"), SnapshotNode::leaf("6", "y")],
                    ),
                    SnapshotNode::leaf("2", "B"),
                    SnapshotNode::leaf("3", "C"),
                ],
            ),
            SnapshotNode::leaf("4", "category 2"),
        ],
    )
}

pub fn sample_tree() -> DomainResult<TaxonomyTree> {
    TaxonomyTree::from_snapshot(&sample_snapshot())
}
