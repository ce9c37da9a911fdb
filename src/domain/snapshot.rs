//! Flat serialization dump of a taxonomy tree.
//!
//! The snapshot is a single nested object `{ id, title, children: [...] }`
//! rooted at the tree root. Reloading it needs no code parsing.

use generational_arena::Index;
use serde::{Deserialize, Serialize};

use crate::domain::arena::{NodeData, NodeId, TaxonomyTree};
use crate::domain::error::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub id: NodeId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub children: Vec<SnapshotNode>,
}

impl SnapshotNode {
    pub fn leaf(id: &str, title: &str) -> Self {
        Self {
            id: NodeId::from(id),
            title: title.to_string(),
            children: Vec::new(),
        }
    }

    pub fn with_children(id: &str, title: &str, children: Vec<SnapshotNode>) -> Self {
        Self {
            id: NodeId::from(id),
            title: title.to_string(),
            children,
        }
    }
}

impl TaxonomyTree {
    /// Capture the tree as a nested snapshot.
    pub fn to_snapshot(&self) -> SnapshotNode {
        fn capture(tree: &TaxonomyTree, idx: Index) -> Option<SnapshotNode> {
            let node = tree.get_node(idx)?;
            Some(SnapshotNode {
                id: node.id().clone(),
                title: node.title().to_string(),
                children: node
                    .children
                    .iter()
                    .filter_map(|&child| capture(tree, child))
                    .collect(),
            })
        }

        capture(self, self.root()).unwrap_or_else(|| SnapshotNode::leaf("", ""))
    }

    /// Rebuild a tree from a snapshot, keeping child order.
    ///
    /// Fails with [`DomainError::DuplicateId`] if an id occurs twice.
    pub fn from_snapshot(snapshot: &SnapshotNode) -> DomainResult<Self> {
        if snapshot.id.as_str().is_empty() {
            return Err(DomainError::InvalidSnapshot {
                message: "root node has no id".to_string(),
            });
        }
        let mut tree = TaxonomyTree::with_root(NodeData {
            id: snapshot.id.clone(),
            title: snapshot.title.clone(),
        });

        let mut stack: Vec<(&SnapshotNode, Index)> = snapshot
            .children
            .iter()
            .rev()
            .map(|child| (child, tree.root()))
            .collect();

        while let Some((node, parent)) = stack.pop() {
            let idx = tree.insert_node(
                NodeData {
                    id: node.id.clone(),
                    title: node.title.clone(),
                },
                parent,
            )?;
            stack.extend(node.children.iter().rev().map(|child| (child, idx)));
        }

        Ok(tree)
    }
}
