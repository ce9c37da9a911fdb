//! Arena-backed taxonomy tree.
//!
//! Nodes live in a generational arena and refer to each other by [`Index`].
//! The parent link is a plain index (lookup only, never ownership), so the
//! structure has no reference cycles. A side table maps every [`NodeId`] to
//! its arena slot, which is what keeps ids globally unique.

use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};

/// Opaque node identifier, unique across the whole tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Id of the synthetic root that holds the level-1 forest.
pub const ROOT_ID: &str = "root";

/// Data payload for tree nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub id: NodeId,
    /// Display label, empty for placeholders that have not been named yet
    pub title: String,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.title)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in insertion order
    pub children: Vec<Index>,
}

impl TreeNode {
    pub fn id(&self) -> &NodeId {
        &self.data.id
    }

    pub fn title(&self) -> &str {
        &self.data.title
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

/// Taxonomy tree with a single root.
///
/// Shape is only changed through the crate-internal insertion API used by the
/// builder and the snapshot loader; everything public is read-only.
#[derive(Debug)]
pub struct TaxonomyTree {
    arena: Arena<TreeNode>,
    root: Index,
    ids: HashMap<NodeId, Index>,
}

impl Default for TaxonomyTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TaxonomyTree {
    /// Create a tree holding only the root node.
    pub fn new() -> Self {
        Self::with_root(NodeData {
            id: NodeId::new(ROOT_ID),
            title: String::new(),
        })
    }

    pub(crate) fn with_root(data: NodeData) -> Self {
        let mut arena = Arena::new();
        let id = data.id.clone();
        let root = arena.insert(TreeNode {
            data,
            parent: None,
            children: Vec::new(),
        });
        let mut ids = HashMap::new();
        ids.insert(id, root);
        Self { arena, root, ids }
    }

    /// Append a node under `parent`.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn insert_node(&mut self, data: NodeData, parent: Index) -> DomainResult<Index> {
        if self.ids.contains_key(&data.id) {
            return Err(DomainError::DuplicateId(data.id.to_string()));
        }
        if !self.arena.contains(parent) {
            return Err(DomainError::InvalidParent(data.id.to_string()));
        }
        let id = data.id.clone();
        let idx = self.arena.insert(TreeNode {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.children.push(idx);
        }
        self.ids.insert(id, idx);
        Ok(idx)
    }

    pub(crate) fn set_title(&mut self, idx: Index, title: &str) {
        if let Some(node) = self.arena.get_mut(idx) {
            node.data.title = title.to_string();
        }
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn root_node(&self) -> &TreeNode {
        // The root is inserted at construction and never removed.
        &self.arena[self.root]
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    /// Look up a node slot by id.
    pub fn find(&self, id: &NodeId) -> Option<Index> {
        self.ids.get(id).copied()
    }

    pub fn node_by_id(&self, id: &NodeId) -> Option<&TreeNode> {
        self.find(id).and_then(|idx| self.get_node(idx))
    }

    /// Like [`find`](Self::find) but reports unknown ids as a domain error.
    pub fn require(&self, id: &NodeId) -> DomainResult<Index> {
        self.find(id)
            .ok_or_else(|| DomainError::NodeNotFound(id.to_string()))
    }

    /// Id of the parent node, None for the root or unknown ids.
    pub fn parent_of(&self, id: &NodeId) -> Option<&NodeId> {
        self.node_by_id(id)
            .and_then(|node| node.parent)
            .and_then(|parent| self.get_node(parent))
            .map(TreeNode::id)
    }

    /// Children of `idx` in order, resolved to nodes.
    pub fn children(&self, idx: Index) -> impl Iterator<Item = (Index, &TreeNode)> + '_ {
        self.get_node(idx)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |&child| self.get_node(child).map(|node| (child, node)))
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// True when the tree holds nothing but its root.
    pub fn is_empty(&self) -> bool {
        self.arena.len() == 1
    }

    /// Pre-order traversal of the whole tree, root first.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, self.root)
    }

    /// Pre-order traversal of the subtree rooted at `idx`.
    pub fn iter_from(&self, idx: Index) -> TreeIterator<'_> {
        TreeIterator::new(self, idx)
    }

    /// Post-order traversal of the whole tree: every node after all of its descendants.
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, self.root)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 1)];
        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.get_node(idx) {
                stack.extend(node.children.iter().map(|&child| (child, depth + 1)));
            }
        }
        max_depth
    }

    /// Ids of all leaf nodes in pre-order. The root alone does not count as a leaf.
    pub fn leaf_ids(&self) -> Vec<&NodeId> {
        self.iter()
            .filter(|(idx, node)| *idx != self.root && node.is_leaf())
            .map(|(_, node)| node.id())
            .collect()
    }
}

pub struct TreeIterator<'a> {
    tree: &'a TaxonomyTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a TaxonomyTree, start: Index) -> Self {
        let mut stack = Vec::new();
        if tree.arena.contains(start) {
            stack.push(start);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a TaxonomyTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a TaxonomyTree, start: Index) -> Self {
        let mut stack = Vec::new();
        if tree.arena.contains(start) {
            stack.push((start, false));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if visited {
                    return Some((current_idx, node));
                }
                self.stack.push((current_idx, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}
