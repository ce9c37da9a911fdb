//! termtree rendering of taxonomies
use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::{SelectionEngine, TaxonomyTree, TreeNode};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

/// A tree rendered together with its selection markers.
pub struct MarkedTree<'a> {
    pub tree: &'a TaxonomyTree,
    pub selection: &'a SelectionEngine,
}

impl TreeNodeConvert for TaxonomyTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        build(self, &|node: &TreeNode| plain_label(node))
    }
}

impl TreeNodeConvert for MarkedTree<'_> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        build(self.tree, &|node: &TreeNode| {
            if node.id() == self.tree.root_node().id() {
                plain_label(node)
            } else {
                format!("{} {}", node.id(), self.selection.decorate(node))
            }
        })
    }
}

/// `code title (n items)`, the count only for internal nodes.
fn plain_label(node: &TreeNode) -> String {
    let mut label = node.id().to_string();
    if !node.title().is_empty() {
        label.push(' ');
        label.push_str(node.title());
    }
    if !node.is_leaf() {
        label.push_str(&format!(" ({} items)", node.child_count()));
    }
    label
}

fn build(tree: &TaxonomyTree, label: &dyn Fn(&TreeNode) -> String) -> Tree<String> {
    fn attach(
        tree: &TaxonomyTree,
        idx: Index,
        parent: &mut Tree<String>,
        label: &dyn Fn(&TreeNode) -> String,
    ) {
        for (child_idx, child) in tree.children(idx) {
            let mut subtree = Tree::new(label(child));
            attach(tree, child_idx, &mut subtree, label);
            parent.push(subtree);
        }
    }

    let mut root = Tree::new(label(tree.root_node()));
    attach(tree, tree.root(), &mut root, label);
    root
}
