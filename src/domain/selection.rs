//! Tri-state selection over a taxonomy tree.
//!
//! The engine never owns the tree. Several engines can run side by side over
//! the same read-only [`TaxonomyTree`], each holding its own selection.

use std::collections::HashMap;

use generational_arena::Index;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{NodeId, TaxonomyTree, TreeNode};
use crate::domain::error::DomainResult;

/// Selection state of a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionState {
    #[default]
    Unselected,
    Partial,
    Full,
}

impl SelectionState {
    /// Aggregation weight: Unselected 0, Partial 1, Full 2.
    pub fn weight(self) -> usize {
        match self {
            SelectionState::Unselected => 0,
            SelectionState::Partial => 1,
            SelectionState::Full => 2,
        }
    }

    /// Single-character marker shown next to a row.
    pub fn marker(self) -> char {
        match self {
            SelectionState::Unselected => ' ',
            SelectionState::Partial => '-',
            SelectionState::Full => '+',
        }
    }

    /// State of a parent whose children weigh `sum` out of `max_sum`.
    pub fn from_weights(sum: usize, max_sum: usize) -> Self {
        if sum == 0 {
            SelectionState::Unselected
        } else if sum == max_sum {
            SelectionState::Full
        } else {
            SelectionState::Partial
        }
    }
}

/// Selection session over one tree.
#[derive(Debug, Clone, Default)]
pub struct SelectionEngine {
    /// Only Partial and Full entries are stored
    states: HashMap<NodeId, SelectionState>,
    /// Direct child count per internal node, captured at construction
    child_counts: HashMap<NodeId, usize>,
}

impl SelectionEngine {
    /// Start an empty selection for `tree`.
    pub fn new(tree: &TaxonomyTree) -> Self {
        let child_counts = tree
            .iter()
            .filter(|(_, node)| !node.is_leaf())
            .map(|(_, node)| (node.id().clone(), node.child_count()))
            .collect();
        Self {
            states: HashMap::new(),
            child_counts,
        }
    }

    pub fn state(&self, id: &NodeId) -> SelectionState {
        self.states.get(id).copied().unwrap_or_default()
    }

    pub fn is_selected(&self, id: &NodeId) -> bool {
        self.states.contains_key(id)
    }

    /// Direct child count recorded for `id`, 0 for leaves.
    pub fn child_count(&self, id: &NodeId) -> usize {
        self.child_counts.get(id).copied().unwrap_or(0)
    }

    /// Number of nodes currently Partial or Full.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Flip the subtree at `id`: any selection (Partial or Full) clears it,
    /// no selection selects it fully. Ancestors are not touched; call
    /// [`recompute_ancestors`](Self::recompute_ancestors) afterwards.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn toggle(&mut self, tree: &TaxonomyTree, id: &NodeId) -> DomainResult<SelectionState> {
        let idx = tree.require(id)?;
        if self.is_selected(id) {
            self.deselect_index(tree, idx);
        } else {
            self.select_index(tree, idx);
        }
        Ok(self.state(id))
    }

    /// Mark `id` and every descendant as Full.
    pub fn select_subtree(&mut self, tree: &TaxonomyTree, id: &NodeId) -> DomainResult<()> {
        let idx = tree.require(id)?;
        self.select_index(tree, idx);
        Ok(())
    }

    /// Clear `id` and every descendant.
    pub fn deselect_subtree(&mut self, tree: &TaxonomyTree, id: &NodeId) -> DomainResult<()> {
        let idx = tree.require(id)?;
        self.deselect_index(tree, idx);
        Ok(())
    }

    /// Re-derive the state of every internal node from its children.
    ///
    /// Runs post-order, so each parent sees its children's final states.
    /// Leaves keep whatever toggling gave them.
    #[instrument(level = "debug", skip_all)]
    pub fn recompute_ancestors(&mut self, tree: &TaxonomyTree) {
        for (idx, node) in tree.iter_postorder() {
            if node.is_leaf() {
                continue;
            }
            let sum: usize = tree
                .children(idx)
                .map(|(_, child)| self.state(child.id()).weight())
                .sum();
            let count = self
                .child_counts
                .get(node.id())
                .copied()
                .unwrap_or_else(|| node.child_count());
            let next = SelectionState::from_weights(sum, 2 * count);
            trace!(id = %node.id(), sum, count, ?next, "aggregated");
            self.set(node.id(), next);
        }
    }

    /// Toggle followed by ancestor recomputation, the unit of one user interaction.
    pub fn apply_toggle(&mut self, tree: &TaxonomyTree, id: &NodeId) -> DomainResult<SelectionState> {
        self.toggle(tree, id)?;
        self.recompute_ancestors(tree);
        Ok(self.state(id))
    }

    /// Row text for a node: `[+] Title (3 items)`; the count only for internal nodes.
    pub fn decorate(&self, node: &TreeNode) -> String {
        let marker = self.state(node.id()).marker();
        match self.child_count(node.id()) {
            0 => format!("[{}] {}", marker, node.title()),
            n => format!("[{}] {} ({} items)", marker, node.title(), n),
        }
    }

    /// Ids of fully selected leaves, in tree order.
    pub fn selected_leaves<'t>(&self, tree: &'t TaxonomyTree) -> Vec<&'t NodeId> {
        tree.leaf_ids()
            .into_iter()
            .filter(|id| self.state(id) == SelectionState::Full)
            .collect()
    }

    fn select_index(&mut self, tree: &TaxonomyTree, idx: Index) {
        let mut touched = 0;
        for (_, node) in tree.iter_from(idx) {
            self.states.insert(node.id().clone(), SelectionState::Full);
            touched += 1;
        }
        debug!(touched, "selected subtree");
    }

    fn deselect_index(&mut self, tree: &TaxonomyTree, idx: Index) {
        for (_, node) in tree.iter_from(idx) {
            self.states.remove(node.id());
        }
    }

    fn set(&mut self, id: &NodeId, state: SelectionState) {
        match state {
            SelectionState::Unselected => {
                self.states.remove(id);
            }
            _ => {
                self.states.insert(id.clone(), state);
            }
        }
    }
}
