//! Tree builder for reconstructing a taxonomy from flat coded rows.
//!
//! Rows may arrive in any order. Missing ancestors are synthesized as
//! placeholders with an empty title and named later if their own row shows up.
//! Re-applying a code updates the existing node instead of adding a sibling.

use generational_arena::Index;
use tracing::{debug, instrument, warn};

use crate::domain::arena::{NodeData, NodeId, TaxonomyTree};
use crate::domain::code::{CodeError, CodedRow, TaxonomyCode};
use crate::domain::error::DomainResult;

/// What a single row did to the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// A new node was appended
    Created,
    /// An existing node got its title replaced
    Updated,
    /// A placeholder ancestor received its real title
    Resolved,
    /// The row was not applied
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UnrecognizedCode,
    AmbiguousCode,
    MissingLabel,
}

impl From<CodeError> for SkipReason {
    fn from(value: CodeError) -> Self {
        match value {
            CodeError::Unrecognized => SkipReason::UnrecognizedCode,
            CodeError::MissingSubcategory => SkipReason::AmbiguousCode,
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::UnrecognizedCode => f.write_str("unrecognized code"),
            SkipReason::AmbiguousCode => f.write_str("item code without subcategory digits"),
            SkipReason::MissingLabel => f.write_str("missing label column"),
        }
    }
}

/// A row that did not make it into the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based data row number
    pub line: usize,
    pub code: String,
    pub reason: SkipReason,
}

/// Result of a complete build.
#[derive(Debug)]
pub struct BuildReport {
    pub tree: TaxonomyTree,
    pub skipped: Vec<SkippedRow>,
    pub created: usize,
    pub updated: usize,
    /// Synthesized ancestors that never received their own row
    pub placeholders: usize,
}

/// Constructs a [`TaxonomyTree`] from coded rows.
pub struct TaxonomyBuilder {
    tree: TaxonomyTree,
    placeholders: Vec<Index>,
    skipped: Vec<SkippedRow>,
    rows_seen: usize,
    created: usize,
    updated: usize,
}

impl Default for TaxonomyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TaxonomyBuilder {
    pub fn new() -> Self {
        Self {
            tree: TaxonomyTree::new(),
            placeholders: Vec::new(),
            skipped: Vec::new(),
            rows_seen: 0,
            created: 0,
            updated: 0,
        }
    }

    /// Build a tree from an iterator of rows.
    pub fn from_rows<I>(rows: I) -> DomainResult<BuildReport>
    where
        I: IntoIterator<Item = CodedRow>,
    {
        let mut builder = Self::new();
        for row in rows {
            builder.insert_row(&row.code, &row.label)?;
        }
        Ok(builder.finish())
    }

    /// Record a row that could not be read far enough to be applied.
    pub fn skip_row(&mut self, code: &str, reason: SkipReason) -> RowOutcome {
        self.rows_seen += 1;
        self.record_skip(code, reason)
    }

    /// Apply one `(code, label)` row.
    ///
    /// Errors only when the tree invariants would break, which cannot happen
    /// for rows accepted by the code classifier.
    #[instrument(level = "debug", skip(self))]
    pub fn insert_row(&mut self, code: &str, label: &str) -> DomainResult<RowOutcome> {
        self.rows_seen += 1;
        let code = match TaxonomyCode::parse(code) {
            Ok(code) => code,
            Err(e) => return Ok(self.record_skip(code, e.into())),
        };

        // Keep hold of every ancestor slot on the way down so a freshly
        // synthesized subcategory lands under the category found above it.
        let mut parent = self.tree.root();
        for ancestor in code.ancestors() {
            parent = self.ensure_placeholder(ancestor, parent)?;
        }

        let id = NodeId::from(code.to_string());
        let outcome = match self.tree.find(&id) {
            Some(idx) => {
                let was_placeholder = self.resolve_placeholder(idx);
                self.tree.set_title(idx, label);
                self.updated += 1;
                if was_placeholder {
                    RowOutcome::Resolved
                } else {
                    RowOutcome::Updated
                }
            }
            None => {
                self.tree.insert_node(
                    NodeData {
                        id,
                        title: label.to_string(),
                    },
                    parent,
                )?;
                self.created += 1;
                RowOutcome::Created
            }
        };
        debug!(?outcome, level = code.level().depth(), "applied row");
        Ok(outcome)
    }

    /// Finish the build and hand out the tree.
    pub fn finish(self) -> BuildReport {
        debug!(
            nodes = self.tree.len(),
            rows = self.rows_seen,
            skipped = self.skipped.len(),
            "taxonomy built"
        );
        BuildReport {
            placeholders: self.placeholders.len(),
            tree: self.tree,
            skipped: self.skipped,
            created: self.created,
            updated: self.updated,
        }
    }

    pub fn tree(&self) -> &TaxonomyTree {
        &self.tree
    }

    fn ensure_placeholder(&mut self, code: String, parent: Index) -> DomainResult<Index> {
        let id = NodeId::from(code);
        if let Some(idx) = self.tree.find(&id) {
            return Ok(idx);
        }
        debug!(%id, "synthesizing placeholder");
        let idx = self.tree.insert_node(
            NodeData {
                id,
                title: String::new(),
            },
            parent,
        )?;
        self.placeholders.push(idx);
        Ok(idx)
    }

    fn resolve_placeholder(&mut self, idx: Index) -> bool {
        let before = self.placeholders.len();
        self.placeholders.retain(|&p| p != idx);
        before != self.placeholders.len()
    }

    fn record_skip(&mut self, code: &str, reason: SkipReason) -> RowOutcome {
        warn!(line = self.rows_seen, code, %reason, "skipping row");
        self.skipped.push(SkippedRow {
            line: self.rows_seen,
            code: code.to_string(),
            reason,
        });
        RowOutcome::Skipped(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_of<'a>(tree: &'a TaxonomyTree, id: &str) -> &'a str {
        tree.node_by_id(&NodeId::from(id)).unwrap().title()
    }

    #[test]
    fn given_level3_row_with_known_category_when_subcategory_missing_then_attaches_under_category() {
        let mut builder = TaxonomyBuilder::new();
        builder.insert_row("01000000", "Cat A").unwrap();

        builder.insert_row("01002003", "Item").unwrap();

        let tree = builder.tree();
        assert_eq!(tree.parent_of(&NodeId::from("01002000")), Some(&NodeId::from("01000000")));
        assert_eq!(tree.parent_of(&NodeId::from("01002003")), Some(&NodeId::from("01002000")));
        assert_eq!(tree.root_node().child_count(), 1);
        assert_eq!(title_of(tree, "01002000"), "");
    }

    #[test]
    fn given_placeholder_when_own_row_arrives_then_resolved() {
        let mut builder = TaxonomyBuilder::new();
        builder.insert_row("12345678", "Gadget").unwrap();

        let outcome = builder.insert_row("12345000", "Widgets").unwrap();

        assert_eq!(outcome, RowOutcome::Resolved);
        let report = builder.finish();
        assert_eq!(report.placeholders, 1); // 12000000 stays unnamed
        assert_eq!(title_of(&report.tree, "12345000"), "Widgets");
    }

    #[test]
    fn given_repeated_row_when_inserting_then_updates_in_place() {
        let mut builder = TaxonomyBuilder::new();
        assert_eq!(builder.insert_row("01000000", "Old").unwrap(), RowOutcome::Created);
        assert_eq!(builder.insert_row("01000000", "New").unwrap(), RowOutcome::Updated);

        let report = builder.finish();
        assert_eq!(report.tree.len(), 2);
        assert_eq!(title_of(&report.tree, "01000000"), "New");
        assert_eq!(report.created, 1);
        assert_eq!(report.updated, 1);
    }

    #[test]
    fn given_bad_codes_when_inserting_then_skipped_and_reported() {
        let mut builder = TaxonomyBuilder::new();
        builder.insert_row("01000000", "Cat").unwrap();
        let unknown = builder.insert_row("abc", "x").unwrap();
        let ambiguous = builder.insert_row("01000007", "y").unwrap();

        assert_eq!(unknown, RowOutcome::Skipped(SkipReason::UnrecognizedCode));
        assert_eq!(ambiguous, RowOutcome::Skipped(SkipReason::AmbiguousCode));
        let report = builder.finish();
        assert_eq!(report.tree.len(), 2);
        assert_eq!(
            report.skipped,
            vec![
                SkippedRow {
                    line: 2,
                    code: "abc".to_string(),
                    reason: SkipReason::UnrecognizedCode
                },
                SkippedRow {
                    line: 3,
                    code: "01000007".to_string(),
                    reason: SkipReason::AmbiguousCode
                },
            ]
        );
    }
}
