//! Taxonomy loading service
//!
//! Reads coded tables and snapshots through the [`FileSystem`] seam and turns
//! them into trees.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{BuildReport, SkipReason, SkippedRow, SnapshotNode, TaxonomyBuilder, TaxonomyTree};
use crate::infrastructure::traits::FileSystem;

/// Layout of the input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFormat {
    pub delimiter: u8,
    pub has_header: bool,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: false,
        }
    }
}

/// A loaded tree together with whatever was dropped while reading it.
#[derive(Debug)]
pub struct LoadedTaxonomy {
    pub tree: TaxonomyTree,
    pub skipped: Vec<SkippedRow>,
}

impl From<BuildReport> for LoadedTaxonomy {
    fn from(report: BuildReport) -> Self {
        Self {
            tree: report.tree,
            skipped: report.skipped,
        }
    }
}

/// Service for building, loading and persisting taxonomies.
pub struct TaxonomyService {
    fs: Arc<dyn FileSystem>,
    format: TableFormat,
}

impl TaxonomyService {
    /// Create a new taxonomy service reading comma-separated tables without header.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self::with_format(fs, TableFormat::default())
    }

    pub fn with_format(fs: Arc<dyn FileSystem>, format: TableFormat) -> Self {
        Self { fs, format }
    }

    /// Load either a snapshot (`.json`) or a coded table (anything else).
    pub fn load(&self, path: &Path) -> ApplicationResult<LoadedTaxonomy> {
        if is_snapshot(path) {
            Ok(LoadedTaxonomy {
                tree: self.load_snapshot(path)?,
                skipped: Vec::new(),
            })
        } else {
            self.build_from_table(path).map(LoadedTaxonomy::from)
        }
    }

    /// Read a coded table from disk and build the tree.
    #[instrument(level = "debug", skip(self))]
    pub fn build_from_table(&self, path: &Path) -> ApplicationResult<BuildReport> {
        let content = self.fs.read(path).or_input_unavailable(path)?;
        let report = self.build_from_bytes(&content).map_err(|e| match e {
            ApplicationError::TableFormat { message, .. } => ApplicationError::TableFormat {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        info!(
            path = %path.display(),
            nodes = report.tree.len(),
            skipped = report.skipped.len(),
            "built taxonomy from table"
        );
        Ok(report)
    }

    /// Build a tree from table text.
    pub fn build_from_str(&self, content: &str) -> ApplicationResult<BuildReport> {
        self.build_from_bytes(content.as_bytes())
    }

    /// Build a tree from raw table bytes.
    ///
    /// Column 0 is the code, column 1 the label; further columns are ignored.
    /// Rows without a label column are reported as skipped. Invalid UTF-8 in a
    /// field is replaced with U+FFFD instead of failing the build.
    pub fn build_from_bytes(&self, content: &[u8]) -> ApplicationResult<BuildReport> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.format.delimiter)
            .has_headers(self.format.has_header)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content);

        let mut builder = TaxonomyBuilder::new();
        for record in reader.byte_records() {
            let record = record.map_err(|e| ApplicationError::TableFormat {
                path: Default::default(),
                message: e.to_string(),
            })?;
            let code = String::from_utf8_lossy(record.get(0).unwrap_or_default());
            match record.get(1) {
                Some(label) => {
                    builder.insert_row(&code, &String::from_utf8_lossy(label))?;
                }
                None => {
                    builder.skip_row(&code, SkipReason::MissingLabel);
                }
            }
        }
        Ok(builder.finish())
    }

    /// Read a snapshot written by [`save_snapshot`](Self::save_snapshot).
    #[instrument(level = "debug", skip(self))]
    pub fn load_snapshot(&self, path: &Path) -> ApplicationResult<TaxonomyTree> {
        let content = self.fs.read(path).or_input_unavailable(path)?;
        let snapshot: SnapshotNode =
            serde_json::from_slice(&content).map_err(|e| ApplicationError::SnapshotFormat {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        let tree = TaxonomyTree::from_snapshot(&snapshot)?;
        debug!(nodes = tree.len(), "loaded snapshot");
        Ok(tree)
    }

    /// Write the tree as a single JSON object.
    pub fn save_snapshot(&self, tree: &TaxonomyTree, path: &Path) -> ApplicationResult<()> {
        let json = serde_json::to_string_pretty(&tree.to_snapshot()).map_err(|e| {
            ApplicationError::OperationFailed {
                context: "serialize snapshot".to_string(),
                source: Box::new(e),
            }
        })?;
        self.fs
            .ensure_parent(path)
            .with_path_context("create snapshot directory", path)?;
        self.fs
            .write(path, &json)
            .with_path_context("write snapshot", path)?;
        info!(path = %path.display(), nodes = tree.len(), "wrote snapshot");
        Ok(())
    }
}

fn is_snapshot(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
