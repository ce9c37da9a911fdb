//! Domain layer: taxonomy tree, builder and selection
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod code;
pub mod error;
pub mod interaction;
pub mod sample;
pub mod selection;
pub mod snapshot;

pub use arena::{NodeData, NodeId, TaxonomyTree, TreeNode, ROOT_ID};
pub use builder::{BuildReport, RowOutcome, SkipReason, SkippedRow, TaxonomyBuilder};
pub use code::{CodeLevel, CodedRow, TaxonomyCode};
pub use error::{DomainError, DomainResult};
pub use interaction::{BrowserEvent, Flow, ListFrame, Motion};
pub use selection::{SelectionEngine, SelectionState};
pub use snapshot::SnapshotNode;
