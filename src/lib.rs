//! taxotree: drill-down multi-select browser for coded hierarchical taxonomies
//!
//! Layers, innermost first:
//! - [`domain`]: taxonomy tree, builder, tri-state selection
//! - [`application`]: loading/persisting taxonomies, browsing sessions
//! - [`infrastructure`]: filesystem, terminal display, DI container
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
