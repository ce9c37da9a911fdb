//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, ListDisplay)
//! but are themselves concrete structs, not traits.

mod browser;
mod taxonomy;

pub use browser::{Browser, BrowserOptions};
pub use taxonomy::{LoadedTaxonomy, TableFormat, TaxonomyService};
