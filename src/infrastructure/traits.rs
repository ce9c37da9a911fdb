//! I/O boundary traits
//!
//! Services read and write through [`FileSystem`] and talk to the user
//! through [`ListDisplay`], so both can be replaced in tests.

use std::io;
use std::path::Path;

use crate::domain::{BrowserEvent, ListFrame};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read raw file contents.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create missing parent directories of `path`.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

/// Terminal list display: renders the open levels and reports user input.
pub trait ListDisplay {
    /// Render one column per frame, outermost level first.
    fn draw(&mut self, frames: &[ListFrame]) -> io::Result<()>;

    /// Block until the next committed event.
    /// Returns None when no further input will arrive.
    fn next_event(&mut self) -> io::Result<Option<BrowserEvent>>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}
