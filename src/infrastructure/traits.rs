//! I/O boundary traits for testability
//!
//! These traits abstract the collaborators around the lineage core, allowing
//! services to be tested with mock implementations.

use std::io;
use std::path::Path;

use crate::application::ApplicationResult;
use crate::domain::{ChartUpdate, SalesCategory, SalesRow};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Source of raw sales rows, one column per dataset key.
pub trait SalesDataProvider: Send + Sync {
    /// Rows for the category's column, in dataset order.
    fn rows(&self, category: SalesCategory) -> ApplicationResult<Vec<SalesRow>>;
}

/// Collaborator that redraws the linked sales chart.
pub trait ChartSink {
    fn refresh(&mut self, update: ChartUpdate);
}

/// Collects updates; the last element is what the chart currently shows.
impl ChartSink for Vec<ChartUpdate> {
    fn refresh(&mut self, update: ChartUpdate) {
        self.push(update);
    }
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}
