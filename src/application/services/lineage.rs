//! Lineage loading service
//!
//! Reads the lineage records, builds the tree and lays it out.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{apply_layout, LayoutBounds, NodeRecord, TreeArena, TreeBuilder};
use crate::infrastructure::traits::FileSystem;

/// Service turning a lineage file into a positioned tree.
pub struct LineageService {
    fs: Arc<dyn FileSystem>,
}

impl LineageService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Parse the JSON array of `{name, parent, dataAvailable}` records.
    pub fn load_records(&self, path: &Path) -> ApplicationResult<Vec<NodeRecord>> {
        debug!("load_records: {}", path.display());
        if !self.fs.exists(path) {
            return Err(ApplicationError::OperationFailed {
                context: format!("lineage file not found: {}", path.display()),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "file does not exist",
                )),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read lineage", path)?;
        let records: Vec<NodeRecord> = serde_json::from_str(&content)
            .map_err(|e| ApplicationError::dataset(path, e.to_string()))?;
        debug!("load_records: {} records", records.len());
        Ok(records)
    }

    /// Build and lay out the tree described by `records`.
    pub fn build_tree(
        &self,
        records: &[NodeRecord],
        bounds: &LayoutBounds,
    ) -> ApplicationResult<TreeArena> {
        let mut tree = TreeBuilder::new().build(records)?;
        apply_layout(&mut tree, bounds)?;
        Ok(tree)
    }

    pub fn load_tree(&self, path: &Path, bounds: &LayoutBounds) -> ApplicationResult<TreeArena> {
        let records = self.load_records(path)?;
        self.build_tree(&records, bounds)
    }
}
