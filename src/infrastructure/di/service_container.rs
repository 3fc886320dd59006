//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{
    CsvSalesProvider, LineageService, TimelineService, VisualizationSession,
};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem, SalesDataProvider};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Sales dataset collaborator
    pub sales: Arc<dyn SalesDataProvider>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let sales = Arc::new(CsvSalesProvider::new(Arc::clone(&fs), settings.sales_path()));
        Self::with_deps(settings, fs, sales)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        sales: Arc<dyn SalesDataProvider>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs, sales }
    }

    pub fn lineage_service(&self) -> LineageService {
        LineageService::new(Arc::clone(&self.fs))
    }

    pub fn timeline_service(&self) -> TimelineService {
        TimelineService::new(Arc::clone(&self.fs))
    }

    /// Load, build and lay out the configured lineage, ready for clicks.
    pub fn session(&self) -> ApplicationResult<VisualizationSession> {
        let tree = self
            .lineage_service()
            .load_tree(&self.settings.history_path(), &self.settings.layout)?;
        Ok(VisualizationSession::new(tree, Arc::clone(&self.sales)))
    }
}
