//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, SalesDataProvider, ...)
//! but are themselves concrete structs, not traits.

mod lineage;
mod sales;
mod session;
mod timeline;

pub use lineage::LineageService;
pub use sales::{parse_sales_csv, CsvSalesProvider, YEAR_COLUMN};
pub use session::{ClickOutcome, Delivery, PendingFetch, VisualizationSession};
pub use timeline::{parse_timeline_csv, TimelineService};
