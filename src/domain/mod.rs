//! Domain layer: lineage tree, layout and selection
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod assets;
pub mod builder;
pub mod error;
pub mod layout;
pub mod record;
pub mod sales;
pub mod selection;
pub mod timeline;

pub use arena::{Interval, TreeArena, TreeNode};
pub use assets::MediaAssets;
pub use builder::TreeBuilder;
pub use error::{DomainError, DomainResult};
pub use layout::{apply_layout, assign_level, assign_position, snapshot, LayoutBounds, PositionedNode};
pub use record::{NodeRecord, ROOT_SENTINEL};
pub use sales::{ChartUpdate, DatasetLookup, SalesCategory, SalesPoint, SalesRow, SalesSeries};
pub use selection::{RequestToken, RequestTracker, Selection, SelectionManager};
pub use timeline::{Timeline, TimelineEvent};
