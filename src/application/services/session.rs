//! Visualization session
//!
//! Links clicks on the lineage tree to the sales chart. Every dataset fetch
//! carries a request token; results for superseded selections are dropped.

use std::sync::Arc;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::application::ApplicationResult;
use crate::domain::{
    ChartUpdate, DatasetLookup, DomainError, RequestToken, RequestTracker, SalesCategory,
    SalesRow, SalesSeries, Selection, SelectionManager, TreeArena,
};
use crate::infrastructure::traits::{ChartSink, SalesDataProvider};

/// Dataset request issued for a selection, awaiting its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub token: RequestToken,
    pub category: SalesCategory,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Node cannot be selected; nothing happened.
    Ignored,
    /// Chart was updated immediately (no dataset for the node).
    Delivered,
    /// Rows must be fetched and passed to `complete`.
    Pending(PendingFetch),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Applied,
    /// A newer selection superseded this request.
    Stale,
}

pub struct VisualizationSession {
    tree: TreeArena,
    selection: SelectionManager,
    requests: RequestTracker,
    provider: Arc<dyn SalesDataProvider>,
}

impl VisualizationSession {
    pub fn new(tree: TreeArena, provider: Arc<dyn SalesDataProvider>) -> Self {
        Self {
            tree,
            selection: SelectionManager::new(),
            requests: RequestTracker::new(),
            provider,
        }
    }

    pub fn tree(&self) -> &TreeArena {
        &self.tree
    }

    pub fn selected(&self) -> Option<Index> {
        self.selection.current()
    }

    /// Chart state before any selection.
    pub fn initial_chart(&self, sink: &mut dyn ChartSink) {
        sink.refresh(ChartUpdate::no_data(""));
    }

    /// Handle a click on the node at input ordinal `ordinal`.
    #[instrument(level = "debug", skip(self, sink))]
    pub fn click(&mut self, ordinal: usize, sink: &mut dyn ChartSink) -> ApplicationResult<ClickOutcome> {
        let node = self
            .tree
            .node_at(ordinal)
            .ok_or_else(|| DomainError::UnknownNode(format!("ordinal {ordinal}")))?;
        self.click_node(node, sink)
    }

    /// Handle a click on the node named `name`.
    pub fn click_name(&mut self, name: &str, sink: &mut dyn ChartSink) -> ApplicationResult<ClickOutcome> {
        let node = self
            .tree
            .find_by_name(name)
            .ok_or_else(|| DomainError::UnknownNode(name.to_string()))?;
        self.click_node(node, sink)
    }

    fn click_node(&mut self, node: Index, sink: &mut dyn ChartSink) -> ApplicationResult<ClickOutcome> {
        match self.selection.select(&mut self.tree, node)? {
            Selection::Rejected => Ok(ClickOutcome::Ignored),
            Selection::Changed { name, lookup, .. } => {
                // Any selection supersedes requests still in flight
                let token = self.requests.issue();
                match lookup {
                    DatasetLookup::NoData => {
                        debug!("click: no sales dataset for {}", name);
                        sink.refresh(ChartUpdate::no_data(name));
                        Ok(ClickOutcome::Delivered)
                    }
                    DatasetLookup::Key(category) => Ok(ClickOutcome::Pending(PendingFetch {
                        token,
                        category,
                        name,
                    })),
                }
            }
        }
    }

    /// Retrieve the rows a pending request asks for.
    pub fn fetch(&self, pending: &PendingFetch) -> ApplicationResult<Vec<SalesRow>> {
        self.provider.rows(pending.category)
    }

    /// Deliver fetched rows unless a newer selection has superseded them.
    #[instrument(level = "debug", skip(self, rows, sink), fields(token = pending.token.value()))]
    pub fn complete(&self, pending: &PendingFetch, rows: &[SalesRow], sink: &mut dyn ChartSink) -> Delivery {
        if !self.requests.is_current(pending.token) {
            debug!("complete: dropping stale result for {}", pending.name);
            return Delivery::Stale;
        }
        let series = SalesSeries::from_rows(rows);
        sink.refresh(ChartUpdate::new(pending.name.clone(), series));
        Delivery::Applied
    }

    /// Click then fetch and deliver synchronously.
    pub fn click_and_fetch(&mut self, ordinal: usize, sink: &mut dyn ChartSink) -> ApplicationResult<ClickOutcome> {
        let outcome = self.click(ordinal, sink)?;
        if let ClickOutcome::Pending(pending) = &outcome {
            let rows = self.fetch(pending)?;
            self.complete(pending, &rows, sink);
        }
        Ok(outcome)
    }
}
