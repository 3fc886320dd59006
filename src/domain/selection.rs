//! Single-node selection and request tokens for the linked chart.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::TreeArena;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::sales::DatasetLookup;

/// Outcome of a selection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Node has no data; nothing changed.
    Rejected,
    Changed {
        previous: Option<Index>,
        current: Index,
        name: String,
        lookup: DatasetLookup,
    },
}

/// Tracks the single active node of a tree.
///
/// Starts with nothing selected. Only nodes with data available can become
/// active, and at most one node carries the `selected` flag.
#[derive(Debug, Default)]
pub struct SelectionManager {
    selected: Option<Index>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Index> {
        self.selected
    }

    #[instrument(level = "debug", skip(self, tree))]
    pub fn select(&mut self, tree: &mut TreeArena, node: Index) -> DomainResult<Selection> {
        let target = tree
            .get_node(node)
            .ok_or_else(|| DomainError::UnknownNode(format!("{node:?}")))?;
        if !target.data_available {
            debug!("select: {} has no data, ignoring", target.name);
            return Ok(Selection::Rejected);
        }
        let name = target.name.clone();

        let previous = self.selected.take();
        if let Some(prev) = previous {
            if let Some(prev_node) = tree.get_node_mut(prev) {
                prev_node.selected = false;
            }
        }
        if let Some(n) = tree.get_node_mut(node) {
            n.selected = true;
        }
        self.selected = Some(node);

        let lookup = DatasetLookup::for_name(&name);
        debug!("select: {} -> {:?}", name, lookup);
        Ok(Selection::Changed {
            previous,
            current: node,
            name,
            lookup,
        })
    }

    /// Drop the selection, clearing the node flag.
    pub fn clear(&mut self, tree: &mut TreeArena) {
        if let Some(prev) = self.selected.take() {
            if let Some(node) = tree.get_node_mut(prev) {
                node.selected = false;
            }
        }
    }
}

/// Identifies one selection-triggered data request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Issues monotonic request tokens; only the latest one may apply its result.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}
