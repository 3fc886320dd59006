//! Layout engine: levels top to bottom, positions left to right.
//!
//! Positions come from recursively splitting the horizontal extent evenly
//! among a node's children; each child sits at the midpoint of its share.

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::arena::{Interval, TreeArena};
use crate::domain::error::{DomainError, DomainResult};

/// Horizontal extent the root is laid out in, in abstract layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutBounds {
    pub initial_position: f64,
    pub min_bound: f64,
    pub max_bound: f64,
}

impl Default for LayoutBounds {
    fn default() -> Self {
        Self {
            initial_position: 4.0,
            min_bound: 0.0,
            max_bound: 8.0,
        }
    }
}

impl LayoutBounds {
    pub fn new(initial_position: f64, min_bound: f64, max_bound: f64) -> DomainResult<Self> {
        let bounds = Self {
            initial_position,
            min_bound,
            max_bound,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> DomainResult<()> {
        let finite = self.initial_position.is_finite()
            && self.min_bound.is_finite()
            && self.max_bound.is_finite();
        if !finite || self.min_bound > self.max_bound {
            return Err(DomainError::InvalidBounds {
                min: self.min_bound,
                max: self.max_bound,
            });
        }
        Ok(())
    }
}

/// Flat, renderer-facing view of one laid-out node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    pub ordinal: usize,
    pub name: String,
    pub parent: Option<String>,
    pub level: usize,
    pub position: f64,
    pub allotment: (f64, f64),
    pub data_available: bool,
    pub selected: bool,
}

/// Every node in input order, so renderers can report clicks by ordinal.
pub fn snapshot(tree: &TreeArena) -> Vec<PositionedNode> {
    tree.iter_ordered()
        .map(|(ordinal, _, node)| PositionedNode {
            ordinal,
            name: node.name.clone(),
            parent: node.parent.map(|_| node.parent_name.clone()),
            level: node.level(),
            position: node.position(),
            allotment: (node.allotment().min, node.allotment().max),
            data_available: node.data_available,
            selected: node.is_selected(),
        })
        .collect()
}

/// Assign `level` to `node` and `level + 1` onward to its descendants.
#[instrument(level = "trace", skip(tree))]
pub fn assign_level(tree: &mut TreeArena, node: Index, level: usize) {
    let children = match tree.get_node_mut(node) {
        Some(n) => {
            n.level = level;
            n.children.clone()
        }
        None => return,
    };
    for child in children {
        assign_level(tree, child, level + 1);
    }
}

/// Place `node` at `position` and split `[min_bound, max_bound]` among its children.
#[instrument(level = "trace", skip(tree))]
pub fn assign_position(
    tree: &mut TreeArena,
    node: Index,
    position: f64,
    min_bound: f64,
    max_bound: f64,
) {
    let children = match tree.get_node_mut(node) {
        Some(n) => {
            n.position = position;
            n.allotment = Interval::new(min_bound, max_bound);
            n.children.clone()
        }
        None => return,
    };
    if children.is_empty() {
        return;
    }

    let spacing = (max_bound - min_bound) / children.len() as f64;
    for (i, child) in children.into_iter().enumerate() {
        let share = Interval::new(min_bound + spacing * i as f64, min_bound + spacing * (i + 1) as f64);
        assign_position(tree, child, share.midpoint(), share.min, share.max);
    }
}

/// Run both traversals from the root: levels first, then positions.
#[instrument(level = "debug", skip(tree))]
pub fn apply_layout(tree: &mut TreeArena, bounds: &LayoutBounds) -> DomainResult<()> {
    bounds.validate()?;
    let Some(root) = tree.root() else {
        debug!("apply_layout: empty tree");
        return Ok(());
    };
    assign_level(tree, root, 0);
    assign_position(
        tree,
        root,
        bounds.initial_position,
        bounds.min_bound,
        bounds.max_bound,
    );
    debug!("apply_layout: laid out {} nodes", tree.len());
    Ok(())
}
