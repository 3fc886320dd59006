use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

/// Closed horizontal interval allotted to a node by the layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn midpoint(&self) -> f64 {
        self.min + self.width() / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}, {:.3}]", self.min, self.max)
    }
}

/// Tree node in the arena-based lineage structure.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Display name, unique within a tree
    pub name: String,
    /// Parent name as given by the input record
    pub parent_name: String,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in input order
    pub children: Vec<Index>,
    /// Whether a sales dataset may exist for this node
    pub data_available: bool,
    pub(crate) level: usize,
    pub(crate) position: f64,
    pub(crate) allotment: Interval,
    pub(crate) selected: bool,
}

impl TreeNode {
    pub fn new(name: impl Into<String>, parent_name: impl Into<String>, data_available: bool) -> Self {
        Self {
            name: name.into(),
            parent_name: parent_name.into(),
            parent: None,
            children: Vec::new(),
            data_available,
            level: 0,
            position: 0.0,
            allotment: Interval::default(),
            selected: false,
        }
    }

    /// Depth from the root, root = 0.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Horizontal layout coordinate.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Interval the node's subtree was laid out in.
    pub fn allotment(&self) -> Interval {
        self.allotment
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Arena-based lineage tree.
///
/// Nodes are owned by the arena; `children` are the structural edges and
/// `parent` is a plain back-reference index. Input order is remembered so
/// renderers can address nodes by ordinal.
#[derive(Debug, Default)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    root: Option<Index>,
    order: Vec<Index>,
}

impl TreeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unlinked node; its ordinal is the number of nodes inserted before it.
    #[instrument(level = "trace", skip(self, node), fields(name = %node.name))]
    pub fn insert_node(&mut self, node: TreeNode) -> Index {
        let idx = self.arena.insert(node);
        self.order.push(idx);
        idx
    }

    /// Links `child` under `parent`, appending it to the parent's children.
    #[instrument(level = "trace", skip(self))]
    pub fn link(&mut self, parent: Index, child: Index) {
        if !self.arena.contains(parent) {
            return;
        }
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(parent);
        } else {
            return;
        }
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn set_root(&mut self, idx: Index) {
        self.root = Some(idx);
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Node at the given input ordinal, as reported by renderers.
    pub fn node_at(&self, ordinal: usize) -> Option<Index> {
        self.order.get(ordinal).copied()
    }

    /// Input ordinal of a node.
    pub fn ordinal_of(&self, idx: Index) -> Option<usize> {
        self.order.iter().position(|&i| i == idx)
    }

    pub fn find_by_name(&self, name: &str) -> Option<Index> {
        self.order
            .iter()
            .copied()
            .find(|&idx| self.arena.get(idx).is_some_and(|n| n.name == name))
    }

    /// Preorder traversal from the root, children left to right.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Nodes in input order with their ordinals.
    pub fn iter_ordered(&self) -> impl Iterator<Item = (usize, Index, &TreeNode)> + '_ {
        self.order
            .iter()
            .enumerate()
            .filter_map(move |(ordinal, &idx)| self.arena.get(idx).map(|n| (ordinal, idx, n)))
    }

    /// Number of levels in the tree (a lone root has depth 1).
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Names of all leaf nodes, left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.name.clone())
            .collect()
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
