//! Tree builder resolving parent-name references into a linked lineage tree.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::domain::arena::{TreeArena, TreeNode};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::record::NodeRecord;

/// Constructs a lineage tree from flat `{name, parent}` records.
///
/// The build either yields a fully linked tree or fails; a partially
/// linked arena never escapes.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    name_index: HashMap<String, usize>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree whose children keep the input order of the records.
    #[instrument(level = "debug", skip(self, records), fields(records = records.len()))]
    pub fn build(&mut self, records: &[NodeRecord]) -> DomainResult<TreeArena> {
        self.name_index.clear();
        for (ordinal, record) in records.iter().enumerate() {
            if self.name_index.insert(record.name.clone(), ordinal).is_some() {
                return Err(DomainError::DuplicateName(record.name.clone()));
            }
        }

        let roots: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_root())
            .map(|(ordinal, _)| ordinal)
            .collect();
        let root_ordinal = match roots.as_slice() {
            [single] => *single,
            _ => {
                return Err(DomainError::Structure {
                    roots: roots.iter().map(|&o| records[o].name.clone()).collect(),
                })
            }
        };

        // Resolve every parent before touching the arena
        let mut parents = Vec::with_capacity(records.len());
        for record in records {
            if record.is_root() {
                parents.push(None);
                continue;
            }
            let parent = self.name_index.get(&record.parent_name).copied().ok_or_else(|| {
                DomainError::DanglingReference {
                    name: record.name.clone(),
                    parent: record.parent_name.clone(),
                }
            })?;
            parents.push(Some(parent));
        }

        let mut tree = TreeArena::new();
        let indices: Vec<_> = records
            .iter()
            .map(|r| tree.insert_node(TreeNode::new(&r.name, &r.parent_name, r.data_available)))
            .collect();
        tree.set_root(indices[root_ordinal]);
        for (ordinal, parent) in parents.iter().enumerate() {
            if let Some(parent) = parent {
                tree.link(indices[*parent], indices[ordinal]);
            }
        }

        // Every non-root record has a parent, so anything the root cannot
        // reach sits on a parent cycle.
        let reachable = tree.iter().count();
        if reachable != records.len() {
            let mut seen = vec![false; records.len()];
            for (idx, _) in tree.iter() {
                if let Some(ordinal) = indices.iter().position(|&i| i == idx) {
                    seen[ordinal] = true;
                }
            }
            let stray = seen
                .iter()
                .position(|s| !s)
                .map(|o| records[o].name.clone())
                .unwrap_or_default();
            return Err(DomainError::Cycle(stray));
        }

        debug!(
            "built tree: {} nodes, depth {}",
            tree.len(),
            tree.depth()
        );
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, parent: &str) -> NodeRecord {
        NodeRecord::new(name, parent, false)
    }

    #[test]
    fn given_records_out_of_order_when_building_then_links_children_in_input_order() {
        let records = vec![
            rec("Clavichord", "Monochord"),
            rec("Monochord", "root"),
            rec("Harpsichord", "Monochord"),
        ];
        let tree = TreeBuilder::new().build(&records).unwrap();
        let root = tree.get_node(tree.root().unwrap()).unwrap();
        assert_eq!(root.name, "Monochord");
        let children: Vec<_> = root
            .children
            .iter()
            .map(|&c| tree.get_node(c).unwrap().name.as_str())
            .collect();
        assert_eq!(children, vec!["Clavichord", "Harpsichord"]);
    }

    #[test]
    fn given_parent_cycle_when_building_then_errors() {
        let records = vec![rec("Monochord", "root"), rec("A", "B"), rec("B", "A")];
        let err = TreeBuilder::new().build(&records).unwrap_err();
        assert_eq!(err, DomainError::Cycle("A".to_string()));
    }

    #[test]
    fn given_self_parent_when_building_then_errors() {
        let records = vec![rec("Monochord", "root"), rec("Loop", "Loop")];
        assert!(matches!(
            TreeBuilder::new().build(&records),
            Err(DomainError::Cycle(name)) if name == "Loop"
        ));
    }
}
