//! Tests for TreeBuilder

use rstest::rstest;

use pianoviz::domain::{DomainError, NodeRecord, TreeArena, TreeBuilder};

fn records(pairs: &[(&str, &str)]) -> Vec<NodeRecord> {
    pairs
        .iter()
        .map(|(name, parent)| NodeRecord::new(*name, *parent, true))
        .collect()
}

fn build(pairs: &[(&str, &str)]) -> Result<TreeArena, DomainError> {
    TreeBuilder::new().build(&records(pairs))
}

#[test]
fn given_well_formed_records_when_building_then_every_child_linked_exactly_once() {
    // Arrange
    let pairs = [
        ("Piano", "root"),
        ("Grand Piano", "Piano"),
        ("Upright", "Piano"),
        ("Modern upright piano", "Upright"),
        ("Electric Piano", "Piano"),
    ];

    // Act
    let tree = build(&pairs).unwrap();

    // Assert
    let root = tree.root().unwrap();
    assert_eq!(tree.len(), pairs.len());
    for (idx, node) in tree.iter() {
        if idx == root {
            assert!(node.parent.is_none());
            continue;
        }
        let parent = node.parent.expect("non-root has parent");
        let siblings = &tree.get_node(parent).unwrap().children;
        assert_eq!(siblings.iter().filter(|&&c| c == idx).count(), 1);
        assert_eq!(tree.get_node(parent).unwrap().name, node.parent_name);
    }
}

#[test]
fn given_children_listed_before_parent_when_building_then_order_follows_input() {
    let tree = build(&[("B", "R"), ("A", "R"), ("R", "root"), ("C", "R")]).unwrap();

    let root = tree.get_node(tree.root().unwrap()).unwrap();
    let names: Vec<_> = root
        .children
        .iter()
        .map(|&c| tree.get_node(c).unwrap().name.as_str())
        .collect();
    assert_eq!(names, vec!["B", "A", "C"]);
}

#[test]
fn given_unknown_parent_when_building_then_dangling_reference() {
    let err = build(&[("Piano", "root"), ("Harp", "Strings")]).unwrap_err();

    assert_eq!(
        err,
        DomainError::DanglingReference {
            name: "Harp".into(),
            parent: "Strings".into()
        }
    );
}

#[rstest]
#[case::no_root(&[("A", "B"), ("B", "A")], 0)]
#[case::two_roots(&[("A", "root"), ("B", "root")], 2)]
#[case::empty(&[], 0)]
fn given_wrong_root_count_when_building_then_structure_error(
    #[case] pairs: &[(&str, &str)],
    #[case] expected_roots: usize,
) {
    match build(pairs) {
        Err(DomainError::Structure { roots }) => assert_eq!(roots.len(), expected_roots),
        other => panic!("expected structure error, got {other:?}"),
    }
}

#[test]
fn given_duplicate_name_when_building_then_rejected() {
    let err = build(&[("Piano", "root"), ("Grand", "Piano"), ("Grand", "Piano")]).unwrap_err();

    assert_eq!(err, DomainError::DuplicateName("Grand".into()));
}

#[test]
fn given_detached_loop_when_building_then_cycle_error() {
    let err = build(&[("Piano", "root"), ("X", "Y"), ("Y", "X")]).unwrap_err();

    assert!(matches!(err, DomainError::Cycle(_)));
}

#[test]
fn given_data_flags_when_building_then_carried_onto_nodes() {
    let records = vec![
        NodeRecord::new("Piano", "root", false),
        NodeRecord::new("Grand Piano", "Piano", true),
    ];

    let tree = TreeBuilder::new().build(&records).unwrap();

    let flag = |name: &str| tree.get_node(tree.find_by_name(name).unwrap()).unwrap().data_available;
    assert!(!flag("Piano"));
    assert!(flag("Grand Piano"));
    assert_eq!(tree.leaf_nodes(), vec!["Grand Piano".to_string()]);
}
