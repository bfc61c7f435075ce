//! Tests for HierarchyBuilder

use sundial::domain::parser::parse;
use sundial::domain::{ArgumentRecord, BuildWarning, HierarchyBuilder, HierarchyError, Sentiment};

fn record(id: &str, parent: &str) -> ArgumentRecord {
    ArgumentRecord::new(id, format!("Argument {id}"), 1.0, Sentiment::Supporting).with_parent(parent)
}

fn child_ids(tree: &sundial::domain::ArgumentTree, id: &str) -> Vec<String> {
    let node = tree.get_node(tree.find(id).unwrap()).unwrap();
    node.children
        .iter()
        .map(|&c| tree.get_node(c).unwrap().id().to_string())
        .collect()
}

#[test]
fn given_debate_table_when_building_then_links_children_in_input_order() {
    // Arrange
    let records = parse(include_str!("resources/arguments/debate.csv")).unwrap().records;

    // Act
    let output = HierarchyBuilder::new().build(&records).unwrap();

    // Assert
    let tree = &output.tree;
    assert_eq!(tree.root_node().unwrap().id(), "1");
    assert_eq!(child_ids(tree, "1"), vec!["2", "3"]);
    assert_eq!(child_ids(tree, "3"), vec!["5", "6"]);
    assert_eq!(tree.len(), 6);
    assert_eq!(tree.reachable_count(), 6);
    assert_eq!(tree.depth(), 3);
    assert!(output.warnings.is_empty());
}

#[test]
fn given_orphans_when_building_then_warns_and_keeps_them_detached() {
    let records = parse(include_str!("resources/arguments/orphans.csv")).unwrap().records;

    let output = HierarchyBuilder::new().build(&records).unwrap();

    assert_eq!(
        output.warnings,
        vec![
            BuildWarning::UnresolvedParent {
                id: "7".into(),
                parent_id: "99".into(),
                line: 4
            },
            BuildWarning::Unreachable { id: "7".into() },
            BuildWarning::Unreachable { id: "8".into() },
        ]
    );
    assert_eq!(output.tree.len(), 4);
    assert_eq!(output.tree.reachable_count(), 2);
    assert!(!output.tree.is_reachable(output.tree.find("8").unwrap()));
}

#[test]
fn given_root_with_parent_column_when_building_then_root_stays_root() {
    let records = vec![record("1", "2"), record("2", "1")];

    let output = HierarchyBuilder::new().build(&records).unwrap();

    assert_eq!(output.tree.root_node().unwrap().id(), "1");
    assert_eq!(child_ids(&output.tree, "1"), vec!["2"]);
    assert!(output.tree.root_node().unwrap().parent.is_none());
}

#[test]
fn given_duplicate_id_when_building_then_last_one_wins() {
    let mut second = record("2", "1");
    second.text = "Replacement".into();
    second.line = 4;
    let records = vec![record("1", ""), record("2", "1"), second];

    let output = HierarchyBuilder::new().build(&records).unwrap();

    assert_eq!(output.tree.len(), 2);
    assert_eq!(child_ids(&output.tree, "1"), vec!["2"]);
    let node = output.tree.get_node(output.tree.find("2").unwrap()).unwrap();
    assert_eq!(node.data.text, "Replacement");
    assert_eq!(
        output.warnings,
        vec![BuildWarning::DuplicateId {
            id: "2".into(),
            line: 4
        }]
    );
}

#[test]
fn given_strict_builder_when_parent_unknown_then_fails() {
    let records = vec![record("1", ""), record("2", "42")];

    let result = HierarchyBuilder::strict(true).build(&records);

    assert!(matches!(
        result,
        Err(HierarchyError::UnresolvedParent { ref id, ref parent_id }) if id == "2" && parent_id == "42"
    ));
}

#[test]
fn given_strict_builder_when_id_repeats_then_fails() {
    let records = vec![record("1", ""), record("1", "")];

    let result = HierarchyBuilder::strict(true).build(&records);

    assert!(matches!(result, Err(HierarchyError::DuplicateId { .. })));
}

#[test]
fn given_no_records_when_building_then_root_not_found() {
    let result = HierarchyBuilder::new().build(&[]);
    assert!(matches!(result, Err(HierarchyError::RootNotFound)));
}

#[test]
fn given_parent_cycle_outside_root_when_building_then_terminates() {
    let records = vec![record("1", ""), record("2", "3"), record("3", "2")];

    let output = HierarchyBuilder::new().build(&records).unwrap();

    assert_eq!(output.tree.reachable_count(), 1);
    assert_eq!(output.tree.iter().count(), 1);
    assert_eq!(
        output.warnings,
        vec![
            BuildWarning::Unreachable { id: "2".into() },
            BuildWarning::Unreachable { id: "3".into() },
        ]
    );
}
