//! Conversion of argument trees into printable `termtree` trees.

use std::collections::HashSet;

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::ArgumentTree;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for ArgumentTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        match self.root() {
            Some(root_idx) => subtree(self, root_idx),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

/// Printable tree of the arguments below `idx`.
///
/// Nodes are collected in pre-order with an explicit stack, then folded into
/// their parents from the back, so a child is complete before it is attached.
pub fn subtree(tree: &ArgumentTree, idx: Index) -> Tree<String> {
    let label = |i: Index| tree.get_node(i).map(|n| n.data.to_string());

    // (label, position of the parent in `order`)
    let mut order: Vec<(String, Option<usize>)> = Vec::new();
    let mut seen = HashSet::from([idx]);
    let mut stack = vec![(idx, None)];
    while let Some((node_idx, parent)) = stack.pop() {
        let Some(text) = label(node_idx) else {
            continue;
        };
        let position = order.len();
        order.push((text, parent));
        if let Some(node) = tree.get_node(node_idx) {
            for &child in node.children.iter().rev() {
                if seen.insert(child) {
                    stack.push((child, Some(position)));
                }
            }
        }
    }

    let mut built: Vec<Option<Tree<String>>> = order
        .iter()
        .map(|(text, _)| Some(Tree::new(text.clone())))
        .collect();
    for position in (1..order.len()).rev() {
        let Some(mut node) = built[position].take() else {
            continue;
        };
        // children were pushed last-first
        node.leaves.reverse();
        let Some(parent_position) = order[position].1 else {
            continue;
        };
        if let Some(parent) = built[parent_position].as_mut() {
            parent.push(node);
        }
    }

    match built.first_mut().and_then(Option::take) {
        Some(mut root) => {
            root.leaves.reverse();
            root
        }
        None => Tree::new("Empty tree".to_string()),
    }
}
