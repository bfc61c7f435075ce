use std::collections::{HashMap, HashSet};
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{ArgumentRecord, Sentiment};

/// Data payload for tree nodes representing one argument.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub id: String,
    pub text: String,
    pub weight: f64,
    pub sentiment: Sentiment,
}

impl From<&ArgumentRecord> for NodeData {
    fn from(record: &ArgumentRecord) -> Self {
        Self {
            id: record.id.clone(),
            text: record.text.clone(),
            weight: record.weight,
            sentiment: record.sentiment,
        }
    }
}

impl NodeData {
    /// Hover-style one-line description.
    pub fn summary(&self) -> String {
        format!("Text: {} | Weight: {}", self.text, self.weight)
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({}, {})", self.id, self.text, self.sentiment, self.weight)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct ArgumentNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root and for orphans
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in input order
    pub children: Vec<Index>,
}

impl ArgumentNode {
    pub fn id(&self) -> &str {
        &self.data.id
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Arena-based argument tree.
///
/// Every parsed argument lives in the arena and in the id map, including
/// orphans that are not reachable from the root.
#[derive(Debug)]
pub struct ArgumentTree {
    arena: Arena<ArgumentNode>,
    ids: HashMap<String, Index>,
    root: Option<Index>,
}

impl Default for ArgumentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ArgumentTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            ids: HashMap::new(),
            root: None,
        }
    }

    /// Insert a node, replacing the id map entry of any previous node with the same id.
    ///
    /// Returns the new index and the index previously mapped to the id, if any.
    #[instrument(level = "trace", skip(self), fields(id = %data.id))]
    pub fn insert_node(&mut self, data: NodeData) -> (Index, Option<Index>) {
        let id = data.id.clone();
        let idx = self.arena.insert(ArgumentNode {
            data,
            parent: None,
            children: Vec::new(),
        });
        let previous = self.ids.insert(id, idx);
        (idx, previous)
    }

    /// Remove a node that was never linked into the tree.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn discard_node(&mut self, idx: Index) -> Option<ArgumentNode> {
        self.arena.remove(idx)
    }

    /// Append `child` to the children of `parent`.
    #[instrument(level = "trace", skip(self))]
    pub fn attach(&mut self, parent: Index, child: Index) -> bool {
        if !self.arena.contains(child) {
            return false;
        }
        match self.arena.get_mut(parent) {
            Some(node) => node.children.push(child),
            None => return false,
        }
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(parent);
        }
        true
    }

    pub fn set_root(&mut self, idx: Index) {
        self.root = Some(idx);
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&ArgumentNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn root_node(&self) -> Option<&ArgumentNode> {
        self.root.and_then(|idx| self.get_node(idx))
    }

    /// Look up a node by argument id.
    pub fn find(&self, id: &str) -> Option<Index> {
        self.ids.get(id).copied()
    }

    /// Number of distinct ids, reachable or not.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of nodes reachable from the root, root included.
    pub fn reachable_count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_reachable(&self, idx: Index) -> bool {
        self.iter().any(|(i, _)| i == idx)
    }

    /// Ancestors of `idx`, nearest first, root last.
    pub fn path_to_root(&self, idx: Index) -> Vec<Index> {
        let mut path = Vec::new();
        let mut seen = HashSet::from([idx]);
        let mut current = self.get_node(idx).and_then(|n| n.parent);
        while let Some(p) = current {
            if !seen.insert(p) {
                break;
            }
            path.push(p);
            current = self.get_node(p).and_then(|n| n.parent);
        }
        path
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self, self.root)
    }

    /// Pre-order traversal of the subtree below `idx`, `idx` included.
    pub fn iter_from(&self, idx: Index) -> TreeIterator {
        TreeIterator::new(self, Some(idx))
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator {
        PostOrderIterator::new(self)
    }

    /// Number of levels below and including the root, 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut depths: HashMap<Index, usize> = HashMap::new();
        for (idx, node) in self.iter_postorder() {
            let below = node
                .children
                .iter()
                .filter_map(|c| depths.get(c))
                .max()
                .copied()
                .unwrap_or(0);
            depths.insert(idx, below + 1);
        }
        self.root.and_then(|r| depths.get(&r).copied()).unwrap_or(0)
    }

    /// Ids of all reachable arguments without children.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.data.id.clone())
            .collect()
    }
}

/// Pre-order iterator; each reachable node is visited once.
pub struct TreeIterator<'a> {
    tree: &'a ArgumentTree,
    stack: Vec<Index>,
    visited: HashSet<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a ArgumentTree, start: Option<Index>) -> Self {
        Self {
            tree,
            stack: start.into_iter().collect(),
            visited: HashSet::new(),
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a ArgumentNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if !self.visited.insert(current_idx) {
                continue;
            }
            if let Some(node) = self.tree.get_node(current_idx) {
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

pub struct PostOrderIterator<'a> {
    tree: &'a ArgumentTree,
    stack: Vec<(Index, bool)>,
    visited: HashSet<Index>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a ArgumentTree) -> Self {
        Self {
            tree,
            stack: tree.root().map(|r| (r, false)).into_iter().collect(),
            visited: HashSet::new(),
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a ArgumentNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, expanded)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if !expanded {
                    if !self.visited.insert(current_idx) {
                        continue;
                    }
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
