//! Renderer keeping the latest state for text front ends.

use crate::domain::{ArgumentNode, ArgumentTree, LayoutOutput, NodeData};
use crate::infrastructure::traits::Renderer;

/// Holds what the last events said, for printing after each navigation.
#[derive(Debug, Default, Clone)]
pub struct SnapshotRenderer {
    /// Root of the loaded hierarchy
    pub root: Option<NodeData>,
    /// Focused argument
    pub current: Option<NodeData>,
    /// Whether the back affordance is visible
    pub can_go_back: bool,
    pub layout: LayoutOutput,
    /// Number of layouts received
    pub renders: usize,
}

impl Renderer for SnapshotRenderer {
    fn on_hierarchy_ready(&mut self, tree: &ArgumentTree) {
        self.root = tree.root_node().map(|n| n.data.clone());
    }

    fn on_layout_computed(&mut self, layout: &LayoutOutput) {
        self.layout = layout.clone();
        self.renders += 1;
    }

    fn on_navigation_changed(&mut self, current: &ArgumentNode, can_go_back: bool) {
        self.current = Some(current.data.clone());
        self.can_go_back = can_go_back;
    }
}
