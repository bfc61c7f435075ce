//! Drill-down navigation over an argument tree.
//!
//! The state holds arena handles only; the tree itself is owned elsewhere.
//! Handles become stale when a new tree is loaded, which is why every load
//! resets the state.

use generational_arena::Index;
use tracing::debug;

/// Focused node plus the stack of nodes focused before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    current: Index,
    history: Vec<Index>,
}

impl NavigationState {
    pub fn new(root: Index) -> Self {
        Self {
            current: root,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> Index {
        self.current
    }

    /// Number of drill-downs that can be undone.
    pub fn depth(&self) -> usize {
        self.history.len()
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn is_at_root(&self) -> bool {
        self.history.is_empty()
    }

    /// Drill into `node`, remembering the current focus.
    pub fn focus(&mut self, node: Index) {
        debug!("focus: {:?} -> {:?}", self.current, node);
        self.history.push(self.current);
        self.current = node;
    }

    /// Return to the previous focus. Returns false when there is nothing to go back to.
    pub fn go_back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                debug!("back: {:?} -> {:?}", self.current, previous);
                self.current = previous;
                true
            }
            None => {
                debug!("back: nothing to go back to");
                false
            }
        }
    }

    pub fn reset(&mut self, new_root: Index) {
        self.history.clear();
        self.current = new_root;
    }
}
