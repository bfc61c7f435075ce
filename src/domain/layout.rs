//! Radial ("sundial") layout.
//!
//! Each level of the tree is a ring. A node's children split the node's
//! angular span in proportion to their weights, and their own children split
//! that slice again one ring further out. Ring `d` occupies
//! `[R·d/(d+1) + margin, R·(d+1)/(d+2) − margin]`, so rings get thinner
//! towards the edge and never reach `R`.

use std::collections::BTreeSet;
use std::f64::consts::{PI, TAU};

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::domain::arena::{ArgumentNode, ArgumentTree};
use crate::domain::entities::Sentiment;
use crate::domain::error::LayoutError;

/// Angular tolerance used to decide whether a span is the full turn.
const FULL_TURN_EPSILON: f64 = 1e-9;

/// How only-children covering the whole circle are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Every arc is an annular sector.
    #[default]
    Split,
    /// An only child spanning the full turn becomes a closed ring.
    SingleSliceRing,
}

/// What to do with sibling sets whose weights cannot be partitioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightPolicy {
    /// Give every sibling the same share.
    #[default]
    EqualSplit,
    /// Keep the raw proportions, NaN and all.
    Propagate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Radius of the whole chart
    pub max_radius: f64,
    /// Gap kept on each side of a ring
    pub margin: f64,
    pub render_mode: RenderMode,
    pub weight_policy: WeightPolicy,
    /// Deepest ring to emit, counted from the focused node's children (0)
    pub max_depth: Option<usize>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_radius: 290.0,
            margin: 5.0,
            render_mode: RenderMode::Split,
            weight_policy: WeightPolicy::EqualSplit,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcShape {
    Sector,
    Ring,
}

/// One child argument placed on the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arc {
    pub node_id: String,
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub depth: usize,
    pub text: String,
    pub weight: f64,
    pub sentiment: Sentiment,
    pub has_children: bool,
    pub shape: ArcShape,
}

impl Arc {
    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Whether the polar point lies inside this arc.
    pub fn contains(&self, radius: f64, angle: f64) -> bool {
        if radius < self.inner_radius || radius > self.outer_radius {
            return false;
        }
        if self.shape == ArcShape::Ring {
            return true;
        }
        let angle = angle.rem_euclid(TAU);
        self.start_angle <= angle && angle < self.end_angle
    }
}

/// Non-fatal layout problems.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutWarning {
    #[error("children of {parent_id} have a total weight of {sum}")]
    ZeroWeightSum { parent_id: String, sum: f64 },

    #[error("argument {node_id} has unusable weight {weight}")]
    InvalidWeight { node_id: String, weight: f64 },

    #[error("ring {depth} has no room left inside the margins")]
    RingCollapsed { depth: usize },
}

#[derive(Debug, Clone, Default)]
pub struct LayoutOutput {
    pub arcs: Vec<Arc>,
    pub warnings: Vec<LayoutWarning>,
}

impl LayoutOutput {
    /// Arc under a polar point, deepest first.
    pub fn arc_at(&self, radius: f64, angle: f64) -> Option<&Arc> {
        self.arcs
            .iter()
            .filter(|arc| arc.contains(radius, angle))
            .max_by_key(|arc| arc.depth)
    }

    /// Arcs of the immediate children of the laid-out node.
    pub fn top_level(&self) -> impl Iterator<Item = &Arc> {
        let top = self.arcs.iter().map(|a| a.depth).min();
        self.arcs.iter().filter(move |a| Some(a.depth) == top)
    }
}

/// Radial band `(inner, outer)` of ring `depth`, before collapse clamping.
pub fn ring_radii(max_radius: f64, margin: f64, depth: usize) -> (f64, f64) {
    let d = depth as f64;
    let inner = max_radius * d / (d + 1.0) + margin;
    let outer = max_radius * (d + 1.0) / (d + 2.0) - margin;
    (inner, outer)
}

pub struct RadialLayout {
    config: LayoutConfig,
}

impl RadialLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out the subtree of `node` over the full circle, starting at ring 0.
    pub fn layout_focus(&self, tree: &ArgumentTree, node: Index) -> Result<LayoutOutput, LayoutError> {
        self.layout(tree, node, 0.0, TAU, 0)
    }

    /// Arcs for every descendant of `node` within `[start, end)`.
    ///
    /// The node's children sit on ring `depth`; grandchildren one ring out.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn layout(
        &self,
        tree: &ArgumentTree,
        node: Index,
        start: f64,
        end: f64,
        depth: usize,
    ) -> Result<LayoutOutput, LayoutError> {
        if !(start.is_finite() && end.is_finite() && end > start) {
            return Err(LayoutError::EmptySpan { start, end });
        }
        let LayoutConfig {
            max_radius, margin, ..
        } = self.config;
        if !(max_radius.is_finite() && max_radius > 0.0 && margin.is_finite() && margin >= 0.0) {
            return Err(LayoutError::InvalidRadius { max_radius, margin });
        }
        let node = tree.get_node(node).ok_or(LayoutError::StaleNode)?;

        let mut pass = LayoutPass {
            config: &self.config,
            tree,
            output: LayoutOutput::default(),
            collapsed: BTreeSet::new(),
        };
        pass.place_subtree(node, start, end, depth);
        debug!(
            "layout of {}: {} arcs, {} warnings",
            node.id(),
            pass.output.arcs.len(),
            pass.output.warnings.len()
        );
        Ok(pass.output)
    }
}

struct LayoutPass<'a> {
    config: &'a LayoutConfig,
    tree: &'a ArgumentTree,
    output: LayoutOutput,
    collapsed: BTreeSet<usize>,
}

/// A child waiting to be drawn, with the slice already assigned to it.
struct Placement<'a> {
    node: &'a ArgumentNode,
    start: f64,
    end: f64,
    depth: usize,
    shape: ArcShape,
}

impl<'a> LayoutPass<'a> {
    /// Emits arcs depth first from an explicit work stack, one frame per pending child.
    fn place_subtree(&mut self, node: &'a ArgumentNode, start: f64, end: f64, depth: usize) {
        let mut stack: Vec<Placement<'a>> = Vec::new();
        self.split_children(node, start, end, depth, &mut stack);

        while let Some(placed) = stack.pop() {
            let child = placed.node;
            let (inner, outer) = self.ring(placed.depth);
            self.output.arcs.push(Arc {
                node_id: child.data.id.clone(),
                start_angle: placed.start,
                end_angle: placed.end,
                inner_radius: inner,
                outer_radius: outer,
                depth: placed.depth,
                text: child.data.text.clone(),
                weight: child.data.weight,
                sentiment: child.data.sentiment,
                has_children: child.has_children(),
                shape: placed.shape,
            });

            if child.has_children() {
                self.split_children(child, placed.start, placed.end, placed.depth + 1, &mut stack);
            }
        }
    }

    /// Divide `[start, end)` among the children of `node` and queue them so
    /// they pop in drawing order.
    fn split_children(
        &mut self,
        node: &'a ArgumentNode,
        start: f64,
        end: f64,
        depth: usize,
        stack: &mut Vec<Placement<'a>>,
    ) {
        if self.config.max_depth.is_some_and(|max| depth > max) {
            return;
        }
        let tree = self.tree;
        let mut children: Vec<&'a ArgumentNode> = node
            .children
            .iter()
            .filter_map(|&idx| tree.get_node(idx))
            .collect();
        if children.is_empty() {
            return;
        }
        // stable: equal sentiments keep input order
        children.sort_by_key(|child| child.data.sentiment.value());

        let shares = self.shares(node, &children);
        let span = end - start;
        let whole_turn = (span - TAU).abs() < FULL_TURN_EPSILON;
        let last = children.len() - 1;
        let shape = match self.config.render_mode {
            RenderMode::SingleSliceRing if last == 0 && whole_turn => ArcShape::Ring,
            _ => ArcShape::Sector,
        };

        let mut current = start;
        let mut placements = Vec::with_capacity(children.len());
        for (i, (child, share)) in children.into_iter().zip(shares).enumerate() {
            let mut child_end = current + share * span;
            if i == last && child_end.is_finite() {
                child_end = end;
            }
            placements.push(Placement {
                node: child,
                start: current,
                end: child_end,
                depth,
                shape,
            });
            current = child_end;
        }
        stack.extend(placements.into_iter().rev());
    }

    /// Fraction of the parent span given to each child.
    fn shares(&mut self, parent: &ArgumentNode, children: &[&ArgumentNode]) -> Vec<f64> {
        let mut degenerate = false;
        for child in children {
            let w = child.data.weight;
            if !w.is_finite() || w < 0.0 {
                degenerate = true;
                self.warn(LayoutWarning::InvalidWeight {
                    node_id: child.data.id.clone(),
                    weight: w,
                });
            }
        }

        let sum: f64 = children.iter().map(|c| c.data.weight).sum();
        if !degenerate && sum <= 0.0 {
            degenerate = true;
            self.warn(LayoutWarning::ZeroWeightSum {
                parent_id: parent.data.id.clone(),
                sum,
            });
        }

        if degenerate && self.config.weight_policy == WeightPolicy::EqualSplit {
            let n = children.len() as f64;
            return vec![1.0 / n; children.len()];
        }
        children.iter().map(|c| c.data.weight / sum).collect()
    }

    fn ring(&mut self, depth: usize) -> (f64, f64) {
        let (inner, outer) = ring_radii(self.config.max_radius, self.config.margin, depth);
        if outer >= inner {
            return (inner, outer);
        }
        if self.collapsed.insert(depth) {
            self.warn(LayoutWarning::RingCollapsed { depth });
        }
        (inner, inner)
    }

    fn warn(&mut self, warning: LayoutWarning) {
        warn!("{}", warning);
        self.output.warnings.push(warning);
    }
}

/// Whether `span` needs the large-arc flag when drawn as an SVG arc.
pub fn is_large_arc(span: f64) -> bool {
    span > PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arena::NodeData;

    fn node(tree: &mut ArgumentTree, id: &str, weight: f64, sentiment: i64) -> Index {
        tree.insert_node(NodeData {
            id: id.to_string(),
            text: id.to_string(),
            weight,
            sentiment: Sentiment::from_value(sentiment),
        })
        .0
    }

    #[test]
    fn given_leaf_focus_when_layout_then_no_arcs() {
        let mut tree = ArgumentTree::new();
        let root = node(&mut tree, "root", 1.0, 0);
        tree.set_root(root);

        let out = RadialLayout::new(LayoutConfig::default())
            .layout_focus(&tree, root)
            .unwrap();
        assert!(out.arcs.is_empty());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn given_reversed_span_when_layout_then_errors() {
        let mut tree = ArgumentTree::new();
        let root = node(&mut tree, "root", 1.0, 0);

        let err = RadialLayout::new(LayoutConfig::default())
            .layout(&tree, root, 1.0, 1.0, 0)
            .unwrap_err();
        assert_eq!(err, LayoutError::EmptySpan { start: 1.0, end: 1.0 });
    }

    #[test]
    fn given_only_child_in_ring_mode_when_layout_then_emits_ring() {
        let mut tree = ArgumentTree::new();
        let root = node(&mut tree, "root", 1.0, 0);
        let only = node(&mut tree, "only", 2.0, 1);
        let grandchild = node(&mut tree, "grand", 2.0, 1);
        tree.set_root(root);
        tree.attach(root, only);
        tree.attach(only, grandchild);

        let config = LayoutConfig {
            render_mode: RenderMode::SingleSliceRing,
            ..LayoutConfig::default()
        };
        let out = RadialLayout::new(config).layout_focus(&tree, root).unwrap();

        assert_eq!(out.arcs.len(), 2);
        assert!(out.arcs.iter().all(|a| a.shape == ArcShape::Ring));
        assert!(out.arc_at(out.arcs[1].inner_radius + 1.0, 4.0).is_some());
    }

    #[test]
    fn given_max_depth_when_layout_then_stops_recursing() {
        let mut tree = ArgumentTree::new();
        let root = node(&mut tree, "root", 1.0, 0);
        let a = node(&mut tree, "a", 1.0, 1);
        let b = node(&mut tree, "b", 1.0, 1);
        tree.attach(root, a);
        tree.attach(a, b);

        let config = LayoutConfig {
            max_depth: Some(0),
            ..LayoutConfig::default()
        };
        let out = RadialLayout::new(config).layout_focus(&tree, root).unwrap();
        assert_eq!(out.arcs.len(), 1);
        assert_eq!(out.arcs[0].node_id, "a");
    }
}
