//! SVG output for sundial charts.

use serde::{Deserialize, Serialize};

use crate::domain::layout::{is_large_arc, Arc, ArcShape};
use crate::domain::{ArgumentNode, ArgumentTree, LayoutOutput};
use crate::infrastructure::traits::Renderer;

/// Colors and spacing of the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgStyle {
    /// Space between the outermost possible ring and the image border
    pub padding: f64,
    pub stroke: String,
    /// `r, g, b` of supporting arguments
    pub supporting_rgb: [u8; 3],
    /// `r, g, b` of opposing arguments
    pub opposing_rgb: [u8; 3],
    /// Weight at which an arc becomes fully transparent
    pub max_weight: f64,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            padding: 10.0,
            stroke: "white".to_string(),
            supporting_rgb: [0, 128, 0],
            opposing_rgb: [255, 0, 0],
            max_weight: 10.0,
        }
    }
}

impl SvgStyle {
    /// `rgba(...)` fill of an arc; heavier arguments are more transparent.
    pub fn fill(&self, arc: &Arc) -> String {
        let [r, g, b] = if arc.sentiment.is_supporting() {
            self.supporting_rgb
        } else {
            self.opposing_rgb
        };
        let alpha = 1.0 - arc.weight / self.max_weight;
        let alpha = if alpha.is_finite() { alpha.clamp(0.0, 1.0) } else { 1.0 };
        format!("rgba({}, {}, {}, {})", r, g, b, fmt_num(alpha))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

pub fn polar_to_cartesian(cx: f64, cy: f64, radius: f64, angle: f64) -> Point {
    Point {
        x: cx + radius * angle.cos(),
        y: cy + radius * angle.sin(),
    }
}

/// Path of an annular sector between two radii and two angles.
pub fn describe_arc(cx: f64, cy: f64, inner: f64, outer: f64, start: f64, end: f64) -> String {
    let outer_start = polar_to_cartesian(cx, cy, outer, end);
    let outer_end = polar_to_cartesian(cx, cy, outer, start);
    let inner_start = polar_to_cartesian(cx, cy, inner, end);
    let inner_end = polar_to_cartesian(cx, cy, inner, start);
    let large_arc = if is_large_arc(end - start) { 1 } else { 0 };

    format!(
        "M {} {} A {} {} 0 {} 0 {} {} L {} {} A {} {} 0 {} 1 {} {} Z",
        fmt_num(outer_start.x),
        fmt_num(outer_start.y),
        fmt_num(outer),
        fmt_num(outer),
        large_arc,
        fmt_num(outer_end.x),
        fmt_num(outer_end.y),
        fmt_num(inner_end.x),
        fmt_num(inner_end.y),
        fmt_num(inner),
        fmt_num(inner),
        large_arc,
        fmt_num(inner_start.x),
        fmt_num(inner_start.y),
    )
}

/// Path of a full annulus; draw with `fill-rule="evenodd"`.
pub fn describe_ring(cx: f64, cy: f64, inner: f64, outer: f64) -> String {
    let circle = |r: f64| {
        format!(
            "M {} {} A {} {} 0 1 0 {} {} A {} {} 0 1 0 {} {} Z",
            fmt_num(cx + r),
            fmt_num(cy),
            fmt_num(r),
            fmt_num(r),
            fmt_num(cx - r),
            fmt_num(cy),
            fmt_num(r),
            fmt_num(r),
            fmt_num(cx + r),
            fmt_num(cy),
        )
    };
    format!("{} {}", circle(outer), circle(inner))
}

/// Standalone SVG document for one layout.
pub fn render_document(layout: &LayoutOutput, caption: &str, max_radius: f64, style: &SvgStyle) -> String {
    let size = 2.0 * (max_radius + style.padding);
    let center = size / 2.0;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{0}\" height=\"{0}\" viewBox=\"0 0 {0} {0}\">\n",
        fmt_num(size)
    ));
    svg.push_str(&format!("  <title>{}</title>\n", escape(caption)));

    for arc in &layout.arcs {
        let d = match arc.shape {
            ArcShape::Ring => describe_ring(center, center, arc.inner_radius, arc.outer_radius),
            ArcShape::Sector => describe_arc(
                center,
                center,
                arc.inner_radius,
                arc.outer_radius,
                arc.start_angle,
                arc.end_angle,
            ),
        };
        svg.push_str(&format!(
            "  <path data-id=\"{}\" data-depth=\"{}\" d=\"{}\" fill=\"{}\" fill-rule=\"evenodd\" stroke=\"{}\"><title>Text: {} | Weight: {}</title></path>\n",
            escape(&arc.node_id),
            arc.depth,
            d,
            style.fill(arc),
            escape(&style.stroke),
            escape(&arc.text),
            arc.weight,
        ));
    }

    svg.push_str(&format!(
        "  <text x=\"{0}\" y=\"{0}\" text-anchor=\"middle\" dominant-baseline=\"middle\">{1}</text>\n",
        fmt_num(center),
        escape(caption)
    ));
    svg.push_str("</svg>\n");
    svg
}

fn fmt_num(v: f64) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renderer producing a fresh SVG document on every layout.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    style: SvgStyle,
    max_radius: f64,
    caption: String,
    document: Option<String>,
}

impl SvgRenderer {
    pub fn new(style: SvgStyle, max_radius: f64) -> Self {
        Self {
            style,
            max_radius,
            caption: String::new(),
            document: None,
        }
    }

    /// The latest document, None before the first layout.
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }
}

impl Renderer for SvgRenderer {
    fn on_hierarchy_ready(&mut self, _tree: &ArgumentTree) {
        self.document = None;
    }

    fn on_layout_computed(&mut self, layout: &LayoutOutput) {
        self.document = Some(render_document(layout, &self.caption, self.max_radius, &self.style));
    }

    fn on_navigation_changed(&mut self, current: &ArgumentNode, _can_go_back: bool) {
        self.caption = current.data.text.clone();
    }
}
