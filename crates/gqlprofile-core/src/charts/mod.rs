//! Hand-drawn SVG charts.
//!
//! Each chart module splits into pure data shaping (tested directly) and a
//! `render_*` function that appends one `<svg>` to a container. Renderers
//! never fail: empty or all-zero input appends a placeholder paragraph.
//!
//! - `xp`: cumulative XP over time
//! - `projects`: grades of the most recent graded projects
//! - `xp_by_project`: top projects by summed XP
//! - `audit`: audits done vs received with the ratio tier

pub mod audit;
pub mod projects;
pub mod xp;
pub mod xp_by_project;

pub use audit::{render_audit_chart, AuditData, AuditTier};
pub use projects::render_project_chart;
pub use xp::render_xp_chart;
pub use xp_by_project::render_xp_by_project_chart;

use crate::utils::format_coord;
use crate::view::Element;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

pub(crate) const TEXT_COLOR: &str = "#e6eef8";
pub(crate) const MUTED_COLOR: &str = "#9ca3af";
pub(crate) const GRID_COLOR: &str = "#1f2937";
pub(crate) const TRACK_COLOR: &str = "#1a2332";

/// Number of horizontal grid intervals on value axes
pub(crate) const GRID_STEPS: usize = 5;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Outer size and padding of a chart; plotting happens inside the padding
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
}

impl Frame {
    pub fn inner_width(&self) -> f64 {
        self.width - self.padding.left - self.padding.right
    }

    pub fn inner_height(&self) -> f64 {
        self.height - self.padding.top - self.padding.bottom
    }

    /// `<svg>` root sized to the frame
    pub fn svg(&self) -> Element {
        Element::new("svg")
            .attr("xmlns", SVG_NS)
            .attr("class", "chart-svg")
            .attr("width", format_coord(self.width))
            .attr("height", format_coord(self.height))
            .attr(
                "viewBox",
                format!("0 0 {} {}", format_coord(self.width), format_coord(self.height)),
            )
    }

    /// Plot group translated by the padding
    pub fn plot(&self) -> Element {
        Element::new("g").attr(
            "transform",
            format!(
                "translate({}, {})",
                format_coord(self.padding.left),
                format_coord(self.padding.top)
            ),
        )
    }
}

/// Linear map from `[0, max]` to `[0, span]`, `max` floored at 1
pub(crate) fn scale(value: f64, max: f64, span: f64) -> f64 {
    value / max.max(1.0) * span
}

pub(crate) fn placeholder(container: &mut Element, message: &str) {
    container.push(Element::new("p").attr("class", "muted").text(message));
}

pub(crate) fn title(x: f64, text: &str) -> Element {
    Element::new("text")
        .attr("x", format_coord(x))
        .attr("y", -20)
        .attr("text-anchor", "middle")
        .attr("fill", TEXT_COLOR)
        .attr("font-size", 16)
        .attr("font-weight", "bold")
        .text(text)
}

pub(crate) fn label(x: f64, y: f64, anchor: &str, text: impl Into<String>) -> Element {
    Element::new("text")
        .attr("x", format_coord(x))
        .attr("y", format_coord(y))
        .attr("text-anchor", anchor)
        .attr("fill", MUTED_COLOR)
        .attr("font-size", 10)
        .text(text)
}

/// Label rotated 45 degrees counter-clockwise around its anchor point
pub(crate) fn slanted_label(x: f64, y: f64, text: impl Into<String>) -> Element {
    Element::new("text")
        .attr("x", format_coord(x))
        .attr("y", format_coord(y))
        .attr(
            "transform",
            format!("rotate(-45, {}, {})", format_coord(x), format_coord(y)),
        )
        .attr("text-anchor", "end")
        .attr("fill", MUTED_COLOR)
        .attr("font-size", 11)
        .text(text)
}

/// Dashed horizontal grid lines with value labels on the left.
/// `format` receives the value at each line, top (max) first.
pub(crate) fn value_grid(
    group: &mut Element,
    width: f64,
    height: f64,
    max: f64,
    format: impl Fn(f64) -> String,
) {
    for i in 0..=GRID_STEPS {
        let y = height / GRID_STEPS as f64 * i as f64;
        let value = max - max / GRID_STEPS as f64 * i as f64;
        group.push(
            Element::new("line")
                .attr("x1", 0)
                .attr("y1", format_coord(y))
                .attr("x2", format_coord(width))
                .attr("y2", format_coord(y))
                .attr("stroke", GRID_COLOR)
                .attr("stroke-dasharray", 4),
        );
        group.push(label(-10.0, y + 4.0, "end", format(value)));
    }
}

pub(crate) fn hsl(hue: f64) -> String {
    format!("hsl({}, 70%, 50%)", format_coord(hue))
}
