use chrono::{DateTime, Duration, Utc};

use crate::models::Transaction;
use crate::utils::{format_compact, format_coord, format_thousands};
use crate::view::Element;

use super::{label, placeholder, scale, value_grid, Frame, Padding};

/// Only the most recent points get markers
pub const XP_MARKER_LIMIT: usize = 20;

/// Intervals on the date axis
const DATE_STEPS: i32 = 4;

const LINE_COLOR: &str = "#10b981";
const AREA_COLOR: &str = "rgba(16, 185, 129, 0.1)";
const BACKGROUND: &str = "#0a0f1a";

const FRAME: Frame = Frame {
    width: 600.0,
    height: 300.0,
    padding: Padding {
        top: 40.0,
        right: 40.0,
        bottom: 60.0,
        left: 60.0,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct XpPoint {
    pub timestamp: DateTime<Utc>,
    /// Running total up to and including this transaction
    pub total: i64,
    pub project: String,
}

/// Running XP total over transactions sorted by time.
/// Transactions without a parseable timestamp cannot be placed and are skipped.
pub fn cumulative_series(transactions: &[Transaction]) -> Vec<XpPoint> {
    let mut dated: Vec<(DateTime<Utc>, &Transaction)> = transactions
        .iter()
        .filter_map(|tx| tx.timestamp().map(|ts| (ts, tx)))
        .collect();
    dated.sort_by_key(|(ts, _)| *ts);

    let mut total = 0;
    dated
        .into_iter()
        .map(|(timestamp, tx)| {
            total += tx.amount;
            XpPoint {
                timestamp,
                total,
                project: tx.title().to_string(),
            }
        })
        .collect()
}

/// Index of the first point that gets a marker
pub fn marker_start(len: usize) -> usize {
    len.saturating_sub(XP_MARKER_LIMIT)
}

/// Maps points into plot coordinates
struct XpScale {
    start: DateTime<Utc>,
    span_secs: f64,
    max_total: f64,
    width: f64,
    height: f64,
}

impl XpScale {
    fn new(points: &[XpPoint], width: f64, height: f64) -> Option<Self> {
        let first = points.first()?;
        let last = points.last()?;
        Some(Self {
            start: first.timestamp,
            span_secs: (last.timestamp - first.timestamp).num_seconds().max(1) as f64,
            max_total: last.total as f64,
            width,
            height,
        })
    }

    fn x(&self, timestamp: DateTime<Utc>) -> f64 {
        let offset = (timestamp - self.start).num_seconds() as f64;
        offset / self.span_secs * self.width
    }

    fn y(&self, total: i64) -> f64 {
        self.height - scale(total as f64, self.max_total, self.height)
    }

    fn date_at(&self, step: i32) -> DateTime<Utc> {
        let secs = self.span_secs / DATE_STEPS as f64 * step as f64;
        self.start + Duration::seconds(secs as i64)
    }
}

/// Append the cumulative XP chart to `container`
pub fn render_xp_chart(container: &mut Element, transactions: &[Transaction]) {
    let points = cumulative_series(transactions);
    if points.iter().all(|p| p.total == 0) {
        placeholder(container, "No XP data available");
        return;
    }
    let width = FRAME.inner_width();
    let height = FRAME.inner_height();
    let Some(xp_scale) = XpScale::new(&points, width, height) else {
        placeholder(container, "No XP data available");
        return;
    };

    let mut group = FRAME.plot();
    value_grid(&mut group, width, height, xp_scale.max_total.max(1.0), format_compact);

    let mut line = format!("M 0 {}", format_coord(height));
    for point in &points {
        line.push_str(&format!(
            " L {} {}",
            format_coord(xp_scale.x(point.timestamp)),
            format_coord(xp_scale.y(point.total))
        ));
    }

    group.push(
        Element::new("path")
            .attr("class", "xp-area")
            .attr("d", format!("{} L {} {} Z", line, format_coord(width), format_coord(height)))
            .attr("fill", AREA_COLOR),
    );
    group.push(
        Element::new("path")
            .attr("class", "xp-line")
            .attr("d", &line)
            .attr("fill", "none")
            .attr("stroke", LINE_COLOR)
            .attr("stroke-width", 2),
    );

    for point in &points[marker_start(points.len())..] {
        let tooltip = format!(
            "{}\nXP: {}\nDate: {}",
            point.project,
            format_thousands(point.total),
            point.timestamp.format("%b %d, %Y")
        );
        group.push(
            Element::new("circle")
                .attr("class", "xp-point")
                .attr("cx", format_coord(xp_scale.x(point.timestamp)))
                .attr("cy", format_coord(xp_scale.y(point.total)))
                .attr("r", 3)
                .attr("fill", LINE_COLOR)
                .attr("stroke", BACKGROUND)
                .attr("stroke-width", 1)
                .child(Element::new("title").text(tooltip)),
        );
    }

    for step in 0..=DATE_STEPS {
        let x = width / DATE_STEPS as f64 * step as f64;
        let anchor = match step {
            0 => "start",
            DATE_STEPS => "end",
            _ => "middle",
        };
        let date = xp_scale.date_at(step).format("%b %y").to_string();
        group.push(label(x, height + 20.0, anchor, date));
    }

    container.push(FRAME.svg().child(group));
}
