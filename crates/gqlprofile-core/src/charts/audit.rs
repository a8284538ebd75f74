use crate::profile::Profile;
use crate::utils::{format_bytes, format_coord};
use crate::view::Element;

use super::{label, placeholder, scale, title, Frame, Padding, MUTED_COLOR, TEXT_COLOR, TRACK_COLOR};

const DONE_COLOR: &str = "#10b981";
const RECEIVED_COLOR: &str = "#3b82f6";

const BAR_WIDTH: f64 = 60.0;
const BAR_SPACING: f64 = 100.0;
const RATIO_BOX_WIDTH: f64 = 120.0;
const RATIO_BOX_HEIGHT: f64 = 35.0;

const FRAME: Frame = Frame {
    width: 400.0,
    height: 300.0,
    padding: Padding {
        top: 50.0,
        right: 40.0,
        bottom: 60.0,
        left: 60.0,
    },
};

/// Audit ratio classification shown by color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditTier {
    Excellent,
    Good,
    Low,
}

impl AuditTier {
    pub fn classify(ratio: f64) -> Self {
        if ratio >= 1.0 {
            AuditTier::Excellent
        } else if ratio >= 0.7 {
            AuditTier::Good
        } else {
            AuditTier::Low
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            AuditTier::Excellent => "#10b981",
            AuditTier::Good => "#f59e0b",
            AuditTier::Low => "#ef4444",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AuditTier::Excellent => "Excellent",
            AuditTier::Good => "Good",
            AuditTier::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuditData {
    pub ratio: f64,
    pub total_up: i64,
    pub total_down: i64,
}

impl From<&Profile> for AuditData {
    fn from(profile: &Profile) -> Self {
        Self {
            ratio: profile.audit_ratio,
            total_up: profile.total_up,
            total_down: profile.total_down,
        }
    }
}

impl AuditData {
    pub fn tier(&self) -> AuditTier {
        AuditTier::classify(self.ratio)
    }
}

/// Shared bar scale for done and received
pub fn audit_scale_max(total_up: i64, total_down: i64) -> f64 {
    total_up.max(total_down).max(1) as f64
}

/// Append the audits done vs received chart to `container`
pub fn render_audit_chart(container: &mut Element, data: &AuditData) {
    if data.total_up <= 0 && data.total_down <= 0 {
        placeholder(container, "No audit data available");
        return;
    }

    let width = FRAME.inner_width();
    let height = FRAME.inner_height();
    let max = audit_scale_max(data.total_up, data.total_down);
    let bars = [
        ("Done", data.total_up, DONE_COLOR),
        ("Received", data.total_down, RECEIVED_COLOR),
    ];
    let start = width / 2.0 - bars.len() as f64 * BAR_SPACING / 2.0;

    let mut group = FRAME.plot();
    group.push(title(width / 2.0, "Audit Ratio"));

    for (i, (name, value, color)) in bars.iter().enumerate() {
        let x = start + i as f64 * BAR_SPACING + (BAR_SPACING - BAR_WIDTH) / 2.0;
        let bar_height = scale(*value as f64, max, height).max(0.0);
        let y = height - bar_height;
        let center = x + BAR_WIDTH / 2.0;

        let mut bar = Element::new("g").attr("class", "bar");
        bar.push(
            Element::new("rect")
                .attr("class", "bar-track")
                .attr("x", format_coord(x))
                .attr("y", 0)
                .attr("width", format_coord(BAR_WIDTH))
                .attr("height", format_coord(height))
                .attr("fill", TRACK_COLOR)
                .attr("rx", 4),
        );
        bar.push(
            Element::new("rect")
                .attr("x", format_coord(x))
                .attr("y", format_coord(y))
                .attr("width", format_coord(BAR_WIDTH))
                .attr("height", format_coord(bar_height))
                .attr("fill", *color)
                .attr("rx", 4)
                .child(Element::new("title").text(format!("{}: {}", name, format_bytes(*value)))),
        );
        bar.push(
            Element::new("text")
                .attr("x", format_coord(center))
                .attr("y", format_coord(y - 10.0))
                .attr("text-anchor", "middle")
                .attr("fill", TEXT_COLOR)
                .attr("font-size", 14)
                .attr("font-weight", "bold")
                .text(format_bytes(*value)),
        );
        bar.push(label(center, height + 25.0, "middle", *name));
        group.push(bar);
    }

    let mid = width / 2.0;
    group.push(
        Element::new("g")
            .attr("class", "audit-ratio")
            .child(
                Element::new("rect")
                    .attr("x", format_coord(mid - RATIO_BOX_WIDTH / 2.0))
                    .attr("y", format_coord(height + 40.0))
                    .attr("width", format_coord(RATIO_BOX_WIDTH))
                    .attr("height", format_coord(RATIO_BOX_HEIGHT))
                    .attr("fill", TRACK_COLOR)
                    .attr("rx", 6),
            )
            .child(
                Element::new("text")
                    .attr("x", format_coord(mid))
                    .attr("y", format_coord(height + 55.0))
                    .attr("text-anchor", "middle")
                    .attr("fill", MUTED_COLOR)
                    .attr("font-size", 10)
                    .text("Audit Ratio"),
            )
            .child(
                Element::new("text")
                    .attr("x", format_coord(mid))
                    .attr("y", format_coord(height + 70.0))
                    .attr("text-anchor", "middle")
                    .attr("fill", data.tier().color())
                    .attr("font-size", 14)
                    .attr("font-weight", "bold")
                    .text(format!("{:.2}", data.ratio)),
            ),
    );

    container.push(FRAME.svg().child(group));
}
