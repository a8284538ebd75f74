use crate::models::Transaction;
use crate::utils::{format_coord, format_thousands, last_path_segment, truncate_string};
use crate::view::Element;

use super::{hsl, label, placeholder, scale, slanted_label, title, Frame, Padding};

pub const TOP_PROJECTS: usize = 5;

const UNKNOWN_PROJECT: &str = "Unknown";
const BASE_HUE: f64 = 200.0;
const HUE_STEP: f64 = 30.0;
const NAME_LENGTH: usize = 18;
const BAR_GAP: f64 = 20.0;

const FRAME: Frame = Frame {
    width: 500.0,
    height: 300.0,
    padding: Padding {
        top: 50.0,
        right: 40.0,
        bottom: 80.0,
        left: 60.0,
    },
};

/// Summed XP per project (last path segment), largest first.
/// Equal totals keep the order in which the project was first seen.
pub fn xp_by_project(transactions: &[Transaction]) -> Vec<(String, i64)> {
    let mut totals: Vec<(String, i64)> = Vec::new();
    for tx in transactions {
        let name = match last_path_segment(&tx.path) {
            "" => UNKNOWN_PROJECT,
            segment => segment,
        };
        match totals.iter_mut().find(|(n, _)| n.as_str() == name) {
            Some((_, total)) => *total += tx.amount,
            None => totals.push((name.to_string(), tx.amount)),
        }
    }
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals.truncate(TOP_PROJECTS);
    totals
}

/// Append the top projects by XP chart to `container`
pub fn render_xp_by_project_chart(container: &mut Element, transactions: &[Transaction]) {
    if transactions.is_empty() {
        placeholder(container, "No XP data available");
        return;
    }
    let top = xp_by_project(transactions);
    let max_xp = top.first().map(|(_, xp)| *xp).unwrap_or(0);
    if max_xp <= 0 {
        placeholder(container, "No project data");
        return;
    }

    let width = FRAME.inner_width();
    let height = FRAME.inner_height();
    let slot = width / top.len() as f64;
    let bar_width = slot - BAR_GAP;

    let mut group = FRAME.plot();
    group.push(title(width / 2.0, "Top 5 Projects by XP"));

    for (i, (name, xp)) in top.iter().enumerate() {
        let bar_height = scale(*xp as f64, max_xp as f64, height).max(0.0);
        let x = i as f64 * slot + BAR_GAP / 2.0;
        let y = height - bar_height;
        let center = x + bar_width / 2.0;

        group.push(
            Element::new("g")
                .attr("class", "bar")
                .child(
                    Element::new("rect")
                        .attr("x", format_coord(x))
                        .attr("y", format_coord(y))
                        .attr("width", format_coord(bar_width))
                        .attr("height", format_coord(bar_height))
                        .attr("fill", hsl(BASE_HUE + HUE_STEP * i as f64))
                        .attr("rx", 4),
                )
                .child(Element::new("title").text(format!("{}\nXP: {}", name, format_thousands(*xp)))),
        );
        group.push(label(center, y - 6.0, "middle", format_thousands(*xp)));
        group.push(slanted_label(
            center,
            height + 15.0,
            truncate_string(name, NAME_LENGTH),
        ));
    }

    container.push(FRAME.svg().child(group));
}
