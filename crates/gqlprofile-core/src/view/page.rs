//! Page-level composition: dashboard, loading and error states, and the
//! standalone HTML document that wraps them.

use chrono::{DateTime, Utc};

use crate::charts::{
    render_audit_chart, render_project_chart, render_xp_by_project_chart, render_xp_chart,
    AuditData,
};
use crate::profile::Profile;

use super::components::{self, LOGOUT_COMMAND};
use super::markup::{escape, Element};
use super::style::STYLESHEET;

pub const LOADING_MESSAGE: &str = "Loading profile...";
pub const RETRY_COMMAND: &str = "gqlprofile show";

fn chart_card(heading: &str) -> Element {
    Element::div("card chart").child(Element::new("h4").text(heading))
}

/// Replace the container's content with the full dashboard
pub fn compose_dashboard(container: &mut Element, profile: &Profile, now: DateTime<Utc>) {
    container.clear();
    container.push(components::header(profile));
    container.push(components::overview(profile, now));

    let mut xp = chart_card("XP Progression");
    render_xp_chart(&mut xp, &profile.xp_transactions);
    container.push(xp);

    let mut projects = chart_card("Project Results");
    render_project_chart(&mut projects, &profile.projects);
    container.push(projects);

    if profile.has_xp_data() {
        let mut by_project = chart_card("XP by Project");
        render_xp_by_project_chart(&mut by_project, &profile.xp_transactions);
        container.push(by_project);
    }

    if profile.has_audit_data() {
        let mut audit = chart_card("Audits");
        render_audit_chart(&mut audit, &AuditData::from(profile));
        container.push(audit);
    }
}

/// Replace the container's content with the loading card
pub fn render_loading(container: &mut Element) {
    container.clear();
    container.push(Element::div("card loading").text(LOADING_MESSAGE));
}

/// Replace the container's content with the load failure card
pub fn render_error(container: &mut Element, message: &str, detail: Option<&str>) {
    container.clear();
    let mut card = Element::div("card error")
        .child(Element::new("h3").text("Failed to load profile"))
        .child(Element::new("p").attr("class", "muted").text(message));
    if let Some(detail) = detail.filter(|d| !d.is_empty() && *d != message) {
        card.push(Element::new("pre").attr("class", "muted").text(detail));
    }
    card.push(
        Element::new("p")
            .attr("class", "hint")
            .text("Retry: ")
            .child(Element::new("code").text(RETRY_COMMAND))
            .text(" Logout: ")
            .child(Element::new("code").text(LOGOUT_COMMAND)),
    );
    container.push(card);
}

/// Standalone HTML document around `body`
pub fn document(title: &str, body: &Element) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        STYLESHEET,
        body.render()
    )
}
