//! Dashboard cards. Each builder returns a detached element that the page
//! composer appends to the container.

use chrono::{DateTime, Utc};

use crate::charts::{AuditData, AuditTier};
use crate::profile::{PiscineStats, Profile, ProjectStatus};
use crate::utils::{format_bytes, format_thousands, format_time_ago};

use super::markup::Element;
use super::style::{ACCENT, ERROR, GO_COLOR, INFO, JS_COLOR};

/// Entries shown in the activity card
pub const ACTIVITY_CARD_LIMIT: usize = 5;

/// Command that replaces the browser logout button
pub const LOGOUT_COMMAND: &str = "gqlprofile logout";

fn card() -> Element {
    Element::div("card profile-card")
}

fn hint(prefix: &str, command: &str) -> Element {
    Element::new("p")
        .attr("class", "hint")
        .text(prefix)
        .child(Element::new("code").text(command))
}

fn stat(value: impl Into<String>, name: &str) -> Element {
    Element::div("stat")
        .child(Element::div("stat-value").text(value))
        .child(Element::div("stat-label").text(name))
}

fn grade_item(class: &str, value: impl Into<String>, name: &str) -> Element {
    Element::div(class).child(
        Element::div("grade-content")
            .child(Element::div("grade-value").text(value))
            .child(Element::div("grade-label").text(name)),
    )
}

/// Identity bar with the sign-out hint
pub fn header(profile: &Profile) -> Element {
    Element::div("profile-header card")
        .child(Element::div("identity").child(Element::new("strong").text(&profile.login)))
        .child(hint("Sign out: ", LOGOUT_COMMAND))
}

pub fn user_info(profile: &Profile) -> Element {
    let mut el = card().child(Element::new("h3").text(&profile.login));
    if let Some(email) = &profile.email {
        el.push(Element::new("p").attr("class", "muted").text(email));
    }
    if let Some(id) = profile.id {
        el.push(Element::new("p").attr("class", "muted").text(format!("ID: {}", id)));
    }
    el.child(Element::new("p").text(format!("XP: {}", format_thousands(profile.total_xp))))
}

pub fn statistics(profile: &Profile) -> Element {
    card().child(Element::new("h4").text("Statistics")).child(
        Element::div("stats")
            .child(stat(profile.total_projects.to_string(), "Projects"))
            .child(stat(format_thousands(profile.total_xp), "XP"))
            .child(stat(format_bytes(profile.total_xp), "XP (size)")),
    )
}

pub fn academic_performance(profile: &Profile) -> Element {
    card().child(Element::new("h4").text("Academic Performance")).child(
        Element::div("grades-container")
            .child(grade_item("grade-item highlight", profile.level.to_string(), "Current Level"))
            .child(grade_item(
                "grade-item",
                format!("{:.1}", profile.average_grade),
                "Average Grade",
            ))
            .child(grade_item(
                "grade-item",
                format!("{:.1}%", profile.success_rate()),
                "Success Rate",
            ))
            .child(grade_item(
                "grade-item",
                format!("{}/{}", profile.passed_projects, profile.total_projects),
                "Completed",
            )),
    )
}

fn audit_detail(color: &str, icon: &str, value: i64, name: &str) -> Element {
    Element::div("audit-detail-item")
        .child(
            Element::div("audit-detail-icon")
                .attr("style", format!("background: {}", color))
                .text(icon),
        )
        .child(
            Element::div("audit-detail-content")
                .child(Element::div("audit-detail-value").text(format_bytes(value)))
                .child(Element::div("audit-detail-label").text(name)),
        )
}

pub fn audit_summary(profile: &Profile) -> Element {
    let data = AuditData::from(profile);
    let tier = AuditTier::classify(data.ratio);
    let color = format!("color: {}", tier.color());

    card().child(Element::new("h4").text("Audit Statistics")).child(
        Element::div("audit-stats")
            .child(
                Element::div("audit-ratio-display")
                    .child(
                        Element::div("audit-ratio-value")
                            .attr("style", &color)
                            .text(format!("{:.2}", data.ratio)),
                    )
                    .child(Element::div("audit-ratio-label").text("Audit Ratio"))
                    .child(
                        Element::div("audit-ratio-status")
                            .attr("style", &color)
                            .text(tier.label()),
                    ),
            )
            .child(
                Element::div("audit-details")
                    .child(audit_detail(ACCENT, "+", data.total_up, "Audits Done"))
                    .child(audit_detail(INFO, "-", data.total_down, "Audits Received")),
            ),
    )
}

pub fn recent_activity(profile: &Profile, now: DateTime<Utc>) -> Element {
    let mut timeline = Element::div("activity-timeline");
    for activity in profile.recent_activity.iter().take(ACTIVITY_CARD_LIMIT) {
        timeline.push(
            Element::div("activity-item")
                .child(Element::div("activity-dot"))
                .child(
                    Element::div("activity-content")
                        .child(Element::div("activity-title").text(&activity.title))
                        .child(
                            Element::div("activity-meta")
                                .child(
                                    Element::new("span")
                                        .attr("class", "activity-amount")
                                        .text(format!("+{} XP", format_thousands(activity.amount))),
                                )
                                .child(
                                    Element::new("span")
                                        .attr("class", "activity-date")
                                        .text(format_time_ago(&activity.date, now)),
                                ),
                        ),
                ),
        );
    }
    if timeline.is_empty() {
        timeline.push(Element::new("p").attr("class", "muted").text("No recent activity"));
    }
    card().child(Element::new("h4").text("Recent Activity")).child(timeline)
}

fn piscine_item(name: &str, color: &str, stats: PiscineStats) -> Element {
    let rate = format!("{:.1}%", stats.pass_rate);
    Element::div("piscine-item")
        .child(
            Element::div("piscine-header")
                .child(Element::new("span").attr("class", "piscine-name").text(name))
                .child(Element::new("span").attr("class", "piscine-badge").text(&rate)),
        )
        .child(
            Element::div("piscine-progress").child(
                Element::div("piscine-bar")
                    .attr("style", format!("width: {}; background: {}", rate, color)),
            ),
        )
        .child(Element::div("piscine-details").text(format!(
            "{} / {} exercises passed",
            stats.passed, stats.total
        )))
}

/// `None` when the user has no piscine records at all
pub fn piscine_section(profile: &Profile) -> Option<Element> {
    if profile.piscine_go.is_empty() && profile.piscine_js.is_empty() {
        return None;
    }
    let mut stats = Element::div("piscine-stats");
    if !profile.piscine_go.is_empty() {
        stats.push(piscine_item("Go Piscine", GO_COLOR, profile.piscine_go_stats()));
    }
    if !profile.piscine_js.is_empty() {
        stats.push(piscine_item("JS Piscine", JS_COLOR, profile.piscine_js_stats()));
    }
    Some(card().child(Element::new("h4").text("Piscine Statistics")).child(stats))
}

pub fn skills(profile: &Profile) -> Element {
    let mut el = card().child(Element::new("h4").text("Skills"));
    if profile.skills.is_empty() {
        el.push(Element::new("p").attr("class", "muted").text("No skills recorded"));
        return el;
    }
    let mut list = Element::new("ul").attr("class", "skills-list");
    for skill in &profile.skills {
        list.push(
            Element::new("li")
                .child(Element::new("span").text(&skill.name))
                .child(Element::new("span").text(format!("{}%", skill.amount))),
        );
    }
    el.child(list)
}

pub fn projects(profile: &Profile) -> Element {
    let mut el = card().child(Element::new("h3").text("Projects"));
    if profile.projects.is_empty() {
        el.push(Element::div("muted").text("No projects"));
        return el;
    }
    for project in &profile.projects {
        let color = match project.status {
            ProjectStatus::Pass => ACCENT,
            ProjectStatus::Fail => ERROR,
        };
        el.push(
            Element::div("project-row")
                .text(format!("{} ", project.name))
                .child(
                    Element::new("span")
                        .attr("style", format!("color: {}", color))
                        .text(project.status.to_string()),
                ),
        );
    }
    el
}

/// Two-column grid with every summary card
pub fn overview(profile: &Profile, now: DateTime<Utc>) -> Element {
    let mut left = Element::div("column")
        .child(user_info(profile))
        .child(statistics(profile))
        .child(academic_performance(profile))
        .child(audit_summary(profile));
    let mut right = Element::div("column")
        .child(recent_activity(profile, now))
        .child(skills(profile));
    if let Some(piscine) = piscine_section(profile) {
        left.push(piscine);
    }
    right.push(projects(profile));

    Element::div("profile-grid").child(left).child(right)
}
