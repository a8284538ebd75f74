use crate::profile::Project;
use crate::utils::{format_coord, format_date, parse_timestamp, truncate_string};
use crate::view::Element;

use super::{hsl, placeholder, scale, slanted_label, value_grid, Frame, Padding};

/// Bars shown at most, most recent last
pub const PROJECT_BAR_LIMIT: usize = 15;

/// Hue reached by a grade of 6 and above (green)
const MAX_HUE: f64 = 120.0;
const HUE_PER_GRADE: f64 = 20.0;
const MAX_BAR_WIDTH: f64 = 40.0;
const NAME_LENGTH: usize = 15;

const FRAME: Frame = Frame {
    width: 600.0,
    height: 300.0,
    padding: Padding {
        top: 40.0,
        right: 20.0,
        bottom: 100.0,
        left: 40.0,
    },
};

/// Projects with a positive grade, oldest first, keeping the most recent
pub fn graded_projects(projects: &[Project]) -> Vec<&Project> {
    let mut graded: Vec<&Project> = projects.iter().filter(|p| p.grade > 0.0).collect();
    graded.sort_by_key(|p| parse_timestamp(&p.date));
    let start = graded.len().saturating_sub(PROJECT_BAR_LIMIT);
    graded.split_off(start)
}

/// Bar hue: low grades orange/red, high grades green
pub fn grade_hue(grade: f64) -> f64 {
    (grade * HUE_PER_GRADE).clamp(0.0, MAX_HUE)
}

/// Append the project results chart to `container`
pub fn render_project_chart(container: &mut Element, projects: &[Project]) {
    if projects.is_empty() {
        placeholder(container, "No project data available");
        return;
    }
    let graded = graded_projects(projects);
    if graded.is_empty() {
        placeholder(container, "No graded projects found");
        return;
    }

    let width = FRAME.inner_width();
    let height = FRAME.inner_height();
    let count = graded.len() as f64;
    let max_grade = graded.iter().map(|p| p.grade).fold(1.0, f64::max);
    let bar_width = MAX_BAR_WIDTH.min(width / count - 10.0);
    let spacing = (width - count * bar_width) / (count + 1.0);

    let mut group = FRAME.plot();
    value_grid(&mut group, width, height, max_grade, |v| format!("{:.1}", v));

    for (i, project) in graded.iter().enumerate() {
        let x = spacing + i as f64 * (bar_width + spacing);
        let bar_height = scale(project.grade, max_grade, height);
        let tooltip = format!(
            "{}\nGrade: {:.2}\nDate: {}",
            project.name,
            project.grade,
            format_date(&project.date)
        );

        group.push(
            Element::new("g")
                .attr("class", "bar")
                .child(
                    Element::new("rect")
                        .attr("x", format_coord(x))
                        .attr("y", format_coord(height - bar_height))
                        .attr("width", format_coord(bar_width))
                        .attr("height", format_coord(bar_height))
                        .attr("fill", hsl(grade_hue(project.grade)))
                        .attr("rx", 4),
                )
                .child(Element::new("title").text(tooltip)),
        );
        group.push(slanted_label(
            x + bar_width / 2.0,
            height + 20.0,
            truncate_string(&project.name, NAME_LENGTH),
        ));
    }

    container.push(FRAME.svg().child(group));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProjectStatus;

    fn project(name: &str, grade: f64, date: &str) -> Project {
        Project {
            name: name.to_string(),
            status: if grade >= 1.0 {
                ProjectStatus::Pass
            } else {
                ProjectStatus::Fail
            },
            grade,
            path: format!("/oujda/module/{}", name),
            date: date.to_string(),
        }
    }

    #[test]
    fn test_graded_projects_filters_and_sorts() {
        let projects = vec![
            project("late", 1.0, "2024-03-01T00:00:00Z"),
            project("ungraded", 0.0, "2024-01-15T00:00:00Z"),
            project("early", 2.0, "2024-01-01T00:00:00Z"),
        ];
        let names: Vec<&str> = graded_projects(&projects).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["early", "late"]);
    }

    #[test]
    fn test_graded_projects_keeps_most_recent() {
        let projects: Vec<Project> = (1..=20)
            .map(|i| project(&format!("p{}", i), 1.0, &format!("2024-01-{:02}T00:00:00Z", i)))
            .collect();
        let graded = graded_projects(&projects);
        assert_eq!(graded.len(), PROJECT_BAR_LIMIT);
        assert_eq!(graded[0].name, "p6");
        assert_eq!(graded[PROJECT_BAR_LIMIT - 1].name, "p20");
    }

    #[test]
    fn test_grade_hue_is_capped() {
        assert_eq!(grade_hue(0.5), 10.0);
        assert_eq!(grade_hue(1.0), 20.0);
        assert_eq!(grade_hue(6.0), 120.0);
        assert_eq!(grade_hue(12.0), 120.0);
    }

    #[test]
    fn test_placeholders() {
        let mut container = Element::div("chart");
        render_project_chart(&mut container, &[]);
        assert_eq!(container.text_content(), "No project data available");

        let mut container = Element::div("chart");
        render_project_chart(&mut container, &[project("a", 0.0, "2024-01-01T00:00:00Z")]);
        assert_eq!(container.text_content().trim(), "No graded projects found");
        assert!(container.find_all("svg").is_empty());
    }

    #[test]
    fn test_bar_heights_scale_to_max_grade() {
        let projects = vec![
            project("half", 1.0, "2024-01-01T00:00:00Z"),
            project("full", 2.0, "2024-01-02T00:00:00Z"),
        ];
        let mut container = Element::div("chart");
        render_project_chart(&mut container, &projects);

        let bars = container.find_all("rect");
        assert_eq!(bars.len(), 2);
        // Inner height is 160
        assert_eq!(bars[0].get_attr("height"), Some("80"));
        assert_eq!(bars[1].get_attr("height"), Some("160"));
        assert_eq!(bars[1].get_attr("fill"), Some("hsl(40, 70%, 50%)"));
    }

    #[test]
    fn test_low_grades_scale_against_one() {
        let projects = vec![project("low", 0.5, "2024-01-01T00:00:00Z")];
        let mut container = Element::div("chart");
        render_project_chart(&mut container, &projects);
        assert_eq!(container.find_all("rect")[0].get_attr("height"), Some("80"));
    }
}
