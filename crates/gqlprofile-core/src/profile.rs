//! Profile aggregation.
//!
//! Reshapes the raw query payloads into the display-ready `Profile`. Pure
//! data shaping: no I/O, no markup, and no failure modes. Absent sections
//! become empty collections or zeros.

use std::fmt;


use crate::models::{LevelData, Progress, ProfileData, SkillsData, Transaction, TransactionKind};

/// Number of XP transactions kept for the activity timeline
pub const RECENT_ACTIVITY_LIMIT: usize = 10;

const PISCINE_GO: &str = "piscine-go";
const PISCINE_JS: &str = "piscine-js";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStatus {
    Pass,
    Fail,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectStatus::Pass => write!(f, "PASS"),
            ProjectStatus::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: String,
    pub status: ProjectStatus,
    pub grade: f64,
    pub path: String,
    pub date: String,
}

impl From<&Progress> for Project {
    fn from(progress: &Progress) -> Self {
        Self {
            name: progress.name().to_string(),
            status: if progress.is_passed() {
                ProjectStatus::Pass
            } else {
                ProjectStatus::Fail
            },
            grade: progress.grade,
            path: progress.path.clone(),
            date: progress.created_at.clone(),
        }
    }
}

/// One entry of the recent activity timeline
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub title: String,
    pub amount: i64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    pub name: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PiscineStats {
    pub total: usize,
    pub passed: usize,
    /// Percentage, 0..=100
    pub pass_rate: f64,
}

impl PiscineStats {
    pub fn from_records(records: &[Progress]) -> Self {
        let total = records.len();
        let passed = records.iter().filter(|p| p.is_passed()).count();
        Self {
            total,
            passed,
            pass_rate: percentage(passed, total),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub id: Option<i64>,
    pub login: String,
    pub email: Option<String>,

    pub total_xp: i64,
    /// XP transactions in arrival (chronological) order
    pub xp_transactions: Vec<Transaction>,
    pub level: i64,

    pub projects: Vec<Project>,
    pub passed_projects: usize,
    pub total_projects: usize,
    pub average_grade: f64,

    pub audit_ratio: f64,
    pub total_up: i64,
    pub total_down: i64,

    pub recent_activity: Vec<Activity>,
    pub piscine_go: Vec<Progress>,
    pub piscine_js: Vec<Progress>,
    pub skills: Vec<Skill>,
}

impl Profile {
    /// Aggregate the three dashboard query payloads
    pub fn build(data: &ProfileData, level: &LevelData, skills: &SkillsData) -> Self {
        let user = data.user.first();

        let projects: Vec<Project> = data.progress.iter().map(Project::from).collect();
        let passed_projects = projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Pass)
            .count();

        let total_up = user
            .and_then(|u| u.total_up)
            .unwrap_or_else(|| sum_amounts(&data.audit_given));
        let total_down = user
            .and_then(|u| u.total_down)
            .unwrap_or_else(|| sum_amounts(&data.audit_received));

        Self {
            id: user.and_then(|u| u.id),
            login: user.map(|u| u.display_name()).unwrap_or("Unknown").to_string(),
            email: user.and_then(|u| u.attr("email")).map(str::to_string),

            total_xp: data.transaction_aggregate.total(),
            xp_transactions: data.xp_transactions.clone(),
            level: highest_level(&level.transaction),

            total_projects: projects.len(),
            passed_projects,
            average_grade: average_grade(&data.progress),
            projects,

            audit_ratio: audit_ratio(total_up, total_down),
            total_up,
            total_down,

            recent_activity: recent_activity(&data.xp_transactions),
            piscine_go: piscine_subset(&data.progress, PISCINE_GO),
            piscine_js: piscine_subset(&data.progress, PISCINE_JS),
            skills: summarize_skills(&skills.transaction),
        }
    }

    /// Passed share of all projects, in percent
    pub fn success_rate(&self) -> f64 {
        percentage(self.passed_projects, self.total_projects)
    }

    pub fn has_xp_data(&self) -> bool {
        !self.xp_transactions.is_empty()
    }

    pub fn has_audit_data(&self) -> bool {
        self.total_up > 0 || self.total_down > 0
    }

    pub fn piscine_go_stats(&self) -> PiscineStats {
        PiscineStats::from_records(&self.piscine_go)
    }

    pub fn piscine_js_stats(&self) -> PiscineStats {
        PiscineStats::from_records(&self.piscine_js)
    }
}

/// `up / down`, or 0 when nothing was received
pub fn audit_ratio(total_up: i64, total_down: i64) -> f64 {
    if total_down > 0 {
        total_up as f64 / total_down as f64
    } else {
        0.0
    }
}

/// Mean of the strictly positive grades; 0 when there are none
pub fn average_grade(progress: &[Progress]) -> f64 {
    let graded: Vec<f64> = progress
        .iter()
        .map(|p| p.grade)
        .filter(|g| *g > 0.0)
        .collect();
    if graded.is_empty() {
        0.0
    } else {
        graded.iter().sum::<f64>() / graded.len() as f64
    }
}

/// Last `RECENT_ACTIVITY_LIMIT` transactions, most recent first
pub fn recent_activity(transactions: &[Transaction]) -> Vec<Activity> {
    let start = transactions.len().saturating_sub(RECENT_ACTIVITY_LIMIT);
    transactions[start..]
        .iter()
        .rev()
        .map(|tx| Activity {
            title: tx.title().to_string(),
            amount: tx.amount,
            date: tx.created_at.clone(),
        })
        .collect()
}

/// Records whose path contains `track`, ignoring case
pub fn piscine_subset(progress: &[Progress], track: &str) -> Vec<Progress> {
    progress
        .iter()
        .filter(|p| p.path_contains(track))
        .cloned()
        .collect()
}

/// Highest amount among level transactions
pub fn highest_level(transactions: &[Transaction]) -> i64 {
    transactions.iter().map(|t| t.amount).max().unwrap_or(0)
}

/// Best amount per skill, strongest first (ties by name)
pub fn summarize_skills(transactions: &[Transaction]) -> Vec<Skill> {
    let mut skills: Vec<Skill> = Vec::new();
    for tx in transactions {
        let Some(TransactionKind::Skill(name)) = tx.kind() else {
            continue;
        };
        match skills.iter_mut().find(|s| s.name == name) {
            Some(existing) => existing.amount = existing.amount.max(tx.amount),
            None => skills.push(Skill {
                name,
                amount: tx.amount,
            }),
        }
    }
    skills.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.name.cmp(&b.name)));
    skills
}

fn sum_amounts(transactions: &[Transaction]) -> i64 {
    transactions.iter().map(|t| t.amount).sum()
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
