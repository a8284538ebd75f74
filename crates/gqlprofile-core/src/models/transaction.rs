use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::{last_path_segment, parse_timestamp};

/// Transaction type as reported by the `type` column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionKind {
    Xp,
    /// Audit performed by the user
    Up,
    /// Audit received by the user
    Down,
    Level,
    Skill(String),
    Other(String),
}

impl TransactionKind {
    pub fn from_str(s: &str) -> Self {
        match s {
            "xp" => TransactionKind::Xp,
            "up" => TransactionKind::Up,
            "down" => TransactionKind::Down,
            "level" => TransactionKind::Level,
            _ => match s.strip_prefix("skill_") {
                Some(skill) => TransactionKind::Skill(skill.to_string()),
                None => TransactionKind::Other(s.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: Option<i64>,
    /// Absent when the query selected transactions by type already
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
}

impl Transaction {
    pub fn kind(&self) -> Option<TransactionKind> {
        self.kind.as_deref().map(TransactionKind::from_str)
    }

    /// Project name shown for this transaction
    pub fn title(&self) -> &str {
        last_path_segment(&self.path)
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}
