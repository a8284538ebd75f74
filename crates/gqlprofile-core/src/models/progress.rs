use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::last_path_segment;

/// Grade at or above which a progress record counts as passed
pub const PASS_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Progress {
    #[serde(default)]
    pub id: Option<i64>,
    /// Ungraded (in progress) records come back as `null`
    #[serde(default, deserialize_with = "null_as_zero")]
    pub grade: f64,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<String>,
}

impl Progress {
    pub fn name(&self) -> &str {
        last_path_segment(&self.path)
    }

    pub fn is_passed(&self) -> bool {
        self.grade >= PASS_THRESHOLD
    }

    /// Case-insensitive substring match on the object path
    pub fn path_contains(&self, needle: &str) -> bool {
        self.path.to_lowercase().contains(&needle.to_lowercase())
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}
