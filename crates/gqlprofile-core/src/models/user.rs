use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub login: Option<String>,
    /// Free-form registration attributes
    #[serde(default)]
    pub attrs: Option<serde_json::Value>,
    #[serde(rename = "auditRatio", default)]
    pub audit_ratio: Option<f64>,
    #[serde(rename = "totalUp", default)]
    pub total_up: Option<i64>,
    #[serde(rename = "totalDown", default)]
    pub total_down: Option<i64>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.login.as_deref().unwrap_or("Unknown")
    }

    /// Optional `attrs` string field, e.g. `email`, `firstName`
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.as_ref()?.get(key)?.as_str()
    }
}
