//! `data` payloads of the dashboard queries.
//!
//! Every field defaults when absent or `null`; the aggregator treats a
//! missing section as empty rather than as an error.

use serde::{Deserialize, Deserializer, Serialize};

use super::{Progress, Transaction, User};

/// `data` of the complete profile query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: Vec<User>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transaction_aggregate: XpAggregate,
    /// XP transactions, oldest first
    #[serde(rename = "transaction", default, deserialize_with = "null_as_default")]
    pub xp_transactions: Vec<Transaction>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub progress: Vec<Progress>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub audit_given: Vec<Transaction>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub audit_received: Vec<Transaction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct XpAggregate {
    #[serde(default, deserialize_with = "null_as_default")]
    pub aggregate: AggregateFields,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateFields {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sum: AggregateSum,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateSum {
    #[serde(default)]
    pub amount: Option<i64>,
}

impl XpAggregate {
    pub fn total(&self) -> i64 {
        self.aggregate.sum.amount.unwrap_or(0)
    }
}

/// `data` of the level query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub transaction: Vec<Transaction>,
}

/// `data` of the skills query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillsData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub transaction: Vec<Transaction>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
