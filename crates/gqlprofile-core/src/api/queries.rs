//! GraphQL documents issued by the dashboard.
//!
//! The user is implied by the bearer token, so none of the queries take
//! variables.

/// Identity, XP, progress and audit records in one round trip
pub const COMPLETE_PROFILE: &str = r#"
  query {
    user {
      id
      login
      attrs
      auditRatio
      totalUp
      totalDown
    }

    transaction_aggregate(where: { type: { _eq: "xp" } }) {
      aggregate {
        sum {
          amount
        }
      }
    }

    transaction(
      where: { type: { _eq: "xp" } }
      order_by: { createdAt: asc }
    ) {
      amount
      createdAt
      path
    }

    progress(order_by: { createdAt: desc }) {
      id
      grade
      path
      createdAt
      updatedAt
    }

    audit_given: transaction(
      where: { type: { _eq: "up" } }
      order_by: { createdAt: desc }
    ) {
      id
      amount
      createdAt
      path
    }

    audit_received: transaction(
      where: { type: { _eq: "down" } }
      order_by: { createdAt: desc }
    ) {
      id
      amount
      createdAt
      path
    }
  }
"#;

/// Highest level reached
pub const USER_LEVEL: &str = r#"
  query {
    transaction(
      where: { type: { _eq: "level" } }
      order_by: { amount: desc }
      limit: 1
    ) {
      amount
      createdAt
    }
  }
"#;

/// Skill transactions, strongest first
pub const USER_SKILLS: &str = r#"
  query {
    transaction(
      where: { type: { _regex: "skill_" } }
      order_by: { amount: desc }
    ) {
      type
      amount
      createdAt
    }
  }
"#;
