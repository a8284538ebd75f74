//! Data models for GraphQL profile records.
//!
//! This module contains the server-side record shapes returned by the
//! GraphQL endpoint:
//!
//! - `User`: identity and audit totals
//! - `Transaction`: XP, audit (`up`/`down`), level and skill entries
//! - `Progress`: graded project milestones
//! - Response wrappers for the profile, level and skills queries

pub mod progress;
pub mod response;
pub mod transaction;
pub mod user;

pub use progress::Progress;
pub use response::{LevelData, ProfileData, SkillsData, XpAggregate};
pub use transaction::{Transaction, TransactionKind};
pub use user::User;
