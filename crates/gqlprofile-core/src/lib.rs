//! gqlprofile core - a GraphQL profile dashboard for the Zone01 platform.
//!
//! This crate holds everything below the terminal:
//!
//! - `auth`: bearer token persistence, expiry checks and the login flow
//! - `api`: sign-in and GraphQL transport with its error taxonomy
//! - `profile`: aggregation of query payloads into a display-ready profile
//! - `charts`: hand-drawn SVG charts
//! - `view`: HTML composition of the dashboard, loading and error pages
//! - `dashboard`: batched loading with stale-result suppression

pub mod api;
pub mod auth;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod profile;
pub mod utils;
pub mod view;

pub use api::{ApiClient, ApiError};
pub use auth::{TokenStorage, TokenStore};
pub use config::Config;
pub use dashboard::{DashboardLoader, LoadGeneration, LoadOutcome};
pub use profile::Profile;
