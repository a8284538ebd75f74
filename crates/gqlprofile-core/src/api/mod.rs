//! GraphQL API client module.
//!
//! This module provides the `ApiClient` for exchanging credentials for a
//! bearer token and running GraphQL queries against the profile backend.
//!
//! The sign-in endpoint uses Basic authentication and answers with a JWT;
//! every GraphQL request carries that JWT as a bearer token.

pub mod client;
pub mod error;
pub mod queries;

pub use client::{ApiClient, GraphqlRequest};
pub use error::{ApiError, GraphqlError};
