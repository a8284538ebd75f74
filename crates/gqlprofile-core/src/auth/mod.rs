//! Authentication module for the bearer token and the login flow.
//!
//! This module provides:
//! - `TokenStore`: cleaned token persistence with expiry detection
//! - `TokenStorage` backends: file, OS keychain, memory
//! - `submit_login`: Basic-auth credential exchange driven through a `LoginView`
//!
//! Credentials are never persisted; only the resulting token is.

pub mod login;
pub mod storage;
pub mod store;
pub mod token;

pub use login::{render_login, submit_login, Credentials, LoginError, LoginForm, LoginView};
pub use storage::{FileStorage, KeyringStorage, MemoryStorage, TokenStorage};
pub use store::TokenStore;
