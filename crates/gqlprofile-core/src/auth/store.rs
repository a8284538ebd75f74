use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, warn};

use super::storage::TokenStorage;
use super::token;

/// Owner of the bearer token.
///
/// Created once by the application root and passed by reference to whatever
/// needs the token. Storage failures are logged and never surface; a token
/// that cannot be validated simply reads as "not authenticated".
pub struct TokenStore<S: TokenStorage> {
    storage: S,
}

impl<S: TokenStorage> TokenStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Clean and persist a token. Empty input is ignored.
    pub fn set_token(&mut self, raw: &str) {
        let token = token::clean_token(raw);
        if token.is_empty() {
            error!("Cannot set empty token");
            return;
        }
        if let Err(e) = self.storage.write(&token) {
            warn!(error = %e, "Failed to persist token");
        }
    }

    pub fn get_token(&self) -> Option<String> {
        let raw = self.storage.read()?;
        let token = token::clean_token(&raw);
        (!token.is_empty()).then_some(token)
    }

    pub fn remove_token(&mut self) {
        if let Err(e) = self.storage.remove() {
            warn!(error = %e, "Failed to remove token");
        }
    }

    pub fn is_authenticated(&mut self) -> bool {
        self.is_authenticated_at(Utc::now().timestamp())
    }

    /// Validate the stored token against `now` (Unix seconds).
    /// Malformed and expired tokens are removed.
    pub fn is_authenticated_at(&mut self, now: i64) -> bool {
        let Some(token) = self.get_token() else {
            return false;
        };

        if !token::has_token_shape(&token) {
            warn!("Invalid JWT format");
            self.remove_token();
            return false;
        }

        let Some(claims) = token::decode_claims(&token) else {
            error!("Failed to decode JWT payload");
            self.remove_token();
            return false;
        };

        if let Some(exp) = token::expiry(&claims) {
            if exp <= now as f64 {
                warn!(exp, now, "JWT token has expired");
                self.remove_token();
                return false;
            }
        }

        debug!("Stored token is valid");
        true
    }

    /// Decoded payload of the stored token
    pub fn claims(&self) -> Option<Value> {
        token::decode_claims(&self.get_token()?)
    }

    /// User id carried by the stored token
    pub fn user_id(&self) -> Option<String> {
        token::user_id(&self.claims()?)
    }
}
