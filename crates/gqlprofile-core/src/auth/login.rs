//! Credential exchange.
//!
//! The login surface is abstracted behind `LoginView` so the same flow
//! drives the terminal prompt and the tests.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};

use super::storage::TokenStorage;
use super::store::TokenStore;

/// Submit button label while idle
pub const SUBMIT_LABEL: &str = "Sign in";

/// Submit button label while the request is in flight
pub const SUBMITTING_LABEL: &str = "Signing in...";

#[derive(Error, Debug)]
pub enum LoginError {
    #[error("please enter both username/email and password")]
    MissingFields,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Raw field contents as typed by the user
#[derive(Clone, Default)]
pub struct LoginForm {
    pub identifier: String,
    pub secret: String,
}

impl LoginForm {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    /// Trim both fields; either one empty is a validation error
    pub fn validate(&self) -> Result<Credentials, LoginError> {
        let identifier = self.identifier.trim();
        let secret = self.secret.trim();
        if identifier.is_empty() || secret.is_empty() {
            return Err(LoginError::MissingFields);
        }
        Ok(Credentials {
            identifier: identifier.to_string(),
            secret: secret.to_string(),
        })
    }
}

/// Validated credentials. Consumed by a single sign-in and never stored.
#[derive(Clone)]
pub struct Credentials {
    identifier: String,
    secret: String,
}

impl Credentials {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// `Basic base64(identifier:secret)`
    pub fn basic_auth_header(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.identifier, self.secret));
        format!("Basic {}", encoded)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Surface the login form is drawn on
pub trait LoginView {
    /// Replace the surface contents with an empty form
    fn render_form(&mut self);
    /// Disable (and relabel) the submit control while a request runs
    fn set_submitting(&mut self, submitting: bool);
    fn show_error(&mut self, message: &str);
}

pub fn submit_label(submitting: bool) -> &'static str {
    if submitting {
        SUBMITTING_LABEL
    } else {
        SUBMIT_LABEL
    }
}

/// Re-enables the submit control when dropped, whatever the outcome
struct SubmitGuard<'a, V: LoginView + ?Sized> {
    view: &'a mut V,
}

impl<'a, V: LoginView + ?Sized> SubmitGuard<'a, V> {
    fn engage(view: &'a mut V) -> Self {
        view.set_submitting(true);
        Self { view }
    }
}

impl<V: LoginView + ?Sized> Drop for SubmitGuard<'_, V> {
    fn drop(&mut self) {
        self.view.set_submitting(false);
    }
}

/// Draw the login form on the given surface
pub fn render_login<V: LoginView + ?Sized>(view: &mut V) {
    view.render_form();
}

/// Validate the form, exchange the credentials and store the token.
///
/// Empty fields are reported on the view without touching the network.
/// On success the caller re-runs its auth gate.
pub async fn submit_login<V, S>(
    api: &ApiClient,
    view: &mut V,
    store: &mut TokenStore<S>,
    form: &LoginForm,
) -> Result<(), LoginError>
where
    V: LoginView + ?Sized,
    S: TokenStorage,
{
    let credentials = match form.validate() {
        Ok(credentials) => credentials,
        Err(e) => {
            view.show_error(&e.to_string());
            return Err(e);
        }
    };

    let result = {
        let _guard = SubmitGuard::engage(view);
        api.sign_in(&credentials).await
    };

    match result {
        Ok(token) => {
            store.set_token(&token);
            info!(identifier = credentials.identifier(), "Login successful");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Login failed");
            view.show_error(&e.to_string());
            Err(e.into())
        }
    }
}
