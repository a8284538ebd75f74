//! Application root.
//!
//! `App` owns the configuration, the token store, the API client and the
//! dashboard loader, and drives the boot loop: auth gate, login, loading,
//! dashboard or error page.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use tracing::{debug, error, info, warn};

use gqlprofile_core::auth::token;
use gqlprofile_core::auth::{
    render_login, submit_login, FileStorage, KeyringStorage, LoginError, LoginForm,
};
use gqlprofile_core::config::StorageBackend;
use gqlprofile_core::view::{compose_dashboard, document, render_error, render_loading, Element};
use gqlprofile_core::{
    ApiClient, ApiError, Config, DashboardLoader, LoadOutcome, TokenStorage, TokenStore,
};

use crate::terminal::{self, Choice, TerminalLoginView};

const ENV_USERNAME: &str = "GQLPROFILE_USERNAME";
const ENV_PASSWORD: &str = "GQLPROFILE_PASSWORD";

const PAGE_TITLE: &str = "GraphQL Profile";

/// Result of one pass past the auth gate
#[derive(Debug)]
enum Pass {
    /// Dashboard written
    Done,
    /// Superseded by a newer load
    Reload,
    /// Error page written
    Failed,
}

pub struct App {
    config: Config,
    store: TokenStore<Box<dyn TokenStorage>>,
    api: ApiClient,
    loader: DashboardLoader,
    output: PathBuf,
    /// Used for the first login attempt only
    env_password: Option<String>,
}

impl App {
    /// Create a new application instance
    pub fn new(output: Option<PathBuf>) -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        }
        .with_env_overrides();
        debug!(?config, "Config loaded");

        let storage = Self::open_storage(&config)?;
        let output = output.unwrap_or_else(|| config.output_path.clone());
        Self::from_parts(config, storage, output)
    }

    pub fn from_parts(
        config: Config,
        storage: Box<dyn TokenStorage>,
        output: PathBuf,
    ) -> Result<Self> {
        let api = ApiClient::new(config.endpoints()).context("Failed to create API client")?;
        let loader = DashboardLoader::new(api.clone());
        Ok(Self {
            config,
            store: TokenStore::new(storage),
            api,
            loader,
            output,
            env_password: std::env::var(ENV_PASSWORD).ok().filter(|p| !p.is_empty()),
        })
    }

    fn open_storage(config: &Config) -> Result<Box<dyn TokenStorage>> {
        let cache_dir = config
            .cache_dir()
            .unwrap_or_else(|_| PathBuf::from("./cache"));
        match config.token_storage {
            StorageBackend::File => Ok(Box::new(FileStorage::new(cache_dir))),
            StorageBackend::Keyring => match KeyringStorage::new() {
                Ok(storage) => Ok(Box::new(storage)),
                Err(e) => {
                    warn!(error = %e, "Keychain unavailable, falling back to file storage");
                    Ok(Box::new(FileStorage::new(cache_dir)))
                }
            },
        }
    }

    // =========================================================================
    // Boot loop
    // =========================================================================

    /// Render the dashboard, logging in first when needed.
    /// Returns once a dashboard was written or the user quits.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            if !self.auth_gate() {
                self.login().await?;
                continue;
            }

            match self.render_once().await? {
                Pass::Done => return Ok(()),
                Pass::Reload => continue,
                Pass::Failed => {
                    if !self.after_error(terminal::prompt_choice()?) {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// True when a usable token is stored. Invalid or expired tokens are cleared.
    fn auth_gate(&mut self) -> bool {
        let authenticated = self.store.is_authenticated();
        if !authenticated {
            info!("No valid token, starting login");
        }
        authenticated
    }

    /// Loading page, one load, then the dashboard or the error page
    async fn render_once(&mut self) -> Result<Pass> {
        let mut container = Element::div("container");
        render_loading(&mut container);
        self.write_page(PAGE_TITLE, &container)?;
        println!("Loading profile...");

        match self.loader.load(&self.store).await {
            Ok(LoadOutcome::Ready(profile)) => {
                compose_dashboard(&mut container, &profile, Utc::now());
                let title = format!("{} - {}", profile.login, PAGE_TITLE);
                self.write_page(&title, &container)?;
                println!("Dashboard written to {}", self.output.display());
                Ok(Pass::Done)
            }
            Ok(LoadOutcome::Stale) => {
                debug!("Load superseded, reloading");
                Ok(Pass::Reload)
            }
            Err(e) => {
                error!(error = %e, "Failed to load profile");
                self.show_load_error(&mut container, &e)?;
                Ok(Pass::Failed)
            }
        }
    }

    /// Apply the choice made after a failed load. Returns false to stop.
    fn after_error(&mut self, choice: Choice) -> bool {
        match choice {
            Choice::Retry => true,
            Choice::Logout => {
                self.logout();
                true
            }
            Choice::Quit => false,
        }
    }

    fn show_load_error(&self, container: &mut Element, err: &ApiError) -> Result<()> {
        let detail = match err {
            ApiError::Graphql { errors, .. } if errors.len() > 1 => Some(
                errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            ApiError::NetworkError(inner) => Some(format!("{:?}", inner)),
            _ => None,
        };
        render_error(container, &err.to_string(), detail.as_deref());
        self.write_page(PAGE_TITLE, container)?;

        eprintln!("\nFailed to load profile: {}", err);
        if err.is_auth_error() {
            eprintln!("Your session may have ended; logging out and in again can help.");
        }
        eprintln!("Error page written to {}\n", self.output.display());
        Ok(())
    }

    fn write_page(&self, title: &str, body: &Element) -> Result<()> {
        if let Some(parent) = self.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&self.output, document(title, body))
            .with_context(|| format!("Failed to write {}", self.output.display()))?;
        Ok(())
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Prompt until a sign-in succeeds
    pub async fn login(&mut self) -> Result<()> {
        let mut view = TerminalLoginView::new();
        render_login(&mut view);

        loop {
            let default_user = std::env::var(ENV_USERNAME)
                .ok()
                .or_else(|| self.config.last_username.clone());
            let username = terminal::prompt_username(default_user.as_deref())?;
            let password = match self.env_password.take() {
                Some(password) => password,
                None => terminal::prompt_password()?,
            };
            let form = LoginForm::new(username, password);

            match submit_login(&self.api, &mut view, &mut self.store, &form).await {
                Ok(()) => {
                    self.remember_username(form.identifier.trim());
                    println!("Login successful!\n");
                    return Ok(());
                }
                Err(LoginError::MissingFields) => continue,
                Err(LoginError::Api(e)) => {
                    debug!(error = %e, "Sign-in rejected, prompting again");
                    continue;
                }
            }
        }
    }

    fn remember_username(&mut self, username: &str) {
        if self.config.last_username.as_deref() == Some(username) {
            return;
        }
        self.config.last_username = Some(username.to_string());
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }

    pub fn logout(&mut self) {
        self.store.remove_token();
        info!("Logged out");
        println!("Logged out.");
    }

    /// Print the session state
    pub fn status(&mut self) {
        let authenticated = self.store.is_authenticated();
        println!("Authenticated: {}", if authenticated { "yes" } else { "no" });
        if authenticated {
            if let Some(user_id) = self.store.user_id() {
                println!("User id:       {}", user_id);
            }
            let expiry = self
                .store
                .claims()
                .as_ref()
                .and_then(token::expiry)
                .and_then(|exp| Utc.timestamp_opt(exp as i64, 0).single());
            if let Some(expiry) = expiry {
                println!("Expires:       {}", expiry.format("%Y-%m-%d %H:%M UTC"));
            }
        }
        println!("Token storage: {:?}", self.config.token_storage);
        println!("Sign-in URL:   {}", self.config.signin_endpoint);
        println!("GraphQL URL:   {}", self.config.graphql_endpoint);
        println!("Output:        {}", self.output.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlprofile_core::auth::MemoryStorage;

    fn app(storage: MemoryStorage, output: PathBuf) -> App {
        let config = Config {
            signin_endpoint: "http://127.0.0.1:9/signin".to_string(),
            graphql_endpoint: "http://127.0.0.1:9/graphql".to_string(),
            ..Config::default()
        };
        App::from_parts(config, Box::new(storage), output).expect("app")
    }

    #[test]
    fn test_logout_clears_token() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(MemoryStorage::with_value("a.b.c"), dir.path().join("out.html"));
        app.logout();
        assert_eq!(app.store.get_token(), None);
    }

    #[test]
    fn test_write_page_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nested").join("profile.html");
        let app = app(MemoryStorage::new(), output.clone());

        let mut container = Element::div("container");
        render_loading(&mut container);
        app.write_page(PAGE_TITLE, &container).unwrap();

        let html = std::fs::read_to_string(output).unwrap();
        assert!(html.contains("Loading profile..."));
        assert!(html.contains("<title>GraphQL Profile</title>"));
    }

    #[test]
    fn test_load_error_page() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("profile.html");
        let app = app(MemoryStorage::new(), output.clone());

        let mut container = Element::div("container");
        app.show_load_error(&mut container, &ApiError::AccessDenied)
            .unwrap();

        let html = std::fs::read_to_string(output).unwrap();
        assert!(html.contains("Failed to load profile"));
        assert!(html.contains("access forbidden"));
        assert!(html.contains("gqlprofile logout"));
    }

    /// Token with the given base64url payload segment
    fn token(payload: &str) -> String {
        format!("header.{}.signature", payload)
    }

    // {"exp":1}
    const EXPIRED_PAYLOAD: &str = "eyJleHAiOjF9";
    // {"sub":"12"}
    const NO_EXPIRY_PAYLOAD: &str = "eyJzdWIiOiIxMiJ9";

    #[test]
    fn test_auth_gate_clears_expired_token() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(
            MemoryStorage::with_value(token(EXPIRED_PAYLOAD)),
            dir.path().join("out.html"),
        );
        assert!(!app.auth_gate());
        assert_eq!(app.store.get_token(), None);
        // The gate runs before anything is rendered
        assert!(!dir.path().join("out.html").exists());
    }

    #[test]
    fn test_auth_gate_accepts_valid_token() {
        let dir = tempfile::tempdir().unwrap();
        let value = token(NO_EXPIRY_PAYLOAD);
        let mut app = app(MemoryStorage::with_value(value.clone()), dir.path().join("out.html"));
        assert!(app.auth_gate());
        assert_eq!(app.store.get_token(), Some(value));
    }

    #[tokio::test]
    async fn test_failed_load_writes_error_page() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("profile.html");
        let mut app = app(MemoryStorage::with_value(token(NO_EXPIRY_PAYLOAD)), output.clone());

        // Nothing listens on the discard port
        let pass = app.render_once().await.unwrap();
        assert!(matches!(pass, Pass::Failed));

        let html = std::fs::read_to_string(output).unwrap();
        assert!(html.contains("Failed to load profile"));
        assert!(app.store.get_token().is_some());
    }

    #[test]
    fn test_choices_after_error() {
        let dir = tempfile::tempdir().unwrap();
        let value = token(NO_EXPIRY_PAYLOAD);
        let mut app = app(MemoryStorage::with_value(value.clone()), dir.path().join("out.html"));

        assert!(app.after_error(Choice::Retry));
        assert_eq!(app.store.get_token(), Some(value));

        assert!(!app.after_error(Choice::Quit));

        assert!(app.after_error(Choice::Logout));
        assert_eq!(app.store.get_token(), None);
        // After logout the gate sends the next pass to login
        assert!(!app.auth_gate());
    }
}
