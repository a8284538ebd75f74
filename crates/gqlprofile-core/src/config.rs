//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the endpoint URLs, the token storage backend, the output
//! path of the rendered dashboard and the last used username.
//!
//! Configuration is stored at `~/.config/gqlprofile/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "gqlprofile";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const SIGNIN_ENDPOINT: &str = "https://learn.zone01oujda.ma/api/auth/signin";
pub const GRAPHQL_ENDPOINT: &str = "https://learn.zone01oujda.ma/api/graphql-engine/v1/graphql";

/// Default file the dashboard is written to
const DEFAULT_OUTPUT: &str = "profile.html";

const ENV_SIGNIN_URL: &str = "GQLPROFILE_SIGNIN_URL";
const ENV_GRAPHQL_URL: &str = "GQLPROFILE_GRAPHQL_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub signin: String,
    pub graphql: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Keyring,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub signin_endpoint: String,
    pub graphql_endpoint: String,
    pub token_storage: StorageBackend,
    pub output_path: PathBuf,
    pub last_username: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            signin_endpoint: SIGNIN_ENDPOINT.to_string(),
            graphql_endpoint: GRAPHQL_ENDPOINT.to_string(),
            token_storage: StorageBackend::default(),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            last_username: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the token file and the log
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Apply `GQLPROFILE_*_URL` overrides from the environment
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_SIGNIN_URL) {
            debug!(%url, "Sign-in endpoint overridden from environment");
            self.signin_endpoint = url;
        }
        if let Ok(url) = std::env::var(ENV_GRAPHQL_URL) {
            debug!(%url, "GraphQL endpoint overridden from environment");
            self.graphql_endpoint = url;
        }
        self
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            signin: self.signin_endpoint.clone(),
            graphql: self.graphql_endpoint.clone(),
        }
    }
}
