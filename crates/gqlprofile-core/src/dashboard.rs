//! Dashboard data loading.
//!
//! A load issues the three dashboard queries as one concurrent batch and
//! aggregates the result into a `Profile`. Every load takes a ticket from a
//! shared `LoadGeneration`; a result that arrives after a newer load began
//! is discarded as `LoadOutcome::Stale`, whether it succeeded or failed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::queries::{COMPLETE_PROFILE, USER_LEVEL, USER_SKILLS};
use crate::api::{ApiClient, ApiError, GraphqlRequest};
use crate::auth::{TokenStorage, TokenStore};
use crate::models::{LevelData, ProfileData, SkillsData};
use crate::profile::Profile;

/// Monotonic load counter
#[derive(Debug, Default)]
pub struct LoadGeneration {
    current: AtomicU64,
}

impl LoadGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load and return its ticket
    pub fn begin(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// True while no newer load has begun
    pub fn is_current(&self, ticket: u64) -> bool {
        self.current.load(Ordering::SeqCst) == ticket
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub enum LoadOutcome {
    Ready(Box<Profile>),
    /// Superseded by a newer load; the result was dropped
    Stale,
}

/// Requests of one dashboard load, in the order `parse_batch` expects
pub fn dashboard_requests() -> [GraphqlRequest; 3] {
    [
        GraphqlRequest::new(COMPLETE_PROFILE),
        GraphqlRequest::new(USER_LEVEL),
        GraphqlRequest::new(USER_SKILLS),
    ]
}

fn parse_data<T: DeserializeOwned>(name: &str, response: &Value) -> Result<T, ApiError> {
    let data = response
        .get("data")
        .ok_or_else(|| ApiError::InvalidResponse(format!("{} response has no data", name)))?;
    serde_json::from_value(data.clone())
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {} data: {}", name, e)))
}

/// Aggregate the batch responses (profile, level, skills) into a profile
pub fn parse_batch(responses: &[Value]) -> Result<Profile, ApiError> {
    let [profile, level, skills] = responses else {
        return Err(ApiError::InvalidResponse(format!(
            "expected 3 responses, got {}",
            responses.len()
        )));
    };
    let profile: ProfileData = parse_data("profile", profile)?;
    let level: LevelData = parse_data("level", level)?;
    let skills: SkillsData = parse_data("skills", skills)?;
    Ok(Profile::build(&profile, &level, &skills))
}

/// Map a finished load to its outcome, dropping superseded results
pub fn settle(
    generation: &LoadGeneration,
    ticket: u64,
    result: Result<Profile, ApiError>,
) -> Result<LoadOutcome, ApiError> {
    if !generation.is_current(ticket) {
        match &result {
            Ok(_) => debug!(ticket, "Discarding superseded profile load"),
            Err(e) => debug!(ticket, error = %e, "Discarding superseded load error"),
        }
        return Ok(LoadOutcome::Stale);
    }
    result.map(|profile| LoadOutcome::Ready(Box::new(profile)))
}

/// Fetches and aggregates the dashboard data
pub struct DashboardLoader {
    api: ApiClient,
    generation: Arc<LoadGeneration>,
}

impl DashboardLoader {
    pub fn new(api: ApiClient) -> Self {
        Self::with_generation(api, Arc::new(LoadGeneration::new()))
    }

    pub fn with_generation(api: ApiClient, generation: Arc<LoadGeneration>) -> Self {
        Self { api, generation }
    }

    pub fn generation(&self) -> &Arc<LoadGeneration> {
        &self.generation
    }

    /// Load the dashboard for the token held by `store`
    pub async fn load<S: TokenStorage>(
        &self,
        store: &TokenStore<S>,
    ) -> Result<LoadOutcome, ApiError> {
        let ticket = self.generation.begin();
        let result = self.fetch(store).await;
        settle(&self.generation, ticket, result)
    }

    async fn fetch<S: TokenStorage>(&self, store: &TokenStore<S>) -> Result<Profile, ApiError> {
        let token = store.get_token().ok_or(ApiError::MissingToken)?;
        match store.user_id() {
            Some(user_id) => info!(%user_id, "Loading profile"),
            None => warn!("Token carries no user id"),
        }

        let api = self.api.with_token(token);
        let responses = api.graphql_batch(&dashboard_requests()).await?;
        let profile = parse_batch(&responses)?;
        debug!(
            login = %profile.login,
            projects = profile.total_projects,
            xp = profile.total_xp,
            "Profile loaded"
        );
        Ok(profile)
    }
}
