//! API client for the sign-in and GraphQL endpoints.
//!
//! This module provides the `ApiClient` struct: a Basic-auth token exchange
//! and an authenticated GraphQL query runner with a concurrent batch mode.

use futures::future::try_join_all;
use reqwest::{header, Client, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::auth::login::Credentials;
use crate::auth::token;
use crate::config::Endpoints;

use super::error::{ApiError, Endpoint, GraphqlError};

/// A query document plus its variables, serialized as the POST body
#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: Value,
}

impl GraphqlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Value::Object(Default::default()),
        }
    }

    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = variables;
        self
    }
}

/// API client for the profile backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    endpoints: Endpoints,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(endpoints: Endpoints) -> Result<Self, ApiError> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            endpoints,
            token: None,
        })
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            endpoints: self.endpoints.clone(),
            token: Some(token),
        }
    }

    /// Exchange credentials for a bearer token.
    /// The returned token is cleaned and has the three-segment shape.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<String, ApiError> {
        debug!(url = %self.endpoints.signin, "Sending sign-in request");

        let response = self
            .client
            .post(&self.endpoints.signin)
            .header(header::AUTHORIZATION, credentials.basic_auth_header())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        interpret_signin_response(status, &body)
    }

    /// Run one query with the given variables
    pub async fn graphql(&self, query: &str, variables: Value) -> Result<Value, ApiError> {
        self.execute(&GraphqlRequest::new(query).with_variables(variables))
            .await
    }

    /// Run one prepared request
    pub async fn execute(&self, request: &GraphqlRequest) -> Result<Value, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::MissingToken)?;

        let response = self
            .client
            .post(&self.endpoints.graphql)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        Self::read_graphql_response(response).await
    }

    /// Run several requests concurrently.
    /// Results come back in input order; the first failure fails the batch.
    pub async fn graphql_batch(&self, requests: &[GraphqlRequest]) -> Result<Vec<Value>, ApiError> {
        if self.token.is_none() {
            return Err(ApiError::MissingToken);
        }
        debug!(count = requests.len(), "Sending GraphQL batch");
        try_join_all(requests.iter().map(|request| self.execute(request))).await
    }

    async fn read_graphql_response(response: Response) -> Result<Value, ApiError> {
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;
        interpret_graphql_response(status, content_type.as_deref(), &body)
    }
}

/// Map a sign-in response to a token or an error
pub fn interpret_signin_response(status: u16, body: &str) -> Result<String, ApiError> {
    if !(200..300).contains(&status) {
        return Err(ApiError::from_status(Endpoint::SignIn, status, body));
    }

    let token = token::clean_token(body);
    if !token::has_token_shape(&token) {
        error!(segments = token.split('.').count(), "Sign-in returned a malformed token");
        return Err(ApiError::InvalidToken);
    }
    Ok(token)
}

/// Map a GraphQL response to its parsed body or an error
pub fn interpret_graphql_response(
    status: u16,
    content_type: Option<&str>,
    body: &str,
) -> Result<Value, ApiError> {
    if !(200..300).contains(&status) {
        return Err(ApiError::from_status(Endpoint::Graphql, status, body));
    }

    let content_type = content_type.unwrap_or("none");
    if !content_type.to_ascii_lowercase().contains("json") {
        return Err(ApiError::NotJson(content_type.to_string()));
    }

    let parsed: Value = serde_json::from_str(body)
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse JSON: {}", e)))?;

    if let Some(errors) = parsed.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            let errors: Vec<GraphqlError> = errors
                .iter()
                .map(|e| GraphqlError {
                    message: e
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                })
                .collect();
            let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
            error!(?messages, "GraphQL errors returned");
            return Err(ApiError::from_graphql_errors(errors));
        }
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_graphql_request_body_shape() {
        let request = GraphqlRequest::new("query { user { id } }");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, json!({"query": "query { user { id } }", "variables": {}}));

        let request = request.with_variables(json!({"id": 1}));
        assert_eq!(serde_json::to_value(&request).unwrap()["variables"]["id"], 1);
    }

    #[test]
    fn test_graphql_errors_fail_despite_200() {
        let body = r#"{"errors": [{"message": "boom"}], "data": null}"#;
        let err = interpret_graphql_response(200, Some("application/json"), body).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_graphql_empty_errors_returns_payload() {
        let body = r#"{"errors": [], "data": {"user": []}}"#;
        let value = interpret_graphql_response(200, Some("application/json; charset=utf-8"), body)
            .expect("Empty errors array should not fail");
        assert!(value["data"]["user"].is_array());
    }

    #[test]
    fn test_graphql_status_errors() {
        let err = interpret_graphql_response(401, Some("application/json"), "{}").unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
        let err = interpret_graphql_response(403, None, "").unwrap_err();
        assert!(matches!(err, ApiError::AccessDenied));
        let err = interpret_graphql_response(500, None, "oops").unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
    }

    #[test]
    fn test_graphql_rejects_non_json() {
        let err = interpret_graphql_response(200, Some("text/html"), "<html>").unwrap_err();
        assert!(matches!(err, ApiError::NotJson(ref ct) if ct == "text/html"));
        let err = interpret_graphql_response(200, None, "{}").unwrap_err();
        assert!(matches!(err, ApiError::NotJson(_)));
    }

    #[test]
    fn test_graphql_malformed_json() {
        let err = interpret_graphql_response(200, Some("application/json"), "{oops").unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn test_signin_response() {
        assert_eq!(
            interpret_signin_response(200, "\"aaa.bbb.ccc\"\n").unwrap(),
            "aaa.bbb.ccc"
        );
        assert!(matches!(
            interpret_signin_response(200, "\"not-a-token\"").unwrap_err(),
            ApiError::InvalidToken
        ));
        assert!(matches!(
            interpret_signin_response(401, "").unwrap_err(),
            ApiError::InvalidCredentials
        ));
        assert!(matches!(
            interpret_signin_response(403, "").unwrap_err(),
            ApiError::AccessDenied
        ));
        assert!(matches!(
            interpret_signin_response(500, "").unwrap_err(),
            ApiError::Status { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn test_graphql_without_token_fails_fast() {
        let client = ApiClient::new(Endpoints {
            signin: "http://127.0.0.1:9/signin".to_string(),
            graphql: "http://127.0.0.1:9/graphql".to_string(),
        })
        .unwrap();
        let err = client.graphql("query { user { id } }", json!({})).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingToken));
        let err = client.graphql_batch(&[GraphqlRequest::new("query { a }")]).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingToken));
    }
}
