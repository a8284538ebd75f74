use serde::Deserialize;
use thiserror::Error;

/// One entry of a GraphQL `errors` array
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GraphqlError {
    #[serde(default)]
    pub message: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unauthorized, please login again")]
    Unauthorized,

    #[error("access forbidden")]
    AccessDenied,

    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid token received")]
    InvalidToken,

    #[error("no token available, please login first")]
    MissingToken,

    #[error("expected a JSON response but received '{0}'")]
    NotJson(String),

    /// Displays the first message; the full list is kept for logging
    #[error("{message}")]
    Graphql {
        message: String,
        errors: Vec<GraphqlError>,
    },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Which endpoint produced a status error; 401 means different things
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    SignIn,
    Graphql,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let cut = (0..=MAX_ERROR_BODY_LENGTH)
                .rev()
                .find(|i| body.is_char_boundary(*i))
                .unwrap_or(0);
            format!("{}... (truncated, {} total bytes)", &body[..cut], body.len())
        }
    }

    pub fn from_status(endpoint: Endpoint, status: u16, body: &str) -> Self {
        match (endpoint, status) {
            (Endpoint::SignIn, 401) => ApiError::InvalidCredentials,
            (Endpoint::Graphql, 401) => ApiError::Unauthorized,
            (_, 403) => ApiError::AccessDenied,
            _ => ApiError::Status {
                status,
                body: Self::truncate_body(body),
            },
        }
    }

    /// Build a GraphQL error from a non-empty `errors` array
    pub fn from_graphql_errors(errors: Vec<GraphqlError>) -> Self {
        let message = errors
            .first()
            .map(|e| e.message.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "GraphQL request failed".to_string());
        ApiError::Graphql { message, errors }
    }

    /// Authentication failures that a fresh login could fix
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidCredentials
                | ApiError::Unauthorized
                | ApiError::AccessDenied
                | ApiError::MissingToken
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_messages() {
        assert_eq!(
            ApiError::from_status(Endpoint::SignIn, 401, "").to_string(),
            "invalid credentials"
        );
        assert_eq!(
            ApiError::from_status(Endpoint::Graphql, 401, "").to_string(),
            "unauthorized, please login again"
        );
        assert_eq!(
            ApiError::from_status(Endpoint::SignIn, 403, "").to_string(),
            "access forbidden"
        );
        assert_eq!(
            ApiError::from_status(Endpoint::Graphql, 502, "bad gateway").to_string(),
            "request failed with status 502: bad gateway"
        );
    }

    #[test]
    fn test_truncate_body() {
        let body = "x".repeat(MAX_ERROR_BODY_LENGTH + 10);
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.ends_with(&format!("(truncated, {} total bytes)", body.len())));
    }

    #[test]
    fn test_graphql_error_uses_first_message() {
        let err = ApiError::from_graphql_errors(vec![
            GraphqlError { message: "boom".to_string() },
            GraphqlError { message: "second".to_string() },
        ]);
        assert_eq!(err.to_string(), "boom");
        match err {
            ApiError::Graphql { errors, .. } => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_is_auth_error() {
        assert!(ApiError::Unauthorized.is_auth_error());
        assert!(ApiError::MissingToken.is_auth_error());
        assert!(!ApiError::NotJson("text/html".to_string()).is_auth_error());
    }
}
