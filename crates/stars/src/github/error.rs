//! GitHub API error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::gateway::GatewayError;

/// Errors that can occur when interacting with the GitHub API.
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limit exceeded. Resets at {reset_at}")]
    RateLimited { reset_at: DateTime<Utc> },

    #[error("Authentication required")]
    AuthRequired,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unexpected HTTP status {status} for {route}")]
    UnexpectedStatus { status: u16, route: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<GitHubError> for GatewayError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::RateLimited { reset_at } => GatewayError::RateLimited { reset_at },
            GitHubError::AuthRequired => GatewayError::AuthRequired,
            GitHubError::NotFound(resource) => GatewayError::not_found(resource),
            GitHubError::Http(e) if e.is_connect() || e.is_timeout() => {
                GatewayError::network(e.to_string())
            }
            GitHubError::Http(e) => GatewayError::api(e.to_string()),
            GitHubError::Api(e) => GatewayError::api(e.to_string()),
            e @ GitHubError::UnexpectedStatus { .. } => GatewayError::api(e.to_string()),
            GitHubError::Internal(msg) => GatewayError::internal(msg),
        }
    }
}
