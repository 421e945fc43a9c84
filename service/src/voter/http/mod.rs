//! HTTP handlers for the voter-facing surface
//!
//! Form-encoded request bodies, JSON responses. Handlers read a
//! [`VoterContext`] from the request extensions; the logged-in account comes
//! from the session cookie via [`session::CurrentAccount`].

pub mod accounts;
pub mod bills;
pub mod categories;
pub mod legislators;
pub mod session;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::repo::{AccountRepoError, RepoError, VoterRepo};
use super::service::ServiceError;
use crate::civic::CivicApiClient;
use crate::config::SessionConfig;
use crate::congress::CongressApiClient;

/// Collaborators shared by every handler.
#[derive(Clone)]
pub struct VoterContext {
    pub repo: Arc<dyn VoterRepo>,
    pub congress: Arc<dyn CongressApiClient>,
    pub civic: Arc<dyn CivicApiClient>,
    pub session: SessionSettings,
}

/// Session cookie settings.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub ttl: Duration,
    pub secure: bool,
}

impl From<&SessionConfig> for SessionSettings {
    fn from(config: &SessionConfig) -> Self {
        Self {
            cookie_name: config.cookie_name.clone(),
            ttl: Duration::from_secs(config.ttl_seconds),
            secure: config.secure,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Outcome message for an action that succeeded
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match &self {
            Self::Validation(_) => error_response(StatusCode::BAD_REQUEST, &self.to_string()),
            Self::InvalidCredentials(_) | Self::Unauthenticated => {
                error_response(StatusCode::UNAUTHORIZED, &self.to_string())
            }
            Self::NotFound(_)
            | Self::Repo(RepoError::NotFound)
            | Self::Account(AccountRepoError::NotFound) => {
                error_response(StatusCode::NOT_FOUND, &self.to_string())
            }
            Self::AccountExists | Self::Account(AccountRepoError::DuplicateScreenName) => {
                error_response(StatusCode::CONFLICT, &Self::AccountExists.to_string())
            }
            Self::Congress(e) => {
                tracing::warn!(error = %e, "Legislative API request failed");
                error_response(StatusCode::BAD_GATEWAY, "Upstream legislative service error")
            }
            Self::Civic(e) => {
                tracing::warn!(error = %e, "Geocoding API request failed");
                error_response(StatusCode::BAD_GATEWAY, "Upstream geocoding service error")
            }
            Self::Repo(RepoError::Database(_) | RepoError::DuplicateBillUri(_))
            | Self::Account(AccountRepoError::Database(_))
            | Self::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

/// Routes for the voter-facing surface.
pub fn router() -> Router {
    Router::new()
        .route("/", get(accounts::home))
        .route("/register", post(accounts::register))
        .route("/login", post(accounts::login))
        .route("/logout", post(accounts::logout))
        .route("/profile", get(accounts::profile))
        .route("/representatives", get(legislators::representatives))
        .route("/congress", get(legislators::congress))
        .route("/categories", get(categories::list_categories))
        .route("/categories/add", post(categories::add_categories))
        .route("/categories/remove", post(categories::remove_categories))
        .route("/categories/{id}/bills", get(categories::category_bills))
        .route("/bills/{bill_id}", get(bills::bill_detail))
}
