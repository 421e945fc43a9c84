//! Test app builder that mirrors main.rs wiring with injectable collaborators.
//!
//! # Usage
//!
//! ```ignore
//! use crate::common::app_builder::TestAppBuilder;
//!
//! #[tokio::test]
//! async fn test_with_full_app() {
//!     let repo = Arc::new(MockVoterRepo::new());
//!     let app = TestAppBuilder::with_mocks().with_repo(repo.clone()).build();
//!
//!     // Use app.oneshot(...) to send requests
//! }
//! ```
//!
//! # Preset Builders
//!
//! - [`TestAppBuilder::minimal()`] - Health check only
//! - [`TestAppBuilder::with_mocks()`] - Full app with mock repository and API clients

use std::sync::Arc;

use axum::{http::StatusCode, middleware, response::IntoResponse, routing::get, Extension, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use voterinfo_api::{
    civic::{mock::MockCivicClient, CivicApiClient},
    config::SecurityHeadersConfig,
    congress::{mock::MockCongressClient, CongressApiClient},
    http::{cors_layer, security_headers_middleware, SecurityHeaders},
    rest::ApiDoc,
    voter::{
        self,
        http::{SessionSettings, VoterContext},
        repo::{mock::MockVoterRepo, VoterRepo},
    },
};

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Builder for test applications that mirrors main.rs wiring.
pub struct TestAppBuilder {
    include_voter: bool,
    include_health: bool,
    include_swagger: bool,
    repo: Arc<dyn VoterRepo>,
    congress: Arc<dyn CongressApiClient>,
    civic: Arc<dyn CivicApiClient>,
    session: SessionSettings,
    cors_origins: Option<Vec<String>>,
    security_headers: Option<SecurityHeadersConfig>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            include_voter: false,
            include_health: false,
            include_swagger: false,
            repo: Arc::new(MockVoterRepo::new()),
            congress: Arc::new(MockCongressClient::new()),
            civic: Arc::new(MockCivicClient::new()),
            session: SessionSettings::default(),
            cors_origins: None,
            security_headers: None,
        }
    }

    // =========================================================================
    // Preset Builders
    // =========================================================================

    /// Only the health check endpoint.
    #[must_use]
    pub fn minimal() -> Self {
        Self::new().with_health()
    }

    /// All routes, CORS and security headers, backed by fresh mocks.
    #[must_use]
    pub fn with_mocks() -> Self {
        Self::new()
            .with_voter_routes()
            .with_health()
            .with_swagger()
            .with_cors(&["http://localhost:3000"])
            .with_security_headers_default()
    }

    // =========================================================================
    // Component Configuration
    // =========================================================================

    #[must_use]
    pub fn with_voter_routes(mut self) -> Self {
        self.include_voter = true;
        self
    }

    #[must_use]
    pub fn with_health(mut self) -> Self {
        self.include_health = true;
        self
    }

    #[must_use]
    pub fn with_swagger(mut self) -> Self {
        self.include_swagger = true;
        self
    }

    #[must_use]
    pub fn with_repo(mut self, repo: Arc<dyn VoterRepo>) -> Self {
        self.repo = repo;
        self
    }

    #[must_use]
    pub fn with_congress(mut self, congress: Arc<dyn CongressApiClient>) -> Self {
        self.congress = congress;
        self
    }

    #[must_use]
    pub fn with_civic(mut self, civic: Arc<dyn CivicApiClient>) -> Self {
        self.civic = civic;
        self
    }

    #[must_use]
    pub fn with_session(mut self, session: SessionSettings) -> Self {
        self.session = session;
        self
    }

    /// Pass an empty slice to block all cross-origin requests,
    /// `&["*"]` to allow any origin.
    #[must_use]
    pub fn with_cors(mut self, origins: &[&str]) -> Self {
        self.cors_origins = Some(origins.iter().map(|s| (*s).to_string()).collect());
        self
    }

    #[must_use]
    pub fn with_security_headers_default(mut self) -> Self {
        self.security_headers = Some(SecurityHeadersConfig::default());
        self
    }

    #[must_use]
    pub fn with_security_headers(mut self, config: SecurityHeadersConfig) -> Self {
        self.security_headers = Some(config);
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Build the router with the same layer order as main.rs.
    #[must_use]
    pub fn build(self) -> Router {
        let mut app = Router::new();

        if self.include_voter {
            app = app.merge(voter::http::router());
        }

        if self.include_health {
            app = app.route("/health", get(health_check));
        }

        if self.include_swagger {
            app = app.merge(
                SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
            );
        }

        let ctx = VoterContext {
            repo: self.repo,
            congress: self.congress,
            civic: self.civic,
            session: self.session,
        };
        app = app.layer(Extension(ctx));

        if let Some(origins) = self.cors_origins {
            app = app.layer(cors_layer(&origins));
        }

        if let Some(config) = self.security_headers {
            if config.enabled {
                app = app
                    .layer(middleware::from_fn(security_headers_middleware))
                    .layer(Extension(SecurityHeaders::from_config(&config)));
            }
        }

        app
    }
}
