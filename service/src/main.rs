#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{http::StatusCode, middleware, response::IntoResponse, routing::get, Extension, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use voterinfo_api::{
    civic::HttpCivicClient,
    config::Config,
    congress::HttpCongressClient,
    db::setup_database,
    http::{cors_layer, security_headers_middleware, SecurityHeaders},
    rest::ApiDoc,
    voter::{
        self,
        http::{SessionSettings, VoterContext},
        repo::PgVoterRepo,
    },
};

// Health check handler
async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load and validate configuration first (fail-fast)
    let config = Config::load().map_err(|e| anyhow::anyhow!("{e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.level)?)
        .init();

    // Init banner so container logs clearly show startup
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "voterinfo-api starting up"
    );

    tracing::info!("Connecting to database...");
    let pool = setup_database(&config.database).await?;

    let congress = HttpCongressClient::with_timeout(
        &config.congress.base_url,
        config.congress.congress,
        &config.congress.api_key,
        Duration::from_secs(config.congress.timeout_secs),
    )?;
    let civic = HttpCivicClient::with_timeout(
        &config.civic.base_url,
        &config.civic.api_key,
        Duration::from_secs(config.civic.timeout_secs),
    )?;

    let ctx = VoterContext {
        repo: Arc::new(PgVoterRepo::new(pool)),
        congress: Arc::new(congress),
        civic: Arc::new(civic),
        session: SessionSettings::from(&config.session),
    };

    let mut app = Router::new()
        .merge(voter::http::router())
        .route("/health", get(health_check));

    if config.swagger.enabled {
        tracing::info!("Swagger UI enabled at /swagger-ui");
        app = app.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    let mut app = app
        .layer(Extension(ctx))
        .layer(cors_layer(&config.cors.allowed_origins))
        .layer(TraceLayer::new_for_http());

    if config.security_headers.enabled {
        tracing::info!("Security headers enabled");
        app = app
            .layer(middleware::from_fn(security_headers_middleware))
            .layer(Extension(SecurityHeaders::from_config(&config.security_headers)));
    } else {
        tracing::info!("Security headers disabled");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
