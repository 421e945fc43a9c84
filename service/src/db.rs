use sqlx_core::migrate::Migrator;
use sqlx_postgres::{PgPool, PgPoolOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::DatabaseConfig;

/// Connect to the database, retrying while it comes up.
///
/// Retries with exponential backoff (500 ms doubling, capped at 30 s) for up
/// to 60 s before giving up.
///
/// # Errors
///
/// Returns the last connection error once the retry budget is spent.
pub async fn connect_with_retry(config: &DatabaseConfig) -> Result<PgPool, anyhow::Error> {
    let retry_deadline = Duration::from_secs(60); // overall retry budget
    let max_interval = Duration::from_secs(30); // cap single waits
    let mut delay = Duration::from_millis(500);
    let start = Instant::now();
    let database_url = config.connection_url();

    loop {
        info!(host = %config.host, name = %config.name, "Attempting to connect to Postgres...");

        match PgPoolOptions::new()
            .max_connections(config.max_connections)
            // Allow extra time to acquire a connection during startup bursts
            .acquire_timeout(Duration::from_secs(30))
            .connect(&database_url)
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(err) => {
                if start.elapsed() >= retry_deadline {
                    warn!(error = %err, "Postgres not ready; retries exhausted");
                    return Err(err.into());
                }

                warn!(error = %err, "Postgres not ready yet; retrying");
                sleep(delay).await;
                delay = (delay.saturating_mul(2)).min(max_interval);
            }
        }
    }
}

fn migrations_path(config: &DatabaseConfig) -> PathBuf {
    config.migrations_dir.as_ref().map_or_else(
        || Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/migrations")).to_path_buf(),
        PathBuf::from,
    )
}

/// Apply pending migrations.
///
/// # Errors
///
/// Returns an error if the migrations cannot be loaded or applied.
pub async fn run_migrations(pool: &PgPool, config: &DatabaseConfig) -> Result<(), anyhow::Error> {
    let migrator = Migrator::new(migrations_path(config)).await?;
    migrator.run(pool).await?;
    info!("Migrations applied");
    Ok(())
}

/// Connect to the database and run migrations
///
/// # Errors
///
/// Returns an error if the database stays unreachable or a migration fails.
pub async fn setup_database(config: &DatabaseConfig) -> Result<PgPool, anyhow::Error> {
    let pool = connect_with_retry(config).await?;
    info!("Database connected");
    run_migrations(&pool, config).await?;
    Ok(pool)
}
