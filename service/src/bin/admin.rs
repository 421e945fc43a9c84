//! Administrative commands: migrations, category seeding, and upstream
//! ingestion.
//!
//! Reads the same configuration as the server (`config.yaml`, `VI_*`) but
//! validates only the sections a command uses.

#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use voterinfo_api::{
    config::Config,
    congress::HttpCongressClient,
    db::{connect_with_retry, run_migrations, setup_database},
    voter::{
        repo::{CategoryRecord, PgVoterRepo, RepoError, VoterRepo},
        service,
    },
};

const BUNDLED_SUBJECTS: &str = include_str!("../../subjects.txt");

#[derive(Parser, Debug)]
#[command(name = "voterinfo-admin")]
#[command(about = "Seed and ingest data for the voterinfo service")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending database migrations
    Migrate,

    /// Seed policy categories from a newline-separated subject list
    SeedCategories {
        /// Subject list to read (default: the bundled list)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Load in-office Senate and House members from the legislative API
    LoadMembers,

    /// Fetch and store bills for categories
    IngestBills {
        /// Category name to ingest; repeat for several (default: all categories)
        #[arg(long = "category")]
        categories: Vec<String>,
    },
}

fn congress_client(config: &Config) -> Result<HttpCongressClient, anyhow::Error> {
    config
        .validate_congress()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(HttpCongressClient::with_timeout(
        &config.congress.base_url,
        config.congress.congress,
        &config.congress.api_key,
        Duration::from_secs(config.congress.timeout_secs),
    )?)
}

async fn resolve_categories(
    repo: &dyn VoterRepo,
    names: &[String],
) -> Result<Vec<CategoryRecord>, anyhow::Error> {
    if names.is_empty() {
        return Ok(repo.list_categories().await?);
    }

    let mut categories = Vec::with_capacity(names.len());
    for name in names {
        match repo.get_category_by_name(name).await {
            Ok(category) => categories.push(category),
            Err(RepoError::NotFound) => tracing::warn!(category = %name, "Unknown category; skipping"),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(categories)
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    let config = Config::load_unvalidated().map_err(|e| anyhow::anyhow!("{e}"))?;
    config
        .validate_database()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.level)?)
        .init();

    match args.command {
        Command::Migrate => {
            let pool = connect_with_retry(&config.database).await?;
            run_migrations(&pool, &config.database).await?;
        }
        Command::SeedCategories { file } => {
            let subjects = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .map_err(|e| anyhow::anyhow!("reading {}: {e}", path.display()))?,
                None => BUNDLED_SUBJECTS.to_string(),
            };
            let repo = PgVoterRepo::new(setup_database(&config.database).await?);
            service::seed_categories(&repo, &subjects).await?;
        }
        Command::LoadMembers => {
            let repo = PgVoterRepo::new(setup_database(&config.database).await?);
            let congress = congress_client(&config)?;
            let summary = service::load_members(&repo, &congress).await?;
            tracing::info!(
                senate_inserted = summary.senate.inserted,
                house_inserted = summary.house.inserted,
                "Member ingestion finished"
            );
        }
        Command::IngestBills { categories } => {
            let repo = PgVoterRepo::new(setup_database(&config.database).await?);
            let congress = congress_client(&config)?;
            let categories = resolve_categories(&repo, &categories).await?;
            let summary = service::ingest_categories(&repo, &congress, &categories).await;
            tracing::info!(
                ingested = summary.ingested,
                no_results = summary.no_results,
                failed = summary.failed,
                inserted = summary.bills_inserted,
                linked = summary.links_inserted,
                "Bill ingestion finished"
            );
            if summary.failed > 0 {
                anyhow::bail!("{} categories failed to ingest", summary.failed);
            }
        }
    }

    Ok(())
}
