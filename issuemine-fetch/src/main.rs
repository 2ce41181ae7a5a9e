//! issuemine-fetch - Closed-issue ingestion binary
//!
//! Fetches closed issues from a GitHub repository page by page and upserts
//! them into the shared `issues` table. `GITHUB_TOKEN` must be set; there is
//! no credential fallback.

use anyhow::Result;
use clap::Parser;
use issuemine_common::{config, db};
use issuemine_fetch::{GithubClient, IngestOptions};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "issuemine-fetch", about = "Ingest closed GitHub issues into the issues table")]
struct Args {
    /// Path to the pipeline database
    #[arg(long, env = "ISSUEMINE_DB", default_value = "issues.db")]
    database: PathBuf,

    /// Repository owner
    #[arg(long, default_value = "flutter")]
    owner: String,

    /// Repository name
    #[arg(long, default_value = "flutter")]
    repo: String,

    /// Target number of issues to ingest (may overshoot by up to one page)
    #[arg(long, default_value_t = 300)]
    total: u32,

    /// Page size, 1..=100
    #[arg(long, default_value_t = 100)]
    per_page: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting issuemine-fetch v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let token = config::require_env(config::GITHUB_TOKEN_VAR)?;

    let pool = db::connect(&args.database).await?;
    let client = GithubClient::new(token)?;

    let opts = IngestOptions {
        owner: args.owner,
        repo: args.repo,
        total: args.total,
        per_page: args.per_page,
    };

    let summary = issuemine_fetch::ingest::run(&pool, &client, &opts).await?;
    pool.close().await;

    println!(
        "Fetched {} closed issues: {} inserted, {} already present, {} skipped",
        summary.fetched, summary.inserted, summary.already_present, summary.skipped
    );

    Ok(())
}
