//! issuemine-metrics - Resolution-time backfill binary

use anyhow::Result;
use clap::Parser;
use issuemine_common::db;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "issuemine-metrics",
    about = "Backfill hour-granularity resolution time for closed issues"
)]
struct Args {
    /// Path to the pipeline database
    #[arg(long, env = "ISSUEMINE_DB", default_value = "issues.db")]
    database: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting issuemine-metrics v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let pool = db::connect(&args.database).await?;

    let updated = issuemine_metrics::backfill_resolution_hours(&pool).await?;
    pool.close().await;

    println!("{} issues updated with resolution time in hours", updated);

    Ok(())
}
