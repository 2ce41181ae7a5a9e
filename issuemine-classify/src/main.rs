//! issuemine-classify - Topic classification binary
//!
//! `OPENAI_API_KEY` must be set; a missing key is a fatal startup error.

use anyhow::Result;
use clap::Parser;
use issuemine_classify::openai::ChatClient;
use issuemine_common::{config, db};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "issuemine-classify",
    about = "Label stored issues with a topic using an LLM classifier"
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

    info!("Starting issuemine-classify v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let api_key = config::require_env(config::OPENAI_API_KEY_VAR)?;

    let pool = db::connect(&args.database).await?;
    let client = ChatClient::new(api_key)?;

    let summary = issuemine_classify::run(&pool, &client).await?;
    pool.close().await;

    println!(
        "Classified {} issues ({} rejected, {} failed)",
        summary.classified, summary.rejected, summary.failed
    );

    Ok(())
}
