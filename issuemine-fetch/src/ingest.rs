//! Pagination driver
//!
//! Walks pages starting at 1 until the listing runs out or the target count
//! is reached. Each item is normalized and upserted individually, so an
//! interrupted run leaves all completed writes durable and a rerun relies on
//! insert-or-ignore to skip already-stored ids.

use crate::github::GithubClient;
use crate::transform;
use issuemine_common::{db, Result};
use sqlx::SqlitePool;
use tracing::{info, warn};

pub struct IngestOptions {
    pub owner: String,
    pub repo: String,
    /// Target total number of issues. The final fetched count may overshoot
    /// this by up to one page.
    pub total: u32,
    pub per_page: u32,
}

/// Per-run outcome counts.
#[derive(Debug, Default, Clone, Copy)]
pub struct IngestSummary {
    /// Items seen across all pages (sum of page sizes).
    pub fetched: u64,
    /// Rows newly inserted.
    pub inserted: u64,
    /// Items whose id was already stored (upsert no-op).
    pub already_present: u64,
    /// Items skipped because normalization failed.
    pub skipped: u64,
}

/// Ingest closed issues until the target count is met or pages run out.
///
/// A transport or API failure aborts the run immediately; writes from
/// earlier pages are already committed and stay in place.
pub async fn run(
    pool: &SqlitePool,
    client: &GithubClient,
    opts: &IngestOptions,
) -> Result<IngestSummary> {
    let per_page = opts.per_page.clamp(1, 100);
    let mut summary = IngestSummary::default();
    let mut page: u32 = 1;

    while summary.fetched < u64::from(opts.total) {
        let issues = client
            .fetch_closed_page(&opts.owner, &opts.repo, per_page, page)
            .await?;

        if issues.is_empty() {
            info!(page, "No more pages available");
            break;
        }

        let page_len = issues.len();
        info!(page, count = page_len, "Fetched page of closed issues");

        for raw in issues {
            let issue_id = raw.id;
            match transform::to_record(raw) {
                Ok(record) => {
                    if db::upsert_issue(pool, &record).await? {
                        summary.inserted += 1;
                    } else {
                        summary.already_present += 1;
                    }
                }
                Err(e) => {
                    warn!(issue_id = ?issue_id, error = %e, "Skipping issue that failed to normalize");
                    summary.skipped += 1;
                }
            }
        }

        summary.fetched += page_len as u64;
        page += 1;
    }

    info!(
        fetched = summary.fetched,
        inserted = summary.inserted,
        already_present = summary.already_present,
        skipped = summary.skipped,
        "Ingestion finished"
    );

    Ok(summary)
}
