//! issuemine-classify - LLM topic labeling
//!
//! Scans issues without a topic, asks the chat model to classify the body
//! into one of the canonical themes, validates the answer, and writes it
//! back. One call and at most one write per record, strictly sequential.
//! A topic, once set, is never revisited (the scan selects `topic IS NULL`).

pub mod normalize;
pub mod openai;

use issuemine_common::{Result, Topic};
use openai::ChatClient;
use sqlx::SqlitePool;
use tracing::{info, warn};

pub use openai::OpenAiError;

/// Per-run outcome counts.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassifySummary {
    /// Rows given a canonical topic.
    pub classified: u64,
    /// Responses that failed validation; nothing written.
    pub rejected: u64,
    /// Classification calls that errored; nothing written.
    pub failed: u64,
}

/// Build the fixed classification prompt around an issue body.
pub fn build_prompt(body: &str) -> String {
    let mut themes = String::new();
    for topic in Topic::ALL {
        themes.push_str(topic.marker());
        themes.push(' ');
        themes.push_str(topic.as_str());
        themes.push('\n');
    }

    format!(
        "Classifique o seguinte texto em um dos seguintes temas:\n{themes}\nTexto: {body}\n\n\
         Responda apenas com o nome do tema correspondente, sem números ou outros detalhes."
    )
}

/// Classify every issue whose `topic` is unset, regardless of state.
///
/// A per-record failure (network, malformed response, invalid label) is
/// logged and counted; the batch continues.
pub async fn run(pool: &SqlitePool, client: &ChatClient) -> Result<ClassifySummary> {
    let rows: Vec<(i64, Option<String>)> =
        sqlx::query_as("SELECT id, body FROM issues WHERE topic IS NULL")
            .fetch_all(pool)
            .await?;

    info!(count = rows.len(), "Classifying unlabeled issues");

    let mut summary = ClassifySummary::default();

    for (id, body) in rows {
        let prompt = build_prompt(body.as_deref().unwrap_or(""));

        match client.complete(&prompt).await {
            Ok(raw) => match normalize::normalize_response(&raw) {
                Some(topic) => {
                    sqlx::query("UPDATE issues SET topic = ? WHERE id = ?")
                        .bind(topic.as_str())
                        .bind(id)
                        .execute(pool)
                        .await?;
                    info!(id, topic = topic.as_str(), "Issue classified");
                    summary.classified += 1;
                }
                None => {
                    warn!(id, response = %raw, "Rejected non-canonical classification");
                    summary.rejected += 1;
                }
            },
            Err(e) => {
                warn!(id, error = %e, "Classification call failed");
                summary.failed += 1;
            }
        }
    }

    info!(
        classified = summary.classified,
        rejected = summary.rejected,
        failed = summary.failed,
        "Classification finished"
    );

    Ok(summary)
}
