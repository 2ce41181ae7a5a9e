//! issuemine-metrics - Hour-granularity resolution-time backfill
//!
//! Scans closed issues that have both timestamps but no
//! `resolution_time_hours` yet, computes the elapsed time in fractional
//! hours, and writes it back. The whole pass runs in one transaction with a
//! single commit; a failure anywhere rolls the batch back. Reruns are
//! idempotent because the selection predicate excludes rows that already
//! carry a value.

use chrono::NaiveDateTime;
use issuemine_common::Result;
use sqlx::SqlitePool;
use tracing::info;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Elapsed time between creation and closure in fractional hours.
pub fn resolution_hours(created_at: NaiveDateTime, closed_at: NaiveDateTime) -> f64 {
    (closed_at - created_at).num_seconds() as f64 / SECONDS_PER_HOUR
}

/// Backfill `resolution_time_hours` for all eligible rows.
///
/// Returns the number of rows updated.
pub async fn backfill_resolution_hours(pool: &SqlitePool) -> Result<u64> {
    let rows: Vec<(i64, NaiveDateTime, NaiveDateTime)> = sqlx::query_as(
        r#"
        SELECT id, created_at, closed_at
        FROM issues
        WHERE state = 'closed'
          AND created_at IS NOT NULL
          AND closed_at IS NOT NULL
          AND resolution_time_hours IS NULL
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut tx = pool.begin().await?;

    for (id, created_at, closed_at) in &rows {
        let hours = resolution_hours(*created_at, *closed_at);
        sqlx::query("UPDATE issues SET resolution_time_hours = ? WHERE id = ?")
            .bind(hours)
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    info!(updated = rows.len(), "Backfilled resolution time in hours");
    Ok(rows.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use issuemine_common::db::{init_schema, upsert_issue};
    use issuemine_common::IssueRecord;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();
        init_schema(&pool).await.unwrap();
        pool
    }

    fn closed_issue(issue_id: i64) -> IssueRecord {
        let created = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let closed = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        IssueRecord {
            issue_id,
            title: "Layout overflow".to_string(),
            body: String::new(),
            state: "closed".to_string(),
            created_at: Some(created),
            closed_at: Some(closed),
            updated_at: Some(closed),
            resolution_time_days: Some(1),
            priority: None,
            milestone: None,
            author: None,
            assignee: None,
        }
    }

    async fn stored_hours(pool: &SqlitePool, issue_id: i64) -> Option<f64> {
        sqlx::query_scalar("SELECT resolution_time_hours FROM issues WHERE issue_id = ?")
            .bind(issue_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[test]
    fn thirty_six_hour_span_computes_to_36() {
        let created = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let closed = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(resolution_hours(created, closed), 36.0);
    }

    #[test]
    fn sub_hour_spans_are_fractional() {
        let created = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let closed = created + chrono::Duration::minutes(90);
        assert_eq!(resolution_hours(created, closed), 1.5);
    }

    #[tokio::test]
    async fn backfills_eligible_rows_once() {
        let pool = setup_test_db().await;
        upsert_issue(&pool, &closed_issue(1)).await.unwrap();

        assert_eq!(backfill_resolution_hours(&pool).await.unwrap(), 1);
        assert_eq!(stored_hours(&pool, 1).await, Some(36.0));

        // Second run selects nothing.
        assert_eq!(backfill_resolution_hours(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn rows_with_a_value_are_never_reselected() {
        let pool = setup_test_db().await;
        upsert_issue(&pool, &closed_issue(1)).await.unwrap();
        backfill_resolution_hours(&pool).await.unwrap();

        // Shift the underlying timestamps; the stored metric must not move.
        sqlx::query("UPDATE issues SET closed_at = '2024-03-01 00:00:00' WHERE issue_id = 1")
            .execute(&pool)
            .await
            .unwrap();

        assert_eq!(backfill_resolution_hours(&pool).await.unwrap(), 0);
        assert_eq!(stored_hours(&pool, 1).await, Some(36.0));
    }

    #[tokio::test]
    async fn open_or_timestampless_rows_are_not_selected() {
        let pool = setup_test_db().await;

        let mut open = closed_issue(1);
        open.state = "open".to_string();
        upsert_issue(&pool, &open).await.unwrap();

        let mut unclosed = closed_issue(2);
        unclosed.closed_at = None;
        upsert_issue(&pool, &unclosed).await.unwrap();

        assert_eq!(backfill_resolution_hours(&pool).await.unwrap(), 0);
        assert_eq!(stored_hours(&pool, 1).await, None);
        assert_eq!(stored_hours(&pool, 2).await, None);
    }

    #[tokio::test]
    async fn batch_failure_commits_nothing() {
        let pool = setup_test_db().await;
        upsert_issue(&pool, &closed_issue(1)).await.unwrap();
        // Unparseable timestamp poisons the batch read.
        sqlx::query(
            "INSERT INTO issues (issue_id, title, state, created_at, closed_at)
             VALUES (2, 'bad row', 'closed', 'garbage', 'garbage')",
        )
        .execute(&pool)
        .await
        .unwrap();

        assert!(backfill_resolution_hours(&pool).await.is_err());
        assert_eq!(stored_hours(&pool, 1).await, None);
    }
}
