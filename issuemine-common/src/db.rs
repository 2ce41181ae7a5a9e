//! Database layer: connection, schema, upsert
//!
//! The pipeline's shared state is one SQLite table, `issues`. Schema setup is
//! idempotent: `CREATE TABLE IF NOT EXISTS` for the base table, plus
//! add-column sync for the columns the downstream passes write
//! (`resolution_time_hours`, `topic`) so an older database file picks them up
//! on the next run.

use crate::model::IssueRecord;
use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Open (or create) the pipeline database and bring the schema up to date.
pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// Create the `issues` table and add any missing derived columns.
///
/// Safe to call on every startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS issues (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            issue_id INTEGER NOT NULL UNIQUE,
            title TEXT NOT NULL,
            body TEXT,
            state TEXT,
            created_at TIMESTAMP,
            closed_at TIMESTAMP,
            updated_at TIMESTAMP,
            resolution_time_days INTEGER,
            priority TEXT,
            milestone TEXT,
            author TEXT,
            assignee TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Columns written by the metrics and classification passes. Added
    // separately so databases created by older fetch-only runs still sync.
    add_column_if_missing(pool, "issues", "resolution_time_hours", "REAL").await?;
    add_column_if_missing(pool, "issues", "topic", "TEXT").await?;

    Ok(())
}

/// Add a nullable column to a table if it is not already present.
async fn add_column_if_missing(
    pool: &SqlitePool,
    table: &str,
    column: &str,
    sql_type: &str,
) -> Result<()> {
    let exists: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pragma_table_info(?) WHERE name = ?",
    )
    .bind(table)
    .bind(column)
    .fetch_one(pool)
    .await?;

    if exists == 0 {
        let sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, sql_type);
        sqlx::query(&sql).execute(pool).await?;
        info!(table, column, "Added missing column");
    }

    Ok(())
}

/// Insert an issue, ignoring the write if the `issue_id` is already stored.
///
/// Returns `true` when a row was actually inserted. Existing rows are never
/// updated by ingestion, even if the source record changed upstream.
pub async fn upsert_issue(pool: &SqlitePool, record: &IssueRecord) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO issues (
            issue_id, title, body, state,
            created_at, closed_at, updated_at,
            resolution_time_days, priority, milestone, author, assignee
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (issue_id) DO NOTHING
        "#,
    )
    .bind(record.issue_id)
    .bind(&record.title)
    .bind(&record.body)
    .bind(&record.state)
    .bind(record.created_at)
    .bind(record.closed_at)
    .bind(record.updated_at)
    .bind(record.resolution_time_days)
    .bind(record.priority.map(|p| p.as_str()))
    .bind(&record.milestone)
    .bind(&record.author)
    .bind(&record.assignee)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
