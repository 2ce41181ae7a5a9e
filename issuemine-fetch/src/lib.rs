//! issuemine-fetch - Closed-issue ingestion
//!
//! Walks the tracker's paginated closed-issue listing, normalizes each item
//! into an [`issuemine_common::IssueRecord`], and upserts it into the shared
//! `issues` table. Re-runs are safe: ingestion is insert-or-ignore keyed by
//! the external issue id.

pub mod github;
pub mod ingest;
pub mod transform;

pub use github::GithubClient;
pub use ingest::{IngestOptions, IngestSummary};
