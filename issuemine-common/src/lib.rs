//! # issuemine Common Library
//!
//! Shared code for the issue-mining pipeline binaries:
//! - Issue record model and the closed topic/priority enumerations
//! - Database layer (SQLite schema, upsert, selection queries)
//! - Configuration helpers (required environment variables)
//! - Common error type

pub mod config;
pub mod db;
pub mod error;
pub mod model;

pub use error::{Error, Result};
pub use model::{IssueRecord, Priority, Topic};
