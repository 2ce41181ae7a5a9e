//! GitHub REST API client
//!
//! One operation: fetch one page of closed issues for a repository. Any
//! non-success HTTP status is returned as an error — pagination is
//! fail-fast, there is no partial-page retry.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const GITHUB_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = "issuemine/0.1.0";

/// GitHub client errors
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<GithubError> for issuemine_common::Error {
    fn from(err: GithubError) -> Self {
        issuemine_common::Error::Http(err.to_string())
    }
}

/// Issue object as returned by the listing endpoint.
///
/// Every field except the label list is optional so a sparse or odd item
/// fails in per-record normalization (where it can be skipped) rather than
/// poisoning the whole page deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIssue {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub state: Option<String>,
    pub created_at: Option<String>,
    pub closed_at: Option<String>,
    pub updated_at: Option<String>,
    #[serde(default)]
    pub labels: Vec<RawLabel>,
    pub milestone: Option<RawMilestone>,
    pub user: Option<RawAccount>,
    pub assignee: Option<RawAccount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLabel {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMilestone {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAccount {
    pub login: Option<String>,
}

/// GitHub API client
pub struct GithubClient {
    http_client: reqwest::Client,
    token: String,
    base_url: String,
}

impl GithubClient {
    pub fn new(token: String) -> Result<Self, GithubError> {
        Self::with_base_url(token, GITHUB_API_BASE.to_string())
    }

    /// Build a client against a non-default API base (used by tests).
    pub fn with_base_url(token: String, base_url: String) -> Result<Self, GithubError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| GithubError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            token,
            base_url,
        })
    }

    /// Fetch one page of closed issues.
    ///
    /// Page numbering starts at 1. An empty page signals the end of the
    /// listing.
    pub async fn fetch_closed_page(
        &self,
        owner: &str,
        repo: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<RawIssue>, GithubError> {
        let url = format!(
            "{}/repos/{}/{}/issues?state=closed&per_page={}&page={}",
            self.base_url, owner, repo, per_page, page
        );

        tracing::debug!(owner = %owner, repo = %repo, page, "Querying GitHub issues API");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| GithubError::Network(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GithubError::Api(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| GithubError::Parse(e.to_string()))
    }
}
