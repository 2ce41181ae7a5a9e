//! Configuration helpers
//!
//! Credentials are environment-only and required: there are no literal
//! fallbacks anywhere in the pipeline, and a missing credential is a fatal
//! startup error.

use crate::{Error, Result};

/// Environment variable holding the issue-tracker API token.
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Environment variable holding the classifier API key.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Read a required environment variable, failing with a configuration error
/// when it is unset or blank.
pub fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Config(format!(
            "{} is not set. Export it before running this component.",
            name
        ))),
    }
}
