//! Chat-completions client
//!
//! Single-turn text completion: one prompt in, the first choice's content
//! out, trimmed. No batching; the classifier calls this once per record.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const MODEL: &str = "gpt-3.5-turbo";
const TEMPERATURE: f32 = 0.3;

/// Chat client errors
#[derive(Debug, Error)]
pub enum OpenAiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// OpenAI-style chat-completions client
pub struct ChatClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ChatClient {
    pub fn new(api_key: String) -> Result<Self, OpenAiError> {
        Self::with_base_url(api_key, OPENAI_API_BASE.to_string())
    }

    /// Build a client against a non-default API base (used by tests).
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, OpenAiError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| OpenAiError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            base_url,
        })
    }

    /// Send one prompt and return the trimmed completion text.
    pub async fn complete(&self, prompt: &str) -> Result<String, OpenAiError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: MODEL,
            temperature: TEMPERATURE,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| OpenAiError::Network(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(OpenAiError::Api(status.as_u16(), error_text));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| OpenAiError::Parse(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| OpenAiError::Parse("response carried no choices".to_string()))?;

        Ok(content.trim().to_string())
    }
}
