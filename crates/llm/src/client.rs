use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

/// Reply used when the model returns no text.
pub const EMPTY_RESPONSE: &str = "No response generated";

/// Language-model client settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API, without the trailing path.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl LlmConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: api_key.into(),
            model: "gpt-4".to_string(),
            temperature: 0.3,
            max_tokens: 1000,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("request to language model failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("language model returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Client for the `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl ChatClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Send `messages` and return the first choice's text.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        debug!(model = %self.config.model, messages = messages.len(), "requesting completion");
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "language model request rejected");
            return Err(LlmError::Status { status, body });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        Ok(completion
            .first_content()
            .unwrap_or(EMPTY_RESPONSE)
            .to_string())
    }
}
