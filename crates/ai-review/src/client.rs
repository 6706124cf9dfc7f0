//! Chat-completion HTTP client
//!
//! Thin client for an OpenAI-compatible chat-completions endpoint. The
//! [`ChatCompletion`] trait is the seam tests mock; the review layer never
//! talks to the network directly.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::sleep;
use tracing::warn;

use crate::error::AiReviewError;

/// One completion call: a system prompt, a user prompt and sampling knobs
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Run one completion and return the assistant's raw text
    async fn complete(&self, request: &ChatRequest) -> Result<String, AiReviewError>;

    /// Identifier recorded in review summaries
    fn model_label(&self) -> String;
}

/// Configuration for [`HttpChatClient`]
#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl ChatClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.deepseek.com".to_string(),
            model: "deepseek-chat".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        &self.api_key
    }
}

/// reqwest-backed client with a bounded timeout and at most one retry
pub struct HttpChatClient {
    config: ChatClientConfig,
    client: reqwest::Client,
}

impl HttpChatClient {
    pub fn new(config: ChatClientConfig) -> Result<Self, AiReviewError> {
        if config.api_key().trim().is_empty() {
            return Err(AiReviewError::MissingCredentials);
        }
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    async fn send_once(&self, request: &ChatRequest) -> Result<String, AiReviewError> {
        let body = WireRequest {
            model: self.config.model.clone(),
            messages: vec![
                WireMessage {
                    role: "system",
                    content: request.system.clone(),
                },
                WireMessage {
                    role: "user",
                    content: request.user.clone(),
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            top_p: request.top_p,
        };

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiReviewError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let parsed: WireResponse = response.json().await?;
        let message = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or(AiReviewError::EmptyResponse)?;

        extract_message_text(message).ok_or(AiReviewError::EmptyResponse)
    }
}

/// Prefer `content`; reasoning models may put their answer in
/// `reasoning_content` as a string or a list of text chunks
fn extract_message_text(message: WireResponseMessage) -> Option<String> {
    if let Some(content) = message.content {
        if !content.trim().is_empty() {
            return Some(content);
        }
    }

    match message.reasoning_content {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text),
        Some(Value::Array(chunks)) => {
            let joined = chunks
                .iter()
                .filter_map(|chunk| chunk.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n");
            let joined = joined.trim().to_string();
            if joined.is_empty() {
                None
            } else {
                Some(joined)
            }
        }
        _ => None,
    }
}

/// Retry delay: half a second plus sub-second jitter so concurrent reviews
/// do not retry in lockstep
fn retry_delay() -> Duration {
    let jitter_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::from(d.subsec_nanos()) % 500)
        .unwrap_or(250);
    Duration::from_millis(500 + jitter_ms)
}

#[async_trait]
impl ChatCompletion for HttpChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, AiReviewError> {
        match self.send_once(request).await {
            Ok(text) => Ok(text),
            Err(err) if err.is_retryable() => {
                let delay = retry_delay();
                warn!(error = %err, delay_ms = delay.as_millis() as u64, "retrying chat completion");
                sleep(delay).await;
                self.send_once(request).await
            }
            Err(err) => Err(err),
        }
    }

    fn model_label(&self) -> String {
        self.config.model.clone()
    }
}

// ----- Wire types -----

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireResponseChoice>,
}

#[derive(Debug, Deserialize)]
struct WireResponseChoice {
    message: WireResponseMessage,
}

#[derive(Debug, Deserialize)]
struct WireResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    reasoning_content: Option<Value>,
}
