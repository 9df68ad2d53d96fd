//! Minimal OpenAI chat-completion client over reqwest with bounded retries.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "o3-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_RETRIES: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Upstream API configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl AdvisorConfig {
    /// Build from environment. `OPENAI_API_KEY` is required; everything else
    /// has a default.
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AppError::config("OPENAI_API_KEY must be set"))?;
        if api_key.trim().is_empty() {
            return Err(AppError::config("OPENAI_API_KEY must not be empty"));
        }

        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeout = std::env::var("OPENAI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let max_retries = std::env::var("OPENAI_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_RETRIES);

        Ok(Self {
            api_key,
            base_url,
            model,
            timeout,
            max_retries,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

/// OpenAI-compatible chat client. Cheap to clone; the inner reqwest client
/// shares its connection pool.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    config: AdvisorConfig,
}

impl OpenAiClient {
    pub fn new(config: AdvisorConfig) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::config(format!("failed to build http client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Run a chat completion, retrying on 429, 5xx and connection errors with
    /// exponential backoff. Once retries are exhausted the failure maps to
    /// 429 (upstream rate limit) or 502.
    pub async fn create_chat_completion(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<ChatCompletionResponse, AppError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature,
            max_tokens,
        };

        let mut delay = RETRY_BASE_DELAY;
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_once(&url, &body).await {
                Ok(response) => return Ok(response),
                Err(err) if attempt <= self.config.max_retries && err.retryable => {
                    warn!(
                        attempt,
                        max_retries = self.config.max_retries,
                        error = %err.detail,
                        "chat completion attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(Duration::from_secs(8));
                }
                Err(err) => return Err(err.into_app_error()),
            }
        }
    }

    async fn try_once(
        &self,
        url: &str,
        body: &ChatCompletionRequest<'_>,
    ) -> Result<ChatCompletionResponse, UpstreamFailure> {
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| UpstreamFailure {
                rate_limited: false,
                retryable: true,
                detail: format!("request to upstream failed: {e}"),
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(model = %self.config.model, "chat completion succeeded");
            return response
                .json::<ChatCompletionResponse>()
                .await
                .map_err(|e| UpstreamFailure {
                    rate_limited: false,
                    retryable: false,
                    detail: format!("invalid upstream response body: {e}"),
                });
        }

        // Body text is logged server-side only, never surfaced to callers.
        let body_text = response.text().await.unwrap_or_default();
        Err(UpstreamFailure {
            rate_limited: status == StatusCode::TOO_MANY_REQUESTS,
            retryable: status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error(),
            detail: format!("upstream returned {status}: {body_text}"),
        })
    }
}

struct UpstreamFailure {
    rate_limited: bool,
    retryable: bool,
    detail: String,
}

impl UpstreamFailure {
    fn into_app_error(self) -> AppError {
        if self.rate_limited {
            AppError::UpstreamRateLimited {
                detail: self.detail,
            }
        } else {
            AppError::Upstream {
                detail: self.detail,
            }
        }
    }
}
