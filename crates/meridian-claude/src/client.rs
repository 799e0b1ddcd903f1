//! HTTP client for the Anthropic Messages API.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use meridian_core::{AppConfig, Topic, TrendSummary};

use crate::error::SummarizerError;
use crate::parse::parse_response;
use crate::prompt::build_prompt;
use crate::retry::retry_with_backoff;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct ClaudeSettings {
    pub api_key: String,
    pub model: String,
    pub topic_count: usize,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl ClaudeSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            api_key: config.anthropic_api_key.clone(),
            model: config.claude_model.clone(),
            topic_count: config.topic_count,
            request_timeout_secs: config.request_timeout_secs,
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
        }
    }
}

impl std::fmt::Debug for ClaudeSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeSettings")
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .field("topic_count", &self.topic_count)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

/// Summarizer backed by Claude.
#[derive(Debug)]
pub struct ClaudeClient {
    client: reqwest::Client,
    settings: ClaudeSettings,
    base_url: String,
}

impl ClaudeClient {
    /// # Errors
    ///
    /// Returns [`SummarizerError::Http`] if the HTTP client cannot be built.
    pub fn new(settings: ClaudeSettings) -> Result<Self, SummarizerError> {
        Self::with_base_url(settings, DEFAULT_BASE_URL)
    }

    /// Creates a client targeting a custom base URL (used by tests).
    ///
    /// # Errors
    ///
    /// Returns [`SummarizerError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(
        settings: ClaudeSettings,
        base_url: &str,
    ) -> Result<Self, SummarizerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            settings,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Sends the post text in one Messages call and strictly parses the reply.
    ///
    /// Topics come back in the model's order with dense ranks `1..=topic_count`.
    ///
    /// # Errors
    ///
    /// - [`SummarizerError::Api`] for error envelopes and non-2xx statuses
    ///   (after retries for 429, 5xx and 529).
    /// - [`SummarizerError::Parse`] if the reply fails strict parsing.
    pub async fn summarize(
        &self,
        posts_text: &str,
    ) -> Result<(TrendSummary, Vec<Topic>), SummarizerError> {
        let prompt = build_prompt(posts_text, self.settings.topic_count);

        let text = retry_with_backoff(
            self.settings.max_retries,
            self.settings.retry_backoff_base_ms,
            || self.send(&prompt),
        )
        .await?;

        let (summary, topics) = parse_response(&text, self.settings.topic_count).into_result()?;
        tracing::info!(
            topics = topics.len(),
            summary_chars = summary.as_str().chars().count(),
            "Claude summary parsed"
        );
        Ok((summary, topics))
    }

    async fn send(&self, prompt: &str) -> Result<String, SummarizerError> {
        let url = format!("{}/v1/messages", self.base_url);
        let request = MessagesRequest {
            model: &self.settings.model,
            max_tokens: MAX_TOKENS,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(model = %self.settings.model, "sending Claude messages request");
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.settings.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }
        // Some proxies answer 200 with an error envelope.
        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
            return Err(SummarizerError::Api {
                status: status.as_u16(),
                error_type: envelope.error.kind,
                message: envelope.error.message,
            });
        }

        let parsed: MessagesResponse =
            serde_json::from_str(&body).map_err(|source| SummarizerError::Deserialize {
                context: "Claude messages response".to_string(),
                source,
            })?;

        if parsed.stop_reason.as_deref() == Some("max_tokens") {
            tracing::warn!("Claude reply hit max_tokens; JSON may be truncated");
        }

        let text: String = parsed
            .content
            .into_iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text)
            .collect();

        if text.trim().is_empty() {
            return Err(SummarizerError::EmptyResponse);
        }
        Ok(text)
    }
}

fn api_error(status: u16, body: &str) -> SummarizerError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => SummarizerError::Api {
            status,
            error_type: envelope.error.kind,
            message: envelope.error.message,
        },
        Err(_) => SummarizerError::Api {
            status,
            error_type: "http_error".to_string(),
            message: body.chars().take(200).collect(),
        },
    }
}
