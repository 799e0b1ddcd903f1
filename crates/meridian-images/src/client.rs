//! Replicate predictions client.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use meridian_core::AppConfig;

use crate::error::ImageError;

const DEFAULT_BASE_URL: &str = "https://api.replicate.com";
const FLUX_MODEL: &str = "black-forest-labs/flux-schnell";
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct ReplicateSettings {
    pub api_token: String,
    pub request_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub max_polls: u32,
}

impl ReplicateSettings {
    /// Settings from config, or `None` when `REPLICATE_API_TOKEN` is unset.
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Option<Self> {
        let api_token = config.replicate_api_token.clone()?;
        Some(Self {
            api_token,
            request_timeout_secs: config.request_timeout_secs,
            poll_interval_ms: config.image_poll_interval_ms,
            max_polls: config.image_max_polls,
        })
    }
}

impl std::fmt::Debug for ReplicateSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplicateSettings")
            .field("api_token", &"[redacted]")
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("max_polls", &self.max_polls)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    input: PredictionInput<'a>,
}

#[derive(Debug, Serialize)]
struct PredictionInput<'a> {
    prompt: &'a str,
    num_outputs: u32,
    aspect_ratio: &'a str,
    output_format: &'a str,
    output_quality: u32,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(default)]
    status: String,
    #[serde(default)]
    urls: Option<PredictionUrls>,
    #[serde(default)]
    output: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    get: Option<String>,
}

impl Prediction {
    /// First output URL; FLUX returns a list, some models a bare string.
    fn first_output(&self) -> Option<&str> {
        match self.output.as_ref()? {
            serde_json::Value::Array(items) => items.first()?.as_str(),
            serde_json::Value::String(url) => Some(url.as_str()),
            _ => None,
        }
    }

    fn error_text(&self) -> Option<String> {
        match self.error.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug)]
pub struct ReplicateClient {
    client: reqwest::Client,
    settings: ReplicateSettings,
    base_url: String,
}

impl ReplicateClient {
    /// # Errors
    ///
    /// Returns [`ImageError::Http`] if the HTTP client cannot be built.
    pub fn new(settings: ReplicateSettings) -> Result<Self, ImageError> {
        Self::with_base_url(settings, DEFAULT_BASE_URL)
    }

    /// Creates a client targeting a custom base URL (used by tests).
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(settings: ReplicateSettings, base_url: &str) -> Result<Self, ImageError> {
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

    /// Generates one image for `prompt` and writes it to `dest`.
    ///
    /// Creates a prediction, polls its `urls.get` until it settles, then
    /// downloads the first output.
    ///
    /// # Errors
    ///
    /// - [`ImageError::PredictionFailed`] if the prediction fails or is canceled.
    /// - [`ImageError::Timeout`] if it is still running after the poll limit.
    /// - [`ImageError::UnexpectedStatus`] on any non-2xx response.
    /// - [`ImageError::Io`] if the file cannot be written.
    pub async fn generate_image(&self, prompt: &str, dest: &Path) -> Result<PathBuf, ImageError> {
        let mut prediction = self.create_prediction(prompt).await?;
        let poll_url = prediction.urls.as_ref().and_then(|u| u.get.clone());

        let mut polls = 0u32;
        loop {
            let status = prediction.status.clone();
            match status.as_str() {
                "succeeded" => break,
                "failed" | "canceled" => {
                    return Err(ImageError::PredictionFailed {
                        error: prediction.error_text(),
                        status: status.clone(),
                    });
                }
                _ if polls >= self.settings.max_polls => {
                    return Err(ImageError::Timeout { polls });
                }
                _ => {
                    let url = poll_url.as_deref().ok_or(ImageError::MissingPollUrl)?;
                    tokio::time::sleep(Duration::from_millis(self.settings.poll_interval_ms)).await;
                    polls += 1;
                    prediction = self.get_json(url, "prediction status").await?;
                }
            }
        }

        let output_url = prediction.first_output().ok_or(ImageError::NoOutput)?.to_string();
        self.download(&output_url, dest).await?;
        tracing::debug!(polls, path = %dest.display(), "image downloaded");
        Ok(dest.to_path_buf())
    }

    async fn create_prediction(&self, prompt: &str) -> Result<Prediction, ImageError> {
        let url = format!("{}/v1/models/{FLUX_MODEL}/predictions", self.base_url);
        let request = PredictionRequest {
            input: PredictionInput {
                prompt,
                num_outputs: 1,
                aspect_ratio: "1:1",
                output_format: "png",
                output_quality: 90,
            },
        };
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.settings.api_token)
            .json(&request)
            .send()
            .await?;
        decode(response, &url, "create prediction").await
    }

    async fn get_json(&self, url: &str, context: &str) -> Result<Prediction, ImageError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.settings.api_token)
            .send()
            .await?;
        decode(response, url, context).await
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<(), ImageError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let bytes = response.bytes().await?;
        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }
}

async fn decode(
    response: reqwest::Response,
    url: &str,
    context: &str,
) -> Result<Prediction, ImageError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ImageError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|source| ImageError::Deserialize {
        context: context.to_string(),
        source,
    })
}
