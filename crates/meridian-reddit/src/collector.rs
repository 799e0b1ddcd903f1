//! Multi-subreddit hot-post collection.

use std::cmp::Reverse;
use std::time::Duration;

use meridian_core::{AppConfig, Post, SourceMethod};

use crate::api;
use crate::error::CollectorError;
use crate::retry::retry_with_backoff;
use crate::scrape::parse_listing;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Reddit OAuth application credentials.
#[derive(Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for RedditCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .finish()
    }
}

/// Collector tuning, normally derived from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub subreddits: Vec<String>,
    pub per_subreddit_limit: u32,
    pub scrape_user_agent: String,
    pub api_user_agent: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub scrape_delay_ms: u64,
    pub api_delay_ms: u64,
    pub credentials: Option<RedditCredentials>,
}

impl CollectorSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            subreddits: config.subreddits.clone(),
            per_subreddit_limit: config.reddit_post_limit,
            scrape_user_agent: config.scrape_user_agent.clone(),
            api_user_agent: config.api_user_agent.clone(),
            request_timeout_secs: config.request_timeout_secs,
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
            scrape_delay_ms: config.scrape_delay_ms,
            api_delay_ms: config.api_delay_ms,
            credentials: config
                .reddit_credentials()
                .map(|(id, secret)| RedditCredentials {
                    client_id: id.to_string(),
                    client_secret: secret.to_string(),
                }),
        }
    }
}

/// Base URLs for every Reddit host the collector talks to.
#[derive(Debug, Clone)]
pub struct RedditEndpoints {
    /// Host serving the HTML listings, e.g. `https://old.reddit.com`.
    pub scrape_base: String,
    pub oauth_base: String,
    pub token_url: String,
    /// Prefix for relative permalinks in collected posts.
    pub link_base: String,
}

impl Default for RedditEndpoints {
    fn default() -> Self {
        Self {
            scrape_base: "https://old.reddit.com".to_string(),
            oauth_base: "https://oauth.reddit.com".to_string(),
            token_url: "https://www.reddit.com/api/v1/access_token".to_string(),
            link_base: "https://reddit.com".to_string(),
        }
    }
}

/// Collects hot posts from the configured subreddits.
#[derive(Debug)]
pub struct RedditCollector {
    client: reqwest::Client,
    settings: CollectorSettings,
    endpoints: RedditEndpoints,
    method: SourceMethod,
}

impl RedditCollector {
    /// Creates a collector against the public Reddit hosts.
    ///
    /// Requesting [`SourceMethod::Api`] without credentials falls back to
    /// scraping with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the HTTP client cannot be built.
    pub fn new(settings: CollectorSettings, method: SourceMethod) -> Result<Self, CollectorError> {
        Self::with_endpoints(settings, method, RedditEndpoints::default())
    }

    /// Creates a collector against custom endpoints (used by tests).
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the HTTP client cannot be built.
    pub fn with_endpoints(
        settings: CollectorSettings,
        method: SourceMethod,
        endpoints: RedditEndpoints,
    ) -> Result<Self, CollectorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        let method = match method {
            SourceMethod::Api if settings.credentials.is_none() => {
                tracing::warn!(
                    "REDDIT_CLIENT_ID/REDDIT_CLIENT_SECRET not set; falling back to scraping"
                );
                SourceMethod::Scrape
            }
            other => other,
        };

        Ok(Self {
            client,
            settings,
            endpoints,
            method,
        })
    }

    /// Method actually used after the credential fallback.
    #[must_use]
    pub fn method(&self) -> SourceMethod {
        self.method
    }

    /// Collects posts from every configured subreddit, sorted by descending
    /// score and truncated to `limit`.
    ///
    /// Individual subreddit failures are logged and skipped.
    ///
    /// # Errors
    ///
    /// - [`CollectorError::Auth`] if the API token exchange fails.
    /// - [`CollectorError::AllSourcesFailed`] if every subreddit failed.
    /// - [`CollectorError::NoPosts`] if the subreddits responded but held no posts.
    pub async fn collect_posts(&self, limit: usize) -> Result<Vec<Post>, CollectorError> {
        let token = match self.method {
            SourceMethod::Api => Some(self.fetch_token().await?),
            SourceMethod::Scrape => None,
        };
        let delay = Duration::from_millis(match self.method {
            SourceMethod::Api => self.settings.api_delay_ms,
            SourceMethod::Scrape => self.settings.scrape_delay_ms,
        });

        let attempted = self.settings.subreddits.len();
        tracing::info!(method = %self.method, subreddits = attempted, "collecting Reddit posts");

        let mut posts = Vec::new();
        let mut failures = 0usize;

        for (i, subreddit) in self.settings.subreddits.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let result = retry_with_backoff(
                self.settings.max_retries,
                self.settings.retry_backoff_base_ms,
                || self.fetch_subreddit(subreddit, token.as_deref()),
            )
            .await;

            match result {
                Ok(batch) => {
                    tracing::debug!(
                        subreddit = %subreddit,
                        count = batch.len(),
                        "subreddit collected"
                    );
                    posts.extend(batch);
                }
                Err(e) => {
                    failures += 1;
                    tracing::warn!(
                        subreddit = %subreddit,
                        error = %e,
                        "subreddit failed, skipping"
                    );
                }
            }
        }

        if attempted > 0 && failures == attempted {
            return Err(CollectorError::AllSourcesFailed { attempted });
        }
        if posts.is_empty() {
            return Err(CollectorError::NoPosts { attempted });
        }

        posts.sort_by_key(|p| Reverse(p.score));
        posts.truncate(limit);

        tracing::info!(count = posts.len(), failures, "Reddit collection complete");
        Ok(posts)
    }

    async fn fetch_token(&self) -> Result<String, CollectorError> {
        let Some(creds) = self.settings.credentials.as_ref() else {
            return Err(CollectorError::Auth("no credentials configured".to_string()));
        };
        retry_with_backoff(
            self.settings.max_retries,
            self.settings.retry_backoff_base_ms,
            || {
                api::fetch_token(
                    &self.client,
                    &self.endpoints.token_url,
                    &creds.client_id,
                    &creds.client_secret,
                    &self.settings.api_user_agent,
                )
            },
        )
        .await
    }

    async fn fetch_subreddit(
        &self,
        subreddit: &str,
        token: Option<&str>,
    ) -> Result<Vec<Post>, CollectorError> {
        match token {
            Some(token) => {
                api::fetch_hot(
                    &self.client,
                    &self.endpoints.oauth_base,
                    token,
                    &self.settings.api_user_agent,
                    subreddit,
                    self.settings.per_subreddit_limit,
                    &self.endpoints.link_base,
                )
                .await
            }
            None => self.scrape_subreddit(subreddit).await,
        }
    }

    async fn scrape_subreddit(&self, subreddit: &str) -> Result<Vec<Post>, CollectorError> {
        let url = format!("{}/r/{subreddit}/hot/", self.endpoints.scrape_base);
        let response = self
            .client
            .get(&url)
            .header("User-Agent", &self.settings.scrape_user_agent)
            .header("Accept", "text/html")
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(CollectorError::RateLimited {
                subreddit: subreddit.to_string(),
                retry_after_secs: api::retry_after(&response),
            });
        }
        if !status.is_success() {
            return Err(CollectorError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let html = response.text().await?;
        Ok(parse_listing(
            &html,
            subreddit,
            self.settings.per_subreddit_limit as usize,
            &self.endpoints.link_base,
        ))
    }
}
