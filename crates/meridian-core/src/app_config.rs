use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub output_dir: PathBuf,
    pub anthropic_api_key: String,
    pub claude_model: String,
    pub topic_count: usize,
    pub replicate_api_token: Option<String>,
    pub reddit_client_id: Option<String>,
    pub reddit_client_secret: Option<String>,
    pub subreddits: Vec<String>,
    pub reddit_post_limit: u32,
    pub reddit_max_posts: usize,
    pub scrape_user_agent: String,
    pub api_user_agent: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub scrape_delay_ms: u64,
    pub api_delay_ms: u64,
    pub image_concurrency: usize,
    pub image_poll_interval_ms: u64,
    pub image_max_polls: u32,
}

impl AppConfig {
    /// Reddit OAuth credentials, when both halves are configured.
    #[must_use]
    pub fn reddit_credentials(&self) -> Option<(&str, &str)> {
        match (&self.reddit_client_id, &self.reddit_client_secret) {
            (Some(id), Some(secret)) => Some((id.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("output_dir", &self.output_dir)
            .field("anthropic_api_key", &"[redacted]")
            .field("claude_model", &self.claude_model)
            .field("topic_count", &self.topic_count)
            .field(
                "replicate_api_token",
                &self.replicate_api_token.as_ref().map(|_| "[redacted]"),
            )
            .field("reddit_client_id", &self.reddit_client_id)
            .field(
                "reddit_client_secret",
                &self.reddit_client_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("subreddits", &self.subreddits)
            .field("reddit_post_limit", &self.reddit_post_limit)
            .field("reddit_max_posts", &self.reddit_max_posts)
            .field("scrape_user_agent", &self.scrape_user_agent)
            .field("api_user_agent", &self.api_user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("scrape_delay_ms", &self.scrape_delay_ms)
            .field("api_delay_ms", &self.api_delay_ms)
            .field("image_concurrency", &self.image_concurrency)
            .field("image_poll_interval_ms", &self.image_poll_interval_ms)
            .field("image_max_polls", &self.image_max_polls)
            .finish()
    }
}
