use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited on r/{subreddit} (retry after {retry_after_secs}s)")]
    RateLimited {
        subreddit: String,
        retry_after_secs: u64,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("Reddit OAuth token exchange failed: {0}")]
    Auth(String),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("all {attempted} subreddits failed to respond")]
    AllSourcesFailed { attempted: usize },

    #[error("no posts collected from {attempted} subreddits")]
    NoPosts { attempted: usize },
}
