use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot build an image prompt: {0}")]
    InvalidTopic(String),

    #[error("prediction response carried no polling URL")]
    MissingPollUrl,

    #[error("prediction {status}: {}", .error.as_deref().unwrap_or("no error detail"))]
    PredictionFailed {
        status: String,
        error: Option<String>,
    },

    #[error("prediction succeeded without an output URL")]
    NoOutput,

    #[error("prediction still running after {polls} polls")]
    Timeout { polls: u32 },
}
