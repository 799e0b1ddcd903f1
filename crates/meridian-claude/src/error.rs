use thiserror::Error;

use crate::parse::ParseFailure;

#[derive(Debug, Error)]
pub enum SummarizerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error envelope or a non-2xx status.
    #[error("Claude API returned HTTP {status} ({error_type}): {message}")]
    Api {
        status: u16,
        error_type: String,
        message: String,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Claude response contained no text content")]
    EmptyResponse,

    #[error("could not parse Claude response: {0}")]
    Parse(#[from] ParseFailure),
}
