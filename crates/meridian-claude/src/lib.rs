//! Anthropic Messages API client that turns a batch of Reddit posts into a
//! trend summary and a ranked topic list.

pub mod client;
pub mod error;
pub mod parse;
pub mod prompt;

mod retry;

pub use client::{ClaudeClient, ClaudeSettings};
pub use error::SummarizerError;
pub use parse::{parse_response, ParseFailure, ParseOutcome};
pub use prompt::build_prompt;
