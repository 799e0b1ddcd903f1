//! Reddit post collection for Meridian.
//!
//! Collects hot posts from a configured list of subreddits, either by scraping
//! `old.reddit.com` listing pages or through the OAuth API, and renders them
//! into the numbered text blob the summarizer consumes. Also carries the fixed
//! sample post set used for offline runs.

pub mod collector;
pub mod error;
pub mod sample;
pub mod text;

mod api;
mod retry;
mod scrape;

pub use collector::{CollectorSettings, RedditCollector, RedditCredentials, RedditEndpoints};
pub use error::CollectorError;
pub use sample::{sample_posts, SAMPLE_POST_COUNT};
pub use text::posts_to_text;
