use std::path::PathBuf;

use thiserror::Error;

use crate::app_config::AppConfig;
use crate::types::{MAX_TOPIC_COUNT, MIN_TOPIC_COUNT};

pub(crate) const DEFAULT_SUBREDDITS: &[&str] = &[
    "MachineLearning",
    "artificial",
    "LocalLLaMA",
    "ChatGPT",
    "OpenAI",
    "ClaudeAI",
    "StableDiffusion",
    "singularity",
    "Futurology",
    "deeplearning",
];

pub(crate) const DEFAULT_SCRAPE_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation are decoupled from the real environment so tests can
/// drive this with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    // Empty values count as unset, so `FOO=` in a .env file disables a feature.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let anthropic_api_key = require("ANTHROPIC_API_KEY")?;
    let replicate_api_token = optional("REPLICATE_API_TOKEN");
    let reddit_client_id = optional("REDDIT_CLIENT_ID");
    let reddit_client_secret = optional("REDDIT_CLIENT_SECRET");

    let log_level = or_default("MERIDIAN_LOG_LEVEL", "info");
    let output_dir = PathBuf::from(or_default("MERIDIAN_OUTPUT_DIR", "./output"));
    let claude_model = or_default("MERIDIAN_CLAUDE_MODEL", "claude-sonnet-4-20250514");

    let topic_count = parse_usize("MERIDIAN_TOPIC_COUNT", "10")?;
    if !(MIN_TOPIC_COUNT..=MAX_TOPIC_COUNT).contains(&topic_count) {
        return Err(invalid(
            "MERIDIAN_TOPIC_COUNT",
            format!("must be between {MIN_TOPIC_COUNT} and {MAX_TOPIC_COUNT}, got {topic_count}"),
        ));
    }

    let subreddits = match optional("MERIDIAN_SUBREDDITS") {
        Some(raw) => parse_subreddits(&raw),
        None => DEFAULT_SUBREDDITS.iter().map(ToString::to_string).collect(),
    };
    if subreddits.is_empty() {
        return Err(invalid(
            "MERIDIAN_SUBREDDITS",
            "must name at least one subreddit".to_string(),
        ));
    }

    let reddit_post_limit = parse_u32("MERIDIAN_REDDIT_POST_LIMIT", "15")?;
    let reddit_max_posts = parse_usize("MERIDIAN_REDDIT_MAX_POSTS", "150")?;
    let scrape_user_agent = or_default("MERIDIAN_SCRAPE_USER_AGENT", DEFAULT_SCRAPE_USER_AGENT);
    let api_user_agent = or_default("MERIDIAN_API_USER_AGENT", "Meridian/1.0");

    let request_timeout_secs = parse_u64("MERIDIAN_REQUEST_TIMEOUT_SECS", "30")?;
    let max_retries = parse_u32("MERIDIAN_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("MERIDIAN_RETRY_BACKOFF_BASE_MS", "1000")?;
    let scrape_delay_ms = parse_u64("MERIDIAN_SCRAPE_DELAY_MS", "1500")?;
    let api_delay_ms = parse_u64("MERIDIAN_API_DELAY_MS", "600")?;

    let image_concurrency = parse_usize("MERIDIAN_IMAGE_CONCURRENCY", "2")?;
    if image_concurrency == 0 {
        return Err(invalid(
            "MERIDIAN_IMAGE_CONCURRENCY",
            "must be at least 1".to_string(),
        ));
    }
    let image_poll_interval_ms = parse_u64("MERIDIAN_IMAGE_POLL_INTERVAL_MS", "2000")?;
    let image_max_polls = parse_u32("MERIDIAN_IMAGE_MAX_POLLS", "30")?;

    Ok(AppConfig {
        log_level,
        output_dir,
        anthropic_api_key,
        claude_model,
        topic_count,
        replicate_api_token,
        reddit_client_id,
        reddit_client_secret,
        subreddits,
        reddit_post_limit,
        reddit_max_posts,
        scrape_user_agent,
        api_user_agent,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        scrape_delay_ms,
        api_delay_ms,
        image_concurrency,
        image_poll_interval_ms,
        image_max_polls,
    })
}

/// Splits a comma-separated subreddit list, tolerating `r/` prefixes and blanks.
fn parse_subreddits(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .map(|s| s.strip_prefix("r/").unwrap_or(s))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
