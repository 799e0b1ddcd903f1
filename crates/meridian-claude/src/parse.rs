//! Strict parser for the summarizer's JSON reply.
//!
//! The model must answer with one JSON object, either as the whole reply or
//! inside a fenced code block. Anything else is a [`ParseOutcome::ParseFailed`].

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use meridian_core::{Topic, TrendSummary};

const DEFAULT_IMPORTANCE: u8 = 5;

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n(.*?)```").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("no JSON object found in response")]
    NoJsonObject,

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("summary is empty")]
    EmptySummary,

    #[error("expected {expected} topics, got {found}")]
    TooFewTopics { expected: usize, found: usize },

    #[error("topic {rank} has an empty title")]
    EmptyTopicTitle { rank: usize },

    #[error("topic {rank} has an empty description")]
    EmptyTopicDescription { rank: usize },
}

/// Result of parsing one model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed(TrendSummary, Vec<Topic>),
    ParseFailed(ParseFailure),
}

impl ParseOutcome {
    /// Converts into a `Result`, for callers that propagate with `?`.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseFailure`] carried by `ParseFailed`.
    pub fn into_result(self) -> Result<(TrendSummary, Vec<Topic>), ParseFailure> {
        match self {
            ParseOutcome::Parsed(summary, topics) => Ok((summary, topics)),
            ParseOutcome::ParseFailed(reason) => Err(reason),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    topics: Vec<RawTopic>,
}

#[derive(Debug, Deserialize)]
struct RawTopic {
    #[serde(default)]
    title: String,
    #[serde(default)]
    title_en: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    importance: Option<serde_json::Value>,
}

/// Parses a model reply into a summary and exactly `topic_count` topics.
///
/// Topics keep the model's order and receive dense ranks `1..=topic_count`.
/// Extra topics are dropped; too few is a failure. Importance is clamped to
/// `1..=10` and defaults to 5 when absent or non-numeric.
#[must_use]
pub fn parse_response(text: &str, topic_count: usize) -> ParseOutcome {
    match parse_inner(text, topic_count) {
        Ok((summary, topics)) => ParseOutcome::Parsed(summary, topics),
        Err(reason) => ParseOutcome::ParseFailed(reason),
    }
}

fn parse_inner(text: &str, topic_count: usize) -> Result<(TrendSummary, Vec<Topic>), ParseFailure> {
    let json = locate_object(text).ok_or(ParseFailure::NoJsonObject)?;
    let raw: RawResponse =
        serde_json::from_str(json).map_err(|e| ParseFailure::InvalidJson(e.to_string()))?;

    let summary = raw.summary.trim();
    if summary.is_empty() {
        return Err(ParseFailure::EmptySummary);
    }

    if raw.topics.len() < topic_count {
        return Err(ParseFailure::TooFewTopics {
            expected: topic_count,
            found: raw.topics.len(),
        });
    }

    let topics = raw
        .topics
        .into_iter()
        .take(topic_count)
        .enumerate()
        .map(|(i, t)| to_topic(i + 1, t))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((TrendSummary::new(summary), topics))
}

/// The JSON object text: the whole reply when it is bare, otherwise the body
/// of the first fenced block that holds an object.
fn locate_object(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.starts_with('{') {
        return Some(trimmed);
    }
    FENCE_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .find(|body| body.starts_with('{'))
}

fn to_topic(rank: usize, raw: RawTopic) -> Result<Topic, ParseFailure> {
    let title = raw.title.trim().to_string();
    if title.is_empty() {
        return Err(ParseFailure::EmptyTopicTitle { rank });
    }
    let description = raw.description.trim().to_string();
    if description.is_empty() {
        return Err(ParseFailure::EmptyTopicDescription { rank });
    }
    let title_en = raw
        .title_en
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| title.clone());
    let keywords = raw
        .keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();

    Ok(Topic {
        rank,
        title,
        title_en,
        description,
        keywords,
        importance: importance(raw.importance.as_ref()),
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn importance(value: Option<&serde_json::Value>) -> u8 {
    let score = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match score {
        Some(s) if s.is_finite() => s.round().clamp(1.0, 10.0) as u8,
        _ => DEFAULT_IMPORTANCE,
    }
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
