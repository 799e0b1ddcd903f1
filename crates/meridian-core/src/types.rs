use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Smallest topic count a run may be configured with.
pub const MIN_TOPIC_COUNT: usize = 1;
/// Largest topic count a run may be configured with.
pub const MAX_TOPIC_COUNT: usize = 50;

/// One collected Reddit post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub score: i64,
    pub num_comments: u64,
    /// Link target of the post (external article or the post itself).
    pub url: String,
    /// Absolute `https://reddit.com/...` link to the discussion thread.
    pub permalink: String,
    /// Subreddit the post was collected from.
    pub source: String,
}

/// A ranked theme extracted from a batch of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Dense 1-based position in the model's ranking.
    pub rank: usize,
    pub title: String,
    /// English title, used for image prompts. Equal to `title` when the model
    /// did not supply one.
    pub title_en: String,
    pub description: String,
    pub keywords: Vec<String>,
    /// Model-assigned importance score in `1..=10`.
    pub importance: u8,
}

/// Narrative text describing cross-cutting patterns across all posts of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendSummary(String);

impl TrendSummary {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the summary on blank lines, dropping empty fragments.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.0
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Directory, relative to the output root, that holds topic images.
pub const IMAGES_DIR: &str = "images";

/// An image written to local storage for exactly one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub rank: usize,
    /// File name inside the images directory, e.g. `topic_01.png`.
    pub filename: String,
    pub path: PathBuf,
}

impl GeneratedImage {
    /// Path of the image relative to the output directory, with forward
    /// slashes so it can be embedded in Markdown and HTML.
    #[must_use]
    pub fn relative_src(&self) -> String {
        format!("{IMAGES_DIR}/{}", self.filename)
    }
}

/// File name for the image of the topic at `rank`: `topic_01.png`, `topic_02.png`, ...
#[must_use]
pub fn image_filename(rank: usize) -> String {
    format!("topic_{rank:02}.png")
}

/// A topic paired with its optional image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub topic: Topic,
    pub image: Option<GeneratedImage>,
}

/// The complete output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub generated_on: NaiveDate,
    pub post_count: usize,
    pub summary: TrendSummary,
    pub entries: Vec<ReportEntry>,
}

impl Report {
    /// Pairs topics with images by position. `images` may be shorter than
    /// `topics`; missing slots mean no image.
    #[must_use]
    pub fn new(
        generated_on: NaiveDate,
        post_count: usize,
        summary: TrendSummary,
        topics: Vec<Topic>,
        images: Vec<Option<GeneratedImage>>,
    ) -> Self {
        let mut images = images.into_iter();
        let entries = topics
            .into_iter()
            .map(|topic| ReportEntry {
                topic,
                image: images.next().flatten(),
            })
            .collect();

        Self {
            generated_on,
            post_count,
            summary,
            entries,
        }
    }

    #[must_use]
    pub fn images_generated(&self) -> usize {
        self.entries.iter().filter(|e| e.image.is_some()).count()
    }
}
