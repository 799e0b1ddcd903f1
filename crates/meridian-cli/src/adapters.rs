//! Stage traits implemented by the real service clients.

use std::path::Path;

use meridian_claude::{ClaudeClient, SummarizerError};
use meridian_core::{GeneratedImage, Post, Topic, TrendSummary};
use meridian_images::{ImageError, ReplicateClient};
use meridian_reddit::{CollectorError, RedditCollector};

use crate::pipeline::{ImageGenerator, PostSource, Summarizer};

impl PostSource for RedditCollector {
    async fn collect_posts(&self, limit: usize) -> Result<Vec<Post>, CollectorError> {
        RedditCollector::collect_posts(self, limit).await
    }
}

impl Summarizer for ClaudeClient {
    async fn summarize(
        &self,
        posts_text: &str,
    ) -> Result<(TrendSummary, Vec<Topic>), SummarizerError> {
        ClaudeClient::summarize(self, posts_text).await
    }
}

/// Replicate client plus the worker-pool width for the batch.
pub struct ReplicateStage {
    pub client: ReplicateClient,
    pub concurrency: usize,
}

impl ImageGenerator for ReplicateStage {
    async fn generate_images(
        &self,
        topics: &[Topic],
        images_dir: &Path,
    ) -> Result<Vec<Option<GeneratedImage>>, ImageError> {
        meridian_images::generate_images(&self.client, topics, images_dir, self.concurrency).await
    }
}
