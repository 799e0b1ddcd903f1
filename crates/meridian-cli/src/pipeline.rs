//! Stage sequencing for one newsletter run.
//!
//! `Init → Collecting → Summarizing → (GeneratingImages | SkipImages) →
//! Exporting → Done`, with `Aborted` appended when collection, summarizing or
//! exporting fails for good.
//! Each stage talks to its service through a small trait so runs can be
//! exercised with in-memory fakes.

use std::future::Future;
use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

use meridian_claude::SummarizerError;
use meridian_core::{
    CollectionMode, GeneratedImage, ImageMode, PipelinePlan, Post, Report, Topic, TrendSummary,
};
use meridian_export::{write_report, ExportError, OutputLayout, WrittenFiles};
use meridian_images::ImageError;
use meridian_reddit::{posts_to_text, sample_posts, CollectorError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Collecting,
    Summarizing,
    GeneratingImages,
    SkipImages,
    Exporting,
    Done,
    Aborted,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::Collecting => "collecting",
            Stage::Summarizing => "summarizing",
            Stage::GeneratingImages => "generating images",
            Stage::SkipImages => "skip images",
            Stage::Exporting => "exporting",
            Stage::Done => "done",
            Stage::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

pub trait PostSource {
    fn collect_posts(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Post>, CollectorError>>;
}

pub trait Summarizer {
    fn summarize(
        &self,
        posts_text: &str,
    ) -> impl Future<Output = Result<(TrendSummary, Vec<Topic>), SummarizerError>>;
}

pub trait ImageGenerator {
    /// One slot per topic, in topic order.
    fn generate_images(
        &self,
        topics: &[Topic],
        images_dir: &Path,
    ) -> impl Future<Output = Result<Vec<Option<GeneratedImage>>, ImageError>>;
}

#[derive(Debug, Error)]
pub enum StageFailure {
    #[error(transparent)]
    Collect(#[from] CollectorError),
    #[error(transparent)]
    Summarize(#[from] SummarizerError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// An unrecoverable failure, tagged with the stage it happened in.
#[derive(Debug, Error)]
#[error("pipeline aborted during {stage}: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    /// Stages visited, ending with [`Stage::Aborted`].
    pub history: Vec<Stage>,
    #[source]
    pub source: StageFailure,
}

/// Per-run inputs that are not services.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub max_posts: usize,
    pub layout: OutputLayout,
    pub generated_on: NaiveDate,
}

#[derive(Debug)]
pub struct RunOutcome {
    pub history: Vec<Stage>,
    pub used_sample: bool,
    pub report: Report,
    pub files: WrittenFiles,
}

/// Runs every stage the plan enables, in order.
///
/// A missing `images` generator is treated like [`ImageMode::Skip`].
///
/// # Errors
///
/// Returns [`PipelineError`] naming the failed stage when collection fails
/// outside sample-fallback mode, or when summarizing or exporting fails. An
/// image stage failure only drops the images.
pub async fn run_pipeline<P, S, G>(
    plan: &PipelinePlan,
    source: &P,
    summarizer: &S,
    images: Option<&G>,
    settings: &RunSettings,
) -> Result<RunOutcome, PipelineError>
where
    P: PostSource,
    S: Summarizer,
    G: ImageGenerator,
{
    let mut history = vec![Stage::Init];

    enter(&mut history, Stage::Collecting);
    let (posts, used_sample) = match plan.collection {
        CollectionMode::Sample => {
            tracing::info!("skipping Reddit, using sample posts");
            (sample_posts(), true)
        }
        CollectionMode::Live(_) => match source.collect_posts(settings.max_posts).await {
            Ok(posts) => (posts, false),
            Err(e) => return Err(abort(history, Stage::Collecting, e.into())),
        },
        CollectionMode::LiveOrSample(_) => match source.collect_posts(settings.max_posts).await {
            Ok(posts) => (posts, false),
            Err(e) => {
                tracing::warn!(error = %e, "collection failed, falling back to sample posts");
                (sample_posts(), true)
            }
        },
    };
    tracing::info!(count = posts.len(), used_sample, "posts ready");

    enter(&mut history, Stage::Summarizing);
    let posts_text = posts_to_text(&posts);
    let (summary, topics) = match summarizer.summarize(&posts_text).await {
        Ok(result) => result,
        Err(e) => return Err(abort(history, Stage::Summarizing, e.into())),
    };

    let slots = match (plan.images, images) {
        (ImageMode::Generate, Some(generator)) => {
            enter(&mut history, Stage::GeneratingImages);
            match generator
                .generate_images(&topics, &settings.layout.images_dir())
                .await
            {
                Ok(slots) => slots,
                Err(e) => {
                    tracing::warn!(error = %e, "image stage failed, continuing without images");
                    vec![None; topics.len()]
                }
            }
        }
        (ImageMode::Generate, None) | (ImageMode::Skip, _) => {
            enter(&mut history, Stage::SkipImages);
            Vec::new()
        }
    };

    enter(&mut history, Stage::Exporting);
    let report = Report::new(settings.generated_on, posts.len(), summary, topics, slots);
    let files = match write_report(&report, &settings.layout) {
        Ok(files) => files,
        Err(e) => return Err(abort(history, Stage::Exporting, e.into())),
    };

    enter(&mut history, Stage::Done);
    Ok(RunOutcome {
        history,
        used_sample,
        report,
        files,
    })
}

fn enter(history: &mut Vec<Stage>, stage: Stage) {
    tracing::debug!(%stage, "entering stage");
    history.push(stage);
}

fn abort(mut history: Vec<Stage>, stage: Stage, source: StageFailure) -> PipelineError {
    tracing::error!(%stage, error = %source, "stage failed");
    history.push(Stage::Aborted);
    PipelineError {
        stage,
        history,
        source,
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
