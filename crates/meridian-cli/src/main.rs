use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use meridian_claude::{ClaudeClient, ClaudeSettings};
use meridian_core::{
    load_app_config, AppConfig, CollectionMode, ImageMode, PipelinePlan, SourceMethod,
    MAX_TOPIC_COUNT,
};
use meridian_export::OutputLayout;
use meridian_images::{ReplicateClient, ReplicateSettings};
use meridian_reddit::{CollectorSettings, RedditCollector};

mod adapters;
mod pipeline;

use adapters::ReplicateStage;
use pipeline::{run_pipeline, RunOutcome, RunSettings};

#[derive(Debug, Parser)]
#[command(name = "meridian")]
#[command(about = "Turn Reddit's AI communities into a Markdown and HTML news digest")]
struct Cli {
    /// Skip image generation
    #[arg(long)]
    skip_images: bool,

    /// Use the built-in sample posts instead of collecting from Reddit
    #[arg(long)]
    skip_reddit: bool,

    /// Collect through the Reddit OAuth API instead of scraping
    #[arg(long)]
    reddit_api: bool,

    /// Fall back to the sample posts when live collection fails
    #[arg(long)]
    sample_fallback: bool,

    /// Output directory (overrides MERIDIAN_OUTPUT_DIR)
    #[arg(long, value_name = "PATH")]
    output_dir: Option<PathBuf>,

    /// Number of topics to extract (overrides MERIDIAN_TOPIC_COUNT)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..=50))]
    topics: Option<u16>,
}

impl Cli {
    fn plan(&self) -> PipelinePlan {
        PipelinePlan::from_flags(
            self.skip_images,
            self.skip_reddit,
            self.reddit_api,
            self.sample_fallback,
        )
    }

    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.output_dir {
            config.output_dir.clone_from(dir);
        }
        if let Some(n) = self.topics {
            config.topic_count = usize::from(n).min(MAX_TOPIC_COUNT);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_app_config().context("failed to load configuration")?;
    cli.apply_overrides(&mut config);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut plan = cli.plan();
    let replicate = ReplicateSettings::from_app_config(&config);
    if plan.images == ImageMode::Generate && replicate.is_none() {
        tracing::warn!("REPLICATE_API_TOKEN not set; skipping image generation");
        plan.images = ImageMode::Skip;
    }
    tracing::info!(
        ?plan,
        topics = config.topic_count,
        output = %config.output_dir.display(),
        "starting run"
    );

    let method = match plan.collection {
        CollectionMode::Live(m) | CollectionMode::LiveOrSample(m) => m,
        CollectionMode::Sample => SourceMethod::Scrape,
    };
    let collector = RedditCollector::new(CollectorSettings::from_app_config(&config), method)
        .context("failed to build Reddit client")?;
    let summarizer = ClaudeClient::new(ClaudeSettings::from_app_config(&config))
        .context("failed to build Claude client")?;
    let images = match replicate {
        Some(settings) if plan.images == ImageMode::Generate => Some(ReplicateStage {
            client: ReplicateClient::new(settings).context("failed to build Replicate client")?,
            concurrency: config.image_concurrency,
        }),
        _ => None,
    };

    let settings = RunSettings {
        max_posts: config.reddit_max_posts,
        layout: OutputLayout::new(&config.output_dir),
        generated_on: chrono::Local::now().date_naive(),
    };

    let started = Instant::now();
    match run_pipeline(&plan, &collector, &summarizer, images.as_ref(), &settings).await {
        Ok(outcome) => {
            tracing::debug!(history = ?outcome.history, "stages visited");
            print_completion(&outcome, started.elapsed().as_secs());
            Ok(())
        }
        Err(e) => {
            tracing::debug!(history = ?e.history, "stages visited");
            Err(e.into())
        }
    }
}

fn print_completion(outcome: &RunOutcome, elapsed_secs: u64) {
    let report = &outcome.report;
    println!("# Meridian run complete");
    println!();
    println!(
        "- Posts analysed: {}{}",
        report.post_count,
        if outcome.used_sample { " (sample data)" } else { "" }
    );
    println!("- Topics: {}", report.entries.len());
    println!(
        "- Images: {}/{}",
        report.images_generated(),
        report.entries.len()
    );
    println!("- Markdown: {}", outcome.files.markdown.display());
    println!("- HTML: {}", outcome.files.html.display());
    println!("- Elapsed: {elapsed_secs}s");
    println!();
    for entry in &report.entries {
        println!("{}. {}", entry.topic.rank, entry.topic.title);
    }
}
