//! Pipeline shape selected by CLI flags.

/// How posts are fetched from Reddit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMethod {
    /// Scrape `old.reddit.com` listing pages.
    Scrape,
    /// Use the OAuth API (falls back to scraping without credentials).
    Api,
}

impl std::fmt::Display for SourceMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceMethod::Scrape => write!(f, "scrape"),
            SourceMethod::Api => write!(f, "api"),
        }
    }
}

/// Where the summarizer input comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionMode {
    /// Live collection; failure aborts the run.
    Live(SourceMethod),
    /// Live collection; failure substitutes the fixed sample set.
    LiveOrSample(SourceMethod),
    /// Bypass the collector and use the fixed sample set.
    Sample,
}

/// Whether the image stage runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMode {
    Generate,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelinePlan {
    pub collection: CollectionMode,
    pub images: ImageMode,
}

impl PipelinePlan {
    /// Builds a plan from the CLI's boolean flags.
    ///
    /// `skip_reddit` wins over `sample_fallback`: with the collector bypassed
    /// there is nothing to fall back from.
    #[must_use]
    pub fn from_flags(
        skip_images: bool,
        skip_reddit: bool,
        use_reddit_api: bool,
        sample_fallback: bool,
    ) -> Self {
        let method = if use_reddit_api {
            SourceMethod::Api
        } else {
            SourceMethod::Scrape
        };

        let collection = match (skip_reddit, sample_fallback) {
            (true, _) => CollectionMode::Sample,
            (false, true) => CollectionMode::LiveOrSample(method),
            (false, false) => CollectionMode::Live(method),
        };

        let images = if skip_images {
            ImageMode::Skip
        } else {
            ImageMode::Generate
        };

        Self { collection, images }
    }
}

impl Default for PipelinePlan {
    fn default() -> Self {
        Self::from_flags(false, false, false, false)
    }
}
