//! Shared data model, pipeline plan, and configuration for Meridian.

pub mod app_config;
pub mod config;
pub mod plan;
pub mod types;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use plan::{CollectionMode, ImageMode, PipelinePlan, SourceMethod};
pub use types::{
    image_filename, GeneratedImage, Post, Report, ReportEntry, Topic, TrendSummary, IMAGES_DIR,
    MAX_TOPIC_COUNT, MIN_TOPIC_COUNT,
};
