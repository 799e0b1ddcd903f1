//! Topic illustrations via Replicate's FLUX schnell model.

pub mod batch;
pub mod client;
pub mod error;
pub mod prompt;

pub use batch::generate_images;
pub use client::{ReplicateClient, ReplicateSettings};
pub use error::ImageError;
pub use prompt::image_prompt;
