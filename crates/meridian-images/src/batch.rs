use std::path::Path;

use futures::stream::{self, StreamExt};

use meridian_core::{image_filename, GeneratedImage, Topic};

use crate::client::ReplicateClient;
use crate::error::ImageError;
use crate::prompt::image_prompt;

/// Generates one image per topic into `images_dir`, at most `concurrency` at a time.
///
/// Returns one slot per topic in input order. A topic whose prompt or
/// generation fails is logged and left as `None`; the rest continue.
///
/// # Errors
///
/// Returns [`ImageError::Io`] only if `images_dir` cannot be created.
pub async fn generate_images(
    client: &ReplicateClient,
    topics: &[Topic],
    images_dir: &Path,
    concurrency: usize,
) -> Result<Vec<Option<GeneratedImage>>, ImageError> {
    tokio::fs::create_dir_all(images_dir).await?;

    tracing::info!(count = topics.len(), concurrency, "generating topic images");

    let mut slots: Vec<Option<GeneratedImage>> = vec![None; topics.len()];

    let results: Vec<(usize, Result<GeneratedImage, ImageError>)> =
        stream::iter(topics.iter().enumerate())
            .map(|(index, topic)| async move {
                (index, generate_one(client, topic, images_dir).await)
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

    for (index, result) in results {
        match result {
            Ok(image) => {
                tracing::info!(rank = image.rank, file = %image.filename, "image generated");
                slots[index] = Some(image);
            }
            Err(e) => {
                tracing::warn!(
                    rank = topics[index].rank,
                    error = %e,
                    "image generation failed, continuing"
                );
            }
        }
    }

    Ok(slots)
}

async fn generate_one(
    client: &ReplicateClient,
    topic: &Topic,
    images_dir: &Path,
) -> Result<GeneratedImage, ImageError> {
    let prompt = image_prompt(topic)?;
    let filename = image_filename(topic.rank);
    let path = images_dir.join(&filename);
    let path = client.generate_image(&prompt, &path).await?;
    Ok(GeneratedImage {
        rank: topic.rank,
        filename,
        path,
    })
}
