//! Fixed post set used when live collection is skipped or fails.

use meridian_core::Post;

/// Number of posts in [`sample_posts`].
pub const SAMPLE_POST_COUNT: usize = 20;

#[rustfmt::skip]
const SAMPLES: [(&str, &str, i64, u64); SAMPLE_POST_COUNT] = [
    ("MachineLearning", "Claude 3.5 Sonnet achieves state-of-the-art on multiple benchmarks", 2341, 456),
    ("LocalLLaMA", "Llama 3.1 405B running locally - my experience and benchmarks", 1876, 324),
    ("OpenAI", "GPT-5 reportedly in final testing phase, expected Q1 2025", 1654, 543),
    ("artificial", "Google DeepMind's new paper on AI safety gets mixed reactions", 1432, 287),
    ("ChatGPT", "Custom GPTs now support real-time data access", 1298, 198),
    ("StableDiffusion", "FLUX.1 Pro comparison with SDXL - detailed analysis", 1187, 234),
    ("singularity", "AI researchers predict AGI timeline moved up by 2 years", 1098, 456),
    ("ClaudeAI", "Claude's new computer use feature is mind-blowing", 987, 178),
    ("MachineLearning", "New paper: Attention is NOT all you need - alternative architectures", 876, 234),
    ("deeplearning", "NVIDIA announces next-gen AI chips with 2x performance", 823, 156),
    ("LocalLLaMA", "Best practices for fine-tuning Llama on consumer GPUs", 765, 143),
    ("OpenAI", "OpenAI's new reasoning model shows emergent capabilities", 732, 198),
    ("artificial", "EU AI Act enforcement begins - what you need to know", 698, 234),
    ("ChatGPT", "Voice mode now available to all users globally", 654, 123),
    ("ArtificialIntelligence", "Microsoft and OpenAI $100B data center plan confirmed", 621, 187),
    ("MachineLearning", "Mixture of Experts scaling laws - new research insights", 598, 145),
    ("StableDiffusion", "ComfyUI workflow for consistent characters across images", 567, 98),
    ("singularity", "AI coding assistants now write 30% of new code at major companies", 543, 234),
    ("LocalLLaMA", "MLX optimizations for Apple Silicon - 2x speed improvement", 512, 87),
    ("deeplearning", "State Space Models vs Transformers - comprehensive comparison", 487, 156),
];

/// Returns the fixed sample set, already sorted by descending score.
#[must_use]
pub fn sample_posts() -> Vec<Post> {
    SAMPLES
        .iter()
        .map(|&(source, title, score, num_comments)| {
            let link = format!("https://reddit.com/r/{source}/");
            Post {
                title: title.to_string(),
                score,
                num_comments,
                url: link.clone(),
                permalink: link,
                source: source.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::posts_to_text;

    #[test]
    fn has_twenty_posts_sorted_by_score() {
        let posts = sample_posts();
        assert_eq!(posts.len(), SAMPLE_POST_COUNT);
        assert!(posts.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn renders_like_live_posts() {
        let text = posts_to_text(&sample_posts());
        assert_eq!(text.lines().count(), 20);
        assert!(text.starts_with(
            "1. [MachineLearning] Claude 3.5 Sonnet achieves state-of-the-art on multiple benchmarks (Score: 2341, Comments: 456)"
        ));
        assert!(text.ends_with("(Score: 487, Comments: 156)"));
    }
}
