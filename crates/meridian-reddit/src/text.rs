use std::fmt::Write as _;

use meridian_core::Post;

/// Renders posts as the numbered, one-per-line text blob sent to the summarizer.
///
/// ```text
/// 1. [LocalLLaMA] Llama 3.1 405B running locally (Score: 1876, Comments: 324)
/// ```
#[must_use]
pub fn posts_to_text(posts: &[Post]) -> String {
    let mut out = String::new();
    for (i, post) in posts.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(
            out,
            "{}. [{}] {} (Score: {}, Comments: {})",
            i + 1,
            post.source,
            post.title,
            post.score,
            post.num_comments
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(source: &str, title: &str, score: i64, num_comments: u64) -> Post {
        Post {
            title: title.to_string(),
            score,
            num_comments,
            url: String::new(),
            permalink: String::new(),
            source: source.to_string(),
        }
    }

    #[test]
    fn numbers_lines_from_one() {
        let text = posts_to_text(&[
            post("rust", "First", 10, 2),
            post("LocalLLaMA", "Second", -1, 0),
        ]);
        assert_eq!(
            text,
            "1. [rust] First (Score: 10, Comments: 2)\n2. [LocalLLaMA] Second (Score: -1, Comments: 0)"
        );
    }

    #[test]
    fn empty_input_is_empty_text() {
        assert_eq!(posts_to_text(&[]), "");
    }
}
