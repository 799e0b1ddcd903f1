/// Builds the single user message asking for a trend summary and exactly
/// `topic_count` ranked topics as one JSON object.
#[must_use]
pub fn build_prompt(posts_text: &str, topic_count: usize) -> String {
    format!(
        r#"You are a professional AI industry analyst. Analyze the following AI-related posts collected from Reddit.

Reddit posts:
{posts_text}

Produce two things:
1. "summary": a professional trend summary in 2-4 paragraphs separated by blank lines, covering the overall trend, the key discussion topics, technology directions, and community focus. Write in an accessible style without excessive jargon.
2. "topics": exactly {topic_count} of the most important topics, ordered from most to least important. Each topic has:
   - "title": concise, impactful topic title
   - "title_en": English title (used for image generation)
   - "description": 2-3 sentence description
   - "keywords": list of keywords (used for image generation)
   - "importance": integer score from 1 to 10

Return only a single JSON object and nothing else, in this shape:
{{
  "summary": "First paragraph...\n\nSecond paragraph...",
  "topics": [
    {{
      "title": "GPT-5 Release Imminent",
      "title_en": "GPT-5 Release Imminent",
      "description": "OpenAI is about to release its next-generation language model...",
      "keywords": ["GPT-5", "OpenAI", "language model", "AI"],
      "importance": 9
    }}
  ]
}}"#
    )
}
