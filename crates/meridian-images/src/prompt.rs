use meridian_core::Topic;

use crate::error::ImageError;

const MAX_PROMPT_KEYWORDS: usize = 3;
const DEFAULT_KEYWORDS: &[&str] = &["AI", "technology"];

/// Builds the FLUX prompt for a topic from its English title and first three
/// keywords. Pure and deterministic.
///
/// # Errors
///
/// Returns [`ImageError::InvalidTopic`] when both `title_en` and `title` are blank.
pub fn image_prompt(topic: &Topic) -> Result<String, ImageError> {
    let title = [topic.title_en.trim(), topic.title.trim()]
        .into_iter()
        .find(|t| !t.is_empty())
        .ok_or_else(|| {
            ImageError::InvalidTopic(format!("topic {} has an empty title", topic.rank))
        })?;

    let keywords: Vec<&str> = topic
        .keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .take(MAX_PROMPT_KEYWORDS)
        .collect();
    let keywords = if keywords.is_empty() {
        DEFAULT_KEYWORDS.join(", ")
    } else {
        keywords.join(", ")
    };

    Ok(format!(
        "Abstract digital visualization representing {title}, featuring {keywords}, \
         futuristic tech aesthetic, glowing neural network patterns, \
         deep blue and cyan color palette, volumetric lighting, \
         professional concept art, 8k ultra detailed, trending on artstation"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(title: &str, title_en: &str, keywords: &[&str]) -> Topic {
        Topic {
            rank: 4,
            title: title.to_string(),
            title_en: title_en.to_string(),
            description: "d".to_string(),
            keywords: keywords.iter().map(ToString::to_string).collect(),
            importance: 7,
        }
    }

    #[test]
    fn uses_english_title_and_three_keywords() {
        let agents = topic("Agents", "AI Agents", &["agents", "tools", "MCP", "extra"]);
        let prompt = image_prompt(&agents).unwrap();
        assert!(prompt.starts_with(
            "Abstract digital visualization representing AI Agents, featuring agents, tools, MCP, futuristic"
        ));
        assert!(!prompt.contains("extra"));
        assert!(prompt.ends_with("trending on artstation"));
    }

    #[test]
    fn falls_back_to_title_and_default_keywords() {
        let prompt = image_prompt(&topic("Open Weights", " ", &[])).unwrap();
        assert!(prompt.contains("representing Open Weights, featuring AI, technology,"));
    }

    #[test]
    fn is_deterministic() {
        let t = topic("A", "A", &["x"]);
        assert_eq!(image_prompt(&t).unwrap(), image_prompt(&t).unwrap());
    }

    #[test]
    fn empty_title_is_rejected() {
        let result = image_prompt(&topic("", "", &["x"]));
        assert!(matches!(result, Err(ImageError::InvalidTopic(_))));
    }
}
