//! Single-page HTML digest with a summary section and a card grid.

use std::fmt::Write as _;

use meridian_core::{Report, ReportEntry};

const STYLE: &str = include_str!("style.css");

/// Characters of a description shown on a card before it is cut with "...".
pub const DESCRIPTION_PREVIEW_CHARS: usize = 150;
/// Keyword chips shown per card.
pub const MAX_KEYWORD_CHIPS: usize = 5;

/// Renders the report as a standalone HTML page.
///
/// All model-supplied text is escaped. Topics without an image get a
/// placeholder block instead of an `<img>`.
#[must_use]
pub fn render_html(report: &Report) -> String {
    let date = report.generated_on.format("%B %d, %Y").to_string();
    let mut out = String::with_capacity(STYLE.len() + 4096);

    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>AI News Digest - {date}</title>\n<style>\n{STYLE}</style>\n</head>\n<body>\n\
         <div class=\"container\">\n<header>\n<h1>AI News Digest</h1>\n\
         <p class=\"subtitle\">{date} · Auto-generated from {} Reddit posts</p>\n</header>\n",
        report.post_count
    );

    out.push_str("<section class=\"summary-section\">\n<h2>Trend Summary</h2>\n");
    for paragraph in report.summary.paragraphs() {
        let _ = writeln!(out, "<p>{}</p>", escape_html(paragraph));
    }
    out.push_str("</section>\n");

    let _ = write!(
        out,
        "<section class=\"grid-section\">\n<h2>Top {} Topics</h2>\n<div class=\"grid\">\n",
        report.entries.len()
    );
    for entry in &report.entries {
        render_card(&mut out, entry);
    }
    out.push_str("</div>\n</section>\n");

    out.push_str(
        "<footer>\n<p>Auto-generated by Meridian · Powered by Claude API + Replicate</p>\n</footer>\n\
         </div>\n</body>\n</html>\n",
    );
    out
}

fn render_card(out: &mut String, entry: &ReportEntry) {
    let topic = &entry.topic;
    let title = escape_html(&topic.title);

    out.push_str("<div class=\"card\">\n<div class=\"card-image\">\n");
    match &entry.image {
        Some(image) => {
            let _ = writeln!(
                out,
                "<img src=\"{}\" alt=\"{title}\" loading=\"lazy\">",
                escape_html(&image.relative_src())
            );
        }
        None => out.push_str("<div class=\"placeholder\">No image</div>\n"),
    }
    out.push_str("</div>\n<div class=\"card-content\">\n");

    let _ = writeln!(out, "<h3>{}. {title}</h3>", topic.rank);
    let _ = writeln!(
        out,
        "<div class=\"importance\" title=\"{}/10\">{}</div>",
        topic.importance,
        "⭐".repeat(usize::from(topic.importance.min(10)))
    );
    let _ = writeln!(out, "<p>{}</p>", escape_html(&preview(&topic.description)));

    let chips: Vec<String> = topic
        .keywords
        .iter()
        .take(MAX_KEYWORD_CHIPS)
        .map(|k| format!("<span class=\"keyword\">{}</span>", escape_html(k)))
        .collect();
    let _ = writeln!(out, "<div class=\"keywords\">{}</div>", chips.join(" "));

    out.push_str("</div>\n</div>\n");
}

/// First [`DESCRIPTION_PREVIEW_CHARS`] characters, with "..." when cut.
fn preview(text: &str) -> String {
    match text.char_indices().nth(DESCRIPTION_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Escapes the five HTML-significant characters.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#x27;y&#x27;&lt;/script&gt;"
        );
    }

    #[test]
    fn preview_cuts_on_char_boundaries() {
        let long = "é".repeat(200);
        let cut = preview(&long);
        assert_eq!(cut.chars().count(), DESCRIPTION_PREVIEW_CHARS + 3);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn short_text_is_not_cut() {
        assert_eq!(preview("short"), "short");
        let exact = "a".repeat(DESCRIPTION_PREVIEW_CHARS);
        assert_eq!(preview(&exact), exact);
    }
}
