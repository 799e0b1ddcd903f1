//! Obsidian-flavoured Markdown note.

use std::fmt::Write as _;

use meridian_core::{Report, ReportEntry};

const TAGS: &[&str] = &["ai-news", "reddit", "newsletter"];

/// Renders the report as Markdown with YAML front matter.
///
/// Image embeds use plain `![alt](images/topic_NN.png)` links so the note
/// renders outside Obsidian too. Entries without an image get no embed.
#[must_use]
pub fn render_markdown(report: &Report) -> String {
    let iso = report.generated_on.format("%Y-%m-%d");
    let long = report.generated_on.format("%B %d, %Y");
    let mut out = String::new();

    let _ = writeln!(out, "---\ntitle: \"AI News Digest {iso}\"\ndate: {iso}\ntags:");
    for tag in TAGS {
        let _ = writeln!(out, "  - {tag}");
    }
    out.push_str("---\n\n");

    let _ = writeln!(out, "# AI News Digest - {long}\n");
    let _ = writeln!(
        out,
        "> Auto-generated from {} Reddit posts\n",
        report.post_count
    );

    out.push_str("## Trend Summary\n\n");
    for paragraph in report.summary.paragraphs() {
        let _ = writeln!(out, "{paragraph}\n");
    }

    let _ = writeln!(out, "## Top {} Topics\n", report.entries.len());
    for entry in &report.entries {
        render_entry(&mut out, entry);
    }
    out
}

fn render_entry(out: &mut String, entry: &ReportEntry) {
    let topic = &entry.topic;
    let _ = writeln!(out, "### {}. {}\n", topic.rank, topic.title);

    if let Some(image) = &entry.image {
        let _ = writeln!(
            out,
            "![{}]({})\n",
            alt_text(&topic.title),
            image.relative_src()
        );
    }

    let _ = writeln!(
        out,
        "**Importance:** {} ({}/10)\n",
        "⭐".repeat(usize::from(topic.importance.min(10))),
        topic.importance
    );
    let _ = writeln!(out, "{}\n", topic.description);

    if !topic.keywords.is_empty() {
        let keywords: Vec<String> = topic.keywords.iter().map(|k| format!("`{k}`")).collect();
        let _ = writeln!(out, "**Keywords:** {}\n", keywords.join(" · "));
    }

    out.push_str("---\n\n");
}

/// Brackets would end the alt text early.
fn alt_text(title: &str) -> String {
    title.replace('[', "\\[").replace(']', "\\]")
}
