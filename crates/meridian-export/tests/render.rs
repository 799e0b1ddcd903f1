//! Renderer and writer tests over hand-built reports.

use std::path::PathBuf;

use chrono::NaiveDate;

use meridian_core::{image_filename, GeneratedImage, Report, Topic, TrendSummary};
use meridian_export::{render_html, render_markdown, write_report, ExportError, OutputLayout};

fn topic(rank: usize) -> Topic {
    Topic {
        rank,
        title: format!("Topic {rank}"),
        title_en: format!("Topic {rank}"),
        description: format!("What happened with topic {rank}."),
        keywords: vec!["AI".to_string(), "LLM".to_string()],
        importance: 8,
    }
}

fn image(rank: usize) -> GeneratedImage {
    GeneratedImage {
        rank,
        filename: image_filename(rank),
        path: PathBuf::from(format!("out/images/{}", image_filename(rank))),
    }
}

fn report(topic_count: usize, images: Vec<Option<GeneratedImage>>) -> Report {
    Report::new(
        NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date"),
        150,
        TrendSummary::new("Agents everywhere.\n\nOpen weights keep closing the gap."),
        (1..=topic_count).map(topic).collect(),
        images,
    )
}

// ---------------------------------------------------------------------------
// Image references
// ---------------------------------------------------------------------------

#[test]
fn zero_images_produce_no_image_references() {
    let report = report(3, vec![]);
    let md = render_markdown(&report);
    let html = render_html(&report);

    assert!(!md.contains("!["), "markdown should embed nothing:\n{md}");
    assert!(!md.contains("images/"));
    assert!(!html.contains("<img"));
    assert!(!html.contains("images/"));
    assert_eq!(html.matches("class=\"placeholder\"").count(), 3);
}

#[test]
fn rank_three_failure_references_only_successful_ranks() {
    let images: Vec<Option<GeneratedImage>> = (1..=10)
        .map(|rank| (rank != 3).then(|| image(rank)))
        .collect();
    let report = report(10, images);
    let md = render_markdown(&report);
    let html = render_html(&report);

    for rank in 1..=10 {
        assert!(md.contains(&format!("### {rank}. Topic {rank}")));
        let src = format!("images/topic_{rank:02}.png");
        assert_eq!(md.contains(&src), rank != 3, "markdown rank {rank}");
        assert_eq!(html.contains(&src), rank != 3, "html rank {rank}");
    }
    assert_eq!(md.matches("![").count(), 9);
    assert_eq!(html.matches("<img").count(), 9);
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

#[test]
fn rendering_is_deterministic() {
    let report = report(5, vec![Some(image(1)), None, Some(image(3))]);
    assert_eq!(render_markdown(&report), render_markdown(&report));
    assert_eq!(render_html(&report), render_html(&report));
}

#[test]
fn markdown_has_front_matter_and_summary_paragraphs() {
    let md = render_markdown(&report(1, vec![]));
    assert!(md.starts_with("---\ntitle: \"AI News Digest 2025-01-15\"\ndate: 2025-01-15\ntags:\n"));
    assert!(md.contains("# AI News Digest - January 15, 2025"));
    assert!(md.contains("Agents everywhere.\n\nOpen weights keep closing the gap.\n"));
    assert!(md.contains("**Keywords:** `AI` · `LLM`"));
    assert!(md.contains("(8/10)"));
}

#[test]
fn html_escapes_model_text() {
    let mut report = report(1, vec![]);
    report.entries[0].topic.title = "<script>alert(1)</script>".to_string();
    report.entries[0].topic.keywords = vec!["a&b".to_string()];
    let html = render_html(&report);

    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(html.contains("<span class=\"keyword\">a&amp;b</span>"));
}

#[test]
fn html_limits_keywords_and_previews_description() {
    let mut report = report(1, vec![]);
    report.entries[0].topic.keywords = (1..=8).map(|i| format!("kw{i}")).collect();
    report.entries[0].topic.description = "x".repeat(400);
    let html = render_html(&report);

    assert_eq!(html.matches("class=\"keyword\"").count(), 5);
    assert!(html.contains(&format!("<p>{}...</p>", "x".repeat(150))));
    assert!(html.contains("Top 1 Topics"));
}

#[test]
fn html_draws_importance_as_stars() {
    let html = render_html(&report(1, vec![]));
    assert!(html.contains(&format!(">{}</div>", "⭐".repeat(8))));
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

#[test]
fn write_report_creates_both_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = OutputLayout::new(dir.path().join("nested/output"));
    let report = report(2, vec![Some(image(1))]);

    let written = write_report(&report, &layout).expect("write");

    assert_eq!(written.markdown, layout.markdown_path());
    assert_eq!(written.html, layout.html_path());
    assert_eq!(
        std::fs::read_to_string(&written.markdown).expect("read md"),
        render_markdown(&report)
    );
    assert_eq!(
        std::fs::read_to_string(&written.html).expect("read html"),
        render_html(&report)
    );
}

#[test]
fn write_report_into_a_file_path_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "x").expect("write blocker");

    let result = write_report(&report(1, vec![]), &OutputLayout::new(&blocker));
    assert!(matches!(result, Err(ExportError::Write { .. })));
}
