//! Listing-page parser for `old.reddit.com/r/{sub}/hot/`.
//!
//! Old Reddit renders each post as a `div.thing` carrying most metadata in
//! `data-*` attributes. The parser walks those blocks with regexes instead of
//! a DOM, which is enough for the handful of fields Meridian needs.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

use meridian_core::Post;

static DIV_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<div\b[^>]*>").expect("valid regex"));

static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b([^>]*)>(.*?)</a>").expect("valid regex"));

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<[^>]+>").expect("valid regex"));

static DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Parses up to `limit` non-promoted posts out of a listing page.
///
/// Relative permalinks and self-post URLs are resolved against `link_base`
/// (normally `https://reddit.com`). Blocks without a title link are skipped.
pub(crate) fn parse_listing(
    html: &str,
    subreddit: &str,
    limit: usize,
    link_base: &str,
) -> Vec<Post> {
    let starts: Vec<(usize, &str)> = DIV_TAG_RE
        .find_iter(html)
        .filter(|m| has_class(m.as_str(), "thing"))
        .map(|m| (m.start(), m.as_str()))
        .collect();

    let mut posts = Vec::new();
    for (i, (start, tag)) in starts.iter().enumerate() {
        if posts.len() >= limit {
            break;
        }
        if is_promoted(tag) {
            continue;
        }
        let end = starts.get(i + 1).map_or(html.len(), |(next, _)| *next);
        let block = &html[*start..end];

        if let Some(post) = parse_thing(tag, block, subreddit, link_base) {
            posts.push(post);
        }
    }
    posts
}

fn parse_thing(tag: &str, block: &str, subreddit: &str, link_base: &str) -> Option<Post> {
    let (title_attrs, title_html) = ANCHOR_RE
        .captures_iter(block)
        .filter_map(|c| Some((c.get(1)?.as_str(), c.get(2)?.as_str())))
        .find(|(attrs, _)| has_class(attrs, "title"))?;

    let title = clean_text(title_html);
    if title.is_empty() {
        return None;
    }

    let permalink = extract_attr(tag, "data-permalink")
        .map(|p| absolutize(&p, link_base))
        .unwrap_or_default();

    let url = extract_attr(title_attrs, "href")
        .map(|href| absolutize(&href, link_base))
        .unwrap_or_else(|| permalink.clone());

    Some(Post {
        title,
        score: parse_score(tag, block),
        num_comments: parse_comment_count(block),
        url,
        permalink,
        source: subreddit.to_string(),
    })
}

/// Score from the thing's `data-score`, falling back to the title of the
/// `div.score.unvoted` counter. The `likes`/`dislikes` counters are off by one
/// and never read. Hidden scores (rendered as a bullet) count as zero.
fn parse_score(tag: &str, block: &str) -> i64 {
    let parse = |s: String| s.trim().parse::<i64>().ok();

    extract_attr(tag, "data-score")
        .and_then(parse)
        .or_else(|| {
            DIV_TAG_RE
                .find_iter(block)
                .map(|m| m.as_str())
                .filter(|t| has_class(t, "score") && has_class(t, "unvoted"))
                .find_map(|t| extract_attr(t, "title"))
                .and_then(parse)
        })
        .unwrap_or(0)
}

/// Digits in the `a.comments` link text ("123 comments"); "comment" alone is zero.
fn parse_comment_count(block: &str) -> u64 {
    ANCHOR_RE
        .captures_iter(block)
        .filter(|c| c.get(1).is_some_and(|a| has_class(a.as_str(), "comments")))
        .find_map(|c| {
            let text = clean_text(c.get(2)?.as_str());
            let digits = DIGITS_RE.find(&text)?.as_str().replace(',', "");
            digits.parse().ok()
        })
        .unwrap_or(0)
}

fn is_promoted(tag: &str) -> bool {
    has_class(tag, "promoted")
        || extract_attr(tag, "data-promoted").is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

fn has_class(tag: &str, class: &str) -> bool {
    extract_attr(tag, "class").is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
}

/// Returns the value of attribute `attr` in an HTML tag, entity-decoded.
fn extract_attr(tag: &str, attr: &str) -> Option<String> {
    let pattern = format!(
        r#"(?is)(?:^|[\s<])(?:{})\s*=\s*(?:"([^"]*)"|'([^']*)')"#,
        regex::escape(attr)
    );
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(tag)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| decode_entities(m.as_str()))
}

fn absolutize(href: &str, link_base: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    Url::parse(link_base)
        .and_then(|base| base.join(href))
        .map_or_else(|_| format!("{link_base}{href}"), |u| u.to_string())
}

/// Strips tags, decodes entities, and collapses whitespace.
fn clean_text(html: &str) -> String {
    let stripped = TAG_RE.replace_all(html, " ");
    let decoded = decode_entities(&stripped);
    WHITESPACE_RE.replace_all(decoded.trim(), " ").into_owned()
}

fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
