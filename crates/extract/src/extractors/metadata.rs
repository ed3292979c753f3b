// ABOUTME: Metadata inference: publish date and author via ordered fallback strategy chains.
// ABOUTME: Each strategy is a pure function over the parsed tree; the first success wins, failures fall through.

use chrono::{DateTime, Utc};
use ego_tree::NodeRef;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node};
use serde_json::Value;

use crate::dom::{meta_content, normalize_ws, visible_text};

/// Visible "Month Day, Year" pattern, abbreviated or full month names.
static MONTH_DAY_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+\d{1,2},\s+\d{4}\b")
        .unwrap()
});

/// How much visible text from the top of the page the date scan examines.
const TEXT_SCAN_CHARS: usize = 4000;

/// Byline candidates must be short strings, not paragraphs.
const BYLINE_MIN_CHARS: usize = 2;
const BYLINE_MAX_CHARS: usize = 60;

/// At most this many keyword-bearing candidates are examined.
const BYLINE_CANDIDATE_LIMIT: usize = 30;

/// Shared input for the inference strategies: the parsed tree, the matched
/// article JSON-LD block, and the publisher's byline marker.
pub struct MetadataContext<'a> {
    pub doc: &'a Html,
    pub article: Option<&'a Value>,
    pub byline_keyword: &'a str,
}

type DateStrategy = for<'a> fn(&MetadataContext<'a>) -> Option<DateTime<Utc>>;
type AuthorStrategy = for<'a> fn(&MetadataContext<'a>) -> Option<String>;

const DATE_STRATEGIES: &[DateStrategy] =
    &[structured_data_date, meta_tag_date, visible_text_date];

const AUTHOR_STRATEGIES: &[AuthorStrategy] =
    &[structured_data_author, meta_tag_author, byline_author];

/// Infer the publish timestamp, normalized to UTC.
pub fn infer_published_at(ctx: &MetadataContext<'_>) -> Option<DateTime<Utc>> {
    DATE_STRATEGIES.iter().find_map(|strategy| strategy(ctx))
}

/// Infer the author. Absence at every step yields `None`, never an error.
pub fn infer_author(ctx: &MetadataContext<'_>) -> Option<String> {
    AUTHOR_STRATEGIES.iter().find_map(|strategy| strategy(ctx))
}

/// Parse a date string: RFC 3339 fast path, then loose month-name formats
/// pinned to midnight UTC, then dateparser for anything natural.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Date-only formats are pinned to UTC midnight so the calendar day
    // never shifts with the local timezone.
    const LOOSE_PATTERNS: &[&str] = &[
        "%b %e, %Y",
        "%b %d, %Y",
        "%e %b %Y",
        "%d %b %Y",
        "%B %e, %Y",
        "%B %d, %Y",
        "%e %B %Y",
        "%d %B %Y",
    ];
    for pat in LOOSE_PATTERNS {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(s.trim(), pat) {
            let naive_dt = date.and_hms_opt(0, 0, 0)?;
            return Some(DateTime::<Utc>::from_naive_utc_and_offset(naive_dt, Utc));
        }
    }

    if let Ok(dt) = dateparser::parse(s) {
        return Some(dt.with_timezone(&Utc));
    }

    None
}

fn structured_data_date(ctx: &MetadataContext<'_>) -> Option<DateTime<Utc>> {
    let article = ctx.article?;
    let raw = article
        .get("datePublished")
        .or_else(|| article.get("dateCreated"))?
        .as_str()?
        .trim();
    if raw.is_empty() {
        return None;
    }
    parse_date(raw)
}

fn meta_tag_date(ctx: &MetadataContext<'_>) -> Option<DateTime<Utc>> {
    let raw = meta_content(ctx.doc, "article:published_time")?;
    parse_date(&raw)
}

fn visible_text_date(ctx: &MetadataContext<'_>) -> Option<DateTime<Utc>> {
    let text = visible_text(ctx.doc.root_element());
    let top: String = text.chars().take(TEXT_SCAN_CHARS).collect();
    let matched = MONTH_DAY_YEAR_RE.find(&top)?;
    parse_date(matched.as_str())
}

fn structured_data_author(ctx: &MetadataContext<'_>) -> Option<String> {
    let author = ctx.article?.get("author")?;
    match author {
        // {"author": {"name": "..."}} or a bare name string
        Value::Object(map) => nonempty_str(map.get("name")?),
        Value::String(_) => nonempty_str(author),
        // {"author": [{"name": "..."}, ...]} - first valid name wins
        Value::Array(list) => list
            .iter()
            .filter_map(|entry| entry.get("name"))
            .find_map(nonempty_str),
        _ => None,
    }
}

fn nonempty_str(value: &Value) -> Option<String> {
    let s = value.as_str()?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn meta_tag_author(ctx: &MetadataContext<'_>) -> Option<String> {
    meta_content(ctx.doc, "author")
}

/// Bounded scan for a short team-byline string ("The Gemini Team" style):
/// visible text nodes containing the publisher keyword, length-bounded,
/// first hit within the candidate limit wins.
fn byline_author(ctx: &MetadataContext<'_>) -> Option<String> {
    let keyword = ctx.byline_keyword.to_lowercase();
    if keyword.is_empty() {
        return None;
    }

    let mut candidates = Vec::new();
    collect_text_nodes(*ctx.doc.root_element(), &mut candidates);

    let mut examined = 0usize;
    for text in candidates {
        if !text.to_lowercase().contains(&keyword) {
            continue;
        }
        examined += 1;
        if examined > BYLINE_CANDIDATE_LIMIT {
            break;
        }
        let len = text.chars().count();
        if (BYLINE_MIN_CHARS..=BYLINE_MAX_CHARS).contains(&len) {
            return Some(text);
        }
    }
    None
}

fn collect_text_nodes(node: NodeRef<'_, Node>, out: &mut Vec<String>) {
    for child in node.children() {
        match child.value() {
            Node::Text(t) => {
                let normalized = normalize_ws(t);
                if !normalized.is_empty() {
                    out.push(normalized);
                }
            }
            Node::Element(e) => {
                if !matches!(e.name(), "script" | "style" | "noscript" | "template") {
                    collect_text_nodes(child, out);
                }
            }
            _ => {}
        }
    }
}
