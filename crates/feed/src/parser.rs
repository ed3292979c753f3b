// ABOUTME: Feed parsing implementation using feed-rs.
// ABOUTME: Maps feed-rs types to internal models, keeping raw entry HTML for downstream extraction.

use crate::error::FeedError;
use crate::html_utils::strip_html;
use crate::models::{Author, Feed, FeedItem};
use feed_rs::model::{Entry, Link, Person};

/// Parses feed bytes into a [`Feed`].
///
/// # Arguments
/// * `data` - Raw feed bytes (RSS, Atom, or JSON Feed)
/// * `feed_url` - The URL the feed was fetched from (stored as-is)
pub fn parse_feed_bytes(data: &[u8], feed_url: &str) -> Result<Feed, FeedError> {
    let parsed = feed_rs::parser::parse(data).map_err(FeedError::parse)?;

    if parsed.entries.is_empty() {
        return Err(FeedError::Empty);
    }

    let feed_language = parsed.language.clone();
    let items: Vec<FeedItem> = parsed
        .entries
        .iter()
        .map(|entry| map_entry(entry, feed_language.as_deref()))
        .collect();

    Ok(Feed {
        title: parsed.title.map(|t| t.content).unwrap_or_default(),
        home_url: extract_home_url(&parsed.links),
        feed_url: feed_url.to_string(),
        description: parsed.description.map(|d| d.content).unwrap_or_default(),
        language: feed_language,
        author: parsed.authors.first().map(person_to_author),
        published: parsed.published,
        updated: parsed.updated.or(parsed.published),
        items,
    })
}

/// Prefers the link with rel="alternate", otherwise the first link href.
fn extract_home_url(links: &[Link]) -> String {
    links
        .iter()
        .find(|link| link.rel.as_deref() == Some("alternate"))
        .or_else(|| links.first())
        .map(|link| link.href.clone())
        .unwrap_or_default()
}

fn is_enclosure_link(link: &Link) -> bool {
    link.rel.as_deref() == Some("enclosure")
}

/// Entry URL: rel="alternate", then first non-enclosure link, then the id.
fn extract_item_url(entry: &Entry) -> String {
    if let Some(link) = entry
        .links
        .iter()
        .find(|link| link.rel.as_deref() == Some("alternate"))
    {
        return link.href.clone();
    }
    if let Some(link) = entry.links.iter().find(|link| !is_enclosure_link(link)) {
        return link.href.clone();
    }
    entry.id.clone()
}

fn map_entry(entry: &Entry, feed_language: Option<&str>) -> FeedItem {
    let item_url = extract_item_url(entry);

    let summary_html = entry
        .summary
        .as_ref()
        .map(|t| t.content.clone())
        .unwrap_or_default();
    let summary = strip_html(&summary_html);

    // Prefer the full content body; fall back to the summary fragment.
    let content_html = entry
        .content
        .as_ref()
        .and_then(|c| {
            c.body
                .clone()
                .or_else(|| c.src.as_ref().map(|l| l.href.clone()))
        })
        .unwrap_or_else(|| summary_html.clone());
    let content = strip_html(&content_html);

    FeedItem {
        title: entry
            .title
            .as_ref()
            .map(|t| t.content.clone())
            .unwrap_or_default(),
        url: item_url,
        summary,
        content,
        content_html,
        guid: entry.id.clone(),
        language: entry
            .language
            .clone()
            .or_else(|| feed_language.map(String::from)),
        published: entry.published,
        updated: entry.updated.or(entry.published),
        author: entry.authors.first().map(person_to_author),
        categories: entry.categories.iter().map(|c| c.term.clone()).collect(),
    }
}

fn person_to_author(person: &Person) -> Author {
    Author {
        name: Some(person.name.clone()),
        email: person.email.clone(),
        uri: person.uri.clone(),
    }
}
