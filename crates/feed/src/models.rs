// ABOUTME: Internal Rust models for parsed feed data.
// ABOUTME: Feed, FeedItem, and Author with chrono timestamps; the raw entry HTML is kept for extraction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An author with optional name, email, and URI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: Option<String>,
    pub email: Option<String>,
    pub uri: Option<String>,
}

/// A single entry within a feed.
///
/// `content_html` keeps the entry's raw markup fragment so that image and
/// outbound-link extraction can run over it; `content` and `summary` are the
/// stripped plain-text forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub content: String,
    pub content_html: String,
    pub guid: String,
    pub language: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub author: Option<Author>,
    pub categories: Vec<String>,
}

/// A parsed feed with metadata and entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    pub title: String,
    pub home_url: String,
    pub feed_url: String,
    pub description: String,
    pub language: Option<String>,
    pub author: Option<Author>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub items: Vec<FeedItem>,
}
