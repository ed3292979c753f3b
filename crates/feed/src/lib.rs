// ABOUTME: Syndication-feed source support plus the source-type dispatch layer.
// ABOUTME: Parses RSS/Atom/JSON feeds and normalizes entries into tidings items without a per-entry re-fetch.

pub mod error;
pub mod html_utils;
pub mod models;
pub mod normalize;
pub mod parser;
pub mod source;

pub use error::FeedError;
pub use html_utils::{decode_entities, strip_html};
pub use models::{Author, Feed, FeedItem};
pub use normalize::normalize_entry;
pub use parser::parse_feed_bytes;
pub use source::{build_client, fetch_and_normalize, SourceConfig, SourceError};
