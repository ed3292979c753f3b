// ABOUTME: Error types for feed parsing operations.
// ABOUTME: Provides FeedError enum with Parse, Invalid, and Empty variants.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while parsing a syndication feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The feed data could not be parsed (malformed XML/JSON).
    #[error("failed to parse feed: {0}")]
    Parse(String),

    /// The data parsed but is not a usable feed.
    #[error("invalid feed: {0}")]
    Invalid(String),

    /// The feed contains no entries.
    #[error("feed is empty: no entries found")]
    Empty,
}

impl FeedError {
    /// Wrap an underlying feed-rs error as a Parse error.
    pub fn parse(err: impl fmt::Display) -> Self {
        FeedError::Parse(err.to_string())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        FeedError::Invalid(msg.into())
    }
}
