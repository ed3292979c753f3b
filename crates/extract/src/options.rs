// ABOUTME: Configuration options for the normalization client plus a fluent ClientBuilder.
// ABOUTME: Covers fetch tuning (timeout, user-agent, headers) and per-source identity (name, type, tags).

use std::collections::HashMap;
use std::time::Duration;

use crate::client::Client;
use crate::item::SourceType;

/// Default bounded total timeout for one fetch.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Fixed identifying user-agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "TidingsBot/0.1 (+contact: crawler@tidings.dev)";

/// Configuration for a [`Client`].
#[derive(Debug, Clone)]
pub struct Options {
    pub timeout: Duration,
    pub user_agent: String,
    pub headers: HashMap<String, String>,
    pub http_client: Option<reqwest::Client>,
    /// Human-readable name of the source this client crawls.
    pub source_name: String,
    pub source_type: SourceType,
    /// Fixed tags attached to every emitted item.
    pub tags: Vec<String>,
    /// Publisher-specific marker for the byline fallback heuristic.
    pub byline_keyword: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: HashMap::new(),
            http_client: None,
            source_name: String::new(),
            source_type: SourceType::RenderedHtml,
            tags: Vec::new(),
            byline_keyword: "team".to_string(),
        }
    }
}

/// Builder for constructing [`Client`] instances.
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bounded total timeout for fetches.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Override the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Add a header sent with every request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Use a pre-built HTTP client instead of constructing one.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Set the source name recorded on emitted items.
    pub fn source_name(mut self, name: impl Into<String>) -> Self {
        self.opts.source_name = name.into();
        self
    }

    /// Set the source type recorded on emitted items.
    pub fn source_type(mut self, source_type: SourceType) -> Self {
        self.opts.source_type = source_type;
        self
    }

    /// Attach fixed tags to every emitted item.
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.opts.tags = tags;
        self
    }

    /// Set the publisher keyword for the byline fallback heuristic.
    pub fn byline_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.opts.byline_keyword = keyword.into();
        self
    }

    /// Build the client with the configured options.
    pub fn build(self) -> Client {
        Client::new(self.opts)
    }
}
