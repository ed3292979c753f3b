// ABOUTME: The normalization client: fetches a URL and assembles the canonical NormalizedItem.
// ABOUTME: normalize() is fetch + normalize_html(); normalize_html() is the pure, synchronous pipeline remainder.

use chrono::Utc;
use futures::StreamExt;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::classify::classify;
use crate::dom::{
    extract_json_ld, find_article_object, meta_content, parse_document, visible_text,
};
use crate::error::{ExtractionError, NormalizeError};
use crate::extractors::content::extract_body_text;
use crate::extractors::links::extract_outbound_links;
use crate::extractors::media::extract_images;
use crate::extractors::metadata::{infer_author, infer_published_at, MetadataContext};
use crate::identity::{content_hash, source_id};
use crate::item::{NormalizedItem, PipelineStatus};
use crate::options::{ClientBuilder, Options};
use crate::resource::{fetch, FetchResult};

static H1_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static CANONICAL_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"link[rel="canonical"]"#).unwrap());
static HTML_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("html").unwrap());

/// The normalization client. One URL in, one immutable [`NormalizedItem`]
/// out; no shared mutable state, so clients may be used from any number of
/// concurrent tasks.
pub struct Client {
    opts: Options,
    http_client: reqwest::Client,
}

impl Client {
    /// Create a builder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client with the given options.
    pub fn new(opts: Options) -> Self {
        let http_client = opts.http_client.clone().unwrap_or_else(|| {
            let mut headers = reqwest::header::HeaderMap::new();
            for (key, value) in &opts.headers {
                let name = reqwest::header::HeaderName::try_from(key.as_str());
                let val = reqwest::header::HeaderValue::try_from(value.as_str());
                if let (Ok(name), Ok(val)) = (name, val) {
                    headers.insert(name, val);
                }
            }

            reqwest::Client::builder()
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .default_headers(headers)
                .cookie_store(true)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .expect("failed to build HTTP client")
        });

        Self { opts, http_client }
    }

    /// The effective options for this client.
    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Fetch a URL without running extraction. Used by source layers that
    /// consume non-HTML payloads (feeds, JSON APIs).
    pub async fn fetch_raw(&self, url: &str) -> Result<FetchResult, NormalizeError> {
        if Url::parse(url).is_err() {
            return Err(NormalizeError::InvalidUrl(url.to_string()));
        }
        let timeout_secs = self.opts.timeout.as_secs();
        Ok(fetch(&self.http_client, url, timeout_secs).await?)
    }

    /// Run the full pipeline for one URL.
    pub async fn normalize(&self, url: &str) -> Result<NormalizedItem, NormalizeError> {
        let fetched = self.fetch_raw(url).await?;
        tracing::debug!(url, final_url = %fetched.final_url, status = fetched.status, "fetched document");
        let html = fetched.text();
        self.assemble(&html, url, &fetched.final_url)
    }

    /// Run the pure remainder of the pipeline over already-fetched markup.
    ///
    /// `url` stands in for both the source and final URL; useful for
    /// testing and for callers with their own fetch layer (e.g. a
    /// headless-browser renderer).
    pub fn normalize_html(&self, html: &str, url: &str) -> Result<NormalizedItem, NormalizeError> {
        if Url::parse(url).is_err() {
            return Err(NormalizeError::InvalidUrl(url.to_string()));
        }
        self.assemble(html, url, url)
    }

    /// Normalize many URLs with caller-bounded concurrency. Results come
    /// back in input order; each URL's failure is isolated.
    pub async fn normalize_many(
        &self,
        urls: &[String],
        limit: usize,
    ) -> Vec<Result<NormalizedItem, NormalizeError>> {
        futures::stream::iter(urls.iter().map(|url| self.normalize(url)))
            .buffered(limit.max(1))
            .collect()
            .await
    }

    /// Compose parsed-tree extraction into the canonical record.
    fn assemble(
        &self,
        html: &str,
        source_url: &str,
        final_url: &str,
    ) -> Result<NormalizedItem, NormalizeError> {
        let doc = parse_document(html);

        let json_ld = extract_json_ld(&doc);
        let article = find_article_object(&json_ld);

        let title = extract_title(&doc, article)
            .ok_or(ExtractionError::MissingRequiredField("title"))?;

        let canonical_url = extract_canonical(&doc, article, final_url);
        let base = Url::parse(&canonical_url)
            .or_else(|_| Url::parse(final_url))
            .map_err(|_| NormalizeError::InvalidUrl(final_url.to_string()))?;
        let canonical_host = base.host_str().unwrap_or("").to_string();

        let body = extract_body_text(&doc);
        if body.is_empty() {
            return Err(ExtractionError::MissingRequiredField("body").into());
        }

        let meta_ctx = MetadataContext {
            doc: &doc,
            article,
            byline_keyword: &self.opts.byline_keyword,
        };
        let published_at = infer_published_at(&meta_ctx);
        let author = infer_author(&meta_ctx);

        let summary_hint =
            meta_content(&doc, "og:description").or_else(|| meta_content(&doc, "description"));
        let language = extract_language(&doc);

        let (image_urls, image_positions) = extract_images(&doc, &base);
        let outbound_urls = extract_outbound_links(&doc, &base, &canonical_host);

        let (content_type, category_hints) = classify(&canonical_url, &title, &body);

        let source_id = source_id(&canonical_url);
        let content_hash = content_hash(&canonical_url, &title, published_at, &body);

        tracing::debug!(
            canonical = %canonical_url,
            images = image_positions.len(),
            outbound = outbound_urls.len(),
            "assembled item"
        );

        Ok(NormalizedItem {
            item_id: Uuid::new_v4().to_string(),
            source_id,
            content_hash,
            source_type: self.opts.source_type,
            source_name: self.opts.source_name.clone(),
            source_url: source_url.to_string(),
            canonical_url,
            fetched_at: Utc::now(),
            title,
            body,
            summary_hint,
            language,
            author,
            published_at,
            image_urls,
            image_positions,
            outbound_urls,
            content_type,
            category_hints,
            tags: self.opts.tags.clone(),
            status: PipelineStatus::Pending,
            metadata: serde_json::Map::new(),
            raw_payload: article.cloned(),
        })
    }
}

/// Title fallback chain: JSON-LD headline, og:title meta, first h1.
fn extract_title(doc: &Html, article: Option<&Value>) -> Option<String> {
    if let Some(headline) = article
        .and_then(|a| a.get("headline"))
        .and_then(|h| h.as_str())
    {
        let normalized = crate::dom::normalize_ws(headline);
        if !normalized.is_empty() {
            return Some(normalized);
        }
    }

    if let Some(meta_title) = meta_content(doc, "og:title") {
        let normalized = crate::dom::normalize_ws(&meta_title);
        if !normalized.is_empty() {
            return Some(normalized);
        }
    }

    doc.select(&H1_SELECTOR)
        .map(visible_text)
        .find(|t| !t.is_empty())
}

/// Canonical fallback chain: JSON-LD mainEntityOfPage (string or `@id`
/// object), the canonical link element, then the fetched URL itself.
fn extract_canonical(doc: &Html, article: Option<&Value>, fetched_url: &str) -> String {
    let from_json_ld = article
        .and_then(|a| a.get("mainEntityOfPage"))
        .and_then(|entity| match entity {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => map
                .get("@id")
                .and_then(|id| id.as_str())
                .map(str::to_string),
            _ => None,
        })
        .filter(|s| Url::parse(s).is_ok());

    from_json_ld
        .or_else(|| {
            doc.select(&CANONICAL_LINK_SELECTOR)
                .next()
                .and_then(|link| link.value().attr("href"))
                .map(str::to_string)
                .filter(|s| Url::parse(s).is_ok())
        })
        .unwrap_or_else(|| fetched_url.to_string())
}

/// Primary language tag from `<html lang>`, lowercased ("en-US" -> "en").
fn extract_language(doc: &Html) -> Option<String> {
    let lang = doc
        .select(&HTML_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("lang"))?;
    let primary = lang
        .trim()
        .to_lowercase()
        .split(['-', '_'])
        .next()
        .unwrap_or("")
        .to_string();
    if primary.is_empty() {
        None
    } else {
        Some(primary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ContentType, SourceType};
    use pretty_assertions::assert_eq;

    fn client() -> Client {
        Client::builder()
            .source_name("Example Blog")
            .source_type(SourceType::RenderedHtml)
            .tags(vec!["ai".into()])
            .build()
    }

    const ARTICLE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en-US">
<head>
    <link rel="canonical" href="https://example.com/posts/one">
    <meta property="og:description" content="A short description.">
    <script type="application/ld+json">
    {"@type": "BlogPosting", "headline": "Structured Title",
     "datePublished": "2026-02-21T10:00:00Z",
     "author": {"name": "The Research Team"}}
    </script>
</head>
<body>
<article>
    <h1>Visible Title</h1>
    <p>Announcing a new release for everyone.</p>
    <img src="/a.png" alt="diagram">
    <p>More details follow here.</p>
    <a href="https://other.example/x">reference</a>
    <a href="https://example.com/internal">internal</a>
</article>
</body>
</html>"#;

    #[test]
    fn assembles_the_canonical_record() {
        let item = client()
            .normalize_html(ARTICLE_PAGE, "https://example.com/posts/one?ref=feed")
            .expect("normalize_html should succeed");

        assert_eq!(item.title, "Structured Title");
        assert_eq!(item.canonical_url, "https://example.com/posts/one");
        assert_eq!(item.source_url, "https://example.com/posts/one?ref=feed");
        assert_eq!(item.language, Some("en".to_string()));
        assert_eq!(item.summary_hint, Some("A short description.".to_string()));
        assert_eq!(item.author, Some("The Research Team".to_string()));
        assert!(item.body.contains("Announcing a new release"));
        assert_eq!(item.image_urls, vec!["https://example.com/a.png".to_string()]);
        assert_eq!(item.outbound_urls, vec!["https://other.example/x".to_string()]);
        assert_eq!(item.content_type, ContentType::ModelRelease);
        assert_eq!(item.status, PipelineStatus::Pending);
        assert_eq!(item.source_name, "Example Blog");
        assert_eq!(item.tags, vec!["ai".to_string()]);
        assert!(item.raw_payload.is_some());
        assert_eq!(
            item.published_at.map(|dt| dt.to_rfc3339()),
            Some("2026-02-21T10:00:00+00:00".to_string())
        );
    }

    #[test]
    fn source_id_and_content_hash_are_reproducible() {
        let c = client();
        let a = c
            .normalize_html(ARTICLE_PAGE, "https://example.com/posts/one")
            .unwrap();
        let b = c
            .normalize_html(ARTICLE_PAGE, "https://example.com/posts/one")
            .unwrap();
        assert_eq!(a.source_id, b.source_id);
        assert_eq!(a.content_hash, b.content_hash);
        assert_ne!(a.item_id, b.item_id);

        let changed = ARTICLE_PAGE.replace("Structured Title", "Another Title");
        let c2 = c
            .normalize_html(&changed, "https://example.com/posts/one")
            .unwrap();
        assert_ne!(a.content_hash, c2.content_hash);
        assert_eq!(a.source_id, c2.source_id);
    }

    #[test]
    fn title_falls_back_to_og_then_h1() {
        let c = client();

        let og_only = r#"<html><head><meta property="og:title" content="OG Title"></head>
            <body><p>text</p></body></html>"#;
        let item = c.normalize_html(og_only, "https://example.com/a").unwrap();
        assert_eq!(item.title, "OG Title");

        let h1_only = "<html><body><h1>Heading Title</h1><p>text</p></body></html>";
        let item = c.normalize_html(h1_only, "https://example.com/a").unwrap();
        assert_eq!(item.title, "Heading Title");
    }

    #[test]
    fn missing_title_everywhere_fails_the_run() {
        let err = client()
            .normalize_html("<html><body><p>only text</p></body></html>", "https://example.com/a")
            .expect_err("should fail without a title");
        match err {
            NormalizeError::Extraction(ExtractionError::MissingRequiredField(field)) => {
                assert_eq!(field, "title")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_body_fails_the_run() {
        let err = client()
            .normalize_html(
                "<html><body><h1></h1><meta property=\"og:title\" content=\"T\"></body></html>",
                "https://example.com/a",
            )
            .expect_err("should fail without body text");
        match err {
            NormalizeError::Extraction(ExtractionError::MissingRequiredField(field)) => {
                assert_eq!(field, "body")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_url_is_rejected_before_fetch() {
        let err = client()
            .normalize_html("<html></html>", "not a url")
            .expect_err("invalid URL");
        assert!(matches!(err, NormalizeError::InvalidUrl(_)));
    }

    #[test]
    fn canonical_from_json_ld_id_object() {
        let page = r#"<html><head>
            <script type="application/ld+json">
            {"@type": "Article", "headline": "T",
             "mainEntityOfPage": {"@id": "https://example.com/canonical-id"}}
            </script>
            </head><body><p>body text</p></body></html>"#;
        let item = client()
            .normalize_html(page, "https://example.com/fetched")
            .unwrap();
        assert_eq!(item.canonical_url, "https://example.com/canonical-id");
    }

    #[test]
    fn canonical_defaults_to_fetched_url() {
        let page = "<html><body><h1>T</h1><p>body</p></body></html>";
        let item = client()
            .normalize_html(page, "https://example.com/fetched")
            .unwrap();
        assert_eq!(item.canonical_url, "https://example.com/fetched");
    }
}
