// ABOUTME: Builds a NormalizedItem directly from parsed feed fields, without re-fetching the entry page.
// ABOUTME: Images and outbound links are recovered from the entry's HTML fragment through the extract walkers.

use chrono::Utc;
use scraper::Html;
use url::Url;
use uuid::Uuid;

use tidings_extract::classify::classify;
use tidings_extract::error::{ExtractionError, NormalizeError};
use tidings_extract::extractors::links::extract_outbound_links;
use tidings_extract::extractors::media::extract_images;
use tidings_extract::identity::{content_hash, source_id};
use tidings_extract::{NormalizedItem, PipelineStatus};

use crate::models::{Feed, FeedItem};
use crate::source::SourceConfig;

/// Normalizes one feed entry into the canonical item shape.
///
/// The entry link is the canonical URL; the stripped content (or summary)
/// is the body. Classification and identity hashing are shared with the
/// full-page pipeline, so an entry seen via its feed and the same page
/// seen via a direct crawl agree on `source_id`.
pub fn normalize_entry(
    feed: &Feed,
    item: &FeedItem,
    config: &SourceConfig,
) -> Result<NormalizedItem, NormalizeError> {
    if item.title.trim().is_empty() {
        return Err(ExtractionError::MissingRequiredField("title").into());
    }
    let title = item.title.trim().to_string();

    let canonical_url = item.url.clone();
    let base = Url::parse(&canonical_url)
        .map_err(|_| NormalizeError::InvalidUrl(canonical_url.clone()))?;
    let canonical_host = base.host_str().unwrap_or("").to_string();

    let body = if item.content.is_empty() {
        item.summary.clone()
    } else {
        item.content.clone()
    };
    if body.is_empty() {
        return Err(ExtractionError::MissingRequiredField("body").into());
    }

    let fragment = Html::parse_fragment(&item.content_html);
    let (image_urls, image_positions) = extract_images(&fragment, &base);
    let outbound_urls = extract_outbound_links(&fragment, &base, &canonical_host);

    let (content_type, category_hints) = classify(&canonical_url, &title, &body);

    let published_at = item.published;
    let summary_hint = if item.summary.is_empty() {
        None
    } else {
        Some(item.summary.clone())
    };

    let mut metadata = serde_json::Map::new();
    if !item.guid.is_empty() {
        metadata.insert("guid".into(), item.guid.clone().into());
    }
    if !item.categories.is_empty() {
        metadata.insert(
            "feed_categories".into(),
            serde_json::Value::from(item.categories.clone()),
        );
    }

    Ok(NormalizedItem {
        item_id: Uuid::new_v4().to_string(),
        source_id: source_id(&canonical_url),
        content_hash: content_hash(&canonical_url, &title, published_at, &body),
        source_type: config.kind,
        source_name: config.name.clone(),
        source_url: feed.feed_url.clone(),
        canonical_url,
        fetched_at: Utc::now(),
        title,
        body,
        summary_hint,
        language: item
            .language
            .as_deref()
            .or(feed.language.as_deref())
            .and_then(primary_language_tag),
        author: item
            .author
            .as_ref()
            .or(feed.author.as_ref())
            .and_then(|a| a.name.clone()),
        published_at,
        image_urls,
        image_positions,
        outbound_urls,
        content_type,
        category_hints,
        tags: config.tags.clone(),
        status: PipelineStatus::Pending,
        metadata,
        raw_payload: serde_json::to_value(item).ok(),
    })
}

fn primary_language_tag(lang: &str) -> Option<String> {
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
