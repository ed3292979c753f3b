// ABOUTME: The NormalizedItem output contract plus its provenance, classification, and status enums.
// ABOUTME: Field set mirrors the canonical ingestion record consumed by persistence, analysis, and publishing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Where an item was ingested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Feed,
    RenderedHtml,
    Api,
    AcademicRepository,
    Social,
}

impl Default for SourceType {
    fn default() -> Self {
        SourceType::RenderedHtml
    }
}

/// Primary content category assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    ModelRelease,
    ProductUpdate,
    Tooling,
    ResearchPaper,
    Benchmark,
    Opinion,
    Funding,
    Security,
    Other,
}

impl Default for ContentType {
    fn default() -> Self {
        ContentType::Other
    }
}

/// Downstream lifecycle state. The pipeline always emits `Pending`;
/// transitions belong to the persistence/analysis collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    Pending,
    Analyzing,
    Ready,
    Published,
    Failed,
}

impl Default for PipelineStatus {
    fn default() -> Self {
        PipelineStatus::Pending
    }
}

/// One image occurrence inside the content region, with its document-order
/// index and the nearest surrounding text blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePosition {
    pub url: String,
    pub dom_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preceding_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub following_text: Option<String>,
}

/// The pipeline's sole output: one canonical, immutable record per
/// successfully normalized URL.
///
/// Invariants:
/// - `source_id` is a pure function of `canonical_url`.
/// - `content_hash` is a pure function of canonical URL, title, published
///   timestamp, and a fixed-length body prefix.
/// - `image_urls` is the de-duplicated URL projection of `image_positions`
///   in first-seen order.
/// - `outbound_urls` never contains the canonical host or a share link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedItem {
    // identity / dedup
    pub item_id: String,
    pub source_id: String,
    pub content_hash: String,

    // provenance
    pub source_type: SourceType,
    pub source_name: String,
    pub source_url: String,
    pub canonical_url: String,
    pub fetched_at: DateTime<Utc>,

    // content
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,

    // media / links
    pub image_urls: Vec<String>,
    pub image_positions: Vec<ImagePosition>,
    pub outbound_urls: Vec<String>,

    // classification
    pub content_type: ContentType,
    pub category_hints: Vec<String>,
    pub tags: Vec<String>,

    // pipeline
    pub status: PipelineStatus,

    // source-specific extras and the original structured-data block,
    // retained for audit/debug
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_payload: Option<Value>,
}
