// ABOUTME: Image extraction with DOM positions and surrounding text context.
// ABOUTME: One document-order walk over flow elements pairs each image with its nearest text neighbors.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use crate::dom::visible_text;
use crate::extractors::content::{content_root, is_ui_chrome};
use crate::item::ImagePosition;

static FLOW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3, p, li, img").unwrap());

/// Resolve a possibly-relative URL against a base, accepting only http(s).
pub(crate) fn resolve_http_url(base: &Url, maybe: &str) -> Option<String> {
    let maybe = maybe.trim();
    if maybe.is_empty() {
        return None;
    }
    let full = base.join(maybe).ok()?;
    match full.scheme() {
        "http" | "https" => Some(full.to_string()),
        _ => None,
    }
}

/// Walk the content region once, collecting images (with DOM order and alt
/// text) and text blocks, then attach to each image the nearest preceding
/// and following text block.
///
/// Returns `(image_urls, image_positions)` where `image_urls` is the
/// order-preserving de-duplication of the position URLs.
pub fn extract_images(doc: &Html, base_url: &Url) -> (Vec<String>, Vec<ImagePosition>) {
    let root = content_root(doc);

    let mut text_blocks: Vec<(usize, String)> = Vec::new();
    let mut positions: Vec<ImagePosition> = Vec::new();

    for (idx, el) in root.select(&FLOW_SELECTOR).enumerate() {
        if el.value().name() == "img" {
            // Lazy-loaded images carry the real source in data-src.
            let src = el
                .value()
                .attr("src")
                .or_else(|| el.value().attr("data-src"));
            let Some(url) = src.and_then(|s| resolve_http_url(base_url, s)) else {
                continue;
            };
            let alt = el
                .value()
                .attr("alt")
                .map(crate::dom::normalize_ws)
                .filter(|s| !s.is_empty());
            positions.push(ImagePosition {
                url,
                dom_index: idx,
                alt_text: alt,
                preceding_text: None,
                following_text: None,
            });
            continue;
        }

        let text = visible_text(el);
        if text.is_empty() || is_ui_chrome(&text) {
            continue;
        }
        text_blocks.push((idx, text));
    }

    for image in &mut positions {
        image.preceding_text = text_blocks
            .iter()
            .rev()
            .find(|(idx, _)| *idx < image.dom_index)
            .map(|(_, text)| text.clone());
        image.following_text = text_blocks
            .iter()
            .find(|(idx, _)| *idx > image.dom_index)
            .map(|(_, text)| text.clone());
    }

    let mut seen = std::collections::HashSet::new();
    let image_urls = positions
        .iter()
        .filter(|p| seen.insert(p.url.clone()))
        .map(|p| p.url.clone())
        .collect();

    (image_urls, positions)
}
