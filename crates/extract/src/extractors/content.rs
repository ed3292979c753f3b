// ABOUTME: Main-content extraction: content-root selection, document-order text walk, noise filtering.
// ABOUTME: Emits the normalized plain-text body with adjacent duplicate blocks collapsed.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::dom::visible_text;

static ARTICLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
static MAIN_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("main").unwrap());
static FLOW_TEXT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3, p, li").unwrap());

/// Short strings that are navigation/share chrome, not content.
const UI_CHROME_STOPLIST: &[&str] = &["share", "copy link", "mail"];

/// Returns true for text blocks that are UI chrome rather than content.
pub fn is_ui_chrome(text: &str) -> bool {
    UI_CHROME_STOPLIST.contains(&text.to_lowercase().as_str())
}

/// Select the most specific content container: a dedicated `article`
/// element, then a generic `main`, then the whole document.
pub fn content_root(doc: &Html) -> ElementRef<'_> {
    doc.select(&ARTICLE_SELECTOR)
        .next()
        .or_else(|| doc.select(&MAIN_SELECTOR).next())
        .unwrap_or_else(|| doc.root_element())
}

/// Walk heading/paragraph/list elements of the content region in document
/// order and join the surviving blocks into the plain-text body.
///
/// Per-block: whitespace normalized, empties and UI chrome dropped. A block
/// identical to its immediate predecessor is dropped, which guards against
/// templated repeated captions.
pub fn extract_body_text(doc: &Html) -> String {
    let root = content_root(doc);

    let mut blocks: Vec<String> = Vec::new();
    for el in root.select(&FLOW_TEXT_SELECTOR) {
        let text = visible_text(el);
        if text.is_empty() || is_ui_chrome(&text) {
            continue;
        }
        if blocks.last().map(|prev| prev == &text).unwrap_or(false) {
            continue;
        }
        blocks.push(text);
    }

    blocks.join("\n\n")
}
