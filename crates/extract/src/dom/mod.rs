// ABOUTME: Structural parsing: document tree construction, JSON-LD side index, and meta-tag lookup.
// ABOUTME: Parsing is best-effort; malformed markup degrades, malformed JSON-LD blocks are skipped.

use ego_tree::NodeRef;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use serde_json::Value;

static JSON_LD_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());

/// Parse raw markup into a traversable tree. Never fails; broken markup
/// yields a best-effort tree.
pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

/// Collapse runs of whitespace to single spaces and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collect the visible text of an element, skipping script/style/noscript/
/// template subtrees, whitespace-normalized.
pub fn visible_text(el: ElementRef) -> String {
    let mut out = String::new();
    collect_visible(*el, &mut out);
    normalize_ws(&out)
}

fn collect_visible(node: NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(t) => {
                out.push(' ');
                out.push_str(t);
            }
            Node::Element(e) => {
                if !matches!(e.name(), "script" | "style" | "noscript" | "template") {
                    collect_visible(child, out);
                }
            }
            _ => {}
        }
    }
}

/// Decode every embedded JSON-LD block into generic objects.
///
/// Blocks that hold a top-level array are flattened to their object
/// elements. Malformed blocks are skipped, not fatal.
pub fn extract_json_ld(doc: &Html) -> Vec<Value> {
    let mut out = Vec::new();
    for script in doc.select(&JSON_LD_SELECTOR) {
        let text: String = script.text().collect();
        let parsed: Value = match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(err) => {
                tracing::debug!("skipping malformed JSON-LD block: {}", err);
                continue;
            }
        };
        match parsed {
            Value::Object(_) => out.push(parsed),
            Value::Array(items) => out.extend(items.into_iter().filter(|v| v.is_object())),
            _ => {}
        }
    }
    out
}

const ARTICLE_TYPES: &[&str] = &["NewsArticle", "BlogPosting", "Article"];

/// Find the first JSON-LD block describing an article.
///
/// `@type` may be a single string or a list of strings.
pub fn find_article_object(blocks: &[Value]) -> Option<&Value> {
    blocks.iter().find(|obj| {
        match obj.get("@type") {
            Some(Value::String(t)) => ARTICLE_TYPES.contains(&t.as_str()),
            Some(Value::Array(types)) => types
                .iter()
                .filter_map(|t| t.as_str())
                .any(|t| ARTICLE_TYPES.contains(&t)),
            _ => false,
        }
    })
}

/// Look up a meta tag by key: `property` attribute first, then `name`,
/// first non-empty `content` wins.
pub fn meta_content(doc: &Html, key: &str) -> Option<String> {
    for attr in ["property", "name"] {
        let sel = match Selector::parse(&format!(r#"meta[{}="{}"]"#, attr, key)) {
            Ok(s) => s,
            Err(_) => continue,
        };
        for el in doc.select(&sel) {
            if let Some(content) = el.value().attr("content") {
                let trimmed = content.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }
    None
}
