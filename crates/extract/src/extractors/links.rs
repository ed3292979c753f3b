// ABOUTME: Outbound link extraction: resolve, filter same-host and share-intent links, canonicalize.
// ABOUTME: Host matching is literal; subdomains of the canonical host count as outbound.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use crate::extractors::content::content_root;
use crate::extractors::media::resolve_http_url;

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Hosts whose links exist only to trigger a social-share action.
const SHARE_HOSTS: &[&str] = &[
    "twitter.com",
    "x.com",
    "facebook.com",
    "www.facebook.com",
    "linkedin.com",
    "www.linkedin.com",
];

/// Path fragments marking share-intent URLs on any host.
const SHARE_INTENT_PATHS: &[&str] = &["/intent/tweet", "/sharer", "/sharearticle"];

/// Returns true for URLs whose sole purpose is a social-share action.
fn is_share_url(url: &Url) -> bool {
    let host = url.host_str().unwrap_or("").to_lowercase();
    if SHARE_HOSTS.contains(&host.as_str()) {
        return true;
    }
    let path = url.path().to_lowercase();
    SHARE_INTENT_PATHS.iter().any(|p| path.contains(p))
}

/// Collect outbound links from the content region.
///
/// Every `a[href]` is resolved against the base URL; links on the canonical
/// host itself are navigation and dropped (exact host comparison only),
/// share links are dropped, fragments are stripped, and the result is
/// de-duplicated preserving first-seen order.
pub fn extract_outbound_links(doc: &Html, base_url: &Url, canonical_host: &str) -> Vec<String> {
    let root = content_root(doc);
    let canonical_host = canonical_host.to_lowercase();

    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();

    for anchor in root.select(&ANCHOR_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(resolved) = resolve_http_url(base_url, href) else {
            continue;
        };
        let Ok(mut url) = Url::parse(&resolved) else {
            continue;
        };

        let host = url.host_str().unwrap_or("").to_lowercase();
        if host == canonical_host {
            continue;
        }
        if is_share_url(&url) {
            continue;
        }

        url.set_fragment(None);
        let normalized = url.to_string();
        if seen.insert(normalized.clone()) {
            out.push(normalized);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;
    use pretty_assertions::assert_eq;

    fn extract(html: &str) -> Vec<String> {
        let doc = parse_document(html);
        let base = Url::parse("https://example.com/post").unwrap();
        extract_outbound_links(&doc, &base, "example.com")
    }

    #[test]
    fn same_host_links_are_navigation() {
        let links = extract(
            r#"<article>
            <a href="/about">About</a>
            <a href="https://example.com/other">Other</a>
            <a href="https://other.example/x">External</a>
            </article>"#,
        );
        assert_eq!(links, vec!["https://other.example/x".to_string()]);
    }

    #[test]
    fn subdomains_are_outbound() {
        // Literal host matching: sub.example.com is not example.com.
        let links = extract(r#"<article><a href="https://sub.example.com/page">Sub</a></article>"#);
        assert_eq!(links, vec!["https://sub.example.com/page".to_string()]);
    }

    #[test]
    fn share_hosts_are_dropped() {
        let links = extract(
            r#"<article>
            <a href="https://twitter.com/some/status">Tweet</a>
            <a href="https://x.com/post">X</a>
            <a href="https://www.facebook.com/page">FB</a>
            <a href="https://www.linkedin.com/in/someone">LI</a>
            <a href="https://kept.example/x">Kept</a>
            </article>"#,
        );
        assert_eq!(links, vec!["https://kept.example/x".to_string()]);
    }

    #[test]
    fn share_intent_paths_are_dropped_on_any_host() {
        let links = extract(
            r#"<article>
            <a href="https://social.example/intent/tweet?url=x">Intent</a>
            <a href="https://social.example/sharer/sharer.php?u=x">Sharer</a>
            <a href="https://social.example/shareArticle?mini=true">ShareArticle</a>
            <a href="https://social.example/article">Article</a>
            </article>"#,
        );
        assert_eq!(links, vec!["https://social.example/article".to_string()]);
    }

    #[test]
    fn fragments_are_stripped_and_deduplicated() {
        let links = extract(
            r#"<article>
            <a href="https://other.example/doc#intro">One</a>
            <a href="https://other.example/doc#details">Two</a>
            </article>"#,
        );
        assert_eq!(links, vec!["https://other.example/doc".to_string()]);
    }

    #[test]
    fn relative_links_resolve_and_query_survives() {
        let links = extract(r#"<article><a href="//cdn.example/x?y=1#frag">CDN</a></article>"#);
        assert_eq!(links, vec!["https://cdn.example/x?y=1".to_string()]);
    }

    #[test]
    fn first_seen_order_is_preserved() {
        let links = extract(
            r#"<article>
            <a href="https://b.example/1">B</a>
            <a href="https://a.example/2">A</a>
            <a href="https://b.example/1">B again</a>
            </article>"#,
        );
        assert_eq!(
            links,
            vec![
                "https://b.example/1".to_string(),
                "https://a.example/2".to_string(),
            ]
        );
    }
}
