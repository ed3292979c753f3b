// ABOUTME: Content-addressable identity: stable source_id and re-ingestion dedup content_hash.
// ABOUTME: Both are pure SHA-256 functions over normalized fields, hex-encoded.

use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

/// How many body characters participate in the content hash.
pub const BODY_HASH_PREFIX_CHARS: usize = 800;

fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

/// Stable identifier for a document: pure function of the canonical URL.
pub fn source_id(canonical_url: &str) -> String {
    sha256_hex(canonical_url)
}

/// Re-ingestion dedup key over canonical URL, title, publish timestamp, and
/// a fixed-length body prefix. Changes only when meaningfully new content
/// appears at the same URL.
pub fn content_hash(
    canonical_url: &str,
    title: &str,
    published_at: Option<DateTime<Utc>>,
    body: &str,
) -> String {
    let timestamp = published_at
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default();
    let prefix: String = body.chars().take(BODY_HASH_PREFIX_CHARS).collect();
    let basis = format!("{}\n{}\n{}\n{}", canonical_url, title, timestamp, prefix);
    sha256_hex(&basis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn source_id_is_deterministic() {
        let a = source_id("https://example.com/post");
        let b = source_id("https://example.com/post");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, source_id("https://example.com/other"));
    }

    #[test]
    fn content_hash_is_stable_for_identical_inputs() {
        let ts = Utc.with_ymd_and_hms(2026, 2, 21, 10, 0, 0).single();
        let a = content_hash("https://example.com/p", "Title", ts, "body text");
        let b = content_hash("https://example.com/p", "Title", ts, "body text");
        assert_eq!(a, b);
    }

    #[test]
    fn content_hash_changes_with_title_or_body() {
        let base = content_hash("https://example.com/p", "Title", None, "body");
        assert_ne!(
            base,
            content_hash("https://example.com/p", "New Title", None, "body")
        );
        assert_ne!(
            base,
            content_hash("https://example.com/p", "Title", None, "different body")
        );
    }

    #[test]
    fn missing_date_hashes_as_empty_field() {
        let without = content_hash("https://example.com/p", "T", None, "b");
        let with = content_hash(
            "https://example.com/p",
            "T",
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single(),
            "b",
        );
        assert_ne!(without, with);
    }

    #[test]
    fn only_the_body_prefix_participates() {
        let long_a = format!("{}tail-one", "x".repeat(BODY_HASH_PREFIX_CHARS));
        let long_b = format!("{}tail-two", "x".repeat(BODY_HASH_PREFIX_CHARS));
        assert_eq!(
            content_hash("https://example.com/p", "T", None, &long_a),
            content_hash("https://example.com/p", "T", None, &long_b),
        );
    }
}
