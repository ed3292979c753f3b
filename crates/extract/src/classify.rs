// ABOUTME: Keyword-rule classification over URL, title, and a bounded body-text prefix.
// ABOUTME: Table-driven so per-source vocabulary can grow without touching extraction logic.

use crate::item::ContentType;

/// How much body text participates in classification.
const TEXT_PREFIX_CHARS: usize = 500;

/// Launch/release vocabulary that marks an item as a model or product release.
const RELEASE_VOCAB: &[&str] = &["announcing", "released", "launch", "rolling out", "preview"];

/// One category-hint rule: if any keyword matches, the hint is appended.
struct HintRule {
    keywords: &'static [&'static str],
    hint: &'static str,
    /// Brand rules also match the URL; topical rules match text only.
    match_url: bool,
}

const HINT_RULES: &[HintRule] = &[
    HintRule {
        keywords: &["gemini"],
        hint: "Gemini",
        match_url: true,
    },
    HintRule {
        keywords: &["google"],
        hint: "Google",
        match_url: true,
    },
    HintRule {
        keywords: &["benchmark", "arc-agi", "score", "eval"],
        hint: "Benchmark",
        match_url: false,
    },
    HintRule {
        keywords: &["multimodal", "vision", "image", "video"],
        hint: "Multimodal",
        match_url: false,
    },
];

/// Assign a content type and ordered, de-duplicated category hints.
pub fn classify(url: &str, title: &str, body: &str) -> (ContentType, Vec<String>) {
    let url = url.to_lowercase();
    let prefix: String = body.chars().take(TEXT_PREFIX_CHARS).collect();
    let text = format!("{} {}", title, prefix).to_lowercase();

    let content_type = if RELEASE_VOCAB.iter().any(|kw| text.contains(kw)) {
        ContentType::ModelRelease
    } else {
        ContentType::ProductUpdate
    };

    let mut hints: Vec<String> = Vec::new();
    for rule in HINT_RULES {
        let matched = rule.keywords.iter().any(|kw| {
            text.contains(kw) || (rule.match_url && url.contains(kw))
        });
        if matched && !hints.iter().any(|h| h == rule.hint) {
            hints.push(rule.hint.to_string());
        }
    }

    (content_type, hints)
}
