// ABOUTME: HTML utilities for feed-supplied markup fragments.
// ABOUTME: Tag stripping and entity decoding for turning entry HTML into plain text.

/// Strips tags from an HTML fragment and returns collapsed plain text.
///
/// Feed summaries and content bodies arrive as small markup fragments; a
/// character scan is enough here, the structural parser handles full pages.
pub fn strip_html(s: &str) -> String {
    let mut text = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    collapse_whitespace(&decode_entities(&text))
}

const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&#39;", "'"),
    ("&nbsp;", " "),
    ("&ndash;", "\u{2013}"),
    ("&mdash;", "\u{2014}"),
    ("&lsquo;", "\u{2018}"),
    ("&rsquo;", "\u{2019}"),
    ("&ldquo;", "\u{201C}"),
    ("&rdquo;", "\u{201D}"),
    ("&hellip;", "\u{2026}"),
    ("&copy;", "\u{A9}"),
    ("&reg;", "\u{AE}"),
    ("&trade;", "\u{2122}"),
];

/// Decodes the named entities that commonly appear in feed text, plus
/// decimal and hex numeric references.
pub fn decode_entities(s: &str) -> String {
    let mut result = s.to_string();
    for (entity, replacement) in NAMED_ENTITIES {
        result = result.replace(entity, replacement);
    }
    decode_numeric_entities(&result)
}

fn decode_numeric_entities(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '&' || chars.peek() != Some(&'#') {
            result.push(c);
            continue;
        }
        chars.next();
        let is_hex = matches!(chars.peek(), Some('x') | Some('X'));
        if is_hex {
            chars.next();
        }

        let mut digits = String::new();
        let mut terminated = false;
        while let Some(&nc) = chars.peek() {
            if nc == ';' {
                chars.next();
                terminated = true;
                break;
            }
            let valid = if is_hex {
                nc.is_ascii_hexdigit()
            } else {
                nc.is_ascii_digit()
            };
            if !valid {
                break;
            }
            digits.push(nc);
            chars.next();
        }

        let decoded = if digits.is_empty() {
            None
        } else {
            let code = if is_hex {
                u32::from_str_radix(&digits, 16).ok()
            } else {
                digits.parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                result.push_str("&#");
                if is_hex {
                    result.push('x');
                }
                result.push_str(&digits);
                if terminated {
                    result.push(';');
                }
            }
        }
    }

    result
}

fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut last_was_space = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                result.push(' ');
                last_was_space = true;
            }
        } else {
            result.push(c);
            last_was_space = false;
        }
    }
    result.trim().to_string()
}
