//! HTML to plain text reduction
//!
//! A fixed sequence of regex rewrites over possibly broken markup. Each step
//! works on the output of the previous one, so the order below matters.

use crate::decode::{decode_quoted_printable, text_from_bytes};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static QP_ESCAPE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=(?:[0-9A-F]{2}|\r?\n)").expect("qp escape regex"));

static SCRIPT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script(?:\s[^>]*)?>.*?</script\s*>").expect("script regex")
});

static STYLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style(?:\s[^>]*)?>.*?</style\s*>").expect("style regex")
});

static HEAD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<head(?:\s[^>]*)?>.*?</head\s*>").expect("head regex")
});

static COMMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment regex"));

static VOID_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(?:meta|link|base|noscript|img)\b[^>]*>").expect("void tag regex")
});

static BR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("br regex"));

static BLOCK_CLOSE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(?:p|div|tr|h[1-6]|li|td|th)\s*>").expect("block close regex")
});

static BLOCK_OPEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(?:p|div|tr|h[1-6]|li|td|th)\b[^>]*>").expect("block open regex")
});

static TABS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\t+").expect("tab regex"));

static ANCHOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a\s+[^>]*href=["']([^"']+)["'][^>]*>(.*?)</a>"#).expect("anchor regex")
});

// `<` followed by whitespace or a digit is text, not a tag.
static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[a-zA-Z/!?][^>]*>").expect("tag regex"));

static ENTITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z][a-zA-Z0-9]{1,31});")
        .expect("entity regex")
});

/// Zero-width and other invisible characters mail clients sprinkle into text:
/// ZWSP, ZWNJ, ZWJ, BOM, soft hyphen, Mongolian vowel separator, Arabic
/// letter mark.
pub const INVISIBLE_CHARS: [char; 7] = [
    '\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}', '\u{00AD}', '\u{180E}', '\u{061C}',
];

/// Reduce HTML markup to readable plain text
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let html = decode_embedded_quoted_printable(html);

    let html = SCRIPT_REGEX.replace_all(&html, "");
    let html = STYLE_REGEX.replace_all(&html, "");
    let html = HEAD_REGEX.replace_all(&html, "");
    let html = COMMENT_REGEX.replace_all(&html, "");
    let html = VOID_TAG_REGEX.replace_all(&html, "");

    let html = BR_REGEX.replace_all(&html, "\n");
    let html = BLOCK_CLOSE_REGEX.replace_all(&html, "\n");
    let html = BLOCK_OPEN_REGEX.replace_all(&html, "\n");
    let html = TABS_REGEX.replace_all(&html, " ");

    let html = ANCHOR_REGEX.replace_all(&html, "${2}");
    let text = TAG_REGEX.replace_all(&html, "");

    let text = decode_entities(&text);
    let text: String = text
        .chars()
        .filter(|c| !INVISIBLE_CHARS.contains(c))
        .map(|c| if c == '\u{00A0}' { ' ' } else { c })
        .collect();

    text.trim().to_string()
}

/// Undo quoted-printable left inside markup that carries its escapes
fn decode_embedded_quoted_printable(html: &str) -> String {
    if !QP_ESCAPE_REGEX.is_match(html) {
        return html.to_string();
    }
    decode_quoted_printable(html).map_or_else(|_| html.to_string(), text_from_bytes)
}

/// Decode numeric and named entities one at a time; unknown ones stay as written.
fn decode_entities(text: &str) -> String {
    ENTITY_REGEX
        .replace_all(text, |cap: &Captures<'_>| {
            let entity = &cap[0];
            htmlescape::decode_html(entity).unwrap_or_else(|_| entity.to_string())
        })
        .into_owned()
}
