//! Pattern-based MIME header inspection
//!
//! Headers are never parsed into a map. Every question asked of a header
//! block is a targeted, case-insensitive search over its raw text, so
//! duplicated, folded or otherwise malformed headers cannot derail
//! extraction.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static TRANSFER_ENCODING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Content-Transfer-Encoding:\s*(\S+)").expect("transfer encoding regex")
});

static BASE64_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Content-Transfer-Encoding:\s*base64").expect("base64 header regex")
});

static CONTENT_TYPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Content-Type:\s*([^;\r\n]+)").expect("content type regex")
});

// `.` stops at a newline, so the multipart token must sit on the header line.
static MULTIPART_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Content-Type:.*multipart").expect("multipart regex"));

static IMAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Content-Type:\s*image/").expect("image regex"));

static PLAIN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Content-Type:\s*text/plain").expect("text/plain regex"));

static HTML_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Content-Type:\s*text/html").expect("text/html regex"));

static NAMED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)name=").expect("name parameter regex"));

static BOUNDARY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)boundary=["']?([^"';\s]+)"#).expect("boundary regex")
});

static ATTACHMENT_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)X-MS-Has-Attach:\s*yes").expect("attachment marker regex")
});

/// Split a message or part at the first blank line.
///
/// `\r\n\r\n` wins over `\n\n`. Without any separator the whole input is
/// the header block and the body is empty.
#[must_use]
pub fn split_headers_and_body(text: &str) -> (&str, &str) {
    if let Some(pos) = text.find("\r\n\r\n") {
        return (&text[..pos], &text[pos + 4..]);
    }
    if let Some(pos) = text.find("\n\n") {
        return (&text[..pos], &text[pos + 2..]);
    }
    (text, "")
}

/// First `Content-Transfer-Encoding` value, lowercased
#[must_use]
pub fn transfer_encoding(headers: &str) -> Option<String> {
    TRANSFER_ENCODING_REGEX
        .captures(headers)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_lowercase())
}

/// First `Content-Type` value without parameters
#[must_use]
pub fn content_type(headers: &str) -> Option<String> {
    CONTENT_TYPE_REGEX
        .captures(headers)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
}

#[must_use]
pub fn declares_base64(headers: &str) -> bool {
    BASE64_REGEX.is_match(headers)
}

#[must_use]
pub fn declares_multipart(headers: &str) -> bool {
    MULTIPART_REGEX.is_match(headers)
}

#[must_use]
pub fn declares_plain_text(headers: &str) -> bool {
    PLAIN_REGEX.is_match(headers)
}

#[must_use]
pub fn declares_html(headers: &str) -> bool {
    HTML_REGEX.is_match(headers)
}

/// A part is treated as an attachment when it names a file or is an image.
#[must_use]
pub fn is_attachment_part(headers: &str) -> bool {
    NAMED_REGEX.is_match(headers) || IMAGE_REGEX.is_match(headers)
}

/// Whether a fragment mentions `Content-Type:` anywhere
#[must_use]
pub fn has_content_type_marker(fragment: &str) -> bool {
    fragment.to_ascii_lowercase().contains("content-type:")
}

/// First `boundary=` token in `content`, quoted or bare
#[must_use]
pub fn find_boundary(content: &str) -> Option<&str> {
    BOUNDARY_REGEX
        .captures(content)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

/// Every distinct `boundary=` token in `content`, in order of first appearance
#[must_use]
pub fn find_all_boundaries(content: &str) -> Vec<&str> {
    let mut seen = HashSet::new();
    BOUNDARY_REGEX
        .captures_iter(content)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str())
        .filter(|boundary| seen.insert(*boundary))
        .collect()
}

/// Split `content` on `--boundary` delimiters, closing `--` included.
///
/// Fragments are trimmed; empty ones are dropped.
#[must_use]
pub fn split_on_boundary<'a>(content: &'a str, boundary: &str) -> Vec<&'a str> {
    let delimiter = format!("--{boundary}");
    let mut pieces = content.split(delimiter.as_str());
    let preamble = pieces.next();

    preamble
        .into_iter()
        .chain(pieces.map(|piece| piece.strip_prefix("--").unwrap_or(piece)))
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

/// Whether the raw message flags attachments (`X-MS-Has-Attach: yes`)
#[must_use]
pub fn has_attachment_marker(raw: &str) -> bool {
    ATTACHMENT_MARKER_REGEX.is_match(raw)
}
