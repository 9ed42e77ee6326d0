//! Strategy cascade that turns a raw message into plain text

use crate::decode::{decode_base64, decode_body, text_from_bytes};
use crate::error::{ParseError, Result};
use crate::html::html_to_text;
use crate::mime::{
    content_type, declares_base64, declares_html, declares_multipart, declares_plain_text,
    find_all_boundaries, find_boundary, has_attachment_marker, has_content_type_marker,
    is_attachment_part, split_headers_and_body, split_on_boundary, transfer_encoding,
};
use crate::normalize::{is_empty_or_cid_only, is_valid_text, normalize_text};
use crate::types::{Extraction, Strategy};
use regex::Regex;
use std::any::Any;
use std::panic;
use std::sync::LazyLock;
use tracing::{debug, error, trace, warn};

/// Deepest multipart nesting level that is still inspected
pub const MAX_DEPTH: usize = 8;

/// Decoded base64 bodies shorter than this are not worth keeping
const MIN_BASE64_BYTES: usize = 20;

// Base64 never contains `--`, so the first run marks a trailing boundary.
static TRAILING_BOUNDARY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)--[a-zA-Z0-9_\-]+.*").expect("trailing boundary regex"));

static HTML_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<html|<body|<div").expect("html marker regex"));

/// Extract the most useful plain text from a raw email.
///
/// Never fails and never returns an empty string: when no strategy yields
/// valid text the result is [`crate::ATTACHMENTS_ONLY_TEXT`] or
/// [`crate::UNPARSEABLE_TEXT`].
#[must_use]
pub fn parse_email_to_plain_text(raw: &str) -> String {
    extract(raw).into_text()
}

/// Same as [`parse_email_to_plain_text`] for undecoded bytes (UTF-8, else Latin-1)
#[must_use]
pub fn parse_email_bytes(raw: &[u8]) -> String {
    parse_email_to_plain_text(&text_from_bytes(raw.to_vec()))
}

/// Run the strategy cascade and report which outcome produced the text
#[must_use]
pub fn extract(raw: &str) -> Extraction {
    match panic::catch_unwind(|| select(raw)) {
        Ok(extraction) => extraction,
        Err(payload) => {
            let err = ParseError::Unexpected(panic_message(payload.as_ref()));
            error!(error = %err, "email parsing failed");
            Extraction::unparseable()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn select(raw: &str) -> Extraction {
    let extracted = Strategy::ORDER.into_iter().find_map(|strategy| {
        run_strategy(strategy, raw)
            .map(|text| normalize_text(&text))
            .filter(|text| is_valid_text(text))
            .map(|text| Extraction::extracted(text, strategy))
    });

    if let Some(extraction) = extracted {
        debug!(
            strategy = ?extraction.strategy(),
            length = extraction.text.len(),
            "Extracted plain text"
        );
        return extraction;
    }

    if has_attachment_marker(raw) {
        debug!("No text found, message flags attachments");
        Extraction::attachments_only()
    } else {
        debug!("No strategy produced valid text");
        Extraction::unparseable()
    }
}

fn run_strategy(strategy: Strategy, raw: &str) -> Option<String> {
    match strategy {
        Strategy::SimpleBase64 => extract_simple_base64(raw),
        Strategy::Multipart => extract_multipart(raw),
        Strategy::SimpleBody => extract_simple_body(raw),
        Strategy::AllBoundaries => extract_all_boundaries(raw),
    }
}

/// Non-multipart message whose body is base64
fn extract_simple_base64(raw: &str) -> Option<String> {
    let (headers, body) = split_headers_and_body(raw);
    if !declares_base64(headers) || declares_multipart(headers) {
        return None;
    }

    let body = TRAILING_BOUNDARY_REGEX
        .find(body)
        .map_or(body, |m| &body[..m.start()]);

    let decoded = match decode_base64(body) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!(error = %e, "Declared base64 body did not decode");
            return None;
        }
    };
    if decoded.len() < MIN_BASE64_BYTES {
        return None;
    }

    let text = text_from_bytes(decoded);
    if text.to_ascii_lowercase().contains("<html") {
        Some(html_to_text(&text))
    } else {
        Some(text)
    }
}

/// Non-multipart message with any transfer encoding
fn extract_simple_body(raw: &str) -> Option<String> {
    let (headers, body) = split_headers_and_body(raw);
    if declares_multipart(headers) {
        return None;
    }

    let encoding = transfer_encoding(headers);
    let ctype = content_type(headers).unwrap_or_default().to_ascii_lowercase();
    let decoded = decode_body(body, encoding.as_deref());

    if ctype.contains("text/html") {
        return Some(html_to_text(&decoded));
    }
    if ctype.contains("text/plain") {
        return Some(decoded);
    }
    if HTML_MARKER_REGEX.is_match(&decoded) {
        return Some(html_to_text(&decoded));
    }
    Some(decoded)
}

fn extract_multipart(raw: &str) -> Option<String> {
    walk_multipart(raw, 0).unwrap_or_else(|e| {
        debug!(error = %e, "Multipart walk abandoned");
        None
    })
}

/// Split `content` on its first boundary and look for text, preferring
/// `text/plain` (recursing into nested multiparts) over `text/html`.
fn walk_multipart(content: &str, depth: usize) -> Result<Option<String>> {
    if depth > MAX_DEPTH {
        return Err(ParseError::DepthExceeded(MAX_DEPTH));
    }
    let Some(boundary) = find_boundary(content) else {
        return Ok(None);
    };

    let fragments: Vec<&str> = split_on_boundary(content, boundary)
        .into_iter()
        .filter(|fragment| has_content_type_marker(fragment))
        .collect();
    trace!(boundary, depth, fragments = fragments.len(), "Split multipart");

    for fragment in &fragments {
        let (headers, body) = split_headers_and_body(fragment);
        if is_attachment_part(headers) {
            trace!(depth, "Skipping attachment part");
            continue;
        }

        if let Some(text) = plain_text_part(headers, body) {
            return Ok(Some(text));
        }

        // A fragment declaring the boundary being split is the enclosing
        // header block; splitting it again yields nothing new.
        let nested = headers.to_ascii_lowercase().contains("multipart/")
            && find_boundary(fragment) != Some(boundary);
        if nested {
            match walk_multipart(fragment, depth + 1) {
                Ok(Some(text)) => return Ok(Some(text)),
                Ok(None) => {}
                Err(e) => debug!(error = %e, depth, "Nested multipart skipped"),
            }
        }
    }

    Ok(first_html_text(&fragments))
}

/// Split the whole message on every boundary it mentions and scan the
/// pooled fragments. Looser than [`walk_multipart`]: a fragment may be
/// attributed to the wrong parent when boundaries are inconsistent.
fn extract_all_boundaries(raw: &str) -> Option<String> {
    let fragments: Vec<&str> = find_all_boundaries(raw)
        .into_iter()
        .flat_map(|boundary| split_on_boundary(raw, boundary))
        .filter(|fragment| has_content_type_marker(fragment))
        .collect();
    if fragments.is_empty() {
        return None;
    }
    debug!(fragments = fragments.len(), "Scanning pooled fragments");

    first_plain_text(&fragments).or_else(|| first_html_text(&fragments))
}

fn first_plain_text(fragments: &[&str]) -> Option<String> {
    fragments.iter().find_map(|fragment| {
        let (headers, body) = split_headers_and_body(fragment);
        if is_attachment_part(headers) {
            return None;
        }
        plain_text_part(headers, body)
    })
}

fn first_html_text(fragments: &[&str]) -> Option<String> {
    fragments.iter().find_map(|fragment| {
        let (headers, body) = split_headers_and_body(fragment);
        if is_attachment_part(headers) || !declares_html(headers) {
            return None;
        }
        let decoded = decode_body(body, transfer_encoding(headers).as_deref());
        let cleaned = normalize_text(&html_to_text(&decoded));
        is_valid_text(&cleaned).then_some(cleaned)
    })
}

/// Decoded and normalized `text/plain` part, unless it is empty, only a
/// CID placeholder, or otherwise not valid text
fn plain_text_part(headers: &str, body: &str) -> Option<String> {
    if !declares_plain_text(headers) {
        return None;
    }
    let decoded = decode_body(body, transfer_encoding(headers).as_deref());
    let cleaned = normalize_text(&decoded);
    if is_empty_or_cid_only(&cleaned) || !is_valid_text(&cleaned) {
        return None;
    }
    Some(cleaned)
}
