//! Final cleanup and validity gate for extracted text

use crate::html::INVISIBLE_CHARS;
use regex::Regex;
use std::sync::LazyLock;

/// Minimum trimmed length, in characters, of acceptable text
const MIN_TEXT_CHARS: usize = 10;

/// Text must keep more than this many characters once whitespace and
/// `-_=.` are removed
const MIN_CONTENT_CHARS: usize = 5;

static CID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[cid:[^\]]+\]").expect("cid regex"));

static CID_ONLY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[cid:[^\]]+\]$").expect("cid-only regex"));

static BOUNDARY_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^--[a-zA-Z0-9_\-]+.*$").expect("boundary line regex"));

static MIME_HEADER_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^Content-[^:\n]+:.*$").expect("mime header line regex"));

static SPACE_RUN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2,}").expect("space run regex"));

static BLANK_RUN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank run regex"));

static REPEATED_PUNCT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\-_=.]{1,3}$").expect("repeated punctuation regex"));

static EQUALS_ONLY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[=\s]*$").expect("equals-only regex"));

static FILLER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\-_=.]+").expect("filler regex"));

const DECORATIVE_CHARS: [char; 8] = ['.', '-', '_', '=', '|', '>', '<', '*'];

/// Clean extracted text into its final form.
///
/// Running this on its own output changes nothing.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    let mut text: String = text
        .chars()
        .filter(|&c| !is_stripped_control(c) && !INVISIBLE_CHARS.contains(&c))
        .collect();
    // Removing one placeholder can join its neighbours into another.
    while CID_REGEX.is_match(&text) {
        text = CID_REGEX.replace_all(&text, "").into_owned();
    }

    let text = text.replace("\r\n", "\n").replace('\r', "\n").replace('\t', " ");
    let text = text.split('\n').map(str::trim).collect::<Vec<_>>().join("\n");

    let text = BOUNDARY_LINE_REGEX.replace_all(&text, "");
    let text = MIME_HEADER_LINE_REGEX.replace_all(&text, "");
    let text = SPACE_RUN_REGEX.replace_all(&text, " ");
    let text = BLANK_RUN_REGEX.replace_all(&text, "\n\n");

    text.split('\n')
        .map(str::trim)
        .filter(|line| !is_noise_line(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// C0 controls other than tab, LF and CR, plus DEL
const fn is_stripped_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}')
}

fn is_noise_line(line: &str) -> bool {
    let mut chars = line.chars();
    if let (Some(c), None) = (chars.next(), chars.next())
        && DECORATIVE_CHARS.contains(&c)
    {
        return true;
    }
    REPEATED_PUNCT_REGEX.is_match(line) || EQUALS_ONLY_REGEX.is_match(line)
}

/// Whether candidate text is worth returning.
///
/// Rejects text shorter than ten characters and text that is mostly
/// whitespace and separator punctuation.
#[must_use]
pub fn is_valid_text(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_TEXT_CHARS {
        return false;
    }
    FILLER_REGEX.replace_all(trimmed, "").chars().count() > MIN_CONTENT_CHARS
}

/// Empty, or nothing but a single `[cid:...]` placeholder
#[must_use]
pub fn is_empty_or_cid_only(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || CID_ONLY_REGEX.is_match(trimmed)
}
