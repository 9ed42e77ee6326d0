//! Transfer-encoding decoders

use crate::error::{ParseError, Result};
use base64::Engine;
use base64::alphabet;
use base64::engine::DecodePaddingMode;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use std::fmt::Write;
use tracing::warn;

/// Standard alphabet, but accepting missing padding and stray trailing bits
/// as real mailers produce them.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode base64 after removing all whitespace
pub fn decode_base64(input: &str) -> Result<Vec<u8>> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    LENIENT_BASE64
        .decode(compact.as_bytes())
        .map_err(|e| ParseError::Decode(format!("base64: {e}")))
}

/// Decode quoted-printable, leaving malformed escapes in place.
///
/// Raw 8-bit bytes pass through unchanged.
pub fn decode_quoted_printable(input: &str) -> Result<Vec<u8>> {
    let escaped = escape_8bit(input);
    quoted_printable::decode(escaped.as_bytes(), quoted_printable::ParseMode::Robust)
        .map_err(|e| ParseError::Decode(format!("quoted-printable: {e}")))
}

// The robust decoder drops bytes >= 0x80; as `=XX` escapes they survive.
fn escape_8bit(input: &str) -> String {
    if input.is_ascii() {
        return input.to_string();
    }
    let mut escaped = String::with_capacity(input.len() * 2);
    for &byte in input.as_bytes() {
        if byte.is_ascii() {
            escaped.push(char::from(byte));
        } else {
            let _ = write!(escaped, "={byte:02X}");
        }
    }
    escaped
}

/// Turn decoded bytes into text: UTF-8 if valid, otherwise Latin-1.
#[must_use]
pub fn text_from_bytes(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|e| e.into_bytes().into_iter().map(char::from).collect())
}

/// Reverse the transfer encoding named by a `Content-Transfer-Encoding` value.
///
/// Never fails: an undecodable body comes back unchanged, and `7bit`,
/// `8bit`, `binary`, unknown or absent encodings are the identity.
#[must_use]
pub fn decode_body(body: &str, encoding: Option<&str>) -> String {
    let Some(encoding) = encoding else {
        return body.to_string();
    };

    let decoded = match encoding.to_ascii_lowercase().as_str() {
        "base64" => decode_base64(body),
        "quoted-printable" => decode_quoted_printable(body),
        _ => return body.to_string(),
    };

    match decoded {
        Ok(bytes) => text_from_bytes(bytes),
        Err(e) => {
            warn!(error = %e, "keeping body undecoded");
            body.to_string()
        }
    }
}
