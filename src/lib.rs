// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Plain-Text Email Extractor
//!
//! Best-effort extraction of readable text from raw, possibly malformed
//! MIME messages. Headers are inspected by pattern search instead of a
//! strict grammar, and several strategies are tried in order until one
//! produces text that passes a validity check.
//!
//! # Strategies
//!
//! 1. Non-multipart base64 body
//! 2. Recursive multipart walk (plain text preferred over HTML)
//! 3. Non-multipart body with any transfer encoding
//! 4. Every `boundary=` in the message, fragments pooled
//!
//! When all of them fail the result is a fixed message, so callers never
//! handle errors.
//!
//! # Example
//!
//! ```rust
//! use email_plaintext::parse_email_to_plain_text;
//!
//! let raw = "From: sender@example.com\r\n\
//!            Content-Type: text/plain\r\n\
//!            \r\n\
//!            Hello, this is the message body.";
//! let text = parse_email_to_plain_text(raw);
//!
//! assert_eq!(text, "Hello, this is the message body.");
//! ```

mod decode;
mod error;
mod html;
mod mime;
mod normalize;
mod parser;
mod types;

pub use decode::{decode_base64, decode_body, decode_quoted_printable, text_from_bytes};
pub use error::{ParseError, Result};
pub use html::html_to_text;
pub use mime::{
    content_type, find_all_boundaries, find_boundary, has_attachment_marker,
    split_headers_and_body, split_on_boundary, transfer_encoding,
};
pub use normalize::{is_empty_or_cid_only, is_valid_text, normalize_text};
pub use parser::{MAX_DEPTH, extract, parse_email_bytes, parse_email_to_plain_text};
pub use types::*;
