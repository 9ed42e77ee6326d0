//! Error types for plain-text extraction
//!
//! None of these reach callers of [`crate::parse_email_to_plain_text`]; they
//! flow between the decoders and the strategies, which turn them into
//! "no result" or into the fixed fallback text.

use thiserror::Error;

/// Errors that can occur while extracting text
#[derive(Error, Debug)]
pub enum ParseError {
    /// Failed to decode a transfer-encoded body
    #[error("Failed to decode content: {0}")]
    Decode(String),

    /// Multipart nesting went past the recursion bound
    #[error("Multipart nesting exceeded depth {0}")]
    DepthExceeded(usize),

    /// Anything else, caught at the top of the pipeline
    #[error("Unexpected failure while parsing: {0}")]
    Unexpected(String),
}

/// Result type for extraction internals
pub type Result<T> = std::result::Result<T, ParseError>;
