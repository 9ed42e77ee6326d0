//! Result types for plain-text extraction

use serde::{Deserialize, Serialize};
use std::fmt;

/// Returned when the message only carries images or attachments.
pub const ATTACHMENTS_ONLY_TEXT: &str = "[Email contains only images/attachments - no text content]";

/// Returned when nothing usable could be extracted.
pub const UNPARSEABLE_TEXT: &str = "[Unable to parse email content]";

/// Extraction strategy, in the order the selector tries them
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Non-multipart message with a base64 body
    SimpleBase64,

    /// Structured walk of nested multipart parts
    Multipart,

    /// Non-multipart message with any transfer encoding
    SimpleBody,

    /// Every `boundary=` token in the message, fragments pooled
    AllBoundaries,
}

impl Strategy {
    /// All strategies in priority order
    pub const ORDER: [Self; 4] = [
        Self::SimpleBase64,
        Self::Multipart,
        Self::SimpleBody,
        Self::AllBoundaries,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SimpleBase64 => "simple_base64",
            Self::Multipart => "multipart",
            Self::SimpleBody => "simple_body",
            Self::AllBoundaries => "all_boundaries",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the returned text was obtained
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// A strategy produced valid text
    Extracted { strategy: Strategy },

    /// No text, but the message flags attachments
    AttachmentsOnly,

    /// No text and no attachment flag, or an internal failure
    Unparseable,
}

/// Text produced for one raw message, with its provenance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Extraction {
    /// Never empty
    pub text: String,

    pub outcome: Outcome,
}

impl Extraction {
    #[must_use]
    pub const fn extracted(text: String, strategy: Strategy) -> Self {
        Self {
            text,
            outcome: Outcome::Extracted { strategy },
        }
    }

    #[must_use]
    pub fn attachments_only() -> Self {
        Self {
            text: ATTACHMENTS_ONLY_TEXT.to_string(),
            outcome: Outcome::AttachmentsOnly,
        }
    }

    #[must_use]
    pub fn unparseable() -> Self {
        Self {
            text: UNPARSEABLE_TEXT.to_string(),
            outcome: Outcome::Unparseable,
        }
    }

    /// Whether a strategy produced the text (as opposed to a fixed fallback)
    #[must_use]
    pub const fn is_extracted(&self) -> bool {
        matches!(self.outcome, Outcome::Extracted { .. })
    }

    /// The strategy that won, if any
    #[must_use]
    pub const fn strategy(&self) -> Option<Strategy> {
        match self.outcome {
            Outcome::Extracted { strategy } => Some(strategy),
            Outcome::AttachmentsOnly | Outcome::Unparseable => None,
        }
    }

    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
