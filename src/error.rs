//! Error types for the highlighter.
//!
//! This module defines all error types that can occur while matching phrases,
//! annotating documents and persisting results. Some of them never escape a
//! run: an empty phrase, an unknown color name or a page without extractable
//! text is logged and skipped.

/// Result type alias for highlighter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during highlighting.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A phrase produced no words after trimming and splitting.
    #[error("Empty phrase: nothing to match")]
    EmptyPhrase,

    /// A caller-supplied color name is not in the palette.
    #[error("Unrecognized color: '{0}'")]
    UnrecognizedColor(String),

    /// A highlight rectangle could not be applied to a page.
    #[error("Failed to annotate page {page}: {reason}")]
    Annotation {
        /// Page index (0-based)
        page: usize,
        /// Reason for the failure
        reason: String,
    },

    /// Tokens could not be produced for a page.
    #[error("No tokens available for page {page}: {reason}")]
    SourceUnavailable {
        /// Page index (0-based)
        page: usize,
        /// Reason the page could not be read
        reason: String,
    },

    /// Page index beyond the end of the document.
    #[error("Page {page} out of range (document has {count} pages)")]
    PageOutOfRange {
        /// Requested page index (0-based)
        page: usize,
        /// Number of pages in the document
        count: usize,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error raised by the PDF object layer (open, parse, save)
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Metadata (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error only skips part of a run instead of aborting it.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::EmptyPhrase | Error::UnrecognizedColor(_) | Error::SourceUnavailable { .. }
        )
    }
}
