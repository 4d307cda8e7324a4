// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::type_complexity)]
#![allow(clippy::redundant_closure)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Highlighter
//!
//! Exact phrase highlighting for PDF documents.
//!
//! ## Core Features
//!
//! - **Word extraction**: content-stream words with user-space bounding boxes
//! - **Exact matching**: contiguous, case-sensitive word-sequence matches,
//!   overlapping occurrences included
//! - **Line-aware geometry**: one envelope per single-line match, one
//!   rectangle per word when a match wraps across lines
//! - **Colors**: cyclic palette per phrase, caller overrides, yellow fallback
//! - **Metadata**: per-phrase, per-page records ("Highlight N" groups) as JSON
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_highlighter::config::HighlightConfig;
//! use pdf_highlighter::highlight::Highlighter;
//! use pdf_highlighter::PdfDocument;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = PdfDocument::open("paper.pdf")?;
//! let run = Highlighter::new(HighlightConfig::default())
//!     .run(&mut doc, &["neural network", "training data"])?;
//!
//! for record in &run.records {
//!     println!("{} on page {}: {:?}", record.group_label, record.page, record.regions);
//! }
//! doc.save("paper-highlighted.pdf")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Geometry and colors
pub mod color;
pub mod geometry;

// Reading PDF pages
pub mod content;
pub mod document;
pub mod extractors;
pub mod fonts;

// Matching and highlighting
pub mod highlight;
pub mod search;

// Writing annotations and results
pub mod metadata;
pub mod writer;

// High-level API
pub mod api;

// Re-exports
pub use api::{highlight_file, OutputPaths};
pub use color::{Palette, Rgb};
pub use config::HighlightConfig;
pub use document::PdfDocument;
pub use error::{Error, Result};
pub use geometry::Rect;
pub use highlight::{HighlightRun, Highlighter, MatchRecord};

// Internal utilities
pub(crate) mod utils {
    //! Internal utility functions for the library.

    use std::cmp::Ordering;

    /// Safely compare two floating point numbers, handling NaN cases.
    ///
    /// NaN values are treated as equal to each other and greater than all other values.
    /// This ensures that sorting operations never panic due to NaN comparisons.
    #[inline]
    pub fn safe_float_cmp(a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater, // NaN > all numbers
            (false, true) => Ordering::Less,    // all numbers < NaN
            (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        }
    }

}

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
