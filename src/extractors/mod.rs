//! Token extraction from PDF pages.
//!
//! - [`words`]: whitespace-delimited words with their bounding boxes, in reading order

pub mod words;

pub use words::{extract_words, reading_order, PlacedWord, WordExtractor, LINE_TOLERANCE, WORD_MARGIN};
