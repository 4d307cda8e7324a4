//! Writing annotations into existing documents.
//!
//! - [`text_markup`]: highlight annotations and page `/Annots` handling

pub mod text_markup;

pub use text_markup::{count_highlights, quad_for, text_string, TextMarkupAnnotation, FLAG_PRINT};
