//! Exact phrase search over page word tokens.
//!
//! A phrase is split into words, and a page matches wherever a contiguous
//! run of its tokens has exactly those words, in order. There is no case
//! folding, no punctuation normalization and no fuzzy matching.
//!
//! ## Example
//!
//! ```
//! use pdf_highlighter::geometry::Rect;
//! use pdf_highlighter::search::{find_matches, tokenize, Token};
//!
//! let tokens = vec![
//!     Token::new("The", Rect::new(10.0, 700.0, 30.0, 712.0)),
//!     Token::new("Cat", Rect::new(34.0, 700.0, 52.0, 712.0)),
//!     Token::new("Sat", Rect::new(56.0, 700.0, 74.0, 712.0)),
//! ];
//! let words = tokenize("The Cat");
//! let matches = find_matches(0, &tokens, &words);
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].start, 0);
//! ```

mod matcher;
mod phrase;

pub use matcher::{find_matches, Token, TokenRunMatch};
pub use phrase::{split_phrases, tokenize, PhraseQuery};
