//! Exact word-sequence matching over a page's tokens.

use crate::geometry::Rect;

/// A single extracted word with its bounding box in page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Word text, without surrounding whitespace
    pub text: String,
    /// Bounding box in PDF user space
    pub bbox: Rect,
}

impl Token {
    /// Create a token.
    pub fn new(text: impl Into<String>, bbox: Rect) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }
}

/// A contiguous run of tokens whose texts equal a phrase's words.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenRunMatch<'a> {
    /// Page index (0-based)
    pub page: usize,
    /// Index of the first token of the run within the page
    pub start: usize,
    /// The matched tokens, one per phrase word
    pub tokens: &'a [Token],
}

impl TokenRunMatch<'_> {
    /// Index one past the last matched token.
    pub fn end(&self) -> usize {
        self.start + self.tokens.len()
    }
}

/// Find every position where `expected_words` occurs in `tokens`.
///
/// Each start index is tested independently, so overlapping occurrences
/// (e.g. "a a" in "a a a") are all reported, in ascending order. An empty
/// word list never matches.
pub fn find_matches<'a, S>(
    page: usize,
    tokens: &'a [Token],
    expected_words: &[S],
) -> Vec<TokenRunMatch<'a>>
where
    S: AsRef<str>,
{
    let n = expected_words.len();
    if n == 0 || tokens.len() < n {
        return Vec::new();
    }

    tokens
        .windows(n)
        .enumerate()
        .filter(|(_, window)| {
            window
                .iter()
                .zip(expected_words)
                .all(|(token, word)| token.text == word.as_ref())
        })
        .map(|(start, window)| TokenRunMatch {
            page,
            start,
            tokens: window,
        })
        .collect()
}
