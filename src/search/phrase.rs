//! Phrase parsing: raw request text to expected word sequences.

use crate::error::{Error, Result};

/// Split a phrase into the words a match must contain, in order.
///
/// Splits on runs of Unicode whitespace. Punctuation stays attached to its
/// word, since matching compares whole tokens exactly. Empty or all-blank
/// input yields no words.
///
/// # Examples
///
/// ```
/// use pdf_highlighter::search::tokenize;
///
/// assert_eq!(tokenize("  Hello,   world! "), vec!["Hello,", "world!"]);
/// assert!(tokenize(" \t ").is_empty());
/// ```
pub fn tokenize(raw_text: &str) -> Vec<String> {
    raw_text.split_whitespace().map(str::to_string).collect()
}

/// Split a delimiter-separated phrase list into individual phrases.
///
/// With `delimiter == None` the whole input is a single phrase. Entries are
/// trimmed; blank entries are kept so phrase positions (and therefore
/// colors) line up with what the caller typed.
pub fn split_phrases(input: &str, delimiter: Option<char>) -> Vec<String> {
    match delimiter {
        Some(d) => input.split(d).map(|p| p.trim().to_string()).collect(),
        None => vec![input.trim().to_string()],
    }
}

/// One phrase from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseQuery {
    /// Phrase as submitted
    pub raw_text: String,
    /// Words a match must equal, in order (never empty)
    pub expected_words: Vec<String>,
    /// Position of the phrase in the request (0-based)
    pub group_index: usize,
}

impl PhraseQuery {
    /// Parse a phrase.
    ///
    /// Fails with [`Error::EmptyPhrase`] when the phrase has no words; the
    /// caller is expected to skip it.
    pub fn new(raw_text: impl Into<String>, group_index: usize) -> Result<Self> {
        let raw_text = raw_text.into();
        let expected_words = tokenize(&raw_text);
        if expected_words.is_empty() {
            return Err(Error::EmptyPhrase);
        }
        Ok(Self {
            raw_text,
            expected_words,
            group_index,
        })
    }

    /// Number of words in the phrase.
    pub fn word_count(&self) -> usize {
        self.expected_words.len()
    }
}
