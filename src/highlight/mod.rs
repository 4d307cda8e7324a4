//! Phrase highlighting.
//!
//! For each phrase and page: find the exact token runs ([`crate::search`]),
//! turn each run into rectangles ([`merge`]), draw them through a
//! [`HighlightAnnotator`] and collect [`MatchRecord`]s.

mod engine;
mod merge;
mod recorder;

pub use engine::{page_regions, HighlightAnnotator, HighlightRun, Highlighter, TokenSource};
pub use merge::{line_clusters, merge, HighlightRegion};
pub use recorder::{MatchRecord, MatchRecorder};
