//! Match metadata collection.

use super::merge::HighlightRegion;
use crate::color::Rgb;
use crate::geometry::Rect;
use crate::search::PhraseQuery;
use serde::{Deserialize, Serialize};

/// Metadata for one phrase's matches on one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Group label shared by every record of the same phrase ("Highlight N")
    #[serde(rename = "group")]
    pub group_label: String,
    /// Phrase as submitted
    #[serde(rename = "text")]
    pub phrase: String,
    /// Page number (1-based)
    pub page: usize,
    /// Highlight color
    pub color: Rgb,
    /// Highlighted rectangles, in match order
    #[serde(rename = "coordinates")]
    pub regions: Vec<Rect>,
}

/// Builds the ordered record list for a run.
///
/// Phrases must be recorded in request order. The group counter advances
/// the first time a phrase produces a record, so phrases without any match
/// do not consume a label.
#[derive(Debug, Default)]
pub struct MatchRecorder {
    records: Vec<MatchRecord>,
    groups: usize,
    current_phrase: Option<usize>,
}

impl MatchRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the regions found for `phrase` on `page_index` (0-based).
    ///
    /// Returns `None` and records nothing when `regions` is empty.
    pub fn record(
        &mut self,
        phrase: &PhraseQuery,
        page_index: usize,
        color: Rgb,
        regions: &[HighlightRegion],
    ) -> Option<&MatchRecord> {
        if regions.is_empty() {
            return None;
        }

        if self.current_phrase != Some(phrase.group_index) {
            self.groups += 1;
            self.current_phrase = Some(phrase.group_index);
        }

        self.records.push(MatchRecord {
            group_label: format!("Highlight {}", self.groups),
            phrase: phrase.raw_text.clone(),
            page: page_index + 1,
            color,
            regions: regions.iter().map(|r| r.rect).collect(),
        });
        self.records.last()
    }

    /// Number of phrases that produced at least one record.
    pub fn group_count(&self) -> usize {
        self.groups
    }

    /// Records so far.
    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    /// Consume the recorder, returning the records in order.
    pub fn finish(self) -> Vec<MatchRecord> {
        self.records
    }
}
