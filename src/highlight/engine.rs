//! The highlighting run: phrases x pages -> annotations + metadata.

use super::merge::{merge, HighlightRegion};
use super::recorder::{MatchRecord, MatchRecorder};
use crate::color::{ColorAssigner, Rgb};
use crate::config::HighlightConfig;
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::search::{find_matches, PhraseQuery, Token};

/// Supplies the word tokens of each page, in reading order.
pub trait TokenSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Tokens of page `page_index` (0-based).
    ///
    /// Returns [`Error::SourceUnavailable`] when the page has no readable
    /// text layer; the run then skips that page.
    fn page_tokens(&self, page_index: usize) -> Result<Vec<Token>>;
}

/// Draws highlight rectangles onto a document.
///
/// Rectangles are in the same coordinate space as the tokens returned by
/// the document's [`TokenSource`].
pub trait HighlightAnnotator {
    /// Add a highlight over `rect` on page `page_index` (0-based).
    fn apply_highlight(&mut self, page_index: usize, rect: &Rect, color: Rgb) -> Result<()>;

    /// Called before the highlights of `phrase` are applied.
    fn begin_phrase(&mut self, _phrase: &str) {}
}

/// Outcome of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightRun {
    /// Per-phrase, per-page match metadata in processing order
    pub records: Vec<MatchRecord>,
    /// Request positions of phrases skipped for having no words
    pub skipped_phrases: Vec<usize>,
    /// Pages (0-based) skipped because their tokens were unavailable
    pub skipped_pages: Vec<usize>,
    /// Number of highlight annotations added to the document
    pub annotation_count: usize,
}

impl HighlightRun {
    /// Whether any phrase matched anywhere.
    pub fn has_matches(&self) -> bool {
        !self.records.is_empty()
    }
}

/// Regions to highlight for `phrase` on one page, in match order.
pub fn page_regions(page_index: usize, tokens: &[Token], phrase: &PhraseQuery) -> Vec<HighlightRegion> {
    find_matches(page_index, tokens, &phrase.expected_words)
        .iter()
        .flat_map(merge)
        .collect()
}

/// Runs phrase highlighting over a document.
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    config: HighlightConfig,
}

impl Highlighter {
    /// Create a highlighter with the given configuration.
    pub fn new(config: HighlightConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Highlight every phrase on every page of `doc`.
    ///
    /// Phrases are processed in order, pages in order within a phrase.
    /// Empty phrases and unreadable pages are skipped; an annotation
    /// failure aborts the run, leaving earlier annotations in place.
    pub fn run<D, S>(&self, doc: &mut D, phrases: &[S]) -> Result<HighlightRun>
    where
        D: TokenSource + HighlightAnnotator,
        S: AsRef<str>,
    {
        self.config.validate()?;
        let colors = ColorAssigner::new(&self.config.palette, &self.config.colors);

        let mut run = HighlightRun::default();
        let pages = self.load_pages(doc, &mut run.skipped_pages)?;
        let mut recorder = MatchRecorder::new();

        for (group_index, raw) in phrases.iter().enumerate() {
            let phrase = match PhraseQuery::new(raw.as_ref(), group_index) {
                Ok(phrase) => phrase,
                Err(Error::EmptyPhrase) => {
                    log::warn!("Skipping empty phrase at position {}", group_index);
                    run.skipped_phrases.push(group_index);
                    continue;
                },
                Err(e) => return Err(e),
            };
            let color = colors.color_for(group_index);
            doc.begin_phrase(&phrase.raw_text);

            for (page_index, tokens) in pages.iter().enumerate() {
                let Some(tokens) = tokens else { continue };
                let regions = page_regions(page_index, tokens, &phrase);
                if regions.is_empty() {
                    continue;
                }

                for region in &regions {
                    doc.apply_highlight(page_index, &region.rect, color)?;
                }
                run.annotation_count += regions.len();

                if let Some(record) = recorder.record(&phrase, page_index, color, &regions) {
                    log::debug!(
                        "{}: '{}' on page {} ({} regions)",
                        record.group_label,
                        record.phrase,
                        record.page,
                        record.regions.len()
                    );
                }
            }
        }

        log::info!(
            "Highlighted {} of {} phrases: {} records, {} annotations",
            recorder.group_count(),
            phrases.len(),
            recorder.records().len(),
            run.annotation_count
        );
        run.records = recorder.finish();
        Ok(run)
    }

    fn load_pages<D>(&self, doc: &D, skipped: &mut Vec<usize>) -> Result<Vec<Option<Vec<Token>>>>
    where
        D: TokenSource,
    {
        (0..doc.page_count())
            .map(|page_index| match doc.page_tokens(page_index) {
                Ok(tokens) => Ok(Some(tokens)),
                Err(e @ Error::SourceUnavailable { .. }) => {
                    log::warn!("{}; skipping page", e);
                    skipped.push(page_index);
                    Ok(None)
                },
                Err(e) => Err(e),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory document: tokens per page (`None` = unreadable page) and a
    /// log of applied highlights.
    #[derive(Default)]
    struct MemoryDocument {
        pages: Vec<Option<Vec<Token>>>,
        applied: Vec<(usize, Rect, Rgb)>,
        reject_page: Option<usize>,
    }

    impl TokenSource for MemoryDocument {
        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn page_tokens(&self, page_index: usize) -> Result<Vec<Token>> {
            self.pages[page_index]
                .clone()
                .ok_or_else(|| Error::SourceUnavailable {
                    page: page_index,
                    reason: "no text layer".to_string(),
                })
        }
    }

    impl HighlightAnnotator for MemoryDocument {
        fn apply_highlight(&mut self, page_index: usize, rect: &Rect, color: Rgb) -> Result<()> {
            if self.reject_page == Some(page_index) {
                return Err(Error::Annotation {
                    page: page_index,
                    reason: "page is locked".to_string(),
                });
            }
            self.applied.push((page_index, *rect, color));
            Ok(())
        }
    }

    fn line(words: &[&str], y: f32) -> Vec<Token> {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let x = 10.0 + 40.0 * i as f32;
                Token::new(*w, Rect::new(x, y, x + 30.0, y + 12.0))
            })
            .collect()
    }

    fn document(pages: Vec<Vec<Token>>) -> MemoryDocument {
        MemoryDocument {
            pages: pages.into_iter().map(Some).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_line_phrase() {
        let mut doc = document(vec![line(&["The", "Cat", "Sat"], 700.0)]);
        let run = Highlighter::default().run(&mut doc, &["The Cat"]).unwrap();

        assert_eq!(run.records.len(), 1);
        assert_eq!(run.records[0].regions, vec![Rect::new(10.0, 700.0, 80.0, 712.0)]);
        assert_eq!(doc.applied.len(), 1);
        assert_eq!(run.annotation_count, 1);
    }

    #[test]
    fn test_empty_phrase_skipped() {
        let mut doc = document(vec![line(&["The", "Cat"], 700.0)]);
        let run = Highlighter::default().run(&mut doc, &[""]).unwrap();

        assert!(run.records.is_empty());
        assert_eq!(run.skipped_phrases, vec![0]);
        assert!(doc.applied.is_empty());
    }

    #[test]
    fn test_same_phrase_on_two_pages() {
        let mut doc = document(vec![
            line(&["Cat", "Sat", "here"], 700.0),
            line(&["Cat", "Sat", "there"], 700.0),
        ]);
        let run = Highlighter::default().run(&mut doc, &["Cat Sat"]).unwrap();

        assert_eq!(run.records.len(), 2);
        assert_eq!(run.records[0].group_label, run.records[1].group_label);
        assert_eq!(run.records[0].color, run.records[1].color);
        assert_eq!(run.records[0].page, 1);
        assert_eq!(run.records[1].page, 2);
    }

    #[test]
    fn test_wrapped_phrase_not_merged() {
        let mut tokens = line(&["the", "end"], 140.0);
        tokens.extend(line(&["of", "it"], 100.0));
        let mut doc = document(vec![tokens.clone()]);
        let run = Highlighter::default().run(&mut doc, &["end of"]).unwrap();

        assert_eq!(run.records[0].regions, vec![tokens[1].bbox, tokens[2].bbox]);
        assert_eq!(doc.applied.len(), 2);
    }

    #[test]
    fn test_override_colors_cycle() {
        let mut doc = document(vec![line(&["one", "two", "three"], 700.0)]);
        let config = HighlightConfig::new().with_colors(["red", "blue"]);
        let run = Highlighter::new(config.clone())
            .run(&mut doc, &["one", "two", "three"])
            .unwrap();

        let red = config.palette.get("red").unwrap();
        let blue = config.palette.get("blue").unwrap();
        let colors: Vec<Rgb> = run.records.iter().map(|r| r.color).collect();
        assert_eq!(colors, vec![red, blue, red]);
    }

    #[test]
    fn test_color_follows_request_position() {
        let mut doc = document(vec![line(&["one", "two"], 700.0)]);
        let run = Highlighter::default()
            .run(&mut doc, &["missing", "", "two"])
            .unwrap();

        let palette = HighlightConfig::default().palette.colors();
        assert_eq!(run.records.len(), 1);
        assert_eq!(run.records[0].group_label, "Highlight 1");
        assert_eq!(run.records[0].color, palette[2]);
    }

    #[test]
    fn test_unavailable_page_skipped_for_all_phrases() {
        let mut doc = MemoryDocument {
            pages: vec![None, Some(line(&["Cat", "Sat"], 700.0))],
            ..Default::default()
        };
        let run = Highlighter::default().run(&mut doc, &["Cat", "Sat"]).unwrap();

        assert_eq!(run.skipped_pages, vec![0]);
        assert_eq!(run.records.len(), 2);
        assert!(run.records.iter().all(|r| r.page == 2));
    }

    #[test]
    fn test_annotation_failure_aborts_run() {
        let mut doc = document(vec![line(&["Cat"], 700.0), line(&["Cat"], 700.0)]);
        doc.reject_page = Some(1);
        let result = Highlighter::default().run(&mut doc, &["Cat"]);

        assert!(matches!(result, Err(Error::Annotation { page: 1, .. })));
        // page 0 was annotated before the failure and is not rolled back
        assert_eq!(doc.applied.len(), 1);
    }

    #[test]
    fn test_overlapping_matches_each_highlighted() {
        let mut doc = document(vec![line(&["a", "a", "a"], 700.0)]);
        let run = Highlighter::default().run(&mut doc, &["a a"]).unwrap();
        assert_eq!(run.records[0].regions.len(), 2);
    }

    #[test]
    fn test_runs_are_repeatable() {
        let pages = vec![
            line(&["The", "Cat", "Sat", "The", "Cat"], 700.0),
            line(&["Cat", "Sat"], 500.0),
        ];
        let phrases = ["The Cat", "Cat Sat", "nothing"];

        let first = Highlighter::default()
            .run(&mut document(pages.clone()), &phrases)
            .unwrap();
        let second = Highlighter::default()
            .run(&mut document(pages), &phrases)
            .unwrap();

        assert_eq!(
            serde_json::to_vec(&first.records).unwrap(),
            serde_json::to_vec(&second.records).unwrap()
        );
    }

    #[test]
    fn test_invalid_config_rejected_before_annotating() {
        let mut doc = document(vec![line(&["Cat"], 700.0)]);
        let config = HighlightConfig::new().with_opacity(f32::NAN);
        assert!(Highlighter::new(config).run(&mut doc, &["Cat"]).is_err());
        assert!(doc.applied.is_empty());
    }
}
