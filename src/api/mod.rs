//! One-call highlighting of a PDF file.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_highlighter::api::{highlight_file, OutputPaths};
//! use pdf_highlighter::config::HighlightConfig;
//!
//! let config = HighlightConfig::new().with_colors(["green", "pink"]);
//! let run = highlight_file(
//!     "report.pdf",
//!     &["net revenue", "operating costs"],
//!     &config,
//!     &OutputPaths::default(),
//! )?;
//! println!("{} annotations", run.annotation_count);
//! # Ok::<(), pdf_highlighter::error::Error>(())
//! ```

use crate::config::HighlightConfig;
use crate::document::{AnnotationStyle, PdfDocument};
use crate::error::Result;
use crate::highlight::{HighlightRun, Highlighter};
use crate::metadata::write_metadata;
use std::path::{Path, PathBuf};

/// Default location of the highlighted document.
pub const DEFAULT_OUTPUT_PDF: &str = "output/highlighted_output.pdf";

/// Default location of the match metadata.
pub const DEFAULT_METADATA_JSON: &str = "highlighted_metadata.json";

/// Where a run writes its results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Highlighted PDF
    pub document: PathBuf,
    /// Match metadata JSON
    pub metadata: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            document: PathBuf::from(DEFAULT_OUTPUT_PDF),
            metadata: PathBuf::from(DEFAULT_METADATA_JSON),
        }
    }
}

impl OutputPaths {
    /// Explicit output locations.
    pub fn new(document: impl Into<PathBuf>, metadata: impl Into<PathBuf>) -> Self {
        Self {
            document: document.into(),
            metadata: metadata.into(),
        }
    }
}

/// Highlight `phrases` in the PDF at `input`.
///
/// Opens the document, runs the highlighter, saves the annotated copy and
/// writes the metadata. The input file is never modified (unless it is
/// also the output path). Any failure to open, annotate or save aborts
/// with nothing written for the metadata.
pub fn highlight_file<S: AsRef<str>>(
    input: impl AsRef<Path>,
    phrases: &[S],
    config: &HighlightConfig,
    outputs: &OutputPaths,
) -> Result<HighlightRun> {
    let input = input.as_ref();
    log::info!("Highlighting {} phrases in {}", phrases.len(), input.display());

    let mut doc = PdfDocument::open(input)?.with_style(AnnotationStyle::from(config));
    let run = Highlighter::new(config.clone()).run(&mut doc, phrases)?;

    doc.save(&outputs.document)?;
    write_metadata(&run.records, &outputs.metadata)?;
    Ok(run)
}
