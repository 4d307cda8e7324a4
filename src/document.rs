//! PDF document handle.
//!
//! [`PdfDocument`] wraps a loaded [`lopdf::Document`] and is what a
//! highlighting run operates on: it supplies page words
//! ([`TokenSource`]) and receives highlight annotations
//! ([`HighlightAnnotator`]). Changes stay in memory until [`PdfDocument::save`].

use crate::color::Rgb;
use crate::config::{HighlightConfig, DEFAULT_OPACITY};
use crate::error::{Error, Result};
use crate::extractors::extract_words;
use crate::geometry::Rect;
use crate::highlight::{HighlightAnnotator, TokenSource};
use crate::search::Token;
use crate::writer::{count_highlights, TextMarkupAnnotation};
use lopdf::{Document, ObjectId};
use std::path::Path;

/// Appearance settings applied to every highlight annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationStyle {
    /// Annotation opacity
    pub opacity: f32,
    /// Author (`/T`)
    pub author: Option<String>,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            opacity: DEFAULT_OPACITY,
            author: None,
        }
    }
}

impl From<&HighlightConfig> for AnnotationStyle {
    fn from(config: &HighlightConfig) -> Self {
        Self {
            opacity: config.opacity,
            author: config.author.clone(),
        }
    }
}

/// An open PDF document.
pub struct PdfDocument {
    inner: Document,
    /// Page object ids in page order
    pages: Vec<ObjectId>,
    style: AnnotationStyle,
    /// Phrase written as `/Contents` of subsequent highlights
    contents: Option<String>,
}

impl PdfDocument {
    /// Open a PDF file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use pdf_highlighter::document::PdfDocument;
    /// let doc = PdfDocument::open("report.pdf")?;
    /// println!("{} pages", doc.page_count());
    /// # Ok::<(), pdf_highlighter::error::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )));
        }
        let inner = Document::load(path)?;
        log::debug!("Opened {}", path.display());
        Ok(Self::from_document(inner))
    }

    /// Load a PDF from memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_document(Document::load_mem(bytes)?))
    }

    /// Wrap an already loaded document.
    pub fn from_document(inner: Document) -> Self {
        let pages: Vec<ObjectId> = inner.get_pages().into_values().collect();
        log::debug!("Document has {} pages", pages.len());
        Self {
            inner,
            pages,
            style: AnnotationStyle::default(),
            contents: None,
        }
    }

    /// Use `style` for highlights added from now on.
    pub fn with_style(mut self, style: AnnotationStyle) -> Self {
        self.style = style;
        self
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The underlying document.
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    fn page_id(&self, page_index: usize) -> Result<ObjectId> {
        self.pages
            .get(page_index)
            .copied()
            .ok_or(Error::PageOutOfRange {
                page: page_index,
                count: self.pages.len(),
            })
    }

    /// Number of highlight annotations on a page.
    pub fn highlight_count(&self, page_index: usize) -> Result<usize> {
        Ok(count_highlights(&self.inner, self.page_id(page_index)?))
    }

    /// Write the document to `path`, creating parent directories.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        self.inner.save(path)?;
        log::info!("Saved {}", path.display());
        Ok(())
    }

    /// Serialize the document.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.inner.save_to(&mut buffer)?;
        Ok(buffer)
    }
}

impl TokenSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_tokens(&self, page_index: usize) -> Result<Vec<Token>> {
        extract_words(&self.inner, self.page_id(page_index)?, page_index)
    }
}

impl HighlightAnnotator for PdfDocument {
    fn apply_highlight(&mut self, page_index: usize, rect: &Rect, color: Rgb) -> Result<()> {
        let page_id = self.page_id(page_index).map_err(|e| Error::Annotation {
            page: page_index,
            reason: e.to_string(),
        })?;

        let mut annotation = TextMarkupAnnotation::highlight(*rect)
            .with_color(color)
            .with_opacity(self.style.opacity);
        if let Some(ref contents) = self.contents {
            annotation = annotation.with_contents(contents.as_str());
        }
        if let Some(ref author) = self.style.author {
            annotation = annotation.with_author(author.as_str());
        }
        annotation.add_to_page(&mut self.inner, page_id, page_index)?;
        Ok(())
    }

    fn begin_phrase(&mut self, phrase: &str) {
        self.contents = Some(phrase.to_string());
    }
}
