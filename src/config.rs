//! Configuration for highlighting runs.

use crate::color::{parse_color_list, Palette};
use crate::error::{Error, Result};

/// Default opacity of highlight annotations.
pub const DEFAULT_OPACITY: f32 = 0.4;

/// Highlighting configuration.
#[derive(Debug, Clone)]
pub struct HighlightConfig {
    /// Named colors; also the default cycling order.
    pub palette: Palette,

    /// Caller-chosen color names, used in order instead of the palette.
    pub colors: Vec<String>,

    /// Annotation opacity (0.0 = invisible, 1.0 = opaque).
    pub opacity: f32,

    /// Separator for phrase lists. `None` treats the input as one phrase.
    pub phrase_delimiter: Option<char>,

    /// Separator for color lists.
    pub color_delimiter: char,

    /// Author written into each annotation.
    pub author: Option<String>,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl HighlightConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            palette: Palette::default(),
            colors: Vec::new(),
            opacity: DEFAULT_OPACITY,
            phrase_delimiter: Some(','),
            color_delimiter: ',',
            author: None,
        }
    }

    /// Use a different palette.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Set the color override names.
    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    /// Set the color override names from a list separated by
    /// [`color_delimiter`](Self::color_delimiter).
    pub fn with_color_list(mut self, list: &str) -> Self {
        self.colors = parse_color_list(list, self.color_delimiter);
        self
    }

    /// Set the annotation opacity. Finite values are clamped to `0.0..=1.0`.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            opacity
        };
        self
    }

    /// Set the phrase list separator.
    pub fn with_phrase_delimiter(mut self, delimiter: Option<char>) -> Self {
        self.phrase_delimiter = delimiter;
        self
    }

    /// Set the color list separator.
    pub fn with_color_delimiter(mut self, delimiter: char) -> Self {
        self.color_delimiter = delimiter;
        self
    }

    /// Set the annotation author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Check the configuration before a run.
    pub fn validate(&self) -> Result<()> {
        if !self.opacity.is_finite() {
            return Err(Error::InvalidConfig(format!("opacity must be finite, got {}", self.opacity)));
        }
        if self.palette.is_empty() {
            return Err(Error::InvalidConfig("palette has no colors".to_string()));
        }
        Ok(())
    }
}
