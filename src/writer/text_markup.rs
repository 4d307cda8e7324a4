//! Highlight annotations.
//!
//! A highlight is a `/Subtype /Highlight` text markup annotation: a
//! bounding `/Rect` plus `/QuadPoints` describing the marked area, drawn
//! by viewers as a translucent colored band.
//!
//! # Example
//!
//! ```
//! use pdf_highlighter::color::Rgb;
//! use pdf_highlighter::geometry::Rect;
//! use pdf_highlighter::writer::TextMarkupAnnotation;
//!
//! let highlight = TextMarkupAnnotation::highlight(Rect::new(72.0, 720.0, 172.0, 732.0))
//!     .with_color(Rgb::new(0.0, 1.0, 0.0))
//!     .with_opacity(0.4)
//!     .with_contents("quarterly revenue");
//! let dict = highlight.to_dictionary();
//! assert!(dict.has(b"QuadPoints"));
//! ```

use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::fonts::resolve;
use crate::geometry::Rect;
use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};

/// Annotation flag: print the annotation with the page.
pub const FLAG_PRINT: i64 = 1 << 2;

/// A highlight annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMarkupAnnotation {
    /// Bounding rectangle
    pub rect: Rect,
    /// QuadPoints, 8 values per quad in the order UL, UR, LL, LR
    pub quad_points: Vec<[f32; 8]>,
    /// Highlight color
    pub color: Rgb,
    /// Opacity (0.0 = transparent, 1.0 = opaque)
    pub opacity: Option<f32>,
    /// Text contents (the highlighted phrase)
    pub contents: Option<String>,
    /// Author of the annotation
    pub author: Option<String>,
    /// Annotation flags
    pub flags: i64,
}

/// One quad covering `rect`, in the UL, UR, LL, LR order viewers expect.
pub fn quad_for(rect: &Rect) -> [f32; 8] {
    [
        rect.x0, rect.y1, // upper left
        rect.x1, rect.y1, // upper right
        rect.x0, rect.y0, // lower left
        rect.x1, rect.y0, // lower right
    ]
}

impl TextMarkupAnnotation {
    /// Create a yellow highlight covering `rect`.
    pub fn highlight(rect: Rect) -> Self {
        Self {
            rect,
            quad_points: vec![quad_for(&rect)],
            color: Rgb::YELLOW,
            opacity: None,
            contents: None,
            author: None,
            flags: FLAG_PRINT,
        }
    }

    /// Set the color.
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Set the opacity (0.0 = transparent, 1.0 = opaque).
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity.clamp(0.0, 1.0));
        self
    }

    /// Set the contents.
    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Build the annotation dictionary.
    pub fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name(b"Annot".to_vec()));
        dict.set("Subtype", Object::Name(b"Highlight".to_vec()));
        dict.set("Rect", reals(&self.rect.to_array()));
        dict.set(
            "QuadPoints",
            Object::Array(
                self.quad_points
                    .iter()
                    .flat_map(|quad| quad.iter().map(|&v| Object::Real(v)))
                    .collect(),
            ),
        );
        dict.set("C", reals(&self.color.to_array()));
        if self.flags != 0 {
            dict.set("F", Object::Integer(self.flags));
        }
        if let Some(opacity) = self.opacity {
            dict.set("CA", Object::Real(opacity));
        }
        if let Some(ref contents) = self.contents {
            dict.set("Contents", text_string(contents));
        }
        if let Some(ref author) = self.author {
            dict.set("T", text_string(author));
        }
        dict
    }

    /// Add the annotation to page `page_id` of `doc`.
    ///
    /// `page_index` is only used for error reporting.
    pub fn add_to_page(&self, doc: &mut Document, page_id: ObjectId, page_index: usize) -> Result<ObjectId> {
        let fail = |reason: String| Error::Annotation {
            page: page_index,
            reason,
        };
        if !self.rect.is_valid() {
            return Err(fail(format!("invalid rectangle {:?}", self.rect.to_array())));
        }

        // Validate the page before adding any object to the document.
        let annots = {
            let page = doc
                .get_object(page_id)
                .map_err(|e| fail(format!("cannot read page object: {}", e)))?
                .as_dict()
                .map_err(|_| fail("page object is not a dictionary".to_string()))?;
            match page.get(b"Annots") {
                Err(_) => None,
                Ok(Object::Array(_)) => Some(None),
                Ok(Object::Reference(id)) => match doc.get_object(*id) {
                    Ok(Object::Array(_)) => Some(Some(*id)),
                    _ => return Err(fail("/Annots does not refer to an array".to_string())),
                },
                Ok(_) => return Err(fail("/Annots is not an array".to_string())),
            }
        };

        let annot_id = doc.add_object(Object::Dictionary(self.to_dictionary()));
        let target = match annots {
            Some(Some(array_id)) => array_id,
            _ => page_id,
        };
        match doc.get_object_mut(target) {
            Ok(Object::Array(arr)) => arr.push(Object::Reference(annot_id)),
            Ok(Object::Dictionary(page)) => match page.get_mut(b"Annots") {
                Ok(Object::Array(arr)) => arr.push(Object::Reference(annot_id)),
                _ => page.set("Annots", Object::Array(vec![Object::Reference(annot_id)])),
            },
            _ => return Err(fail("page changed while annotating".to_string())),
        }
        Ok(annot_id)
    }
}

fn reals(values: &[f32]) -> Object {
    Object::Array(values.iter().map(|&v| Object::Real(v)).collect())
}

/// Encode a PDF text string: literal for ASCII, UTF-16BE with BOM otherwise.
pub fn text_string(s: &str) -> Object {
    if s.is_ascii() {
        Object::String(s.as_bytes().to_vec(), StringFormat::Literal)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in s.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}

/// Number of `/Highlight` annotations on page `page_id`.
pub fn count_highlights(doc: &Document, page_id: ObjectId) -> usize {
    let annots = doc
        .get_dictionary(page_id)
        .ok()
        .and_then(|page| page.get(b"Annots").ok())
        .map(|a| resolve(doc, a))
        .and_then(|a| a.as_array().ok());
    let Some(annots) = annots else { return 0 };
    annots
        .iter()
        .filter_map(|a| resolve(doc, a).as_dict().ok())
        .filter(|a| {
            a.get(b"Subtype")
                .and_then(Object::as_name)
                .map(|s| s == b"Highlight")
                .unwrap_or(false)
        })
        .count()
}
