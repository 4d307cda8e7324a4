//! Fonts: what word extraction needs to decode and place glyphs.
//!
//! Only what word geometry and text require is read from a font
//! dictionary: glyph advance widths, ascent/descent, the code length and
//! the code-to-text mapping.
//!
//! Text is decoded through, in order of preference:
//! 1. the font's `/ToUnicode` CMap ([`cmap`])
//! 2. for simple fonts, `/Encoding` with its `/Differences` ([`encoding`])
//! 3. WinAnsi
//!
//! Widths come from `/Widths` (simple fonts) or the descendant's `/W`
//! (Type0 fonts), then the Base-14 AFM tables ([`base14`]), then
//! `/MissingWidth`.

pub mod base14;
pub mod cmap;
pub mod encoding;

pub use base14::Base14;
pub use cmap::{parse_tounicode_cmap, CMap};
pub use encoding::{
    decode_standard, decode_winansi, expand_ligatures, glyph_name_to_text, has_ligatures,
    BaseEncoding, SimpleEncoding,
};

use lopdf::{Dictionary, Document, Object};
use std::borrow::Cow;
use std::collections::HashMap;

/// Width used when a font gives none, in 1000ths of an em.
pub const DEFAULT_GLYPH_WIDTH: f32 = 500.0;

/// Default CID width (`/DW`) of Type0 fonts.
const DEFAULT_CID_WIDTH: f32 = 1000.0;

/// Resolve an indirect reference, returning the object itself otherwise.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

fn number(obj: &Object) -> Option<f32> {
    obj.as_float().ok().filter(|v| v.is_finite())
}

/// Decompressed data of a stream object, if `obj` leads to one.
fn stream_data(doc: &Document, obj: &Object) -> Option<Vec<u8>> {
    let stream = resolve(doc, obj).as_stream().ok()?;
    if stream.dict.has(b"Filter") {
        stream.decompressed_content().ok()
    } else {
        Some(stream.content.clone())
    }
}

/// One font resource, as far as text extraction is concerned.
#[derive(Debug, Clone, PartialEq)]
pub struct FontInfo {
    /// PostScript name, if given
    pub base_font: String,
    /// Code of the first entry in `widths`
    pub first_char: u32,
    /// Advance widths in 1000ths of an em
    pub widths: Vec<f32>,
    /// Type0 widths by CID, from the descendant's `/W`
    pub cid_widths: HashMap<u32, f32>,
    /// Width for codes with no other width
    pub missing_width: f32,
    /// Ascender in 1000ths of an em
    pub ascent: f32,
    /// Descender in 1000ths of an em (negative)
    pub descent: f32,
    /// Codes are two bytes wide (Type0 fonts)
    pub two_byte: bool,
    /// Standard font metrics, when `base_font` names one
    pub standard: Option<Base14>,
    /// Byte mapping of a simple font
    pub encoding: SimpleEncoding,
    /// `/ToUnicode` mappings
    pub to_unicode: CMap,
}

impl Default for FontInfo {
    fn default() -> Self {
        Self {
            base_font: String::new(),
            first_char: 0,
            widths: Vec::new(),
            cid_widths: HashMap::new(),
            missing_width: DEFAULT_GLYPH_WIDTH,
            ascent: 800.0,
            descent: -200.0,
            two_byte: false,
            standard: None,
            encoding: SimpleEncoding::default(),
            to_unicode: CMap::new(),
        }
    }
}

impl FontInfo {
    /// Read a font dictionary.
    pub fn from_dict(doc: &Document, font: &Dictionary) -> Self {
        let base_font = font
            .get(b"BaseFont")
            .and_then(Object::as_name)
            .map(|n| String::from_utf8_lossy(n).into_owned())
            .unwrap_or_default();
        let two_byte = font
            .get(b"Subtype")
            .and_then(Object::as_name)
            .map(|s| s == b"Type0")
            .unwrap_or(false);
        let standard = Base14::from_base_font(&base_font);

        let (mut ascent, mut descent) = standard
            .map(Base14::vertical_metrics)
            .unwrap_or((800.0, -200.0));
        let mut missing_width = match (two_byte, standard) {
            (true, _) => DEFAULT_CID_WIDTH,
            (false, Some(font)) => font.fallback_width(),
            (false, None) => DEFAULT_GLYPH_WIDTH,
        };

        // Type0 metrics live on the descendant CIDFont
        let descendant = font
            .get(b"DescendantFonts")
            .map(|d| resolve(doc, d))
            .and_then(Object::as_array)
            .ok()
            .and_then(|fonts| fonts.first())
            .and_then(|f| resolve(doc, f).as_dict().ok());
        let metrics_dict = if two_byte { descendant.unwrap_or(font) } else { font };

        if let Ok(descriptor) = metrics_dict.get(b"FontDescriptor") {
            if let Ok(descriptor) = resolve(doc, descriptor).as_dict() {
                let field = |key: &[u8]| descriptor.get(key).ok().and_then(number);
                ascent = field(&b"Ascent"[..]).filter(|v| *v != 0.0).unwrap_or(ascent);
                descent = field(&b"Descent"[..]).filter(|v| *v != 0.0).unwrap_or(descent);
                if !two_byte {
                    missing_width = field(&b"MissingWidth"[..]).unwrap_or(missing_width);
                }
            }
        }

        let widths = font
            .get(b"Widths")
            .map(|w| resolve(doc, w))
            .and_then(Object::as_array)
            .map(|arr| {
                arr.iter()
                    .map(|w| number(resolve(doc, w)).unwrap_or(missing_width))
                    .collect()
            })
            .unwrap_or_default();
        let first_char = font
            .get(b"FirstChar")
            .and_then(Object::as_i64)
            .map(|c| c.max(0) as u32)
            .unwrap_or(0);

        let mut cid_widths = HashMap::new();
        if let (true, Some(descendant)) = (two_byte, descendant) {
            missing_width = descendant
                .get(b"DW")
                .ok()
                .and_then(number)
                .unwrap_or(DEFAULT_CID_WIDTH);
            if let Ok(w) = descendant.get(b"W").map(|w| resolve(doc, w)).and_then(Object::as_array) {
                cid_widths = parse_cid_widths(doc, w);
            }
        }

        let encoding = match font.get(b"Encoding") {
            Ok(enc) if !two_byte => SimpleEncoding::from_object(doc, enc),
            _ => SimpleEncoding::default(),
        };
        let to_unicode = font
            .get(b"ToUnicode")
            .ok()
            .and_then(|t| stream_data(doc, t))
            .map(|data| parse_tounicode_cmap(&data))
            .unwrap_or_default();
        if two_byte && to_unicode.is_empty() {
            log::debug!("Type0 font {} has no ToUnicode map; its text is not decoded", base_font);
        }

        Self {
            base_font,
            first_char,
            widths,
            cid_widths,
            missing_width,
            ascent,
            descent,
            two_byte,
            standard,
            encoding,
            to_unicode,
        }
    }

    /// Advance width of `code`, in 1000ths of an em.
    pub fn width(&self, code: u32) -> f32 {
        if self.two_byte {
            return self.cid_widths.get(&code).copied().unwrap_or(self.missing_width);
        }
        if let Some(w) = code
            .checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
        {
            return *w;
        }
        if let Some(standard) = self.standard {
            let text = self.decode(code);
            let mut chars = text.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                if let Some(w) = standard.width(c) {
                    return w;
                }
            }
        }
        self.missing_width
    }

    /// Split a shown string into character codes.
    pub fn codes<'a>(&self, bytes: &'a [u8]) -> Box<dyn Iterator<Item = u32> + 'a> {
        if self.two_byte {
            Box::new(
                bytes
                    .chunks(2)
                    .map(|pair| pair.iter().fold(0u32, |acc, b| (acc << 8) | *b as u32)),
            )
        } else {
            Box::new(bytes.iter().map(|b| *b as u32))
        }
    }

    /// Text for a character code, with ligatures spelled out.
    ///
    /// Two-byte codes without a ToUnicode entry decode to U+FFFD.
    pub fn decode(&self, code: u32) -> Cow<'_, str> {
        let text = match self.to_unicode.get(&code) {
            Some(text) => Cow::Borrowed(text.as_str()),
            None if self.two_byte => Cow::Owned(char::REPLACEMENT_CHARACTER.to_string()),
            None => self.encoding.decode(code as u8),
        };
        if has_ligatures(&text) {
            Cow::Owned(expand_ligatures(&text).into_owned())
        } else {
            text
        }
    }
}

/// Descendant `/W` array: `c [w1 w2 ...]` or `c_first c_last w`.
fn parse_cid_widths(doc: &Document, items: &[Object]) -> HashMap<u32, f32> {
    let mut widths = HashMap::new();
    let mut i = 0;
    while i < items.len() {
        let Some(first) = resolve(doc, &items[i]).as_i64().ok().and_then(|c| u32::try_from(c).ok())
        else {
            i += 1;
            continue;
        };
        match items.get(i + 1).map(|o| resolve(doc, o)) {
            Some(Object::Array(run)) => {
                for (offset, w) in run.iter().enumerate() {
                    if let Some(w) = number(resolve(doc, w)) {
                        widths.insert(first + offset as u32, w);
                    }
                }
                i += 2;
            },
            Some(last) => {
                let last = last.as_i64().ok().and_then(|c| u32::try_from(c).ok());
                let w = items.get(i + 2).map(|o| resolve(doc, o)).and_then(number);
                if let (Some(last), Some(w)) = (last, w) {
                    // Bounded so a corrupt range cannot exhaust memory
                    for cid in first..=last.min(first.saturating_add(0xFFFF)) {
                        widths.insert(cid, w);
                    }
                }
                i += 3;
            },
            None => break,
        }
    }
    widths
}
