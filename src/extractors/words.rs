//! Word extraction with bounding boxes.
//!
//! Walks a page's content stream, placing every shown glyph with the text
//! and graphics state in effect, and groups glyphs into words. A word ends
//! at a whitespace glyph, or where the next glyph does not continue the
//! previous one on the page:
//!
//! ```text
//! break = gap > WORD_MARGIN * size      (space between glyphs)
//!      || gap < -size                   (jump backwards)
//!      || drift > size / 2              (different baseline)
//! ```
//!
//! `gap` is measured along the text direction from the end of the previous
//! glyph to the origin of the next, `drift` across it, and `size` is the
//! previous glyph's larger extent. Positioning operators (`Td`, `Tm`, `TJ`
//! offsets, `BT`) only matter through where they put the next glyph.
//!
//! Bounding boxes are in PDF user space: horizontally the glyphs' advance
//! extent, vertically from baseline + descent to baseline + ascent.
//!
//! Words come out in reading order: grouped into lines by baseline, lines
//! top to bottom, words left to right within a line.

use crate::content::{GraphicsStateStack, Matrix};
use crate::error::{Error, Result};
use crate::fonts::{resolve, FontInfo};
use crate::geometry::{Point, Rect};
use crate::search::Token;
use crate::utils::safe_float_cmp;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashMap;
use std::rc::Rc;

/// Gap between glyphs, relative to glyph size, that separates words.
pub const WORD_MARGIN: f32 = 0.1;

/// Baseline difference, relative to word height, within which words share a line.
pub const LINE_TOLERANCE: f32 = 0.5;

/// Maximum nesting of form XObjects.
const MAX_FORM_DEPTH: u32 = 8;

/// Extract the words of page `page_id`.
///
/// `page_index` is only used for error reporting. Fails with
/// [`Error::SourceUnavailable`] when the page content cannot be read or
/// decoded.
pub fn extract_words(doc: &Document, page_id: ObjectId, page_index: usize) -> Result<Vec<Token>> {
    let unavailable = |reason: String| Error::SourceUnavailable {
        page: page_index,
        reason,
    };

    let data = page_content(doc, page_id).map_err(unavailable)?;
    let content =
        Content::decode(&data).map_err(|e| unavailable(format!("cannot decode content: {}", e)))?;
    // The decoder stops quietly at the first malformed operator.
    if content.operations.is_empty() && data.iter().any(|b| !b.is_ascii_whitespace()) {
        return Err(unavailable("content stream has no decodable operators".to_string()));
    }
    let resources = page_resources(doc, page_id);

    let mut extractor = WordExtractor::new(doc);
    extractor.run(&content.operations, resources, 0);
    let words = reading_order(extractor.finish());
    log::debug!("Page {}: extracted {} words", page_index, words.len());
    Ok(words)
}

/// Concatenated, decompressed content of a page.
///
/// A page without `/Contents` is blank. A `/Contents` entry that does not
/// lead to streams is an error.
fn page_content(doc: &Document, page_id: ObjectId) -> std::result::Result<Vec<u8>, String> {
    let page = doc
        .get_dictionary(page_id)
        .map_err(|e| format!("cannot read page object: {}", e))?;
    let contents = match page.get(b"Contents") {
        Ok(contents) => resolve(doc, contents),
        Err(_) => return Ok(Vec::new()),
    };
    let entries: Vec<&Object> = match contents {
        Object::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    let mut data = Vec::new();
    for entry in entries {
        let stream = match entry {
            Object::Reference(id) => doc.get_object(*id).and_then(Object::as_stream),
            other => other.as_stream(),
        }
        .map_err(|e| format!("content stream unavailable: {}", e))?;
        let bytes = if stream.dict.has(b"Filter") {
            stream
                .decompressed_content()
                .map_err(|e| format!("cannot decompress content stream: {}", e))?
        } else {
            stream.content.clone()
        };
        data.extend_from_slice(&bytes);
        data.push(b'\n');
    }
    Ok(data)
}

/// Find the page's `/Resources`, following `/Parent` inheritance.
fn page_resources(doc: &Document, page_id: ObjectId) -> Option<&Dictionary> {
    let mut node = doc.get_dictionary(page_id).ok();
    // Bounded walk up the page tree
    for _ in 0..32 {
        let dict = node?;
        if let Ok(res) = dict.get(b"Resources") {
            return resolve(doc, res).as_dict().ok();
        }
        node = dict
            .get(b"Parent")
            .ok()
            .map(|p| resolve(doc, p))
            .and_then(|p| p.as_dict().ok());
    }
    None
}

/// A finished word and the baseline it was drawn on.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    /// Text and bounding box
    pub token: Token,
    /// User-space y of the first glyph's origin
    pub baseline: f32,
}

/// Order words into lines top to bottom, then left to right in each line.
///
/// Words whose baselines differ by at most [`LINE_TOLERANCE`] times the
/// smaller word height share a line. Ties keep content-stream order.
pub fn reading_order(mut words: Vec<PlacedWord>) -> Vec<Token> {
    words.sort_by(|a, b| safe_float_cmp(b.baseline, a.baseline));

    let mut lines: Vec<Vec<PlacedWord>> = Vec::new();
    for word in words {
        match lines.last_mut() {
            Some(line) if same_line(&line[0], &word) => line.push(word),
            _ => lines.push(vec![word]),
        }
    }

    lines
        .into_iter()
        .flat_map(|mut line| {
            line.sort_by(|a, b| safe_float_cmp(a.token.bbox.x0, b.token.bbox.x0));
            line.into_iter().map(|w| w.token)
        })
        .collect()
}

fn same_line(first: &PlacedWord, word: &PlacedWord) -> bool {
    let height = first.token.bbox.height().min(word.token.bbox.height());
    (first.baseline - word.baseline).abs() <= LINE_TOLERANCE * height
}

fn operand(ops: &[Object], i: usize) -> f32 {
    ops.get(i)
        .and_then(|o| o.as_float().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn operand_matrix(ops: &[Object]) -> Matrix {
    Matrix::new(
        operand(ops, 0),
        operand(ops, 1),
        operand(ops, 2),
        operand(ops, 3),
        operand(ops, 4),
        operand(ops, 5),
    )
}

/// Word being assembled from consecutive glyphs.
#[derive(Debug)]
struct PendingWord {
    text: String,
    bbox: Rect,
    baseline: f32,
    /// Pen position after the last glyph
    end: Point,
    /// Unit vector along the baseline
    direction: (f32, f32),
    /// Larger extent of the last glyph
    glyph_size: f32,
}

impl PendingWord {
    /// Whether a glyph drawn at `origin` continues this word.
    fn continues_at(&self, origin: Point) -> bool {
        let (dx, dy) = (origin.x - self.end.x, origin.y - self.end.y);
        let (ux, uy) = self.direction;
        let gap = dx * ux + dy * uy;
        let drift = (dy * ux - dx * uy).abs();
        gap <= WORD_MARGIN * self.glyph_size
            && gap >= -self.glyph_size
            && drift <= self.glyph_size / 2.0
    }
}

/// One placed glyph, in user space.
struct Glyph {
    origin: Point,
    end: Point,
    bbox: Rect,
    height: f32,
}

/// Content stream walker that collects words.
pub struct WordExtractor<'a> {
    doc: &'a Document,
    fonts: HashMap<(usize, Vec<u8>), Rc<FontInfo>>,
    state: GraphicsStateStack,
    pending: Option<PendingWord>,
    words: Vec<PlacedWord>,
}

impl<'a> WordExtractor<'a> {
    /// Create an extractor for pages of `doc`.
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            fonts: HashMap::new(),
            state: GraphicsStateStack::new(),
            pending: None,
            words: Vec::new(),
        }
    }

    /// Execute `operations` with the given resource dictionary.
    pub fn run(&mut self, operations: &[Operation], resources: Option<&'a Dictionary>, depth: u32) {
        for op in operations {
            self.execute(op, resources, depth);
        }
    }

    /// Flush the last word and return everything collected, in drawing order.
    pub fn finish(mut self) -> Vec<PlacedWord> {
        self.end_word();
        self.words
    }

    fn execute(&mut self, op: &Operation, resources: Option<&'a Dictionary>, depth: u32) {
        let ops = &op.operands;
        match op.operator.as_str() {
            "q" => self.state.save(),
            "Q" => self.state.restore(),
            "cm" => {
                let gs = self.state.current_mut();
                gs.ctm = operand_matrix(ops).multiply(&gs.ctm);
            },
            "BT" => self.state.current_mut().set_text_matrix(Matrix::identity()),
            "Tf" => {
                let gs = self.state.current_mut();
                gs.font_name = ops.first().and_then(|o| o.as_name().ok()).map(<[u8]>::to_vec);
                gs.font_size = operand(ops, 1);
            },
            "Tc" => self.state.current_mut().char_space = operand(ops, 0),
            "Tw" => self.state.current_mut().word_space = operand(ops, 0),
            "Tz" => self.state.current_mut().horizontal_scaling = operand(ops, 0),
            "TL" => self.state.current_mut().leading = operand(ops, 0),
            "Ts" => self.state.current_mut().text_rise = operand(ops, 0),
            "Td" => self
                .state
                .current_mut()
                .move_text_position(operand(ops, 0), operand(ops, 1)),
            "TD" => {
                let gs = self.state.current_mut();
                gs.leading = -operand(ops, 1);
                gs.move_text_position(operand(ops, 0), operand(ops, 1));
            },
            "Tm" => self.state.current_mut().set_text_matrix(operand_matrix(ops)),
            "T*" => self.state.current_mut().next_line(),
            "Tj" => {
                if let Some(bytes) = ops.first().and_then(|o| o.as_str().ok()) {
                    self.show(bytes, resources);
                }
            },
            "'" => {
                self.state.current_mut().next_line();
                if let Some(bytes) = ops.first().and_then(|o| o.as_str().ok()) {
                    self.show(bytes, resources);
                }
            },
            "\"" => {
                let gs = self.state.current_mut();
                gs.word_space = operand(ops, 0);
                gs.char_space = operand(ops, 1);
                gs.next_line();
                if let Some(bytes) = ops.get(2).and_then(|o| o.as_str().ok()) {
                    self.show(bytes, resources);
                }
            },
            "TJ" => {
                if let Some(items) = ops.first().and_then(|o| o.as_array().ok()) {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => self.show(bytes, resources),
                            other => {
                                if let Ok(adjust) = other.as_float() {
                                    self.kern(adjust);
                                }
                            },
                        }
                    }
                }
            },
            "Do" => {
                if let Some(name) = ops.first().and_then(|o| o.as_name().ok()) {
                    self.run_form(name, resources, depth);
                }
            },
            _ => {},
        }
    }

    /// Apply a `TJ` number: move left by `adjust` thousandths of an em.
    fn kern(&mut self, adjust: f32) {
        let gs = self.state.current_mut();
        let tx = -adjust / 1000.0 * gs.font_size * gs.horizontal_scaling / 100.0;
        gs.advance(tx);
    }

    fn font(&mut self, resources: Option<&'a Dictionary>) -> Rc<FontInfo> {
        let Some(name) = self.state.current().font_name.clone() else {
            return Rc::new(FontInfo::default());
        };
        // Fonts are keyed per resource dictionary: form XObjects may reuse names.
        let key = (resources.map_or(0, |r| r as *const Dictionary as usize), name);
        if let Some(font) = self.fonts.get(&key) {
            return Rc::clone(font);
        }

        let doc = self.doc;
        let font = resources
            .and_then(|r| r.get(b"Font").ok())
            .and_then(|f| resolve(doc, f).as_dict().ok())
            .and_then(|fonts| fonts.get(&key.1).ok())
            .and_then(|f| resolve(doc, f).as_dict().ok())
            .map(|font| FontInfo::from_dict(doc, font))
            .unwrap_or_else(|| {
                log::debug!("Font /{} not found, using default metrics", String::from_utf8_lossy(&key.1));
                FontInfo::default()
            });
        let font = Rc::new(font);
        self.fonts.insert(key, Rc::clone(&font));
        font
    }

    fn show(&mut self, bytes: &[u8], resources: Option<&'a Dictionary>) {
        let font = self.font(resources);
        for code in font.codes(bytes) {
            let text = font.decode(code);
            let gs = self.state.current();
            let size = gs.font_size;
            let scale = gs.horizontal_scaling / 100.0;
            let glyph_width = font.width(code) / 1000.0 * size * scale;

            if text.chars().all(char::is_whitespace) {
                if !text.is_empty() {
                    self.end_word();
                }
            } else {
                let glyph = self.place(&font, glyph_width);
                self.push_glyph(&text, glyph);
            }

            let gs = self.state.current_mut();
            let word_space = if !font.two_byte && code == 32 {
                gs.word_space
            } else {
                0.0
            };
            gs.advance((font.width(code) / 1000.0 * size + gs.char_space + word_space) * scale);
        }
    }

    /// Where a glyph of `glyph_width` lands at the current text position.
    fn place(&self, font: &FontInfo, glyph_width: f32) -> Glyph {
        let gs = self.state.current();
        let m = gs.text_to_user();
        let y0 = font.descent / 1000.0 * gs.font_size + gs.text_rise;
        let y1 = font.ascent / 1000.0 * gs.font_size + gs.text_rise;
        let corners = [
            m.transform_point(0.0, y0),
            m.transform_point(glyph_width, y0),
            m.transform_point(0.0, y1),
            m.transform_point(glyph_width, y1),
        ];
        let bbox = corners.iter().skip(1).fold(
            Rect::new(corners[0].x, corners[0].y, corners[0].x, corners[0].y),
            |r, p| r.union(&Rect::new(p.x, p.y, p.x, p.y)),
        );
        Glyph {
            origin: m.transform_point(0.0, 0.0),
            end: m.transform_point(glyph_width, 0.0),
            bbox,
            height: distance(corners[0], corners[2]),
        }
    }

    fn push_glyph(&mut self, text: &str, glyph: Glyph) {
        if let Some(pending) = &self.pending {
            if !pending.continues_at(glyph.origin) {
                self.end_word();
            }
        }

        let advance = distance(glyph.origin, glyph.end);
        let direction = if advance > f32::EPSILON {
            ((glyph.end.x - glyph.origin.x) / advance, (glyph.end.y - glyph.origin.y) / advance)
        } else {
            self.pending.as_ref().map_or((1.0, 0.0), |p| p.direction)
        };
        let glyph_size = advance.max(glyph.height);

        match &mut self.pending {
            Some(pending) => {
                pending.text.push_str(text);
                pending.bbox = pending.bbox.union(&glyph.bbox);
                pending.end = glyph.end;
                pending.direction = direction;
                pending.glyph_size = glyph_size;
            },
            None => {
                self.pending = Some(PendingWord {
                    text: text.to_string(),
                    bbox: glyph.bbox,
                    baseline: glyph.origin.y,
                    end: glyph.end,
                    direction,
                    glyph_size,
                });
            },
        }
    }

    fn end_word(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.words.push(PlacedWord {
                token: Token::new(pending.text, pending.bbox),
                baseline: pending.baseline,
            });
        }
    }

    /// Execute a form XObject in place.
    fn run_form(&mut self, name: &[u8], resources: Option<&'a Dictionary>, depth: u32) {
        if depth >= MAX_FORM_DEPTH {
            log::warn!("Form XObject nesting deeper than {}, skipping", MAX_FORM_DEPTH);
            return;
        }
        let doc = self.doc;
        let stream = resources
            .and_then(|r| r.get(b"XObject").ok())
            .and_then(|x| resolve(doc, x).as_dict().ok())
            .and_then(|x| x.get(name).ok())
            .map(|s| resolve(doc, s))
            .and_then(|s| s.as_stream().ok());
        let Some(stream) = stream else { return };
        let is_form = stream
            .dict
            .get(b"Subtype")
            .and_then(Object::as_name)
            .map(|s| s == b"Form")
            .unwrap_or(false);
        if !is_form {
            return;
        }

        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());
        let content = match Content::decode(&data) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Skipping undecodable form XObject: {}", e);
                return;
            },
        };
        let form_resources = stream
            .dict
            .get(b"Resources")
            .ok()
            .and_then(|r| resolve(doc, r).as_dict().ok())
            .or(resources);
        let form_matrix = stream
            .dict
            .get(b"Matrix")
            .and_then(Object::as_array)
            .map(|m| operand_matrix(m))
            .unwrap_or_default();

        self.state.save();
        {
            let gs = self.state.current_mut();
            gs.ctm = form_matrix.multiply(&gs.ctm);
        }
        self.run(&content.operations, form_resources, depth + 1);
        self.state.restore();
    }
}

fn distance(a: Point, b: Point) -> f32 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}
