//! Single-byte font encodings.
//!
//! A simple font maps each byte to a glyph through a base encoding, with a
//! `/Differences` array overriding individual codes by glyph name:
//!
//! ```text
//! /Encoding << /BaseEncoding /WinAnsiEncoding /Differences [1 /C /a /t 32 /space] >>
//! ```
//!
//! Glyph names are turned back into text via a table of the common Adobe
//! Glyph List names, `uniXXXX`/`uXXXX` forms and `_`-joined ligature names.

use lopdf::{Document, Object};
use std::borrow::Cow;
use std::collections::HashMap;

use super::resolve;

/// Named base encoding of a simple font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseEncoding {
    /// Windows-1252
    #[default]
    WinAnsi,
    /// Adobe StandardEncoding
    Standard,
}

impl BaseEncoding {
    fn from_name(name: &[u8]) -> Self {
        match name {
            b"StandardEncoding" => Self::Standard,
            b"WinAnsiEncoding" => Self::WinAnsi,
            other => {
                log::debug!(
                    "Encoding /{} read as WinAnsi",
                    String::from_utf8_lossy(other)
                );
                Self::WinAnsi
            },
        }
    }

    /// Character for `byte`.
    pub fn decode(self, byte: u8) -> char {
        match self {
            Self::WinAnsi => decode_winansi(byte),
            Self::Standard => decode_standard(byte),
        }
    }
}

/// A simple font's byte-to-text mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimpleEncoding {
    base: BaseEncoding,
    differences: HashMap<u8, String>,
}

impl SimpleEncoding {
    /// Read a font's `/Encoding` entry (a name or a dictionary).
    pub fn from_object(doc: &Document, obj: &Object) -> Self {
        match resolve(doc, obj) {
            Object::Name(name) => Self {
                base: BaseEncoding::from_name(name),
                differences: HashMap::new(),
            },
            Object::Dictionary(dict) => {
                let base = dict
                    .get(b"BaseEncoding")
                    .and_then(Object::as_name)
                    .map(BaseEncoding::from_name)
                    .unwrap_or_default();
                let differences = dict
                    .get(b"Differences")
                    .map(|d| resolve(doc, d))
                    .and_then(Object::as_array)
                    .map(|items| parse_differences(doc, items))
                    .unwrap_or_default();
                Self { base, differences }
            },
            _ => Self::default(),
        }
    }

    /// Text for `byte`.
    pub fn decode(&self, byte: u8) -> Cow<'_, str> {
        match self.differences.get(&byte) {
            Some(text) => Cow::Borrowed(text.as_str()),
            None => Cow::Owned(self.base.decode(byte).to_string()),
        }
    }
}

/// `[code /name /name ... code /name ...]`: names fill consecutive codes.
fn parse_differences(doc: &Document, items: &[Object]) -> HashMap<u8, String> {
    let mut differences = HashMap::new();
    let mut code: i64 = 0;
    for item in items {
        match resolve(doc, item) {
            Object::Integer(start) => code = *start,
            Object::Name(name) => {
                let name = String::from_utf8_lossy(name);
                match (u8::try_from(code), glyph_name_to_text(&name)) {
                    (Ok(byte), Some(text)) => {
                        differences.insert(byte, text);
                    },
                    (Ok(_), None) => log::debug!("Unknown glyph name /{} at code {}", name, code),
                    (Err(_), _) => log::debug!("Differences code {} out of range", code),
                }
                code += 1;
            },
            other => log::debug!("Unexpected /Differences entry: {:?}", other),
        }
    }
    differences
}

/// Common glyph names that are not a single letter.
const GLYPH_NAMES: &[(&str, &str)] = &[
    ("space", " "),
    ("nbspace", " "),
    ("nonbreakingspace", " "),
    ("exclam", "!"),
    ("quotedbl", "\""),
    ("numbersign", "#"),
    ("dollar", "$"),
    ("percent", "%"),
    ("ampersand", "&"),
    ("quotesingle", "'"),
    ("quoteright", "\u{2019}"),
    ("quoteleft", "\u{2018}"),
    ("quotedblleft", "\u{201C}"),
    ("quotedblright", "\u{201D}"),
    ("quotesinglbase", "\u{201A}"),
    ("quotedblbase", "\u{201E}"),
    ("guillemotleft", "\u{AB}"),
    ("guillemotright", "\u{BB}"),
    ("guilsinglleft", "\u{2039}"),
    ("guilsinglright", "\u{203A}"),
    ("parenleft", "("),
    ("parenright", ")"),
    ("asterisk", "*"),
    ("plus", "+"),
    ("comma", ","),
    ("hyphen", "-"),
    ("minus", "\u{2212}"),
    ("endash", "\u{2013}"),
    ("emdash", "\u{2014}"),
    ("period", "."),
    ("ellipsis", "\u{2026}"),
    ("slash", "/"),
    ("zero", "0"),
    ("one", "1"),
    ("two", "2"),
    ("three", "3"),
    ("four", "4"),
    ("five", "5"),
    ("six", "6"),
    ("seven", "7"),
    ("eight", "8"),
    ("nine", "9"),
    ("colon", ":"),
    ("semicolon", ";"),
    ("less", "<"),
    ("equal", "="),
    ("greater", ">"),
    ("question", "?"),
    ("questiondown", "\u{BF}"),
    ("exclamdown", "\u{A1}"),
    ("at", "@"),
    ("bracketleft", "["),
    ("backslash", "\\"),
    ("bracketright", "]"),
    ("asciicircum", "^"),
    ("underscore", "_"),
    ("grave", "`"),
    ("acute", "\u{B4}"),
    ("braceleft", "{"),
    ("bar", "|"),
    ("braceright", "}"),
    ("asciitilde", "~"),
    ("bullet", "\u{2022}"),
    ("periodcentered", "\u{B7}"),
    ("dagger", "\u{2020}"),
    ("daggerdbl", "\u{2021}"),
    ("section", "\u{A7}"),
    ("paragraph", "\u{B6}"),
    ("copyright", "\u{A9}"),
    ("registered", "\u{AE}"),
    ("trademark", "\u{2122}"),
    ("degree", "\u{B0}"),
    ("plusminus", "\u{B1}"),
    ("multiply", "\u{D7}"),
    ("divide", "\u{F7}"),
    ("fraction", "\u{2044}"),
    ("perthousand", "\u{2030}"),
    ("Euro", "\u{20AC}"),
    ("sterling", "\u{A3}"),
    ("yen", "\u{A5}"),
    ("cent", "\u{A2}"),
    ("currency", "\u{A4}"),
    ("florin", "\u{192}"),
    ("ordfeminine", "\u{AA}"),
    ("ordmasculine", "\u{BA}"),
    ("germandbls", "\u{DF}"),
    ("dotlessi", "\u{131}"),
    ("ae", "\u{E6}"),
    ("AE", "\u{C6}"),
    ("oe", "\u{153}"),
    ("OE", "\u{152}"),
    ("oslash", "\u{F8}"),
    ("Oslash", "\u{D8}"),
    ("lslash", "\u{142}"),
    ("Lslash", "\u{141}"),
    ("eth", "\u{F0}"),
    ("Eth", "\u{D0}"),
    ("thorn", "\u{FE}"),
    ("Thorn", "\u{DE}"),
    ("ff", "ff"),
    ("fi", "fi"),
    ("fl", "fl"),
    ("ffi", "ffi"),
    ("ffl", "ffl"),
];

/// Accent suffix, base letters, and the composed letters in the same order.
const ACCENTED: &[(&str, &str, &str)] = &[
    ("grave", "AEIOUaeiou", "ÀÈÌÒÙàèìòù"),
    ("acute", "AEIOUYaeiouy", "ÁÉÍÓÚÝáéíóúý"),
    ("circumflex", "AEIOUaeiou", "ÂÊÎÔÛâêîôû"),
    ("dieresis", "AEIOUYaeiouy", "ÄËÏÖÜŸäëïöüÿ"),
    ("tilde", "ANOano", "ÃÑÕãñõ"),
    ("ring", "Aa", "Åå"),
    ("cedilla", "Cc", "Çç"),
    ("caron", "SZsz", "ŠŽšž"),
];

/// Text for a glyph name, if it is recognised.
///
/// # Examples
///
/// ```
/// use pdf_highlighter::fonts::glyph_name_to_text;
///
/// assert_eq!(glyph_name_to_text("C").as_deref(), Some("C"));
/// assert_eq!(glyph_name_to_text("eacute").as_deref(), Some("é"));
/// assert_eq!(glyph_name_to_text("f_f_i").as_deref(), Some("ffi"));
/// assert_eq!(glyph_name_to_text("uni0041").as_deref(), Some("A"));
/// ```
pub fn glyph_name_to_text(name: &str) -> Option<String> {
    // Suffixes like ".sc" or ".alt" name variants of the same character
    let name = name.split('.').next().unwrap_or(name);
    if name.is_empty() {
        return None;
    }
    if name.contains('_') {
        let parts: Option<Vec<String>> = name.split('_').map(glyph_name_to_text).collect();
        return parts.map(|p| p.concat());
    }

    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            return Some(c.to_string());
        }
    }
    if let Some((_, text)) = GLYPH_NAMES.iter().find(|(n, _)| *n == name) {
        return Some((*text).to_string());
    }
    if let Some(c) = accented_letter(name) {
        return Some(c.to_string());
    }
    if let Some(hex) = name.strip_prefix("uni") {
        // uniXXXX, possibly several code points in a row
        if !hex.is_empty() && hex.len() % 4 == 0 {
            let text: Option<String> = hex
                .as_bytes()
                .chunks(4)
                .map(|c| {
                    std::str::from_utf8(c)
                        .ok()
                        .and_then(|s| u32::from_str_radix(s, 16).ok())
                        .and_then(char::from_u32)
                })
                .collect();
            if text.is_some() {
                return text;
            }
        }
    }
    if let Some(hex) = name.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return u32::from_str_radix(hex, 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from);
        }
    }
    None
}

fn accented_letter(name: &str) -> Option<char> {
    ACCENTED.iter().find_map(|(accent, bases, composed)| {
        let base = name.strip_suffix(accent)?;
        let mut chars = base.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return None;
        };
        let index = bases.chars().position(|b| b == c)?;
        composed.chars().nth(index)
    })
}

/// Whether `text` holds a Latin presentation-form ligature.
pub fn has_ligatures(text: &str) -> bool {
    text.chars().any(|c| ('\u{FB00}'..='\u{FB06}').contains(&c))
}

/// Spell out Latin presentation-form ligatures (U+FB00..U+FB06).
pub fn expand_ligatures(text: &str) -> Cow<'_, str> {
    if !has_ligatures(text) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        match c {
            '\u{FB00}' => out.push_str("ff"),
            '\u{FB01}' => out.push_str("fi"),
            '\u{FB02}' => out.push_str("fl"),
            '\u{FB03}' => out.push_str("ffi"),
            '\u{FB04}' => out.push_str("ffl"),
            '\u{FB05}' | '\u{FB06}' => out.push_str("st"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// WinAnsi (Windows-1252) byte to Unicode.
///
/// Identical to Latin-1 except for the 0x80-0x9F range.
pub fn decode_winansi(byte: u8) -> char {
    let codepoint = match byte {
        0x80 => 0x20AC, // Euro sign
        0x82 => 0x201A, // Single low-9 quotation mark
        0x83 => 0x0192, // Latin small letter f with hook
        0x84 => 0x201E, // Double low-9 quotation mark
        0x85 => 0x2026, // Horizontal ellipsis
        0x86 => 0x2020, // Dagger
        0x87 => 0x2021, // Double dagger
        0x88 => 0x02C6, // Modifier letter circumflex accent
        0x89 => 0x2030, // Per mille sign
        0x8A => 0x0160, // Latin capital letter S with caron
        0x8B => 0x2039, // Single left-pointing angle quotation mark
        0x8C => 0x0152, // Latin capital ligature OE
        0x8E => 0x017D, // Latin capital letter Z with caron
        0x91 => 0x2018, // Left single quotation mark
        0x92 => 0x2019, // Right single quotation mark
        0x93 => 0x201C, // Left double quotation mark
        0x94 => 0x201D, // Right double quotation mark
        0x95 => 0x2022, // Bullet
        0x96 => 0x2013, // En dash
        0x97 => 0x2014, // Em dash
        0x98 => 0x02DC, // Small tilde
        0x99 => 0x2122, // Trade mark sign
        0x9A => 0x0161, // Latin small letter s with caron
        0x9B => 0x203A, // Single right-pointing angle quotation mark
        0x9C => 0x0153, // Latin small ligature oe
        0x9E => 0x017E, // Latin small letter z with caron
        0x9F => 0x0178, // Latin capital letter Y with diaeresis
        b => b as u32,
    };
    char::from_u32(codepoint).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Adobe StandardEncoding byte to Unicode.
///
/// ASCII except for the quote glyphs at 0x27 and 0x60; the upper half
/// holds punctuation, accents and a few letters.
pub fn decode_standard(byte: u8) -> char {
    let codepoint = match byte {
        0x27 => 0x2019,
        0x60 => 0x2018,
        0x20..=0x7E => byte as u32,
        0xA1 => 0x00A1,
        0xA2 => 0x00A2,
        0xA3 => 0x00A3,
        0xA4 => 0x2044,
        0xA5 => 0x00A5,
        0xA6 => 0x0192,
        0xA7 => 0x00A7,
        0xA8 => 0x00A4,
        0xA9 => 0x0027,
        0xAA => 0x201C,
        0xAB => 0x00AB,
        0xAC => 0x2039,
        0xAD => 0x203A,
        0xAE => 0xFB01,
        0xAF => 0xFB02,
        0xB1 => 0x2013,
        0xB2 => 0x2020,
        0xB3 => 0x2021,
        0xB4 => 0x00B7,
        0xB6 => 0x00B6,
        0xB7 => 0x2022,
        0xB8 => 0x201A,
        0xB9 => 0x201E,
        0xBA => 0x201D,
        0xBB => 0x00BB,
        0xBC => 0x2026,
        0xBD => 0x2030,
        0xBF => 0x00BF,
        0xC1 => 0x0060,
        0xC2 => 0x00B4,
        0xC3 => 0x02C6,
        0xC4 => 0x02DC,
        0xC5 => 0x00AF,
        0xC6 => 0x02D8,
        0xC7 => 0x02D9,
        0xC8 => 0x00A8,
        0xCA => 0x02DA,
        0xCB => 0x00B8,
        0xCD => 0x02DD,
        0xCE => 0x02DB,
        0xCF => 0x02C7,
        0xD0 => 0x2014,
        0xE1 => 0x00C6,
        0xE3 => 0x00AA,
        0xE8 => 0x0141,
        0xE9 => 0x00D8,
        0xEA => 0x0152,
        0xEB => 0x00BA,
        0xF1 => 0x00E6,
        0xF5 => 0x0131,
        0xF8 => 0x0142,
        0xF9 => 0x00F8,
        0xFA => 0x0153,
        0xFB => 0x00DF,
        _ => 0xFFFD,
    };
    char::from_u32(codepoint).unwrap_or(char::REPLACEMENT_CHARACTER)
}
