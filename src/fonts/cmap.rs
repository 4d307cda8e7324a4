//! ToUnicode CMap parser.
//!
//! A ToUnicode stream maps character codes to the text they stand for.
//! Only the `bfchar` and `bfrange` sections carry mappings:
//!
//! ```text
//! beginbfchar
//! <0003> <0020>
//! <0024> <00660069>        % one code, two characters ("fi")
//! endbfchar
//! beginbfrange
//! <0041> <005A> <0041>     % consecutive codes, consecutive targets
//! <005F> <0061> [<0066> <0067> <0068>]
//! endbfrange
//! ```
//!
//! Targets are UTF-16BE, so surrogate pairs and multi-character strings
//! decode naturally.

use std::collections::HashMap;

/// Character code to Unicode text.
pub type CMap = HashMap<u32, String>;

/// Longest `bfrange` expanded, in codes.
const MAX_RANGE: u32 = 0xFFFF;

#[derive(Debug, Clone, PartialEq)]
enum CMapToken<'a> {
    Hex(&'a str),
    ArrayStart,
    ArrayEnd,
}

/// Parse a decompressed ToUnicode stream. Malformed entries are skipped.
///
/// # Examples
///
/// ```
/// use pdf_highlighter::fonts::parse_tounicode_cmap;
///
/// let cmap = parse_tounicode_cmap(b"beginbfchar\n<01> <0043>\nendbfchar");
/// assert_eq!(cmap.get(&1).map(String::as_str), Some("C"));
/// ```
pub fn parse_tounicode_cmap(data: &[u8]) -> CMap {
    let content = String::from_utf8_lossy(data);
    let mut cmap = CMap::new();

    for section in extract_sections(&content, "beginbfchar", "endbfchar") {
        let tokens = tokenize(section);
        for pair in tokens.chunks_exact(2) {
            if let [CMapToken::Hex(src), CMapToken::Hex(dst)] = pair {
                if let (Some(code), Some(text)) = (parse_code(src), utf16_hex(dst)) {
                    cmap.insert(code, text);
                }
            }
        }
    }

    for section in extract_sections(&content, "beginbfrange", "endbfrange") {
        let tokens = tokenize(section);
        let mut i = 0;
        while i + 2 < tokens.len() {
            let (CMapToken::Hex(lo), CMapToken::Hex(hi)) = (&tokens[i], &tokens[i + 1]) else {
                i += 1;
                continue;
            };
            let (Some(lo), Some(hi)) = (parse_code(lo), parse_code(hi)) else {
                i += 2;
                continue;
            };
            let valid = hi >= lo && hi - lo <= MAX_RANGE;
            if !valid {
                log::debug!("Skipping bfrange <{:X}> <{:X}>", lo, hi);
            }

            match &tokens[i + 2] {
                CMapToken::Hex(dst) => {
                    if valid {
                        insert_sequential(&mut cmap, lo, hi, dst);
                    }
                    i += 3;
                },
                CMapToken::ArrayStart => {
                    let mut j = i + 3;
                    let mut code = lo;
                    while let Some(CMapToken::Hex(dst)) = tokens.get(j) {
                        if valid && code <= hi {
                            if let Some(text) = utf16_hex(dst) {
                                cmap.insert(code, text);
                            }
                        }
                        code = code.saturating_add(1);
                        j += 1;
                    }
                    // Skip the closing bracket
                    i = j + 1;
                },
                CMapToken::ArrayEnd => i += 3,
            }
        }
    }

    log::trace!("ToUnicode CMap with {} mappings", cmap.len());
    cmap
}

/// `<lo> <hi> <dst>`: the last UTF-16 unit of `dst` counts up with the code.
fn insert_sequential(cmap: &mut CMap, lo: u32, hi: u32, dst: &str) {
    let Some(mut units) = utf16_units(dst) else {
        return;
    };
    let Some(last) = units.last().copied() else {
        return;
    };
    for offset in 0..=(hi - lo) {
        let Some(unit) = u16::try_from(last as u32 + offset).ok() else {
            break;
        };
        if let Some(slot) = units.last_mut() {
            *slot = unit;
        }
        cmap.insert(lo + offset, String::from_utf16_lossy(&units));
    }
}

/// Text between each `begin` marker and the following `end` marker.
fn extract_sections<'a>(content: &'a str, begin: &str, end: &str) -> Vec<&'a str> {
    let mut sections = Vec::new();
    let mut remaining = content;

    while let Some(begin_pos) = remaining.find(begin) {
        let after_begin = &remaining[begin_pos + begin.len()..];
        match after_begin.find(end) {
            Some(end_pos) => {
                sections.push(&after_begin[..end_pos]);
                remaining = &after_begin[end_pos + end.len()..];
            },
            None => break,
        }
    }

    sections
}

/// Hex strings and array brackets of a section; comments are dropped.
fn tokenize(section: &str) -> Vec<CMapToken<'_>> {
    let mut tokens = Vec::new();
    for line in section.lines() {
        let line = line.split('%').next().unwrap_or("");
        let mut rest = line;
        while let Some(pos) = rest.find(&['<', '[', ']'][..]) {
            let tail = &rest[pos..];
            match tail.as_bytes()[0] {
                b'[' => {
                    tokens.push(CMapToken::ArrayStart);
                    rest = &tail[1..];
                },
                b']' => {
                    tokens.push(CMapToken::ArrayEnd);
                    rest = &tail[1..];
                },
                _ => match tail.find('>') {
                    Some(close) => {
                        tokens.push(CMapToken::Hex(&tail[1..close]));
                        rest = &tail[close + 1..];
                    },
                    None => break,
                },
            }
        }
    }
    tokens
}

fn parse_code(hex: &str) -> Option<u32> {
    let hex: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    if hex.is_empty() || hex.len() > 8 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(&hex, 16).ok()
}

fn utf16_units(hex: &str) -> Option<Vec<u16>> {
    let hex: Vec<u8> = hex.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if hex.is_empty() || !hex.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    // Odd-length targets are padded on the left
    let padded: Vec<u8> = if hex.len() % 4 == 0 {
        hex
    } else {
        let pad = 4 - hex.len() % 4;
        std::iter::repeat(b'0').take(pad).chain(hex).collect()
    };
    padded
        .chunks(4)
        .map(|unit| std::str::from_utf8(unit).ok().and_then(|s| u16::from_str_radix(s, 16).ok()))
        .collect()
}

fn utf16_hex(hex: &str) -> Option<String> {
    utf16_units(hex).map(|units| String::from_utf16_lossy(&units))
}
