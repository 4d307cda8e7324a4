//! Highlight colors and their assignment to phrases.
//!
//! Every phrase gets a color chosen by its position in the request. The
//! caller may supply a list of color names that takes precedence over the
//! default palette; both lists are indexed cyclically so any number of
//! phrases can be colored.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An RGB color with components in `0.0..=1.0`.
///
/// Serialized as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Rgb {
    /// Red component
    pub r: f32,
    /// Green component
    pub g: f32,
    /// Blue component
    pub b: f32,
}

impl Rgb {
    /// Fallback color for unknown names and empty palettes.
    pub const YELLOW: Rgb = Rgb {
        r: 1.0,
        g: 1.0,
        b: 0.0,
    };

    /// Create a color, clamping each component into `0.0..=1.0`.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Parse a `#RRGGBB` (or `RRGGBB`) hex string.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_highlighter::color::Rgb;
    ///
    /// assert_eq!(Rgb::from_hex("#FF0000"), Some(Rgb::new(1.0, 0.0, 0.0)));
    /// assert_eq!(Rgb::from_hex("nope"), None);
    /// ```
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::from_bytes(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Create a color from 8-bit components.
    pub fn from_bytes(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Components as `[r, g, b]`.
    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(v: [f32; 3]) -> Self {
        Rgb::new(v[0], v[1], v[2])
    }
}

impl From<Rgb> for [f32; 3] {
    fn from(c: Rgb) -> Self {
        c.to_array()
    }
}

/// Named color table.
///
/// Insertion order is the default cycling order.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: IndexMap<String, Rgb>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_entries([
            ("yellow", Rgb::YELLOW),
            ("green", Rgb::new(0.0, 1.0, 0.0)),
            ("blue", Rgb::new(0.0, 0.6, 1.0)),
            ("pink", Rgb::new(1.0, 0.6, 0.8)),
            ("orange", Rgb::new(1.0, 0.65, 0.0)),
            ("purple", Rgb::new(0.7, 0.5, 1.0)),
            ("cyan", Rgb::new(0.0, 1.0, 1.0)),
            ("red", Rgb::new(1.0, 0.0, 0.0)),
        ])
    }
}

impl Palette {
    /// Build a palette from `(name, color)` pairs. Names are matched
    /// case-insensitively.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Rgb)>,
    {
        Self {
            colors: entries
                .into_iter()
                .map(|(name, rgb)| (name.to_ascii_lowercase(), rgb))
                .collect(),
        }
    }

    /// Number of named colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no colors.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Look up a color by name.
    pub fn get(&self, name: &str) -> Option<Rgb> {
        self.colors.get(&name.trim().to_ascii_lowercase()).copied()
    }

    /// Resolve a color name or `#RRGGBB` hex string.
    pub fn resolve(&self, name: &str) -> Result<Rgb> {
        self.get(name)
            .or_else(|| Rgb::from_hex(name.trim()))
            .ok_or_else(|| Error::UnrecognizedColor(name.trim().to_string()))
    }

    /// Resolve a color name, falling back to [`Rgb::YELLOW`].
    pub fn resolve_or_fallback(&self, name: &str) -> Rgb {
        match self.resolve(name) {
            Ok(rgb) => rgb,
            Err(e) => {
                log::warn!("{}, using yellow", e);
                Rgb::YELLOW
            },
        }
    }

    /// Colors in cycling order.
    pub fn colors(&self) -> Vec<Rgb> {
        self.colors.values().copied().collect()
    }

    /// Color names in cycling order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.colors.keys().map(String::as_str)
    }
}

/// Pick the color for the phrase at `group_index`.
///
/// A non-empty `override_colors` wins over `palette`; either list is
/// indexed by `group_index` modulo its length. An empty palette with no
/// override yields [`Rgb::YELLOW`].
///
/// # Examples
///
/// ```
/// use pdf_highlighter::color::{color_for, Rgb};
///
/// let palette = [Rgb::new(1.0, 0.0, 0.0), Rgb::new(0.0, 0.0, 1.0)];
/// assert_eq!(color_for(0, &palette, None), palette[0]);
/// assert_eq!(color_for(3, &palette, None), palette[1]);
/// ```
pub fn color_for(group_index: usize, palette: &[Rgb], override_colors: Option<&[Rgb]>) -> Rgb {
    let colors = match override_colors {
        Some(colors) if !colors.is_empty() => colors,
        _ => palette,
    };
    if colors.is_empty() {
        return Rgb::YELLOW;
    }
    colors[group_index % colors.len()]
}

/// Split a delimited list of color names, dropping empty entries.
pub fn parse_color_list(input: &str, delimiter: char) -> Vec<String> {
    input
        .split(delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolved colors for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorAssigner {
    palette: Vec<Rgb>,
    overrides: Vec<Rgb>,
}

impl ColorAssigner {
    /// Resolve `override_names` against `palette`. Unknown names become
    /// yellow rather than failing.
    pub fn new(palette: &Palette, override_names: &[String]) -> Self {
        Self {
            palette: palette.colors(),
            overrides: override_names
                .iter()
                .map(|name| palette.resolve_or_fallback(name))
                .collect(),
        }
    }

    /// Color for the phrase at `group_index`.
    pub fn color_for(&self, group_index: usize) -> Rgb {
        color_for(group_index, &self.palette, Some(&self.overrides))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_clamps() {
        let c = Rgb::new(1.5, -0.2, 0.5);
        assert_eq!(c, Rgb::new(1.0, 0.0, 0.5));
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgb::from_hex("00ff00"), Some(Rgb::new(0.0, 1.0, 0.0)));
        assert_eq!(Rgb::from_hex("#FFFF00"), Some(Rgb::YELLOW));
        assert_eq!(Rgb::from_hex("#FFF"), None);
        assert_eq!(Rgb::from_hex("#GG0000"), None);
        // from_str_radix alone would accept a sign
        assert_eq!(Rgb::from_hex("#+F+F+F"), None);
        assert_eq!(Rgb::from_hex("-1-1-1"), None);
    }

    #[test]
    fn test_palette_lookup_is_case_insensitive() {
        let palette = Palette::default();
        assert_eq!(palette.get("Yellow"), Some(Rgb::YELLOW));
        assert_eq!(palette.get(" RED "), Some(Rgb::new(1.0, 0.0, 0.0)));
        assert_eq!(palette.get("mauve"), None);
    }

    #[test]
    fn test_resolve_unknown_color() {
        let palette = Palette::default();
        match palette.resolve("mauve") {
            Err(Error::UnrecognizedColor(name)) => assert_eq!(name, "mauve"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(palette.resolve_or_fallback("mauve"), Rgb::YELLOW);
        assert_eq!(palette.resolve("#0000FF").unwrap(), Rgb::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_default_palette_order() {
        let palette = Palette::default();
        let names: Vec<&str> = palette.names().collect();
        assert_eq!(names[0], "yellow");
        assert_eq!(names[1], "green");
        assert_eq!(palette.len(), 8);
    }

    #[test]
    fn test_color_for_cycles_palette() {
        let palette = Palette::default().colors();
        for i in 0..palette.len() * 3 {
            assert_eq!(color_for(i, &palette, None), palette[i % palette.len()]);
        }
    }

    #[test]
    fn test_override_wins_and_cycles() {
        let palette = Palette::default().colors();
        let overrides = [Rgb::new(1.0, 0.0, 0.0), Rgb::new(0.0, 0.0, 1.0)];
        assert_eq!(color_for(0, &palette, Some(&overrides)), overrides[0]);
        assert_eq!(color_for(1, &palette, Some(&overrides)), overrides[1]);
        assert_eq!(color_for(2, &palette, Some(&overrides)), overrides[0]);
    }

    #[test]
    fn test_empty_override_uses_palette() {
        let palette = Palette::default().colors();
        assert_eq!(color_for(1, &palette, Some(&[])), palette[1]);
        assert_eq!(color_for(7, &[], None), Rgb::YELLOW);
    }

    #[test]
    fn test_parse_color_list() {
        assert_eq!(parse_color_list(" red, blue ,,green ", ','), vec!["red", "blue", "green"]);
        assert!(parse_color_list("  ", ',').is_empty());
    }

    #[test]
    fn test_assigner_unknown_name_falls_back() {
        let assigner = ColorAssigner::new(
            &Palette::default(),
            &["red".to_string(), "not-a-color".to_string()],
        );
        assert_eq!(assigner.color_for(0), Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(assigner.color_for(1), Rgb::YELLOW);
        assert_eq!(assigner.color_for(2), Rgb::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_rgb_serializes_as_array() {
        let json = serde_json::to_string(&Rgb::YELLOW).unwrap();
        assert_eq!(json, "[1.0,1.0,0.0]");
    }
}
