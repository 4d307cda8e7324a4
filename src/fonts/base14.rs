//! Metrics of the standard 14 fonts.
//!
//! PDFs that use a standard font without embedding it usually omit
//! `/Widths`, so advance widths come from the fonts' AFM files. Widths are
//! in 1000ths of an em and cover printable ASCII (`' '..='~'`).

/// Printable ASCII widths, indexed by `ch as usize - 32`.
type AsciiWidths = [u16; 95];

const HELVETICA: AsciiWidths = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

const HELVETICA_BOLD: AsciiWidths = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const TIMES_ROMAN: AsciiWidths = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

const TIMES_BOLD: AsciiWidths = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

const TIMES_ITALIC: AsciiWidths = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 675, 675, 675, 500,
    920, 611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833, 667, 722,
    611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556, 389, 278, 389, 422, 500,
    333, 500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722, 500, 500,
    500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389, 400, 275, 400, 541,
];

const TIMES_BOLD_ITALIC: AsciiWidths = [
    250, 389, 555, 500, 500, 833, 778, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    832, 667, 667, 667, 722, 667, 667, 722, 778, 389, 500, 667, 611, 889, 722, 722,
    611, 722, 667, 556, 611, 722, 667, 889, 667, 611, 611, 333, 278, 333, 570, 500,
    333, 500, 500, 444, 500, 444, 333, 500, 556, 278, 278, 500, 278, 778, 556, 500,
    500, 500, 389, 389, 278, 556, 444, 667, 500, 444, 389, 348, 220, 348, 570,
];

const COURIER: AsciiWidths = [600; 95];

/// One of the standard fonts, after resolving common aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base14 {
    Helvetica,
    HelveticaBold,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
}

impl Base14 {
    /// Identify a standard font by its `/BaseFont` name.
    ///
    /// Subset prefixes (`ABCDEF+`) are ignored, and the usual Windows
    /// substitutes (Arial, Times New Roman, Courier New) map to the
    /// standard font with the same metrics.
    pub fn from_base_font(name: &str) -> Option<Self> {
        let name = match name.split_once('+') {
            Some((prefix, rest)) if prefix.len() == 6 => rest,
            _ => name,
        };
        let compact: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | ',' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        let bold = compact.contains("bold");
        let italic = compact.contains("italic") || compact.contains("oblique");

        if compact.starts_with("helvetica") || compact.starts_with("arial") {
            Some(if bold { Self::HelveticaBold } else { Self::Helvetica })
        } else if compact.starts_with("times") {
            Some(match (bold, italic) {
                (true, true) => Self::TimesBoldItalic,
                (true, false) => Self::TimesBold,
                (false, true) => Self::TimesItalic,
                (false, false) => Self::TimesRoman,
            })
        } else if compact.starts_with("courier") {
            Some(if bold { Self::CourierBold } else { Self::Courier })
        } else {
            None
        }
    }

    /// Advance width of `ch`, for printable ASCII only.
    pub fn width(self, ch: char) -> Option<f32> {
        let table = match self {
            Self::Helvetica => &HELVETICA,
            Self::HelveticaBold => &HELVETICA_BOLD,
            Self::TimesRoman => &TIMES_ROMAN,
            Self::TimesBold => &TIMES_BOLD,
            Self::TimesItalic => &TIMES_ITALIC,
            Self::TimesBoldItalic => &TIMES_BOLD_ITALIC,
            Self::Courier | Self::CourierBold => &COURIER,
        };
        let index = (ch as usize).checked_sub(32)?;
        table.get(index).map(|w| *w as f32)
    }

    /// Ascender and descender, in 1000ths of an em.
    pub fn vertical_metrics(self) -> (f32, f32) {
        match self {
            Self::Helvetica | Self::HelveticaBold => (718.0, -207.0),
            Self::TimesRoman | Self::TimesItalic => (683.0, -217.0),
            Self::TimesBold | Self::TimesBoldItalic => (676.0, -205.0),
            Self::Courier => (629.0, -157.0),
            Self::CourierBold => (626.0, -142.0),
        }
    }

    /// Width for characters outside the ASCII table.
    pub fn fallback_width(self) -> f32 {
        match self {
            Self::Courier | Self::CourierBold => 600.0,
            _ => super::DEFAULT_GLYPH_WIDTH,
        }
    }
}
