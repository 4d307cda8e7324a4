//! Token runs to highlight rectangles.
//!
//! A run that sits on one visual line becomes a single rectangle covering
//! every token. A run that wraps keeps one rectangle per token, because a
//! box spanning several lines would also cover text outside the phrase.
//!
//! Lines are identified by exact equality of each token's lower edge
//! (`bbox.y0`). Tokens from one layout pass share that value exactly when
//! they are co-linear, so no tolerance is applied.

use crate::geometry::Rect;
use crate::search::TokenRunMatch;
use crate::utils::safe_float_cmp;

/// One rectangle to draw for a match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightRegion {
    /// Area to highlight
    pub rect: Rect,
    /// Index of the region's line within the run, ordered by vertical origin
    pub line_cluster: usize,
}

fn same_line(a: f32, b: f32) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Distinct vertical origins in ascending order.
///
/// # Examples
///
/// ```
/// use pdf_highlighter::highlight::line_clusters;
///
/// assert_eq!(line_clusters([140.0, 100.0, 140.0]), vec![100.0, 140.0]);
/// ```
pub fn line_clusters<I>(origins: I) -> Vec<f32>
where
    I: IntoIterator<Item = f32>,
{
    let mut values: Vec<f32> = origins.into_iter().collect();
    values.sort_by(|a, b| safe_float_cmp(*a, *b));
    values.dedup_by(|a, b| same_line(*a, *b));
    values
}

/// Compute the highlight regions for a matched run.
pub fn merge(run: &TokenRunMatch<'_>) -> Vec<HighlightRegion> {
    let clusters = line_clusters(run.tokens.iter().map(|t| t.bbox.y0));

    match clusters.len() {
        0 => Vec::new(),
        1 => Rect::envelope(run.tokens.iter().map(|t| &t.bbox))
            .map(|rect| HighlightRegion {
                rect,
                line_cluster: 0,
            })
            .into_iter()
            .collect(),
        _ => run
            .tokens
            .iter()
            .map(|t| HighlightRegion {
                rect: t.bbox,
                line_cluster: clusters
                    .iter()
                    .position(|&y| same_line(y, t.bbox.y0))
                    .unwrap_or(0),
            })
            .collect(),
    }
}
