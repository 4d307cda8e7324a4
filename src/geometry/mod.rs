//! Geometric primitives for highlight regions.
//!
//! Rectangles are stored by their corners `(x0, y0, x1, y1)` in PDF user
//! space, which is also the space highlight annotations are written in.

use serde::{Deserialize, Serialize};

/// A 2D point in document space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_highlighter::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle given by two corners.
///
/// Serialized as the array `[x0, y0, x1, y1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct Rect {
    /// Left edge
    pub x0: f32,
    /// Lower edge (the vertical origin)
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Upper edge
    pub y1: f32,
}

impl Rect {
    /// Create a rectangle from two corner points.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_highlighter::geometry::Rect;
    ///
    /// let rect = Rect::new(10.0, 20.0, 110.0, 70.0);
    /// assert_eq!(rect.width(), 100.0);
    /// assert_eq!(rect.height(), 50.0);
    /// ```
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Create a rectangle from an origin and dimensions.
    pub fn from_origin(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Get the center point of the rectangle.
    pub fn center(&self) -> Point {
        Point {
            x: (self.x0 + self.x1) / 2.0,
            y: (self.y0 + self.y1) / 2.0,
        }
    }

    /// All four coordinates are finite and the corners are not inverted.
    ///
    /// Degenerate (zero width or height) rectangles are still valid.
    pub fn is_valid(&self) -> bool {
        [self.x0, self.y0, self.x1, self.y1]
            .iter()
            .all(|v| v.is_finite())
            && self.x0 <= self.x1
            && self.y0 <= self.y1
    }

    /// Compute the union of this rectangle with another.
    ///
    /// Returns the smallest rectangle that contains both rectangles.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_highlighter::geometry::Rect;
    ///
    /// let r1 = Rect::new(0.0, 0.0, 50.0, 50.0);
    /// let r2 = Rect::new(25.0, 25.0, 75.0, 75.0);
    /// assert_eq!(r1.union(&r2), Rect::new(0.0, 0.0, 75.0, 75.0));
    /// ```
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Smallest rectangle enclosing every rectangle in `rects`.
    ///
    /// Returns `None` for an empty iterator.
    pub fn envelope<'a, I>(rects: I) -> Option<Rect>
    where
        I: IntoIterator<Item = &'a Rect>,
    {
        rects
            .into_iter()
            .fold(None, |acc: Option<Rect>, r| Some(acc.map_or(*r, |a| a.union(r))))
    }

    /// Corners as `[x0, y0, x1, y1]`.
    pub fn to_array(&self) -> [f32; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }
}

impl From<[f32; 4]> for Rect {
    fn from(v: [f32; 4]) -> Self {
        Rect::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Rect> for [f32; 4] {
    fn from(r: Rect) -> Self {
        r.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_dimensions() {
        let r = Rect::new(5.0, 10.0, 105.0, 60.0);
        assert_eq!(r.width(), 100.0);
        assert_eq!(r.height(), 50.0);
    }

    #[test]
    fn test_rect_from_origin() {
        let r = Rect::from_origin(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r, Rect::new(10.0, 20.0, 110.0, 70.0));
    }

    #[test]
    fn test_rect_center() {
        let center = Rect::new(0.0, 0.0, 100.0, 50.0).center();
        assert_eq!(center, Point::new(50.0, 25.0));
    }

    #[test]
    fn test_rect_union() {
        let r1 = Rect::new(0.0, 0.0, 50.0, 50.0);
        let r2 = Rect::new(25.0, 25.0, 75.0, 75.0);
        let union = r1.union(&r2);
        assert_eq!(union, Rect::new(0.0, 0.0, 75.0, 75.0));
        assert_eq!(r2.union(&r1), union);
    }

    #[test]
    fn test_envelope() {
        let rects = [
            Rect::new(10.0, 100.0, 30.0, 112.0),
            Rect::new(35.0, 98.0, 60.0, 110.0),
            Rect::new(65.0, 100.0, 90.0, 114.0),
        ];
        assert_eq!(
            Rect::envelope(&rects),
            Some(Rect::new(10.0, 98.0, 90.0, 114.0))
        );
        let none: [Rect; 0] = [];
        assert_eq!(Rect::envelope(&none), None);
    }

    #[test]
    fn test_is_valid() {
        assert!(Rect::new(0.0, 0.0, 10.0, 10.0).is_valid());
        assert!(Rect::new(5.0, 5.0, 5.0, 5.0).is_valid());
        assert!(!Rect::new(10.0, 0.0, 0.0, 10.0).is_valid());
        assert!(!Rect::new(0.0, 10.0, 10.0, 0.0).is_valid());
        assert!(!Rect::new(f32::NAN, 0.0, 10.0, 10.0).is_valid());
        assert!(!Rect::new(0.0, 0.0, f32::INFINITY, 10.0).is_valid());
    }

    #[test]
    fn test_rect_serializes_as_array() {
        let r = Rect::new(1.5, 2.0, 3.0, 4.25);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, "[1.5,2.0,3.0,4.25]");
        let back: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
