/// A 2D point in PDF user space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Affine transformation matrix `[a b c d e f]`.
///
/// Represents the matrix
/// ```text
/// | a  b  0 |
/// | c  d  0 |
/// | e  f  1 |
/// ```
/// using the row-vector convention of the PDF imaging model. The text
/// rendering matrix handed to glyph callbacks is one of these, with the font
/// size, horizontal scaling and rise already folded in.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ctm {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Ctm {
    fn default() -> Self {
        Self::identity()
    }
}

impl Ctm {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// The identity matrix.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// The origin of glyph space mapped to page space.
    pub fn origin(&self) -> Point {
        Point::new(self.e, self.f)
    }

    /// Length of the transformed x unit vector.
    ///
    /// Multiplying a glyph-space advance by this gives the page-space advance,
    /// including any rotation or skew.
    pub fn horizontal_scale(&self) -> f64 {
        self.a.hypot(self.b)
    }
}

/// Bounding box with top-left origin coordinate system.
///
/// Coordinates follow the layout convention used for page boxes:
/// - `x0`: left edge
/// - `top`: top edge
/// - `x1`: right edge
/// - `bottom`: bottom edge
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}
