pub use kurbo::{Affine, Line, Point, Rect, Vec2};

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;
/// PDF user-space points per inch.
pub const PT_PER_INCH: f64 = 72.0;
/// Resolution assumed for source images when deriving their physical size.
pub const DEFAULT_DPI: f64 = 300.0;

/// Convert millimetres to PDF points.
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * PT_PER_INCH / MM_PER_INCH
}

/// Convert a pixel count at `dpi` to millimetres.
pub fn px_to_mm(px: u32, dpi: f64) -> f64 {
    f64::from(px) * MM_PER_INCH / dpi
}

/// A `(width, height)` pair in millimetres.
///
/// No ordering between the two axes is implied; a landscape card has `width > height`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Dimension {
    /// Horizontal extent in mm.
    pub width: f64,
    /// Vertical extent in mm.
    pub height: f64,
}

impl Dimension {
    /// Build a dimension from millimetre values.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Build a dimension from inch values.
    pub fn from_inches(width: f64, height: f64) -> Self {
        Self::new(width * MM_PER_INCH, height * MM_PER_INCH)
    }

    /// Same extent with the axes exchanged.
    pub fn swapped(self) -> Self {
        Self::new(self.height, self.width)
    }

    /// True when both axes are finite and strictly positive.
    pub fn is_positive(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Shrink both axes by `amount` on each side.
    pub fn inset(self, amount: f64) -> Self {
        Self::new(self.width - 2.0 * amount, self.height - 2.0 * amount)
    }

    /// `(width, height)` converted to PDF points.
    pub fn to_points(self) -> (f64, f64) {
        (mm_to_pt(self.width), mm_to_pt(self.height))
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}mm x {:.2}mm", self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
