pub mod common_bits;
pub mod simplify;
pub mod snap;

use crate::math::Point2;

/// The rule by which a coordinate value is rounded to its canonical
/// representable form.
///
/// Immutable once constructed; shared by reference across one overlay call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrecisionModel {
    /// No snapping: values are used as-is, and the overlay retry chain
    /// compensates for floating-point construction failures.
    Floating,
    /// A fixed grid: snapping rounds `x * scale` to the nearest integer,
    /// then divides back.
    Fixed { scale: f64 },
}

impl Default for PrecisionModel {
    fn default() -> Self {
        PrecisionModel::Floating
    }
}

impl PrecisionModel {
    /// Creates a fixed-grid model. A non-positive scale degenerates to the
    /// floating model.
    #[must_use]
    pub fn fixed(scale: f64) -> Self {
        if scale > 0.0 {
            PrecisionModel::Fixed { scale }
        } else {
            PrecisionModel::Floating
        }
    }

    #[must_use]
    pub fn is_floating(&self) -> bool {
        matches!(self, PrecisionModel::Floating)
    }

    /// Grid cell size, if the model is fixed.
    #[must_use]
    pub fn grid_size(&self) -> Option<f64> {
        match self {
            PrecisionModel::Floating => None,
            PrecisionModel::Fixed { scale } => Some(1.0 / scale),
        }
    }

    /// Snaps an ordinate onto the model's representable values.
    #[must_use]
    pub fn make_precise(&self, value: f64) -> f64 {
        match self {
            PrecisionModel::Floating => value,
            PrecisionModel::Fixed { scale } => (value * scale).round() / scale,
        }
    }

    /// Snaps a point onto the model's representable values.
    #[must_use]
    pub fn make_precise_point(&self, pt: &Point2) -> Point2 {
        match self {
            PrecisionModel::Floating => *pt,
            PrecisionModel::Fixed { .. } => {
                Point2::new(self.make_precise(pt.x), self.make_precise(pt.y))
            }
        }
    }
}
