pub mod index_noder;
pub mod snap_round;
pub mod snapping;
pub mod validate;

pub use index_noder::IndexNoder;
pub use snap_round::SnapRoundingNoder;
pub use snapping::SnappingNoder;

use crate::error::Result;
use crate::math::Point2;

/// A run of connected segments extracted from one input edge.
///
/// `src` indexes the source-info record of the originating input edge; it is
/// carried unchanged through noding so split substrings stay attributable.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentString {
    pub pts: Vec<Point2>,
    pub src: usize,
}

impl SegmentString {
    #[must_use]
    pub fn new(pts: Vec<Point2>, src: usize) -> Self {
        Self { pts, src }
    }
}

/// Inserts a node at every point where segments cross or touch, returning a
/// fully noded, intersection-free set of segment strings.
pub trait Noder {
    /// # Errors
    ///
    /// Returns a topology error when noding cannot produce an
    /// intersection-free arrangement.
    fn node(&self, inputs: &[SegmentString]) -> Result<Vec<SegmentString>>;
}
