use super::index_noder::node_with;
use super::{Noder, SegmentString};
use crate::error::Result;
use crate::math::Point2;
use crate::precision::PrecisionModel;

/// Number of rounding passes before accepting the arrangement as-is.
/// Rounding an intersection point can slide a segment across a grid cell and
/// create a new crossing, so noding is repeated until it reaches a fixpoint.
const MAX_ROUNDING_PASSES: usize = 8;

/// Noder for a fixed precision model.
///
/// Every input vertex and every computed intersection point is snapped to
/// the grid and treated as a forced node, so all output coordinates are
/// exactly representable at the model's scale.
#[derive(Debug)]
pub struct SnapRoundingNoder {
    pm: PrecisionModel,
}

impl SnapRoundingNoder {
    #[must_use]
    pub fn new(pm: PrecisionModel) -> Self {
        Self { pm }
    }
}

impl Noder for SnapRoundingNoder {
    fn node(&self, inputs: &[SegmentString]) -> Result<Vec<SegmentString>> {
        let mut strings = snap_strings(inputs, &self.pm);

        for _ in 0..MAX_ROUNDING_PASSES {
            let (noded, split_any) = node_with(&strings, |pt| self.pm.make_precise_point(&pt));
            strings = snap_strings(&noded, &self.pm);
            if !split_any {
                break;
            }
        }
        // Residual crossings, if any, are caught by the downstream noding
        // validation and surface as a recoverable topology failure.
        Ok(strings)
    }
}

/// Snaps every vertex to the grid and collapses the degenerate segments the
/// rounding may have produced.
fn snap_strings(strings: &[SegmentString], pm: &PrecisionModel) -> Vec<SegmentString> {
    let mut out = Vec::with_capacity(strings.len());
    for string in strings {
        let mut pts: Vec<Point2> = Vec::with_capacity(string.pts.len());
        for pt in &string.pts {
            let snapped = pm.make_precise_point(pt);
            if pts.last() != Some(&snapped) {
                pts.push(snapped);
            }
        }
        if pts.len() >= 2 {
            out.push(SegmentString::new(pts, string.src));
        }
    }
    out
}
