use rstar::AABB;

use super::index_noder::SegmentIndex;
use super::SegmentString;
use crate::error::{Result, TopologyError};
use crate::math::intersect_2d::{segment_intersection, SegmentIntersection};
use crate::math::Point2;

/// Verifies that a set of segment strings is fully noded.
///
/// After noding, no two sub-segments may properly cross, touch at a
/// non-endpoint, or partially overlap; exactly coincident segments are
/// permitted (they are merged by the graph builder). A violation is the
/// recoverable failure kind that triggers the overlay retry chain.
///
/// # Errors
///
/// Returns [`TopologyError::InvalidNoding`] at the offending location.
pub fn validate_noding(strings: &[SegmentString]) -> Result<()> {
    let index = SegmentIndex::build(strings);

    for (si, string) in strings.iter().enumerate() {
        for (gi, w) in string.pts.windows(2).enumerate() {
            if w[0] == w[1] {
                continue;
            }
            let env = AABB::from_corners(
                [w[0].x.min(w[1].x), w[0].y.min(w[1].y)],
                [w[0].x.max(w[1].x), w[0].y.max(w[1].y)],
            );
            for cand in index.query(&env) {
                if (cand.string, cand.seg) <= (si, gi) {
                    continue;
                }
                let c = &strings[cand.string].pts[cand.seg..=cand.seg + 1];
                check_pair(&w[0], &w[1], &c[0], &c[1])?;
            }
        }
    }
    Ok(())
}

fn check_pair(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> Result<()> {
    match segment_intersection(a0, a1, b0, b1) {
        SegmentIntersection::None => Ok(()),
        SegmentIntersection::Point { pt, proper } => {
            let is_endpoint_of_both = (pt == *a0 || pt == *a1) && (pt == *b0 || pt == *b1);
            if proper || !is_endpoint_of_both {
                Err(TopologyError::InvalidNoding { x: pt.x, y: pt.y }.into())
            } else {
                Ok(())
            }
        }
        SegmentIntersection::Collinear { p0, .. } => {
            // Identical segments (in either direction) are coincident
            // linework awaiting merge; partial overlap is a noding failure.
            let identical = (*a0 == *b0 && *a1 == *b1) || (*a0 == *b1 && *a1 == *b0);
            if identical {
                Ok(())
            } else {
                Err(TopologyError::InvalidNoding { x: p0.x, y: p0.y }.into())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::noding::{IndexNoder, Noder};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn noded_output_validates() {
        let inputs = vec![
            SegmentString::new(vec![p(0.0, 0.0), p(10.0, 10.0)], 0),
            SegmentString::new(vec![p(0.0, 10.0), p(10.0, 0.0)], 1),
        ];
        let noded = IndexNoder.node(&inputs).unwrap();
        assert!(validate_noding(&noded).is_ok());
    }

    #[test]
    fn proper_crossing_is_rejected() {
        let strings = vec![
            SegmentString::new(vec![p(0.0, 0.0), p(10.0, 10.0)], 0),
            SegmentString::new(vec![p(0.0, 10.0), p(10.0, 0.0)], 1),
        ];
        assert!(validate_noding(&strings).is_err());
    }

    #[test]
    fn interior_touch_is_rejected() {
        let strings = vec![
            SegmentString::new(vec![p(0.0, 0.0), p(10.0, 0.0)], 0),
            SegmentString::new(vec![p(5.0, 0.0), p(5.0, 5.0)], 1),
        ];
        assert!(validate_noding(&strings).is_err());
    }

    #[test]
    fn endpoint_touch_is_accepted() {
        let strings = vec![
            SegmentString::new(vec![p(0.0, 0.0), p(5.0, 0.0)], 0),
            SegmentString::new(vec![p(5.0, 0.0), p(5.0, 5.0)], 1),
        ];
        assert!(validate_noding(&strings).is_ok());
    }

    #[test]
    fn coincident_segments_are_accepted() {
        let strings = vec![
            SegmentString::new(vec![p(0.0, 0.0), p(5.0, 0.0)], 0),
            SegmentString::new(vec![p(5.0, 0.0), p(0.0, 0.0)], 1),
        ];
        assert!(validate_noding(&strings).is_ok());
    }

    #[test]
    fn partial_overlap_is_rejected() {
        let strings = vec![
            SegmentString::new(vec![p(0.0, 0.0), p(5.0, 0.0)], 0),
            SegmentString::new(vec![p(3.0, 0.0), p(8.0, 0.0)], 1),
        ];
        assert!(validate_noding(&strings).is_err());
    }
}
