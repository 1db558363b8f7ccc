use rstar::RTree;

use super::index_noder::node_with;
use super::{Noder, SegmentString};
use crate::error::Result;
use crate::math::Point2;

/// Noder that snaps vertices and intersection points together within a
/// distance tolerance.
///
/// Vertices are clustered onto representative points as they are first seen;
/// computed intersection points are pulled onto an existing representative
/// when one lies within the tolerance. Used by the overlay robustness chain
/// to collapse near-coincident topology that defeats floating noding.
#[derive(Debug)]
pub struct SnappingNoder {
    tolerance: f64,
}

impl SnappingNoder {
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl Noder for SnappingNoder {
    fn node(&self, inputs: &[SegmentString]) -> Result<Vec<SegmentString>> {
        let tol_sq = self.tolerance * self.tolerance;
        let mut reps: RTree<[f64; 2]> = RTree::new();

        let mut snap = |pt: &Point2| -> Point2 {
            if let Some(rep) = reps.nearest_neighbor(&[pt.x, pt.y]) {
                let d_sq = (rep[0] - pt.x).powi(2) + (rep[1] - pt.y).powi(2);
                if d_sq <= tol_sq {
                    return Point2::new(rep[0], rep[1]);
                }
            }
            reps.insert([pt.x, pt.y]);
            *pt
        };

        let mut snapped: Vec<SegmentString> = Vec::with_capacity(inputs.len());
        for string in inputs {
            let mut pts: Vec<Point2> = Vec::with_capacity(string.pts.len());
            for pt in &string.pts {
                let sp = snap(pt);
                if pts.last() != Some(&sp) {
                    pts.push(sp);
                }
            }
            if pts.len() >= 2 {
                snapped.push(SegmentString::new(pts, string.src));
            }
        }

        // Intersection points may fall anywhere; pull them onto an existing
        // representative when close enough so split points coincide exactly.
        let (noded, _) = node_with(&snapped, |pt| {
            if let Some(rep) = reps.nearest_neighbor(&[pt.x, pt.y]) {
                let d_sq = (rep[0] - pt.x).powi(2) + (rep[1] - pt.y).powi(2);
                if d_sq <= tol_sq {
                    return Point2::new(rep[0], rep[1]);
                }
            }
            pt
        });
        Ok(noded)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn near_vertices_are_unified() {
        let inputs = vec![
            SegmentString::new(vec![p(0.0, 0.0), p(10.0, 0.0)], 0),
            SegmentString::new(vec![p(10.0, 1e-9), p(20.0, 0.0)], 1),
        ];
        let noded = SnappingNoder::new(1e-6).node(&inputs).unwrap();
        assert_eq!(noded.len(), 2);
        assert_eq!(noded[0].pts[1], noded[1].pts[0]);
    }

    #[test]
    fn crossing_still_noded() {
        let inputs = vec![
            SegmentString::new(vec![p(0.0, 0.0), p(10.0, 10.0)], 0),
            SegmentString::new(vec![p(0.0, 10.0), p(10.0, 0.0)], 1),
        ];
        let noded = SnappingNoder::new(1e-6).node(&inputs).unwrap();
        assert_eq!(noded.len(), 4);
    }

    #[test]
    fn collapsed_strings_are_dropped() {
        let inputs = vec![SegmentString::new(vec![p(0.0, 0.0), p(1e-9, 0.0)], 0)];
        let noded = SnappingNoder::new(1e-6).node(&inputs).unwrap();
        assert!(noded.is_empty());
    }
}
