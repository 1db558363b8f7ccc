use super::orientation::orientation_index;
use super::{Point2, Vector2, TOLERANCE};

/// Result of intersecting two bounded segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection {
    /// The segments do not meet.
    None,
    /// The segments meet in a single point.
    ///
    /// `proper` is `true` when the point is interior to both segments.
    Point { pt: Point2, proper: bool },
    /// The segments are collinear and share a positive-length overlap.
    Collinear { p0: Point2, p1: Point2 },
}

/// Robust bounded segment-segment intersection.
///
/// Orientation tests decide *whether* the segments intersect; the coordinate
/// of a proper crossing is then computed parametrically and snapped onto a
/// nearby endpoint when one is within tolerance, so that touching
/// configurations produce exactly coincident node coordinates.
#[must_use]
pub fn segment_intersection(
    p0: &Point2,
    p1: &Point2,
    q0: &Point2,
    q1: &Point2,
) -> SegmentIntersection {
    let o_q0 = orientation_index(p0, p1, q0);
    let o_q1 = orientation_index(p0, p1, q1);
    if (o_q0 > 0 && o_q1 > 0) || (o_q0 < 0 && o_q1 < 0) {
        return SegmentIntersection::None;
    }

    let o_p0 = orientation_index(q0, q1, p0);
    let o_p1 = orientation_index(q0, q1, p1);
    if (o_p0 > 0 && o_p1 > 0) || (o_p0 < 0 && o_p1 < 0) {
        return SegmentIntersection::None;
    }

    if o_q0 == 0 && o_q1 == 0 && o_p0 == 0 && o_p1 == 0 {
        return collinear_intersection(p0, p1, q0, q1);
    }

    let proper = o_q0 != 0 && o_q1 != 0 && o_p0 != 0 && o_p1 != 0;
    if proper {
        let pt = crossing_point(p0, p1, q0, q1);
        return SegmentIntersection::Point {
            pt: snap_to_endpoint(pt, p0, p1, q0, q1),
            proper: true,
        };
    }

    // Non-proper: the intersection point is a segment endpoint lying on the
    // other segment.
    let pt = if o_q0 == 0 && in_envelope(q0, p0, p1) {
        *q0
    } else if o_q1 == 0 && in_envelope(q1, p0, p1) {
        *q1
    } else if o_p0 == 0 && in_envelope(p0, q0, q1) {
        *p0
    } else if o_p1 == 0 && in_envelope(p1, q0, q1) {
        *p1
    } else {
        return SegmentIntersection::None;
    };
    SegmentIntersection::Point { pt, proper: false }
}

/// Intersection of two segments known to be collinear.
fn collinear_intersection(
    p0: &Point2,
    p1: &Point2,
    q0: &Point2,
    q1: &Point2,
) -> SegmentIntersection {
    // Project onto the dominant axis of the p segment.
    let use_x = (p1.x - p0.x).abs() >= (p1.y - p0.y).abs();
    let key = |pt: &Point2| if use_x { pt.x } else { pt.y };

    let (mut a0, mut a1) = (*p0, *p1);
    if key(&a0) > key(&a1) {
        std::mem::swap(&mut a0, &mut a1);
    }
    let (mut b0, mut b1) = (*q0, *q1);
    if key(&b0) > key(&b1) {
        std::mem::swap(&mut b0, &mut b1);
    }

    let lo = if key(&a0) >= key(&b0) { a0 } else { b0 };
    let hi = if key(&a1) <= key(&b1) { a1 } else { b1 };

    if key(&lo) > key(&hi) {
        SegmentIntersection::None
    } else if lo == hi {
        SegmentIntersection::Point {
            pt: lo,
            proper: false,
        }
    } else {
        SegmentIntersection::Collinear { p0: lo, p1: hi }
    }
}

/// Parametric crossing point of two properly intersecting segments.
fn crossing_point(p0: &Point2, p1: &Point2, q0: &Point2, q1: &Point2) -> Point2 {
    let dp = Vector2::new(p1.x - p0.x, p1.y - p0.y);
    let dq = Vector2::new(q1.x - q0.x, q1.y - q0.y);
    let cross = dp.x * dq.y - dp.y * dq.x;
    if cross.abs() < TOLERANCE * TOLERANCE {
        // Near-parallel proper crossing; midpoint of the closest endpoints
        // is the best available estimate.
        return Point2::new((p0.x + q1.x) / 2.0, (p0.y + q1.y) / 2.0);
    }
    let dx = q0.x - p0.x;
    let dy = q0.y - p0.y;
    let t = (dx * dq.y - dy * dq.x) / cross;
    let t = t.clamp(0.0, 1.0);
    Point2::new(p0.x + dp.x * t, p0.y + dp.y * t)
}

/// Snaps a computed intersection point onto a segment endpoint that lies
/// within tolerance of it.
fn snap_to_endpoint(pt: Point2, p0: &Point2, p1: &Point2, q0: &Point2, q1: &Point2) -> Point2 {
    for cand in [p0, p1, q0, q1] {
        if (pt.x - cand.x).abs() <= TOLERANCE && (pt.y - cand.y).abs() <= TOLERANCE {
            return *cand;
        }
    }
    pt
}

/// Envelope containment test for a point known to be on the segment's line.
fn in_envelope(pt: &Point2, s0: &Point2, s1: &Point2) -> bool {
    pt.x >= s0.x.min(s1.x)
        && pt.x <= s0.x.max(s1.x)
        && pt.y >= s0.y.min(s1.y)
        && pt.y <= s0.y.max(s1.y)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn proper_crossing() {
        let r = segment_intersection(&p(0.0, 0.0), &p(2.0, 2.0), &p(0.0, 2.0), &p(2.0, 0.0));
        match r {
            SegmentIntersection::Point { pt, proper } => {
                assert!(proper);
                assert!((pt.x - 1.0).abs() < TOLERANCE);
                assert!((pt.y - 1.0).abs() < TOLERANCE);
            }
            other => panic!("expected point intersection, got {other:?}"),
        }
    }

    #[test]
    fn disjoint_segments() {
        let r = segment_intersection(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0), &p(1.0, 1.0));
        assert_eq!(r, SegmentIntersection::None);
    }

    #[test]
    fn endpoint_touch_is_not_proper() {
        let r = segment_intersection(&p(0.0, 0.0), &p(1.0, 1.0), &p(1.0, 1.0), &p(2.0, 0.0));
        match r {
            SegmentIntersection::Point { pt, proper } => {
                assert!(!proper);
                assert_eq!(pt, p(1.0, 1.0));
            }
            other => panic!("expected endpoint touch, got {other:?}"),
        }
    }

    #[test]
    fn vertex_on_interior_is_not_proper() {
        // q0 lies on the interior of p0-p1.
        let r = segment_intersection(&p(0.0, 0.0), &p(4.0, 0.0), &p(2.0, 0.0), &p(2.0, 3.0));
        match r {
            SegmentIntersection::Point { pt, proper } => {
                assert!(!proper);
                assert_eq!(pt, p(2.0, 0.0));
            }
            other => panic!("expected touch, got {other:?}"),
        }
    }

    #[test]
    fn collinear_overlap() {
        let r = segment_intersection(&p(0.0, 0.0), &p(3.0, 0.0), &p(1.0, 0.0), &p(5.0, 0.0));
        match r {
            SegmentIntersection::Collinear { p0, p1 } => {
                assert_eq!(p0, p(1.0, 0.0));
                assert_eq!(p1, p(3.0, 0.0));
            }
            other => panic!("expected collinear overlap, got {other:?}"),
        }
    }

    #[test]
    fn collinear_endpoint_touch() {
        let r = segment_intersection(&p(0.0, 0.0), &p(1.0, 0.0), &p(1.0, 0.0), &p(2.0, 0.0));
        match r {
            SegmentIntersection::Point { pt, proper } => {
                assert!(!proper);
                assert_eq!(pt, p(1.0, 0.0));
            }
            other => panic!("expected touch, got {other:?}"),
        }
    }

    #[test]
    fn collinear_disjoint() {
        let r = segment_intersection(&p(0.0, 0.0), &p(1.0, 0.0), &p(2.0, 0.0), &p(3.0, 0.0));
        assert_eq!(r, SegmentIntersection::None);
    }
}
