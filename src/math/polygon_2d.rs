use super::{Point2, TOLERANCE};

/// Computes the signed area of a closed ring (shoelace formula).
///
/// The ring is expected to be explicitly closed (first point repeated at the
/// end). Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area(ring: &[Point2]) -> f64 {
    if ring.len() < 4 {
        return 0.0;
    }
    let mut sum = 0.0;
    for w in ring.windows(2) {
        sum += w[0].x * w[1].y - w[1].x * w[0].y;
    }
    sum * 0.5
}

/// Tests whether a closed ring is oriented counter-clockwise.
#[must_use]
pub fn is_ccw(ring: &[Point2]) -> bool {
    signed_area(ring) > 0.0
}

/// Rotates a closed ring so it starts at the leftmost vertex (smallest x),
/// breaking ties by smallest y. Ensures deterministic output for comparison.
#[must_use]
pub fn rotate_to_canonical_start(ring: &[Point2]) -> Vec<Point2> {
    if ring.len() < 4 {
        return ring.to_vec();
    }
    // Work on the open ring; re-close afterwards.
    let open = &ring[..ring.len() - 1];
    let mut best = 0;
    for (i, pt) in open.iter().enumerate().skip(1) {
        let b = &open[best];
        if pt.x < b.x - TOLERANCE || (pt.x - b.x).abs() < TOLERANCE && pt.y < b.y {
            best = i;
        }
    }
    let mut rotated = Vec::with_capacity(ring.len());
    rotated.extend_from_slice(&open[best..]);
    rotated.extend_from_slice(&open[..best]);
    rotated.push(open[best]);
    rotated
}

/// Finds a point of `ring` that is not a vertex of `other`.
///
/// Used when nesting a hole into a candidate shell: the test point must not
/// lie on the shell boundary, or the point-in-ring test is ambiguous.
/// Falls back to the first point if every vertex is shared.
#[must_use]
pub fn point_not_in_ring(ring: &[Point2], other: &[Point2]) -> Point2 {
    for pt in ring {
        if !other.iter().any(|o| o == pt) {
            return *pt;
        }
    }
    ring[0]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square_ccw() -> Vec<Point2> {
        vec![
            p(0.0, 0.0),
            p(1.0, 0.0),
            p(1.0, 1.0),
            p(0.0, 1.0),
            p(0.0, 0.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert!((signed_area(&square_ccw()) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut ring = square_ccw();
        ring.reverse();
        assert!((signed_area(&ring) + 1.0).abs() < TOLERANCE);
        assert!(!is_ccw(&ring));
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area(&[p(0.0, 0.0)]).abs() < TOLERANCE);
        assert!(signed_area(&[]).abs() < TOLERANCE);
    }

    #[test]
    fn canonical_start_rotation() {
        let ring = vec![
            p(1.0, 0.0),
            p(1.0, 1.0),
            p(0.0, 1.0),
            p(0.0, 0.0),
            p(1.0, 0.0),
        ];
        let rotated = rotate_to_canonical_start(&ring);
        assert_eq!(rotated[0], p(0.0, 0.0));
        assert_eq!(rotated[rotated.len() - 1], p(0.0, 0.0));
        assert_eq!(rotated.len(), ring.len());
    }

    #[test]
    fn point_not_in_ring_skips_shared() {
        let ring = square_ccw();
        let other = vec![p(0.0, 0.0), p(1.0, 0.0)];
        assert_eq!(point_not_in_ring(&ring, &other), p(1.0, 1.0));
    }
}
