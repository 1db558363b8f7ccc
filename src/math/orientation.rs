use std::cmp::Ordering;

use super::Point2;

/// Relative error bound for the orientation determinant filter.
///
/// Results whose magnitude falls below this bound times the determinant
/// magnitude are not certain under f64 arithmetic and are reported as
/// collinear. The overlay retry chain compensates for the (rare) resulting
/// misclassification by re-running under reduced precision.
const ORIENTATION_FILTER: f64 = 3.330_669_073_875_471_6e-16;

/// Orientation of point `r` relative to the directed line `p -> q`.
///
/// Returns `1` if `r` lies to the left (counter-clockwise), `-1` if to the
/// right (clockwise), `0` if the three points are collinear within the
/// certainty of the floating-point filter.
#[must_use]
pub fn orientation_index(p: &Point2, q: &Point2, r: &Point2) -> i8 {
    let det_left = (q.x - p.x) * (r.y - p.y);
    let det_right = (q.y - p.y) * (r.x - p.x);
    let det = det_left - det_right;

    let det_sum = if det_left > 0.0 {
        if det_right <= 0.0 {
            return sign(det);
        }
        det_left + det_right
    } else if det_left < 0.0 {
        if det_right >= 0.0 {
            return sign(det);
        }
        -det_left - det_right
    } else {
        return sign(det);
    };

    let err_bound = ORIENTATION_FILTER * det_sum;
    if det >= err_bound || -det >= err_bound {
        sign(det)
    } else {
        0
    }
}

fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// Quadrant of a direction vector, numbered counter-clockwise from the
/// positive x-axis: NE = 0, NW = 1, SW = 2, SE = 3.
#[must_use]
pub fn quadrant(dx: f64, dy: f64) -> u8 {
    if dx >= 0.0 {
        if dy >= 0.0 {
            0
        } else {
            3
        }
    } else if dy >= 0.0 {
        1
    } else {
        2
    }
}

/// Compares the angular direction of two rays leaving a common origin.
///
/// Direction is measured counter-clockwise from the positive x-axis, so
/// `Less` means the first ray has the smaller angle. Equal direction vectors
/// compare `Equal` regardless of magnitude.
#[must_use]
pub fn compare_angular(origin: &Point2, dir1: &Point2, dir2: &Point2) -> Ordering {
    let dx1 = dir1.x - origin.x;
    let dy1 = dir1.y - origin.y;
    let dx2 = dir2.x - origin.x;
    let dy2 = dir2.y - origin.y;

    if dx1 == dx2 && dy1 == dy2 {
        return Ordering::Equal;
    }
    let q1 = quadrant(dx1, dy1);
    let q2 = quadrant(dx2, dy2);
    if q1 != q2 {
        return q1.cmp(&q2);
    }
    // Same quadrant: the ray further counter-clockwise is the one whose
    // direction point lies to the left of the other ray.
    match orientation_index(origin, dir2, dir1) {
        1 => Ordering::Greater,
        -1 => Ordering::Less,
        _ => Ordering::Equal,
    }
}
