use crate::geometry::{Geometry, Polygon};
use crate::math::Point2;

/// Simplifies a geometry with a Douglas-Peucker pass bounded by `tol`.
///
/// Ring topology is preserved per component: rings keep their closure and at
/// least four points (falling back to the original ring when simplification
/// would collapse it), and chain endpoints are pinned. Used as the last
/// resort of the overlay robustness chain, where shaving near-degenerate
/// vertices can remove the configuration that defeated noding.
#[must_use]
pub fn simplify_geometry(geom: &Geometry, tol: f64) -> Geometry {
    match geom {
        Geometry::Point(_) | Geometry::MultiPoint(_) => geom.clone(),
        Geometry::LineString(pts) => Geometry::LineString(simplify_chain(pts, tol)),
        Geometry::MultiLineString(lines) => Geometry::MultiLineString(
            lines.iter().map(|l| simplify_chain(l, tol)).collect(),
        ),
        Geometry::Polygon(poly) => Geometry::Polygon(simplify_polygon(poly, tol)),
        Geometry::MultiPolygon(polys) => Geometry::MultiPolygon(
            polys.iter().map(|poly| simplify_polygon(poly, tol)).collect(),
        ),
        Geometry::Collection(geoms) => Geometry::Collection(
            geoms.iter().map(|g| simplify_geometry(g, tol)).collect(),
        ),
    }
}

fn simplify_polygon(poly: &Polygon, tol: f64) -> Polygon {
    Polygon {
        shell: simplify_ring(&poly.shell, tol),
        holes: poly.holes.iter().map(|h| simplify_ring(h, tol)).collect(),
    }
}

fn simplify_ring(ring: &[Point2], tol: f64) -> Vec<Point2> {
    if ring.len() <= 4 {
        return ring.to_vec();
    }
    let simplified = simplify_chain(ring, tol);
    // A valid closed ring needs at least 3 distinct vertices.
    if simplified.len() < 4 {
        return ring.to_vec();
    }
    simplified
}

fn simplify_chain(pts: &[Point2], tol: f64) -> Vec<Point2> {
    if pts.len() <= 2 {
        return pts.to_vec();
    }
    let mut keep = vec![false; pts.len()];
    keep[0] = true;
    keep[pts.len() - 1] = true;
    simplify_section(pts, 0, pts.len() - 1, tol, &mut keep);
    pts.iter()
        .zip(keep.iter())
        .filter_map(|(pt, k)| if *k { Some(*pt) } else { None })
        .collect()
}

fn simplify_section(pts: &[Point2], lo: usize, hi: usize, tol: f64, keep: &mut [bool]) {
    if hi <= lo + 1 {
        return;
    }
    let mut max_dist = 0.0;
    let mut max_idx = lo;
    for (i, pt) in pts.iter().enumerate().take(hi).skip(lo + 1) {
        let d = perpendicular_distance(pt, &pts[lo], &pts[hi]);
        if d > max_dist {
            max_dist = d;
            max_idx = i;
        }
    }
    if max_dist > tol {
        keep[max_idx] = true;
        simplify_section(pts, lo, max_idx, tol, keep);
        simplify_section(pts, max_idx, hi, tol, keep);
    }
}

fn perpendicular_distance(pt: &Point2, s0: &Point2, s1: &Point2) -> f64 {
    let dx = s1.x - s0.x;
    let dy = s1.y - s0.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return ((pt.x - s0.x).powi(2) + (pt.y - s0.y).powi(2)).sqrt();
    }
    let t = (((pt.x - s0.x) * dx + (pt.y - s0.y) * dy) / len_sq).clamp(0.0, 1.0);
    let proj_x = s0.x + t * dx;
    let proj_y = s0.y + t * dy;
    ((pt.x - proj_x).powi(2) + (pt.y - proj_y).powi(2)).sqrt()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn removes_near_collinear_vertex() {
        let line = vec![p(0.0, 0.0), p(5.0, 0.005), p(10.0, 0.0)];
        let simplified = simplify_chain(&line, 0.01);
        assert_eq!(simplified, vec![p(0.0, 0.0), p(10.0, 0.0)]);
    }

    #[test]
    fn keeps_significant_vertex() {
        let line = vec![p(0.0, 0.0), p(5.0, 1.0), p(10.0, 0.0)];
        let simplified = simplify_chain(&line, 0.01);
        assert_eq!(simplified.len(), 3);
    }

    #[test]
    fn ring_stays_closed_and_nonempty() {
        let poly = Polygon::new(
            vec![
                p(0.0, 0.0),
                p(5.0, 0.001),
                p(10.0, 0.0),
                p(10.0, 10.0),
                p(0.0, 10.0),
            ],
            vec![],
        );
        let simplified = simplify_geometry(&Geometry::Polygon(poly), 0.01);
        if let Geometry::Polygon(poly) = simplified {
            assert!(poly.shell.len() >= 4);
            assert_eq!(poly.shell.first(), poly.shell.last());
            assert!(!poly.shell.contains(&p(5.0, 0.001)));
        } else {
            panic!("expected polygon");
        }
    }

    #[test]
    fn tiny_ring_is_left_alone() {
        let ring = vec![p(0.0, 0.0), p(1.0, 0.0), p(0.5, 0.5), p(0.0, 0.0)];
        assert_eq!(simplify_ring(&ring, 10.0), ring);
    }
}
