use crate::geometry::{Geometry, Polygon};
use crate::math::Point2;

/// Snaps the vertices and segments of a geometry to a set of snap points.
///
/// Vertices within `tol` of a snap point move onto it; snap points within
/// `tol` of a segment interior are inserted into the segment. This is the
/// conditioning step behind the mutual-snapping robustness strategy: each
/// input is pulled onto the other's vertices so near-coincident linework
/// becomes exactly coincident before noding.
#[must_use]
pub fn snap_geometry(geom: &Geometry, snap_pts: &[Point2], tol: f64) -> Geometry {
    match geom {
        Geometry::Point(pt) => Geometry::Point(snap_vertex(pt, snap_pts, tol)),
        Geometry::MultiPoint(pts) => {
            Geometry::MultiPoint(pts.iter().map(|pt| snap_vertex(pt, snap_pts, tol)).collect())
        }
        Geometry::LineString(pts) => Geometry::LineString(snap_line(pts, snap_pts, tol, false)),
        Geometry::MultiLineString(lines) => Geometry::MultiLineString(
            lines
                .iter()
                .map(|l| snap_line(l, snap_pts, tol, false))
                .collect(),
        ),
        Geometry::Polygon(poly) => Geometry::Polygon(snap_polygon(poly, snap_pts, tol)),
        Geometry::MultiPolygon(polys) => Geometry::MultiPolygon(
            polys
                .iter()
                .map(|poly| snap_polygon(poly, snap_pts, tol))
                .collect(),
        ),
        Geometry::Collection(geoms) => Geometry::Collection(
            geoms
                .iter()
                .map(|g| snap_geometry(g, snap_pts, tol))
                .collect(),
        ),
    }
}

/// Collects every vertex of a geometry, for use as snap targets.
#[must_use]
pub fn snap_points(geom: &Geometry) -> Vec<Point2> {
    let mut pts = Vec::new();
    geom.for_each_coord(&mut |pt| pts.push(*pt));
    pts
}

fn snap_polygon(poly: &Polygon, snap_pts: &[Point2], tol: f64) -> Polygon {
    Polygon {
        shell: snap_line(&poly.shell, snap_pts, tol, true),
        holes: poly
            .holes
            .iter()
            .map(|h| snap_line(h, snap_pts, tol, true))
            .collect(),
    }
}

fn snap_line(pts: &[Point2], snap_pts: &[Point2], tol: f64, is_ring: bool) -> Vec<Point2> {
    // Vertex snapping pass.
    let mut snapped: Vec<Point2> = pts.iter().map(|pt| snap_vertex(pt, snap_pts, tol)).collect();
    if is_ring && !snapped.is_empty() {
        // Keep the ring explicitly closed after snapping.
        if let Some(first) = snapped.first().copied() {
            if let Some(last) = snapped.last_mut() {
                *last = first;
            }
        }
    }

    // Segment snapping pass: insert snap points lying near a segment interior.
    let mut result: Vec<Point2> = Vec::with_capacity(snapped.len());
    for w in 0..snapped.len() {
        let pt = snapped[w];
        if result.last() != Some(&pt) {
            result.push(pt);
        }
        if w + 1 >= snapped.len() {
            break;
        }
        let next = snapped[w + 1];
        let mut inserts: Vec<(f64, Point2)> = snap_pts
            .iter()
            .filter(|sp| **sp != pt && **sp != next)
            .filter_map(|sp| {
                segment_fraction(sp, &pt, &next, tol).map(|frac| (frac, *sp))
            })
            .collect();
        inserts.sort_by(|a, b| a.0.total_cmp(&b.0));
        for (_, sp) in inserts {
            if result.last() != Some(&sp) {
                result.push(sp);
            }
        }
    }
    result
}

fn snap_vertex(pt: &Point2, snap_pts: &[Point2], tol: f64) -> Point2 {
    let mut best: Option<(f64, Point2)> = None;
    for sp in snap_pts {
        let d = distance(pt, sp);
        if d <= tol && best.map_or(true, |(bd, _)| d < bd) {
            best = Some((d, *sp));
        }
    }
    best.map_or(*pt, |(_, sp)| sp)
}

/// Fractional position of a point projected onto a segment, when the point
/// is within `tol` of the segment interior.
fn segment_fraction(pt: &Point2, s0: &Point2, s1: &Point2, tol: f64) -> Option<f64> {
    let dx = s1.x - s0.x;
    let dy = s1.y - s0.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return None;
    }
    let t = ((pt.x - s0.x) * dx + (pt.y - s0.y) * dy) / len_sq;
    if t <= 0.0 || t >= 1.0 {
        return None;
    }
    let proj = Point2::new(s0.x + t * dx, s0.y + t * dy);
    if distance(pt, &proj) <= tol {
        Some(t)
    } else {
        None
    }
}

fn distance(a: &Point2, b: &Point2) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}
