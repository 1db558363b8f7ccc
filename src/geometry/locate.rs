use super::{Geometry, Location, Polygon};
use crate::math::orientation::orientation_index;
use crate::math::Point2;

/// Locates a point relative to the areal components of a geometry.
///
/// Non-areal components are ignored; a point not covered by any polygon is
/// exterior.
#[must_use]
pub fn locate_point_in_area(pt: &Point2, geom: &Geometry) -> Location {
    let mut loc = Location::Exterior;
    for poly in geom.polygons() {
        match locate_in_polygon(pt, poly) {
            Location::Boundary => return Location::Boundary,
            Location::Interior => loc = Location::Interior,
            Location::Exterior => {}
        }
    }
    loc
}

/// Locates a point relative to the lineal components of a geometry.
///
/// A point coincident with an endpoint of odd degree is on the boundary
/// (mod-2 rule); a point elsewhere on the linework is interior.
#[must_use]
pub fn locate_point_on_line(pt: &Point2, geom: &Geometry) -> Location {
    let mut endpoint_degree = 0usize;
    let mut on_line = false;
    for line in geom.lines() {
        if line.len() < 2 {
            continue;
        }
        if let (Some(first), Some(last)) = (line.first(), line.last()) {
            if pt == first {
                endpoint_degree += 1;
            }
            if pt == last {
                endpoint_degree += 1;
            }
        }
        for w in line.windows(2) {
            if on_segment(pt, &w[0], &w[1]) {
                on_line = true;
            }
        }
    }
    if endpoint_degree % 2 == 1 {
        Location::Boundary
    } else if on_line {
        Location::Interior
    } else {
        Location::Exterior
    }
}

/// Point-in-polygon location honouring holes.
#[must_use]
pub fn locate_in_polygon(pt: &Point2, poly: &Polygon) -> Location {
    match locate_in_ring(pt, &poly.shell) {
        Location::Exterior => Location::Exterior,
        Location::Boundary => Location::Boundary,
        Location::Interior => {
            for hole in &poly.holes {
                match locate_in_ring(pt, hole) {
                    Location::Interior => return Location::Exterior,
                    Location::Boundary => return Location::Boundary,
                    Location::Exterior => {}
                }
            }
            Location::Interior
        }
    }
}

/// Ray-crossing location of a point relative to a closed ring.
#[must_use]
pub fn locate_in_ring(pt: &Point2, ring: &[Point2]) -> Location {
    if ring.len() < 4 {
        return Location::Exterior;
    }
    let mut crossings = 0;
    for w in ring.windows(2) {
        let (p1, p2) = (&w[0], &w[1]);
        if on_segment(pt, p1, p2) {
            return Location::Boundary;
        }
        // Count crossings of the rightward horizontal ray from pt.
        // The half-open test on y avoids double-counting ray-through-vertex.
        if (p1.y > pt.y) != (p2.y > pt.y) {
            let x_int = p1.x + (pt.y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y);
            if x_int > pt.x {
                crossings += 1;
            }
        }
    }
    if crossings % 2 == 1 {
        Location::Interior
    } else {
        Location::Exterior
    }
}

/// Tests whether a point lies on a segment (inclusive of endpoints).
fn on_segment(pt: &Point2, s0: &Point2, s1: &Point2) -> bool {
    if orientation_index(s0, s1, pt) != 0 {
        return false;
    }
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

    fn donut() -> Polygon {
        Polygon::new(
            vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)],
            vec![vec![p(4.0, 4.0), p(4.0, 6.0), p(6.0, 6.0), p(6.0, 4.0)]],
        )
    }

    #[test]
    fn locate_in_donut() {
        let poly = donut();
        assert_eq!(locate_in_polygon(&p(1.0, 1.0), &poly), Location::Interior);
        assert_eq!(locate_in_polygon(&p(5.0, 5.0), &poly), Location::Exterior);
        assert_eq!(locate_in_polygon(&p(11.0, 5.0), &poly), Location::Exterior);
        assert_eq!(locate_in_polygon(&p(0.0, 5.0), &poly), Location::Boundary);
        assert_eq!(locate_in_polygon(&p(4.0, 5.0), &poly), Location::Boundary);
    }

    #[test]
    fn locate_through_vertex() {
        // Horizontal ray through a ring vertex must count correctly.
        let poly = Polygon::new(vec![p(0.0, 0.0), p(2.0, 2.0), p(4.0, 0.0)], vec![]);
        assert_eq!(
            locate_in_polygon(&p(2.0, 1.0), &poly),
            Location::Interior
        );
        assert_eq!(
            locate_in_polygon(&p(-1.0, 2.0), &poly),
            Location::Exterior
        );
    }

    #[test]
    fn locate_in_area_of_multipolygon() {
        let a = donut();
        let b = Polygon::new(
            vec![p(20.0, 0.0), p(30.0, 0.0), p(30.0, 10.0), p(20.0, 10.0)],
            vec![],
        );
        let geom = Geometry::MultiPolygon(vec![a, b]);
        assert_eq!(
            locate_point_in_area(&p(25.0, 5.0), &geom),
            Location::Interior
        );
        assert_eq!(
            locate_point_in_area(&p(15.0, 5.0), &geom),
            Location::Exterior
        );
    }

    #[test]
    fn locate_on_line_geometry() {
        let geom = Geometry::LineString(vec![p(0.0, 0.0), p(10.0, 0.0)]);
        assert_eq!(locate_point_on_line(&p(5.0, 0.0), &geom), Location::Interior);
        assert_eq!(locate_point_on_line(&p(0.0, 0.0), &geom), Location::Boundary);
        assert_eq!(locate_point_on_line(&p(5.0, 1.0), &geom), Location::Exterior);
    }
}
