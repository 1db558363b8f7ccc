pub mod envelope;
pub mod factory;
pub mod locate;

pub use envelope::Envelope;

use crate::math::{polygon_2d, Point2};

/// Topological location of a point relative to a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}

/// An areal geometry: one closed shell ring and zero or more hole rings.
///
/// Rings are stored explicitly closed (first point repeated at the end).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub shell: Vec<Point2>,
    pub holes: Vec<Vec<Point2>>,
}

impl Polygon {
    /// Creates a polygon, closing any ring that is not explicitly closed.
    #[must_use]
    pub fn new(shell: Vec<Point2>, holes: Vec<Vec<Point2>>) -> Self {
        Self {
            shell: close_ring(shell),
            holes: holes.into_iter().map(close_ring).collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shell.len() < 4
    }

    /// Unsigned area: shell area less hole areas.
    #[must_use]
    pub fn area(&self) -> f64 {
        let mut area = polygon_2d::signed_area(&self.shell).abs();
        for hole in &self.holes {
            area -= polygon_2d::signed_area(hole).abs();
        }
        area
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        Envelope::of_points(&self.shell)
    }
}

fn close_ring(mut ring: Vec<Point2>) -> Vec<Point2> {
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
        if first != last {
            ring.push(first);
        }
    }
    ring
}

/// A planar geometry value.
///
/// Multi-variants with an empty element list represent the empty geometry of
/// their dimension (there is no empty `Point` variant).
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point2),
    MultiPoint(Vec<Point2>),
    LineString(Vec<Point2>),
    MultiLineString(Vec<Vec<Point2>>),
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
    Collection(Vec<Geometry>),
}

impl Geometry {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(_) => false,
            Geometry::MultiPoint(pts) => pts.is_empty(),
            Geometry::LineString(pts) => pts.len() < 2,
            Geometry::MultiLineString(lines) => lines.iter().all(|l| l.len() < 2),
            Geometry::Polygon(poly) => poly.is_empty(),
            Geometry::MultiPolygon(polys) => polys.iter().all(Polygon::is_empty),
            Geometry::Collection(geoms) => geoms.iter().all(Geometry::is_empty),
        }
    }

    /// Topological dimension: 0 for puntal, 1 for lineal, 2 for areal.
    ///
    /// A collection reports the maximum dimension of its elements; an empty
    /// collection reports -1 (dimension unknown).
    #[must_use]
    pub fn dimension(&self) -> i8 {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => 0,
            Geometry::LineString(_) | Geometry::MultiLineString(_) => 1,
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => 2,
            Geometry::Collection(geoms) => {
                geoms.iter().map(Geometry::dimension).max().unwrap_or(-1)
            }
        }
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::empty();
        self.for_each_coord(&mut |pt| env.expand_to_include(pt));
        env
    }

    /// Total area of all areal components.
    #[must_use]
    pub fn area(&self) -> f64 {
        match self {
            Geometry::Polygon(poly) => poly.area(),
            Geometry::MultiPolygon(polys) => polys.iter().map(Polygon::area).sum(),
            Geometry::Collection(geoms) => geoms.iter().map(Geometry::area).sum(),
            _ => 0.0,
        }
    }

    /// Visits every coordinate of the geometry.
    pub fn for_each_coord<F: FnMut(&Point2)>(&self, f: &mut F) {
        match self {
            Geometry::Point(pt) => f(pt),
            Geometry::MultiPoint(pts) | Geometry::LineString(pts) => pts.iter().for_each(f),
            Geometry::MultiLineString(lines) => {
                lines.iter().for_each(|l| l.iter().for_each(&mut *f));
            }
            Geometry::Polygon(poly) => {
                poly.shell.iter().for_each(&mut *f);
                poly.holes.iter().for_each(|h| h.iter().for_each(&mut *f));
            }
            Geometry::MultiPolygon(polys) => {
                for poly in polys {
                    poly.shell.iter().for_each(&mut *f);
                    poly.holes.iter().for_each(|h| h.iter().for_each(&mut *f));
                }
            }
            Geometry::Collection(geoms) => {
                geoms.iter().for_each(|g| g.for_each_coord(&mut *f));
            }
        }
    }

    /// Returns a copy with every coordinate transformed by `f`.
    #[must_use]
    pub fn map_coords<F: Fn(&Point2) -> Point2>(&self, f: &F) -> Geometry {
        let map_pts = |pts: &Vec<Point2>| pts.iter().map(f).collect::<Vec<_>>();
        match self {
            Geometry::Point(pt) => Geometry::Point(f(pt)),
            Geometry::MultiPoint(pts) => Geometry::MultiPoint(map_pts(pts)),
            Geometry::LineString(pts) => Geometry::LineString(map_pts(pts)),
            Geometry::MultiLineString(lines) => {
                Geometry::MultiLineString(lines.iter().map(|l| map_pts(l)).collect())
            }
            Geometry::Polygon(poly) => Geometry::Polygon(Polygon {
                shell: map_pts(&poly.shell),
                holes: poly.holes.iter().map(|h| map_pts(h)).collect(),
            }),
            Geometry::MultiPolygon(polys) => Geometry::MultiPolygon(
                polys
                    .iter()
                    .map(|poly| Polygon {
                        shell: map_pts(&poly.shell),
                        holes: poly.holes.iter().map(|h| map_pts(h)).collect(),
                    })
                    .collect(),
            ),
            Geometry::Collection(geoms) => {
                Geometry::Collection(geoms.iter().map(|g| g.map_coords(f)).collect())
            }
        }
    }

    /// All polygon components, in order.
    #[must_use]
    pub fn polygons(&self) -> Vec<&Polygon> {
        match self {
            Geometry::Polygon(poly) => vec![poly],
            Geometry::MultiPolygon(polys) => polys.iter().collect(),
            Geometry::Collection(geoms) => geoms.iter().flat_map(Geometry::polygons).collect(),
            _ => vec![],
        }
    }

    /// All line components, in order.
    #[must_use]
    pub fn lines(&self) -> Vec<&Vec<Point2>> {
        match self {
            Geometry::LineString(pts) => vec![pts],
            Geometry::MultiLineString(lines) => lines.iter().collect(),
            Geometry::Collection(geoms) => geoms.iter().flat_map(Geometry::lines).collect(),
            _ => vec![],
        }
    }

    /// All point components, in order.
    #[must_use]
    pub fn points(&self) -> Vec<Point2> {
        match self {
            Geometry::Point(pt) => vec![*pt],
            Geometry::MultiPoint(pts) => pts.clone(),
            Geometry::Collection(geoms) => geoms.iter().flat_map(Geometry::points).collect(),
            _ => vec![],
        }
    }

    /// Tests whether every component is puntal.
    #[must_use]
    pub fn is_puntal(&self) -> bool {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => true,
            Geometry::Collection(geoms) => {
                !geoms.is_empty() && geoms.iter().all(Geometry::is_puntal)
            }
            _ => false,
        }
    }

    /// Canonical form for geometry comparison: shells counter-clockwise,
    /// holes clockwise, rings rotated to their leftmost-lowest vertex,
    /// components sorted deterministically.
    #[must_use]
    pub fn normalize(&self) -> Geometry {
        match self {
            Geometry::Point(_) => self.clone(),
            Geometry::MultiPoint(pts) => {
                let mut pts = pts.clone();
                sort_points(&mut pts);
                Geometry::MultiPoint(pts)
            }
            Geometry::LineString(pts) => Geometry::LineString(normalize_line(pts)),
            Geometry::MultiLineString(lines) => {
                let mut lines: Vec<_> = lines.iter().map(|l| normalize_line(l)).collect();
                lines.sort_by(|a, b| compare_point_seqs(a, b));
                Geometry::MultiLineString(lines)
            }
            Geometry::Polygon(poly) => Geometry::Polygon(normalize_polygon(poly)),
            Geometry::MultiPolygon(polys) => {
                let mut polys: Vec<_> = polys.iter().map(normalize_polygon).collect();
                polys.sort_by(|a, b| compare_point_seqs(&a.shell, &b.shell));
                Geometry::MultiPolygon(polys)
            }
            Geometry::Collection(geoms) => {
                let mut geoms: Vec<_> = geoms.iter().map(Geometry::normalize).collect();
                geoms.sort_by_key(|g| -g.dimension());
                Geometry::Collection(geoms)
            }
        }
    }
}

fn sort_points(pts: &mut [Point2]) {
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y)));
}

fn compare_points(a: &Point2, b: &Point2) -> std::cmp::Ordering {
    a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y))
}

fn compare_point_seqs(a: &[Point2], b: &[Point2]) -> std::cmp::Ordering {
    for (pa, pb) in a.iter().zip(b.iter()) {
        let c = compare_points(pa, pb);
        if c != std::cmp::Ordering::Equal {
            return c;
        }
    }
    a.len().cmp(&b.len())
}

fn normalize_line(pts: &[Point2]) -> Vec<Point2> {
    let mut pts = pts.to_vec();
    if let (Some(first), Some(last)) = (pts.first(), pts.last()) {
        if compare_points(last, first) == std::cmp::Ordering::Less {
            pts.reverse();
        }
    }
    pts
}

fn normalize_ring(ring: &[Point2], ccw: bool) -> Vec<Point2> {
    let mut ring = ring.to_vec();
    if polygon_2d::is_ccw(&ring) != ccw {
        ring.reverse();
    }
    polygon_2d::rotate_to_canonical_start(&ring)
}

fn normalize_polygon(poly: &Polygon) -> Polygon {
    let shell = normalize_ring(&poly.shell, true);
    let mut holes: Vec<_> = poly.holes.iter().map(|h| normalize_ring(h, false)).collect();
    holes.sort_by(|a, b| compare_point_seqs(a, b));
    Polygon { shell, holes }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn unit_square() -> Polygon {
        Polygon::new(
            vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)],
            vec![],
        )
    }

    #[test]
    fn polygon_new_closes_rings() {
        let poly = unit_square();
        assert_eq!(poly.shell.len(), 5);
        assert_eq!(poly.shell[0], poly.shell[4]);
    }

    #[test]
    fn dimensions() {
        assert_eq!(Geometry::Point(p(0.0, 0.0)).dimension(), 0);
        assert_eq!(Geometry::LineString(vec![]).dimension(), 1);
        assert_eq!(Geometry::Polygon(unit_square()).dimension(), 2);
        assert_eq!(Geometry::Collection(vec![]).dimension(), -1);
        let mixed = Geometry::Collection(vec![
            Geometry::Point(p(0.0, 0.0)),
            Geometry::Polygon(unit_square()),
        ]);
        assert_eq!(mixed.dimension(), 2);
    }

    #[test]
    fn area_with_hole() {
        let poly = Polygon::new(
            vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)],
            vec![vec![p(1.0, 1.0), p(1.0, 2.0), p(2.0, 2.0), p(2.0, 1.0)]],
        );
        assert!((poly.area() - 15.0).abs() < 1e-12);
    }

    #[test]
    fn empty_checks() {
        assert!(Geometry::MultiPoint(vec![]).is_empty());
        assert!(Geometry::LineString(vec![]).is_empty());
        assert!(Geometry::Collection(vec![]).is_empty());
        assert!(!Geometry::Point(p(1.0, 1.0)).is_empty());
    }

    #[test]
    fn normalize_is_orientation_invariant() {
        let ccw = unit_square();
        let mut shell_rev = ccw.shell.clone();
        shell_rev.reverse();
        let cw = Polygon::new(shell_rev, vec![]);
        assert_eq!(
            Geometry::Polygon(ccw).normalize(),
            Geometry::Polygon(cw).normalize()
        );
    }

    #[test]
    fn map_coords_translates() {
        let g = Geometry::Polygon(unit_square());
        let moved = g.map_coords(&|pt| p(pt.x + 10.0, pt.y));
        let env = moved.envelope();
        assert!((env.min_x - 10.0).abs() < f64::EPSILON);
        assert!((env.max_x - 11.0).abs() < f64::EPSILON);
    }
}
