use crate::geometry::{locate, Geometry, Location};
use crate::math::Point2;

/// Per-call record of the two overlay inputs.
///
/// Tracks each input's dimension and whether it collapsed completely under
/// the current precision (produced no edges), and answers the point-in-area
/// queries of the labeller's disconnected-edge fallback against the
/// original, unreduced geometry.
#[derive(Debug)]
pub struct InputGeometry<'a> {
    geoms: [&'a Geometry; 2],
    collapsed: [bool; 2],
}

impl<'a> InputGeometry<'a> {
    #[must_use]
    pub fn new(a: &'a Geometry, b: &'a Geometry) -> Self {
        Self {
            geoms: [a, b],
            collapsed: [false, false],
        }
    }

    #[must_use]
    pub fn geometry(&self, index: usize) -> &'a Geometry {
        self.geoms[index]
    }

    #[must_use]
    pub fn dimension(&self, index: usize) -> i8 {
        self.geoms[index].dimension()
    }

    #[must_use]
    pub fn is_area(&self, index: usize) -> bool {
        self.dimension(index) == 2
    }

    #[must_use]
    pub fn is_line(&self, index: usize) -> bool {
        self.dimension(index) == 1
    }

    /// Index of an areal input, preferring A, if any input is areal.
    #[must_use]
    pub fn area_index(&self) -> Option<usize> {
        if self.is_area(0) {
            Some(0)
        } else if self.is_area(1) {
            Some(1)
        } else {
            None
        }
    }

    /// Records whether an input produced any edges under the current
    /// precision. An input with no edges has collapsed completely.
    pub fn set_collapsed(&mut self, index: usize, collapsed: bool) {
        self.collapsed[index] = collapsed;
    }

    /// Whether the input contributed edges to the graph.
    #[must_use]
    pub fn has_edges(&self, index: usize) -> bool {
        !self.collapsed[index] && self.dimension(index) >= 1
    }

    /// Locates a point against the original input area.
    ///
    /// A collapsed or empty input has no interior anywhere.
    #[must_use]
    pub fn locate_point_in_area(&self, index: usize, pt: &Point2) -> Location {
        if self.collapsed[index] || self.geoms[index].is_empty() {
            return Location::Exterior;
        }
        locate::locate_point_in_area(pt, self.geoms[index])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square() -> Geometry {
        Geometry::Polygon(Polygon::new(
            vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)],
            vec![],
        ))
    }

    #[test]
    fn dimensions_and_area_index() {
        let a = square();
        let b = Geometry::LineString(vec![p(0.0, 0.0), p(1.0, 0.0)]);
        let input = InputGeometry::new(&a, &b);
        assert!(input.is_area(0));
        assert!(input.is_line(1));
        assert_eq!(input.area_index(), Some(0));
    }

    #[test]
    fn collapsed_input_has_no_interior() {
        let a = square();
        let b = square();
        let mut input = InputGeometry::new(&a, &b);
        assert_eq!(
            input.locate_point_in_area(0, &p(5.0, 5.0)),
            Location::Interior
        );
        input.set_collapsed(0, true);
        assert_eq!(
            input.locate_point_in_area(0, &p(5.0, 5.0)),
            Location::Exterior
        );
        assert!(!input.has_edges(0));
        assert!(input.has_edges(1));
    }
}
