use super::{Geometry, Polygon};
use crate::math::Point2;

/// Builds the most specific geometry for a set of result components.
///
/// Components are emitted in dimensional order: polygons, then lines, then
/// points. A single homogeneous component collapses to its scalar type; a
/// heterogeneous result becomes a collection.
#[must_use]
pub fn build_geometry(
    mut polygons: Vec<Polygon>,
    mut lines: Vec<Vec<Point2>>,
    points: Vec<Point2>,
) -> Geometry {
    let kinds = usize::from(!polygons.is_empty())
        + usize::from(!lines.is_empty())
        + usize::from(!points.is_empty());

    if kinds > 1 {
        let mut geoms = Vec::new();
        geoms.extend(polygons.into_iter().map(Geometry::Polygon));
        geoms.extend(lines.into_iter().map(Geometry::LineString));
        geoms.extend(points.into_iter().map(Geometry::Point));
        return Geometry::Collection(geoms);
    }

    if let [poly] = &mut polygons[..] {
        return Geometry::Polygon(std::mem::replace(
            poly,
            Polygon {
                shell: vec![],
                holes: vec![],
            },
        ));
    }
    if !polygons.is_empty() {
        return Geometry::MultiPolygon(polygons);
    }
    if let [line] = &mut lines[..] {
        return Geometry::LineString(std::mem::take(line));
    }
    if !lines.is_empty() {
        return Geometry::MultiLineString(lines);
    }
    match points[..] {
        [] => Geometry::Collection(vec![]),
        [pt] => Geometry::Point(pt),
        _ => Geometry::MultiPoint(points),
    }
}

/// Creates the empty geometry of a given dimension.
///
/// Dimension -1 (inputs of unknown dimension) yields an empty collection.
#[must_use]
pub fn create_empty(dimension: i8) -> Geometry {
    match dimension {
        0 => Geometry::MultiPoint(vec![]),
        1 => Geometry::LineString(vec![]),
        2 => Geometry::Polygon(Polygon {
            shell: vec![],
            holes: vec![],
        }),
        _ => Geometry::Collection(vec![]),
    }
}
