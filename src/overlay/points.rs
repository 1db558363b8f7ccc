use super::util;
use super::OverlayOp;
use crate::geometry::{factory, locate, Geometry, Location};
use crate::math::Point2;
use crate::precision::PrecisionModel;

/// Overlay of two puntal geometries.
///
/// Points are snapped to the precision model and deduplicated by
/// coordinate; the operation then reduces to set algebra on coordinates.
#[must_use]
pub fn overlay_points(
    op: OverlayOp,
    a: &Geometry,
    b: &Geometry,
    pm: &PrecisionModel,
) -> Geometry {
    let pts_a = unique_points(a, pm);
    let pts_b = unique_points(b, pm);

    let result: Vec<Point2> = match op {
        OverlayOp::Intersection => pts_a
            .iter()
            .copied()
            .filter(|pt| pts_b.contains(pt))
            .collect(),
        OverlayOp::Union => {
            let mut all = pts_a.clone();
            all.extend(pts_b.iter().copied().filter(|pt| !pts_a.contains(pt)));
            all
        }
        OverlayOp::Difference => pts_a
            .iter()
            .copied()
            .filter(|pt| !pts_b.contains(pt))
            .collect(),
        OverlayOp::SymDifference => {
            let mut sym: Vec<Point2> = pts_a
                .iter()
                .copied()
                .filter(|pt| !pts_b.contains(pt))
                .collect();
            sym.extend(pts_b.iter().copied().filter(|pt| !pts_a.contains(pt)));
            sym
        }
    };
    point_result(result)
}

/// Overlay of a puntal geometry with a lineal or areal one.
#[must_use]
pub fn overlay_mixed_points(
    op: OverlayOp,
    a: &Geometry,
    b: &Geometry,
    pm: &PrecisionModel,
) -> Geometry {
    let point_is_a = a.dimension() == 0;
    let (point_geom, other) = if point_is_a { (a, b) } else { (b, a) };

    let result_dim = util::result_dimension(op, a.dimension(), b.dimension());
    // The non-point geometry only needs conditioning when it appears in the
    // output.
    let other = if result_dim == 0 || pm.is_floating() {
        other.clone()
    } else {
        other.map_coords(&|pt| pm.make_precise_point(pt))
    };
    let coords = unique_points(point_geom, pm);

    match op {
        OverlayOp::Intersection => point_result(
            coords
                .into_iter()
                .filter(|pt| is_covered(pt, &other))
                .collect(),
        ),
        OverlayOp::Union | OverlayOp::SymDifference => {
            let free: Vec<Point2> = coords
                .into_iter()
                .filter(|pt| !is_covered(pt, &other))
                .collect();
            let polys = other
                .polygons()
                .into_iter()
                .filter(|poly| !poly.is_empty())
                .cloned()
                .collect();
            let lines = other
                .lines()
                .into_iter()
                .filter(|line| line.len() >= 2)
                .cloned()
                .collect();
            factory::build_geometry(polys, lines, free)
        }
        OverlayOp::Difference => {
            if point_is_a {
                point_result(
                    coords
                        .into_iter()
                        .filter(|pt| !is_covered(pt, &other))
                        .collect(),
                )
            } else {
                // Subtracting points from a line or area changes nothing.
                other
            }
        }
    }
}

fn is_covered(pt: &Point2, other: &Geometry) -> bool {
    let loc = if other.dimension() == 2 {
        locate::locate_point_in_area(pt, other)
    } else {
        locate::locate_point_on_line(pt, other)
    };
    loc != Location::Exterior
}

fn unique_points(geom: &Geometry, pm: &PrecisionModel) -> Vec<Point2> {
    let mut pts: Vec<Point2> = geom
        .points()
        .iter()
        .map(|pt| pm.make_precise_point(pt))
        .collect();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y)));
    pts.dedup();
    pts
}

fn point_result(pts: Vec<Point2>) -> Geometry {
    if pts.is_empty() {
        factory::create_empty(0)
    } else {
        factory::build_geometry(vec![], vec![], pts)
    }
}
