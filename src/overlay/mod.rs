pub mod edge;
pub mod edge_builder;
pub mod graph;
pub mod input;
pub mod label;
pub mod labeller;
pub mod line_builder;
pub mod point_builder;
pub mod points;
pub mod polygon_builder;
pub mod robust;
pub mod util;

pub use robust::overlay;

use crate::error::{Result, TopologyError};
use crate::geometry::{factory, Geometry, Location};
use crate::noding::{Noder, SnapRoundingNoder};
use crate::precision::PrecisionModel;
use graph::OverlayGraph;
use input::InputGeometry;

/// The set-theoretic operation to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayOp {
    Intersection,
    Union,
    Difference,
    SymDifference,
}

/// The boolean overlay rule: evaluates whether a point with the given
/// locations in each input belongs to the result. Boundary promotes to
/// interior (boundary points are part of a geometry).
#[must_use]
pub fn is_result_of_op(op: OverlayOp, loc0: Location, loc1: Location) -> bool {
    let in0 = loc0 != Location::Exterior;
    let in1 = loc1 != Location::Exterior;
    match op {
        OverlayOp::Intersection => in0 && in1,
        OverlayOp::Union => in0 || in1,
        OverlayOp::Difference => in0 && !in1,
        OverlayOp::SymDifference => in0 != in1,
    }
}

/// Computes an overlay under an explicit precision model.
///
/// A floating model runs the full robustness retry chain; a fixed model
/// runs the snap-rounding pipeline directly at that precision.
///
/// # Errors
///
/// Returns a topology error only after every applicable strategy fails, an
/// invalid-input error immediately for malformed inputs.
pub fn overlay_with(
    a: &Geometry,
    b: &Geometry,
    op: OverlayOp,
    pm: &PrecisionModel,
) -> Result<Geometry> {
    if pm.is_floating() {
        robust::overlay(a, b, op)
    } else {
        overlay_single(a, b, op, pm, &SnapRoundingNoder::new(*pm))
    }
}

/// One attempt of the full pipeline under one precision model and noder.
pub(crate) fn overlay_single(
    a: &Geometry,
    b: &Geometry,
    op: OverlayOp,
    pm: &PrecisionModel,
    noder: &dyn Noder,
) -> Result<Geometry> {
    if util::is_empty_result(op, a, b, pm) {
        return Ok(util::create_empty_result(op, a, b));
    }
    if a.is_puntal() && b.is_puntal() {
        return Ok(points::overlay_points(op, a, b, pm));
    }
    if a.is_puntal() || b.is_puntal() {
        return Ok(points::overlay_mixed_points(op, a, b, pm));
    }
    compute_edge_overlay(a, b, op, pm, noder)
}

/// The edge pipeline: node, build graph, label, extract result.
fn compute_edge_overlay(
    a: &Geometry,
    b: &Geometry,
    op: OverlayOp,
    pm: &PrecisionModel,
    noder: &dyn Noder,
) -> Result<Geometry> {
    let mut input = InputGeometry::new(a, b);
    let clip_env = util::clipping_envelope(op, &input, pm);

    let noded = edge_builder::build(a, b, clip_env.as_ref(), noder)?;
    input.set_collapsed(0, !noded.has_edges[0]);
    input.set_collapsed(1, !noded.has_edges[1]);

    let mut graph = OverlayGraph::new();
    for edge in noded.edges {
        let label = edge.to_label();
        graph.add_edge(edge.into_points(), label);
    }

    labeller::compute_labelling(&mut graph, &input)?;
    labeller::mark_result_area_edges(&mut graph, op);
    labeller::unmark_duplicate_result_area_edges(&mut graph);

    let polygons = polygon_builder::build_polygons(&mut graph)?;
    let has_result_area = !polygons.is_empty();
    let lines = line_builder::build_lines(&mut graph, &input, op, has_result_area);
    let points = if op == OverlayOp::Intersection {
        point_builder::build_points(&graph)
    } else {
        vec![]
    };

    if polygons.is_empty() && lines.is_empty() && points.is_empty() {
        return Ok(util::create_empty_result(op, a, b));
    }
    let result = factory::build_geometry(polygons, lines, points);

    // Heuristic guard against noding moving a vertex far enough to invert
    // part of the topology graph.
    if pm.is_floating() && !util::is_result_area_consistent(a, b, op, &result) {
        return Err(TopologyError::AreaInconsistent.into());
    }
    Ok(result)
}
