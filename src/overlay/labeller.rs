use std::collections::VecDeque;

use super::graph::{EdgeId, OverlayGraph};
use super::input::InputGeometry;
use super::label::Position;
use super::{is_result_of_op, OverlayOp};
use crate::error::{InternalError, Result, TopologyError};
use crate::geometry::Location;

/// Resolves every unknown location in the graph's labels.
///
/// Stages, applied per input geometry:
/// 1. boundary propagation around each node;
/// 2. linear propagation across connected edges;
/// 3. collapse resolution from source ring role, then linear propagation
///    again to spread the recovered locations;
/// 4. point-in-area fallback for edges disconnected from all of a
///    geometry's linework.
///
/// # Errors
///
/// Returns a topology error on a side location conflict, and an internal
/// error if any location is still unknown afterwards (a logic defect, never
/// retried).
pub fn compute_labelling(graph: &mut OverlayGraph, input: &InputGeometry) -> Result<()> {
    let nodes = graph.node_representatives();
    for &node in &nodes {
        propagate_area_locations(graph, input, node, 0)?;
        if input.has_edges(1) {
            propagate_area_locations(graph, input, node, 1)?;
        }
    }
    label_connected_linear_edges(graph, input);

    // Collapsed edges still unknown here are disconnected from the area
    // edges of their parent; their ring role determines their location.
    label_collapsed_edges(graph);
    label_connected_linear_edges(graph, input);

    label_disconnected_edges(graph, input);
    verify_labelling(graph)
}

/// Propagates boundary side locations around one node for one geometry.
///
/// Scanning incident edges in CCW order, the sector between two consecutive
/// edges has a constant location: the left side of one boundary edge is the
/// right side of the next. Non-boundary edges inside a sector take the
/// sector's location as their on-line location.
fn propagate_area_locations(
    graph: &mut OverlayGraph,
    input: &InputGeometry,
    node_edge: EdgeId,
    geom_index: usize,
) -> Result<()> {
    if !input.is_area(geom_index) {
        return Ok(());
    }
    // A degree-1 node has no sectors to propagate across.
    if graph.degree(node_edge) == 1 {
        return Ok(());
    }

    let Some(start) = find_propagation_start(graph, node_edge, geom_index) else {
        return Ok(());
    };

    let mut curr_loc = graph
        .label(start)
        .location(geom_index, Position::Left, graph.is_forward(start))
        .ok_or_else(|| InternalError::Invariant("boundary edge without side locations".into()))?;

    let mut e = graph.next_around(start);
    while e != start {
        let forward = graph.is_forward(e);
        let label = graph.label(e);
        if label.is_boundary(geom_index) {
            let loc_right = label.location(geom_index, Position::Right, forward);
            if loc_right != Some(curr_loc) {
                let at = graph.origin(e);
                return Err(TopologyError::SideLocationConflict { x: at.x, y: at.y }.into());
            }
            curr_loc = label
                .location(geom_index, Position::Left, forward)
                .ok_or_else(|| {
                    InternalError::Invariant("boundary edge with single null side".into())
                })?;
        } else {
            graph.label_mut(e).set_location_line(geom_index, curr_loc);
        }
        e = graph.next_around(e);
    }
    Ok(())
}

fn find_propagation_start(
    graph: &OverlayGraph,
    node_edge: EdgeId,
    geom_index: usize,
) -> Option<EdgeId> {
    let mut e = node_edge;
    loop {
        if graph.label(e).is_boundary(geom_index) && graph.label(e).has_sides(geom_index) {
            return Some(e);
        }
        e = graph.next_around(e);
        if e == node_edge {
            return None;
        }
    }
}

fn label_collapsed_edges(graph: &mut OverlayGraph) {
    for id in graph.edge_ids() {
        for geom_index in 0..2 {
            let label = graph.label(id);
            if label.is_line_location_unknown(geom_index) && label.is_collapse(geom_index) {
                graph.label_mut(id).set_location_collapse(geom_index);
            }
        }
    }
}

fn label_connected_linear_edges(graph: &mut OverlayGraph, input: &InputGeometry) {
    propagate_linear_locations(graph, input, 0);
    if input.has_edges(1) {
        propagate_linear_locations(graph, input, 1);
    }
}

/// Spreads known on-line locations across transitively connected edges.
fn propagate_linear_locations(graph: &mut OverlayGraph, input: &InputGeometry, geom_index: usize) {
    let mut stack: VecDeque<EdgeId> = graph
        .edge_ids()
        .into_iter()
        .filter(|&id| {
            let label = graph.label(id);
            label.is_linear(geom_index) && !label.is_line_location_unknown(geom_index)
        })
        .collect();
    if stack.is_empty() {
        return;
    }
    let is_input_line = input.is_line(geom_index);

    while let Some(edge) = stack.pop_front() {
        let Some(line_loc) = graph.label(edge).line_location(geom_index) else {
            continue;
        };
        // A line input has no interior off its own linework, so only
        // exterior locations propagate across nodes.
        if is_input_line && line_loc != Location::Exterior {
            continue;
        }
        let mut e = graph.next_around(edge);
        while e != edge {
            if graph.label(e).is_line_location_unknown(geom_index) {
                graph.label_mut(e).set_location_line(geom_index, line_loc);
                // Continue the traversal from the far end of the edge.
                stack.push_front(graph.sym(e));
            }
            e = graph.next_around(e);
        }
    }
}

/// Resolves edges disjoint from all of a geometry's linework.
///
/// For an areal input the location is found with a point-in-area test
/// against the original, unreduced geometry, checking both endpoints to
/// guard against precision-collapse artifacts. Otherwise the edge must be
/// exterior.
fn label_disconnected_edges(graph: &mut OverlayGraph, input: &InputGeometry) {
    for id in graph.edge_ids() {
        for geom_index in 0..2 {
            if !graph.label(id).is_line_location_unknown(geom_index) {
                continue;
            }
            let loc = if input.is_area(geom_index) {
                let loc_orig = input.locate_point_in_area(geom_index, &graph.origin(id));
                let loc_dest = input.locate_point_in_area(geom_index, &graph.dest(id));
                if loc_orig != Location::Exterior && loc_dest != Location::Exterior {
                    Location::Interior
                } else {
                    Location::Exterior
                }
            } else {
                Location::Exterior
            };
            graph.label_mut(id).set_location_all(geom_index, loc);
        }
    }
}

fn verify_labelling(graph: &OverlayGraph) -> Result<()> {
    for id in graph.edge_ids() {
        let label = graph.label(id);
        for geom_index in 0..2 {
            if label.is_line_location_unknown(geom_index) {
                let at = graph.origin(id);
                return Err(InternalError::UnresolvedLabel { x: at.x, y: at.y }.into());
            }
        }
    }
    Ok(())
}

/// Marks edges whose right side satisfies the operation as result-area
/// edges.
pub fn mark_result_area_edges(graph: &mut OverlayGraph, op: OverlayOp) {
    for id in graph.edge_ids() {
        let forward = graph.is_forward(id);
        let label = graph.label(id);
        if !label.is_boundary_either() {
            continue;
        }
        let loc_a = label
            .location_boundary_or_line(0, Position::Right, forward)
            .unwrap_or(Location::Exterior);
        let loc_b = label
            .location_boundary_or_line(1, Position::Right, forward)
            .unwrap_or(Location::Exterior);
        if is_result_of_op(op, loc_a, loc_b) {
            graph.mark_in_result_area(id);
        }
    }
}

/// Where both halves of a pair are marked, the result areas on either side
/// merge across the edge: unmark both so no internal crack survives.
pub fn unmark_duplicate_result_area_edges(graph: &mut OverlayGraph) {
    for id in graph.edge_ids() {
        let sym = graph.sym(id);
        if graph.edge(id).in_result_area && graph.edge(sym).in_result_area {
            graph.edge_mut(id).in_result_area = false;
            graph.edge_mut(sym).in_result_area = false;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Geometry, Polygon};
    use crate::math::Point2;
    use crate::overlay::edge::{merge_edges, Edge, SourceInfo};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    /// Builds a labelled graph for one CCW unit-square input polygon plus a
    /// disjoint line from the other input.
    #[test]
    fn disconnected_line_inside_area_is_labelled_interior() {
        let square = Geometry::Polygon(Polygon::new(
            vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)],
            vec![],
        ));
        let line = Geometry::LineString(vec![p(2.0, 2.0), p(8.0, 8.0)]);
        let input = InputGeometry::new(&square, &line);

        let mut graph = OverlayGraph::new();
        let ring = vec![
            p(0.0, 0.0),
            p(10.0, 0.0),
            p(10.0, 10.0),
            p(0.0, 10.0),
            p(0.0, 0.0),
        ];
        // CCW ring: interior on the left, depth delta -1.
        let ring_edges = merge_edges(vec![Edge::new(ring, &SourceInfo::ring(0, -1, false))]);
        for edge in ring_edges {
            let label = edge.to_label();
            graph.add_edge(edge.into_points(), label);
        }
        let line_edge = Edge::new(vec![p(2.0, 2.0), p(8.0, 8.0)], &SourceInfo::line(1));
        let label = line_edge.to_label();
        let line_id = graph.add_edge(line_edge.into_points(), label);

        compute_labelling(&mut graph, &input).unwrap();

        // The disconnected line lies inside input 0's area.
        assert_eq!(
            graph.label(line_id).line_location(0),
            Some(Location::Interior)
        );
        // Input 1 is a line; nothing else of it exists, so the ring edge is
        // exterior to it.
        let ring_id = graph.edge_ids()[0];
        assert_eq!(
            graph.label(ring_id).line_location(1),
            Some(Location::Exterior)
        );
    }
}
