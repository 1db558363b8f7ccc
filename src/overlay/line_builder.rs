use super::graph::{EdgeId, OverlayGraph};
use super::input::InputGeometry;
use super::label::OverlayLabel;
use super::{is_result_of_op, OverlayOp};
use crate::geometry::Location;
use crate::math::Point2;

/// Extracts the result lines from a labelled graph.
///
/// Result-line edges are walked into maximal chains starting and ending at
/// nodes of line-degree other than two, so true branch points stay distinct
/// lines; leftover closed loops are emitted as closed lines.
#[must_use]
pub fn build_lines(
    graph: &mut OverlayGraph,
    input: &InputGeometry,
    op: OverlayOp,
    has_result_area: bool,
) -> Vec<Vec<Point2>> {
    mark_result_lines(graph, input, op, has_result_area);

    let mut lines = Vec::new();
    // Chains anchored at nodes (line-degree 1 or >= 3).
    for id in graph.edge_ids() {
        if !graph.edge(id).in_result_line || graph.edge(id).visited {
            continue;
        }
        if degree_of_lines(graph, id) != 2 {
            lines.push(build_line(graph, id));
        }
    }
    // Whatever remains forms closed loops.
    for id in graph.edge_ids() {
        if !graph.edge(id).in_result_line || graph.edge(id).visited {
            continue;
        }
        lines.push(build_line(graph, id));
    }
    lines
}

fn mark_result_lines(
    graph: &mut OverlayGraph,
    input: &InputGeometry,
    op: OverlayOp,
    has_result_area: bool,
) {
    for id in graph.edge_ids() {
        // Linework already in the result area is not also a line.
        if graph.is_in_result_either(id) {
            continue;
        }
        if is_result_line(graph.label(id), input, op, has_result_area) {
            graph.mark_in_result_line(id);
        }
    }
}

fn is_result_line(
    label: &OverlayLabel,
    input: &InputGeometry,
    op: OverlayOp,
    has_result_area: bool,
) -> bool {
    // A boundary of a single geometry is only ever part of a result area.
    if label.is_boundary_singleton() {
        return false;
    }

    // A collapse along the other area's boundary is not output linework.
    if label.is_boundary_collapse() {
        return false;
    }

    // A collapse interior to its own parent (narrow gore or spike) vanishes.
    if label.is_interior_collapse() {
        return false;
    }

    if op != OverlayOp::Intersection {
        if label.is_collapse_and_not_part_interior() {
            return false;
        }
        // With a result area present, a line inside the input area is
        // covered by it. If line edges exist there is only one area input,
        // and the result area equals it.
        if has_result_area {
            if let Some(area_index) = input.area_index() {
                if label.is_line_in_area(area_index) {
                    return false;
                }
            }
        }
    }

    // Touching area boundaries produce a line in an intersection result.
    if op == OverlayOp::Intersection && label.is_boundary_touch() {
        return true;
    }

    let loc_a = effective_location(label, 0);
    let loc_b = effective_location(label, 1);
    is_result_of_op(op, loc_a, loc_b)
}

/// Location of an edge's line relative to one input, for the boolean rule.
///
/// A line edge is its own interior; a collapse edge uses its resolved
/// on-location, so a collapse lying in its parent's exterior does not
/// reappear as result linework.
fn effective_location(label: &OverlayLabel, index: usize) -> Location {
    if label.is_line(index) {
        return Location::Interior;
    }
    label.line_location(index).unwrap_or(Location::Exterior)
}

/// Number of result-line edges at the node of this half-edge.
fn degree_of_lines(graph: &OverlayGraph, node_edge: EdgeId) -> usize {
    let mut degree = 0;
    let mut e = node_edge;
    loop {
        if graph.edge(e).in_result_line {
            degree += 1;
        }
        e = graph.next_around(e);
        if e == node_edge {
            break;
        }
    }
    degree
}

/// Walks a maximal chain of result-line edges from a starting edge.
fn build_line(graph: &mut OverlayGraph, start: EdgeId) -> Vec<Point2> {
    let mut pts = vec![graph.origin(start)];
    let start_forward = graph.is_forward(start);

    let mut e = start;
    loop {
        graph.mark_visited_both(e);
        graph.add_coordinates(e, &mut pts);

        let far = graph.sym(e);
        // A node at the far end terminates the chain.
        if degree_of_lines(graph, far) != 2 {
            break;
        }
        // A visited continuation means the chain closed into a ring.
        let Some(next) = next_line_edge_unvisited(graph, far) else {
            break;
        };
        e = next;
    }

    if !start_forward {
        pts.reverse();
    }
    pts
}

fn next_line_edge_unvisited(graph: &OverlayGraph, node_edge: EdgeId) -> Option<EdgeId> {
    let mut e = node_edge;
    loop {
        e = graph.next_around(e);
        if e == node_edge {
            return None;
        }
        if graph.edge(e).visited {
            continue;
        }
        if graph.edge(e).in_result_line {
            return Some(e);
        }
    }
}
