use super::graph::{EdgeId, OverlayGraph};
use crate::math::Point2;

/// Extracts zero-dimensional intersection results.
///
/// A node contributes a result point when linework of both inputs meets
/// there but no incident edge made it into the result: the geometries touch
/// at the node and nowhere around it.
#[must_use]
pub fn build_points(graph: &OverlayGraph) -> Vec<Point2> {
    let mut points = Vec::new();
    for node in graph.node_representatives() {
        if is_result_point(graph, node) {
            points.push(graph.origin(node));
        }
    }
    points
}

fn is_result_point(graph: &OverlayGraph, node_edge: EdgeId) -> bool {
    let mut is_edge_of_a = false;
    let mut is_edge_of_b = false;
    let mut e = node_edge;
    loop {
        if graph.is_in_result(e) {
            return false;
        }
        let label = graph.label(e);
        is_edge_of_a |= label.is_known(0);
        is_edge_of_b |= label.is_known(1);
        e = graph.next_around(e);
        if e == node_edge {
            break;
        }
    }
    is_edge_of_a && is_edge_of_b
}
