use super::graph::{EdgeId, OverlayGraph};
use crate::error::{Result, TopologyError};
use crate::geometry::{locate, Envelope, Location, Polygon};
use crate::math::{polygon_2d, Point2};

/// A closed traversal of result-marked boundary edges.
#[derive(Debug)]
struct EdgeRing {
    pts: Vec<Point2>,
    is_hole: bool,
    env: Envelope,
    holes: Vec<usize>,
}

/// Assembles the marked result-area edges into polygons.
///
/// Result edges are first linked into maximal rings at every node, maximal
/// rings are decomposed into minimal (simple) rings, rings are classified
/// as shells or holes by orientation, and each hole is nested into the
/// smallest enclosing shell.
///
/// # Errors
///
/// Returns a topology error when ring linking or hole nesting fails; the
/// overlay controller treats this as retryable.
pub fn build_polygons(graph: &mut OverlayGraph) -> Result<Vec<Polygon>> {
    let result_edges = graph.result_area_edges();
    if result_edges.is_empty() {
        return Ok(vec![]);
    }

    for &edge in &result_edges {
        link_max_ring_at_node(graph, edge)?;
    }

    let max_rings = build_maximal_rings(graph, &result_edges)?;

    let mut rings: Vec<EdgeRing> = Vec::new();
    for (max_ring, start) in max_rings.into_iter().enumerate() {
        link_minimal_rings(graph, start, max_ring)?;
        collect_minimal_rings(graph, start, &mut rings)?;
    }

    assemble_polygons(rings)
}

/// Links result-area edges into maximal rings at one node.
///
/// Scanning CCW, each incoming result edge is linked to the next outgoing
/// result edge; an in-edge without a following out-edge is a topology
/// failure.
fn link_max_ring_at_node(graph: &mut OverlayGraph, node_edge: EdgeId) -> Result<()> {
    // The node edge is an out-edge, so start at the next edge and make it
    // the last one to be linked.
    let end_out = graph.next_around(node_edge);
    let mut curr_out = end_out;
    let mut curr_result_in: Option<EdgeId> = None;
    let mut linking = false;

    loop {
        // An already-linked in-edge means this node was processed.
        if let Some(in_edge) = curr_result_in {
            if graph.edge(in_edge).next_result_max.is_some() {
                return Ok(());
            }
        }

        if linking {
            if graph.edge(curr_out).in_result_area {
                if let Some(in_edge) = curr_result_in {
                    graph.edge_mut(in_edge).next_result_max = Some(curr_out);
                }
                linking = false;
            }
        } else {
            let curr_in = graph.sym(curr_out);
            if graph.edge(curr_in).in_result_area {
                curr_result_in = Some(curr_in);
                linking = true;
            }
        }

        curr_out = graph.next_around(curr_out);
        if curr_out == end_out {
            break;
        }
    }
    if linking {
        let at = graph.origin(node_edge);
        return Err(TopologyError::RingLinking { x: at.x, y: at.y }.into());
    }
    Ok(())
}

/// Walks the maximal-ring links, assigning a ring id to every result edge.
/// Returns one start edge per maximal ring.
fn build_maximal_rings(graph: &mut OverlayGraph, result_edges: &[EdgeId]) -> Result<Vec<EdgeId>> {
    let mut starts = Vec::new();
    for &start in result_edges {
        if graph.edge(start).max_ring.is_some() {
            continue;
        }
        let max_ring = starts.len();
        starts.push(start);

        let mut e = start;
        loop {
            if graph.edge(e).max_ring == Some(max_ring) {
                let at = graph.origin(e);
                return Err(TopologyError::Failed(format!(
                    "ring edge visited twice at ({}, {})",
                    at.x, at.y
                ))
                .into());
            }
            graph.edge_mut(e).max_ring = Some(max_ring);
            let Some(next) = graph.edge(e).next_result_max else {
                let at = graph.dest(e);
                return Err(TopologyError::RingLinking { x: at.x, y: at.y }.into());
            };
            e = next;
            if e == start {
                break;
            }
        }
    }
    Ok(starts)
}

/// Re-links the edges of one maximal ring into minimal rings at each of its
/// nodes, so self-touching maximal rings split into simple rings.
fn link_minimal_rings(graph: &mut OverlayGraph, start: EdgeId, max_ring: usize) -> Result<()> {
    let mut e = start;
    loop {
        link_min_ring_edges_at_node(graph, e, max_ring)?;
        e = next_max(graph, e)?;
        if e == start {
            break;
        }
    }
    Ok(())
}

fn link_min_ring_edges_at_node(
    graph: &mut OverlayGraph,
    node_edge: EdgeId,
    max_ring: usize,
) -> Result<()> {
    // The node edge is an out-edge, so it is the first candidate to pair
    // with the next CCW in-edge of the same maximal ring.
    let end_out = node_edge;
    let mut curr_max_ring_out = Some(node_edge);
    let mut curr_out = graph.next_around(node_edge);

    loop {
        let curr_in = graph.sym(curr_out);
        if graph.edge(curr_in).max_ring == Some(max_ring)
            && graph.edge(curr_in).next_result.is_some()
        {
            // Node already linked for this ring.
            return Ok(());
        }

        curr_max_ring_out = match curr_max_ring_out {
            None => {
                if graph.edge(curr_out).max_ring == Some(max_ring) {
                    Some(curr_out)
                } else {
                    None
                }
            }
            Some(max_out) => {
                if graph.edge(curr_in).max_ring == Some(max_ring) {
                    graph.edge_mut(curr_in).next_result = Some(max_out);
                    None
                } else {
                    Some(max_out)
                }
            }
        };

        curr_out = graph.next_around(curr_out);
        if curr_out == end_out {
            break;
        }
    }
    if curr_max_ring_out.is_some() {
        let at = graph.origin(node_edge);
        return Err(TopologyError::Failed(format!(
            "unmatched edge during ring linking at ({}, {})",
            at.x, at.y
        ))
        .into());
    }
    Ok(())
}

fn next_max(graph: &OverlayGraph, e: EdgeId) -> Result<EdgeId> {
    graph.edge(e).next_result_max.ok_or_else(|| {
        let at = graph.dest(e);
        TopologyError::RingLinking { x: at.x, y: at.y }.into()
    })
}

/// Builds the minimal rings of one maximal ring.
fn collect_minimal_rings(
    graph: &mut OverlayGraph,
    start: EdgeId,
    rings: &mut Vec<EdgeRing>,
) -> Result<()> {
    let mut e = start;
    loop {
        if graph.edge(e).ring.is_none() {
            build_ring(graph, e, rings)?;
        }
        e = next_max(graph, e)?;
        if e == start {
            break;
        }
    }
    Ok(())
}

fn build_ring(graph: &mut OverlayGraph, start: EdgeId, rings: &mut Vec<EdgeRing>) -> Result<()> {
    let ring_id = rings.len();
    let mut pts: Vec<Point2> = Vec::new();
    let mut e = start;
    loop {
        if graph.edge(e).ring == Some(ring_id) {
            let at = graph.origin(e);
            return Err(TopologyError::Failed(format!(
                "edge visited twice during ring building at ({}, {})",
                at.x, at.y
            ))
            .into());
        }
        graph.add_coordinates(e, &mut pts);
        graph.edge_mut(e).ring = Some(ring_id);
        let Some(next) = graph.edge(e).next_result else {
            let at = graph.dest(e);
            return Err(TopologyError::RingLinking { x: at.x, y: at.y }.into());
        };
        e = next;
        if e == start {
            break;
        }
    }
    // Close the ring.
    if let Some(first) = pts.first().copied() {
        if pts.last() != Some(&first) {
            pts.push(first);
        }
    }
    let is_hole = polygon_2d::is_ccw(&pts);
    let env = Envelope::of_points(&pts);
    rings.push(EdgeRing {
        pts,
        is_hole,
        env,
        holes: vec![],
    });
    Ok(())
}

/// Nests hole rings into their smallest enclosing shells and emits one
/// polygon per shell.
fn assemble_polygons(mut rings: Vec<EdgeRing>) -> Result<Vec<Polygon>> {
    let shell_ids: Vec<usize> = (0..rings.len()).filter(|&i| !rings[i].is_hole).collect();
    let hole_ids: Vec<usize> = (0..rings.len()).filter(|&i| rings[i].is_hole).collect();

    for &hole in &hole_ids {
        let shell = find_enclosing_shell(&rings, &shell_ids, hole)?;
        rings[shell].holes.push(hole);
    }

    let mut polygons = Vec::with_capacity(shell_ids.len());
    for &shell in &shell_ids {
        let holes = rings[shell]
            .holes
            .clone()
            .into_iter()
            .map(|h| std::mem::take(&mut rings[h].pts))
            .collect();
        let shell_pts = std::mem::take(&mut rings[shell].pts);
        polygons.push(Polygon {
            shell: shell_pts,
            holes,
        });
    }
    Ok(polygons)
}

/// Finds the smallest shell properly containing a hole, by envelope
/// containment plus a point-in-ring test on a vertex not shared with the
/// candidate shell.
fn find_enclosing_shell(rings: &[EdgeRing], shell_ids: &[usize], hole: usize) -> Result<usize> {
    let hole_env = rings[hole].env;
    let mut min_shell: Option<usize> = None;

    for &shell in shell_ids {
        let shell_env = rings[shell].env;
        // The hole envelope cannot equal the shell envelope.
        if shell_env == hole_env {
            continue;
        }
        if !shell_env.contains(&hole_env) {
            continue;
        }
        let test_pt = polygon_2d::point_not_in_ring(&rings[hole].pts, &rings[shell].pts);
        if locate::locate_in_ring(&test_pt, &rings[shell].pts) == Location::Exterior {
            continue;
        }
        let smaller = match min_shell {
            None => true,
            Some(m) => rings[m].env.contains(&shell_env),
        };
        if smaller {
            min_shell = Some(shell);
        }
    }
    min_shell.ok_or_else(|| {
        let at = rings[hole].pts[0];
        TopologyError::HoleNesting { x: at.x, y: at.y }.into()
    })
}
