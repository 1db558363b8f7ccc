use std::cmp::Ordering;
use std::collections::BTreeMap;

use slotmap::SlotMap;

use super::label::OverlayLabel;
use crate::math::orientation::compare_angular;
use crate::math::Point2;

slotmap::new_key_type! {
    /// Unique identifier for a half-edge in the overlay graph.
    pub struct EdgeId;
}

/// Coordinate key with a total order, for the node map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CoordKey {
    x: f64,
    y: f64,
}

impl CoordKey {
    fn new(pt: &Point2) -> Self {
        Self { x: pt.x, y: pt.y }
    }
}

impl Eq for CoordKey {}

impl PartialOrd for CoordKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CoordKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }
}

/// One direction of a noded edge.
///
/// The point sequence and label live in the pair record shared with the
/// symmetric twin; the half-edge holds only direction, linkage, and result
/// state.
#[derive(Debug)]
pub struct HalfEdge {
    pub(crate) pair: usize,
    pub(crate) forward: bool,
    pub(crate) orig: Point2,
    pub(crate) dir_pt: Point2,
    pub(crate) sym: EdgeId,
    /// Next half-edge counter-clockwise around the origin node.
    pub(crate) next: EdgeId,
    pub(crate) in_result_area: bool,
    pub(crate) in_result_line: bool,
    pub(crate) visited: bool,
    pub(crate) next_result: Option<EdgeId>,
    pub(crate) next_result_max: Option<EdgeId>,
    pub(crate) ring: Option<usize>,
    pub(crate) max_ring: Option<usize>,
}

/// The shared record of a symmetric half-edge pair.
#[derive(Debug)]
pub struct EdgePair {
    pub(crate) pts: Vec<Point2>,
    pub(crate) label: OverlayLabel,
}

/// Planar half-edge graph of the noded arrangement.
///
/// Half-edges live in an id-keyed arena; each node chains its incident
/// half-edges in counter-clockwise angular order, and a coordinate-sorted
/// map holds one representative half-edge per node.
#[derive(Debug, Default)]
pub struct OverlayGraph {
    edges: SlotMap<EdgeId, HalfEdge>,
    pairs: Vec<EdgePair>,
    nodes: BTreeMap<CoordKey, EdgeId>,
}

impl OverlayGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a noded edge, creating its symmetric half-edge pair and linking
    /// both halves into the angular rings at their origin nodes.
    ///
    /// Returns the forward half-edge.
    pub fn add_edge(&mut self, pts: Vec<Point2>, label: OverlayLabel) -> EdgeId {
        let n = pts.len();
        let orig_fwd = pts[0];
        let dir_fwd = pts[1];
        let orig_rev = pts[n - 1];
        let dir_rev = pts[n - 2];

        let pair = self.pairs.len();
        self.pairs.push(EdgePair { pts, label });

        let fwd = self.edges.insert_with_key(|key| HalfEdge {
            pair,
            forward: true,
            orig: orig_fwd,
            dir_pt: dir_fwd,
            sym: key,
            next: key,
            in_result_area: false,
            in_result_line: false,
            visited: false,
            next_result: None,
            next_result_max: None,
            ring: None,
            max_ring: None,
        });
        let rev = self.edges.insert_with_key(|key| HalfEdge {
            pair,
            forward: false,
            orig: orig_rev,
            dir_pt: dir_rev,
            sym: fwd,
            next: key,
            in_result_area: false,
            in_result_line: false,
            visited: false,
            next_result: None,
            next_result_max: None,
            ring: None,
            max_ring: None,
        });
        self.edges[fwd].sym = rev;

        self.insert_at_node(fwd);
        self.insert_at_node(rev);
        fwd
    }

    fn insert_at_node(&mut self, eid: EdgeId) {
        let key = CoordKey::new(&self.edges[eid].orig);
        if let Some(&rep) = self.nodes.get(&key) {
            self.insert_into_ring(rep, eid);
        } else {
            self.nodes.insert(key, eid);
            // A single edge forms a self-loop ring.
            self.edges[eid].next = eid;
        }
    }

    /// Inserts a half-edge into the CCW-sorted circular ring at its node.
    fn insert_into_ring(&mut self, rep: EdgeId, add: EdgeId) {
        let origin = self.edges[add].orig;
        let add_dir = self.edges[add].dir_pt;

        // Find the angular predecessor: the greatest edge not greater than
        // the new one, or the overall greatest if the new edge is the
        // smallest in the ring.
        let mut best: Option<EdgeId> = None;
        let mut ring_max = rep;
        let mut e = rep;
        loop {
            let e_dir = self.edges[e].dir_pt;
            if compare_angular(&origin, &e_dir, &self.edges[ring_max].dir_pt) == Ordering::Greater {
                ring_max = e;
            }
            if compare_angular(&origin, &e_dir, &add_dir) != Ordering::Greater {
                let better = match best {
                    None => true,
                    Some(b) => {
                        compare_angular(&origin, &e_dir, &self.edges[b].dir_pt)
                            == Ordering::Greater
                    }
                };
                if better {
                    best = Some(e);
                }
            }
            e = self.edges[e].next;
            if e == rep {
                break;
            }
        }

        let after = best.unwrap_or(ring_max);
        let next = self.edges[after].next;
        self.edges[after].next = add;
        self.edges[add].next = next;
    }

    /// One representative half-edge per node, in coordinate order.
    #[must_use]
    pub fn node_representatives(&self) -> Vec<EdgeId> {
        self.nodes.values().copied().collect()
    }

    /// Every half-edge id, in insertion order.
    #[must_use]
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.keys().collect()
    }

    /// Half-edges currently marked as in the result area.
    #[must_use]
    pub fn result_area_edges(&self) -> Vec<EdgeId> {
        self.edges
            .iter()
            .filter_map(|(id, e)| if e.in_result_area { Some(id) } else { None })
            .collect()
    }

    #[must_use]
    pub fn edge(&self, id: EdgeId) -> &HalfEdge {
        &self.edges[id]
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> &mut HalfEdge {
        &mut self.edges[id]
    }

    #[must_use]
    pub fn sym(&self, id: EdgeId) -> EdgeId {
        self.edges[id].sym
    }

    /// Next half-edge counter-clockwise around the origin node.
    #[must_use]
    pub fn next_around(&self, id: EdgeId) -> EdgeId {
        self.edges[id].next
    }

    #[must_use]
    pub fn origin(&self, id: EdgeId) -> Point2 {
        self.edges[id].orig
    }

    #[must_use]
    pub fn dest(&self, id: EdgeId) -> Point2 {
        self.edges[self.edges[id].sym].orig
    }

    #[must_use]
    pub fn label(&self, id: EdgeId) -> &OverlayLabel {
        &self.pairs[self.edges[id].pair].label
    }

    pub fn label_mut(&mut self, id: EdgeId) -> &mut OverlayLabel {
        let pair = self.edges[id].pair;
        &mut self.pairs[pair].label
    }

    #[must_use]
    pub fn is_forward(&self, id: EdgeId) -> bool {
        self.edges[id].forward
    }

    /// Number of edges incident to the node at this half-edge's origin.
    #[must_use]
    pub fn degree(&self, id: EdgeId) -> usize {
        let mut count = 0;
        let mut e = id;
        loop {
            count += 1;
            e = self.edges[e].next;
            if e == id {
                break;
            }
        }
        count
    }

    /// Appends this half-edge's coordinates, oriented along its direction,
    /// skipping a duplicated join point.
    pub fn add_coordinates(&self, id: EdgeId, out: &mut Vec<Point2>) {
        let edge = &self.edges[id];
        let pts = &self.pairs[edge.pair].pts;
        if edge.forward {
            for pt in pts {
                if out.last() != Some(pt) {
                    out.push(*pt);
                }
            }
        } else {
            for pt in pts.iter().rev() {
                if out.last() != Some(pt) {
                    out.push(*pt);
                }
            }
        }
    }

    pub fn mark_in_result_area(&mut self, id: EdgeId) {
        self.edges[id].in_result_area = true;
    }

    pub fn mark_in_result_line(&mut self, id: EdgeId) {
        let sym = self.edges[id].sym;
        self.edges[id].in_result_line = true;
        self.edges[sym].in_result_line = true;
    }

    #[must_use]
    pub fn is_in_result(&self, id: EdgeId) -> bool {
        let e = &self.edges[id];
        e.in_result_area || e.in_result_line
    }

    #[must_use]
    pub fn is_in_result_either(&self, id: EdgeId) -> bool {
        self.is_in_result(id) || self.is_in_result(self.edges[id].sym)
    }

    pub fn mark_visited_both(&mut self, id: EdgeId) {
        let sym = self.edges[id].sym;
        self.edges[id].visited = true;
        self.edges[sym].visited = true;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn add(graph: &mut OverlayGraph, a: Point2, b: Point2) -> EdgeId {
        graph.add_edge(vec![a, b], OverlayLabel::default())
    }

    #[test]
    fn sym_pair_invariants() {
        let mut graph = OverlayGraph::new();
        let e = add(&mut graph, p(0.0, 0.0), p(1.0, 0.0));
        let s = graph.sym(e);
        assert_eq!(graph.sym(s), e);
        assert_eq!(graph.origin(e), p(0.0, 0.0));
        assert_eq!(graph.origin(s), p(1.0, 0.0));
        assert_eq!(graph.dest(e), p(1.0, 0.0));
        assert!(graph.is_forward(e));
        assert!(!graph.is_forward(s));
    }

    #[test]
    fn node_ring_is_ccw_sorted() {
        let mut graph = OverlayGraph::new();
        let o = p(0.0, 0.0);
        let east = add(&mut graph, o, p(1.0, 0.0));
        let north = add(&mut graph, o, p(0.0, 1.0));
        let west = add(&mut graph, o, p(-1.0, 0.0));
        let south = add(&mut graph, o, p(0.0, -1.0));

        assert_eq!(graph.degree(east), 4);
        // Walking `next` from east must visit edges in CCW order.
        assert_eq!(graph.next_around(east), north);
        assert_eq!(graph.next_around(north), west);
        assert_eq!(graph.next_around(west), south);
        assert_eq!(graph.next_around(south), east);
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let mut graph = OverlayGraph::new();
        let o = p(0.0, 0.0);
        let south = add(&mut graph, o, p(0.0, -1.0));
        let north = add(&mut graph, o, p(0.0, 1.0));
        let east = add(&mut graph, o, p(1.0, 0.0));

        assert_eq!(graph.next_around(east), north);
        assert_eq!(graph.next_around(north), south);
        assert_eq!(graph.next_around(south), east);
    }

    #[test]
    fn nodes_are_shared_between_edges() {
        let mut graph = OverlayGraph::new();
        add(&mut graph, p(0.0, 0.0), p(1.0, 0.0));
        add(&mut graph, p(1.0, 0.0), p(2.0, 0.0));
        // Nodes: (0,0), (1,0), (2,0).
        assert_eq!(graph.node_representatives().len(), 3);
    }

    #[test]
    fn oriented_coordinates() {
        let mut graph = OverlayGraph::new();
        let e = graph.add_edge(
            vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 1.0)],
            OverlayLabel::default(),
        );
        let mut fwd = Vec::new();
        graph.add_coordinates(e, &mut fwd);
        assert_eq!(fwd, vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 1.0)]);
        let mut rev = Vec::new();
        graph.add_coordinates(graph.sym(e), &mut rev);
        assert_eq!(rev, vec![p(2.0, 1.0), p(1.0, 0.0), p(0.0, 0.0)]);
    }
}
