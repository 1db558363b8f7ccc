use std::collections::HashMap;

use rstar::{RTree, RTreeObject, AABB};

use super::{Noder, SegmentString};
use crate::error::Result;
use crate::math::intersect_2d::{segment_intersection, SegmentIntersection};
use crate::math::Point2;

/// One indexed segment of a segment string.
#[derive(Debug, Clone)]
pub(crate) struct SegEntry {
    pub string: usize,
    pub seg: usize,
    env: AABB<[f64; 2]>,
}

impl RTreeObject for SegEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.env
    }
}

/// R-tree over every segment of a set of segment strings, for candidate-pair
/// lookup in better than O(n^2).
pub(crate) struct SegmentIndex {
    tree: RTree<SegEntry>,
}

impl SegmentIndex {
    pub fn build(strings: &[SegmentString]) -> Self {
        let mut entries = Vec::new();
        for (si, string) in strings.iter().enumerate() {
            for (gi, w) in string.pts.windows(2).enumerate() {
                if w[0] == w[1] {
                    continue;
                }
                entries.push(SegEntry {
                    string: si,
                    seg: gi,
                    env: AABB::from_corners(
                        [w[0].x.min(w[1].x), w[0].y.min(w[1].y)],
                        [w[0].x.max(w[1].x), w[0].y.max(w[1].y)],
                    ),
                });
            }
        }
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    pub fn query(&self, env: &AABB<[f64; 2]>) -> impl Iterator<Item = &SegEntry> {
        self.tree.locate_in_envelope_intersecting(env)
    }
}

/// Full noder for the floating precision model.
///
/// Only points where an actual line-intersection computation reports an
/// intersection become nodes; vertices are left untouched.
#[derive(Debug, Default)]
pub struct IndexNoder;

impl Noder for IndexNoder {
    fn node(&self, inputs: &[SegmentString]) -> Result<Vec<SegmentString>> {
        let (noded, _) = node_with(inputs, |pt| pt);
        Ok(noded)
    }
}

/// Nodes the input strings, passing every computed intersection point
/// through `adjust` (identity for floating precision, grid or snap-cluster
/// rounding for the degraded noders).
///
/// Returns the noded strings and whether any segment was actually split.
pub(crate) fn node_with<F: Fn(Point2) -> Point2>(
    inputs: &[SegmentString],
    adjust: F,
) -> (Vec<SegmentString>, bool) {
    let index = SegmentIndex::build(inputs);
    // Discovered node points per (string, segment), keyed for ordered split.
    let mut nodes: HashMap<(usize, usize), Vec<Point2>> = HashMap::new();

    let mut add_node = |string: usize, seg: usize, pt: Point2| {
        nodes.entry((string, seg)).or_default().push(pt);
    };

    for (si, string) in inputs.iter().enumerate() {
        for (gi, w) in string.pts.windows(2).enumerate() {
            if w[0] == w[1] {
                continue;
            }
            let env = AABB::from_corners(
                [w[0].x.min(w[1].x), w[0].y.min(w[1].y)],
                [w[0].x.max(w[1].x), w[0].y.max(w[1].y)],
            );
            for cand in index.query(&env) {
                // Process each unordered pair once.
                if (cand.string, cand.seg) <= (si, gi) {
                    continue;
                }
                let adjacent = cand.string == si && cand.seg == gi + 1;
                let c = &inputs[cand.string].pts[cand.seg..=cand.seg + 1];
                match segment_intersection(&w[0], &w[1], &c[0], &c[1]) {
                    SegmentIntersection::None => {}
                    SegmentIntersection::Point { pt, .. } => {
                        // Adjacent segments of one string meet at their shared
                        // vertex; that is not a node.
                        if adjacent && pt == w[1] {
                            continue;
                        }
                        let pt = adjust(pt);
                        add_node(si, gi, pt);
                        add_node(cand.string, cand.seg, pt);
                    }
                    SegmentIntersection::Collinear { p0, p1 } => {
                        for pt in [adjust(p0), adjust(p1)] {
                            add_node(si, gi, pt);
                            add_node(cand.string, cand.seg, pt);
                        }
                    }
                }
            }
        }
    }

    split_at_nodes(inputs, &nodes)
}

/// Splits each input string at its discovered node points.
fn split_at_nodes(
    inputs: &[SegmentString],
    nodes: &HashMap<(usize, usize), Vec<Point2>>,
) -> (Vec<SegmentString>, bool) {
    let mut out = Vec::new();
    let mut split_any = false;

    for (si, string) in inputs.iter().enumerate() {
        if string.pts.len() < 2 {
            continue;
        }
        let mut cur: Vec<Point2> = vec![string.pts[0]];

        for (gi, w) in string.pts.windows(2).enumerate() {
            let (a, b) = (w[0], w[1]);
            let mut seg_nodes: Vec<(f64, Point2)> = nodes
                .get(&(si, gi))
                .map(|pts| {
                    pts.iter()
                        .filter(|pt| **pt != a && **pt != b)
                        .map(|pt| (fraction_along(pt, &a, &b), *pt))
                        .collect()
                })
                .unwrap_or_default();
            seg_nodes.sort_by(|x, y| x.0.total_cmp(&y.0));
            seg_nodes.dedup_by(|x, y| x.1 == y.1);

            for (_, pt) in seg_nodes {
                if cur.last() == Some(&pt) {
                    continue;
                }
                cur.push(pt);
                emit(&mut out, &mut cur, string.src);
                split_any = true;
            }

            if cur.last() != Some(&b) {
                cur.push(b);
            }

            // A node exactly at the far vertex ends the substring there.
            let ends_at_vertex = nodes
                .get(&(si, gi))
                .is_some_and(|pts| pts.contains(&b));
            let is_last_seg = gi + 2 == string.pts.len();
            if ends_at_vertex && !is_last_seg {
                emit(&mut out, &mut cur, string.src);
                split_any = true;
            }
        }
        if cur.len() >= 2 {
            out.push(SegmentString::new(cur, string.src));
        }
    }
    (out, split_any)
}

fn emit(out: &mut Vec<SegmentString>, cur: &mut Vec<Point2>, src: usize) {
    if cur.len() >= 2 {
        out.push(SegmentString::new(cur.clone(), src));
    }
    let last = cur[cur.len() - 1];
    cur.clear();
    cur.push(last);
}

fn fraction_along(pt: &Point2, a: &Point2, b: &Point2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return 0.0;
    }
    ((pt.x - a.x) * dx + (pt.y - a.y) * dy) / len_sq
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn crossing_lines_split_into_four() {
        // Two linestrings crossing once at a non-vertex point: exactly one
        // new node, four resulting sub-edges.
        let inputs = vec![
            SegmentString::new(vec![p(0.0, 0.0), p(10.0, 10.0)], 0),
            SegmentString::new(vec![p(0.0, 10.0), p(10.0, 0.0)], 1),
        ];
        let noded = IndexNoder.node(&inputs).unwrap();
        assert_eq!(noded.len(), 4);
        let node = p(5.0, 5.0);
        for ss in &noded {
            assert!(ss.pts.first() == Some(&node) || ss.pts.last() == Some(&node));
        }
    }

    #[test]
    fn touch_at_vertex_splits_crossed_string_only() {
        let inputs = vec![
            SegmentString::new(vec![p(0.0, 0.0), p(10.0, 0.0)], 0),
            SegmentString::new(vec![p(5.0, 0.0), p(5.0, 8.0)], 1),
        ];
        let noded = IndexNoder.node(&inputs).unwrap();
        // The horizontal line splits at (5,0); the vertical one starts there.
        assert_eq!(noded.len(), 3);
    }

    #[test]
    fn disjoint_strings_pass_through() {
        let inputs = vec![
            SegmentString::new(vec![p(0.0, 0.0), p(1.0, 0.0)], 0),
            SegmentString::new(vec![p(0.0, 5.0), p(1.0, 5.0)], 1),
        ];
        let noded = IndexNoder.node(&inputs).unwrap();
        assert_eq!(noded, inputs);
    }

    #[test]
    fn collinear_overlap_is_noded_at_overlap_ends() {
        let inputs = vec![
            SegmentString::new(vec![p(0.0, 0.0), p(10.0, 0.0)], 0),
            SegmentString::new(vec![p(4.0, 0.0), p(14.0, 0.0)], 1),
        ];
        let noded = IndexNoder.node(&inputs).unwrap();
        // First string splits at x=4, second at x=10.
        assert_eq!(noded.len(), 4);
        assert!(noded.iter().any(|s| s.pts == vec![p(4.0, 0.0), p(10.0, 0.0)] && s.src == 0));
        assert!(noded.iter().any(|s| s.pts == vec![p(4.0, 0.0), p(10.0, 0.0)] && s.src == 1));
    }

    #[test]
    fn node_at_interior_vertex_splits_there() {
        let inputs = vec![
            SegmentString::new(vec![p(0.0, 0.0), p(5.0, 0.0), p(10.0, 0.0)], 0),
            SegmentString::new(vec![p(5.0, -3.0), p(5.0, 3.0)], 1),
        ];
        let noded = IndexNoder.node(&inputs).unwrap();
        // String 0 splits at its own interior vertex; string 1 splits at (5,0).
        assert_eq!(noded.len(), 4);
    }
}
