use std::cmp::Ordering;
use std::collections::HashMap;

use super::label::OverlayLabel;
use crate::geometry::Location;
use crate::math::Point2;

/// Geometric dimension of an edge's source, per input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceDim {
    /// Not part of this input.
    None,
    /// From an input line.
    Line,
    /// From an input area ring.
    Area,
}

/// Provenance of one input edge: owning geometry, winding contribution and
/// ring role. Created once per input ring or line at pipeline start.
#[derive(Debug, Clone, Copy)]
pub struct SourceInfo {
    pub geom_index: usize,
    pub dim: SourceDim,
    pub depth_delta: i32,
    pub is_hole: bool,
}

impl SourceInfo {
    #[must_use]
    pub fn line(geom_index: usize) -> Self {
        Self {
            geom_index,
            dim: SourceDim::Line,
            depth_delta: 0,
            is_hole: false,
        }
    }

    #[must_use]
    pub fn ring(geom_index: usize, depth_delta: i32, is_hole: bool) -> Self {
        Self {
            geom_index,
            dim: SourceDim::Area,
            depth_delta,
            is_hole,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct EdgeSide {
    dim: SourceDim,
    depth_delta: i32,
    is_hole: bool,
}

impl Default for EdgeSide {
    fn default() -> Self {
        Self {
            dim: SourceDim::None,
            depth_delta: 0,
            is_hole: false,
        }
    }
}

/// A noded edge awaiting graph construction, carrying the merged topology
/// info of every coincident source edge.
#[derive(Debug, Clone)]
pub struct Edge {
    pts: Vec<Point2>,
    sides: [EdgeSide; 2],
}

impl Edge {
    #[must_use]
    pub fn new(pts: Vec<Point2>, info: &SourceInfo) -> Self {
        let mut edge = Self {
            pts,
            sides: [EdgeSide::default(), EdgeSide::default()],
        };
        edge.sides[info.geom_index] = EdgeSide {
            dim: info.dim,
            depth_delta: info.depth_delta,
            is_hole: info.is_hole,
        };
        edge
    }

    /// Tests whether a noded point sequence has collapsed to zero length.
    #[must_use]
    pub fn is_collapsed(pts: &[Point2]) -> bool {
        if pts.len() < 2 {
            return true;
        }
        if pts[0] == pts[1] {
            return true;
        }
        if pts.len() > 2 && pts[pts.len() - 1] == pts[pts.len() - 2] {
            return true;
        }
        false
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.pts
    }

    #[must_use]
    pub fn into_points(self) -> Vec<Point2> {
        self.pts
    }

    /// Canonical direction of the edge: `true` when the point sequence
    /// already reads from its lexicographically smaller endpoint.
    #[must_use]
    pub fn direction(&self) -> bool {
        let n = self.pts.len();
        let cmp = compare_points(&self.pts[0], &self.pts[n - 1])
            .then_with(|| compare_points(&self.pts[1], &self.pts[n - 2]));
        cmp != Ordering::Greater
    }

    /// Tests whether a coincident edge runs in the same direction as this
    /// one.
    #[must_use]
    pub fn relative_direction(&self, other: &Edge) -> bool {
        self.pts[0] == other.pts[0] && self.pts[1] == other.pts[1]
    }

    /// Merges a coincident edge into this edge, combining topology info.
    pub fn merge(&mut self, other: &Edge) {
        // Hole status first, since it reads the current dimensions.
        let hole0 = self.merged_hole(0, other);
        let hole1 = self.merged_hole(1, other);
        self.sides[0].is_hole = hole0;
        self.sides[1].is_hole = hole1;

        for i in 0..2 {
            if dim_rank(other.sides[i].dim) > dim_rank(self.sides[i].dim) {
                self.sides[i].dim = other.sides[i].dim;
            }
        }

        let flip = if self.relative_direction(other) { 1 } else { -1 };
        self.sides[0].depth_delta += flip * other.sides[0].depth_delta;
        self.sides[1].depth_delta += flip * other.sides[1].depth_delta;
    }

    /// An edge is a hole edge only if no contributing edge was a shell.
    fn merged_hole(&self, index: usize, other: &Edge) -> bool {
        let is_shell = |e: &Edge| e.sides[index].dim == SourceDim::Area && !e.sides[index].is_hole;
        !(is_shell(self) || is_shell(other))
    }

    /// Populates the label for this edge from its merged source info.
    ///
    /// An area edge whose net winding contribution cancelled out is a
    /// collapse; its location is determined later from the final graph
    /// topology.
    #[must_use]
    pub fn to_label(&self) -> OverlayLabel {
        let mut label = OverlayLabel::default();
        for index in 0..2 {
            let side = &self.sides[index];
            match side.dim {
                SourceDim::None => label.init_not_part(index),
                SourceDim::Line => label.init_line(index),
                SourceDim::Area => {
                    if side.depth_delta == 0 {
                        label.init_collapse(index, side.is_hole);
                    } else {
                        let (left, right) = if side.depth_delta > 0 {
                            (Location::Exterior, Location::Interior)
                        } else {
                            (Location::Interior, Location::Exterior)
                        };
                        label.init_boundary(index, left, right, side.is_hole);
                    }
                }
            }
        }
        label
    }
}

fn dim_rank(dim: SourceDim) -> u8 {
    match dim {
        SourceDim::None => 0,
        SourceDim::Line => 1,
        SourceDim::Area => 2,
    }
}

fn compare_points(a: &Point2, b: &Point2) -> Ordering {
    a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y))
}

/// Merges edges with identical linework (in either direction) onto a single
/// edge carrying the combined label info. This is how coincident boundaries
/// of adjacent rings, or A/B shared linework, end up on one graph edge.
#[must_use]
pub fn merge_edges(edges: Vec<Edge>) -> Vec<Edge> {
    let mut merged: Vec<Edge> = Vec::with_capacity(edges.len());
    let mut by_key: HashMap<Vec<(u64, u64)>, usize> = HashMap::new();

    for edge in edges {
        let key = edge_key(&edge);
        if let Some(&at) = by_key.get(&key) {
            merged[at].merge(&edge);
        } else {
            by_key.insert(key, merged.len());
            merged.push(edge);
        }
    }
    merged
}

/// Orientation-independent exact-coordinate key for an edge.
fn edge_key(edge: &Edge) -> Vec<(u64, u64)> {
    let bits = |v: f64| {
        // Fold -0.0 onto 0.0 so bitwise keys agree.
        let v = if v == 0.0 { 0.0 } else { v };
        v.to_bits()
    };
    let pt_bits = |pt: &Point2| (bits(pt.x), bits(pt.y));
    if edge.direction() {
        edge.pts.iter().map(pt_bits).collect()
    } else {
        edge.pts.iter().rev().map(pt_bits).collect()
    }
}
