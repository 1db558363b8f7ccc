use super::edge::{merge_edges, Edge, SourceInfo};
use crate::error::{OperationError, Result};
use crate::geometry::{Envelope, Geometry, Polygon};
use crate::math::{polygon_2d, Point2};
use crate::noding::validate::validate_noding;
use crate::noding::{Noder, SegmentString};

/// Noded, merged edges plus a per-input flag recording whether the input
/// produced any edges at all (an empty side signals total collapse under
/// the current precision).
#[derive(Debug)]
pub struct NodedEdges {
    pub edges: Vec<Edge>,
    pub has_edges: [bool; 2],
}

/// Extracts the linework of both inputs, nodes it, validates the noding,
/// and merges coincident edges.
///
/// # Errors
///
/// Returns an invalid-input error for mixed-dimension collections, and a
/// topology error when noding fails or post-validation finds a residual
/// crossing.
pub fn build(
    a: &Geometry,
    b: &Geometry,
    clip_env: Option<&Envelope>,
    noder: &dyn Noder,
) -> Result<NodedEdges> {
    let mut source = EdgeSource::new(clip_env);
    source.add_geometry(a, 0)?;
    source.add_geometry(b, 1)?;

    let noded = noder.node(&source.strings)?;
    validate_noding(&noded)?;

    let mut edges = Vec::with_capacity(noded.len());
    let mut has_edges = [false, false];
    for string in noded {
        // Noding can collapse an edge to zero length; drop it.
        if Edge::is_collapsed(&string.pts) {
            continue;
        }
        let info = source.infos[string.src];
        has_edges[info.geom_index] = true;
        edges.push(Edge::new(string.pts, &info));
    }

    Ok(NodedEdges {
        edges: merge_edges(edges),
        has_edges,
    })
}

struct EdgeSource<'a> {
    clip_env: Option<&'a Envelope>,
    infos: Vec<SourceInfo>,
    strings: Vec<SegmentString>,
}

impl<'a> EdgeSource<'a> {
    fn new(clip_env: Option<&'a Envelope>) -> Self {
        Self {
            clip_env,
            infos: Vec::new(),
            strings: Vec::new(),
        }
    }

    fn add_geometry(&mut self, geom: &Geometry, geom_index: usize) -> Result<()> {
        match geom {
            // Puntal inputs carry no linework; they are handled by the
            // point overlay paths.
            Geometry::Point(_) | Geometry::MultiPoint(_) => Ok(()),
            Geometry::LineString(pts) => {
                self.add_line(pts, geom_index);
                Ok(())
            }
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    self.add_line(line, geom_index);
                }
                Ok(())
            }
            Geometry::Polygon(poly) => {
                self.add_polygon(poly, geom_index);
                Ok(())
            }
            Geometry::MultiPolygon(polys) => {
                for poly in polys {
                    self.add_polygon(poly, geom_index);
                }
                Ok(())
            }
            Geometry::Collection(geoms) => {
                let expected = geom.dimension();
                for child in geoms {
                    if child.dimension() != expected {
                        return Err(OperationError::InvalidInput(
                            "overlay input is mixed-dimension".into(),
                        )
                        .into());
                    }
                    self.add_geometry(child, geom_index)?;
                }
                Ok(())
            }
        }
    }

    fn add_polygon(&mut self, poly: &Polygon, geom_index: usize) {
        if poly.is_empty() {
            return;
        }
        self.add_ring(&poly.shell, false, geom_index);
        for hole in &poly.holes {
            // Holes are topologically labelled opposite to the shell, since
            // the polygon interior lies on their opposite side.
            self.add_ring(hole, true, geom_index);
        }
    }

    fn add_ring(&mut self, ring: &[Point2], is_hole: bool, geom_index: usize) {
        if ring.len() < 4 {
            return;
        }
        if self.is_clipped_completely(ring) {
            return;
        }
        let pts = remove_repeated_points(ring);
        if pts.len() < 2 {
            return;
        }
        let depth_delta = depth_delta(ring, is_hole);
        self.push(pts, SourceInfo::ring(geom_index, depth_delta, is_hole));
    }

    fn add_line(&mut self, line: &[Point2], geom_index: usize) {
        if line.len() < 2 {
            return;
        }
        if self.is_clipped_completely(line) {
            return;
        }
        let pts = remove_repeated_points(line);
        if pts.len() < 2 {
            return;
        }
        self.push(pts, SourceInfo::line(geom_index));
    }

    fn is_clipped_completely(&self, pts: &[Point2]) -> bool {
        self.clip_env
            .is_some_and(|clip| clip.disjoint(&Envelope::of_points(pts)))
    }

    fn push(&mut self, pts: Vec<Point2>, info: SourceInfo) {
        let src = self.infos.len();
        self.infos.push(info);
        self.strings.push(SegmentString::new(pts, src));
    }
}

fn remove_repeated_points(pts: &[Point2]) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(pts.len());
    for pt in pts {
        if out.last() != Some(pt) {
            out.push(*pt);
        }
    }
    out
}

/// Net winding contribution of a ring, from its orientation.
///
/// Orientation is computed on the original ring, since topology collapse
/// can make a post-reduction computation give the wrong answer. Canonical
/// orientation (shells CW, holes CCW) gives delta 1: exterior on the left,
/// interior on the right.
fn depth_delta(ring: &[Point2], is_hole: bool) -> i32 {
    let is_ccw = polygon_2d::is_ccw(ring);
    let is_oriented = if is_hole { is_ccw } else { !is_ccw };
    if is_oriented {
        1
    } else {
        -1
    }
}
