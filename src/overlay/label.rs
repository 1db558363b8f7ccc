use crate::geometry::Location;

/// Edge position relative to its direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    On,
    Left,
    Right,
}

/// What an edge is, for one input geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelDim {
    /// The edge is not part of this input's linework.
    #[default]
    NotPart,
    /// An edge of an input line.
    Line,
    /// A boundary edge of an input area.
    Boundary,
    /// An edge of an input area ring which collapsed to a lower dimension
    /// under precision reduction or merging.
    Collapse,
}

/// Per-input topology record for one edge pair.
#[derive(Debug, Clone, Copy, Default)]
struct SideLabel {
    dim: LabelDim,
    is_hole: bool,
    loc_left: Option<Location>,
    loc_right: Option<Location>,
    loc_line: Option<Location>,
}

/// Topological label shared by both halves of a symmetric edge pair.
///
/// For each input geometry the label records the edge's dimension role, the
/// hole/shell flag of its source ring, and up to three locations: on the
/// edge line and on its left and right sides. Unknown locations are `None`
/// until the labeller resolves them; orientation-sensitive accessors take
/// the owning half-edge's direction flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayLabel {
    sides: [SideLabel; 2],
}

impl OverlayLabel {
    pub fn init_boundary(
        &mut self,
        index: usize,
        loc_left: Location,
        loc_right: Location,
        is_hole: bool,
    ) {
        let side = &mut self.sides[index];
        side.dim = LabelDim::Boundary;
        side.is_hole = is_hole;
        side.loc_left = Some(loc_left);
        side.loc_right = Some(loc_right);
        side.loc_line = Some(Location::Interior);
    }

    pub fn init_collapse(&mut self, index: usize, is_hole: bool) {
        let side = &mut self.sides[index];
        side.dim = LabelDim::Collapse;
        side.is_hole = is_hole;
    }

    pub fn init_line(&mut self, index: usize) {
        self.sides[index].dim = LabelDim::Line;
    }

    pub fn init_not_part(&mut self, index: usize) {
        self.sides[index].dim = LabelDim::NotPart;
    }

    /// Sets the on-line location, used when propagating area locations onto
    /// linear edges.
    pub fn set_location_line(&mut self, index: usize, loc: Location) {
        self.sides[index].loc_line = Some(loc);
    }

    /// Sets every location, used for disconnected edges resolved against
    /// the original input geometry.
    pub fn set_location_all(&mut self, index: usize, loc: Location) {
        let side = &mut self.sides[index];
        side.loc_line = Some(loc);
        side.loc_left = Some(loc);
        side.loc_right = Some(loc);
    }

    /// Labels a collapsed edge disconnected from its parent's boundary,
    /// purely from its source ring role: a collapsed hole lies in the
    /// parent interior, a collapsed shell in the exterior.
    pub fn set_location_collapse(&mut self, index: usize) {
        let loc = if self.sides[index].is_hole {
            Location::Interior
        } else {
            Location::Exterior
        };
        self.sides[index].loc_line = Some(loc);
    }

    #[must_use]
    pub fn dimension(&self, index: usize) -> LabelDim {
        self.sides[index].dim
    }

    #[must_use]
    pub fn is_boundary(&self, index: usize) -> bool {
        self.sides[index].dim == LabelDim::Boundary
    }

    #[must_use]
    pub fn is_boundary_either(&self) -> bool {
        self.is_boundary(0) || self.is_boundary(1)
    }

    #[must_use]
    pub fn is_boundary_both(&self) -> bool {
        self.is_boundary(0) && self.is_boundary(1)
    }

    /// Tests for a collapsed area edge coincident with the other area's
    /// boundary.
    #[must_use]
    pub fn is_boundary_collapse(&self) -> bool {
        if self.is_boundary_both() {
            return false;
        }
        self.is_boundary_either()
            && (self.sides[0].dim == LabelDim::Collapse || self.sides[1].dim == LabelDim::Collapse)
    }

    /// Tests for an edge where two areas touch along their boundaries with
    /// interiors on opposite sides.
    #[must_use]
    pub fn is_boundary_touch(&self) -> bool {
        self.is_boundary_both()
            && self.location(0, Position::Right, true) != self.location(1, Position::Right, true)
    }

    /// Tests for an edge which is a boundary of one geometry and not part
    /// of the other at all.
    #[must_use]
    pub fn is_boundary_singleton(&self) -> bool {
        (self.sides[0].dim == LabelDim::Boundary && self.sides[1].dim == LabelDim::NotPart)
            || (self.sides[1].dim == LabelDim::Boundary && self.sides[0].dim == LabelDim::NotPart)
    }

    #[must_use]
    pub fn is_line(&self, index: usize) -> bool {
        self.sides[index].dim == LabelDim::Line
    }

    #[must_use]
    pub fn is_line_either(&self) -> bool {
        self.is_line(0) || self.is_line(1)
    }

    #[must_use]
    pub fn is_collapse(&self, index: usize) -> bool {
        self.sides[index].dim == LabelDim::Collapse
    }

    /// Line or collapse: the dimensions carrying only an on-line location.
    #[must_use]
    pub fn is_linear(&self, index: usize) -> bool {
        matches!(self.sides[index].dim, LabelDim::Line | LabelDim::Collapse)
    }

    #[must_use]
    pub fn is_known(&self, index: usize) -> bool {
        self.sides[index].dim != LabelDim::NotPart
    }

    #[must_use]
    pub fn is_hole(&self, index: usize) -> bool {
        self.sides[index].is_hole
    }

    #[must_use]
    pub fn is_line_location_unknown(&self, index: usize) -> bool {
        self.sides[index].loc_line.is_none()
    }

    /// Tests if a linear edge lies in the interior of the given area input.
    #[must_use]
    pub fn is_line_in_area(&self, index: usize) -> bool {
        self.sides[index].loc_line == Some(Location::Interior)
    }

    /// Tests for a collapse located in its own parent's interior
    /// (a narrow gore or spike).
    #[must_use]
    pub fn is_interior_collapse(&self) -> bool {
        (self.sides[0].dim == LabelDim::Collapse && self.is_line_in_area(0))
            || (self.sides[1].dim == LabelDim::Collapse && self.is_line_in_area(1))
    }

    /// Tests for a collapse lying in the interior of the geometry it is not
    /// part of.
    #[must_use]
    pub fn is_collapse_and_not_part_interior(&self) -> bool {
        (self.sides[0].dim == LabelDim::Collapse
            && self.sides[1].dim == LabelDim::NotPart
            && self.is_line_in_area(1))
            || (self.sides[1].dim == LabelDim::Collapse
                && self.sides[0].dim == LabelDim::NotPart
                && self.is_line_in_area(0))
    }

    #[must_use]
    pub fn line_location(&self, index: usize) -> Option<Location> {
        self.sides[index].loc_line
    }

    /// Location at a position, adjusted for the half-edge direction.
    #[must_use]
    pub fn location(&self, index: usize, position: Position, forward: bool) -> Option<Location> {
        let side = &self.sides[index];
        match position {
            Position::On => side.loc_line,
            Position::Left => {
                if forward {
                    side.loc_left
                } else {
                    side.loc_right
                }
            }
            Position::Right => {
                if forward {
                    side.loc_right
                } else {
                    side.loc_left
                }
            }
        }
    }

    /// The location used by the result-area rule: the side location for
    /// boundary edges, the on-line location otherwise.
    #[must_use]
    pub fn location_boundary_or_line(
        &self,
        index: usize,
        position: Position,
        forward: bool,
    ) -> Option<Location> {
        if self.is_boundary(index) {
            self.location(index, position, forward)
        } else {
            self.sides[index].loc_line
        }
    }

    #[must_use]
    pub fn has_sides(&self, index: usize) -> bool {
        self.sides[index].loc_left.is_some() && self.sides[index].loc_right.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn boundary_init_and_orientation() {
        let mut lbl = OverlayLabel::default();
        lbl.init_boundary(0, Location::Exterior, Location::Interior, false);
        assert!(lbl.is_boundary(0));
        assert!(lbl.has_sides(0));
        assert_eq!(
            lbl.location(0, Position::Right, true),
            Some(Location::Interior)
        );
        // Reversed half-edge sees swapped sides.
        assert_eq!(
            lbl.location(0, Position::Right, false),
            Some(Location::Exterior)
        );
        assert_eq!(lbl.location(0, Position::On, true), Some(Location::Interior));
    }

    #[test]
    fn collapse_resolution_by_ring_role() {
        let mut shell = OverlayLabel::default();
        shell.init_collapse(0, false);
        shell.set_location_collapse(0);
        assert_eq!(shell.line_location(0), Some(Location::Exterior));

        let mut hole = OverlayLabel::default();
        hole.init_collapse(0, true);
        hole.set_location_collapse(0);
        assert_eq!(hole.line_location(0), Some(Location::Interior));
    }

    #[test]
    fn predicates() {
        let mut lbl = OverlayLabel::default();
        lbl.init_boundary(0, Location::Exterior, Location::Interior, false);
        lbl.init_not_part(1);
        assert!(lbl.is_boundary_singleton());
        assert!(!lbl.is_boundary_both());
        assert!(lbl.is_line_location_unknown(1));

        let mut touch = OverlayLabel::default();
        touch.init_boundary(0, Location::Exterior, Location::Interior, false);
        touch.init_boundary(1, Location::Interior, Location::Exterior, false);
        assert!(touch.is_boundary_touch());

        let mut collapse = OverlayLabel::default();
        collapse.init_collapse(0, false);
        collapse.init_boundary(1, Location::Exterior, Location::Interior, false);
        assert!(collapse.is_boundary_collapse());
    }
}
