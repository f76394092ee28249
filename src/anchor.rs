//! Draggable anchors: boundary-constrained connection endpoints and the
//! free elbow handle.

use crate::geometry::{
    closest_edge, closest_edge_point, snap_to_increment, BoundingBox, Edge, Point,
};
use crate::surface::BoxId;

/// How an anchor is allowed to move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorMode {
    /// Constrained to the boundary of the owning box
    Boundary(BoxId),
    /// Free-floating, snapped to the drag grid
    Free,
}

/// A point that terminates or bends a connector.
///
/// Boundary anchors always lie exactly on their owner's boundary rectangle:
/// every placement goes through [`closest_edge_point`], which clamps to the
/// edge segment. Free anchors go wherever they are dragged, grid-snapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub position: Point,
    pub mode: AnchorMode,
}

impl Anchor {
    /// A boundary-constrained anchor on `owner` at `position`
    pub fn boundary(owner: BoxId, position: Point) -> Self {
        Self {
            position,
            mode: AnchorMode::Boundary(owner),
        }
    }

    /// A free anchor at `position`
    pub fn free(position: Point) -> Self {
        Self {
            position,
            mode: AnchorMode::Free,
        }
    }

    /// The owning box, if boundary-constrained
    pub fn owner(&self) -> Option<BoxId> {
        match self.mode {
            AnchorMode::Boundary(id) => Some(id),
            AnchorMode::Free => None,
        }
    }

    /// Project this anchor onto the closest edge of `bounds`, measured from
    /// `reference`.
    ///
    /// This is both the recompute step and the drag step: dragging passes
    /// the raw pointer as the reference, so crossing a corner pops the
    /// anchor onto the adjacent edge exactly at the tie boundary. No
    /// hysteresis.
    pub fn place(&mut self, bounds: &BoundingBox, reference: Point) {
        self.position = closest_edge_point(bounds, reference);
    }

    /// Move a free anchor to the pointer, snapped to the grid on each axis
    pub fn snap_drag(&mut self, pointer: Point, increment: f64) {
        self.position = Point::new(
            snap_to_increment(pointer.x, increment),
            snap_to_increment(pointer.y, increment),
        );
    }

    /// Which edge of `bounds` the anchor currently sits on
    pub fn edge(&self, bounds: &BoundingBox) -> Edge {
        closest_edge(bounds, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> BoxId {
        BoxId::from_raw(0)
    }

    #[test]
    fn test_place_lands_on_boundary() {
        let bounds = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
        let mut anchor = Anchor::boundary(owner(), Point::new(0.0, 0.0));
        anchor.place(&bounds, Point::new(97.0, 20.0));
        assert_eq!(anchor.position, Point::new(100.0, 20.0));
        assert!(bounds.on_boundary(anchor.position));
    }

    #[test]
    fn test_drag_pops_across_corner() {
        // Dragging along the right edge toward the top: once the pointer's
        // vertical distance to the top edge drops below its horizontal
        // distance to the right edge, the anchor pops onto the top edge.
        let bounds = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
        let mut anchor = Anchor::boundary(owner(), Point::new(100.0, 25.0));

        anchor.place(&bounds, Point::new(96.0, 10.0));
        assert_eq!(anchor.edge(&bounds), Edge::Right);
        assert_eq!(anchor.position, Point::new(100.0, 10.0));

        anchor.place(&bounds, Point::new(96.0, 3.0));
        assert_eq!(anchor.edge(&bounds), Edge::Top);
        assert_eq!(anchor.position, Point::new(96.0, 0.0));
    }

    #[test]
    fn test_drag_at_exact_tie_prefers_fixed_order() {
        // Equidistant from the right and top edges: right comes first in
        // the tie order, so the anchor stays on the right edge.
        let bounds = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
        let mut anchor = Anchor::boundary(owner(), Point::new(100.0, 25.0));
        anchor.place(&bounds, Point::new(96.0, 4.0));
        assert_eq!(anchor.edge(&bounds), Edge::Right);
    }

    #[test]
    fn test_snap_drag_rounds_each_axis() {
        let mut elbow = Anchor::free(Point::new(0.0, 0.0));
        elbow.snap_drag(Point::new(213.0, 237.0), 5.0);
        assert_eq!(elbow.position, Point::new(215.0, 235.0));
    }

    #[test]
    fn test_owner_by_mode() {
        assert_eq!(
            Anchor::boundary(owner(), Point::new(0.0, 0.0)).owner(),
            Some(owner())
        );
        assert_eq!(Anchor::free(Point::new(0.0, 0.0)).owner(), None);
    }
}
