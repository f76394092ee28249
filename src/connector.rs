//! The connector: two boundary anchors, an elbow, and the orthogonal path
//! between them.
//!
//! Routing is never "invalid" — it is recomputed from current box bounds on
//! every move notification. The only state machine here is interaction
//! state: selection toggling and the delete confirmation.

use crate::anchor::Anchor;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::geometry::{edge_midpoint, facing_edges, BoundingBox, Edge, Point};
use crate::scene::{
    AnchorMarker, ArrowHead, ConnectorScene, LineSegment, MarkerKind, TextLabel,
};
use crate::surface::{Bounds, BoxId, ConnectorId};

/// Interaction state of a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    Selected,
    /// Waiting on the delete confirmation prompt; remembers the selection
    /// state to restore on cancel
    PendingDelete { was_selected: bool },
}

/// Resolution of the delete confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteChoice {
    Confirmed,
    Cancelled,
}

/// Stroke colors for a connector, sampled from the stylesheet once at
/// construction
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorStyle {
    pub stroke: String,
    pub highlight: String,
    pub arrow_fill: String,
    pub label_color: String,
}

/// An orthogonally routed link between two boxes
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    start_box: BoxId,
    end_box: BoxId,
    start: Anchor,
    end: Anchor,
    elbow: Anchor,
    /// True after a manual elbow drag, until the next box-move recompute
    elbow_pinned: bool,
    /// Arrowhead rotation in degrees; retained across zero-length final
    /// segments
    arrow_angle: f64,
    state: SelectionState,
    label: String,
    /// The color captured before any toggle; restoring selection always
    /// comes back to this exact value
    original_stroke: String,
    stroke: String,
    style: ConnectorStyle,
}

impl Connector {
    /// Create a connector between two boxes.
    ///
    /// The anchors seed at the midpoints of the facing edges; every later
    /// recompute re-projects them from the opposite anchor instead.
    pub fn new(
        start_box: BoxId,
        start_bounds: &BoundingBox,
        end_box: BoxId,
        end_bounds: &BoundingBox,
        style: ConnectorStyle,
    ) -> Self {
        let (start_edge, end_edge) = facing_edges(start_bounds, end_bounds);
        let start = Anchor::boundary(start_box, edge_midpoint(start_bounds, start_edge));
        let end = Anchor::boundary(end_box, edge_midpoint(end_bounds, end_edge));
        let elbow = Anchor::free(Point::new(end.position.x, start.position.y));

        let mut connector = Self {
            start_box,
            end_box,
            start,
            end,
            elbow,
            elbow_pinned: false,
            arrow_angle: 0.0,
            state: SelectionState::Idle,
            label: "Relation".to_string(),
            original_stroke: style.stroke.clone(),
            stroke: style.stroke.clone(),
            style,
        };
        connector.rederive();
        connector
    }

    pub fn start_box(&self) -> BoxId {
        self.start_box
    }

    pub fn end_box(&self) -> BoxId {
        self.end_box
    }

    pub fn start_anchor(&self) -> &Anchor {
        &self.start
    }

    pub fn end_anchor(&self) -> &Anchor {
        &self.end
    }

    pub fn elbow(&self) -> Point {
        self.elbow.position
    }

    pub fn elbow_pinned(&self) -> bool {
        self.elbow_pinned
    }

    pub fn arrow_angle(&self) -> f64 {
        self.arrow_angle
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_selected(&self) -> bool {
        matches!(
            self.state,
            SelectionState::Selected | SelectionState::PendingDelete { was_selected: true }
        )
    }

    pub fn stroke(&self) -> &str {
        &self.stroke
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, text: impl Into<String>) {
        self.label = text.into();
    }

    /// Which edge of its owner each boundary anchor sits on
    pub fn anchor_edges(&self, boxes: &impl Bounds) -> Result<(Edge, Edge), EngineError> {
        let start_bounds = boxes.bounds(self.start_box)?;
        let end_bounds = boxes.bounds(self.end_box)?;
        Ok((self.start.edge(&start_bounds), self.end.edge(&end_bounds)))
    }

    /// Re-derive the whole route from current box bounds.
    ///
    /// Invoked for every position or size change of either owner box, in
    /// notification order: the start anchor re-projects against the
    /// previous end anchor, then the end anchor against the just-updated
    /// start anchor. A manually placed elbow is discarded so the route is
    /// always valid after a move.
    pub fn recompute(&mut self, boxes: &impl Bounds) -> Result<(), EngineError> {
        let start_bounds = boxes.bounds(self.start_box)?;
        let end_bounds = boxes.bounds(self.end_box)?;

        let reference = self.end.position;
        self.start.place(&start_bounds, reference);
        self.end.place(&end_bounds, self.start.position);

        self.elbow_pinned = false;
        self.rederive();
        Ok(())
    }

    /// Drag the start anchor along its box boundary
    pub fn drag_start_anchor(
        &mut self,
        pointer: Point,
        boxes: &impl Bounds,
    ) -> Result<(), EngineError> {
        let bounds = boxes.bounds(self.start_box)?;
        self.start.place(&bounds, pointer);
        self.rederive();
        Ok(())
    }

    /// Drag the end anchor along its box boundary
    pub fn drag_end_anchor(
        &mut self,
        pointer: Point,
        boxes: &impl Bounds,
    ) -> Result<(), EngineError> {
        let bounds = boxes.bounds(self.end_box)?;
        self.end.place(&bounds, pointer);
        self.rederive();
        Ok(())
    }

    /// Drag the elbow to a grid-snapped free position.
    ///
    /// The path becomes elbow-defined until the next owner-box move
    /// triggers a fresh recompute.
    pub fn drag_elbow(&mut self, pointer: Point, increment: f64) {
        self.elbow.snap_drag(pointer, increment);
        self.elbow_pinned = true;
        self.update_arrow();
    }

    /// Single click on either segment: toggle the selection highlight.
    ///
    /// Swaps the stroke between the stored original color and the
    /// highlight color. Two clicks restore the original exactly, no matter
    /// what moved in between.
    pub fn click(&mut self) {
        match self.state {
            SelectionState::Idle => {
                self.stroke = self.style.highlight.clone();
                self.state = SelectionState::Selected;
            }
            SelectionState::Selected => {
                self.stroke = self.original_stroke.clone();
                self.state = SelectionState::Idle;
            }
            SelectionState::PendingDelete { .. } => {}
        }
    }

    /// Secondary-button double press: enter the delete confirmation.
    ///
    /// Returns false if a confirmation is already pending.
    pub fn request_delete(&mut self) -> bool {
        if matches!(self.state, SelectionState::PendingDelete { .. }) {
            return false;
        }
        self.state = SelectionState::PendingDelete {
            was_selected: self.state == SelectionState::Selected,
        };
        true
    }

    /// Resolve a pending delete confirmation.
    ///
    /// Returns true when the connector should be torn down. Cancelling
    /// restores the prior selection state and mutates nothing else; the
    /// connector is never left half-destroyed.
    pub fn resolve_delete(&mut self, choice: DeleteChoice) -> bool {
        let SelectionState::PendingDelete { was_selected } = self.state else {
            return false;
        };
        match choice {
            DeleteChoice::Confirmed => true,
            DeleteChoice::Cancelled => {
                self.state = if was_selected {
                    SelectionState::Selected
                } else {
                    SelectionState::Idle
                };
                false
            }
        }
    }

    /// The two path segments: horizontal from the start anchor to the
    /// elbow, vertical from the elbow to the end anchor
    pub fn segments(&self) -> [(Point, Point); 2] {
        [
            (self.start.position, self.elbow.position),
            (self.elbow.position, self.end.position),
        ]
    }

    /// Position of the relationship label
    pub fn label_position(&self, config: &EngineConfig) -> Point {
        Point::new(
            self.elbow.position.x + config.label_offset.0,
            self.elbow.position.y + config.label_offset.1,
        )
    }

    /// Build the render primitives for this connector
    pub fn scene(&self, id: ConnectorId, config: &EngineConfig) -> ConnectorScene {
        let [horizontal, vertical] = self.segments();
        let segment = |(from, to): (Point, Point)| LineSegment {
            from,
            to,
            stroke: self.stroke.clone(),
            dash_pattern: config.dash_pattern.clone(),
        };

        ConnectorScene {
            id,
            segments: [segment(horizontal), segment(vertical)],
            arrow: ArrowHead {
                at: self.end.position,
                angle: self.arrow_angle,
                length: config.arrow_length,
                half_width: config.arrow_half_width,
                fill: self.style.arrow_fill.clone(),
            },
            label: TextLabel {
                text: self.label.clone(),
                position: self.label_position(config),
                color: self.style.label_color.clone(),
            },
            markers: [
                AnchorMarker {
                    kind: MarkerKind::Start,
                    center: self.start.position,
                    radius: config.endpoint_marker_radius,
                },
                AnchorMarker {
                    kind: MarkerKind::End,
                    center: self.end.position,
                    radius: config.endpoint_marker_radius,
                },
                AnchorMarker {
                    kind: MarkerKind::Elbow,
                    center: self.elbow.position,
                    radius: config.elbow_marker_radius,
                },
            ],
        }
    }

    /// Derive the elbow from the anchors (horizontal-then-vertical policy)
    /// and refresh the arrowhead
    fn rederive(&mut self) {
        if !self.elbow_pinned {
            self.elbow.position = Point::new(self.end.position.x, self.start.position.y);
        }
        self.update_arrow();
    }

    /// Point the arrowhead along the final segment. A zero-length final
    /// segment would make the angle undefined, so the prior angle is
    /// retained.
    fn update_arrow(&mut self) {
        let from = self.elbow.position;
        let to = self.end.position;
        if from != to {
            self.arrow_angle = (to.y - from.y).atan2(to.x - from.x).to_degrees();
        }
    }
}
