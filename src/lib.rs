//! Boxlink - live orthogonal connector routing between movable boxes
//!
//! This library keeps a visual link between two rectangular boxes routed,
//! re-anchored and re-rendered as either box moves, is dragged, or is
//! clicked. The diagram surface owns the boxes and delivers position
//! changes and pointer events; the engine answers with geometry: boundary
//! anchors, a single-elbow orthogonal path, an oriented arrowhead and a
//! label.
//!
//! # Example
//!
//! ```rust
//! use boxlink::{BoundingBox, Diagram};
//!
//! let mut diagram = Diagram::new();
//! let a = diagram.add_box(BoundingBox::new(0.0, 0.0, 100.0, 50.0));
//! let b = diagram.add_box(BoundingBox::new(200.0, 150.0, 100.0, 50.0));
//! let link = diagram.connect(a, b).unwrap();
//!
//! // Moving a box re-routes every connector subscribed to it.
//! diagram.move_box(b, 50.0, 0.0).unwrap();
//! let connector = diagram.connector(link).unwrap();
//! assert_eq!(connector.elbow().x, connector.end_anchor().position.x);
//! assert_eq!(connector.elbow().y, connector.start_anchor().position.y);
//! ```

pub mod anchor;
pub mod config;
pub mod connector;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod render;
pub mod scene;
pub mod script;
pub mod stylesheet;
pub mod surface;

pub use anchor::{Anchor, AnchorMode};
pub use config::EngineConfig;
pub use connector::{Connector, ConnectorStyle, DeleteChoice, SelectionState};
pub use error::EngineError;
pub use geometry::{BoundingBox, Edge, Point};
pub use interaction::{AnchorHandle, PointerEvent, PointerTarget, Response};
pub use render::{render_svg, SvgConfig};
pub use scene::Scene;
pub use stylesheet::{Stylesheet, StylesheetError};
pub use surface::{Bounds, BoxId, ConnectorId, Surface};

use std::collections::BTreeMap;

use interaction::{Pairing, PairingOutcome};

/// The engine facade: the box surface, the connectors, and the pairing
/// controller, driven synchronously by move notifications and pointer
/// events.
///
/// All recomputation happens on the calling thread, in the order the
/// notifications arrive. A box may be referenced by any number of
/// connectors; each one is independently consistent after its own
/// recompute.
#[derive(Debug, Default)]
pub struct Diagram {
    surface: Surface,
    connectors: BTreeMap<ConnectorId, Connector>,
    pairing: Pairing,
    config: EngineConfig,
    stylesheet: Stylesheet,
    next_connector: u32,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a diagram with a custom configuration and stylesheet
    pub fn with_config(config: EngineConfig, stylesheet: Stylesheet) -> Self {
        Self {
            config,
            stylesheet,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stylesheet(&self) -> &Stylesheet {
        &self.stylesheet
    }

    // --- boxes -----------------------------------------------------------

    /// Add a box and return its handle
    pub fn add_box(&mut self, bounds: BoundingBox) -> BoxId {
        self.surface.add_box(bounds)
    }

    /// Current bounds of a box
    pub fn box_bounds(&self, id: BoxId) -> Result<BoundingBox, EngineError> {
        self.surface.bounds(id)
    }

    /// Translate a box and recompute every subscribed connector, in
    /// subscription order
    pub fn move_box(&mut self, id: BoxId, dx: f64, dy: f64) -> Result<(), EngineError> {
        let to_notify = self.surface.move_box(id, dx, dy)?;
        self.notify(to_notify);
        Ok(())
    }

    /// Replace a box's bounds (move and resize) and recompute dependents
    pub fn set_box_bounds(&mut self, id: BoxId, bounds: BoundingBox) -> Result<(), EngineError> {
        let to_notify = self.surface.set_bounds(id, bounds)?;
        self.notify(to_notify);
        Ok(())
    }

    /// Remove a box and tear down every connector attached to it
    pub fn remove_box(&mut self, id: BoxId) -> Result<(), EngineError> {
        let orphaned = self.surface.remove_box(id)?;
        for connector_id in orphaned {
            self.teardown_connector(connector_id);
        }
        self.pairing.forget(id);
        Ok(())
    }

    // --- connectors ------------------------------------------------------

    /// Create a connector from one box to another.
    ///
    /// This is what a completed pairing sequence calls; hosts building a
    /// diagram programmatically call it directly.
    pub fn connect(&mut self, from: BoxId, to: BoxId) -> Result<ConnectorId, EngineError> {
        let from_bounds = self.surface.bounds(from)?;
        let to_bounds = self.surface.bounds(to)?;

        let style = ConnectorStyle {
            stroke: self.stylesheet.resolve_or_default("line"),
            highlight: self.stylesheet.resolve_or_default("highlight"),
            arrow_fill: self.stylesheet.resolve_or_default("arrow"),
            label_color: self.stylesheet.resolve_or_default("label"),
        };
        let connector = Connector::new(from, &from_bounds, to, &to_bounds, style);

        let id = ConnectorId::from_raw(self.next_connector);
        self.next_connector += 1;
        self.connectors.insert(id, connector);
        self.surface.subscribe(from, id);
        self.surface.subscribe(to, id);
        Ok(id)
    }

    pub fn connector(&self, id: ConnectorId) -> Option<&Connector> {
        self.connectors.get(&id)
    }

    /// Live connector ids in creation order
    pub fn connector_ids(&self) -> Vec<ConnectorId> {
        self.connectors.keys().copied().collect()
    }

    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    /// Set the relationship label of a connector
    pub fn set_label(&mut self, id: ConnectorId, text: impl Into<String>) -> Result<(), EngineError> {
        self.connectors
            .get_mut(&id)
            .ok_or(EngineError::UnknownConnector { id })?
            .set_label(text);
        Ok(())
    }

    /// Resolve a pending delete confirmation. Returns true when the
    /// connector was torn down; cancelling leaves everything untouched.
    pub fn resolve_delete(
        &mut self,
        id: ConnectorId,
        choice: DeleteChoice,
    ) -> Result<bool, EngineError> {
        let connector = self
            .connectors
            .get_mut(&id)
            .ok_or(EngineError::UnknownConnector { id })?;
        if connector.resolve_delete(choice) {
            self.teardown_connector(id);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    // --- pairing ---------------------------------------------------------

    /// Enable or disable the source→target pairing mode
    pub fn set_pairing_enabled(&mut self, enabled: bool) {
        self.pairing.set_enabled(enabled);
    }

    pub fn pairing_enabled(&self) -> bool {
        self.pairing.enabled()
    }

    /// The box currently armed as pending source, if any
    pub fn pending_source(&self) -> Option<BoxId> {
        self.pairing.pending()
    }

    // --- pointer events --------------------------------------------------

    /// Dispatch a low-level pointer event to the right transition
    pub fn dispatch(&mut self, event: PointerEvent) -> Result<Response, EngineError> {
        match event {
            PointerEvent::Click {
                target: PointerTarget::Box(id),
                ..
            } => self.click_box(id),
            PointerEvent::Click {
                target: PointerTarget::Segment(id),
                ..
            } => {
                self.connectors
                    .get_mut(&id)
                    .ok_or(EngineError::UnknownConnector { id })?
                    .click();
                Ok(Response::SelectionToggled(id))
            }
            PointerEvent::Drag {
                at,
                target: PointerTarget::Anchor(id, handle),
            } => self.drag_anchor(id, handle, at),
            PointerEvent::SecondaryDoublePress {
                target: PointerTarget::Segment(id),
                ..
            } => {
                let requested = self
                    .connectors
                    .get_mut(&id)
                    .ok_or(EngineError::UnknownConnector { id })?
                    .request_delete();
                if requested {
                    Ok(Response::DeleteRequested(id))
                } else {
                    Ok(Response::Ignored)
                }
            }
            // Presses arm nothing on their own, and drags on boxes belong
            // to the surface, not the engine.
            _ => Ok(Response::Ignored),
        }
    }

    fn click_box(&mut self, id: BoxId) -> Result<Response, EngineError> {
        if !self.surface.contains(id) {
            return Err(EngineError::InvalidBoxReference { id });
        }
        match self.pairing.click_box(id) {
            PairingOutcome::Inactive => Ok(Response::Ignored),
            PairingOutcome::Armed(source) => Ok(Response::SourceArmed(source)),
            PairingOutcome::Cleared => Ok(Response::SourceCleared),
            PairingOutcome::Completed { source, target } => {
                let connector_id = self.connect(source, target)?;
                Ok(Response::ConnectorCreated(connector_id))
            }
        }
    }

    fn drag_anchor(
        &mut self,
        id: ConnectorId,
        handle: AnchorHandle,
        pointer: Point,
    ) -> Result<Response, EngineError> {
        let connector = self
            .connectors
            .get_mut(&id)
            .ok_or(EngineError::UnknownConnector { id })?;
        let result = match handle {
            AnchorHandle::Start => connector.drag_start_anchor(pointer, &self.surface),
            AnchorHandle::End => connector.drag_end_anchor(pointer, &self.surface),
            AnchorHandle::Elbow => {
                connector.drag_elbow(pointer, self.config.snap_increment);
                Ok(())
            }
        };
        match result {
            Ok(()) => Ok(Response::AnchorMoved(id)),
            // The owner box is gone: this connector is done for, same path
            // as an explicit delete.
            Err(err) => {
                self.teardown_connector(id);
                Err(err)
            }
        }
    }

    // --- scene -----------------------------------------------------------

    /// Snapshot of every render primitive, in deterministic order
    pub fn scene(&self) -> Scene {
        let boxes = self
            .surface
            .box_ids()
            .into_iter()
            .filter_map(|id| {
                let bounds = self.surface.bounds(id).ok()?;
                Some(scene::SceneBox {
                    id,
                    bounds,
                    pending_source: self.pairing.pending() == Some(id),
                })
            })
            .collect();
        let connectors = self
            .connectors
            .iter()
            .map(|(id, connector)| connector.scene(*id, &self.config))
            .collect();
        Scene { boxes, connectors }
    }

    // --- internals -------------------------------------------------------

    /// Recompute each notified connector in order; a connector whose box
    /// vanished is torn down rather than left dangling
    fn notify(&mut self, connectors: Vec<ConnectorId>) {
        for id in connectors {
            let recomputed = match self.connectors.get_mut(&id) {
                Some(connector) => connector.recompute(&self.surface),
                None => continue,
            };
            if recomputed.is_err() {
                self.teardown_connector(id);
            }
        }
    }

    /// Remove a connector and its subscriptions; the terminal state of the
    /// delete machine and of [`EngineError::InvalidBoxReference`]
    fn teardown_connector(&mut self, id: ConnectorId) {
        if let Some(connector) = self.connectors.remove(&id) {
            self.surface.unsubscribe(connector.start_box(), id);
            self.surface.unsubscribe(connector.end_box(), id);
        }
    }
}
