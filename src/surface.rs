//! Diagram surface: box storage and the position-change registry.
//!
//! The surface owns every box on the diagram and is the only code allowed
//! to mutate box geometry. Connectors reference boxes through [`BoxId`]
//! handles and learn about moves through an explicit publish/subscribe
//! registry keyed by box identity, so fan-out and teardown are visible
//! rather than hidden in per-instance listener wiring.

use std::collections::HashMap;
use std::fmt;

use crate::error::EngineError;
use crate::geometry::BoundingBox;

/// Opaque handle to a box owned by the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxId(u32);

impl BoxId {
    pub(crate) fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle to a connector owned by the diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectorId(u32);

impl ConnectorId {
    pub(crate) fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read access to box geometry.
///
/// Connectors recompute against this capability rather than the concrete
/// store, which keeps the routing logic independent of any particular
/// rendering toolkit or container.
pub trait Bounds {
    fn bounds(&self, id: BoxId) -> Result<BoundingBox, EngineError>;
}

/// The box store plus the box-to-connector subscription registry
#[derive(Debug, Default)]
pub struct Surface {
    boxes: HashMap<BoxId, BoundingBox>,
    subscribers: HashMap<BoxId, Vec<ConnectorId>>,
    next_box: u32,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a box and return its handle
    pub fn add_box(&mut self, bounds: BoundingBox) -> BoxId {
        let id = BoxId(self.next_box);
        self.next_box += 1;
        self.boxes.insert(id, bounds);
        id
    }

    /// Whether a box handle is still live
    pub fn contains(&self, id: BoxId) -> bool {
        self.boxes.contains_key(&id)
    }

    /// Number of live boxes
    pub fn box_count(&self) -> usize {
        self.boxes.len()
    }

    /// Live box ids in creation order
    pub fn box_ids(&self) -> Vec<BoxId> {
        let mut ids: Vec<BoxId> = self.boxes.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Translate a box and return the connectors to notify, in
    /// subscription order. The caller dispatches the recomputes so the
    /// ordering guarantee stays in one place.
    pub fn move_box(&mut self, id: BoxId, dx: f64, dy: f64) -> Result<Vec<ConnectorId>, EngineError> {
        let bounds = self
            .boxes
            .get_mut(&id)
            .ok_or(EngineError::InvalidBoxReference { id })?;
        *bounds = bounds.translated(dx, dy);
        Ok(self.subscribers_of(id))
    }

    /// Replace a box's bounds outright (move and resize in one step)
    pub fn set_bounds(
        &mut self,
        id: BoxId,
        bounds: BoundingBox,
    ) -> Result<Vec<ConnectorId>, EngineError> {
        let slot = self
            .boxes
            .get_mut(&id)
            .ok_or(EngineError::InvalidBoxReference { id })?;
        *slot = bounds;
        Ok(self.subscribers_of(id))
    }

    /// Remove a box. Returns the connectors that were subscribed to it;
    /// the diagram tears each of those down.
    pub fn remove_box(&mut self, id: BoxId) -> Result<Vec<ConnectorId>, EngineError> {
        if self.boxes.remove(&id).is_none() {
            return Err(EngineError::InvalidBoxReference { id });
        }
        Ok(self.subscribers.remove(&id).unwrap_or_default())
    }

    /// Register a connector's interest in a box's position changes
    pub fn subscribe(&mut self, id: BoxId, connector: ConnectorId) {
        let list = self.subscribers.entry(id).or_default();
        if !list.contains(&connector) {
            list.push(connector);
        }
    }

    /// Drop a connector's subscription; part of explicit teardown
    pub fn unsubscribe(&mut self, id: BoxId, connector: ConnectorId) {
        if let Some(list) = self.subscribers.get_mut(&id) {
            list.retain(|c| *c != connector);
        }
    }

    /// Connectors currently subscribed to a box, in subscription order
    pub fn subscribers_of(&self, id: BoxId) -> Vec<ConnectorId> {
        self.subscribers.get(&id).cloned().unwrap_or_default()
    }
}

impl Bounds for Surface {
    fn bounds(&self, id: BoxId) -> Result<BoundingBox, EngineError> {
        self.boxes
            .get(&id)
            .copied()
            .ok_or(EngineError::InvalidBoxReference { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;

    #[test]
    fn test_add_and_query_box() {
        let mut surface = Surface::new();
        let id = surface.add_box(BoundingBox::new(0.0, 0.0, 100.0, 50.0));
        assert!(surface.contains(id));
        assert_eq!(
            surface.bounds(id).unwrap(),
            BoundingBox::new(0.0, 0.0, 100.0, 50.0)
        );
    }

    #[test]
    fn test_move_box_translates_bounds() {
        let mut surface = Surface::new();
        let id = surface.add_box(BoundingBox::new(10.0, 10.0, 50.0, 50.0));
        surface.move_box(id, 40.0, -10.0).unwrap();
        assert_eq!(
            surface.bounds(id).unwrap(),
            BoundingBox::new(50.0, 0.0, 50.0, 50.0)
        );
    }

    #[test]
    fn test_removed_box_is_invalid_reference() {
        let mut surface = Surface::new();
        let id = surface.add_box(BoundingBox::zero());
        surface.remove_box(id).unwrap();
        assert_eq!(
            surface.bounds(id),
            Err(EngineError::InvalidBoxReference { id })
        );
        assert_eq!(
            surface.move_box(id, 1.0, 1.0),
            Err(EngineError::InvalidBoxReference { id })
        );
    }

    #[test]
    fn test_subscription_order_preserved() {
        let mut surface = Surface::new();
        let id = surface.add_box(BoundingBox::zero());
        let first = ConnectorId(0);
        let second = ConnectorId(1);
        surface.subscribe(id, second);
        surface.subscribe(id, first);
        surface.subscribe(id, second); // duplicate is ignored

        assert_eq!(surface.subscribers_of(id), vec![second, first]);
        assert_eq!(surface.move_box(id, 1.0, 0.0).unwrap(), vec![second, first]);
    }

    #[test]
    fn test_unsubscribe_removes_interest() {
        let mut surface = Surface::new();
        let id = surface.add_box(BoundingBox::zero());
        let connector = ConnectorId(4);
        surface.subscribe(id, connector);
        surface.unsubscribe(id, connector);
        assert!(surface.subscribers_of(id).is_empty());
    }

    #[test]
    fn test_remove_box_returns_orphaned_subscribers() {
        let mut surface = Surface::new();
        let id = surface.add_box(BoundingBox::zero());
        surface.subscribe(id, ConnectorId(2));
        let orphaned = surface.remove_box(id).unwrap();
        assert_eq!(orphaned, vec![ConnectorId(2)]);
        assert!(surface.subscribers_of(id).is_empty());
    }
}
