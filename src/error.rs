//! Error types for the connector engine

use thiserror::Error;

use crate::surface::{BoxId, ConnectorId};

/// Errors that can occur while driving the engine.
///
/// Geometric operations are total: degenerate boxes, exact edge-distance
/// ties and zero-length segments are all resolved by clamping and the fixed
/// tie order, never by failing. What remains is stale references.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A connector was asked to recompute against a box that no longer
    /// exists. Fatal to that connector only; the diagram tears it down
    /// through the same path as an explicit delete.
    #[error("box {id} no longer exists")]
    InvalidBoxReference { id: BoxId },

    /// An operation addressed a connector that was already torn down
    #[error("connector {id} no longer exists")]
    UnknownConnector { id: ConnectorId },
}

impl EngineError {
    pub fn invalid_box(id: BoxId) -> Self {
        Self::InvalidBoxReference { id }
    }

    pub fn unknown_connector(id: ConnectorId) -> Self {
        Self::UnknownConnector { id }
    }
}
