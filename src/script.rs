//! TOML scene scripts for the replay CLI.
//!
//! A script declares boxes and connectors, then a sequence of events to
//! drive through the engine: box moves, segment clicks, anchor and elbow
//! drags, delete confirmations. Replaying a script produces a [`Diagram`]
//! whose scene can be rendered as an SVG snapshot.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::config::EngineConfig;
use crate::connector::DeleteChoice;
use crate::error::EngineError;
use crate::geometry::{BoundingBox, Point};
use crate::interaction::{AnchorHandle, PointerEvent, PointerTarget, Response};
use crate::stylesheet::Stylesheet;
use crate::surface::ConnectorId;
use crate::Diagram;

/// Errors that can occur when loading or replaying a script
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to read script file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse script TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("unknown box '{0}'")]
    UnknownBox(String),
    #[error("connector index {0} out of range")]
    UnknownConnector(usize),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A declared box
#[derive(Debug, Clone, Deserialize)]
pub struct BoxDecl {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A declared connector; referenced by declaration index in events
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectorDecl {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
}

/// Which boundary anchor an event drags
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleName {
    Start,
    End,
}

/// One scripted interaction
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    /// Translate a box; dependents recompute
    Move { name: String, dx: f64, dy: f64 },
    /// Resize a box in place
    Resize {
        name: String,
        width: f64,
        height: f64,
    },
    /// Single click on a connector segment (selection toggle)
    Click { connector: usize },
    /// Drag a boundary anchor to a pointer position
    DragAnchor {
        connector: usize,
        handle: HandleName,
        x: f64,
        y: f64,
    },
    /// Drag the elbow to a pointer position (grid-snapped)
    DragElbow { connector: usize, x: f64, y: f64 },
    /// Secondary double press plus confirmation prompt answer
    Delete { connector: usize, confirm: bool },
}

/// A parsed scene script
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub boxes: Vec<BoxDecl>,
    #[serde(default)]
    pub connectors: Vec<ConnectorDecl>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Script {
    /// Load a script from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a script from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ScriptError> {
        Ok(toml::from_str(content)?)
    }

    /// Build the diagram and replay every event in order.
    ///
    /// Events go through [`Diagram::dispatch`], so the replay exercises
    /// the same pointer-event paths an interactive host would.
    pub fn run(
        &self,
        config: EngineConfig,
        stylesheet: Stylesheet,
    ) -> Result<Diagram, ScriptError> {
        let mut diagram = Diagram::with_config(config, stylesheet);

        let mut boxes = HashMap::new();
        for decl in &self.boxes {
            let id = diagram.add_box(BoundingBox::new(decl.x, decl.y, decl.width, decl.height));
            boxes.insert(decl.name.clone(), id);
        }
        let lookup = |name: &str| {
            boxes
                .get(name)
                .copied()
                .ok_or_else(|| ScriptError::UnknownBox(name.to_string()))
        };

        let mut connectors: Vec<ConnectorId> = Vec::new();
        for decl in &self.connectors {
            let id = diagram.connect(lookup(&decl.from)?, lookup(&decl.to)?)?;
            if let Some(label) = &decl.label {
                diagram.set_label(id, label.clone())?;
            }
            connectors.push(id);
        }
        let connector = |index: usize| {
            connectors
                .get(index)
                .copied()
                .ok_or(ScriptError::UnknownConnector(index))
        };

        for event in &self.events {
            match event {
                Event::Move { name, dx, dy } => {
                    diagram.move_box(lookup(name)?, *dx, *dy)?;
                }
                Event::Resize {
                    name,
                    width,
                    height,
                } => {
                    let id = lookup(name)?;
                    let bounds = diagram.box_bounds(id)?;
                    diagram.set_box_bounds(
                        id,
                        BoundingBox::new(bounds.x, bounds.y, *width, *height),
                    )?;
                }
                Event::Click { connector: index } => {
                    let id = connector(*index)?;
                    diagram.dispatch(PointerEvent::Click {
                        at: Point::new(0.0, 0.0),
                        target: PointerTarget::Segment(id),
                    })?;
                }
                Event::DragAnchor {
                    connector: index,
                    handle,
                    x,
                    y,
                } => {
                    let id = connector(*index)?;
                    let handle = match handle {
                        HandleName::Start => AnchorHandle::Start,
                        HandleName::End => AnchorHandle::End,
                    };
                    diagram.dispatch(PointerEvent::Drag {
                        at: Point::new(*x, *y),
                        target: PointerTarget::Anchor(id, handle),
                    })?;
                }
                Event::DragElbow {
                    connector: index,
                    x,
                    y,
                } => {
                    let id = connector(*index)?;
                    diagram.dispatch(PointerEvent::Drag {
                        at: Point::new(*x, *y),
                        target: PointerTarget::Anchor(id, AnchorHandle::Elbow),
                    })?;
                }
                Event::Delete {
                    connector: index,
                    confirm,
                } => {
                    let id = connector(*index)?;
                    let response = diagram.dispatch(PointerEvent::SecondaryDoublePress {
                        at: Point::new(0.0, 0.0),
                        target: PointerTarget::Segment(id),
                    })?;
                    if response == Response::DeleteRequested(id) {
                        let choice = if *confirm {
                            DeleteChoice::Confirmed
                        } else {
                            DeleteChoice::Cancelled
                        };
                        diagram.resolve_delete(id, choice)?;
                    }
                }
            }
        }

        Ok(diagram)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[[boxes]]
name = "a"
x = 0.0
y = 0.0
width = 100.0
height = 50.0

[[boxes]]
name = "b"
x = 200.0
y = 150.0
width = 100.0
height = 50.0

[[connectors]]
from = "a"
to = "b"
label = "Dependency"

[[events]]
kind = "move"
name = "b"
dx = 50.0
dy = 0.0

[[events]]
kind = "drag_elbow"
connector = 0
x = 213.0
y = 237.0
"#;

    #[test]
    fn test_parse_sample() {
        let script = Script::from_str(SAMPLE).unwrap();
        assert_eq!(script.boxes.len(), 2);
        assert_eq!(script.connectors.len(), 1);
        assert_eq!(script.events.len(), 2);
    }

    #[test]
    fn test_run_sample() {
        let script = Script::from_str(SAMPLE).unwrap();
        let diagram = script
            .run(EngineConfig::default(), Stylesheet::default())
            .unwrap();

        let ids = diagram.connector_ids();
        assert_eq!(ids.len(), 1);
        let connector = diagram.connector(ids[0]).unwrap();
        assert_eq!(connector.label(), "Dependency");
        // The elbow drag was the final event, so the snapped position
        // survives into the scene.
        assert_eq!(connector.elbow(), Point::new(215.0, 235.0));
    }

    #[test]
    fn test_unknown_box_reference() {
        let script = Script::from_str(
            r#"
[[connectors]]
from = "missing"
to = "also_missing"
"#,
        )
        .unwrap();
        let result = script.run(EngineConfig::default(), Stylesheet::default());
        assert!(matches!(result, Err(ScriptError::UnknownBox(_))));
    }

    #[test]
    fn test_cancelled_delete_keeps_connector() {
        let script = Script::from_str(
            r#"
[[boxes]]
name = "a"
x = 0.0
y = 0.0
width = 50.0
height = 50.0

[[boxes]]
name = "b"
x = 200.0
y = 0.0
width = 50.0
height = 50.0

[[connectors]]
from = "a"
to = "b"

[[events]]
kind = "delete"
connector = 0
confirm = false
"#,
        )
        .unwrap();
        let diagram = script
            .run(EngineConfig::default(), Stylesheet::default())
            .unwrap();
        assert_eq!(diagram.connector_count(), 1);
    }
}
