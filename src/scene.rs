//! Render primitives pushed to the drawing surface.
//!
//! The engine never draws pixels. Each connector exposes a small fixed set
//! of primitives (two line segments, one arrowhead polygon, one text label,
//! three anchor markers) and the surface renders them however it likes.

use crate::geometry::{BoundingBox, Point};
use crate::surface::{BoxId, ConnectorId};

/// A straight line segment with stroke styling
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    pub from: Point,
    pub to: Point,
    pub stroke: String,
    pub dash_pattern: Option<String>,
}

/// The arrowhead polygon at a connector's end anchor.
///
/// The base triangle points along +x with its tip at the origin:
/// `(0,0) (-length, half_width) (-length, -half_width)`. Rendering rotates
/// it by `angle` degrees and translates it to `at`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowHead {
    pub at: Point,
    /// Rotation in degrees, following the final segment's direction
    pub angle: f64,
    pub length: f64,
    pub half_width: f64,
    pub fill: String,
}

impl ArrowHead {
    /// The three transformed vertices, tip first
    pub fn points(&self) -> [Point; 3] {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let transform = |x: f64, y: f64| {
            Point::new(
                self.at.x + x * cos - y * sin,
                self.at.y + x * sin + y * cos,
            )
        };
        [
            transform(0.0, 0.0),
            transform(-self.length, self.half_width),
            transform(-self.length, -self.half_width),
        ]
    }
}

/// The relationship label next to the elbow
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub position: Point,
    pub color: String,
}

/// Which handle an anchor marker represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Start,
    End,
    Elbow,
}

/// A draggable circular handle drawn over an anchor
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorMarker {
    pub kind: MarkerKind,
    pub center: Point,
    pub radius: f64,
}

/// Everything one connector contributes to the scene
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorScene {
    pub id: ConnectorId,
    pub segments: [LineSegment; 2],
    pub arrow: ArrowHead,
    pub label: TextLabel,
    pub markers: [AnchorMarker; 3],
}

/// A box as the renderer sees it
#[derive(Debug, Clone, PartialEq)]
pub struct SceneBox {
    pub id: BoxId,
    pub bounds: BoundingBox,
    /// Highlighted as the pending source of a pairing sequence
    pub pending_source: bool,
}

/// A full snapshot of the diagram's render state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub boxes: Vec<SceneBox>,
    pub connectors: Vec<ConnectorScene>,
}

impl Scene {
    /// Bounding box containing every box and connector primitive
    pub fn bounds(&self) -> BoundingBox {
        let mut iter_started = false;
        let mut bounds = BoundingBox::zero();

        let mut include = |point: Point| {
            if iter_started {
                bounds = bounds.expand_to_include(point);
            } else {
                bounds = BoundingBox::new(point.x, point.y, 0.0, 0.0);
                iter_started = true;
            }
        };

        for scene_box in &self.boxes {
            include(Point::new(scene_box.bounds.x, scene_box.bounds.y));
            include(Point::new(
                scene_box.bounds.right(),
                scene_box.bounds.bottom(),
            ));
        }
        for connector in &self.connectors {
            for segment in &connector.segments {
                include(segment.from);
                include(segment.to);
            }
            for vertex in connector.arrow.points() {
                include(vertex);
            }
            include(connector.label.position);
        }

        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_arrowhead_points_unrotated() {
        let arrow = ArrowHead {
            at: Point::new(100.0, 50.0),
            angle: 0.0,
            length: 10.0,
            half_width: 5.0,
            fill: "#000000".to_string(),
        };
        let [tip, upper, lower] = arrow.points();
        assert!(close(tip, Point::new(100.0, 50.0)));
        assert!(close(upper, Point::new(90.0, 55.0)));
        assert!(close(lower, Point::new(90.0, 45.0)));
    }

    #[test]
    fn test_arrowhead_points_rotated_down() {
        // 90 degrees: the arrow points down the vertical segment.
        let arrow = ArrowHead {
            at: Point::new(200.0, 175.0),
            angle: 90.0,
            length: 10.0,
            half_width: 5.0,
            fill: "#000000".to_string(),
        };
        let [tip, upper, lower] = arrow.points();
        assert!(close(tip, Point::new(200.0, 175.0)));
        assert!(close(upper, Point::new(195.0, 165.0)));
        assert!(close(lower, Point::new(205.0, 165.0)));
    }

    #[test]
    fn test_scene_bounds_spans_boxes_and_paths() {
        let scene = Scene {
            boxes: vec![SceneBox {
                id: crate::surface::BoxId::from_raw(0),
                bounds: BoundingBox::new(0.0, 0.0, 100.0, 50.0),
                pending_source: false,
            }],
            connectors: vec![],
        };
        assert_eq!(scene.bounds(), BoundingBox::new(0.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn test_empty_scene_bounds_is_zero() {
        assert_eq!(Scene::default().bounds(), BoundingBox::zero());
    }
}
