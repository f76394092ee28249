//! SVG generation from a diagram scene.
//!
//! The engine itself never draws; this writer turns the collected render
//! primitives into a standalone SVG snapshot. Used by the CLI and the
//! regression tests; an interactive host would map the same primitives
//! onto its own canvas instead.

use crate::scene::{ConnectorScene, MarkerKind, Scene, SceneBox};
use crate::stylesheet::Stylesheet;

use super::SvgConfig;

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    lines: Vec<String>,
}

impl SvgBuilder {
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            lines: vec![],
        }
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    /// Add a diagram box
    pub fn add_box(&mut self, scene_box: &SceneBox, stylesheet: &Stylesheet) {
        let prefix = self.prefix();
        let stroke = if scene_box.pending_source {
            stylesheet.resolve_or_default("source-highlight")
        } else {
            stylesheet.resolve_or_default("box-stroke")
        };
        self.lines.push(format!(
            r#"  <rect class="{}box" x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}"/>"#,
            prefix,
            num(scene_box.bounds.x),
            num(scene_box.bounds.y),
            num(scene_box.bounds.width),
            num(scene_box.bounds.height),
            stylesheet.resolve_or_default("box-fill"),
            stroke,
        ));
    }

    /// Add all primitives of one connector
    pub fn add_connector(&mut self, connector: &ConnectorScene) {
        let prefix = self.prefix();
        self.lines
            .push(format!(r#"  <g class="{}connector">"#, prefix));

        for segment in &connector.segments {
            let dash = segment
                .dash_pattern
                .as_ref()
                .map(|p| format!(r#" stroke-dasharray="{}""#, p))
                .unwrap_or_default();
            self.lines.push(format!(
                r#"    <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}"{}/>"#,
                num(segment.from.x),
                num(segment.from.y),
                num(segment.to.x),
                num(segment.to.y),
                segment.stroke,
                dash,
            ));
        }

        let points = connector
            .arrow
            .points()
            .iter()
            .map(|p| format!("{},{}", num(p.x), num(p.y)))
            .collect::<Vec<_>>()
            .join(" ");
        self.lines.push(format!(
            r#"    <polygon class="{}arrow" points="{}" fill="{}"/>"#,
            prefix, points, connector.arrow.fill,
        ));

        self.lines.push(format!(
            r#"    <text class="{}label" x="{}" y="{}" fill="{}">{}</text>"#,
            prefix,
            num(connector.label.position.x),
            num(connector.label.position.y),
            connector.label.color,
            escape_text(&connector.label.text),
        ));

        for marker in &connector.markers {
            // Start/end handles are invisible grab areas; the elbow handle
            // is drawn filled so the bend point is visible.
            let (class, fill) = match marker.kind {
                MarkerKind::Start | MarkerKind::End => ("anchor", "transparent".to_string()),
                MarkerKind::Elbow => ("elbow", connector.segments[0].stroke.clone()),
            };
            self.lines.push(format!(
                r#"    <circle class="{}{}" cx="{}" cy="{}" r="{}" fill="{}"/>"#,
                prefix,
                class,
                num(marker.center.x),
                num(marker.center.y),
                num(marker.radius),
                fill,
            ));
        }

        self.lines.push("  </g>".to_string());
    }

    /// Assemble the final SVG document for a scene
    pub fn build(self, scene: &Scene) -> String {
        let bounds = scene.bounds();
        let padding = self.config.viewbox_padding;
        let viewbox = format!(
            "{} {} {} {}",
            num(bounds.x - padding),
            num(bounds.y - padding),
            num(bounds.width + padding * 2.0),
            num(bounds.height + padding * 2.0),
        );

        let mut svg = String::new();
        if self.config.standalone {
            svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        }
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{}\">\n",
            viewbox
        ));
        for line in &self.lines {
            svg.push_str(line);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }
}

/// Render a scene to an SVG string
pub fn render_svg(scene: &Scene, config: &SvgConfig, stylesheet: &Stylesheet) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    for scene_box in &scene.boxes {
        builder.add_box(scene_box, stylesheet);
    }
    for connector in &scene.connectors {
        builder.add_connector(connector);
    }
    builder.build(scene)
}

/// Format a coordinate for SVG output: round to two decimals and normalize
/// negative zero, so rotated geometry doesn't leak float noise
fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}", rounded)
}

/// Escape text content for XML
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;
    use crate::{Diagram, SvgConfig};

    fn sample_scene() -> Scene {
        let mut diagram = Diagram::new();
        let a = diagram.add_box(BoundingBox::new(0.0, 0.0, 100.0, 50.0));
        let b = diagram.add_box(BoundingBox::new(200.0, 150.0, 100.0, 50.0));
        diagram.connect(a, b).unwrap();
        diagram.scene()
    }

    #[test]
    fn test_render_svg_structure() {
        let svg = render_svg(
            &sample_scene(),
            &SvgConfig::default(),
            &Stylesheet::default(),
        );
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("<svg"));
        assert!(svg.ends_with("</svg>\n"));
        assert_eq!(svg.matches("<rect").count(), 2);
        assert_eq!(svg.matches("<line").count(), 2);
        assert_eq!(svg.matches("<circle").count(), 3);
        assert_eq!(svg.matches("<polygon").count(), 1);
        assert!(svg.contains("bl-connector"));
        assert!(svg.contains("stroke-dasharray=\"5,5\""));
        assert!(svg.contains(">Relation</text>"));
    }

    #[test]
    fn test_render_without_prefix_or_declaration() {
        let config = SvgConfig::new()
            .without_class_prefix()
            .with_standalone(false);
        let svg = render_svg(&sample_scene(), &config, &Stylesheet::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("class=\"connector\""));
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(200.0), "200");
        assert_eq!(num(6.123e-17), "0");
        assert_eq!(num(-1.0e-18), "0");
        assert_eq!(num(12.346), "12.35");
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
    }
}
