//! Configuration for the connector engine

/// Tunable parameters for routing, snapping and marker geometry
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Grid increment for free-elbow drags
    pub snap_increment: f64,

    /// Offset of the relationship label from the elbow (dx, dy)
    pub label_offset: (f64, f64),

    /// Radius of the start/end anchor markers
    pub endpoint_marker_radius: f64,

    /// Radius of the elbow marker
    pub elbow_marker_radius: f64,

    /// Arrowhead length along the final segment
    pub arrow_length: f64,

    /// Arrowhead half-width across the final segment
    pub arrow_half_width: f64,

    /// Dash pattern for connector segments, None for solid lines
    pub dash_pattern: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snap_increment: 5.0,
            label_offset: (10.0, -10.0),
            endpoint_marker_radius: 10.0,
            elbow_marker_radius: 5.0,
            arrow_length: 10.0,
            arrow_half_width: 5.0,
            dash_pattern: Some("5,5".to_string()),
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-elbow snap increment
    pub fn with_snap_increment(mut self, increment: f64) -> Self {
        self.snap_increment = increment;
        self
    }

    /// Set the label offset from the elbow
    pub fn with_label_offset(mut self, dx: f64, dy: f64) -> Self {
        self.label_offset = (dx, dy);
        self
    }

    /// Set the arrowhead dimensions
    pub fn with_arrow_size(mut self, length: f64, half_width: f64) -> Self {
        self.arrow_length = length;
        self.arrow_half_width = half_width;
        self
    }

    /// Set the dash pattern for connector segments
    pub fn with_dash_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.dash_pattern = Some(pattern.into());
        self
    }

    /// Draw connector segments as solid lines
    pub fn with_solid_lines(mut self) -> Self {
        self.dash_pattern = None;
        self
    }
}
