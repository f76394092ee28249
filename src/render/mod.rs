//! SVG snapshot rendering for diagram scenes

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::render_svg;
