//! # Verso Render
//!
//! Backend-agnostic rendering for Verso scenes.
//!
//! ## Features
//!
//! - **Renderer protocol**: path primitives, styles and transforms, with
//!   optional native text, image and background capabilities
//! - **Scene walking**: components and fragments walked depth-first into an
//!   ordered call sequence
//! - **Components**: canvas, group, path, primitive shapes, text and images
//! - **Fonts**: font capability trait with line wrapping and a cached wrapper
//! - **Settings**: animation duration, frame rate and frame timing
//! - **Backends**: call recording and a self-contained SVG writer
//!
//! ## Architecture
//!
//! ```text
//! SceneNode tree
//!    └── RenderContext (renderer + inherited style)
//!           ├── Component::render ──> Renderer calls
//!           ├── Fragment ──> children in order
//!           └── Renderer::export ──> Artifact
//! ```

use thiserror::Error;
use verso_common::VersoError;
use verso_geometry::GeometryError;
use verso_svg::SvgPathError;

pub mod backends;
pub mod components;
pub mod font;
mod renderer;
mod scene;
pub mod settings;
mod style;

pub use font::{CachedFont, Font, FontMetrics, TextAlign, TextLine, TextOptions};
pub use renderer::{
    draw_instructions, Artifact, BackgroundSink, ImageSink, ImageSource, Renderer, TextSink,
};
pub use scene::{render_frame, render_node_with_renderer, Component, RenderContext, SceneNode};
pub use settings::{FrameInfo, Settings};
pub use style::{Color, InvalidColor, Style};

// ==================== Errors ====================

/// Errors that can occur while rendering a scene.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No renderer provided")]
    NoRenderer,

    #[error("Unknown node kind: {0}. Allowed kinds are components and fragments")]
    UnknownNodeKind(String),

    #[error("Text needs a font when the renderer has no native text support")]
    MissingFont,

    #[error("Invalid path data: {0}")]
    Svg(#[from] SvgPathError),

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Export failed: {0}")]
    Export(String),
}

/// Result type alias for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

impl From<RenderError> for VersoError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Svg(e) => e.into(),
            RenderError::Geometry(e) => e.into(),
            other => VersoError::protocol_with_source("render failed", other),
        }
    }
}
