//! Renderer implementations.
//!
//! - [`RecordingRenderer`] keeps every call for inspection
//! - [`SvgRenderer`] writes a standalone SVG document

mod recording;
mod svg;

pub use recording::{RecordingRenderer, RenderCall};
pub use svg::SvgRenderer;
