//! The renderer protocol.

use crate::{Color, RenderResult, Style, TextOptions};
use verso_geometry::{DrawingInstruction, Transform};

/// Output of a finished render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File extension without the dot, e.g. `svg`.
    pub extension: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Artifact {
    pub fn new(extension: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            extension: extension.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Payload as UTF-8 text, for text formats.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

/// Encoded image handed to renderers that can place images.
///
/// Decoding is left to the backend; only the intrinsic size is needed to
/// resolve missing dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    pub width: u32,
    pub height: u32,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImageSource {
    pub fn new(width: u32, height: u32, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Width divided by height, `1` for a zero-height image.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 1.0;
        }
        f64::from(self.width) / f64::from(self.height)
    }

    /// Resolve the drawn size; a single given dimension keeps the aspect ratio.
    pub fn resolve_size(&self, width: Option<f64>, height: Option<f64>) -> (f64, f64) {
        let ratio = self.aspect_ratio();
        match (width, height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w / ratio),
            (None, Some(h)) => (h * ratio, h),
            (None, None) => (f64::from(self.width), f64::from(self.height)),
        }
    }
}

// ==================== Capabilities ====================

/// Native text drawing.
pub trait TextSink {
    fn text(&mut self, text: &str, x: f64, y: f64, options: &TextOptions);
}

/// Native image placement.
pub trait ImageSink {
    fn image(&mut self, image: &ImageSource, x: f64, y: f64, width: f64, height: f64);
}

/// Native canvas background fill.
pub trait BackgroundSink {
    fn background(&mut self, color: &Color);
}

// ==================== Renderer ====================

/// A drawing backend.
///
/// The walker drives a renderer with one `begin_path`/`end_path` bracket per
/// shape, followed by `apply_styles` for that shape. `transform` multiplies
/// onto the current matrix; groups undo their own transform by sending the
/// inverse afterwards.
///
/// Optional capabilities are exposed through the `native_*` methods. A
/// renderer that returns `None` gets path-based fallbacks where one exists.
pub trait Renderer {
    fn setup(&mut self, width: f64, height: f64, density: f64);

    fn begin_path(&mut self);

    fn move_to(&mut self, x: f64, y: f64);

    fn line_to(&mut self, x: f64, y: f64);

    fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64);

    fn close(&mut self);

    fn end_path(&mut self);

    fn apply_styles(&mut self, style: &Style);

    fn transform(&mut self, matrix: &Transform);

    fn export(&self) -> RenderResult<Artifact>;

    fn native_text(&mut self) -> Option<&mut dyn TextSink> {
        None
    }

    fn native_image(&mut self) -> Option<&mut dyn ImageSink> {
        None
    }

    fn native_background(&mut self) -> Option<&mut dyn BackgroundSink> {
        None
    }
}

/// Forward canonical instructions to the path primitives.
pub fn draw_instructions(renderer: &mut dyn Renderer, instructions: &[DrawingInstruction]) {
    for instruction in instructions {
        match *instruction {
            DrawingInstruction::MoveTo(x, y) => renderer.move_to(x, y),
            DrawingInstruction::LineTo(x, y) => renderer.line_to(x, y),
            DrawingInstruction::CurveTo(x1, y1, x2, y2, x3, y3) => {
                renderer.curve_to(x1, y1, x2, y2, x3, y3)
            }
            DrawingInstruction::Close => renderer.close(),
        }
    }
}
