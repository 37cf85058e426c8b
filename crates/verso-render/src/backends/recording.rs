//! A renderer that records every call.

use crate::{
    Artifact, BackgroundSink, Color, ImageSink, ImageSource, RenderResult, Renderer, Style,
    TextOptions, TextSink,
};
use std::fmt;
use verso_geometry::Transform;

/// One recorded renderer call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Setup { width: f64, height: f64, density: f64 },
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    CurveTo(f64, f64, f64, f64, f64, f64),
    Close,
    EndPath,
    ApplyStyles(Style),
    Transform(Transform),
    Text { text: String, x: f64, y: f64, font_size: f64 },
    Image { x: f64, y: f64, width: f64, height: f64 },
    Background(Color),
}

fn write_style(f: &mut fmt::Formatter<'_>, style: &Style) -> fmt::Result {
    f.write_str("apply_styles")?;
    if let Some(fill) = &style.fill {
        write!(f, " fill={fill}")?;
    }
    if let Some(stroke) = &style.stroke {
        write!(f, " stroke={stroke}")?;
    }
    if let Some(width) = style.stroke_width {
        write!(f, " stroke_width={width}")?;
    }
    Ok(())
}

impl fmt::Display for RenderCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderCall::Setup {
                width,
                height,
                density,
            } => write!(f, "setup {width} {height} {density}"),
            RenderCall::BeginPath => f.write_str("begin_path"),
            RenderCall::MoveTo(x, y) => write!(f, "move_to {x} {y}"),
            RenderCall::LineTo(x, y) => write!(f, "line_to {x} {y}"),
            RenderCall::CurveTo(x1, y1, x2, y2, x, y) => {
                write!(f, "curve_to {x1} {y1} {x2} {y2} {x} {y}")
            }
            RenderCall::Close => f.write_str("close"),
            RenderCall::EndPath => f.write_str("end_path"),
            RenderCall::ApplyStyles(style) => write_style(f, style),
            RenderCall::Transform(m) => {
                write!(f, "transform {} {} {} {} {} {}", m.a, m.b, m.c, m.d, m.tx, m.ty)
            }
            RenderCall::Text {
                text,
                x,
                y,
                font_size,
            } => write!(f, "text {text:?} {x} {y} {font_size}"),
            RenderCall::Image {
                x,
                y,
                width,
                height,
            } => write!(f, "image {x} {y} {width} {height}"),
            RenderCall::Background(color) => write!(f, "background {color}"),
        }
    }
}

/// Records calls in order. Native capabilities are off unless enabled, so
/// the path fallbacks are what gets recorded by default.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: Vec<RenderCall>,
    native_text: bool,
    native_images: bool,
    native_background: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_native_text(mut self) -> Self {
        self.native_text = true;
        self
    }

    pub fn with_native_images(mut self) -> Self {
        self.native_images = true;
        self
    }

    pub fn with_native_background(mut self) -> Self {
        self.native_background = true;
        self
    }

    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<RenderCall> {
        std::mem::take(&mut self.calls)
    }

    fn record(&mut self, call: RenderCall) {
        self.calls.push(call);
    }
}

impl Renderer for RecordingRenderer {
    fn setup(&mut self, width: f64, height: f64, density: f64) {
        self.record(RenderCall::Setup {
            width,
            height,
            density,
        });
    }

    fn begin_path(&mut self) {
        self.record(RenderCall::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.record(RenderCall::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.record(RenderCall::LineTo(x, y));
    }

    fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        self.record(RenderCall::CurveTo(x1, y1, x2, y2, x3, y3));
    }

    fn close(&mut self) {
        self.record(RenderCall::Close);
    }

    fn end_path(&mut self) {
        self.record(RenderCall::EndPath);
    }

    fn apply_styles(&mut self, style: &Style) {
        self.record(RenderCall::ApplyStyles(style.clone()));
    }

    fn transform(&mut self, matrix: &Transform) {
        self.record(RenderCall::Transform(*matrix));
    }

    /// One call per line.
    fn export(&self) -> RenderResult<Artifact> {
        let text: String = self.calls.iter().map(|call| format!("{call}\n")).collect();
        Ok(Artifact::new("txt", "text/plain", text.into_bytes()))
    }

    fn native_text(&mut self) -> Option<&mut dyn TextSink> {
        if self.native_text {
            Some(self)
        } else {
            None
        }
    }

    fn native_image(&mut self) -> Option<&mut dyn ImageSink> {
        if self.native_images {
            Some(self)
        } else {
            None
        }
    }

    fn native_background(&mut self) -> Option<&mut dyn BackgroundSink> {
        if self.native_background {
            Some(self)
        } else {
            None
        }
    }
}

impl TextSink for RecordingRenderer {
    fn text(&mut self, text: &str, x: f64, y: f64, options: &TextOptions) {
        self.record(RenderCall::Text {
            text: text.to_string(),
            x,
            y,
            font_size: options.font_size,
        });
    }
}

impl ImageSink for RecordingRenderer {
    fn image(&mut self, _image: &ImageSource, x: f64, y: f64, width: f64, height: f64) {
        self.record(RenderCall::Image {
            x,
            y,
            width,
            height,
        });
    }
}

impl BackgroundSink for RecordingRenderer {
    fn background(&mut self, color: &Color) {
        self.record(RenderCall::Background(*color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_off_by_default() {
        let mut renderer = RecordingRenderer::new();
        assert!(renderer.native_text().is_none());
        assert!(renderer.native_image().is_none());
        assert!(renderer.native_background().is_none());

        let mut renderer = RecordingRenderer::new().with_native_text().with_native_background();
        assert!(renderer.native_text().is_some());
        assert!(renderer.native_image().is_none());
        if let Some(sink) = renderer.native_background() {
            sink.background(&Color::WHITE);
        }
        assert_eq!(renderer.calls(), &[RenderCall::Background(Color::WHITE)]);
    }

    #[test]
    fn test_export_lines() {
        let mut renderer = RecordingRenderer::new();
        renderer.setup(100.0, 50.0, 1.0);
        renderer.begin_path();
        renderer.move_to(0.0, 0.0);
        renderer.curve_to(1.0, 2.0, 3.0, 4.0, 5.5, 6.0);
        renderer.close();
        renderer.end_path();
        renderer.apply_styles(&Style::new().fill(Color::BLACK).stroke_width(2.0));
        renderer.transform(&Transform::translation(3.0, 4.0));

        let artifact = renderer.export().unwrap();
        assert_eq!(artifact.mime_type, "text/plain");
        assert_eq!(
            artifact.as_text().unwrap(),
            "setup 100 50 1\n\
             begin_path\n\
             move_to 0 0\n\
             curve_to 1 2 3 4 5.5 6\n\
             close\n\
             end_path\n\
             apply_styles fill=#000000 stroke_width=2\n\
             transform 1 0 0 1 3 4\n"
        );

        assert_eq!(renderer.take_calls().len(), 8);
        assert!(renderer.calls().is_empty());
    }
}
