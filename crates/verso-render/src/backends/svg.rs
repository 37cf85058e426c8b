//! SVG document backend.
//!
//! Every finished path becomes a `<path>` element carrying the transform
//! that was current when it was drawn. Text and images are written natively,
//! images inlined as base64 data URLs.

use crate::{
    Artifact, BackgroundSink, Color, ImageSink, ImageSource, RenderResult, Renderer, Style,
    TextAlign, TextOptions, TextSink,
};
use base64::Engine;
use std::fmt::Write as _;
use tracing::trace;
use verso_geometry::{DrawingInstruction, Transform, EPSILON};
use verso_svg::serialize_instructions;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementKind {
    Path,
    Text,
    Other,
}

#[derive(Debug, Clone)]
struct Element {
    tag: &'static str,
    kind: ElementKind,
    attrs: Vec<(&'static str, String)>,
    content: Option<String>,
}

impl Element {
    fn new(tag: &'static str, kind: ElementKind) -> Self {
        Self {
            tag,
            kind,
            attrs: Vec::new(),
            content: None,
        }
    }

    fn set(&mut self, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name, value)),
        }
    }

    fn write_to(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        match &self.content {
            Some(content) => {
                let _ = write!(out, ">{}</{}>", escape(content), self.tag);
            }
            None => out.push_str("/>"),
        }
    }
}

/// Drawing state between calls.
#[derive(Debug, Clone)]
struct SvgState {
    path: Vec<DrawingInstruction>,
    /// Element that the next `apply_styles` targets.
    current: Option<usize>,
    transform: Transform,
    /// Applied matrices with the transform that was current before each.
    saved: Vec<(Transform, Transform)>,
}

impl Default for SvgState {
    fn default() -> Self {
        Self {
            path: Vec::new(),
            current: None,
            transform: Transform::IDENTITY,
            saved: Vec::new(),
        }
    }
}

/// Writes scenes as standalone SVG documents.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    width: f64,
    height: f64,
    elements: Vec<Element>,
    state: SvgState,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The document as a string.
    pub fn to_svg_string(&self) -> String {
        let (w, h) = (number(self.width), number(self.height));
        let mut out = String::new();
        let _ = writeln!(
            out,
            "<svg xmlns=\"{SVG_NAMESPACE}\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">"
        );
        for element in &self.elements {
            out.push_str("  ");
            element.write_to(&mut out);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }

    fn push(&mut self, mut element: Element) -> usize {
        if !self.state.transform.is_identity() {
            let m = self.state.transform;
            element.set(
                "transform",
                format!(
                    "matrix({} {} {} {} {} {})",
                    number(m.a),
                    number(m.b),
                    number(m.c),
                    number(m.d),
                    number(m.tx),
                    number(m.ty)
                ),
            );
        }
        self.elements.push(element);
        self.elements.len() - 1
    }
}

fn number(v: f64) -> String {
    if v == 0.0 {
        "0".to_string()
    } else {
        v.to_string()
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

impl Renderer for SvgRenderer {
    /// Starts a new document.
    fn setup(&mut self, width: f64, height: f64, _density: f64) {
        self.width = width;
        self.height = height;
        self.elements.clear();
        self.state = SvgState::default();
    }

    fn begin_path(&mut self) {
        self.state.path.clear();
        self.state.current = None;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.state.path.push(DrawingInstruction::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.state.path.push(DrawingInstruction::LineTo(x, y));
    }

    fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        self.state
            .path
            .push(DrawingInstruction::CurveTo(x1, y1, x2, y2, x3, y3));
    }

    fn close(&mut self) {
        self.state.path.push(DrawingInstruction::Close);
    }

    fn end_path(&mut self) {
        if self.state.path.is_empty() {
            self.state.current = None;
            return;
        }
        let path = std::mem::take(&mut self.state.path);
        let mut element = Element::new("path", ElementKind::Path);
        element.set("d", serialize_instructions(&path));
        self.state.current = Some(self.push(element));
    }

    fn apply_styles(&mut self, style: &Style) {
        let Some(element) = self.state.current.and_then(|i| self.elements.get_mut(i)) else {
            trace!("No element to style");
            return;
        };

        match (style.fill, element.kind) {
            (Some(fill), _) => element.set("fill", fill.to_css()),
            // unfilled paths stay unpainted, text keeps the default fill
            (None, ElementKind::Path) => element.set("fill", "none"),
            (None, _) => {}
        }
        if let Some(stroke) = style.stroke {
            element.set("stroke", stroke.to_css());
            element.set("stroke-width", number(style.stroke_width.unwrap_or(1.0)));
        }
    }

    /// A matrix that undoes the last applied one restores the saved
    /// transform exactly, so siblings never inherit rounding residue.
    fn transform(&mut self, matrix: &Transform) {
        let undoes_last = self.state.saved.last().is_some_and(|(applied, _)| {
            applied
                .append(matrix)
                .approx_eq(&Transform::IDENTITY, EPSILON)
        });
        if undoes_last {
            if let Some((_, previous)) = self.state.saved.pop() {
                self.state.transform = previous;
            }
            return;
        }
        self.state.saved.push((*matrix, self.state.transform));
        self.state.transform = self.state.transform.append(matrix);
    }

    fn export(&self) -> RenderResult<Artifact> {
        Ok(Artifact::new(
            "svg",
            "image/svg+xml",
            self.to_svg_string().into_bytes(),
        ))
    }

    fn native_text(&mut self) -> Option<&mut dyn TextSink> {
        Some(self)
    }

    fn native_image(&mut self) -> Option<&mut dyn ImageSink> {
        Some(self)
    }

    fn native_background(&mut self) -> Option<&mut dyn BackgroundSink> {
        Some(self)
    }
}

impl TextSink for SvgRenderer {
    fn text(&mut self, text: &str, x: f64, y: f64, options: &TextOptions) {
        let mut element = Element::new("text", ElementKind::Text);
        element.set("x", number(x));
        element.set("y", number(y));
        element.set("font-size", number(options.font_size));
        if let Some(family) = &options.font_family {
            element.set("font-family", family.clone());
        }
        match options.align {
            TextAlign::Left => {}
            TextAlign::Center => element.set("text-anchor", "middle"),
            TextAlign::Right => element.set("text-anchor", "end"),
        }
        element.content = Some(text.to_string());
        self.state.current = Some(self.push(element));
    }
}

impl ImageSink for SvgRenderer {
    fn image(&mut self, image: &ImageSource, x: f64, y: f64, width: f64, height: f64) {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&image.data);
        let mut element = Element::new("image", ElementKind::Other);
        element.set("href", format!("data:{};base64,{}", image.mime_type, encoded));
        element.set("x", number(x));
        element.set("y", number(y));
        element.set("width", number(width));
        element.set("height", number(height));
        element.set("preserveAspectRatio", "none");
        self.state.current = Some(self.push(element));
    }
}

impl BackgroundSink for SvgRenderer {
    fn background(&mut self, color: &Color) {
        let mut element = Element::new("rect", ElementKind::Other);
        element.set("width", "100%");
        element.set("height", "100%");
        element.set("fill", color.to_css());
        self.elements.push(element);
        self.state.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verso_geometry::TransformParams;

    fn square(renderer: &mut SvgRenderer) {
        renderer.begin_path();
        renderer.move_to(0.0, 0.0);
        renderer.line_to(10.0, 0.0);
        renderer.line_to(10.0, 10.0);
        renderer.close();
        renderer.end_path();
    }

    #[test]
    fn test_document_shell() {
        let mut renderer = SvgRenderer::new();
        renderer.setup(200.0, 100.0, 2.0);
        let svg = renderer.to_svg_string();
        assert!(svg.starts_with(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"200\" height=\"100\" viewBox=\"0 0 200 100\">"
        ));
        assert!(svg.ends_with("</svg>\n"));

        let artifact = renderer.export().unwrap();
        assert_eq!(artifact.extension, "svg");
        assert_eq!(artifact.mime_type, "image/svg+xml");
    }

    #[test]
    fn test_path_with_styles() {
        let mut renderer = SvgRenderer::new();
        renderer.setup(10.0, 10.0, 1.0);
        square(&mut renderer);
        renderer.apply_styles(&Style::new().fill(Color::rgb(255, 0, 0)).stroke(Color::BLACK));

        let svg = renderer.to_svg_string();
        assert!(svg.contains(
            "<path d=\"M0 0 L10 0 L10 10 Z\" fill=\"#ff0000\" stroke=\"#000000\" stroke-width=\"1\"/>"
        ));
    }

    #[test]
    fn test_unfilled_path() {
        let mut renderer = SvgRenderer::new();
        square(&mut renderer);
        renderer.apply_styles(&Style::new().stroke(Color::BLACK).stroke_width(3.0));
        let svg = renderer.to_svg_string();
        assert!(svg.contains("fill=\"none\" stroke=\"#000000\" stroke-width=\"3\""));
    }

    #[test]
    fn test_transform_attribute() {
        let mut renderer = SvgRenderer::new();
        let m = Transform::translation(5.0, 6.0);
        renderer.transform(&m);
        square(&mut renderer);
        renderer.transform(&m.invert().unwrap());
        square(&mut renderer);

        let svg = renderer.to_svg_string();
        assert_eq!(svg.matches("transform=\"matrix(1 0 0 1 5 6)\"").count(), 1);
        assert_eq!(svg.matches("<path").count(), 2);
    }

    #[test]
    fn test_undone_transform_leaves_no_residue() {
        let mut renderer = SvgRenderer::new();
        let m = TransformParams::new()
            .rotate(33.0)
            .translate(3.0, 4.0)
            .to_matrix();
        renderer.transform(&m);
        square(&mut renderer);
        renderer.transform(&m.invert().unwrap());
        square(&mut renderer);

        let svg = renderer.to_svg_string();
        assert_eq!(svg.matches("transform=").count(), 1);
        assert!(svg.contains("<path d=\"M0 0 L10 0 L10 10 Z\"/>"));
    }

    #[test]
    fn test_nested_transforms_unwind() {
        let mut renderer = SvgRenderer::new();
        let outer = Transform::rotation(33.0);
        let inner = Transform::translation(3.0, 4.0);
        renderer.transform(&outer);
        renderer.transform(&inner);
        renderer.transform(&inner.invert().unwrap());
        assert_eq!(renderer.state.transform, outer);
        renderer.transform(&outer.invert().unwrap());
        assert!(renderer.state.transform.is_identity());
        assert!(renderer.state.saved.is_empty());
    }

    #[test]
    fn test_empty_path_is_skipped() {
        let mut renderer = SvgRenderer::new();
        renderer.begin_path();
        renderer.end_path();
        renderer.apply_styles(&Style::new().fill(Color::BLACK));
        assert!(!renderer.to_svg_string().contains("<path"));
    }

    #[test]
    fn test_native_text_escaped() {
        let mut renderer = SvgRenderer::new();
        let options = TextOptions::new(12.0).align(TextAlign::Center).font_family("Inter");
        if let Some(sink) = renderer.native_text() {
            sink.text("a < b & c", 1.0, 2.0, &options);
        }
        renderer.apply_styles(&Style::new());
        let svg = renderer.to_svg_string();
        assert!(svg.contains(
            "<text x=\"1\" y=\"2\" font-size=\"12\" font-family=\"Inter\" text-anchor=\"middle\">a &lt; b &amp; c</text>"
        ));
    }

    #[test]
    fn test_image_data_url() {
        let mut renderer = SvgRenderer::new();
        let image = ImageSource::new(1, 1, "image/png", b"png".to_vec());
        renderer.image(&image, 0.0, 0.0, 4.0, 4.0);
        assert!(renderer
            .to_svg_string()
            .contains("href=\"data:image/png;base64,cG5n\""));
    }

    #[test]
    fn test_background() {
        let mut renderer = SvgRenderer::new();
        renderer.background(&Color::WHITE);
        assert!(renderer
            .to_svg_string()
            .contains("<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>"));
    }
}
