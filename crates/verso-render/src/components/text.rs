use crate::{
    draw_instructions, Component, Font, RenderContext, RenderError, RenderResult, SceneNode,
    Style, TextAlign, TextOptions,
};
use std::fmt;
use std::rc::Rc;
use tracing::warn;

/// A block of text.
///
/// With a font, the content is wrapped into lines first. Renderers with
/// native text then get one call per line at the same baseline the outlines
/// would use; without native text each line is drawn as glyph outlines, all
/// inside one path. A renderer with native text and no font gets the whole
/// content as a single line at `(x, y)`.
#[derive(Clone, Default)]
pub struct Text {
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub font: Option<Rc<dyn Font>>,
    pub options: TextOptions,
    /// Wrapping box; lines never wrap without a width.
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub style: Style,
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Text")
            .field("content", &self.content)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("font", &self.font.as_ref().map(|font| font.name().to_string()))
            .field("options", &self.options)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("style", &self.style)
            .finish()
    }
}

impl Text {
    pub fn new(content: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            content: content.into(),
            x,
            y,
            ..Self::default()
        }
    }

    /// Content from child nodes. Text literals are concatenated in order,
    /// fragments are flattened and anything else is ignored.
    pub fn from_children(children: &[SceneNode], x: f64, y: f64) -> Self {
        fn collect(nodes: &[SceneNode], out: &mut String) {
            for node in nodes {
                match node {
                    SceneNode::Text(text) => out.push_str(text),
                    SceneNode::Fragment(children) => collect(children, out),
                    SceneNode::Component(c) => {
                        warn!(component = c.name(), "Ignoring component inside text");
                    }
                }
            }
        }

        let mut content = String::new();
        collect(children, &mut content);
        Self::new(content, x, y)
    }

    pub fn font(mut self, font: Rc<dyn Font>) -> Self {
        self.font = Some(font);
        self
    }

    pub fn font_size(mut self, size: f64) -> Self {
        self.options.font_size = size;
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.options.font_family = Some(family.into());
        self
    }

    pub fn line_height(mut self, line_height: f64) -> Self {
        self.options.line_height = Some(line_height);
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.options.align = align;
        self
    }

    pub fn options(mut self, options: TextOptions) -> Self {
        self.options = options;
        self
    }

    pub fn size(mut self, width: Option<f64>, height: Option<f64>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Component for Text {
    fn name(&self) -> &str {
        "Text"
    }

    fn render(&self, cx: &mut RenderContext<'_>) -> RenderResult<Option<SceneNode>> {
        let style = self.style.over(cx.style());

        let lines = self
            .font
            .as_deref()
            .map(|font| font.lines(&self.content, &self.options, self.width, self.height));

        if cx.renderer().native_text().is_some() {
            match &lines {
                Some(lines) => {
                    // x already carries the alignment offset
                    let options = self.options.clone().align(TextAlign::Left);
                    for line in lines {
                        if let Some(sink) = cx.renderer().native_text() {
                            sink.text(&line.text, self.x + line.x, self.y + line.y, &options);
                        }
                        cx.renderer().apply_styles(&style);
                    }
                }
                None => {
                    if let Some(sink) = cx.renderer().native_text() {
                        sink.text(&self.content, self.x, self.y, &self.options);
                    }
                    cx.renderer().apply_styles(&style);
                }
            }
            return Ok(None);
        }

        let (Some(font), Some(lines)) = (self.font.as_deref(), lines) else {
            return Err(RenderError::MissingFont);
        };
        if lines.is_empty() {
            return Ok(None);
        }

        let renderer = cx.renderer();
        renderer.begin_path();
        for line in &lines {
            let commands =
                font.convert_to_commands(&line.text, self.x + line.x, self.y + line.y, &self.options);
            draw_instructions(renderer, &commands);
        }
        renderer.end_path();
        renderer.apply_styles(&style);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{RecordingRenderer, RenderCall};
    use crate::font::BoxFont;
    use crate::{render_node_with_renderer, Color};

    #[test]
    fn test_native_text() {
        let text = Text::new("hello", 10.0, 20.0)
            .font_size(24.0)
            .style(Style::new().fill(Color::BLACK));
        let mut renderer = RecordingRenderer::new().with_native_text();
        render_node_with_renderer(&SceneNode::component(text), Some(&mut renderer)).unwrap();
        assert_eq!(
            renderer.calls(),
            &[
                RenderCall::Text {
                    text: "hello".into(),
                    x: 10.0,
                    y: 20.0,
                    font_size: 24.0
                },
                RenderCall::ApplyStyles(Style::new().fill(Color::BLACK)),
            ]
        );
    }

    #[test]
    fn test_missing_font() {
        let mut renderer = RecordingRenderer::new();
        let err = render_node_with_renderer(
            &SceneNode::component(Text::new("hello", 0.0, 0.0)),
            Some(&mut renderer),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::MissingFont));
        assert!(renderer.calls().is_empty());
    }

    #[test]
    fn test_outline_fallback() {
        let font: Rc<dyn Font> = Rc::new(BoxFont::new(0.5));
        let text = Text::new("ab cd", 0.0, 0.0)
            .font(font)
            .font_size(10.0)
            .size(Some(20.0), None);
        let mut renderer = RecordingRenderer::new();
        render_node_with_renderer(&SceneNode::component(text), Some(&mut renderer)).unwrap();

        let calls = renderer.calls();
        assert_eq!(calls.first(), Some(&RenderCall::BeginPath));
        assert_eq!(calls.iter().filter(|c| **c == RenderCall::BeginPath).count(), 1);
        // four glyph boxes over two lines
        let boxes = calls.iter().filter(|c| matches!(c, RenderCall::MoveTo(..))).count();
        assert_eq!(boxes, 4);
        // second line starts one line height lower: top = 18 - 8
        assert!(calls.contains(&RenderCall::MoveTo(0.0, 10.0)));
        assert_eq!(calls[calls.len() - 2], RenderCall::EndPath);
    }

    #[test]
    fn test_nothing_drawn_when_no_line_fits() {
        let font: Rc<dyn Font> = Rc::new(BoxFont::new(0.5));
        let text = Text::new("ab cd", 0.0, 0.0)
            .font(font)
            .font_size(10.0)
            .size(Some(20.0), Some(5.0));
        let mut renderer = RecordingRenderer::new();
        render_node_with_renderer(&SceneNode::component(text), Some(&mut renderer)).unwrap();
        assert!(renderer.calls().is_empty());
    }

    #[test]
    fn test_native_text_uses_wrapped_lines() {
        let font: Rc<dyn Font> = Rc::new(BoxFont::new(0.5));
        let text = Text::new("ab cd", 5.0, 0.0)
            .font(font)
            .font_size(10.0)
            .align(TextAlign::Right)
            .size(Some(20.0), None);
        let mut renderer = RecordingRenderer::new().with_native_text();
        render_node_with_renderer(&SceneNode::component(text), Some(&mut renderer)).unwrap();

        // right aligned in a 20 wide box, baselines at 8 and 18
        assert_eq!(
            renderer.calls(),
            &[
                RenderCall::Text {
                    text: "ab".into(),
                    x: 15.0,
                    y: 8.0,
                    font_size: 10.0
                },
                RenderCall::ApplyStyles(Style::new()),
                RenderCall::Text {
                    text: "cd".into(),
                    x: 15.0,
                    y: 18.0,
                    font_size: 10.0
                },
                RenderCall::ApplyStyles(Style::new()),
            ]
        );
    }

    #[test]
    fn test_from_children() {
        let children = [
            SceneNode::text("Hello, "),
            SceneNode::fragment([SceneNode::text("world")]),
        ];
        let text = Text::from_children(&children, 0.0, 0.0);
        assert_eq!(text.content, "Hello, world");
    }
}
