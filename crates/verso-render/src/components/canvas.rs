use crate::{Color, Component, RenderContext, RenderResult, SceneNode, Style};
use tracing::debug;
use verso_geometry::shapes;

/// Root of a drawing: sets up the renderer, paints the background and walks
/// its children.
#[derive(Debug)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub density: f64,
    pub background: Option<Color>,
    pub children: Vec<SceneNode>,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            density: 1.0,
            background: None,
            children: Vec::new(),
        }
    }

    pub fn density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = SceneNode>) -> Self {
        self.children.extend(children);
        self
    }
}

impl Component for Canvas {
    fn name(&self) -> &str {
        "Canvas"
    }

    fn render(&self, cx: &mut RenderContext<'_>) -> RenderResult<Option<SceneNode>> {
        debug!(
            width = self.width,
            height = self.height,
            density = self.density,
            "Canvas setup"
        );
        cx.renderer().setup(self.width, self.height, self.density);

        if let Some(color) = self.background {
            match cx.renderer().native_background() {
                Some(sink) => sink.background(&color),
                None => {
                    let rect = shapes::rectangle_path(0.0, 0.0, self.width, self.height);
                    cx.draw_path(&rect.to_instructions(), &Style::new().fill(color));
                }
            }
        }

        cx.render_children(&self.children)?;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{RecordingRenderer, RenderCall};
    use crate::render_node_with_renderer;

    #[test]
    fn test_setup_and_native_background() {
        let scene = SceneNode::component(Canvas::new(100.0, 50.0).density(2.0).background(Color::WHITE));
        let mut renderer = RecordingRenderer::new().with_native_background();
        render_node_with_renderer(&scene, Some(&mut renderer)).unwrap();
        assert_eq!(
            renderer.calls(),
            &[
                RenderCall::Setup {
                    width: 100.0,
                    height: 50.0,
                    density: 2.0
                },
                RenderCall::Background(Color::WHITE),
            ]
        );
    }

    #[test]
    fn test_background_fallback_rectangle() {
        let scene = SceneNode::component(Canvas::new(10.0, 20.0).background(Color::BLACK));
        let mut renderer = RecordingRenderer::new();
        render_node_with_renderer(&scene, Some(&mut renderer)).unwrap();
        let calls = renderer.calls();
        assert_eq!(calls[1], RenderCall::BeginPath);
        assert_eq!(calls[2], RenderCall::MoveTo(0.0, 0.0));
        assert_eq!(calls[4], RenderCall::LineTo(10.0, 20.0));
        assert_eq!(
            calls.last(),
            Some(&RenderCall::ApplyStyles(Style::new().fill(Color::BLACK)))
        );
    }

    #[test]
    fn test_no_background() {
        let scene = SceneNode::component(Canvas::new(1.0, 1.0));
        let mut renderer = RecordingRenderer::new();
        render_node_with_renderer(&scene, Some(&mut renderer)).unwrap();
        assert_eq!(renderer.calls().len(), 1);
    }
}
