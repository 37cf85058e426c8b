//! Scene tree and the walker that turns it into renderer calls.

use crate::{draw_instructions, Artifact, RenderError, RenderResult, Renderer, Style};
use std::fmt;
use tracing::{debug, trace};
use verso_geometry::DrawingInstruction;

/// Something that renders itself, either by issuing renderer calls directly
/// or by returning a subtree to walk in its place.
pub trait Component {
    /// Name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn render(&self, cx: &mut RenderContext<'_>) -> RenderResult<Option<SceneNode>>;
}

impl<F> Component for F
where
    F: Fn(&mut RenderContext<'_>) -> RenderResult<Option<SceneNode>>,
{
    fn render(&self, cx: &mut RenderContext<'_>) -> RenderResult<Option<SceneNode>> {
        self(cx)
    }
}

/// A node of the scene tree.
pub enum SceneNode {
    Component(Box<dyn Component>),
    /// Children walked in order, contributing no calls of its own.
    Fragment(Vec<SceneNode>),
    /// Raw text literal, only meaningful as the content of a text component.
    Text(String),
}

impl SceneNode {
    pub fn component(component: impl Component + 'static) -> Self {
        SceneNode::Component(Box::new(component))
    }

    /// Wrap a closure as a component.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&mut RenderContext<'_>) -> RenderResult<Option<SceneNode>> + 'static,
    {
        SceneNode::Component(Box::new(f))
    }

    pub fn fragment(children: impl IntoIterator<Item = SceneNode>) -> Self {
        SceneNode::Fragment(children.into_iter().collect())
    }

    pub fn text(text: impl Into<String>) -> Self {
        SceneNode::Text(text.into())
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneNode::Component(c) => f.debug_tuple("Component").field(&c.name()).finish(),
            SceneNode::Fragment(children) => f.debug_tuple("Fragment").field(children).finish(),
            SceneNode::Text(text) => f.debug_tuple("Text").field(text).finish(),
        }
    }
}

// ==================== Render Context ====================

/// State threaded through a render pass: the renderer and the style
/// inherited from enclosing groups.
pub struct RenderContext<'r> {
    renderer: &'r mut dyn Renderer,
    style: Style,
    depth: usize,
}

impl<'r> RenderContext<'r> {
    pub fn new(renderer: &'r mut dyn Renderer) -> Self {
        Self {
            renderer,
            style: Style::default(),
            depth: 0,
        }
    }

    pub fn renderer(&mut self) -> &mut dyn Renderer {
        &mut *self.renderer
    }

    /// Style inherited at this point of the walk.
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Run `f` with `style` layered over the inherited one.
    pub fn with_style<T>(&mut self, style: &Style, f: impl FnOnce(&mut Self) -> T) -> T {
        let merged = style.over(&self.style);
        let saved = std::mem::replace(&mut self.style, merged);
        let result = f(self);
        self.style = saved;
        result
    }

    /// Walk `node` depth-first. The first error aborts the pass.
    pub fn render_node(&mut self, node: &SceneNode) -> RenderResult<()> {
        match node {
            SceneNode::Component(component) => {
                trace!(component = component.name(), depth = self.depth, "Rendering component");
                self.depth += 1;
                let result = component.render(self).and_then(|next| match next {
                    Some(next) => self.render_node(&next),
                    None => Ok(()),
                });
                self.depth -= 1;
                result
            }
            SceneNode::Fragment(children) => self.render_children(children),
            SceneNode::Text(text) => Err(RenderError::UnknownNodeKind(format!("text {text:?}"))),
        }
    }

    pub fn render_children(&mut self, children: &[SceneNode]) -> RenderResult<()> {
        children.iter().try_for_each(|child| self.render_node(child))
    }

    /// Draw one shape: a path bracket followed by its style merged over the
    /// inherited one. Empty outlines issue no calls.
    pub fn draw_path(&mut self, instructions: &[DrawingInstruction], style: &Style) {
        if instructions.is_empty() {
            trace!("Skipping empty path");
            return;
        }
        let style = style.over(&self.style);
        self.renderer.begin_path();
        draw_instructions(&mut *self.renderer, instructions);
        self.renderer.end_path();
        self.renderer.apply_styles(&style);
    }
}

// ==================== Entry Points ====================

/// Walk `root` into `renderer`.
pub fn render_node_with_renderer(
    root: &SceneNode,
    renderer: Option<&mut dyn Renderer>,
) -> RenderResult<()> {
    let renderer = renderer.ok_or(RenderError::NoRenderer)?;
    RenderContext::new(renderer).render_node(root)
}

/// Walk `root` into `renderer` and export the result.
pub fn render_frame(root: &SceneNode, renderer: &mut dyn Renderer) -> RenderResult<Artifact> {
    render_node_with_renderer(root, Some(&mut *renderer))?;
    let artifact = renderer.export()?;
    debug!(
        extension = %artifact.extension,
        bytes = artifact.data.len(),
        "Frame rendered"
    );
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{RecordingRenderer, RenderCall};
    use crate::Color;

    fn dot(x: f64) -> SceneNode {
        SceneNode::from_fn(move |cx| {
            cx.renderer().move_to(x, 0.0);
            Ok(None)
        })
    }

    #[test]
    fn test_fragment_order() {
        let scene = SceneNode::fragment([dot(1.0), SceneNode::fragment([dot(2.0), dot(3.0)]), dot(4.0)]);
        let mut renderer = RecordingRenderer::new();
        render_node_with_renderer(&scene, Some(&mut renderer)).unwrap();
        let xs: Vec<f64> = renderer
            .calls()
            .iter()
            .filter_map(|c| match c {
                RenderCall::MoveTo(x, _) => Some(*x),
                _ => None,
            })
            .collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_component_returning_subtree() {
        let scene = SceneNode::from_fn(|_| Ok(Some(dot(7.0))));
        let mut renderer = RecordingRenderer::new();
        render_node_with_renderer(&scene, Some(&mut renderer)).unwrap();
        assert_eq!(renderer.calls(), &[RenderCall::MoveTo(7.0, 0.0)]);
    }

    #[test]
    fn test_missing_renderer() {
        let err = render_node_with_renderer(&dot(0.0), None).unwrap_err();
        assert!(matches!(err, RenderError::NoRenderer));
    }

    #[test]
    fn test_text_node_rejected() {
        let scene = SceneNode::fragment([dot(1.0), SceneNode::text("stray"), dot(2.0)]);
        let mut renderer = RecordingRenderer::new();
        let err = render_node_with_renderer(&scene, Some(&mut renderer)).unwrap_err();
        assert!(matches!(err, RenderError::UnknownNodeKind(_)));
        // nothing after the failing node
        assert_eq!(renderer.calls(), &[RenderCall::MoveTo(1.0, 0.0)]);
    }

    #[test]
    fn test_style_scoping() {
        let mut renderer = RecordingRenderer::new();
        let mut cx = RenderContext::new(&mut renderer);
        let outer = Style::new().fill(Color::BLACK);
        let inner = Style::new().stroke(Color::WHITE);

        cx.with_style(&outer, |cx| {
            cx.with_style(&inner, |cx| {
                assert_eq!(cx.style().fill, Some(Color::BLACK));
                assert_eq!(cx.style().stroke, Some(Color::WHITE));
            });
            assert_eq!(cx.style().stroke, None);
        });
        assert!(cx.style().is_empty());
    }

    #[test]
    fn test_draw_path_brackets() {
        let mut renderer = RecordingRenderer::new();
        let mut cx = RenderContext::new(&mut renderer);
        cx.draw_path(&[], &Style::new());
        cx.draw_path(
            &[DrawingInstruction::MoveTo(0.0, 0.0), DrawingInstruction::LineTo(1.0, 0.0)],
            &Style::new().fill(Color::BLACK),
        );
        assert_eq!(
            renderer.calls(),
            &[
                RenderCall::BeginPath,
                RenderCall::MoveTo(0.0, 0.0),
                RenderCall::LineTo(1.0, 0.0),
                RenderCall::EndPath,
                RenderCall::ApplyStyles(Style::new().fill(Color::BLACK)),
            ]
        );
    }

    #[test]
    fn test_render_frame_exports() {
        let mut renderer = RecordingRenderer::new();
        let artifact = render_frame(&dot(5.0), &mut renderer).unwrap();
        assert_eq!(artifact.extension, "txt");
        assert_eq!(artifact.as_text(), Some("move_to 5 0\n"));
    }

    #[test]
    fn test_debug_names_components() {
        let node = SceneNode::fragment([SceneNode::text("a")]);
        assert_eq!(format!("{node:?}"), "Fragment([Text(\"a\")])");
    }
}
