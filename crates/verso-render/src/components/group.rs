use crate::{Component, RenderContext, RenderResult, SceneNode, Style};
use tracing::debug;
use verso_geometry::TransformParams;

/// Applies a transform and a default style to its children.
///
/// The renderer receives the group matrix before the children and its
/// inverse after them, so siblings are unaffected.
#[derive(Debug, Default)]
pub struct Group {
    pub transform: TransformParams,
    pub style: Style,
    pub children: Vec<SceneNode>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(mut self, transform: TransformParams) -> Self {
        self.transform = transform;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
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

    fn render_children(&self, cx: &mut RenderContext<'_>) -> RenderResult<()> {
        cx.with_style(&self.style, |cx| cx.render_children(&self.children))
    }
}

impl Component for Group {
    fn name(&self) -> &str {
        "Group"
    }

    fn render(&self, cx: &mut RenderContext<'_>) -> RenderResult<Option<SceneNode>> {
        let matrix = self.transform.to_matrix();
        if matrix.is_identity() {
            self.render_children(cx)?;
            return Ok(None);
        }

        let inverse = match matrix.invert() {
            Ok(inverse) => inverse,
            Err(e) => {
                debug!(error = %e, "Skipping group with collapsed transform");
                return Ok(None);
            }
        };

        cx.renderer().transform(&matrix);
        let result = self.render_children(cx);
        cx.renderer().transform(&inverse);
        result.map(|_| None)
    }
}
