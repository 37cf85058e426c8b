//! Primitive shape components.

use crate::{Component, RenderContext, RenderResult, SceneNode, Style};
use verso_geometry::{shapes, Path, Vector};

fn draw(cx: &mut RenderContext<'_>, path: Path, style: &Style) -> RenderResult<Option<SceneNode>> {
    cx.draw_path(&path.to_instructions(), style);
    Ok(None)
}

#[derive(Debug, Clone, Default)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub style: Style,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            style: Style::default(),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Component for Rectangle {
    fn name(&self) -> &str {
        "Rectangle"
    }

    fn render(&self, cx: &mut RenderContext<'_>) -> RenderResult<Option<SceneNode>> {
        let path = shapes::rectangle_path(self.x, self.y, self.width, self.height);
        draw(cx, path, &self.style)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Ellipse {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
    pub style: Style,
}

impl Ellipse {
    pub fn new(cx: f64, cy: f64, rx: f64, ry: f64) -> Self {
        Self {
            cx,
            cy,
            rx,
            ry,
            style: Style::default(),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Component for Ellipse {
    fn name(&self) -> &str {
        "Ellipse"
    }

    fn render(&self, cx: &mut RenderContext<'_>) -> RenderResult<Option<SceneNode>> {
        let path = shapes::ellipse_path(self.cx, self.cy, self.rx, self.ry);
        draw(cx, path, &self.style)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub style: Style,
}

impl Circle {
    pub fn new(cx: f64, cy: f64, r: f64) -> Self {
        Self {
            cx,
            cy,
            r,
            style: Style::default(),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Component for Circle {
    fn name(&self) -> &str {
        "Circle"
    }

    fn render(&self, cx: &mut RenderContext<'_>) -> RenderResult<Option<SceneNode>> {
        draw(cx, shapes::circle_path(self.cx, self.cy, self.r), &self.style)
    }
}

/// Regular polygon with its first vertex at angle zero.
#[derive(Debug, Clone, Default)]
pub struct Polygon {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub sides: usize,
    pub style: Style,
}

impl Polygon {
    pub fn new(cx: f64, cy: f64, r: f64, sides: usize) -> Self {
        Self {
            cx,
            cy,
            r,
            sides,
            style: Style::default(),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Component for Polygon {
    fn name(&self) -> &str {
        "Polygon"
    }

    fn render(&self, cx: &mut RenderContext<'_>) -> RenderResult<Option<SceneNode>> {
        let path = shapes::polygon_path(self.cx, self.cy, self.r, self.sides);
        draw(cx, path, &self.style)
    }
}

/// Open straight segment.
#[derive(Debug, Clone, Default)]
pub struct Line {
    pub from: Vector,
    pub to: Vector,
    pub style: Style,
}

impl Line {
    pub fn new(from: Vector, to: Vector) -> Self {
        Self {
            from,
            to,
            style: Style::default(),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Component for Line {
    fn name(&self) -> &str {
        "Line"
    }

    fn render(&self, cx: &mut RenderContext<'_>) -> RenderResult<Option<SceneNode>> {
        draw(cx, shapes::line_path(self.from, self.to), &self.style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{RecordingRenderer, RenderCall};
    use crate::render_node_with_renderer;

    fn render(component: impl Component + 'static) -> Vec<RenderCall> {
        let mut renderer = RecordingRenderer::new();
        render_node_with_renderer(&SceneNode::component(component), Some(&mut renderer)).unwrap();
        renderer.take_calls()
    }

    #[test]
    fn test_rectangle_calls() {
        let calls = render(Rectangle::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(
            &calls[..7],
            &[
                RenderCall::BeginPath,
                RenderCall::MoveTo(1.0, 2.0),
                RenderCall::LineTo(4.0, 2.0),
                RenderCall::LineTo(4.0, 6.0),
                RenderCall::LineTo(1.0, 6.0),
                RenderCall::Close,
                RenderCall::EndPath,
            ]
        );
    }

    #[test]
    fn test_circle_is_four_curves() {
        let calls = render(Circle::new(0.0, 0.0, 10.0));
        assert_eq!(calls[1], RenderCall::MoveTo(10.0, 0.0));
        let curves = calls.iter().filter(|c| matches!(c, RenderCall::CurveTo(..))).count();
        assert_eq!(curves, 4);
        assert!(calls.contains(&RenderCall::Close));
    }

    #[test]
    fn test_ellipse_extents() {
        let calls = render(Ellipse::new(0.0, 0.0, 20.0, 10.0));
        assert!(calls.contains(&RenderCall::CurveTo(
            20.0,
            -10.0 * shapes::KAPPA,
            20.0 * shapes::KAPPA,
            -10.0,
            0.0,
            -10.0
        )));
    }

    #[test]
    fn test_polygon_vertices() {
        let calls = render(Polygon::new(0.0, 0.0, 1.0, 2));
        let vertices = calls
            .iter()
            .filter(|c| matches!(c, RenderCall::MoveTo(..) | RenderCall::LineTo(..)))
            .count();
        assert_eq!(vertices, 3);
    }

    #[test]
    fn test_line_is_open() {
        let calls = render(Line::new(Vector::new(0.0, 0.0), Vector::new(5.0, 5.0)));
        assert_eq!(
            &calls[..4],
            &[
                RenderCall::BeginPath,
                RenderCall::MoveTo(0.0, 0.0),
                RenderCall::LineTo(5.0, 5.0),
                RenderCall::EndPath,
            ]
        );
    }
}
