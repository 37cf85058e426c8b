//! # Verso Bench
//!
//! Deterministic fixtures shared by the Verso benchmarks.
//!
//! Run with: `cargo bench -p verso-bench`

use std::fmt::Write as _;
use verso_geometry::{shapes, TransformParams};
use verso_render::components::{Canvas, Circle, Group, PathShape};
use verso_render::{Color, SceneNode, Style};

/// Path data with `segments` mixed commands, relative and absolute.
pub fn generate_path_data(segments: usize) -> String {
    let mut d = String::from("M0 0");
    for i in 0..segments {
        let v = (i % 17) as f64;
        let _ = match i % 6 {
            0 => write!(d, " L{} {}", v * 3.0, v),
            1 => write!(d, " c{} {} {} {} {} {}", v, 1, v + 2.0, 3, v + 4.0, 0),
            2 => write!(d, " s4 {} 8 0", v),
            3 => write!(d, " q{} -5 10 0", v),
            4 => write!(d, " t10 0"),
            _ => write!(d, " a20 10 {} 0 1 {} 5", v * 10.0, v + 10.0),
        };
    }
    d.push_str(" Z");
    d
}

/// A canvas with `count` rotated groups, each holding a circle and a path.
pub fn generate_scene(count: usize) -> SceneNode {
    let star = shapes::polygon_path(0.0, 0.0, 10.0, 5);
    let children = (0..count).map(|i| {
        let angle = i as f64 * 360.0 / count.max(1) as f64;
        SceneNode::component(
            Group::new()
                .transform(
                    TransformParams::new()
                        .translate(250.0, 250.0)
                        .rotate(angle),
                )
                .style(Style::new().fill(Color::rgb((i % 256) as u8, 80, 160)))
                .child(SceneNode::component(Circle::new(100.0, 0.0, 8.0)))
                .child(SceneNode::component(PathShape::new(star.clone()))),
        )
    });

    SceneNode::component(
        Canvas::new(500.0, 500.0)
            .background(Color::WHITE)
            .children(children),
    )
}
