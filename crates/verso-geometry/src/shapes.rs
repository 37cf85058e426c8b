//! Path builders for the primitive shapes.

use crate::{DrawingInstruction, Path, Vector};
use std::f64::consts::TAU;
use DrawingInstruction::{Close, CurveTo, LineTo, MoveTo};

/// Handle length factor approximating a quarter circle with one cubic.
pub const KAPPA: f64 = 0.5522847498;

pub fn rectangle_path(x: f64, y: f64, width: f64, height: f64) -> Path {
    Path::from_instructions(&[
        MoveTo(x, y),
        LineTo(x + width, y),
        LineTo(x + width, y + height),
        LineTo(x, y + height),
        Close,
    ])
}

/// Ellipse as four cubic quarter arcs, starting at the rightmost point.
pub fn ellipse_path(cx: f64, cy: f64, rx: f64, ry: f64) -> Path {
    let (kx, ky) = (rx * KAPPA, ry * KAPPA);
    Path::from_instructions(&[
        MoveTo(cx + rx, cy),
        CurveTo(cx + rx, cy - ky, cx + kx, cy - ry, cx, cy - ry),
        CurveTo(cx - kx, cy - ry, cx - rx, cy - ky, cx - rx, cy),
        CurveTo(cx - rx, cy + ky, cx - kx, cy + ry, cx, cy + ry),
        CurveTo(cx + kx, cy + ry, cx + rx, cy + ky, cx + rx, cy),
        Close,
    ])
}

pub fn circle_path(cx: f64, cy: f64, r: f64) -> Path {
    ellipse_path(cx, cy, r, r)
}

/// Vertices of a regular polygon; fewer than three sides are raised to three.
pub fn polygon_points(cx: f64, cy: f64, r: f64, sides: usize) -> Vec<Vector> {
    let edges = sides.max(3);
    let step = TAU / edges as f64;
    (0..edges)
        .map(|i| {
            let (sin, cos) = (step * i as f64).sin_cos();
            Vector::new(cx + r * cos, cy + r * sin)
        })
        .collect()
}

pub fn polygon_path(cx: f64, cy: f64, r: f64, sides: usize) -> Path {
    let mut instructions: Vec<DrawingInstruction> = polygon_points(cx, cy, r, sides)
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            if i == 0 {
                DrawingInstruction::move_to(p)
            } else {
                DrawingInstruction::line_to(p)
            }
        })
        .collect();
    instructions.push(Close);
    Path::from_instructions(&instructions)
}

pub fn line_path(from: Vector, to: Vector) -> Path {
    Path::from_instructions(&[DrawingInstruction::move_to(from), DrawingInstruction::line_to(to)])
}
