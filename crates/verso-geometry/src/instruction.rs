use crate::Vector;

/// Canonical drawing instruction.
///
/// Every geometry source (shape builders, SVG path data, font outlines) is
/// reduced to a stream of these before it reaches a renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawingInstruction {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    /// First control point, second control point, end point.
    CurveTo(f64, f64, f64, f64, f64, f64),
    Close,
}

impl DrawingInstruction {
    pub fn move_to(p: Vector) -> Self {
        DrawingInstruction::MoveTo(p.x, p.y)
    }

    pub fn line_to(p: Vector) -> Self {
        DrawingInstruction::LineTo(p.x, p.y)
    }

    pub fn curve_to(c1: Vector, c2: Vector, to: Vector) -> Self {
        DrawingInstruction::CurveTo(c1.x, c1.y, c2.x, c2.y, to.x, to.y)
    }

    /// The point the pen ends at, if the instruction moves it explicitly.
    pub fn end_point(&self) -> Option<Vector> {
        match *self {
            DrawingInstruction::MoveTo(x, y) | DrawingInstruction::LineTo(x, y) => {
                Some(Vector::new(x, y))
            }
            DrawingInstruction::CurveTo(_, _, _, _, x, y) => Some(Vector::new(x, y)),
            DrawingInstruction::Close => None,
        }
    }

    /// Single-letter command name as used in SVG path data.
    pub fn command(&self) -> char {
        match self {
            DrawingInstruction::MoveTo(..) => 'M',
            DrawingInstruction::LineTo(..) => 'L',
            DrawingInstruction::CurveTo(..) => 'C',
            DrawingInstruction::Close => 'Z',
        }
    }
}
