//! # Verso SVG
//!
//! SVG path-data parsing for Verso.
//!
//! ## Features
//!
//! - **Tokenizer**: command letters and numbers with byte positions
//! - **Parser**: command repetition, implicit initial move, parameter checks
//! - **Absolutizer**: relative commands resolved against the current point
//! - **Normalizer**: every command reduced to move, line, cubic and close
//! - **Arcs**: elliptical arcs split into cubic pieces of at most 120°
//! - **Serializer**: canonical instructions back to compact path data
//!
//! ## Architecture
//!
//! ```text
//! "M10 10 h20 a5 5 0 0 1 5 5 z"
//!    └── tokenize ──> Token stream
//!           └── parse_path ──> PathCommand (absolute + relative)
//!                  └── absolutize ──> PathCommand (absolute only)
//!                         └── normalize ──> DrawingInstruction (M, L, C, Z)
//!                                └── PathData::from_instructions
//! ```

use std::f64::consts::{PI, TAU};
use std::fmt::Write as _;
use thiserror::Error;
use tracing::trace;
use verso_common::VersoError;
use verso_geometry::{DrawingInstruction, PathData, Vector};

// ==================== Errors ====================

/// Errors that can occur while reading path data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SvgPathError {
    #[error("Unrecognized token {found:?} at position {position}")]
    UnrecognizedToken { position: usize, found: char },

    #[error("Command '{command}' expects {expected} parameters, found {found}")]
    MissingParameters {
        command: char,
        expected: usize,
        found: usize,
    },

    #[error("Unexpected number at position {position} after command '{command}'")]
    UnexpectedNumber { position: usize, command: char },
}

/// Result type alias for path-data operations.
pub type SvgPathResult<T> = Result<T, SvgPathError>;

impl From<SvgPathError> for VersoError {
    fn from(err: SvgPathError) -> Self {
        VersoError::parse_with_source("invalid SVG path data", err)
    }
}

// ==================== Tokenizer ====================

#[derive(Debug, Clone, Copy, PartialEq)]
enum TokenKind {
    Command(char),
    Number(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Token {
    kind: TokenKind,
    position: usize,
}

fn is_separator(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b',')
}

fn is_command(b: u8) -> bool {
    matches!(
        b,
        b'M' | b'm'
            | b'L'
            | b'l'
            | b'C'
            | b'c'
            | b'Q'
            | b'q'
            | b'S'
            | b's'
            | b'T'
            | b't'
            | b'A'
            | b'a'
            | b'H'
            | b'h'
            | b'V'
            | b'v'
            | b'Z'
            | b'z'
    )
}

fn count_digits(bytes: &[u8], from: usize) -> usize {
    bytes[from.min(bytes.len())..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count()
}

fn unrecognized(d: &str, position: usize) -> SvgPathError {
    let found = d[position..].chars().next().unwrap_or('\0');
    SvgPathError::UnrecognizedToken { position, found }
}

/// Scan one number starting at `start`, returning its value and end offset.
fn scan_number(d: &str, start: usize) -> SvgPathResult<(f64, usize)> {
    let bytes = d.as_bytes();
    let mut i = start;

    if matches!(bytes.get(i), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_digits = count_digits(bytes, i);
    i += int_digits;

    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        frac_digits = count_digits(bytes, i + 1);
        if int_digits > 0 || frac_digits > 0 {
            i += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return Err(unrecognized(d, start));
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_digits = count_digits(bytes, j);
        if exp_digits > 0 {
            i = j + exp_digits;
        }
    }

    d[start..i]
        .parse::<f64>()
        .map(|value| (value, i))
        .map_err(|_| unrecognized(d, start))
}

fn tokenize(d: &str) -> SvgPathResult<Vec<Token>> {
    let bytes = d.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if is_separator(b) {
            i += 1;
        } else if is_command(b) {
            tokens.push(Token {
                kind: TokenKind::Command(b as char),
                position: i,
            });
            i += 1;
        } else {
            let (value, end) = scan_number(d, i)?;
            tokens.push(Token {
                kind: TokenKind::Number(value),
                position: i,
            });
            i = end;
        }
    }

    Ok(tokens)
}

// ==================== Path Commands ====================

/// A parsed path-data segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Move to (absolute).
    MoveTo(f64, f64),
    /// Move to (relative).
    MoveToRel(f64, f64),
    /// Line to (absolute).
    LineTo(f64, f64),
    /// Line to (relative).
    LineToRel(f64, f64),
    /// Horizontal line (absolute).
    HorizontalTo(f64),
    /// Horizontal line (relative).
    HorizontalToRel(f64),
    /// Vertical line (absolute).
    VerticalTo(f64),
    /// Vertical line (relative).
    VerticalToRel(f64),
    /// Cubic bezier (absolute).
    CubicTo(f64, f64, f64, f64, f64, f64),
    /// Cubic bezier (relative).
    CubicToRel(f64, f64, f64, f64, f64, f64),
    /// Smooth cubic bezier (absolute).
    SmoothCubicTo(f64, f64, f64, f64),
    /// Smooth cubic bezier (relative).
    SmoothCubicToRel(f64, f64, f64, f64),
    /// Quadratic bezier (absolute).
    QuadTo(f64, f64, f64, f64),
    /// Quadratic bezier (relative).
    QuadToRel(f64, f64, f64, f64),
    /// Smooth quadratic bezier (absolute).
    SmoothQuadTo(f64, f64),
    /// Smooth quadratic bezier (relative).
    SmoothQuadToRel(f64, f64),
    /// Arc: radii, x-axis rotation in degrees, large-arc flag, sweep flag, end point.
    ArcTo(f64, f64, f64, bool, bool, f64, f64),
    /// Arc (relative end point).
    ArcToRel(f64, f64, f64, bool, bool, f64, f64),
    /// Close path.
    Close,
}

/// Number of parameters a command letter consumes.
fn param_count(command: char) -> usize {
    match command.to_ascii_uppercase() {
        'A' => 7,
        'C' => 6,
        'Q' | 'S' => 4,
        'L' | 'M' | 'T' => 2,
        'H' | 'V' => 1,
        _ => 0,
    }
}

fn build_command(command: char, p: &[f64]) -> PathCommand {
    let flag = |v: f64| v != 0.0;
    match command {
        'M' => PathCommand::MoveTo(p[0], p[1]),
        'm' => PathCommand::MoveToRel(p[0], p[1]),
        'L' => PathCommand::LineTo(p[0], p[1]),
        'l' => PathCommand::LineToRel(p[0], p[1]),
        'H' => PathCommand::HorizontalTo(p[0]),
        'h' => PathCommand::HorizontalToRel(p[0]),
        'V' => PathCommand::VerticalTo(p[0]),
        'v' => PathCommand::VerticalToRel(p[0]),
        'C' => PathCommand::CubicTo(p[0], p[1], p[2], p[3], p[4], p[5]),
        'c' => PathCommand::CubicToRel(p[0], p[1], p[2], p[3], p[4], p[5]),
        'S' => PathCommand::SmoothCubicTo(p[0], p[1], p[2], p[3]),
        's' => PathCommand::SmoothCubicToRel(p[0], p[1], p[2], p[3]),
        'Q' => PathCommand::QuadTo(p[0], p[1], p[2], p[3]),
        'q' => PathCommand::QuadToRel(p[0], p[1], p[2], p[3]),
        'T' => PathCommand::SmoothQuadTo(p[0], p[1]),
        't' => PathCommand::SmoothQuadToRel(p[0], p[1]),
        'A' => PathCommand::ArcTo(p[0], p[1], p[2], flag(p[3]), flag(p[4]), p[5], p[6]),
        'a' => PathCommand::ArcToRel(p[0], p[1], p[2], flag(p[3]), flag(p[4]), p[5], p[6]),
        _ => PathCommand::Close,
    }
}

// ==================== Parser ====================

/// Parse path data into segments.
///
/// Bare numbers repeat the current command; after a move they continue as
/// lines. Data that does not open with a move gets an implicit `M0,0`.
pub fn parse_path(d: &str) -> SvgPathResult<Vec<PathCommand>> {
    let tokens = tokenize(d)?;
    let mut segments = Vec::new();
    let mut mode: Option<char> = None;
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];
        let command = match (token.kind, mode) {
            (TokenKind::Command(c), _) => {
                i += 1;
                c
            }
            (TokenKind::Number(_), Some(m)) => {
                if param_count(m) == 0 {
                    return Err(SvgPathError::UnexpectedNumber {
                        position: token.position,
                        command: m,
                    });
                }
                m
            }
            (TokenKind::Number(_), None) => 'L',
        };

        if mode.is_none() && !matches!(command, 'M' | 'm') {
            segments.push(PathCommand::MoveTo(0.0, 0.0));
        }

        let expected = param_count(command);
        let params: Vec<f64> = tokens[i..]
            .iter()
            .take(expected)
            .map_while(|t| match t.kind {
                TokenKind::Number(v) => Some(v),
                TokenKind::Command(_) => None,
            })
            .collect();

        if params.len() < expected {
            return Err(SvgPathError::MissingParameters {
                command,
                expected,
                found: params.len(),
            });
        }

        segments.push(build_command(command, &params));
        i += expected;
        mode = Some(match command {
            'M' => 'L',
            'm' => 'l',
            c => c,
        });
    }

    trace!(segments = segments.len(), "parsed path data");
    Ok(segments)
}

// ==================== Absolutizer ====================

/// Resolve relative segments against the current point.
///
/// The output only contains absolute variants. `Close` moves the current
/// point back to the start of the subpath.
pub fn absolutize(segments: &[PathCommand]) -> Vec<PathCommand> {
    use PathCommand::*;

    let mut cur = Vector::ZERO;
    let mut sub = Vector::ZERO;
    let mut out = Vec::with_capacity(segments.len());

    for segment in segments {
        let absolute = match *segment {
            MoveTo(x, y) => {
                cur = Vector::new(x, y);
                sub = cur;
                MoveTo(x, y)
            }
            MoveToRel(dx, dy) => {
                cur = cur + Vector::new(dx, dy);
                sub = cur;
                MoveTo(cur.x, cur.y)
            }
            LineTo(x, y) => {
                cur = Vector::new(x, y);
                LineTo(x, y)
            }
            LineToRel(dx, dy) => {
                cur = cur + Vector::new(dx, dy);
                LineTo(cur.x, cur.y)
            }
            HorizontalTo(x) => {
                cur.x = x;
                HorizontalTo(x)
            }
            HorizontalToRel(dx) => {
                cur.x += dx;
                HorizontalTo(cur.x)
            }
            VerticalTo(y) => {
                cur.y = y;
                VerticalTo(y)
            }
            VerticalToRel(dy) => {
                cur.y += dy;
                VerticalTo(cur.y)
            }
            CubicTo(x1, y1, x2, y2, x, y) => {
                cur = Vector::new(x, y);
                CubicTo(x1, y1, x2, y2, x, y)
            }
            CubicToRel(x1, y1, x2, y2, x, y) => {
                let o = cur;
                cur = o + Vector::new(x, y);
                CubicTo(o.x + x1, o.y + y1, o.x + x2, o.y + y2, cur.x, cur.y)
            }
            SmoothCubicTo(x2, y2, x, y) => {
                cur = Vector::new(x, y);
                SmoothCubicTo(x2, y2, x, y)
            }
            SmoothCubicToRel(x2, y2, x, y) => {
                let o = cur;
                cur = o + Vector::new(x, y);
                SmoothCubicTo(o.x + x2, o.y + y2, cur.x, cur.y)
            }
            QuadTo(x1, y1, x, y) => {
                cur = Vector::new(x, y);
                QuadTo(x1, y1, x, y)
            }
            QuadToRel(x1, y1, x, y) => {
                let o = cur;
                cur = o + Vector::new(x, y);
                QuadTo(o.x + x1, o.y + y1, cur.x, cur.y)
            }
            SmoothQuadTo(x, y) => {
                cur = Vector::new(x, y);
                SmoothQuadTo(x, y)
            }
            SmoothQuadToRel(dx, dy) => {
                cur = cur + Vector::new(dx, dy);
                SmoothQuadTo(cur.x, cur.y)
            }
            ArcTo(rx, ry, angle, large, sweep, x, y) => {
                cur = Vector::new(x, y);
                ArcTo(rx, ry, angle, large, sweep, x, y)
            }
            ArcToRel(rx, ry, angle, large, sweep, dx, dy) => {
                cur = cur + Vector::new(dx, dy);
                ArcTo(rx, ry, angle, large, sweep, cur.x, cur.y)
            }
            Close => {
                cur = sub;
                Close
            }
        };
        out.push(absolute);
    }

    out
}

// ==================== Normalizer ====================

/// Kind of the previous segment, for smooth-curve reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Previous {
    Cubic,
    Quad,
    Other,
}

/// Cubic control points equivalent to a quadratic (2/3 elevation).
fn elevate(from: Vector, control: Vector, to: Vector) -> DrawingInstruction {
    let c1 = from + (control - from) * (2.0 / 3.0);
    let c2 = to + (control - to) * (2.0 / 3.0);
    DrawingInstruction::curve_to(c1, c2, to)
}

/// Reduce absolute segments to `MoveTo`, `LineTo`, `CurveTo` and `Close`.
///
/// Relative variants are not expected here; run [`absolutize`] first. Any
/// that slip through are skipped.
pub fn normalize(segments: &[PathCommand]) -> Vec<DrawingInstruction> {
    use PathCommand::*;

    let mut out = Vec::with_capacity(segments.len());
    let mut cur = Vector::ZERO;
    let mut sub = Vector::ZERO;
    // Last control point, reflected by S and T.
    let mut ctrl = Vector::ZERO;
    let mut previous = Previous::Other;

    for segment in segments {
        let kind = match *segment {
            MoveTo(x, y) => {
                cur = Vector::new(x, y);
                sub = cur;
                out.push(DrawingInstruction::move_to(cur));
                Previous::Other
            }
            LineTo(x, y) => {
                cur = Vector::new(x, y);
                out.push(DrawingInstruction::line_to(cur));
                Previous::Other
            }
            HorizontalTo(x) => {
                cur.x = x;
                out.push(DrawingInstruction::line_to(cur));
                Previous::Other
            }
            VerticalTo(y) => {
                cur.y = y;
                out.push(DrawingInstruction::line_to(cur));
                Previous::Other
            }
            CubicTo(x1, y1, x2, y2, x, y) => {
                out.push(DrawingInstruction::CurveTo(x1, y1, x2, y2, x, y));
                ctrl = Vector::new(x2, y2);
                cur = Vector::new(x, y);
                Previous::Cubic
            }
            SmoothCubicTo(x2, y2, x, y) => {
                let c1 = if previous == Previous::Cubic {
                    cur + (cur - ctrl)
                } else {
                    cur
                };
                out.push(DrawingInstruction::CurveTo(c1.x, c1.y, x2, y2, x, y));
                ctrl = Vector::new(x2, y2);
                cur = Vector::new(x, y);
                Previous::Cubic
            }
            QuadTo(x1, y1, x, y) => {
                let control = Vector::new(x1, y1);
                let to = Vector::new(x, y);
                out.push(elevate(cur, control, to));
                ctrl = control;
                cur = to;
                Previous::Quad
            }
            SmoothQuadTo(x, y) => {
                let control = if previous == Previous::Quad {
                    cur + (cur - ctrl)
                } else {
                    cur
                };
                let to = Vector::new(x, y);
                out.push(elevate(cur, control, to));
                ctrl = control;
                cur = to;
                Previous::Quad
            }
            ArcTo(rx, ry, angle, large_arc, sweep, x, y) => {
                let to = Vector::new(x, y);
                let (rx, ry) = (rx.abs(), ry.abs());
                if rx == 0.0 || ry == 0.0 {
                    out.push(DrawingInstruction::curve_to(cur, to, to));
                    cur = to;
                } else if cur != to {
                    for [c1, c2, end] in arc_to_cubics(cur, to, rx, ry, angle, large_arc, sweep) {
                        out.push(DrawingInstruction::curve_to(c1, c2, end));
                    }
                    cur = to;
                }
                Previous::Other
            }
            Close => {
                out.push(DrawingInstruction::Close);
                cur = sub;
                Previous::Other
            }
            MoveToRel(..) | LineToRel(..) | HorizontalToRel(..) | VerticalToRel(..)
            | CubicToRel(..) | SmoothCubicToRel(..) | QuadToRel(..) | SmoothQuadToRel(..)
            | ArcToRel(..) => continue,
        };
        previous = kind;
    }

    out
}

// ==================== Arcs ====================

/// Largest angular span drawn by a single cubic.
const MAX_ARC_SPAN: f64 = PI * 120.0 / 180.0;

/// Ellipse an arc lies on, in the arc's unrotated frame.
#[derive(Debug, Clone, Copy)]
struct ArcEllipse {
    center: Vector,
    rx: f64,
    ry: f64,
    sweep: bool,
}

impl ArcEllipse {
    fn point_at(&self, angle: f64) -> Vector {
        Vector::new(
            self.center.x + self.rx * angle.cos(),
            self.center.y + self.ry * angle.sin(),
        )
    }
}

/// `asin` of a ratio rounded to 9 decimals and clamped into its domain.
fn stable_asin(ratio: f64) -> f64 {
    ((ratio * 1e9).round() / 1e9).clamp(-1.0, 1.0).asin()
}

/// Convert an elliptical arc into cubic pieces `[control1, control2, end]`.
///
/// Radii too small to span the endpoints are scaled up. `angle` is the
/// x-axis rotation in degrees.
fn arc_to_cubics(
    from: Vector,
    to: Vector,
    rx: f64,
    ry: f64,
    angle: f64,
    large_arc: bool,
    sweep: bool,
) -> Vec<[Vector; 3]> {
    let p1 = from.rotate(-angle);
    let p2 = to.rotate(-angle);
    let half = (p1 - p2) / 2.0;

    let (mut rx, mut ry) = (rx, ry);
    let h = (half.x * half.x) / (rx * rx) + (half.y * half.y) / (ry * ry);
    if h > 1.0 {
        let h = h.sqrt();
        rx *= h;
        ry *= h;
    }

    let sign = if large_arc == sweep { -1.0 } else { 1.0 };
    let (rx2, ry2) = (rx * rx, ry * ry);
    let left = rx2 * ry2 - rx2 * half.y * half.y - ry2 * half.x * half.x;
    let right = rx2 * half.y * half.y + ry2 * half.x * half.x;
    let k = sign * (left / right).abs().sqrt();
    let center = Vector::new(
        k * rx * half.y / ry + (p1.x + p2.x) / 2.0,
        k * -ry * half.x / rx + (p1.y + p2.y) / 2.0,
    );

    let mut f1 = stable_asin((p1.y - center.y) / ry);
    let mut f2 = stable_asin((p2.y - center.y) / ry);
    if p1.x < center.x {
        f1 = PI - f1;
    }
    if p2.x < center.x {
        f2 = PI - f2;
    }
    if f1 < 0.0 {
        f1 += TAU;
    }
    if f2 < 0.0 {
        f2 += TAU;
    }
    if sweep && f1 > f2 {
        f1 -= TAU;
    }
    if !sweep && f2 > f1 {
        f2 -= TAU;
    }

    let ellipse = ArcEllipse {
        center,
        rx,
        ry,
        sweep,
    };
    let mut pieces = Vec::new();
    continue_arc_split(&ellipse, p1, p2, f1, f2, &mut pieces);

    pieces
        .into_iter()
        .map(|piece| piece.map(|p| p.rotate(angle)))
        .collect()
}

/// Emit the arc from angle `f1` to `f2`, splitting off 120° pieces until the
/// remainder fits in one cubic.
fn continue_arc_split(
    ellipse: &ArcEllipse,
    from: Vector,
    to: Vector,
    f1: f64,
    f2: f64,
    out: &mut Vec<[Vector; 3]>,
) {
    let (end, f_end, rest) = if (f2 - f1).abs() > MAX_ARC_SPAN {
        let f_split = if ellipse.sweep && f2 > f1 {
            f1 + MAX_ARC_SPAN
        } else {
            f1 - MAX_ARC_SPAN
        };
        (ellipse.point_at(f_split), f_split, Some((to, f2)))
    } else {
        (to, f2, None)
    };

    let t = ((f_end - f1) / 4.0).tan();
    let hx = 4.0 / 3.0 * ellipse.rx * t;
    let hy = 4.0 / 3.0 * ellipse.ry * t;
    let (s1, c1) = f1.sin_cos();
    let (s2, c2) = f_end.sin_cos();

    let control1 = Vector::new(from.x - hx * s1, from.y + hy * c1);
    let control2 = Vector::new(end.x + hx * s2, end.y - hy * c2);
    out.push([control1, control2, end]);

    if let Some((rest_to, rest_f2)) = rest {
        continue_arc_split(ellipse, end, rest_to, f_end, rest_f2, out);
    }
}

// ==================== Entry Points ====================

/// Parse path data into canonical instructions.
pub fn parse_svg_path(d: &str) -> SvgPathResult<Vec<DrawingInstruction>> {
    let segments = parse_path(d)?;
    Ok(normalize(&absolutize(&segments)))
}

/// Parse path data into geometry, split into subpaths.
pub fn parse_path_data(d: &str) -> SvgPathResult<PathData> {
    let instructions = parse_svg_path(d)?;
    Ok(PathData::from_instructions(&instructions))
}

// ==================== Serializer ====================

fn push_number(out: &mut String, v: f64) {
    // "-0" reads badly and means the same thing
    let v = if v == 0.0 { 0.0 } else { v };
    let _ = write!(out, "{v}");
}

/// Write instructions as compact absolute path data, e.g. `M0 0 L10 0 Z`.
pub fn serialize_instructions(instructions: &[DrawingInstruction]) -> String {
    let mut out = String::new();

    for instruction in instructions {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push(instruction.command());

        let values = match *instruction {
            DrawingInstruction::MoveTo(x, y) | DrawingInstruction::LineTo(x, y) => vec![x, y],
            DrawingInstruction::CurveTo(x1, y1, x2, y2, x, y) => vec![x1, y1, x2, y2, x, y],
            DrawingInstruction::Close => Vec::new(),
        };
        for (i, v) in values.into_iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            push_number(&mut out, v);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use DrawingInstruction::{Close, CurveTo, LineTo, MoveTo};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("verso_svg=trace")
            .with_test_writer()
            .try_init();
    }

    fn close_to(a: Vector, b: Vector, eps: f64) -> bool {
        (a.x - b.x).abs() < eps && (a.y - b.y).abs() < eps
    }

    fn end_of(instruction: &DrawingInstruction) -> Vector {
        instruction.end_point().unwrap_or_default()
    }

    #[test]
    fn test_tokenize_numbers() {
        let tokens = tokenize("M1.5.5-2e1,+.25").unwrap();
        let values: Vec<f64> = tokens
            .iter()
            .filter_map(|t| match t.kind {
                TokenKind::Number(v) => Some(v),
                TokenKind::Command(_) => None,
            })
            .collect();
        assert_eq!(values, vec![1.5, 0.5, -20.0, 0.25]);
        assert_eq!(tokens[0].kind, TokenKind::Command('M'));
    }

    #[test]
    fn test_tokenize_rejects_garbage() {
        assert_eq!(
            tokenize("M0 0 X5"),
            Err(SvgPathError::UnrecognizedToken {
                position: 5,
                found: 'X'
            })
        );
        assert!(matches!(
            parse_svg_path("M0 0 L-"),
            Err(SvgPathError::UnrecognizedToken { position: 6, .. })
        ));
    }

    #[test]
    fn test_parse_basic() {
        let segments = parse_path("M 10 20 L 30 40 Z").unwrap();
        assert_eq!(
            segments,
            vec![
                PathCommand::MoveTo(10.0, 20.0),
                PathCommand::LineTo(30.0, 40.0),
                PathCommand::Close
            ]
        );
    }

    #[test]
    fn test_parse_repeated_move_becomes_line() {
        let segments = parse_path("M0 0 10 10 20 0 m5 5 1 1").unwrap();
        assert_eq!(
            segments,
            vec![
                PathCommand::MoveTo(0.0, 0.0),
                PathCommand::LineTo(10.0, 10.0),
                PathCommand::LineTo(20.0, 0.0),
                PathCommand::MoveToRel(5.0, 5.0),
                PathCommand::LineToRel(1.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_implicit_initial_move() {
        let segments = parse_path("L10 10").unwrap();
        assert_eq!(segments[0], PathCommand::MoveTo(0.0, 0.0));
        assert_eq!(segments[1], PathCommand::LineTo(10.0, 10.0));

        let segments = parse_path("10 20").unwrap();
        assert_eq!(
            segments,
            vec![PathCommand::MoveTo(0.0, 0.0), PathCommand::LineTo(10.0, 20.0)]
        );

        assert!(parse_path("").unwrap().is_empty());
        assert_eq!(parse_path_data("  ").unwrap(), PathData::Empty);
    }

    #[test]
    fn test_missing_parameters() {
        assert_eq!(
            parse_path("M0 0 C1 2 3 4"),
            Err(SvgPathError::MissingParameters {
                command: 'C',
                expected: 6,
                found: 4
            })
        );
        assert_eq!(
            parse_path("M0 0 L5 Z"),
            Err(SvgPathError::MissingParameters {
                command: 'L',
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_number_after_close() {
        assert_eq!(
            parse_path("M0 0 L1 1 Z 4"),
            Err(SvgPathError::UnexpectedNumber {
                position: 12,
                command: 'Z'
            })
        );
    }

    #[test]
    fn test_arc_flags_are_numbers() {
        let segments = parse_path("M0 0 A5 5 0 1 0 10 0 a5 5 30 0 2 -10 0").unwrap();
        assert_eq!(segments[1], PathCommand::ArcTo(5.0, 5.0, 0.0, true, false, 10.0, 0.0));
        assert_eq!(
            segments[2],
            PathCommand::ArcToRel(5.0, 5.0, 30.0, false, true, -10.0, 0.0)
        );
    }

    #[test]
    fn test_absolutize() {
        let abs = absolutize(&parse_path("m10 10 l5 0 h5 v5 c0 1 1 1 1 0 z l1 1").unwrap());
        assert_eq!(
            abs,
            vec![
                PathCommand::MoveTo(10.0, 10.0),
                PathCommand::LineTo(15.0, 10.0),
                PathCommand::HorizontalTo(20.0),
                PathCommand::VerticalTo(15.0),
                PathCommand::CubicTo(20.0, 16.0, 21.0, 16.0, 21.0, 15.0),
                PathCommand::Close,
                PathCommand::LineTo(11.0, 11.0),
            ]
        );
    }

    #[test]
    fn test_normalize_lines() {
        let out = parse_svg_path("M10 10 H30 V40 Z").unwrap();
        assert_eq!(
            out,
            vec![MoveTo(10.0, 10.0), LineTo(30.0, 10.0), LineTo(30.0, 40.0), Close]
        );
    }

    #[test]
    fn test_quadratic_elevation() {
        let out = parse_svg_path("M0,0 Q10,10 20,0").unwrap();
        let CurveTo(x1, y1, x2, y2, x, y) = out[1] else {
            panic!("expected a cubic, got {:?}", out[1]);
        };
        let eps = 1e-12;
        assert!((x1 - 20.0 / 3.0).abs() < eps && (y1 - 20.0 / 3.0).abs() < eps);
        assert!((x2 - 40.0 / 3.0).abs() < eps && (y2 - 20.0 / 3.0).abs() < eps);
        assert_eq!((x, y), (20.0, 0.0));
    }

    #[test]
    fn test_smooth_cubic_reflection() {
        let out = parse_svg_path("M0 0 C0 10 10 10 10 0 S20 -10 20 0").unwrap();
        assert_eq!(out[2], CurveTo(10.0, -10.0, 20.0, -10.0, 20.0, 0.0));

        // without a preceding cubic the current point is the first control
        let out = parse_svg_path("M0 0 L5 0 S20 -10 20 0").unwrap();
        assert_eq!(out[2], CurveTo(5.0, 0.0, 20.0, -10.0, 20.0, 0.0));

        // a quadratic does not feed S
        let out = parse_svg_path("M0 0 Q5 5 10 0 S20 -10 20 0").unwrap();
        assert_eq!(out[2], CurveTo(10.0, 0.0, 20.0, -10.0, 20.0, 0.0));
    }

    #[test]
    fn test_smooth_quadratic_reflection() {
        let reflected = parse_svg_path("M0 0 Q10 10 20 0 T40 0").unwrap();
        let explicit = parse_svg_path("M0 0 Q10 10 20 0 Q30 -10 40 0").unwrap();
        assert_eq!(reflected, explicit);

        // T after a cubic uses the current point and degenerates to a line
        let out = parse_svg_path("M0 0 C0 10 10 10 10 0 T20 0").unwrap();
        let CurveTo(x1, y1, _, _, x, y) = out[2] else {
            panic!("expected a cubic");
        };
        assert_eq!((x1, y1, x, y), (10.0, 0.0, 20.0, 0.0));
    }

    #[test]
    fn test_arc_endpoint() {
        init_tracing();
        let out = parse_svg_path("M0,0 A50,50 0 0 1 100,0").unwrap();
        assert!(out.len() >= 2);
        assert!(out[1..].iter().all(|i| matches!(i, CurveTo(..))));
        let last = end_of(out.last().unwrap());
        assert!(close_to(last, Vector::new(100.0, 0.0), 1e-9), "ended at {last:?}");
        // 180° needs a 120° piece and a 60° piece
        assert_eq!(out.len(), 3);
        let join = end_of(&out[1]);
        assert!((join.distance(Vector::new(50.0, 0.0)) - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_arc_follows_ellipse() {
        let path = parse_path_data("M100,50 A50,25 30 1 1 20,60").unwrap();
        let PathData::Single(path) = path else {
            panic!("expected single path");
        };
        let last = path.anchors().last().unwrap().point;
        assert!(close_to(last, Vector::new(20.0, 60.0), 1e-9));
        assert!(path.curves().len() >= 2);
    }

    #[test]
    fn test_full_circle_of_arcs() {
        init_tracing();
        let out = parse_svg_path("M0 0 A10 10 0 1 1 20 0 A10 10 0 1 1 0 0").unwrap();
        let path = verso_geometry::Path::from_instructions(&out);
        let expected = 2.0 * PI * 10.0;
        assert!((path.length() - expected).abs() / expected < 0.001);
    }

    #[test]
    fn test_degenerate_arcs() {
        let out = parse_svg_path("M5 5 A0 10 0 0 1 15 5").unwrap();
        assert_eq!(out[1], CurveTo(5.0, 5.0, 15.0, 5.0, 15.0, 5.0));

        let out = parse_svg_path("M5 5 A10 10 0 0 1 5 5").unwrap();
        assert_eq!(out, vec![MoveTo(5.0, 5.0)]);
    }

    #[test]
    fn test_relative_arc() {
        let out = parse_svg_path("M10 10 a5 5 0 0 0 10 0").unwrap();
        assert!(close_to(end_of(out.last().unwrap()), Vector::new(20.0, 10.0), 1e-9));
    }

    #[test]
    fn test_close_resets_current_point() {
        let out = parse_svg_path("M10 10 L20 10 L20 20 Z l5 0").unwrap();
        assert_eq!(out.last(), Some(&LineTo(15.0, 10.0)));
    }

    #[test]
    fn test_subpaths() {
        let data = parse_path_data("M0 0 L10 0 L10 10 Z M20 20 L30 20").unwrap();
        assert_eq!(data.paths().len(), 2);
        assert!(data.paths()[0].is_closed());
        assert!(!data.paths()[1].is_closed());
    }

    #[test]
    fn test_serialize() {
        let d = serialize_instructions(&[
            MoveTo(0.0, -0.0),
            LineTo(10.5, 0.0),
            CurveTo(1.0, 2.0, 3.0, 4.0, 5.0, 6.0),
            Close,
        ]);
        assert_eq!(d, "M0 0 L10.5 0 C1 2 3 4 5 6 Z");
        assert_eq!(parse_svg_path(&d).unwrap().len(), 4);
    }

    #[test]
    fn test_error_converts() {
        let err: VersoError = parse_path("M0 0 Q1").unwrap_err().into();
        assert_eq!(err.category(), "parse");
    }
}
