//! Affine transforms.
//!
//! A [`Transform`] is the 2×3 matrix
//!
//! ```text
//! [ a  c  tx ]   x' = a·x + c·y + tx
//! [ b  d  ty ]   y' = b·x + d·y + ty
//! ```
//!
//! Scenes describe transforms semantically through [`TransformParams`]; the
//! walker turns them into matrices with [`Transform::from_semantic`].

use crate::{DrawingInstruction, GeometryError, GeometryResult, Vector};
use serde::{Deserialize, Serialize};

// ==================== Transform ====================

/// 2D affine transformation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    pub fn translation(x: f64, y: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    pub fn scaling(x: f64, y: f64) -> Self {
        Self::new(x, 0.0, 0.0, y, 0.0, 0.0)
    }

    /// Rotation by `degrees`, turning the x axis towards the y axis.
    pub fn rotation(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Shear where `x' = x + shear_x·y` and `y' = y + shear_y·x`.
    pub fn shearing(x: f64, y: f64) -> Self {
        Self::new(1.0, y, x, 1.0, 0.0, 0.0)
    }

    /// Build a matrix from semantic parameters.
    ///
    /// The order is fixed: translate, then scale, rotate and shear, each of
    /// the last three taking place around `origin`. Parts equal to their
    /// identity value are skipped so identity parameters give an exact
    /// identity matrix.
    pub fn from_semantic(params: &TransformParams, origin: Vector) -> Self {
        let mut m = Transform::IDENTITY;

        if params.translate != Vector::ZERO {
            m = m.append(&Transform::translation(params.translate.x, params.translate.y));
        }
        if params.scale != Vector::new(1.0, 1.0) {
            m = m.append(&Transform::scaling(params.scale.x, params.scale.y).around(origin));
        }
        if params.rotate != 0.0 {
            m = m.append(&Transform::rotation(params.rotate).around(origin));
        }
        if params.shear != Vector::ZERO {
            m = m.append(&Transform::shearing(params.shear.x, params.shear.y).around(origin));
        }

        m
    }

    /// `T(origin) · self · T(-origin)`.
    fn around(&self, origin: Vector) -> Transform {
        if origin == Vector::ZERO {
            return *self;
        }
        Transform::translation(origin.x, origin.y)
            .append(self)
            .append(&Transform::translation(-origin.x, -origin.y))
    }

    /// Matrix product `self · other`: `other` is applied to points first.
    pub fn append(&self, other: &Transform) -> Transform {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            tx: self.a * other.tx + self.c * other.ty + self.tx,
            ty: self.b * other.tx + self.d * other.ty + self.ty,
        }
    }

    /// Same as [`Transform::append`] in free-function form.
    pub fn compose(m1: &Transform, m2: &Transform) -> Transform {
        m1.append(m2)
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Inverse matrix; fails only when the determinant is exactly zero.
    pub fn invert(&self) -> GeometryResult<Transform> {
        let det = self.determinant();
        if det == 0.0 {
            return Err(GeometryError::SingularMatrix { determinant: det });
        }

        Ok(Transform {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            tx: (self.c * self.ty - self.d * self.tx) / det,
            ty: (self.b * self.tx - self.a * self.ty) / det,
        })
    }

    /// Exact comparison against the identity matrix.
    ///
    /// A matrix that only differs by rounding noise is not the identity; use
    /// [`Transform::approx_eq`] for tolerant checks.
    pub fn is_identity(&self) -> bool {
        *self == Transform::IDENTITY
    }

    pub fn approx_eq(&self, other: &Transform, epsilon: f64) -> bool {
        (self.a - other.a).abs() <= epsilon
            && (self.b - other.b).abs() <= epsilon
            && (self.c - other.c).abs() <= epsilon
            && (self.d - other.d).abs() <= epsilon
            && (self.tx - other.tx).abs() <= epsilon
            && (self.ty - other.ty).abs() <= epsilon
    }

    pub fn apply(&self, p: Vector) -> Vector {
        Vector::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    pub fn apply_to_instruction(&self, instruction: &DrawingInstruction) -> DrawingInstruction {
        let map = |x: f64, y: f64| self.apply(Vector::new(x, y));
        match *instruction {
            DrawingInstruction::MoveTo(x, y) => DrawingInstruction::move_to(map(x, y)),
            DrawingInstruction::LineTo(x, y) => DrawingInstruction::line_to(map(x, y)),
            DrawingInstruction::CurveTo(x1, y1, x2, y2, x3, y3) => {
                DrawingInstruction::curve_to(map(x1, y1), map(x2, y2), map(x3, y3))
            }
            DrawingInstruction::Close => DrawingInstruction::Close,
        }
    }

    /// Values in SVG/CSS `matrix(a b c d e f)` order.
    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.tx, self.ty]
    }
}

// ==================== Semantic Parameters ====================

/// Semantic transform description carried by groups and settings.
///
/// Missing fields deserialize to their identity values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformParams {
    pub translate: Vector,
    pub scale: Vector,
    /// Rotation in degrees.
    pub rotate: f64,
    pub shear: Vector,
    pub origin: Vector,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            translate: Vector::ZERO,
            scale: Vector::new(1.0, 1.0),
            rotate: 0.0,
            shear: Vector::ZERO,
            origin: Vector::ZERO,
        }
    }
}

impl TransformParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(mut self, x: f64, y: f64) -> Self {
        self.translate = Vector::new(x, y);
        self
    }

    pub fn scale(mut self, x: f64, y: f64) -> Self {
        self.scale = Vector::new(x, y);
        self
    }

    pub fn scale_uniform(self, s: f64) -> Self {
        self.scale(s, s)
    }

    pub fn rotate(mut self, degrees: f64) -> Self {
        self.rotate = degrees;
        self
    }

    pub fn shear(mut self, x: f64, y: f64) -> Self {
        self.shear = Vector::new(x, y);
        self
    }

    pub fn origin(mut self, x: f64, y: f64) -> Self {
        self.origin = Vector::new(x, y);
        self
    }

    pub fn is_identity(&self) -> bool {
        *self == TransformParams {
            origin: self.origin,
            ..Default::default()
        }
    }

    /// Matrix for these parameters around their own origin.
    pub fn to_matrix(&self) -> Transform {
        Transform::from_semantic(self, self.origin)
    }
}
