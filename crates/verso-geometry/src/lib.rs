//! # Verso Geometry
//!
//! The vector geometry model behind every Verso scene.
//!
//! ## Features
//!
//! - **Vector**: 2D point/vector value type
//! - **Transform**: affine 2×3 matrices built from semantic parameters
//! - **Curve**: cubic Bézier segments with arc length, tangents and curvature
//! - **Path**: anchor sequences parametrized by arc length
//! - **Shapes**: rectangle, ellipse, circle, polygon and line paths
//!
//! ## Architecture
//!
//! ```text
//! DrawingInstruction stream
//!    └── PathData (Empty | Single | Compound)
//!           └── Path
//!                 ├── Anchors (point + absolute handles)
//!                 └── Curves (derived, arc length cached)
//! ```

use thiserror::Error;
use verso_common::VersoError;

mod anchor;
mod curve;
mod instruction;
mod path;
pub mod shapes;
mod transform;
mod vector;

pub use anchor::Anchor;
pub use curve::Curve;
pub use instruction::DrawingInstruction;
pub use path::{CompoundPath, CurveLocation, Path, PathData, Rect};
pub use transform::{Transform, TransformParams};
pub use vector::Vector;

/// Tolerance used by geometric predicates such as [`Curve::is_linear`].
pub const EPSILON: f64 = 1e-4;

// ==================== Errors ====================

/// Errors that can occur in geometry operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Singular matrix (determinant {determinant}) cannot be inverted")]
    SingularMatrix { determinant: f64 },
}

/// Result type alias for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

impl From<GeometryError> for VersoError {
    fn from(err: GeometryError) -> Self {
        VersoError::geometry_with_source("geometry domain error", err)
    }
}
