//! Paths, compound paths and instruction-stream assembly.

use crate::{Anchor, Curve, DrawingInstruction, Transform, Vector};

// ==================== Bounds ====================

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Smallest rectangle containing every point, `None` for no points.
    pub fn from_points(points: impl IntoIterator<Item = Vector>) -> Option<Rect> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| {
            (
                Vector::new(min.x.min(p.x), min.y.min(p.y)),
                Vector::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        Some(Rect::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(x, y, self.right().max(other.right()) - x, self.bottom().max(other.bottom()) - y)
    }
}

// ==================== Path ====================

/// Where an arc-length parameter lands on a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveLocation {
    /// Index into [`Path::curves`].
    pub index: usize,
    /// Local parameter on that curve.
    pub t: f64,
    /// Distance along that curve.
    pub offset: f64,
}

/// An immutable sequence of anchors.
///
/// Curves and total length are derived once in [`Path::new`]. A closed path
/// gets an extra curve from the last anchor back to the first. Paths with
/// fewer than two anchors have no curves and zero length.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    anchors: Vec<Anchor>,
    closed: bool,
    curves: Vec<Curve>,
    length: f64,
}

impl Path {
    pub fn new(anchors: Vec<Anchor>, closed: bool) -> Self {
        let curves = Self::curves_of(&anchors, closed);
        let length = curves.iter().map(Curve::length).sum();
        Self {
            anchors,
            closed,
            curves,
            length,
        }
    }

    pub fn curves_of(anchors: &[Anchor], closed: bool) -> Vec<Curve> {
        if anchors.len() < 2 {
            return Vec::new();
        }

        let mut curves: Vec<Curve> = anchors.windows(2).map(|w| Curve::new(&w[0], &w[1])).collect();
        if closed {
            curves.push(Curve::new(&anchors[anchors.len() - 1], &anchors[0]));
        }
        curves
    }

    /// Build a single path from canonical instructions.
    ///
    /// `MoveTo` and `LineTo` add anchors; `CurveTo` sets the previous anchor's
    /// outgoing handle and adds an anchor with an incoming handle; `Close`
    /// marks the path closed. Drawing before any `MoveTo` starts at the origin.
    pub fn from_instructions(instructions: &[DrawingInstruction]) -> Path {
        let mut anchors: Vec<Anchor> = Vec::new();
        let mut closed = false;

        for instruction in instructions {
            match *instruction {
                DrawingInstruction::MoveTo(x, y) => {
                    anchors.push(Anchor::new(Vector::new(x, y)));
                }
                DrawingInstruction::LineTo(x, y) => {
                    if anchors.is_empty() {
                        anchors.push(Anchor::new(Vector::ZERO));
                    }
                    anchors.push(Anchor::new(Vector::new(x, y)));
                }
                DrawingInstruction::CurveTo(x1, y1, x2, y2, x3, y3) => {
                    if anchors.is_empty() {
                        anchors.push(Anchor::new(Vector::ZERO));
                    }
                    if let Some(last) = anchors.last_mut() {
                        last.handle_out = Some(Vector::new(x1, y1));
                    }
                    anchors.push(Anchor::with_handles(
                        Vector::new(x3, y3),
                        Some(Vector::new(x2, y2)),
                        None,
                    ));
                }
                DrawingInstruction::Close => closed = true,
            }
        }

        Path::new(anchors, closed)
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Locate the fraction `t` (clamped to `[0, 1]`) of the total length.
    pub fn location_at(&self, t: f64) -> Option<CurveLocation> {
        let last = self.curves.len().checked_sub(1)?;
        let offset = self.length * t.clamp(0.0, 1.0);

        let mut start = 0.0;
        for (index, curve) in self.curves.iter().enumerate() {
            let end = start + curve.length();
            if end > offset {
                let local = offset - start;
                return Some(CurveLocation {
                    index,
                    t: local / curve.length(),
                    offset: local,
                });
            }
            start = end;
        }

        Some(CurveLocation {
            index: last,
            t: 1.0,
            offset: self.curves[last].length(),
        })
    }

    fn located<T>(&self, t: f64, f: impl FnOnce(&Curve, f64) -> T) -> Option<T> {
        let loc = self.location_at(t)?;
        Some(f(&self.curves[loc.index], loc.t))
    }

    /// Point at fraction `t` of the length.
    ///
    /// A single-anchor path answers with its anchor.
    pub fn point_at(&self, t: f64) -> Option<Vector> {
        self.located(t, Curve::point_at)
            .or_else(|| self.anchors.first().map(|a| a.point))
    }

    pub fn tangent_at(&self, t: f64) -> Option<Vector> {
        self.located(t, Curve::tangent_at)
    }

    pub fn normal_at(&self, t: f64) -> Option<Vector> {
        self.located(t, Curve::normal_at)
    }

    pub fn curvature_at(&self, t: f64) -> Option<f64> {
        self.located(t, Curve::curvature_at)
    }

    pub fn radius_at(&self, t: f64) -> Option<f64> {
        self.located(t, Curve::radius_at)
    }

    pub fn to_reversed(&self) -> Path {
        let anchors = self.anchors.iter().rev().map(Anchor::swapped_handles).collect();
        Path::new(anchors, self.closed)
    }

    pub fn to_straightened(&self) -> Path {
        let anchors = self.anchors.iter().map(Anchor::remove_handles).collect();
        Path::new(anchors, self.closed)
    }

    pub fn transformed(&self, m: &Transform) -> Path {
        let anchors = self.anchors.iter().map(|a| a.transformed(m)).collect();
        Path::new(anchors, self.closed)
    }

    /// Canonical instructions for this path.
    ///
    /// A straight closing segment is left to `Close`.
    pub fn to_instructions(&self) -> Vec<DrawingInstruction> {
        let Some(first) = self.anchors.first() else {
            return Vec::new();
        };

        let mut out = Vec::with_capacity(self.curves.len() + 2);
        out.push(DrawingInstruction::move_to(first.point));

        let open_curves = if self.closed {
            self.curves.len().saturating_sub(1)
        } else {
            self.curves.len()
        };
        out.extend(self.curves[..open_curves].iter().map(Curve::to_instruction));

        if self.closed {
            if let Some(closing) = self.curves.get(open_curves) {
                if !closing.is_linear() {
                    out.push(closing.to_instruction());
                }
            }
            out.push(DrawingInstruction::Close);
        }

        out
    }

    /// Bounds of the control polygon (anchors and handles).
    pub fn bounds(&self) -> Option<Rect> {
        Rect::from_points(
            self.anchors
                .iter()
                .flat_map(|a| [Some(a.point), a.handle_in, a.handle_out])
                .flatten(),
        )
    }
}

// ==================== Compound Path ====================

/// Several subpaths drawn as one shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundPath {
    pub paths: Vec<Path>,
}

impl CompoundPath {
    pub fn new(paths: Vec<Path>) -> Self {
        Self { paths }
    }

    pub fn to_instructions(&self) -> Vec<DrawingInstruction> {
        self.paths.iter().flat_map(Path::to_instructions).collect()
    }

    pub fn length(&self) -> f64 {
        self.paths.iter().map(Path::length).sum()
    }

    pub fn transformed(&self, m: &Transform) -> CompoundPath {
        CompoundPath::new(self.paths.iter().map(|p| p.transformed(m)).collect())
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.paths
            .iter()
            .filter_map(Path::bounds)
            .reduce(|acc, r| acc.union(&r))
    }
}

// ==================== Path Data ====================

/// Geometry assembled from an instruction stream.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PathData {
    #[default]
    Empty,
    Single(Path),
    Compound(CompoundPath),
}

impl PathData {
    /// Split an instruction stream into subpaths.
    ///
    /// A subpath ends at `Close` or when a `MoveTo` follows drawing. Drawing
    /// right after `Close` continues from the closed subpath's start point.
    pub fn from_instructions(instructions: &[DrawingInstruction]) -> PathData {
        let mut subpaths: Vec<Vec<DrawingInstruction>> = Vec::new();
        let mut current: Vec<DrawingInstruction> = Vec::new();
        let mut start = Vector::ZERO;

        for instruction in instructions {
            match *instruction {
                DrawingInstruction::MoveTo(x, y) => {
                    if current.len() > 1 {
                        subpaths.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(*instruction);
                    start = Vector::new(x, y);
                }
                DrawingInstruction::LineTo(..) | DrawingInstruction::CurveTo(..) => {
                    if current.is_empty() {
                        current.push(DrawingInstruction::move_to(start));
                    }
                    current.push(*instruction);
                }
                DrawingInstruction::Close => {
                    if !current.is_empty() {
                        current.push(DrawingInstruction::Close);
                        subpaths.push(std::mem::take(&mut current));
                    }
                }
            }
        }

        // A trailing bare move only counts when nothing else was drawn.
        if current.len() > 1 || (subpaths.is_empty() && !current.is_empty()) {
            subpaths.push(current);
        }

        let mut paths: Vec<Path> = subpaths.iter().map(|s| Path::from_instructions(s)).collect();
        match paths.len() {
            0 => PathData::Empty,
            1 => PathData::Single(paths.remove(0)),
            _ => PathData::Compound(CompoundPath::new(paths)),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PathData::Empty)
    }

    pub fn paths(&self) -> &[Path] {
        match self {
            PathData::Empty => &[],
            PathData::Single(path) => std::slice::from_ref(path),
            PathData::Compound(compound) => &compound.paths,
        }
    }

    pub fn to_instructions(&self) -> Vec<DrawingInstruction> {
        self.paths().iter().flat_map(Path::to_instructions).collect()
    }

    pub fn transformed(&self, m: &Transform) -> PathData {
        match self {
            PathData::Empty => PathData::Empty,
            PathData::Single(path) => PathData::Single(path.transformed(m)),
            PathData::Compound(compound) => PathData::Compound(compound.transformed(m)),
        }
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.paths()
            .iter()
            .filter_map(Path::bounds)
            .reduce(|acc, r| acc.union(&r))
    }
}

impl From<Path> for PathData {
    fn from(path: Path) -> Self {
        PathData::Single(path)
    }
}

impl From<CompoundPath> for PathData {
    fn from(compound: CompoundPath) -> Self {
        PathData::Compound(compound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::circle_path;
    use DrawingInstruction::*;

    fn square() -> Vec<DrawingInstruction> {
        vec![MoveTo(0.0, 0.0), LineTo(10.0, 0.0), LineTo(10.0, 10.0), Close]
    }

    #[test]
    fn test_roundtrip_closed_triangle() {
        let path = Path::from_instructions(&square());
        assert!(path.is_closed());
        assert_eq!(path.anchors().len(), 3);
        assert_eq!(path.curves().len(), 3);
        assert_eq!(path.to_instructions(), square());
    }

    #[test]
    fn test_curved_closing_segment_is_kept() {
        let anchors = vec![
            Anchor::with_handles(Vector::new(0.0, 0.0), Some(Vector::new(-5.0, 5.0)), None),
            Anchor::new(Vector::new(10.0, 0.0)),
        ];
        let path = Path::new(anchors, true);
        let out = path.to_instructions();
        assert_eq!(out.len(), 4);
        assert!(matches!(out[2], CurveTo(..)));
        assert_eq!(out[3], Close);
    }

    #[test]
    fn test_endpoints() {
        let path = Path::from_instructions(&[
            MoveTo(0.0, 0.0),
            CurveTo(0.0, 20.0, 30.0, 20.0, 30.0, 0.0),
            LineTo(60.0, 0.0),
        ]);
        assert_eq!(path.point_at(0.0), Some(Vector::new(0.0, 0.0)));
        assert_eq!(path.point_at(1.0), Some(Vector::new(60.0, 0.0)));
        // clamped
        assert_eq!(path.point_at(-1.0), Some(Vector::new(0.0, 0.0)));
        assert_eq!(path.point_at(3.0), Some(Vector::new(60.0, 0.0)));
    }

    #[test]
    fn test_location_at() {
        let path = Path::from_instructions(&[MoveTo(0.0, 0.0), LineTo(10.0, 0.0), LineTo(10.0, 30.0)]);
        assert!((path.length() - 40.0).abs() < 1e-9);

        let loc = path.location_at(0.5).unwrap();
        assert_eq!(loc.index, 1);
        assert!((loc.t - 1.0 / 3.0).abs() < 1e-9);
        assert!((loc.offset - 10.0).abs() < 1e-9);

        let end = path.location_at(1.0).unwrap();
        assert_eq!(end.index, 1);
        assert_eq!(end.t, 1.0);
    }

    #[test]
    fn test_degenerate_paths() {
        let empty = Path::new(Vec::new(), false);
        assert_eq!(empty.length(), 0.0);
        assert!(empty.to_instructions().is_empty());
        assert_eq!(empty.point_at(0.5), None);
        assert_eq!(empty.bounds(), None);

        let single = Path::new(vec![Anchor::new(Vector::new(3.0, 4.0))], true);
        assert!(single.curves().is_empty());
        assert_eq!(single.length(), 0.0);
        assert_eq!(single.point_at(0.7), Some(Vector::new(3.0, 4.0)));
        assert_eq!(single.tangent_at(0.7), None);
        assert_eq!(single.location_at(0.7), None);
    }

    #[test]
    fn test_circle_length() {
        let circle = circle_path(0.0, 0.0, 100.0);
        let expected = 2.0 * std::f64::consts::PI * 100.0;
        assert!((circle.length() - expected).abs() / expected < 0.001);
    }

    #[test]
    fn test_reverse_is_self_inverse() {
        let circle = circle_path(50.0, 50.0, 20.0);
        let reversed = circle.to_reversed();
        assert_ne!(reversed, circle);
        assert_eq!(reversed.to_reversed(), circle);
        assert!((reversed.length() - circle.length()).abs() < 1e-9);
    }

    #[test]
    fn test_straightened() {
        let circle = circle_path(0.0, 0.0, 10.0);
        let straight = circle.to_straightened();
        assert!(straight.anchors().iter().all(|a| !a.has_handles()));
        assert!(straight.curves().iter().all(Curve::is_linear));
        assert!(straight.length() < circle.length());
    }

    #[test]
    fn test_transformed_and_bounds() {
        let path = Path::from_instructions(&square());
        let moved = path.transformed(&Transform::translation(5.0, -5.0));
        assert_eq!(moved.bounds(), Some(Rect::new(5.0, -5.0, 10.0, 10.0)));
        assert!((moved.length() - path.length()).abs() < 1e-9);
    }

    #[test]
    fn test_path_data_split() {
        assert_eq!(PathData::from_instructions(&[]), PathData::Empty);
        assert!(matches!(PathData::from_instructions(&square()), PathData::Single(_)));

        let two = PathData::from_instructions(&[
            MoveTo(0.0, 0.0),
            LineTo(10.0, 0.0),
            MoveTo(20.0, 0.0),
            LineTo(30.0, 0.0),
        ]);
        let PathData::Compound(compound) = &two else {
            panic!("expected compound, got {two:?}");
        };
        assert_eq!(compound.paths.len(), 2);
        assert_eq!(compound.paths[1].anchors()[0].point, Vector::new(20.0, 0.0));
        assert_eq!(two.to_instructions().len(), 4);
    }

    #[test]
    fn test_drawing_after_close_restarts_at_subpath_start() {
        let data = PathData::from_instructions(&[
            MoveTo(5.0, 5.0),
            LineTo(10.0, 5.0),
            LineTo(10.0, 10.0),
            Close,
            LineTo(0.0, 10.0),
        ]);
        let paths = data.paths();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[1].anchors()[0].point, Vector::new(5.0, 5.0));
        assert!(!paths[1].is_closed());
    }

    #[test]
    fn test_drawing_without_move_starts_at_origin() {
        let path = Path::from_instructions(&[LineTo(4.0, 3.0)]);
        assert_eq!(path.anchors().len(), 2);

        let data = PathData::from_instructions(&[LineTo(4.0, 3.0)]);
        let PathData::Single(path) = data else {
            panic!("expected single path");
        };
        assert_eq!(path.anchors()[0].point, Vector::ZERO);
        assert!((path.length() - 5.0).abs() < 1e-9);
    }
}
