use crate::{Transform, Vector};

/// An on-curve point with optional absolute control handles.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Anchor {
    pub point: Vector,
    pub handle_in: Option<Vector>,
    pub handle_out: Option<Vector>,
}

impl Anchor {
    pub fn new(point: Vector) -> Self {
        Self {
            point,
            handle_in: None,
            handle_out: None,
        }
    }

    pub fn with_handles(point: Vector, handle_in: Option<Vector>, handle_out: Option<Vector>) -> Self {
        Self {
            point,
            handle_in,
            handle_out,
        }
    }

    pub fn has_handles(&self) -> bool {
        self.handle_in.is_some() || self.handle_out.is_some()
    }

    pub fn remove_handles(&self) -> Anchor {
        Anchor::new(self.point)
    }

    /// Same anchor with `handle_in` and `handle_out` exchanged.
    pub fn swapped_handles(&self) -> Anchor {
        Anchor {
            point: self.point,
            handle_in: self.handle_out,
            handle_out: self.handle_in,
        }
    }

    pub fn transformed(&self, m: &Transform) -> Anchor {
        Anchor {
            point: m.apply(self.point),
            handle_in: self.handle_in.map(|h| m.apply(h)),
            handle_out: self.handle_out.map(|h| m.apply(h)),
        }
    }
}
