use crate::Vector3;
use serde::{Deserialize, Serialize};

/// Reflection through the plane through the origin orthogonal to `axis`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Reflection {
    pub axis: Vector3,
    /// Squared length of `axis`.
    pub c: f64,
}

impl Reflection {
    /// Squared axis lengths below this reflect nothing.
    pub const MIN_AXIS_SQUARED: f64 = 1e-24;

    pub fn new(axis: Vector3) -> Self {
        Self {
            axis,
            c: axis.length_squared(),
        }
    }

    /// The reflection that maps `from` onto `to`.
    pub fn between(from: Vector3, to: Vector3) -> Self {
        Self::new(to - from)
    }

    /// Whether the axis is too short to define a plane.
    pub fn is_identity(&self) -> bool {
        self.c < Self::MIN_AXIS_SQUARED
    }

    /// Reflect `v`: `v - (2 / c) * (axis . v) * axis`.
    pub fn apply(&self, v: Vector3) -> Vector3 {
        if self.is_identity() {
            return v;
        }
        v - self.axis * (2.0 / self.c * self.axis.dot(v))
    }
}
