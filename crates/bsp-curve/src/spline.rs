//! The B-spline entity: degree, dimension, control points, and knot vector.

use bsp_core::traits::{BoundingBox, Validate};
use bsp_core::{buffer, Result, SplineError, Tolerance, MAX_NUM_KNOTS};
use bsp_math::AabbN;
use serde::{Deserialize, Serialize};

use crate::eval::knot;

/// How the knot vector of a new spline is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnotType {
    /// Uniformly spaced knots over the default domain, no end multiplicity.
    Opened,
    /// Uniformly spaced knots with `order` repeated knots at both ends, so the
    /// curve passes through its first and last control point.
    Clamped,
    /// Every knot value repeated `order` times: a sequence of connected
    /// Bezier segments. Requires `num_knots % order == 0`.
    Beziers,
}

/// A B-spline curve of runtime degree and dimension.
///
/// Control points are stored flat: point `i` occupies
/// `control_points[i * dimension..(i + 1) * dimension]`. The knot vector has
/// `num_control_points + order` entries.
///
/// Deserialization goes through [`BSpline::from_parts`], so a deserialized
/// spline upholds the same invariants as a constructed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBSpline")]
pub struct BSpline {
    degree: usize,
    dimension: usize,
    control_points: Vec<f64>,
    knots: Vec<f64>,
}

/// Unchecked wire form of [`BSpline`].
#[derive(Deserialize)]
struct RawBSpline {
    degree: usize,
    dimension: usize,
    control_points: Vec<f64>,
    knots: Vec<f64>,
}

impl TryFrom<RawBSpline> for BSpline {
    type Error = SplineError;

    fn try_from(raw: RawBSpline) -> Result<Self> {
        Self::from_parts(raw.degree, raw.dimension, raw.control_points, raw.knots)
    }
}

impl BSpline {
    /// Create a spline with zeroed control points and a generated knot vector.
    pub fn new(
        num_control_points: usize,
        dimension: usize,
        degree: usize,
        knot_type: KnotType,
    ) -> Result<Self> {
        if dimension == 0 {
            return Err(SplineError::InvalidDimension);
        }
        if degree >= num_control_points {
            return Err(SplineError::InvalidDegree {
                degree,
                num_control_points,
            });
        }
        let num_knots = num_control_points + degree + 1;
        if num_knots > MAX_NUM_KNOTS {
            return Err(SplineError::TooManyKnots {
                num_knots,
                max: MAX_NUM_KNOTS,
            });
        }

        let control_points = buffer::zeroed(num_control_points * dimension)?;
        let knots = knot::generate(degree, num_knots, knot_type)?;
        Ok(Self {
            degree,
            dimension,
            control_points,
            knots,
        })
    }

    /// Create a spline and set its control points in one step.
    pub fn with_control_points(
        num_control_points: usize,
        dimension: usize,
        degree: usize,
        knot_type: KnotType,
        control_points: &[f64],
    ) -> Result<Self> {
        let mut spline = Self::new(num_control_points, dimension, degree, knot_type)?;
        spline.set_control_points(control_points)?;
        Ok(spline)
    }

    /// Assemble a spline from existing buffers, checking every invariant.
    pub fn from_parts(
        degree: usize,
        dimension: usize,
        control_points: Vec<f64>,
        knots: Vec<f64>,
    ) -> Result<Self> {
        let spline = Self {
            degree,
            dimension,
            control_points,
            knots,
        };
        spline.validate()?;
        Ok(spline)
    }

    /// Assemble a spline from buffers produced by an operation on a valid
    /// spline.
    pub(crate) fn from_raw(
        degree: usize,
        dimension: usize,
        control_points: Vec<f64>,
        knots: Vec<f64>,
    ) -> Self {
        let spline = Self {
            degree,
            dimension,
            control_points,
            knots,
        };
        debug_assert!(
            spline.validate().is_ok(),
            "derived spline violates invariants: {:?}",
            spline.validate()
        );
        spline
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn order(&self) -> usize {
        self.degree + 1
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn num_control_points(&self) -> usize {
        self.control_points.len() / self.dimension
    }

    pub fn control_points(&self) -> &[f64] {
        &self.control_points
    }

    pub(crate) fn control_points_mut(&mut self) -> &mut [f64] {
        &mut self.control_points
    }

    /// Iterate over control points as `dimension`-sized slices.
    pub fn control_point_iter(&self) -> std::slice::ChunksExact<'_, f64> {
        self.control_points.chunks_exact(self.dimension)
    }

    pub fn control_point_at(&self, index: usize) -> Result<&[f64]> {
        let len = self.num_control_points();
        if index >= len {
            return Err(SplineError::IndexOutOfRange { index, len });
        }
        let dim = self.dimension;
        Ok(&self.control_points[index * dim..(index + 1) * dim])
    }

    pub fn set_control_points(&mut self, control_points: &[f64]) -> Result<()> {
        if control_points.len() != self.control_points.len() {
            return Err(SplineError::DimensionMismatch {
                expected: self.control_points.len(),
                actual: control_points.len(),
            });
        }
        self.control_points.copy_from_slice(control_points);
        Ok(())
    }

    pub fn set_control_point_at(&mut self, index: usize, point: &[f64]) -> Result<()> {
        let len = self.num_control_points();
        if index >= len {
            return Err(SplineError::IndexOutOfRange { index, len });
        }
        if point.len() != self.dimension {
            return Err(SplineError::DimensionMismatch {
                expected: self.dimension,
                actual: point.len(),
            });
        }
        let dim = self.dimension;
        self.control_points[index * dim..(index + 1) * dim].copy_from_slice(point);
        Ok(())
    }

    pub fn num_knots(&self) -> usize {
        self.knots.len()
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn knot_at(&self, index: usize) -> Result<f64> {
        self.knots
            .get(index)
            .copied()
            .ok_or(SplineError::IndexOutOfRange {
                index,
                len: self.knots.len(),
            })
    }

    /// Replace the knot vector. The new vector must have the same length,
    /// be non-decreasing, and not exceed multiplicity `order`.
    pub fn set_knots(&mut self, knots: &[f64]) -> Result<()> {
        if knots.len() != self.knots.len() {
            return Err(SplineError::KnotCount {
                expected: self.knots.len(),
                actual: knots.len(),
            });
        }
        knot::check(knots, self.order(), Tolerance::default())?;
        self.knots.copy_from_slice(knots);
        Ok(())
    }

    pub fn set_knot_at(&mut self, index: usize, value: f64) -> Result<()> {
        let len = self.knots.len();
        if index >= len {
            return Err(SplineError::IndexOutOfRange { index, len });
        }
        let mut knots = buffer::copied(&self.knots)?;
        knots[index] = value;
        knot::check(&knots, self.order(), Tolerance::default())?;
        self.knots = knots;
        Ok(())
    }

    /// The parameter range `[knots[degree], knots[num_knots - order]]` over
    /// which the spline is defined.
    pub fn domain(&self) -> (f64, f64) {
        (
            self.knots[self.degree],
            self.knots[self.knots.len() - self.order()],
        )
    }
}

impl Validate for BSpline {
    fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(SplineError::InvalidDimension);
        }
        if self.control_points.len() % self.dimension != 0 {
            return Err(SplineError::DimensionMismatch {
                expected: self.control_points.len() / self.dimension * self.dimension,
                actual: self.control_points.len(),
            });
        }
        let num_control_points = self.num_control_points();
        if self.degree >= num_control_points {
            return Err(SplineError::InvalidDegree {
                degree: self.degree,
                num_control_points,
            });
        }
        let expected = num_control_points + self.order();
        if expected > MAX_NUM_KNOTS {
            return Err(SplineError::TooManyKnots {
                num_knots: expected,
                max: MAX_NUM_KNOTS,
            });
        }
        if self.knots.len() != expected {
            return Err(SplineError::KnotCount {
                expected,
                actual: self.knots.len(),
            });
        }
        knot::check(&self.knots, self.order(), Tolerance::default())
    }
}

impl BoundingBox for BSpline {
    type Point = Vec<f64>;

    /// Bounds of the control polygon, which contain the whole curve.
    fn bounding_box(&self) -> (Vec<f64>, Vec<f64>) {
        AabbN::from_points(&self.control_points, self.dimension)
            .map(|aabb| (aabb.min, aabb.max))
            .unwrap_or_default()
    }
}
