use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplineError {
    #[error("degree ({degree}) >= num(control_points) ({num_control_points})")]
    InvalidDegree {
        degree: usize,
        num_control_points: usize,
    },

    #[error("unsupported dimension: 0")]
    InvalidDimension,

    #[error("unsupported number of knots: {num_knots} > {max}")]
    TooManyKnots { num_knots: usize, max: usize },

    #[error("expected {expected} knots, got {actual}")]
    KnotCount { expected: usize, actual: usize },

    #[error("decreasing knot vector at index: {index}")]
    KnotsDecreasing { index: usize },

    #[error("multiplicity of knot {knot} ({multiplicity}) exceeds order ({order})")]
    Multiplicity {
        knot: f64,
        multiplicity: usize,
        order: usize,
    },

    #[error("parameter ({u}) is outside of domain [{min}, {max}]")]
    ParameterOutOfDomain { u: f64, min: f64, max: f64 },

    /// A blending weight would divide by a zero knot span. Valid splines never
    /// reach this; it signals a broken knot vector invariant.
    #[error("degenerate knot span [{left}, {right}] at index {index}")]
    DegenerateKnotSpan { index: usize, left: f64, right: f64 },

    #[error("index ({index}) out of range (len: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("expected {expected} values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("num(points) ({given}) < {required}")]
    InsufficientPoints { given: usize, required: usize },

    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("vector has zero length")]
    DegenerateVector,

    #[error("discontinuity at knot: {knot}")]
    Underivable { knot: f64 },

    #[error("factor ({0}) is not in [0, 1]")]
    InvalidFactor(f64),

    #[error("no result: {0}")]
    NoResult(String),

    #[error("out of memory (requested {requested} values)")]
    Allocation { requested: usize },
}

impl SplineError {
    /// Allocation failures may succeed on retry, argument errors never do.
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self, Self::Allocation { .. })
    }

    /// Whether this error indicates a violated internal invariant rather than
    /// bad input.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::DegenerateKnotSpan { .. })
    }

    pub(crate) fn from_reserve(requested: usize, _err: TryReserveError) -> Self {
        Self::Allocation { requested }
    }
}

pub type Result<T> = std::result::Result<T, SplineError>;
