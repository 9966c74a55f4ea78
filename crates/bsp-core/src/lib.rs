pub mod buffer;
pub mod error;
pub mod tolerance;
pub mod traits;

pub use error::{Result, SplineError};
pub use tolerance::Tolerance;

/// Upper bound on the length of a knot vector. Tied to the knot epsilon:
/// `MAX_NUM_KNOTS = 1 / Tolerance::DEFAULT_KNOT`.
pub const MAX_NUM_KNOTS: usize = 10_000;

/// Lower bound of the domain of freshly constructed splines.
pub const DOMAIN_DEFAULT_MIN: f64 = 0.0;

/// Upper bound of the domain of freshly constructed splines.
pub const DOMAIN_DEFAULT_MAX: f64 = 1.0;
