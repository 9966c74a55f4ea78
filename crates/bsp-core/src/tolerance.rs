/// Numeric thresholds used by spline computations.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Two knots closer than this are considered equal.
    pub knot: f64,
    /// Two points closer than this are considered equal.
    pub point: f64,
    /// Lengths below this are treated as zero.
    pub length_zero: f64,
}

impl Tolerance {
    pub const DEFAULT_KNOT: f64 = 1e-4;
    pub const DEFAULT_POINT: f64 = 1e-5;
    pub const DEFAULT_LENGTH_ZERO: f64 = 1e-4;

    pub fn new(knot: f64, point: f64, length_zero: f64) -> Self {
        Self {
            knot,
            point,
            length_zero,
        }
    }

    pub fn default_precision() -> Self {
        Self {
            knot: Self::DEFAULT_KNOT,
            point: Self::DEFAULT_POINT,
            length_zero: Self::DEFAULT_LENGTH_ZERO,
        }
    }

    /// Check if two knot values are equal within knot tolerance
    pub fn knots_equal(self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.knot
    }

    /// Check if a distance is small enough for two points to coincide
    pub fn points_equal(self, distance: f64) -> bool {
        distance < self.point
    }

    /// Check if a length is zero within tolerance
    pub fn is_zero_length(self, len: f64) -> bool {
        len < self.length_zero
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::default_precision()
    }
}
