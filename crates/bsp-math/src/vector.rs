//! Spline-specific algebra on glam's fixed-size vectors.
//!
//! Construction, component access, `dot`, `distance` and `cross` come
//! straight from glam; this trait adds the operations glam either lacks or
//! implements with panicking / NaN-producing semantics.

use bsp_core::{Result, SplineError};
use glam::{DVec2, DVec3, DVec4};

pub trait VectorExt: Copy + Sized {
    /// Number of components.
    const DIM: usize;

    /// Build a vector from the first `DIM` values of `values`, padding
    /// missing components with zero.
    fn from_padded(values: &[f64]) -> Self;

    /// Components as an owned `Vec`.
    fn to_vec(self) -> Vec<f64>;

    /// Euclidean length.
    fn norm(self) -> f64;

    /// Angle to `other` in degrees.
    ///
    /// The cosine is clamped to `[-1, 1]` so that round-off never leaves the
    /// domain of `acos`.
    fn angle(self, other: Self) -> Result<f64>;

    /// Unit vector in the same direction.
    fn normalized(self) -> Result<Self>;
}

macro_rules! impl_vector_ext {
    ($ty:ty, $dim:expr) => {
        impl VectorExt for $ty {
            const DIM: usize = $dim;

            fn from_padded(values: &[f64]) -> Self {
                let mut out = [0.0; $dim];
                let n = values.len().min($dim);
                out[..n].copy_from_slice(&values[..n]);
                <$ty>::from_array(out)
            }

            fn to_vec(self) -> Vec<f64> {
                self.to_array().to_vec()
            }

            fn norm(self) -> f64 {
                self.length()
            }

            fn angle(self, other: Self) -> Result<f64> {
                let denom = self.norm() * other.norm();
                if denom == 0.0 || !denom.is_finite() {
                    return Err(SplineError::DegenerateVector);
                }
                let cos = (self.dot(other) / denom).clamp(-1.0, 1.0);
                Ok(cos.acos().to_degrees())
            }

            fn normalized(self) -> Result<Self> {
                let len = self.norm();
                if len == 0.0 || !len.is_finite() {
                    return Err(SplineError::DegenerateVector);
                }
                Ok(self / len)
            }
        }
    };
}

impl_vector_ext!(DVec2, 2);
impl_vector_ext!(DVec3, 3);
impl_vector_ext!(DVec4, 4);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::{dvec2, dvec3, dvec4};

    #[test]
    fn test_from_padded() {
        assert_eq!(DVec3::from_padded(&[1.0, 2.0]), dvec3(1.0, 2.0, 0.0));
        assert_eq!(DVec2::from_padded(&[1.0, 2.0, 3.0]), dvec2(1.0, 2.0));
        assert_eq!(DVec4::from_padded(&[]), DVec4::ZERO);
    }

    #[test]
    fn test_norm_and_distance() {
        let v = dvec4(1.0, 2.0, 2.0, 4.0);
        assert_abs_diff_eq!(v.norm(), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dvec2(0.0, 0.0).distance(dvec2(3.0, 4.0)), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_angle_degrees() {
        let a = dvec3(1.0, 0.0, 0.0);
        assert_abs_diff_eq!(a.angle(dvec3(0.0, 5.0, 0.0)).unwrap(), 90.0, epsilon = 1e-10);
        assert_abs_diff_eq!(a.angle(dvec3(-2.0, 0.0, 0.0)).unwrap(), 180.0, epsilon = 1e-10);
        assert_abs_diff_eq!(a.angle(a * 3.0).unwrap(), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(dvec2(1.0, 1.0).angle(dvec2(1.0, 0.0)).unwrap(), 45.0, epsilon = 1e-10);
    }

    #[test]
    fn test_angle_zero_vector() {
        let err = DVec3::ZERO.angle(DVec3::X).unwrap_err();
        assert_eq!(err, SplineError::DegenerateVector);
    }

    #[test]
    fn test_normalized() {
        let n = dvec3(0.0, 3.0, 4.0).normalized().unwrap();
        assert_abs_diff_eq!(n.norm(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(n.z, 0.8, epsilon = 1e-12);
        assert_eq!(DVec2::ZERO.normalized(), Err(SplineError::DegenerateVector));
    }

    #[test]
    fn test_cross() {
        let c = DVec3::X.cross(DVec3::Y);
        assert_eq!(c, DVec3::Z);
    }
}
