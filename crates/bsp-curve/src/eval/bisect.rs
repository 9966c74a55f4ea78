//! Parameter search by coordinate value.

use bsp_core::{Result, SplineError, Tolerance};
use log::trace;
use serde::{Deserialize, Serialize};

use super::deboor::DeBoorNet;
use crate::spline::BSpline;

/// Settings for [`BSpline::bisect`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BisectOptions {
    /// Largest accepted distance between the found coordinate and the value.
    pub epsilon: f64,
    /// Fail with [`SplineError::NoResult`] when no point is found within
    /// `max_iter` steps. Otherwise the last candidate is returned.
    pub persnickety: bool,
    /// Component of the points compared with the value.
    pub index: usize,
    /// Whether the control points are sorted ascending at `index`.
    pub ascending: bool,
    pub max_iter: usize,
}

impl Default for BisectOptions {
    fn default() -> Self {
        Self {
            epsilon: Tolerance::DEFAULT_POINT,
            persnickety: false,
            index: 0,
            ascending: true,
            max_iter: 30,
        }
    }
}

impl BSpline {
    /// Find a point whose component `options.index` is within
    /// `options.epsilon` of `value` by bisecting the domain.
    ///
    /// The control points must be sorted at that component, in the order
    /// given by `options.ascending`. Otherwise the result is unspecified.
    pub fn bisect(&self, value: f64, options: BisectOptions) -> Result<DeBoorNet> {
        let dim = self.dimension();
        if options.index >= dim {
            return Err(SplineError::IndexOutOfRange {
                index: options.index,
                len: dim,
            });
        }
        if options.max_iter == 0 {
            return Err(SplineError::NoResult("0 iterations".into()));
        }
        let eps = options.epsilon.abs();
        let (mut min, mut max) = self.domain();

        let mut iter = 0;
        loop {
            let mid = 0.5 * (min + max);
            let net = self.eval(mid)?;
            let x = net.result_point()[options.index];
            if (x - value).abs() <= eps {
                trace!("bisect found {value} at u={mid} after {iter} steps");
                return Ok(net);
            }
            iter += 1;
            if iter == options.max_iter {
                if options.persnickety {
                    return Err(SplineError::NoResult(format!(
                        "maximum iterations ({}) exceeded",
                        options.max_iter
                    )));
                }
                return Ok(net);
            }
            if (x < value) == options.ascending {
                min = mid;
            } else {
                max = mid;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spline::KnotType;
    use approx::assert_abs_diff_eq;

    /// x(u) = u, y(u) = u^3
    fn cubic_graph() -> BSpline {
        BSpline::with_control_points(
            4,
            2,
            3,
            KnotType::Clamped,
            &[0.0, 0.0, 1.0 / 3.0, 0.0, 2.0 / 3.0, 0.0, 1.0, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn test_bisect_ascending() {
        let options = BisectOptions {
            index: 1,
            ..Default::default()
        };
        let net = cubic_graph().bisect(0.2, options).unwrap();
        let p = net.result_point();
        assert!((p[1] - 0.2).abs() <= options.epsilon);
        assert_abs_diff_eq!(p[0], 0.2f64.cbrt(), epsilon = 1e-4);
        assert_abs_diff_eq!(net.knot(), p[0], epsilon = 1e-12);
    }

    #[test]
    fn test_bisect_descending() {
        let spline =
            BSpline::with_control_points(2, 1, 1, KnotType::Clamped, &[1.0, 0.0]).unwrap();
        let options = BisectOptions {
            ascending: false,
            ..Default::default()
        };
        let net = spline.bisect(0.25, options).unwrap();
        assert_abs_diff_eq!(net.knot(), 0.75, epsilon = 1e-5);
    }

    #[test]
    fn test_bisect_unreachable_value() {
        let spline = cubic_graph();
        let net = spline.bisect(2.0, BisectOptions::default()).unwrap();
        assert!(net.result_point()[0] > 0.99);

        let options = BisectOptions {
            persnickety: true,
            ..Default::default()
        };
        assert!(matches!(
            spline.bisect(2.0, options).unwrap_err(),
            SplineError::NoResult(_)
        ));
    }

    #[test]
    fn test_bisect_invalid_options() {
        let spline = cubic_graph();
        let options = BisectOptions {
            index: 2,
            ..Default::default()
        };
        assert_eq!(
            spline.bisect(0.5, options).unwrap_err(),
            SplineError::IndexOutOfRange { index: 2, len: 2 }
        );
        let options = BisectOptions {
            max_iter: 0,
            ..Default::default()
        };
        assert!(matches!(
            spline.bisect(0.5, options).unwrap_err(),
            SplineError::NoResult(_)
        ));
    }
}
