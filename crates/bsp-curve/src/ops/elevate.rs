//! Degree elevation through Bezier decomposition.

use std::iter;

use bsp_core::{buffer, Result};
use bsp_math::nd;
use log::debug;

use crate::spline::BSpline;

impl BSpline {
    /// Raise the degree by `amount` without changing the shape of the curve.
    ///
    /// The curve is split into Bezier segments and each one is elevated.
    /// Neighbouring segments whose shared end points are at most `epsilon`
    /// apart are joined again, leaving a knot of multiplicity `degree` in
    /// between.
    pub fn elevate_degree(&self, amount: usize, epsilon: f64) -> Result<BSpline> {
        if amount == 0 {
            return Ok(self.clone());
        }
        let eps = epsilon.abs();
        let beziers = self.to_beziers()?;
        let dim = beziers.dimension();
        let order = beziers.order();
        let num_beziers = beziers.num_control_points() / order;
        let elevated_order = order + amount;
        let group = |i: usize| beziers.knots()[i * order];

        let mut ctrlp = buffer::with_capacity(num_beziers * elevated_order * dim)?;
        let mut knots = buffer::with_capacity((num_beziers + 1) * elevated_order)?;
        let mut segment = buffer::zeroed(elevated_order * dim)?;
        knots.extend(iter::repeat(group(0)).take(elevated_order));

        for (i, points) in beziers
            .control_points()
            .chunks_exact(order * dim)
            .enumerate()
        {
            segment[..order * dim].copy_from_slice(points);
            for o in order..elevated_order {
                elevate_bezier(&mut segment[..(o + 1) * dim], dim);
            }

            let mut skip = 0;
            if i > 0 {
                let joined = nd::distance(&ctrlp[ctrlp.len() - dim..], &segment[..dim]) <= eps;
                let multiplicity = if joined {
                    skip = dim;
                    elevated_order - 1
                } else {
                    elevated_order
                };
                knots.extend(iter::repeat(group(i)).take(multiplicity));
            }
            ctrlp.extend_from_slice(&segment[skip..]);
        }
        knots.extend(iter::repeat(group(num_beziers)).take(elevated_order));

        debug!(
            "elevated degree {} to {} over {num_beziers} segments",
            self.degree(),
            elevated_order - 1
        );
        Ok(BSpline::from_raw(elevated_order - 1, dim, ctrlp, knots))
    }
}

/// Elevate a Bezier curve by one degree in place. The curve occupies all but
/// the last point of `points`; the elevated curve fills all of it.
fn elevate_bezier(points: &mut [f64], dim: usize) {
    let order = points.len() / dim - 1;
    points.copy_within((order - 1) * dim..order * dim, order * dim);
    // backwards, so that point c - 1 still holds its old value
    for c in (1..order).rev() {
        let f = c as f64 / order as f64;
        for d in 0..dim {
            let i = c * dim + d;
            points[i] = f * points[i - dim] + (1.0 - f) * points[i];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spline::KnotType;
    use approx::assert_abs_diff_eq;

    fn cubic() -> BSpline {
        BSpline::with_control_points(
            6,
            2,
            3,
            KnotType::Clamped,
            &[0.0, 0.0, 1.0, 3.0, 3.0, 4.0, 5.0, 1.0, 7.0, 2.0, 8.0, 5.0],
        )
        .unwrap()
    }

    fn assert_same_curve(a: &BSpline, b: &BSpline) {
        for u in a.uniform_knot_seq(41) {
            let pa = a.eval(u).unwrap();
            let pb = b.eval(u).unwrap();
            for (x, y) in pa.result_point().iter().zip(pb.result_point()) {
                assert_abs_diff_eq!(x, y, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_elevate_bezier_quadratic() {
        // [0, 2, 4] on a line stays on it, with evenly spaced points
        let mut points = [0.0, 2.0, 4.0, 0.0];
        elevate_bezier(&mut points, 1);
        for (a, e) in points.iter().zip([0.0, 4.0 / 3.0, 8.0 / 3.0, 4.0]) {
            assert_abs_diff_eq!(*a, e, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_elevate_keeps_shape() {
        let spline = cubic();
        let elevated = spline.elevate_degree(1, 1e-5).unwrap();
        assert_eq!(elevated.degree(), 4);
        // three segments of five points, joined twice
        assert_eq!(elevated.num_control_points(), 13);
        assert_eq!(elevated.domain(), spline.domain());
        assert_same_curve(&spline, &elevated);

        let twice = spline.elevate_degree(2, 1e-5).unwrap();
        assert_eq!(twice.degree(), 5);
        assert_same_curve(&spline, &twice);
    }

    #[test]
    fn test_elevate_zero_copies() {
        let spline = cubic();
        assert_eq!(spline.elevate_degree(0, 1e-5).unwrap(), spline);
    }

    #[test]
    fn test_elevate_keeps_gaps() {
        let spline = BSpline::from_parts(
            1,
            1,
            vec![0.0, 1.0, 5.0, 6.0],
            vec![0.0, 0.0, 0.5, 0.5, 1.0, 1.0],
        )
        .unwrap();
        let elevated = spline.elevate_degree(1, 1e-5).unwrap();
        assert_eq!(elevated.control_points(), &[0.0, 0.5, 1.0, 5.0, 5.5, 6.0]);
        assert_eq!(
            elevated.knots(),
            &[0.0, 0.0, 0.0, 0.5, 0.5, 0.5, 1.0, 1.0, 1.0]
        );
        assert_abs_diff_eq!(elevated.eval(0.25).unwrap().result()[0], 0.5, epsilon = 1e-12);
        assert_eq!(elevated.eval(0.5).unwrap().result(), &[1.0, 5.0]);
    }
}
