//! Alignment of two splines and morphing between them.

use bsp_core::{buffer, Result, SplineError, Tolerance};
use log::debug;

use crate::spline::BSpline;

impl BSpline {
    /// Bring this spline and `other` to the same degree and number of
    /// control points without changing either curve.
    ///
    /// The spline of lower degree is elevated (see
    /// [`BSpline::elevate_degree`], which `epsilon` is passed to), then knots
    /// are inserted into the one with fewer knots. Returns the aligned
    /// versions of `self` and `other`, in that order.
    pub fn align(&self, other: &BSpline, epsilon: f64) -> Result<(BSpline, BSpline)> {
        let (deg_a, deg_b) = (self.degree(), other.degree());
        let mut a = if deg_a < deg_b {
            self.elevate_degree(deg_b - deg_a, epsilon)?
        } else {
            self.clone()
        };
        let mut b = if deg_b < deg_a {
            other.elevate_degree(deg_a - deg_b, epsilon)?
        } else {
            other.clone()
        };

        if a.num_knots() < b.num_knots() {
            a = a.insert_spread(b.num_knots() - a.num_knots())?;
        } else if b.num_knots() < a.num_knots() {
            b = b.insert_spread(a.num_knots() - b.num_knots())?;
        }
        debug!(
            "aligned splines to degree {} with {} control points",
            a.degree(),
            a.num_control_points()
        );
        Ok((a, b))
    }

    /// Blend between this spline (`t = 0`) and `target` (`t = 1`) by
    /// interpolating control points and knots.
    ///
    /// Splines of different degree or knot count are aligned first (see
    /// [`BSpline::align`]). The result has the smaller of the two
    /// dimensions.
    pub fn morph(&self, target: &BSpline, t: f64, epsilon: f64) -> Result<BSpline> {
        if !(0.0..=1.0).contains(&t) {
            return Err(SplineError::InvalidFactor(t));
        }
        let (origin, target) =
            if self.degree() != target.degree() || self.num_knots() != target.num_knots() {
                self.align(target, epsilon)?
            } else {
                (self.clone(), target.clone())
            };

        let t_hat = 1.0 - t;
        let dim = origin.dimension().min(target.dimension());
        let mut ctrlp = buffer::with_capacity(origin.num_control_points() * dim)?;
        for (p, q) in origin.control_point_iter().zip(target.control_point_iter()) {
            ctrlp.extend(p[..dim].iter().zip(&q[..dim]).map(|(p, q)| t_hat * p + t * q));
        }
        let mut knots = buffer::with_capacity(origin.num_knots())?;
        knots.extend(
            origin
                .knots()
                .iter()
                .zip(target.knots())
                .map(|(a, b)| t_hat * a + t * b),
        );

        BSpline::from_parts(origin.degree(), dim, ctrlp, knots)
    }

    /// Insert `missing` knots spread evenly over the domain, one at a time.
    fn insert_spread(&self, missing: usize) -> Result<BSpline> {
        let tol = Tolerance::default();
        let (min, max) = self.domain();
        let shift = 0.5 * (max - min) / missing as f64;
        // a knot that can take one more insertion without splitting the curve
        let full = self.degree().max(1);

        let mut out = self.clone();
        for i in 0..missing {
            let mut u = min + (max - min) * (i as f64 / missing as f64) + shift;
            let mut net = out.eval(u)?;
            while net.multiplicity() >= full {
                u += 5.0 * tol.knot;
                if u > max {
                    return Err(SplineError::NoResult("no more knots for insertion".into()));
                }
                net = out.eval(u)?;
            }
            out = out.insert_with_net(&net, 1)?;
        }
        Ok(out)
    }
}
