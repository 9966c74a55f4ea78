use bsp_core::{buffer, Result, SplineError, Tolerance};
use bsp_math::nd;
use log::debug;

use crate::spline::BSpline;

impl BSpline {
    /// First derivative. Fails with [`SplineError::Underivable`] if the
    /// curve has a gap wider than the point tolerance.
    pub fn derive(&self) -> Result<BSpline> {
        self.derive_n(1, Some(Tolerance::default().point))
    }

    /// The `n`-th derivative.
    ///
    /// Interior knots of multiplicity `order` split the curve into separate
    /// pieces. Such a knot is removed before deriving if the pieces meet,
    /// i.e. the control points on either side of it are at most `epsilon`
    /// apart. With `epsilon == None` they are merged regardless.
    ///
    /// Deriving a degree 0 spline yields a single zero control point over the
    /// same domain.
    pub fn derive_n(&self, n: usize, epsilon: Option<f64>) -> Result<BSpline> {
        let tol = Tolerance::default();
        let dim = self.dimension();
        let mut deg = self.degree();
        let mut ctrlp = buffer::copied(self.control_points())?;
        let mut knots = buffer::copied(self.knots())?;

        for _ in 0..n {
            if deg == 0 {
                let (min, max) = self.domain();
                debug!("derivative of degree 0 spline is zero");
                return Ok(BSpline::from_raw(0, dim, buffer::zeroed(dim)?, vec![min, max]));
            }

            // Merge pieces that meet at a knot of full multiplicity.
            let mut i = 2 * deg + 1;
            while i + deg + 1 < knots.len() {
                if tol.knots_equal(knots[i], knots[i - deg]) {
                    let fst = i - deg - 1;
                    let dist = nd::distance(
                        &ctrlp[fst * dim..(fst + 1) * dim],
                        &ctrlp[(fst + 1) * dim..(fst + 2) * dim],
                    );
                    if epsilon.is_some_and(|eps| dist > eps) {
                        return Err(SplineError::Underivable { knot: knots[i] });
                    }
                    ctrlp.drain((fst + 1) * dim..(fst + 2) * dim);
                    knots.remove(i);
                    i += deg - 1;
                }
                i += 1;
            }

            let num_ctrlp = ctrlp.len() / dim;
            for i in 0..num_ctrlp - 1 {
                let span = (knots[i + deg + 1] - knots[i + 1]).max(tol.knot);
                let fac = deg as f64 / span;
                for j in 0..dim {
                    let k = i * dim + j;
                    ctrlp[k] = (ctrlp[k + dim] - ctrlp[k]) * fac;
                }
            }
            ctrlp.truncate((num_ctrlp - 1) * dim);
            knots.pop();
            knots.remove(0);
            deg -= 1;
        }

        debug!(
            "derived spline: degree {deg}, {} control points",
            ctrlp.len() / dim
        );
        Ok(BSpline::from_raw(deg, dim, ctrlp, knots))
    }

    /// Whether the curve and its first `degree - 1` derivatives have equal
    /// values (within `epsilon`) at both ends of the domain.
    pub fn is_closed(&self, epsilon: f64) -> Result<bool> {
        for i in 0..self.degree().max(1) {
            let derivative = self.derive_n(i, None)?;
            let (min, max) = derivative.domain();
            let first = derivative.eval(min)?;
            let last = derivative.eval(max)?;
            if nd::distance(first.result_point(), last.result_point()) > epsilon {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
