use bsp_core::{Result, SplineError};

use crate::spline::BSpline;

impl BSpline {
    /// Move every control point towards the straight line from the first to
    /// the last control point.
    ///
    /// `b = 0` keeps the curve, `b = 1` collapses the control polygon onto
    /// the line. The knot vector is left unchanged.
    pub fn buckle(&self, b: f64) -> Result<BSpline> {
        let mut out = self.clone();
        out.buckle_in_place(b)?;
        Ok(out)
    }

    /// In-place variant of [`BSpline::buckle`].
    pub fn buckle_in_place(&mut self, b: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&b) {
            return Err(SplineError::InvalidFactor(b));
        }
        let dim = self.dimension();
        let n = self.num_control_points();
        let ctrlp = self.control_points_mut();
        let last = (n - 1) * dim;

        for i in 0..n {
            // n >= 2 for splines of degree >= 1; a single point stays put
            let t = if n > 1 {
                i as f64 / (n - 1) as f64
            } else {
                0.0
            };
            for d in 0..dim {
                let line = ctrlp[d] + t * (ctrlp[last + d] - ctrlp[d]);
                let p = &mut ctrlp[i * dim + d];
                *p = (1.0 - b) * *p + b * line;
            }
        }
        Ok(())
    }
}
