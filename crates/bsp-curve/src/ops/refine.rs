//! Knot insertion and splitting into Bezier segments.

use bsp_core::{buffer, Result, SplineError, Tolerance};
use log::debug;

use crate::eval::DeBoorNet;
use crate::spline::BSpline;

impl BSpline {
    /// Insert `u` into the knot vector `n` times without changing the shape
    /// of the curve.
    ///
    /// Returns the refined spline and the index of the last occurrence of
    /// `u` in its knot vector.
    pub fn insert_knot(&self, u: f64, n: usize) -> Result<(BSpline, usize)> {
        let net = self.eval(u)?;
        let refined = self.insert_with_net(&net, n)?;
        let index = refined.eval(net.knot())?.index();
        Ok((refined, index))
    }

    /// Raise the multiplicity of `u` to `order`, so that the curve breaks
    /// into two independent pieces at `u`.
    ///
    /// Returns the split spline and the index of the last occurrence of `u`
    /// in its knot vector.
    pub fn split_at(&self, u: f64) -> Result<(BSpline, usize)> {
        let net = self.eval(u)?;
        if net.multiplicity() == self.order() {
            return Ok((self.clone(), net.index()));
        }
        let n = net.num_insertions() + 1;
        let split = self.insert_with_net(&net, n)?;
        Ok((split, net.index() + n))
    }

    /// Convert to a sequence of connected Bezier curves.
    ///
    /// Parts of the control polygon outside of the domain are trimmed first,
    /// then every interior knot is raised to full multiplicity. The result
    /// has a multiple of `order` control points and traces the same curve.
    pub fn to_beziers(&self) -> Result<BSpline> {
        let deg = self.degree();
        let order = self.order();
        let mut tmp = self.clone();

        let u_min = tmp.knots()[deg];
        if !tmp.knots_equal_at(0, u_min) {
            let (split, k) = tmp.split_at(u_min)?;
            tmp = split.trim_front(k - deg)?;
        }

        let u_max = tmp.knots()[tmp.num_knots() - order];
        if !tmp.knots_equal_at(tmp.num_knots() - 1, u_max) {
            let (split, k) = tmp.split_at(u_max)?;
            let remove = split.num_knots() - 1 - k;
            tmp = split.trim_back(remove)?;
        }

        let mut k = order;
        while k < tmp.num_knots() - order {
            let (split, last) = tmp.split_at(tmp.knots()[k])?;
            tmp = split;
            k = last + 1;
        }

        debug!(
            "converted spline with {} control points to {} Bezier segments",
            self.num_control_points(),
            tmp.num_control_points() / order
        );
        Ok(tmp)
    }

    /// Split into independent Bezier curves, one per segment.
    ///
    /// Each segment keeps the parameter span it had in this spline, so
    /// evaluating a segment at `u` gives the same point as evaluating the
    /// whole curve at `u`.
    pub fn split(&self) -> Result<Vec<BSpline>> {
        let beziers = self.to_beziers()?;
        let order = beziers.order();
        let dim = beziers.dimension();
        let num_segments = beziers.num_control_points() / order;

        let mut segments = Vec::new();
        segments
            .try_reserve_exact(num_segments)
            .map_err(|_| SplineError::Allocation {
                requested: num_segments,
            })?;
        for (i, ctrlp) in beziers.control_points().chunks_exact(order * dim).enumerate() {
            let a = beziers.knots()[i * order];
            let b = beziers.knots()[(i + 1) * order];
            let mut knots = buffer::filled(2 * order, a)?;
            knots[order..].fill(b);
            segments.push(BSpline::from_raw(
                beziers.degree(),
                dim,
                buffer::copied(ctrlp)?,
                knots,
            ));
        }
        debug!("split spline into {num_segments} segments");
        Ok(segments)
    }

    /// The part of the curve between `u0` and `u1`, over the domain
    /// `[min(u0, u1), max(u0, u1)]`.
    ///
    /// If `u0 > u1` the result runs backwards: at parameter `u` it is at the
    /// point this spline reaches at `u0 + u1 - u`.
    pub fn sub_spline(&self, u0: f64, u1: f64) -> Result<BSpline> {
        let tol = Tolerance::default();
        if tol.knots_equal(u0, u1) {
            return Err(SplineError::NoResult(format!("empty domain [{u0}, {u1}]")));
        }
        let reverse = u0 > u1;
        let (lo, hi) = if reverse { (u1, u0) } else { (u0, u1) };
        let (min, max) = self.domain();
        let deg = self.degree();
        let dim = self.dimension();

        let mut worker = self.clone();
        let mut k0 = deg;
        if !tol.knots_equal(lo, min) {
            let (split, k) = worker.split_at(lo)?;
            worker = split;
            k0 = k;
        }
        let k1 = if tol.knots_equal(hi, max) {
            worker.num_knots() - 1
        } else {
            let (split, k) = worker.split_at(hi)?;
            worker = split;
            k
        };

        // knots k0 - deg..=k1 and the control points between them
        let first = k0 - deg;
        let num_control_points = k1 - k0;
        let num_knots = num_control_points + self.order();
        let mut ctrlp = buffer::copied(
            &worker.control_points()[first * dim..(first + num_control_points) * dim],
        )?;
        let mut knots = buffer::copied(&worker.knots()[first..first + num_knots])?;

        if reverse {
            let (a, b) = (knots[deg], knots[num_knots - 1 - deg]);
            for (i, j) in (0..num_control_points / 2).map(|i| (i, num_control_points - 1 - i)) {
                for d in 0..dim {
                    ctrlp.swap(i * dim + d, j * dim + d);
                }
            }
            knots.reverse();
            for k in &mut knots {
                *k = if *k == a {
                    b
                } else if *k == b {
                    a
                } else {
                    a + b - *k
                };
            }
        }

        debug!("extracted sub spline over [{lo}, {hi}] (reversed: {reverse})");
        Ok(BSpline::from_raw(deg, dim, ctrlp, knots))
    }

    /// Insert `net.knot()` `n` times, reading the new control points off the
    /// edges of the de Boor net.
    pub(crate) fn insert_with_net(&self, net: &DeBoorNet, n: usize) -> Result<BSpline> {
        if n == 0 {
            return Ok(self.clone());
        }
        let deg = self.degree();
        let order = self.order();
        let dim = self.dimension();
        let (u, k, s) = (net.knot(), net.index(), net.multiplicity());
        if s + n > order {
            return Err(SplineError::Multiplicity {
                knot: u,
                multiplicity: s + n,
                order,
            });
        }

        // s + n <= order with n >= 1, so s <= degree and the net is a full
        // triangle over N = order - s points.
        let num_affected = net.num_affected();
        let fst = k - deg;
        let ctrlp = self.control_points();

        let mut out = buffer::with_capacity(ctrlp.len() + n * dim)?;
        out.extend_from_slice(&ctrlp[..fst * dim]);
        for r in 0..n {
            out.extend_from_slice(net.point(r, 0));
        }
        if num_affected > n {
            out.extend_from_slice(net.row(n));
        }
        for r in (0..n).rev() {
            out.extend_from_slice(net.point(r, num_affected - 1 - r));
        }
        out.extend_from_slice(&ctrlp[(fst + num_affected) * dim..]);

        let mut knots = buffer::with_capacity(self.num_knots() + n)?;
        knots.extend_from_slice(&self.knots()[..=k]);
        knots.extend(std::iter::repeat(u).take(n));
        knots.extend_from_slice(&self.knots()[k + 1..]);

        debug!("inserted knot {u} {n} times at index {k}");
        Ok(BSpline::from_raw(deg, dim, out, knots))
    }

    fn knots_equal_at(&self, index: usize, u: f64) -> bool {
        Tolerance::default().knots_equal(self.knots()[index], u)
    }

    /// Drop the first `n` control points and knots.
    fn trim_front(&self, n: usize) -> Result<BSpline> {
        let dim = self.dimension();
        Ok(BSpline::from_raw(
            self.degree(),
            dim,
            buffer::copied(&self.control_points()[n * dim..])?,
            buffer::copied(&self.knots()[n..])?,
        ))
    }

    /// Drop the last `n` control points and knots.
    fn trim_back(&self, n: usize) -> Result<BSpline> {
        let dim = self.dimension();
        let ctrlp = self.control_points();
        Ok(BSpline::from_raw(
            self.degree(),
            dim,
            buffer::copied(&ctrlp[..ctrlp.len() - n * dim])?,
            buffer::copied(&self.knots()[..self.num_knots() - n])?,
        ))
    }
}
