//! De Boor algorithm for B-spline evaluation.

use bsp_core::{buffer, Result, SplineError, Tolerance};
use bsp_math::nd;
use log::{error, trace};
use serde::Serialize;

use super::knot::{find_knot, uniform_sequence};
use crate::spline::BSpline;

/// Result of evaluating a spline at one parameter.
///
/// Keeps every intermediate point of de Boor's triangular scheme, row by
/// row: row 0 holds the `num_affected` control points, row `r` the
/// `num_affected - r` points blended in round `r`. Knot insertion reads the
/// outer edges of this triangle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeBoorNet {
    u: f64,
    k: usize,
    s: usize,
    h: usize,
    dimension: usize,
    n_affected: usize,
    points: Vec<f64>,
}

impl DeBoorNet {
    /// The evaluated parameter (snapped to a knot when it coincides with one).
    pub fn knot(&self) -> f64 {
        self.u
    }

    /// Index of the knot span containing the parameter.
    pub fn index(&self) -> usize {
        self.k
    }

    pub fn multiplicity(&self) -> usize {
        self.s
    }

    /// Number of blending rounds performed.
    pub fn num_insertions(&self) -> usize {
        self.h
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of control points taking part in the evaluation.
    pub fn num_affected(&self) -> usize {
        self.n_affected
    }

    pub fn num_points(&self) -> usize {
        self.points.len() / self.dimension
    }

    /// Index of the last point in the net.
    pub fn last_idx(&self) -> usize {
        self.num_points() - 1
    }

    /// All points of the net, flattened.
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Points of row `r` of the triangle, flattened.
    ///
    /// # Panics
    ///
    /// Panics if `r >= num_affected()`.
    pub fn row(&self, r: usize) -> &[f64] {
        let n = self.n_affected;
        assert!(r < n, "row {r} out of range for a net over {n} points");
        // rows 0..r hold n + (n - 1) + ... + (n - r + 1) points
        let start = r * n - r * r.saturating_sub(1) / 2;
        let dim = self.dimension;
        &self.points[start * dim..(start + n - r) * dim]
    }

    /// Point `col` of row `r`.
    ///
    /// # Panics
    ///
    /// Panics if `r >= num_affected()` or `col >= num_affected() - r`.
    pub fn point(&self, r: usize, col: usize) -> &[f64] {
        let len = self.n_affected.saturating_sub(r);
        assert!(col < len, "column {col} out of range for row {r} of {len} points");
        let dim = self.dimension;
        &self.row(r)[col * dim..(col + 1) * dim]
    }

    /// The evaluated point. At a discontinuity (an interior knot of
    /// multiplicity `order`) the net holds two points, the end of the left
    /// and the start of the right piece, and both are returned.
    pub fn result(&self) -> &[f64] {
        if self.num_points() == 2 {
            &self.points
        } else {
            &self.points[self.points.len() - self.dimension..]
        }
    }

    /// The first point of [`Self::result`].
    pub fn result_point(&self) -> &[f64] {
        &self.result()[..self.dimension]
    }
}

impl BSpline {
    /// Evaluate the spline at `u` with de Boor's algorithm.
    ///
    /// `u` must lie in [`BSpline::domain`]; values within the knot tolerance
    /// of a bound are snapped onto it.
    pub fn eval(&self, u: f64) -> Result<DeBoorNet> {
        let deg = self.degree();
        let order = self.order();
        let dim = self.dimension();
        let knots = self.knots();
        let ctrlp = self.control_points();

        let loc = find_knot(deg, knots, u, Tolerance::default())?;
        let (u, k, s) = (loc.u, loc.index, loc.multiplicity);
        trace!("eval u={u} k={k} s={s}");

        if s == order {
            // The curve touches its control polygon: no blending needed.
            let (from, count) = if k == deg {
                (0, 1)
            } else if k == knots.len() - 1 {
                (k - s, 1)
            } else {
                (k - s, 2)
            };
            let points = buffer::copied(&ctrlp[from * dim..(from + count) * dim])?;
            return Ok(DeBoorNet {
                u,
                k,
                s,
                h: 0,
                dimension: dim,
                n_affected: count,
                points,
            });
        }

        // s <= deg from here on
        let h = deg - s;
        let fst = k.checked_sub(deg).ok_or_else(|| {
            error!("knot index {k} below degree {deg}");
            SplineError::DegenerateKnotSpan {
                index: k,
                left: knots[k],
                right: knots[k],
            }
        })?;
        let lst = k - s;
        let n = lst - fst + 1;

        let mut points = buffer::zeroed(n * (n + 1) / 2 * dim)?;
        points[..n * dim].copy_from_slice(&ctrlp[fst * dim..(lst + 1) * dim]);

        let mut prev = 0; // first point of row r - 1
        let mut to = n; // first point of row r
        for r in 1..=h {
            for c in 0..n - r {
                let i = fst + r + c;
                let left = knots[i];
                let right = knots[i + deg - r + 1];
                let span = right - left;
                if !(span > 0.0) {
                    error!("zero knot span [{left}, {right}] at index {i} while evaluating u={u}");
                    return Err(SplineError::DegenerateKnotSpan { index: i, left, right });
                }
                let a = (u - left) / span;

                let (head, tail) = points.split_at_mut((to + c) * dim);
                let lhs = &head[(prev + c) * dim..(prev + c + 1) * dim];
                let rhs = &head[(prev + c + 1) * dim..(prev + c + 2) * dim];
                nd::lerp(lhs, rhs, a, &mut tail[..dim]);
            }
            prev = to;
            to += n - r;
        }

        Ok(DeBoorNet {
            u,
            k,
            s,
            h,
            dimension: dim,
            n_affected: n,
            points,
        })
    }

    /// Evaluate the spline at every parameter in `params` and return the
    /// resulting points, flattened.
    ///
    /// With the `rayon` feature the evaluations run in parallel, each with
    /// its own net.
    pub fn eval_all(&self, params: &[f64]) -> Result<Vec<f64>> {
        let dim = self.dimension();

        #[cfg(feature = "rayon")]
        let rows: Vec<DeBoorNet> = {
            use rayon::prelude::*;
            params
                .par_iter()
                .map(|&u| self.eval(u))
                .collect::<Result<_>>()?
        };
        #[cfg(not(feature = "rayon"))]
        let rows: Vec<DeBoorNet> = params
            .iter()
            .map(|&u| self.eval(u))
            .collect::<Result<_>>()?;

        let mut out = buffer::with_capacity(params.len() * dim)?;
        for net in &rows {
            out.extend_from_slice(net.result_point());
        }
        Ok(out)
    }

    /// `num` parameters evenly spaced over the domain.
    pub fn uniform_knot_seq(&self, num: usize) -> Vec<f64> {
        let (min, max) = self.domain();
        uniform_sequence(min, max, num)
    }

    /// Evaluate `num` evenly spaced points (100 if `num` is 0).
    pub fn sample(&self, num: usize) -> Result<Vec<f64>> {
        let num = if num == 0 { 100 } else { num };
        self.eval_all(&self.uniform_knot_seq(num))
    }
}
