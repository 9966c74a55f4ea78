//! Knot vector utilities: generation, validation, and span lookup.

use bsp_core::{buffer, Result, SplineError, Tolerance, DOMAIN_DEFAULT_MAX, DOMAIN_DEFAULT_MIN};
use serde::{Deserialize, Serialize};

use crate::spline::KnotType;

/// Where a parameter sits in a knot vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnotLocation {
    /// The parameter, snapped to an existing knot if it lies within the knot
    /// tolerance of one.
    pub u: f64,
    /// Largest index `k` with `knots[k] <= u`.
    pub index: usize,
    /// Number of knots equal to `u`, at most `order`. Zero if `u` is not a knot.
    pub multiplicity: usize,
}

/// Generate a knot vector of `num_knots` values over the default domain.
pub fn generate(degree: usize, num_knots: usize, knot_type: KnotType) -> Result<Vec<f64>> {
    let order = degree + 1;
    let (min, max) = (DOMAIN_DEFAULT_MIN, DOMAIN_DEFAULT_MAX);
    let mut knots = buffer::zeroed(num_knots)?;

    match knot_type {
        KnotType::Opened => {
            let fac = (max - min) / (num_knots - 1) as f64;
            for (i, k) in knots.iter_mut().enumerate() {
                *k = min + i as f64 * fac;
            }
            knots[num_knots - 1] = max;
        }
        KnotType::Clamped => {
            // num_knots >= 2 * order, so the divisor is at least 1
            let fac = (max - min) / (num_knots - 2 * degree - 1) as f64;
            knots[..order].fill(min);
            for i in order..num_knots - order {
                knots[i] = min + (i - degree) as f64 * fac;
            }
            knots[num_knots - order..].fill(max);
        }
        KnotType::Beziers => {
            if num_knots % order != 0 {
                return Err(SplineError::KnotCount {
                    expected: num_knots.div_ceil(order) * order,
                    actual: num_knots,
                });
            }
            let groups = num_knots / order;
            let fac = (max - min) / (groups - 1) as f64;
            for (g, chunk) in knots.chunks_exact_mut(order).enumerate() {
                chunk.fill(min + g as f64 * fac);
            }
            knots[num_knots - order..].fill(max);
        }
    }
    Ok(knots)
}

/// Check that `knots` is finite, non-decreasing, and that no value occurs
/// more than `order` times.
pub fn check(knots: &[f64], order: usize, tol: Tolerance) -> Result<()> {
    if let Some(index) = knots.iter().position(|k| !k.is_finite()) {
        return Err(SplineError::DegenerateInput(format!(
            "non-finite knot at index {index}"
        )));
    }
    let Some(&first) = knots.first() else {
        return Ok(());
    };

    let mut last = first;
    let mut multiplicity = 1;
    for (index, &knot) in knots.iter().enumerate().skip(1) {
        if last > knot {
            return Err(SplineError::KnotsDecreasing { index });
        } else if tol.knots_equal(last, knot) {
            multiplicity += 1;
        } else {
            multiplicity = 1;
        }
        if multiplicity > order {
            return Err(SplineError::Multiplicity {
                knot,
                multiplicity,
                order,
            });
        }
        last = knot;
    }
    Ok(())
}

/// Locate `u` in the knot vector of a spline of the given degree.
///
/// Parameters within the knot tolerance of a domain bound are snapped onto
/// the bound; anything further out fails with
/// [`SplineError::ParameterOutOfDomain`].
pub fn find_knot(degree: usize, knots: &[f64], u: f64, tol: Tolerance) -> Result<KnotLocation> {
    let order = degree + 1;
    let num_knots = knots.len();
    let (min, max) = (knots[degree], knots[num_knots - order]);
    let out_of_domain = SplineError::ParameterOutOfDomain { u, min, max };

    if !u.is_finite() {
        return Err(out_of_domain);
    }
    let mut u = u;
    if u < min {
        if !tol.knots_equal(u, min) {
            return Err(out_of_domain);
        }
        u = min;
    } else if u > max {
        if !tol.knots_equal(u, max) {
            return Err(out_of_domain);
        }
        u = max;
    }

    // Based on 'The NURBS Book' (Piegl and Tiller), with a binary search
    // over the whole knot vector.
    let mut index = if tol.knots_equal(u, knots[num_knots - 1]) {
        num_knots - 1
    } else {
        knots.partition_point(|&k| k <= u).saturating_sub(1)
    };

    // Floating point errors
    while index + 1 < num_knots && tol.knots_equal(u, knots[index + 1]) {
        index += 1;
    }
    if tol.knots_equal(u, knots[index]) {
        u = knots[index];
    }

    let multiplicity = (1..=order)
        .rev()
        .find(|&m| index + 1 >= m && tol.knots_equal(u, knots[index + 1 - m]))
        .unwrap_or(0);

    Ok(KnotLocation {
        u,
        index,
        multiplicity,
    })
}

/// `num` parameters evenly spaced over `[min, max]`. The first value is
/// always `min` and, if `num > 1`, the last is always `max`.
pub fn uniform_sequence(min: f64, max: f64, num: usize) -> Vec<f64> {
    let mut seq: Vec<f64> = (0..num)
        .map(|i| min + (max - min) * (i as f64 / (num.max(2) - 1) as f64))
        .collect();
    if let Some(last) = seq.last_mut() {
        *last = max;
    }
    if let Some(first) = seq.first_mut() {
        *first = min;
    }
    seq
}
