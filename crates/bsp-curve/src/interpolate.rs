//! Cubic spline interpolation through data points.
//!
//! Every variant parametrizes the data uniformly, point `i` of `n` being hit
//! at `u = i / (n - 1)`, and returns the interpolant as a sequence of cubic
//! Bezier segments (knot type [`KnotType::Beziers`]).

use bsp_core::{buffer, Result, SplineError, Tolerance};
use bsp_math::nd;
use log::debug;

use crate::spline::{BSpline, KnotType};

/// Interpolate `points` (flattened, `dimension` values each) with a cubic
/// spline whose second derivative vanishes at both ends.
pub fn interpolate_cubic_natural(points: &[f64], dimension: usize) -> Result<BSpline> {
    let n = check_points(points, dimension)?;
    let dim = dimension;

    // S_0 = P_0 and S_{n-1} = P_{n-1}, the rest solve
    // S_{i-1} + 4 S_i + S_{i+1} = 6 P_i.
    let mut deboor = buffer::copied(points)?;
    let m = n - 2;
    if m > 0 {
        let a = buffer::filled(m, 1.0)?;
        let b = buffer::filled(m, 4.0)?;
        let c = buffer::filled(m, 1.0)?;
        let mut d = buffer::with_capacity(m * dim)?;
        d.extend(points[dim..(n - 1) * dim].iter().map(|p| 6.0 * p));
        for j in 0..dim {
            d[j] -= points[j];
            d[(m - 1) * dim + j] -= points[(n - 1) * dim + j];
        }
        thomas(&a, &b, &c, dim, &mut d)?;
        deboor[dim..(n - 1) * dim].copy_from_slice(&d);
    }

    let spline = to_beziers(points, &deboor, dim)?;
    debug!("natural cubic interpolation through {n} points");
    Ok(spline)
}

/// Interpolate `points` with a cubic spline whose end tangents follow the
/// first and last chord of the data.
pub fn interpolate_cubic_clamped(points: &[f64], dimension: usize) -> Result<BSpline> {
    let n = check_points(points, dimension)?;
    let dim = dimension;

    let mut a = buffer::filled(n, 1.0)?;
    let b = buffer::filled(n, 4.0)?;
    let mut c = buffer::filled(n, 1.0)?;
    c[0] = 2.0;
    a[n - 1] = 2.0;

    let mut d = buffer::with_capacity(n * dim)?;
    d.extend(points.iter().map(|p| 6.0 * p));
    let (first, last) = (0, (n - 1) * dim);
    for j in 0..dim {
        let t0 = points[dim + j] - points[j];
        let t1 = points[last + j] - points[last - dim + j];
        d[first + j] += 2.0 * t0;
        d[last + j] -= 2.0 * t1;
    }
    thomas(&a, &b, &c, dim, &mut d)?;

    let spline = to_beziers(points, &d, dim)?;
    debug!("clamped cubic interpolation through {n} points");
    Ok(spline)
}

/// Interpolate `points` with Catmull-Rom segments.
///
/// `alpha` selects the knot parametrization inside each segment: 0 is
/// uniform, 0.5 centripetal and 1 chordal. `first` and `last` are the
/// guide points before the first and after the last data point. A missing
/// guide point, or one at most `epsilon` away from its data point, is
/// mirrored from the two outermost data points instead. Consecutive data
/// points at most `epsilon` apart are merged; if a single point remains, the
/// result is a cubic with four copies of it.
pub fn interpolate_catmull_rom(
    points: &[f64],
    dimension: usize,
    alpha: f64,
    first: Option<&[f64]>,
    last: Option<&[f64]>,
    epsilon: f64,
) -> Result<BSpline> {
    let dim = dimension;
    if dim == 0 {
        return Err(SplineError::InvalidDimension);
    }
    if points.len() % dim != 0 {
        return Err(SplineError::DimensionMismatch {
            expected: points.len() / dim * dim,
            actual: points.len(),
        });
    }
    if points.is_empty() {
        return Err(SplineError::InsufficientPoints {
            given: 0,
            required: 1,
        });
    }
    if !(0.0..=1.0).contains(&alpha) {
        return Err(SplineError::InvalidFactor(alpha));
    }
    for guide in [first, last].into_iter().flatten() {
        if guide.len() != dim {
            return Err(SplineError::DimensionMismatch {
                expected: dim,
                actual: guide.len(),
            });
        }
    }
    let values = points.iter().chain(first.into_iter().flatten());
    if values.chain(last.into_iter().flatten()).any(|v| !v.is_finite()) {
        return Err(SplineError::DegenerateInput(
            "non-finite interpolation point".into(),
        ));
    }
    let eps = epsilon.abs();

    // guide point, merged data points, guide point
    let mut cr = buffer::with_capacity(points.len() + 2 * dim)?;
    cr.extend_from_slice(&points[..dim]);
    cr.extend_from_slice(&points[..dim]);
    for p in points.chunks_exact(dim).skip(1) {
        if nd::distance(&cr[cr.len() - dim..], p) > eps {
            cr.extend_from_slice(p);
        }
    }
    let n = cr.len() / dim - 1;
    if n == 1 {
        let mut spline = BSpline::new(4, dim, 3, KnotType::Clamped)?;
        for chunk in spline.control_points_mut().chunks_exact_mut(dim) {
            chunk.copy_from_slice(&points[..dim]);
        }
        return Ok(spline);
    }

    let (p0, p1) = (dim, 2 * dim);
    match first {
        Some(f) if nd::distance(f, &cr[p0..p1]) > eps => cr[..dim].copy_from_slice(f),
        _ => {
            for d in 0..dim {
                cr[d] = 2.0 * cr[p0 + d] - cr[p1 + d];
            }
        }
    }
    let (q0, q1) = ((n - 1) * dim, n * dim);
    match last {
        Some(l) if nd::distance(&cr[q1..], l) > eps => cr.extend_from_slice(l),
        _ => {
            for d in 0..dim {
                cr.push(2.0 * cr[q1 + d] - cr[q0 + d]);
            }
        }
    }

    let mut spline = BSpline::new((n - 1) * 4, dim, 3, KnotType::Beziers)?;
    let ctrlp = spline.control_points_mut();
    for (i, seg) in ctrlp.chunks_exact_mut(4 * dim).enumerate() {
        let p = |j: usize| &cr[(i + j) * dim..(i + j + 1) * dim];
        let t1 = nd::distance(p(0), p(1)).powf(alpha);
        let t2 = t1 + nd::distance(p(1), p(2)).powf(alpha);
        let t3 = t2 + nd::distance(p(2), p(3)).powf(alpha);

        let c1 = (t2 - t1) / t2;
        let c2 = t1 / t2;
        let d1 = (t3 - t2) / (t3 - t1);
        let d2 = (t2 - t1) / (t3 - t1);
        for d in 0..dim {
            let (a, b, c, e) = (p(0)[d], p(1)[d], p(2)[d], p(3)[d]);
            let m1 = (t2 - t1) * (c1 * (b - a) / t1 + c2 * (c - b) / (t2 - t1));
            let m2 = (t2 - t1) * (d1 * (c - b) / (t2 - t1) + d2 * (e - c) / (t3 - t2));
            seg[d] = b;
            seg[dim + d] = b + m1 / 3.0;
            seg[2 * dim + d] = c - m2 / 3.0;
            seg[3 * dim + d] = c;
        }
    }
    debug!("Catmull-Rom interpolation through {n} points (alpha {alpha})");
    Ok(spline)
}

/// Validate the input and return the number of points.
fn check_points(points: &[f64], dim: usize) -> Result<usize> {
    if dim == 0 {
        return Err(SplineError::InvalidDimension);
    }
    if points.len() % dim != 0 {
        return Err(SplineError::DimensionMismatch {
            expected: points.len() / dim * dim,
            actual: points.len(),
        });
    }
    let n = points.len() / dim;
    if n < 2 {
        return Err(SplineError::InsufficientPoints {
            given: n,
            required: 2,
        });
    }
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(SplineError::DegenerateInput(format!(
            "non-finite value at index {index}"
        )));
    }
    let tol = Tolerance::default();
    let mut pairs = points.chunks_exact(dim).zip(points.chunks_exact(dim).skip(1));
    if let Some(i) = pairs.position(|(p, q)| tol.points_equal(nd::distance(p, q))) {
        return Err(SplineError::DegenerateInput(format!(
            "points {i} and {} coincide",
            i + 1
        )));
    }
    Ok(n)
}

/// Solve the tridiagonal system `a_i x_{i-1} + b_i x_i + c_i x_{i+1} = d_i`
/// for `dim` right-hand sides at once, overwriting `d` with the solution.
///
/// `a[0]` and `c[m - 1]` are ignored. The system must be strictly diagonally
/// dominant.
fn thomas(a: &[f64], b: &[f64], c: &[f64], dim: usize, d: &mut [f64]) -> Result<()> {
    let m = b.len();
    debug_assert!(a.len() == m && c.len() == m && d.len() == m * dim);
    for i in 0..m {
        let lower = if i > 0 { a[i].abs() } else { 0.0 };
        let upper = if i + 1 < m { c[i].abs() } else { 0.0 };
        if !(b[i].abs() > lower + upper) {
            return Err(SplineError::NoResult(format!(
                "tridiagonal system is not diagonally dominant in row {i}"
            )));
        }
    }

    let mut cc = buffer::zeroed(m)?;
    cc[0] = if m > 1 { c[0] / b[0] } else { 0.0 };
    for j in 0..dim {
        d[j] /= b[0];
    }
    for i in 1..m {
        let denom = b[i] - a[i] * cc[i - 1];
        if i + 1 < m {
            cc[i] = c[i] / denom;
        }
        for j in 0..dim {
            d[i * dim + j] = (d[i * dim + j] - a[i] * d[(i - 1) * dim + j]) / denom;
        }
    }
    for i in (0..m - 1).rev() {
        for j in 0..dim {
            d[i * dim + j] -= cc[i] * d[(i + 1) * dim + j];
        }
    }
    Ok(())
}

/// Build the Bezier segments between consecutive data points from the de
/// Boor points of the interpolant.
fn to_beziers(points: &[f64], deboor: &[f64], dim: usize) -> Result<BSpline> {
    let n = points.len() / dim;
    let mut spline = BSpline::new((n - 1) * 4, dim, 3, KnotType::Beziers)?;
    let ctrlp = spline.control_points_mut();
    for i in 0..n - 1 {
        let seg = &mut ctrlp[i * 4 * dim..(i + 1) * 4 * dim];
        for j in 0..dim {
            let (s0, s1) = (deboor[i * dim + j], deboor[(i + 1) * dim + j]);
            seg[j] = points[i * dim + j];
            seg[dim + j] = (2.0 * s0 + s1) / 3.0;
            seg[2 * dim + j] = (s0 + 2.0 * s1) / 3.0;
            seg[3 * dim + j] = points[(i + 1) * dim + j];
        }
    }
    Ok(spline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const POINTS: [f64; 10] = [1.0, -1.0, -1.0, 2.0, 1.0, 4.0, 4.0, 3.0, 7.0, 5.0];

    fn assert_points_eq(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert_abs_diff_eq!(a, e, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_natural_control_points() {
        let spline = interpolate_cubic_natural(&POINTS, 2).unwrap();
        assert_eq!(spline.degree(), 3);
        assert_eq!(spline.num_control_points(), 16);
        assert_points_eq(
            &spline.control_points()[..8],
            &[1.0, -1.0, 0.0, 0.0, -1.0, 1.0, -1.0, 2.0],
        );
        assert_points_eq(
            &spline.control_points()[8..16],
            &[-1.0, 2.0, -1.0, 3.0, 0.0, 4.0, 1.0, 4.0],
        );
    }

    #[test]
    fn test_natural_hits_data_points() {
        let spline = interpolate_cubic_natural(&POINTS, 2).unwrap();
        for (i, p) in POINTS.chunks_exact(2).enumerate() {
            let net = spline.eval(i as f64 / 4.0).unwrap();
            assert_points_eq(net.result_point(), p);
        }
    }

    #[test]
    fn test_natural_is_c2() {
        let spline = interpolate_cubic_natural(&POINTS, 2).unwrap();
        let d2 = spline.derive_n(2, Some(1e-9)).unwrap();
        // vanishing second derivative at both ends
        assert_points_eq(d2.eval(0.0).unwrap().result_point(), &[0.0, 0.0]);
        assert_points_eq(d2.eval(1.0).unwrap().result_point(), &[0.0, 0.0]);
    }

    #[test]
    fn test_clamped_end_tangents() {
        let spline = interpolate_cubic_clamped(&POINTS, 2).unwrap();
        for (i, p) in POINTS.chunks_exact(2).enumerate() {
            let net = spline.eval(i as f64 / 4.0).unwrap();
            assert_points_eq(net.result_point(), p);
        }
        let d = spline.derive().unwrap();
        // chord per segment times four segments per unit parameter
        assert_points_eq(d.eval(0.0).unwrap().result_point(), &[-8.0, 12.0]);
        assert_points_eq(d.eval(1.0).unwrap().result_point(), &[12.0, 8.0]);
    }

    #[test]
    fn test_two_points_make_a_line() {
        for spline in [
            interpolate_cubic_natural(&[0.0, 0.0, 3.0, 6.0], 2).unwrap(),
            interpolate_cubic_clamped(&[0.0, 0.0, 3.0, 6.0], 2).unwrap(),
        ] {
            assert_points_eq(
                spline.control_points(),
                &[0.0, 0.0, 1.0, 2.0, 2.0, 4.0, 3.0, 6.0],
            );
        }
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(
            interpolate_cubic_natural(&[1.0, 2.0], 0).unwrap_err(),
            SplineError::InvalidDimension
        );
        assert!(matches!(
            interpolate_cubic_natural(&[1.0, 2.0, 3.0], 2).unwrap_err(),
            SplineError::DimensionMismatch { .. }
        ));
        assert_eq!(
            interpolate_cubic_clamped(&[1.0, 2.0], 2).unwrap_err(),
            SplineError::InsufficientPoints {
                given: 1,
                required: 2
            }
        );
        assert!(matches!(
            interpolate_cubic_natural(&[0.0, 0.0, 0.0, 0.0, 1.0, 1.0], 2).unwrap_err(),
            SplineError::DegenerateInput(_)
        ));
        assert!(matches!(
            interpolate_cubic_clamped(&[0.0, f64::NAN, 1.0, 1.0], 2).unwrap_err(),
            SplineError::DegenerateInput(_)
        ));
    }

    const ARCH: [f64; 6] = [0.0, 0.0, 1.0, 1.0, 2.0, 0.0];

    #[test]
    fn test_catmull_rom_uniform_control_points() {
        let spline = interpolate_catmull_rom(&ARCH, 2, 0.0, None, None, 1e-5).unwrap();
        assert_eq!(spline.degree(), 3);
        assert_points_eq(
            spline.control_points(),
            &[
                0.0, 0.0, 1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0, 1.0, 1.0, 1.0, //
                1.0, 1.0, 4.0 / 3.0, 1.0, 5.0 / 3.0, 1.0 / 3.0, 2.0, 0.0,
            ],
        );
    }

    #[test]
    fn test_catmull_rom_hits_data_points() {
        for alpha in [0.0, 0.5, 1.0] {
            let spline = interpolate_catmull_rom(&POINTS, 2, alpha, None, None, 1e-5).unwrap();
            assert_eq!(spline.num_control_points(), 16);
            for (i, p) in POINTS.chunks_exact(2).enumerate() {
                let net = spline.eval(i as f64 / 4.0).unwrap();
                assert_points_eq(net.result_point(), p);
            }
        }
    }

    #[test]
    fn test_catmull_rom_guide_points() {
        let spline =
            interpolate_catmull_rom(&ARCH, 2, 0.0, Some(&[0.0, -1.0]), None, 1e-5).unwrap();
        assert_points_eq(&spline.control_points()[2..4], &[1.0 / 6.0, 1.0 / 3.0]);

        // a guide point on top of the first data point is ignored
        let mirrored = interpolate_catmull_rom(&ARCH, 2, 0.0, None, None, 1e-5).unwrap();
        let ignored =
            interpolate_catmull_rom(&ARCH, 2, 0.0, Some(&[0.0, 0.0]), None, 1e-5).unwrap();
        assert_eq!(mirrored, ignored);
    }

    #[test]
    fn test_catmull_rom_merges_duplicates() {
        let with_duplicates = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0 + 1e-7, 2.0, 0.0];
        let merged =
            interpolate_catmull_rom(&with_duplicates, 2, 0.5, None, None, 1e-5).unwrap();
        let plain = interpolate_catmull_rom(&ARCH, 2, 0.5, None, None, 1e-5).unwrap();
        assert_eq!(merged, plain);
    }

    #[test]
    fn test_catmull_rom_single_point() {
        let spline =
            interpolate_catmull_rom(&[3.0, 4.0, 3.0, 4.0], 2, 0.5, None, None, 1e-5).unwrap();
        assert_eq!(spline.degree(), 3);
        assert_eq!(spline.control_points(), &[3.0, 4.0, 3.0, 4.0, 3.0, 4.0, 3.0, 4.0]);
        assert_points_eq(spline.eval(0.5).unwrap().result(), &[3.0, 4.0]);
    }

    #[test]
    fn test_catmull_rom_invalid_input() {
        assert_eq!(
            interpolate_catmull_rom(&[1.0], 0, 0.5, None, None, 1e-5).unwrap_err(),
            SplineError::InvalidDimension
        );
        assert!(matches!(
            interpolate_catmull_rom(&[], 2, 0.5, None, None, 1e-5).unwrap_err(),
            SplineError::InsufficientPoints { .. }
        ));
        assert_eq!(
            interpolate_catmull_rom(&ARCH, 2, 2.0, None, None, 1e-5).unwrap_err(),
            SplineError::InvalidFactor(2.0)
        );
        assert!(matches!(
            interpolate_catmull_rom(&ARCH, 2, 0.5, None, Some(&[1.0]), 1e-5).unwrap_err(),
            SplineError::DimensionMismatch { .. }
        ));
        assert!(matches!(
            interpolate_catmull_rom(&[0.0, f64::NAN], 2, 0.5, None, None, 1e-5).unwrap_err(),
            SplineError::DegenerateInput(_)
        ));
    }

    #[test]
    fn test_thomas_requires_dominance() {
        let mut d = [1.0, 1.0];
        let err = thomas(&[0.0, 1.0], &[1.0, 1.0], &[1.0, 0.0], 1, &mut d).unwrap_err();
        assert!(matches!(err, SplineError::NoResult(_)));
    }
}
