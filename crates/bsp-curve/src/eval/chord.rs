//! Chord-length approximation of arc length.

use bsp_core::{buffer, Result, SplineError, Tolerance};
use bsp_math::nd;
use log::debug;

use crate::spline::BSpline;

/// Map a chord length back to a parameter.
///
/// `knots[i]` is the parameter at which the cumulative chord length
/// `lengths[i]` is reached. Lengths outside of the sampled range clamp to the
/// first or last knot; in between, the parameter is linearly interpolated.
/// Chords shorter than [`Tolerance::length_zero`] are not interpolated.
///
/// A non-finite `len` or table entry fails with
/// [`SplineError::DegenerateInput`].
pub fn chord_length_to_knot(knots: &[f64], lengths: &[f64], len: f64) -> Result<f64> {
    if knots.len() != lengths.len() {
        return Err(SplineError::DimensionMismatch {
            expected: knots.len(),
            actual: lengths.len(),
        });
    }
    let (Some(&first), Some(&last)) = (lengths.first(), lengths.last()) else {
        return Err(SplineError::NoResult("empty chord length table".into()));
    };
    if !len.is_finite() {
        return Err(SplineError::DegenerateInput(format!(
            "chord length is not finite: {len}"
        )));
    }
    if let Some(index) = lengths.iter().position(|l| !l.is_finite()) {
        return Err(SplineError::DegenerateInput(format!(
            "non-finite chord length at index {index}"
        )));
    }
    let tol = Tolerance::default();
    if len <= first || tol.is_zero_length(last) {
        return Ok(knots[0]);
    }
    if len >= last {
        return Ok(knots[knots.len() - 1]);
    }

    // first index with lengths[idx] >= len, never 0 here
    let idx = lengths.partition_point(|&l| l < len);
    let (l0, l1) = (lengths[idx - 1], lengths[idx]);
    let (k0, k1) = (knots[idx - 1], knots[idx]);
    let span = l1 - l0;
    if tol.is_zero_length(span) {
        return Ok(k0);
    }
    let t = (len - l0) / span;
    Ok(k0 + t * (k1 - k0))
}

/// Like [`chord_length_to_knot`], with the length given as a fraction `t`
/// of the total length.
pub fn t_to_knot(knots: &[f64], lengths: &[f64], t: f64) -> Result<f64> {
    let total = lengths.last().copied().unwrap_or(0.0);
    chord_length_to_knot(knots, lengths, t * total)
}

impl BSpline {
    /// Cumulative chord lengths of the polyline through the points at
    /// `params`. The first entry is always 0.
    pub fn chord_lengths(&self, params: &[f64]) -> Result<Vec<f64>> {
        if let Some(index) = params.windows(2).position(|w| w[1] < w[0]) {
            return Err(SplineError::KnotsDecreasing { index: index + 1 });
        }
        let dim = self.dimension();
        let points = self.eval_all(params)?;

        let mut lengths = buffer::with_capacity(params.len())?;
        let mut total = 0.0;
        let mut prev: Option<&[f64]> = None;
        for point in points.chunks_exact(dim) {
            if let Some(prev) = prev {
                total += nd::distance(prev, point);
            }
            lengths.push(total);
            prev = Some(point);
        }
        Ok(lengths)
    }

    /// `num` parameters roughly equidistant in arc length, estimated from
    /// `num_samples` chords (200 if `num_samples` is 0).
    pub fn equidistant_knot_seq(&self, num: usize, num_samples: usize) -> Result<Vec<f64>> {
        let num_samples = if num_samples == 0 { 200 } else { num_samples };
        let knots = self.uniform_knot_seq(num_samples.max(2));
        let lengths = self.chord_lengths(&knots)?;
        let total = lengths.last().copied().unwrap_or(0.0);
        debug!("equidistant sequence of {num} over chord length {total}");

        let mut seq = buffer::with_capacity(num)?;
        for i in 0..num {
            let t = if num > 1 {
                i as f64 / (num - 1) as f64
            } else {
                0.0
            };
            seq.push(chord_length_to_knot(&knots, &lengths, t * total)?);
        }
        Ok(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spline::KnotType;
    use approx::assert_abs_diff_eq;

    fn segment() -> BSpline {
        BSpline::with_control_points(2, 2, 1, KnotType::Clamped, &[0.0, 0.0, 3.0, 4.0]).unwrap()
    }

    #[test]
    fn test_chord_lengths_of_segment() {
        let lengths = segment().chord_lengths(&[0.0, 0.5, 1.0]).unwrap();
        assert_abs_diff_eq!(lengths[0], 0.0);
        assert_abs_diff_eq!(lengths[1], 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(lengths[2], 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_chord_lengths_reject_decreasing_params() {
        let err = segment().chord_lengths(&[0.0, 0.7, 0.3]).unwrap_err();
        assert_eq!(err, SplineError::KnotsDecreasing { index: 2 });
    }

    #[test]
    fn test_chord_length_to_knot() {
        let knots = [0.0, 0.5, 1.0];
        let lengths = [0.0, 1.0, 3.0];
        assert_abs_diff_eq!(chord_length_to_knot(&knots, &lengths, -1.0).unwrap(), 0.0);
        assert_abs_diff_eq!(chord_length_to_knot(&knots, &lengths, 0.5).unwrap(), 0.25);
        assert_abs_diff_eq!(chord_length_to_knot(&knots, &lengths, 2.0).unwrap(), 0.75);
        assert_abs_diff_eq!(chord_length_to_knot(&knots, &lengths, 9.0).unwrap(), 1.0);
        assert_abs_diff_eq!(t_to_knot(&knots, &lengths, 0.5).unwrap(), 0.625);
        assert!(chord_length_to_knot(&knots, &lengths[..2], 0.5).is_err());
        assert!(chord_length_to_knot(&[], &[], 0.5).is_err());
    }

    #[test]
    fn test_chord_length_to_knot_rejects_non_finite() {
        let knots = [0.0, 0.5, 1.0];
        let lengths = [0.0, 1.0, 2.0];
        for len in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                chord_length_to_knot(&knots, &lengths, len).unwrap_err(),
                SplineError::DegenerateInput(_)
            ));
        }
        assert!(matches!(
            t_to_knot(&knots, &lengths, f64::NAN).unwrap_err(),
            SplineError::DegenerateInput(_)
        ));
        assert!(matches!(
            chord_length_to_knot(&knots, &[f64::NAN, 1.0, 2.0], 0.5).unwrap_err(),
            SplineError::DegenerateInput(_)
        ));
    }

    #[test]
    fn test_equidistant_knot_seq_follows_arc_length() {
        // fast on [0, 0.2], slow on [0.2, 1]: half the length is reached at 0.2
        let spline =
            BSpline::from_parts(1, 1, vec![0.0, 1.0, 2.0], vec![0.0, 0.0, 0.2, 1.0, 1.0]).unwrap();
        let seq = spline.equidistant_knot_seq(3, 0).unwrap();
        assert_eq!(seq.len(), 3);
        assert_abs_diff_eq!(seq[0], 0.0);
        assert_abs_diff_eq!(seq[1], 0.2, epsilon = 1e-2);
        assert_abs_diff_eq!(seq[2], 1.0);
    }
}
