//! Helpers for points of runtime dimension stored in flat `f64` slices.

/// Euclidean distance between two points of equal dimension.
pub fn distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Write `(1 - t) * a + t * b` into `out`.
pub fn lerp(a: &[f64], b: &[f64], t: f64, out: &mut [f64]) {
    debug_assert!(a.len() == b.len() && a.len() == out.len());
    let t_hat = 1.0 - t;
    for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
        *o = t_hat * x + t * y;
    }
}
