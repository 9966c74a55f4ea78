//! Fallible allocation of the flat `f64` buffers that back splines and nets.

use crate::error::{Result, SplineError};

/// Allocate a zero-filled buffer of `len` values.
///
/// Reports [`SplineError::Allocation`] instead of aborting when the memory
/// cannot be reserved.
pub fn zeroed(len: usize) -> Result<Vec<f64>> {
    filled(len, 0.0)
}

/// Allocate a buffer of `len` copies of `value`.
pub fn filled(len: usize, value: f64) -> Result<Vec<f64>> {
    let mut buf = with_capacity(len)?;
    buf.resize(len, value);
    Ok(buf)
}

/// Allocate an empty buffer able to hold `len` values without reallocating.
pub fn with_capacity(len: usize) -> Result<Vec<f64>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|e| SplineError::from_reserve(len, e))?;
    Ok(buf)
}

/// Allocate a buffer holding a copy of `values`.
pub fn copied(values: &[f64]) -> Result<Vec<f64>> {
    let mut buf = with_capacity(values.len())?;
    buf.extend_from_slice(values);
    Ok(buf)
}
