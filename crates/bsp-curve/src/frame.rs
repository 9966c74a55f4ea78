//! Rotation minimizing frames along a spline.
//!
//! Frames are propagated with the double reflection method of Wang et al.,
//! "Computation of Rotation Minimizing Frames" (2008). Unlike Frenet frames
//! they are defined on straight sections and do not flip at inflection
//! points.

use bsp_core::{Result, SplineError};
use bsp_math::{Reflection, Vector3, VectorExt};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::spline::BSpline;

/// An orthonormal frame at a point of a curve.
///
/// Curves of dimension below 3 are embedded in 3D with zero padding; higher
/// dimensions are truncated to their first three components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub position: Vector3,
    /// Unit tangent.
    pub tangent: Vector3,
    pub normal: Vector3,
    /// `tangent × normal`.
    pub binormal: Vector3,
}

/// Compute a frame at each parameter of `params`, which should be sorted.
///
/// The first normal is derived from the first tangent.
pub fn compute_rmf(spline: &BSpline, params: &[f64]) -> Result<Vec<Frame>> {
    rmf(spline, params, None)
}

/// Like [`compute_rmf`], starting from `first_normal`. Its component along
/// the first tangent is removed before use.
pub fn compute_rmf_with_normal(
    spline: &BSpline,
    params: &[f64],
    first_normal: Vector3,
) -> Result<Vec<Frame>> {
    rmf(spline, params, Some(first_normal))
}

fn rmf(spline: &BSpline, params: &[f64], first_normal: Option<Vector3>) -> Result<Vec<Frame>> {
    let Some((&u0, rest)) = params.split_first() else {
        return Ok(Vec::new());
    };
    let deriv = spline.derive_n(1, None)?;

    let mut frames = Vec::new();
    frames
        .try_reserve_exact(params.len())
        .map_err(|_| SplineError::Allocation {
            requested: params.len(),
        })?;

    let position = point_at(spline, u0)?;
    let tangent = point_at(&deriv, u0)?.normalized()?;
    let normal = match first_normal {
        Some(n) => (n - tangent * n.dot(tangent)).normalized()?,
        None => seed_normal(tangent, spline.dimension())?,
    };
    let mut prev = Frame {
        position,
        tangent,
        normal,
        binormal: tangent.cross(normal),
    };
    frames.push(prev);

    for &u in rest {
        let position = point_at(spline, u)?;
        let tangent = point_at(&deriv, u)?.normalized()?;

        let r1 = Reflection::between(prev.position, position);
        let normal_l = r1.apply(prev.normal);
        let tangent_l = r1.apply(prev.tangent);
        let r2 = Reflection::between(tangent_l, tangent);
        let normal = r2.apply(normal_l).normalized()?;

        prev = Frame {
            position,
            tangent,
            normal,
            binormal: tangent.cross(normal),
        };
        frames.push(prev);
    }

    debug!("computed {} rotation minimizing frames", frames.len());
    Ok(frames)
}

/// A normal perpendicular to `tangent`, built from the coordinate axis the
/// tangent is least aligned with.
fn seed_normal(tangent: Vector3, dimension: usize) -> Result<Vector3> {
    let abs = tangent.abs();
    let mut axis = Vector3::X;
    let mut min = abs.x;
    if abs.y < min {
        min = abs.y;
        axis = Vector3::Y;
    }
    if abs.z < min {
        axis = Vector3::Z;
    }
    let mut normal = tangent.cross(axis).normalized()?;
    if dimension >= 3 {
        // Turn the normal sideways, as it is in 2D.
        normal = tangent.cross(normal);
    }
    Ok(normal)
}

fn point_at(spline: &BSpline, u: f64) -> Result<Vector3> {
    let net = spline.eval(u)?;
    Ok(Vector3::from_padded(net.result_point()))
}
