//! B-spline curves of arbitrary degree and dimension: de Boor evaluation,
//! derivatives, knot insertion and splitting, degree elevation and morphing,
//! interpolation, and rotation minimizing frames.

pub mod eval;
pub mod frame;
pub mod interpolate;
pub mod ops;
pub mod spline;

pub use eval::{chord_length_to_knot, t_to_knot, BisectOptions, DeBoorNet, KnotLocation};
pub use frame::{compute_rmf, compute_rmf_with_normal, Frame};
pub use interpolate::{
    interpolate_catmull_rom, interpolate_cubic_clamped, interpolate_cubic_natural,
};
pub use spline::{BSpline, KnotType};
