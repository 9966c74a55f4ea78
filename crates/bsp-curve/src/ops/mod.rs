//! Operations that derive new splines from existing ones.

pub mod buckle;
pub mod derive;
pub mod elevate;
pub mod morph;
pub mod refine;
