pub mod aabb;
pub mod nd;
pub mod reflect;
pub mod vector;

pub use glam::{DVec2, DVec3, DVec4};
pub use aabb::AabbN;
pub use reflect::Reflection;
pub use vector::VectorExt;

pub type Vector2 = DVec2;
pub type Vector3 = DVec3;
pub type Vector4 = DVec4;
