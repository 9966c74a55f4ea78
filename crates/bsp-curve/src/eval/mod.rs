pub mod bisect;
pub mod chord;
pub mod deboor;
pub mod knot;

pub use bisect::BisectOptions;
pub use chord::{chord_length_to_knot, t_to_knot};
pub use deboor::DeBoorNet;
pub use knot::KnotLocation;
