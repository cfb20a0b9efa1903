//! Vexel Geometry
//!
//! Affine transforms and the flattened path model used by the rasterizer.
//!
//! Paths are built in user space and flattened into line segments at build
//! time; the transform active at draw time is applied to the flattened
//! points by the rasterizer, never here.

pub mod matrix;
pub mod path;

pub use matrix::Matrix;
pub use path::{Path, Point, Subpath};
