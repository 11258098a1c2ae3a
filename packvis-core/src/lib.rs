//! Core data structures for packvis
//!
//! This crate provides the snapshot data model streamed by a bin-packing
//! simulation, color classification for packed boxes, and the retained
//! scene graph that reconciliation renders into.

pub mod color;
pub mod snapshot;
pub mod scene;
pub mod error;

pub use color::*;
pub use snapshot::*;
pub use scene::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, UnitQuaternion};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// Common result type for packvis operations
pub type Result<T> = std::result::Result<T, Error>;

/// Edge length of the cubic packing bin, in world units.
pub const BIN_SIZE: f32 = 10.0;
