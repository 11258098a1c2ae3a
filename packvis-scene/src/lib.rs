//! # packvis scene reconciliation
//!
//! Logic that keeps a retained scene consistent with streamed bin-packing
//! snapshots: box and arrow primitive builders plus the reconciler that
//! tears down and rebuilds the rendered state per update. Everything here
//! operates on plain data from `packvis-core` and runs without a rendering
//! context.

pub mod primitives;
pub mod arrow;
pub mod reconciler;

// Re-export commonly used items
pub use primitives::*;
pub use arrow::*;
pub use reconciler::*;
