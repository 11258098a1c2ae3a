//! Windowed viewer shell for packvis
//!
//! Real-time presentation of the reconciled scene using wgpu and winit:
//! - snapshot stream client feeding the event loop
//! - orbit camera and keyboard display toggles
//! - triangle/line rendering of the retained scene graph
//! - PNG snapshot and frame-sequence capture

pub mod camera;
pub mod capture;
pub mod renderer;
pub mod scenery;
pub mod shaders;
pub mod stream;
pub mod tessellate;
pub mod viewer;

pub use camera::*;
pub use renderer::*;
pub use stream::*;
pub use viewer::*;
