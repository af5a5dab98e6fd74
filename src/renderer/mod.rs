//! WebGPU rendering module
//!
//! `scene` describes a frame as screen-space draw commands, `shapes` turns
//! them into a triangle list and `pipeline` uploads and draws it.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{DrawCommand, Frame, TextCommand, build_frame, theme_color};
pub use vertex::Vertex;
