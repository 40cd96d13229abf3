//! WebGPU rendering module
//!
//! Draws the surface mesh as lit, depth-tested triangles. Heights are uploaded
//! from the CPU each frame.

pub mod pipeline;
pub mod vertex;

pub use pipeline::{SurfaceRenderState, scene_uniforms};
pub use vertex::{SceneUniforms, Vertex};
