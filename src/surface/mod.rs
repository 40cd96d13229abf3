//! Water surface mesh and its mapping onto the simulation grid

pub mod adapter;
pub mod mesh;

pub use adapter::SurfaceAdapter;
pub use mesh::SurfaceMesh;
