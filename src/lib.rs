//! Ripple Pond - an interactive water surface
//!
//! Core modules:
//! - `sim`: Deterministic wave simulation (height field, impacts, stencil solver)
//! - `surface`: Mesh generation and grid <-> mesh mapping
//! - `interaction`: Pointer hits turned into impacts
//! - `camera`: View/projection and pointer picking
//! - `host`: Frame loop driving the simulation and the surface
//! - `renderer`: WebGPU rendering pipeline

pub mod camera;
pub mod config;
pub mod host;
pub mod interaction;
pub mod renderer;
pub mod sim;
pub mod surface;

pub use config::{ConfigError, SimConfig};
pub use host::{Pond, TickBudget};

/// Scene and simulation constants
pub mod consts {
    /// Plane extent from `X_MIN` (keep even so node counts stay odd)
    pub const X_MIN: f64 = 0.0;
    pub const X_MAX: f64 = 100.0;
    /// Simulation nodes per unit of length
    pub const NODES_PER_LENGTH: u32 = 1;
    /// Upper bound on `nx * ny`; keeps mesh indices within `u32`
    pub const MAX_NODES: usize = 1 << 22;

    /// sqrt(proportionality constant / mass)
    pub const WAVE_SPEED: f64 = 1.0;
    /// Courant number, must stay in (0, 1)
    pub const CFL: f64 = 0.2;
    /// Damping coefficient
    pub const DAMPING: f64 = 0.002;

    /// Duration of the impact seeded at the center on startup
    pub const SEED_IMPACT_FRAMES: u32 = 31;
    /// Impact duration for pointer movement
    pub const MOVE_IMPACT_FRAMES: u32 = 11;
    /// Impact duration for clicks
    pub const CLICK_IMPACT_FRAMES: u32 = 100;
    /// World-space distance for a pointer hit to reach a vertex
    pub const HIT_RADIUS: f32 = 0.5;

    /// Visual gain applied to heights when writing the mesh
    pub const AMPLIFICATION: f32 = 2.0;

    /// Camera defaults
    pub const CAMERA_EYE: [f32; 3] = [0.0, 50.0, -70.0];
    pub const CAMERA_FOV_DEGREES: f32 = 75.0;
    pub const CAMERA_NEAR: f32 = 0.1;
    pub const CAMERA_FAR: f32 = 1000.0;
}

/// Forced height written at an impacted cell on tick `time`
#[inline]
pub fn forced_amplitude(time: u64) -> f64 {
    -((time + 1) as f64 / 10.0).sin()
}

/// `floor(n / 2)`, the center index of an odd node count
#[inline]
pub fn center_index(n: usize) -> usize {
    n / 2
}
