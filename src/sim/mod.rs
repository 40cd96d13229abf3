//! Deterministic wave simulation
//!
//! Pure CPU code with no rendering or platform dependencies:
//! - Fixed timestep derived from the configuration
//! - Stable impact order (queue order)
//! - One writer per tick, readers only between ticks

pub mod field;
pub mod impact;
pub mod params;
pub mod state;
pub mod tick;

pub use field::{HeightField, Slice, SliceView, SweepBuffers};
pub use impact::{Impact, ImpactQueue};
pub use params::{STABLE_COEFFICIENT_LIMIT, SolverParams};
pub use state::Simulation;
pub use tick::{TickPhase, apply_impacts, sweep};
