//! Simulation state and the per-frame step
//!
//! `Simulation` is the single owner of the height field and the impact queue.
//! Nothing else mutates either; readers borrow the field between steps.

use super::field::HeightField;
use super::impact::{Impact, ImpactQueue};
use super::params::{STABLE_COEFFICIENT_LIMIT, SolverParams};
use super::tick::{TickPhase, apply_impacts, sweep};
use crate::config::{ConfigError, SimConfig};

/// A running wave simulation
#[derive(Debug, Clone)]
pub struct Simulation {
    params: SolverParams,
    field: HeightField,
    impacts: ImpactQueue,
    /// Ticks completed so far
    time: u64,
    phase: TickPhase,
}

impl Simulation {
    /// Flat, quiet simulation for the given parameters
    pub fn configure(params: SolverParams) -> Result<Self, ConfigError> {
        params.validate()?;

        let coefficient = params.stencil_coefficient();
        if coefficient > STABLE_COEFFICIENT_LIMIT {
            log::warn!(
                "Stencil coefficient {coefficient:.3} exceeds {STABLE_COEFFICIENT_LIMIT}; \
                 the surface will diverge"
            );
        }
        log::debug!(
            "Configured {}x{} grid, dx={} dt={} coefficient={coefficient}",
            params.nx,
            params.ny,
            params.dx,
            params.dt()
        );

        Ok(Self {
            params,
            field: HeightField::new(params.nx, params.ny),
            impacts: ImpactQueue::new(),
            time: 0,
            phase: TickPhase::Idle,
        })
    }

    /// Default scene: a small bump at the center plus a center impact for
    /// `seed_impact_frames` ticks
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        let mut sim = Self::configure(config.solver_params()?)?;
        let (cx, cy) = sim.params.center();
        sim.seed_disturbance(cx, cy, (1.0_f64 / 10.0).sin());
        sim.enqueue_impact(cx, cy, config.seed_impact_frames);
        log::info!(
            "Simulation ready: {}x{} nodes, {} seed impact(s)",
            sim.params.nx,
            sim.params.ny,
            sim.impacts.len()
        );
        Ok(sim)
    }

    /// Set a present-slice height before (or between) steps.
    ///
    /// Boundary and out-of-range cells are refused.
    pub fn seed_disturbance(&mut self, x: usize, y: usize, value: f64) -> bool {
        self.field.seed_present(x, y, value)
    }

    /// Queue an impact. Non-interior cells and zero durations are dropped.
    pub fn enqueue_impact(&mut self, x: usize, y: usize, duration: u32) -> Option<Impact> {
        if !self.params.is_interior(x, y) {
            log::trace!("Dropped impact outside interior at ({x}, {y})");
            return None;
        }
        let impact = self.impacts.enqueue(x, y, duration)?;
        log::debug!("Impact at ({x}, {y}) for {duration} ticks");
        Some(impact)
    }

    /// Advance one tick and return the field with the new `present`
    pub fn step(&mut self) -> &HeightField {
        self.enter(TickPhase::SweepingInterior);
        self.time += 1;
        let swept = sweep(&self.params, self.field.sweep_buffers());
        self.field.mark_swept(swept);

        self.enter(TickPhase::ApplyingImpacts);
        apply_impacts(&mut self.field, &self.impacts, self.time);

        self.enter(TickPhase::PurgingExpired);
        self.impacts.tick();

        self.enter(TickPhase::Rotated);
        self.field.rotate();

        self.enter(TickPhase::Idle);
        &self.field
    }

    fn enter(&mut self, next: TickPhase) {
        assert_eq!(
            self.phase.next(),
            next,
            "tick phase out of order: {:?} -> {:?}",
            self.phase,
            next
        );
        self.phase = next;
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn phase(&self) -> TickPhase {
        self.phase
    }

    pub fn active_impacts(&self) -> usize {
        self.impacts.len()
    }

    pub fn impacts(&self) -> &ImpactQueue {
        &self.impacts
    }

    pub fn field(&self) -> &HeightField {
        &self.field
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }
}
