//! One timestep of the damped wave equation
//!
//! `step` drives the phases in a fixed order: stencil sweep over the interior,
//! forced impacts, purge of expired impacts, slice rotation. Each phase runs to
//! completion before the next begins.

use super::field::{HeightField, SweepBuffers};
use super::impact::ImpactQueue;
use super::params::SolverParams;
use crate::forced_amplitude;

/// Where a tick currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickPhase {
    /// Between ticks; the field is safe to read
    #[default]
    Idle,
    SweepingInterior,
    ApplyingImpacts,
    PurgingExpired,
    Rotated,
}

impl TickPhase {
    /// The only phase allowed to follow this one
    pub fn next(self) -> TickPhase {
        match self {
            TickPhase::Idle => TickPhase::SweepingInterior,
            TickPhase::SweepingInterior => TickPhase::ApplyingImpacts,
            TickPhase::ApplyingImpacts => TickPhase::PurgingExpired,
            TickPhase::PurgingExpired => TickPhase::Rotated,
            TickPhase::Rotated => TickPhase::Idle,
        }
    }
}

/// Write every interior cell of `future` from `present` and `past`.
///
/// Returns the number of cells visited, which the caller records on the field
/// so rotation can verify the sweep was complete.
pub fn sweep(params: &SolverParams, buffers: SweepBuffers<'_>) -> usize {
    let SweepBuffers {
        past,
        present,
        future,
    } = buffers;
    let (nx, ny) = (params.nx, params.ny);
    let coefficient = params.stencil_coefficient();
    let dt = params.dt();
    let nu = params.nu;

    let mut visited = 0;
    for x in 1..nx - 1 {
        for y in 1..ny - 1 {
            let i = x * ny + y;
            let p = present[i];
            let q = past[i];
            let xterm = present[i + ny] - 2.0 * p + present[i - ny];
            let yterm = present[i + 1] - 2.0 * p + present[i - 1];
            future[i] = coefficient * (xterm + yterm - nu * (p - q) / dt) + 2.0 * p - q;
            visited += 1;
        }
    }
    visited
}

/// Overwrite `future` at every queued impact, in queue order
pub fn apply_impacts(field: &mut HeightField, impacts: &ImpactQueue, time: u64) {
    let amplitude = forced_amplitude(time);
    for impact in impacts.iter() {
        field.force_future(impact.x, impact.y, amplitude);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_cycle() {
        let mut phase = TickPhase::Idle;
        let mut seen = Vec::new();
        for _ in 0..5 {
            phase = phase.next();
            seen.push(phase);
        }
        assert_eq!(
            seen,
            vec![
                TickPhase::SweepingInterior,
                TickPhase::ApplyingImpacts,
                TickPhase::PurgingExpired,
                TickPhase::Rotated,
                TickPhase::Idle,
            ]
        );
    }

    #[test]
    fn test_sweep_visits_interior_only() {
        let params = SolverParams::new(7, 5, 1.0, 1.0, 1.0, 0.2, 0.0);
        let mut field = HeightField::new(7, 5);
        let visited = sweep(&params, field.sweep_buffers());
        assert_eq!(visited, 15);
        assert_eq!(visited, params.interior_cells());
    }

    #[test]
    fn test_sweep_of_flat_field_stays_flat() {
        let params = SolverParams::new(5, 5, 1.0, 1.0, 1.0, 0.2, 0.01);
        let mut field = HeightField::new(5, 5);
        sweep(&params, field.sweep_buffers());
        assert!(field.future().as_slice().iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_damping_slows_rising_cell() {
        // A cell moving up (P > Q) is pulled back by the damping term
        let undamped = SolverParams::new(5, 5, 1.0, 1.0, 1.0, 0.2, 0.0);
        let damped = SolverParams { nu: 0.5, ..undamped };

        let run = |params: &SolverParams| {
            let mut field = HeightField::new(5, 5);
            field.seed_present(2, 2, 1.0);
            sweep(params, field.sweep_buffers());
            field.future().get(2, 2)
        };
        assert!(run(&damped) < run(&undamped));
    }

    #[test]
    fn test_later_impact_on_same_cell_wins() {
        let mut field = HeightField::new(5, 5);
        let mut impacts = ImpactQueue::new();
        impacts.enqueue(2, 2, 4);
        impacts.enqueue(2, 2, 1);
        apply_impacts(&mut field, &impacts, 7);
        assert_eq!(field.future().get(2, 2), forced_amplitude(7));
    }
}
