//! Frame loop glue: one `Pond` owns the simulation, the mesh and the
//! pointer mapping, and advances them together once per frame.

use std::ops::ControlFlow;

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::camera::Camera;
use crate::config::{ConfigError, SimConfig};
use crate::interaction::{InteractionCollector, PointerKind};
use crate::sim::{Impact, Simulation};
use crate::surface::{SurfaceAdapter, SurfaceMesh};

/// How many ticks a headless run may take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickBudget {
    Ticks(u64),
    /// Run until the per-tick hook breaks
    UntilCancelled,
}

/// Simulation plus the surface it drives
pub struct Pond {
    config: SimConfig,
    sim: Simulation,
    mesh: SurfaceMesh,
    adapter: SurfaceAdapter,
    collector: InteractionCollector,
    paused: bool,
}

impl Pond {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let sim = Simulation::new(&config)?;
        let params = *sim.params();
        let adapter = SurfaceAdapter::new(&params, config.amplification);
        let mut mesh = SurfaceMesh::new(&params);
        adapter.apply(sim.field(), &mut mesh);
        mesh.update_normals();

        Ok(Self {
            collector: InteractionCollector::new(&config),
            config,
            sim,
            mesh,
            adapter,
            paused: false,
        })
    }

    /// Advance one tick and refresh the mesh. Returns false while paused.
    pub fn frame(&mut self) -> bool {
        if self.paused {
            return false;
        }
        let field = self.sim.step();
        self.adapter.apply(field, &mut self.mesh);
        self.mesh.update_normals();
        true
    }

    /// Impacts for a pointer that already hit the surface at `world_point`
    pub fn report_pointer(&mut self, kind: PointerKind, world_point: Vec3) -> Vec<Impact> {
        self.collector
            .report(&mut self.sim, &self.adapter, &self.mesh, kind, world_point)
    }

    /// Pick the surface under a pointer in NDC and report it
    pub fn pointer_at(&mut self, camera: &Camera, kind: PointerKind, ndc: Vec2) -> Vec<Impact> {
        match camera.pick_surface(ndc, &self.mesh) {
            Some(point) => self.report_pointer(kind, point),
            None => Vec::new(),
        }
    }

    /// Simulated height under a mesh-local position
    pub fn height_at(&self, mesh_x: f64, mesh_y: f64) -> Option<f64> {
        self.adapter.height_at(self.sim.field(), mesh_x, mesh_y)
    }

    pub fn set_paused(&mut self, paused: bool) {
        if paused != self.paused {
            log::info!("{}", if paused { "Paused" } else { "Resumed" });
        }
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Step until the budget is spent, the hook breaks, or the pond is
    /// paused. `on_tick` runs after every completed frame. Returns the number
    /// of ticks taken.
    pub fn run<F>(&mut self, budget: TickBudget, mut on_tick: F) -> u64
    where
        F: FnMut(&mut Pond) -> ControlFlow<()>,
    {
        let mut ticks = 0;
        loop {
            if let TickBudget::Ticks(limit) = budget
                && ticks >= limit
            {
                break;
            }
            if !self.frame() {
                break;
            }
            ticks += 1;
            if on_tick(self).is_break() {
                break;
            }
        }
        ticks
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    pub fn mesh(&self) -> &SurfaceMesh {
        &self.mesh
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

/// Random pointer hits for unattended runs
pub struct Rain {
    rng: Pcg32,
    /// Probability of a drop per call
    chance: f64,
}

impl Rain {
    pub fn new(seed: u64, chance: f64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            chance: chance.clamp(0.0, 1.0),
        }
    }

    /// Maybe drop a click on a random interior vertex
    pub fn fall(&mut self, pond: &mut Pond) -> Vec<Impact> {
        if !self.rng.random_bool(self.chance) {
            return Vec::new();
        }
        let (nx, ny) = pond.mesh().dims();
        let i = self.rng.random_range(1..nx - 1);
        let j = self.rng.random_range(1..ny - 1);
        let point = pond.mesh().world_position(pond.mesh().vertex_index(i, j));
        pond.report_pointer(PointerKind::Click, point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SimConfig {
        SimConfig {
            x_max: 20.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_pond_shows_seed() {
        let pond = Pond::new(small()).unwrap();
        let center = pond.mesh().elevation(10, 10);
        assert!((center - 0.1_f32.sin() * 2.0).abs() < 1e-6);
        assert_eq!(pond.height_at(0.0, 0.0), Some(0.1_f64.sin()));
        assert_eq!(pond.sim().active_impacts(), 1);
    }

    #[test]
    fn test_frame_moves_mesh_with_field() {
        let mut pond = Pond::new(small()).unwrap();
        assert!(pond.frame());
        let h = pond.height_at(0.0, 0.0).unwrap();
        assert_eq!(h, crate::forced_amplitude(1));
        assert_eq!(pond.mesh().elevation(10, 10), h as f32 * 2.0);
        assert!(!pond.mesh().normals_dirty());
    }

    #[test]
    fn test_paused_pond_does_not_tick() {
        let mut pond = Pond::new(small()).unwrap();
        pond.set_paused(true);
        assert!(pond.is_paused());
        assert!(!pond.frame());
        assert_eq!(pond.run(TickBudget::Ticks(10), |_| ControlFlow::Continue(())), 0);
        assert_eq!(pond.sim().time(), 0);

        pond.set_paused(false);
        assert!(!pond.is_paused());
        assert!(pond.frame());
        assert_eq!(pond.sim().time(), 1);
    }

    #[test]
    fn test_oversized_config_rejected_before_allocation() {
        let config = SimConfig {
            x_max: 1e19,
            ..Default::default()
        };
        assert!(matches!(
            Pond::new(config),
            Err(ConfigError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn test_run_budget_and_cancel() {
        let mut pond = Pond::new(small()).unwrap();
        let ticks = pond.run(TickBudget::Ticks(40), |_| ControlFlow::Continue(()));
        assert_eq!(ticks, 40);
        assert_eq!(pond.sim().time(), 40);
        // Seed impact of 31 frames has expired
        assert_eq!(pond.sim().active_impacts(), 0);

        let ticks = pond.run(TickBudget::UntilCancelled, |p| {
            if p.sim().time() >= 55 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(ticks, 15);
    }

    #[test]
    fn test_pointer_through_camera() {
        let mut pond = Pond::new(small()).unwrap();
        let camera = Camera::new(1.0);
        let impacts = pond.pointer_at(&camera, PointerKind::Move, Vec2::ZERO);
        // Screen center looks at the raised center node
        assert!(impacts.iter().all(|i| i.remaining_frames == 11));
        assert!(impacts.iter().any(|i| (i.x, i.y) == (10, 10)));
    }

    #[test]
    fn test_rain_is_seeded() {
        let drops = |seed| {
            let mut pond = Pond::new(small()).unwrap();
            let mut rain = Rain::new(seed, 1.0);
            (0..5)
                .flat_map(|_| rain.fall(&mut pond))
                .map(|i| (i.x, i.y))
                .collect::<Vec<_>>()
        };
        let a = drops(7);
        assert_eq!(a.len(), 5);
        assert_eq!(a, drops(7));
    }
}
