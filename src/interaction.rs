//! Pointer events turned into impacts

use glam::Vec3;

use crate::config::SimConfig;
use crate::sim::{Impact, Simulation};
use crate::surface::{SurfaceAdapter, SurfaceMesh};

/// Kind of pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Pointer moved across the surface
    Move,
    /// Button pressed on the surface
    Click,
}

/// Hit radius and impact durations for pointer input
#[derive(Debug, Clone, Copy)]
pub struct InteractionCollector {
    pub hit_radius: f32,
    pub move_frames: u32,
    pub click_frames: u32,
}

impl InteractionCollector {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            hit_radius: config.hit_radius,
            move_frames: config.move_impact_frames,
            click_frames: config.click_impact_frames,
        }
    }

    pub fn duration(&self, kind: PointerKind) -> u32 {
        match kind {
            PointerKind::Move => self.move_frames,
            PointerKind::Click => self.click_frames,
        }
    }

    /// Enqueue impacts for a pointer that hit the surface at `world_point`
    pub fn report(
        &self,
        sim: &mut Simulation,
        adapter: &SurfaceAdapter,
        mesh: &SurfaceMesh,
        kind: PointerKind,
        world_point: Vec3,
    ) -> Vec<Impact> {
        report_pointer_event(
            sim,
            adapter,
            mesh,
            world_point,
            self.hit_radius,
            self.duration(kind),
        )
    }
}

/// Enqueue one impact per interior grid node whose vertex lies within
/// `hit_radius` of `world_point`. Returns what was actually queued.
pub fn report_pointer_event(
    sim: &mut Simulation,
    adapter: &SurfaceAdapter,
    mesh: &SurfaceMesh,
    world_point: Vec3,
    hit_radius: f32,
    duration_frames: u32,
) -> Vec<Impact> {
    adapter
        .hits_to_cells(mesh, world_point, hit_radius)
        .into_iter()
        .filter_map(|(x, y)| sim.enqueue_impact(x, y, duration_frames))
        .collect()
}
