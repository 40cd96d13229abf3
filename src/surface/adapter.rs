//! Mapping between mesh coordinates and grid indices
//!
//! A vertex at local `(x, y)` corresponds to grid node
//! `(x/dx + floor(nx/2), y/dy + floor(ny/2))`, so the grid center sits at the
//! mesh origin.

use glam::Vec3;

use super::mesh::SurfaceMesh;
use crate::center_index;
use crate::sim::{HeightField, SolverParams};

/// Grid <-> mesh bridge for one grid shape
#[derive(Debug, Clone, Copy)]
pub struct SurfaceAdapter {
    nx: usize,
    ny: usize,
    dx: f64,
    dy: f64,
    amplification: f32,
}

impl SurfaceAdapter {
    pub fn new(params: &SolverParams, amplification: f32) -> Self {
        Self {
            nx: params.nx,
            ny: params.ny,
            dx: params.dx,
            dy: params.dy,
            amplification,
        }
    }

    /// Grid node for a mesh-local position, or `None` off the grid
    pub fn mesh_to_grid(&self, mesh_x: f64, mesh_y: f64) -> Option<(usize, usize)> {
        let gx = (mesh_x / self.dx).round() + center_index(self.nx) as f64;
        let gy = (mesh_y / self.dy).round() + center_index(self.ny) as f64;
        if !(gx >= 0.0 && gy >= 0.0) {
            return None;
        }
        let (gx, gy) = (gx as usize, gy as usize);
        (gx < self.nx && gy < self.ny).then_some((gx, gy))
    }

    /// Mesh-local position of a grid node
    pub fn grid_to_mesh(&self, x: usize, y: usize) -> (f64, f64) {
        (
            (x as f64 - center_index(self.nx) as f64) * self.dx,
            (y as f64 - center_index(self.ny) as f64) * self.dy,
        )
    }

    fn is_interior(&self, x: usize, y: usize) -> bool {
        x > 0 && y > 0 && x + 1 < self.nx && y + 1 < self.ny
    }

    /// Copy the present slice into mesh elevations and flag normals for
    /// recomputation
    pub fn apply(&self, field: &HeightField, mesh: &mut SurfaceMesh) {
        let present = field.present();
        for vertex in &mut mesh.vertices {
            let [vx, vy, _] = vertex.position;
            if let Some((gx, gy)) = self.mesh_to_grid(vx as f64, vy as f64) {
                vertex.position[2] = present.get(gx, gy) as f32 * self.amplification;
            }
        }
        mesh.mark_normals_dirty();
    }

    /// Simulated height under a mesh-local position
    pub fn height_at(&self, field: &HeightField, mesh_x: f64, mesh_y: f64) -> Option<f64> {
        let (x, y) = self.mesh_to_grid(mesh_x, mesh_y)?;
        field.present().try_get(x, y)
    }

    /// Interior grid nodes whose displaced vertex lies strictly within `radius` of a
    /// world-space point. Boundary nodes are never returned.
    pub fn hits_to_cells(
        &self,
        mesh: &SurfaceMesh,
        world: Vec3,
        radius: f32,
    ) -> Vec<(usize, usize)> {
        let local = mesh.to_local(world);
        let (mx, my) = mesh.dims();
        let (sx, sy) = mesh.spacing();
        let (hx, hy) = mesh.half_extent();

        // In-plane distance never exceeds the 3-D distance, so only vertices
        // inside this window can be within the radius
        let lo_i = (((local.x - radius + hx) / sx).floor().max(0.0)) as usize;
        let lo_j = (((local.y - radius + hy) / sy).floor().max(0.0)) as usize;
        let hi_i = (((local.x + radius + hx) / sx).ceil().max(-1.0) + 1.0) as usize;
        let hi_j = (((local.y + radius + hy) / sy).ceil().max(-1.0) + 1.0) as usize;

        let radius_sq = radius * radius;
        let mut cells = Vec::new();
        for j in lo_j..hi_j.min(my) {
            for i in lo_i..hi_i.min(mx) {
                let idx = mesh.vertex_index(i, j);
                if mesh.world_position(idx).distance_squared(world) >= radius_sq {
                    continue;
                }
                let [vx, vy, _] = mesh.vertices[idx].position;
                if let Some((gx, gy)) = self.mesh_to_grid(vx as f64, vy as f64)
                    && self.is_interior(gx, gy)
                {
                    cells.push((gx, gy));
                }
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn setup(n: usize) -> (SolverParams, SurfaceAdapter, SurfaceMesh) {
        let params = SolverParams::new(n, n, 1.0, 1.0, 1.0, 0.2, 0.0);
        let adapter = SurfaceAdapter::new(&params, 2.0);
        let mesh = SurfaceMesh::new(&params);
        (params, adapter, mesh)
    }

    #[test]
    fn test_center_maps_to_origin() {
        let (_, adapter, _) = setup(5);
        assert_eq!(adapter.mesh_to_grid(0.0, 0.0), Some((2, 2)));
        assert_eq!(adapter.grid_to_mesh(2, 2), (0.0, 0.0));
        assert_eq!(adapter.mesh_to_grid(-2.0, 2.0), Some((0, 4)));
        assert_eq!(adapter.mesh_to_grid(-3.0, 0.0), None);
        assert_eq!(adapter.mesh_to_grid(0.0, 2.6), None);
    }

    #[test]
    fn test_apply_writes_amplified_present() {
        let (params, adapter, mut mesh) = setup(5);
        let mut field = HeightField::new(params.nx, params.ny);
        field.seed_present(3, 1, 0.25);

        adapter.apply(&field, &mut mesh);
        assert_eq!(mesh.elevation(3, 1), 0.5);
        assert_eq!(mesh.elevation(2, 2), 0.0);
        assert!(mesh.normals_dirty());
    }

    #[test]
    fn test_height_at() {
        let (params, adapter, _) = setup(5);
        let mut field = HeightField::new(params.nx, params.ny);
        field.seed_present(2, 3, -0.75);
        assert_eq!(adapter.height_at(&field, 0.0, 1.0), Some(-0.75));
        assert_eq!(adapter.height_at(&field, 0.0, 9.0), None);
    }

    #[test]
    fn test_hits_reject_boundary() {
        let (_, adapter, mesh) = setup(5);
        // World point over the corner vertex (0, 0) at local (-2, -2)
        let corner = mesh.world_position(mesh.vertex_index(0, 0));
        assert!(adapter.hits_to_cells(&mesh, corner, 0.5).is_empty());

        let inner = mesh.world_position(mesh.vertex_index(1, 3));
        assert_eq!(adapter.hits_to_cells(&mesh, inner, 0.5), vec![(1, 3)]);
    }

    #[test]
    fn test_hits_follow_displaced_vertices() {
        let (params, adapter, mut mesh) = setup(5);
        let mut field = HeightField::new(params.nx, params.ny);
        field.seed_present(2, 2, 1.0);
        adapter.apply(&field, &mut mesh);

        // The flat plane point is now 2 units below the raised vertex
        assert!(adapter.hits_to_cells(&mesh, Vec3::ZERO, 0.5).is_empty());
        let raised = Vec3::new(0.0, 2.0, 0.0);
        assert_eq!(adapter.hits_to_cells(&mesh, raised, 0.5), vec![(2, 2)]);
    }

    #[test]
    fn test_vertex_exactly_at_radius_is_excluded() {
        let (_, adapter, mesh) = setup(5);
        let a = mesh.world_position(mesh.vertex_index(1, 3));
        let b = mesh.world_position(mesh.vertex_index(2, 3));
        let midpoint = (a + b) * 0.5;

        assert!(adapter.hits_to_cells(&mesh, midpoint, 0.5).is_empty());
        assert_eq!(
            adapter.hits_to_cells(&mesh, midpoint, 0.6),
            vec![(1, 3), (2, 3)]
        );
    }

    #[test]
    fn test_wide_radius_collects_neighbourhood() {
        let (_, adapter, mesh) = setup(7);
        let mut cells = adapter.hits_to_cells(&mesh, Vec3::ZERO, 1.01);
        cells.sort();
        assert_eq!(cells, vec![(2, 3), (3, 2), (3, 3), (3, 4), (4, 3)]);
    }

    proptest! {
        #[test]
        fn grid_mesh_round_trip(n in (1usize..30).prop_map(|k| 2 * k + 1), i in 0usize..61, j in 0usize..61) {
            let (_, adapter, mesh) = setup(n);
            let (i, j) = (i % n, j % n);
            let [vx, vy, _] = mesh.vertices[mesh.vertex_index(i, j)].position;
            let cell = adapter.mesh_to_grid(vx as f64, vy as f64);
            prop_assert_eq!(cell, Some((i, j)));
            let (mx, my) = adapter.grid_to_mesh(i, j);
            prop_assert!((mx - vx as f64).abs() < 1e-4);
            prop_assert!((my - vy as f64).abs() < 1e-4);
        }
    }
}
