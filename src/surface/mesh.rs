//! Deformable plane mesh for the water surface
//!
//! The mesh lives in its own local frame: a flat `Lx × Ly` plane centered on
//! the origin with `z` as elevation. The model matrix lays it down so local
//! elevation becomes world up.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};

use crate::consts::MAX_NODES;
use crate::renderer::Vertex;
use crate::sim::SolverParams;

/// Plane grid with one vertex per simulation node
pub struct SurfaceMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Vertices per row (along local x)
    nx: usize,
    /// Rows (along local y)
    ny: usize,
    dx: f32,
    dy: f32,
    model: Mat4,
    normals_dirty: bool,
}

impl SurfaceMesh {
    /// Flat mesh with `(nx-1) × (ny-1)` segments matching the solver grid.
    /// `params` must have passed [`SolverParams::validate`], which bounds the
    /// vertex count to `MAX_NODES` so `u32` indices cannot truncate.
    pub fn new(params: &SolverParams) -> Self {
        let (nx, ny) = (params.nx, params.ny);
        debug_assert!(
            nx.checked_mul(ny).is_some_and(|n| n <= MAX_NODES),
            "mesh of {nx}x{ny} vertices exceeds u32 index range"
        );
        let (dx, dy) = (params.dx as f32, params.dy as f32);
        let half_x = (nx - 1) as f32 * dx / 2.0;
        let half_y = (ny - 1) as f32 * dy / 2.0;

        let mut vertices = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                vertices.push(Vertex::new(
                    i as f32 * dx - half_x,
                    j as f32 * dy - half_y,
                    0.0,
                ));
            }
        }

        // Counter-clockwise seen from +z
        let mut indices = Vec::with_capacity((nx - 1) * (ny - 1) * 6);
        for j in 0..ny - 1 {
            for i in 0..nx - 1 {
                let a = (j * nx + i) as u32;
                let b = a + 1;
                let c = a + nx as u32;
                let d = c + 1;
                indices.extend_from_slice(&[a, b, c, b, d, c]);
            }
        }

        Self {
            vertices,
            indices,
            nx,
            ny,
            dx,
            dy,
            model: Mat4::from_rotation_x(-FRAC_PI_2),
            normals_dirty: false,
        }
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    pub fn spacing(&self) -> (f32, f32) {
        (self.dx, self.dy)
    }

    /// Half extents along local x and y
    pub fn half_extent(&self) -> (f32, f32) {
        (
            (self.nx - 1) as f32 * self.dx / 2.0,
            (self.ny - 1) as f32 * self.dy / 2.0,
        )
    }

    /// Whether a local `(x, y)` lies on the plane
    pub fn contains_local(&self, x: f32, y: f32) -> bool {
        let (hx, hy) = self.half_extent();
        x.abs() <= hx && y.abs() <= hy
    }

    #[inline]
    pub fn vertex_index(&self, i: usize, j: usize) -> usize {
        j * self.nx + i
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.model
    }

    /// Vertex position after the model transform
    pub fn world_position(&self, index: usize) -> Vec3 {
        self.model
            .transform_point3(Vec3::from_array(self.vertices[index].position))
    }

    /// World point expressed in the mesh frame
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        self.model.inverse().transform_point3(world)
    }

    pub fn set_elevation(&mut self, i: usize, j: usize, z: f32) {
        let idx = self.vertex_index(i, j);
        self.vertices[idx].position[2] = z;
    }

    pub fn elevation(&self, i: usize, j: usize) -> f32 {
        self.vertices[self.vertex_index(i, j)].position[2]
    }

    pub fn mark_normals_dirty(&mut self) {
        self.normals_dirty = true;
    }

    pub fn normals_dirty(&self) -> bool {
        self.normals_dirty
    }

    /// Recompute vertex normals if heights changed. Returns true when work
    /// was done.
    pub fn update_normals(&mut self) -> bool {
        if !self.normals_dirty {
            return false;
        }
        self.recompute_normals();
        self.normals_dirty = false;
        true
    }

    /// Area-weighted average of adjacent face normals
    fn recompute_normals(&mut self) {
        let mut sums = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let pa = Vec3::from_array(self.vertices[a].position);
            let pb = Vec3::from_array(self.vertices[b].position);
            let pc = Vec3::from_array(self.vertices[c].position);
            // Unnormalized cross product is proportional to triangle area
            let face = (pb - pa).cross(pc - pa);
            sums[a] += face;
            sums[b] += face;
            sums[c] += face;
        }
        for (vertex, sum) in self.vertices.iter_mut().zip(sums) {
            vertex.normal = sum.try_normalize().unwrap_or(Vec3::Z).to_array();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh(n: usize) -> SurfaceMesh {
        SurfaceMesh::new(&SolverParams::new(n, n, 1.0, 1.0, 1.0, 0.2, 0.0))
    }

    #[test]
    fn test_plane_layout() {
        let m = mesh(5);
        assert_eq!(m.vertices.len(), 25);
        assert_eq!(m.indices.len(), 4 * 4 * 6);
        assert_eq!(m.vertices[0].position, [-2.0, -2.0, 0.0]);
        assert_eq!(m.vertices[m.vertex_index(2, 2)].position, [0.0, 0.0, 0.0]);
        assert_eq!(m.half_extent(), (2.0, 2.0));
    }

    #[test]
    fn test_elevation_maps_to_world_up() {
        let mut m = mesh(5);
        m.set_elevation(2, 2, 3.0);
        let world = m.world_position(m.vertex_index(2, 2));
        assert!((world - Vec3::new(0.0, 3.0, 0.0)).length() < 1e-5);

        // Local +y runs along world -z
        let corner = m.world_position(m.vertex_index(2, 4));
        assert!((corner - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5);
        assert!((m.to_local(corner) - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_flat_normals_point_up() {
        let mut m = mesh(5);
        m.mark_normals_dirty();
        assert!(m.update_normals());
        assert!(!m.update_normals());
        for v in &m.vertices {
            assert!((Vec3::from_array(v.normal) - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_normals_tilt_away_from_bump() {
        let mut m = mesh(5);
        m.set_elevation(2, 2, 1.0);
        m.mark_normals_dirty();
        m.update_normals();
        // Vertex to the +x side of the bump leans toward +x
        let n = Vec3::from_array(m.vertices[m.vertex_index(3, 2)].normal);
        assert!(n.x > 0.0);
        assert!(n.z > 0.0);
        assert!((n.length() - 1.0).abs() < 1e-5);
    }
}
