//! Perspective camera and pointer picking

use glam::{Mat4, Vec2, Vec3};

use crate::consts::*;
use crate::surface::SurfaceMesh;

/// Ray in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub dir: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Distance along the ray to the horizontal plane `y = height`
    pub fn hit_horizontal(&self, height: f32) -> Option<f32> {
        if self.dir.y.abs() < 1e-6 {
            return None;
        }
        let t = (height - self.origin.y) / self.dir.y;
        (t > 0.0).then_some(t)
    }
}

/// Fixed camera looking at the surface center
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Vec3::from_array(CAMERA_EYE),
            target: Vec3::ZERO,
            fov_y: CAMERA_FOV_DEGREES.to_radians(),
            aspect,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }

    /// Update aspect from a viewport size; zero-sized viewports are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn proj_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_proj_matrix(&self) -> Mat4 {
        self.proj_matrix() * self.view_matrix()
    }

    /// World ray through a point in normalized device coordinates
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv_vp = self.view_proj_matrix().inverse();
        let near = inv_vp.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inv_vp.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray {
            origin: near,
            dir: (far - near).normalize(),
        }
    }

    /// Point where the pointer ray meets the displaced surface, if it does.
    ///
    /// Starts from the undisturbed plane and re-intersects at the elevation
    /// of the nearest vertex until the hit settles.
    pub fn pick_surface(&self, ndc: Vec2, mesh: &SurfaceMesh) -> Option<Vec3> {
        let ray = self.ray_from_ndc(ndc);
        let mut height = 0.0;
        let mut hit = None;
        for _ in 0..4 {
            let point = ray.at(ray.hit_horizontal(height)?);
            let local = mesh.to_local(point);
            if !mesh.contains_local(local.x, local.y) {
                return None;
            }
            hit = Some(point);
            let next = nearest_elevation(mesh, local.x, local.y);
            if (next - height).abs() < 1e-3 {
                break;
            }
            height = next;
        }
        hit
    }
}

/// Elevation of the vertex closest to a local in-plane position
fn nearest_elevation(mesh: &SurfaceMesh, x: f32, y: f32) -> f32 {
    let (hx, hy) = mesh.half_extent();
    let (sx, sy) = mesh.spacing();
    let (nx, ny) = mesh.dims();
    let i = (((x + hx) / sx).round().max(0.0) as usize).min(nx - 1);
    let j = (((y + hy) / sy).round().max(0.0) as usize).min(ny - 1);
    mesh.elevation(i, j)
}

/// Pixel offset inside a `width × height` viewport to NDC (y up)
pub fn screen_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(2.0 * x / width - 1.0, 1.0 - 2.0 * y / height)
}
