//! Vertex and uniform types for the surface pipeline

use bytemuck::{Pod, Zeroable};

/// Surface vertex in mesh-local coordinates (z is elevation)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
            normal: [0.0, 0.0, 1.0],
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Per-frame scene uniforms. Layout matches `SceneUniforms` in surface.wgsl
/// (vec3 fields padded to 16 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// rgb + intensity
    pub ambient: [f32; 4],
    /// rgb + intensity
    pub light_color: [f32; 4],
    /// Direction the light travels, xyz + padding
    pub light_dir: [f32; 4],
    /// rgb + alpha
    pub material: [f32; 4],
}

/// `0xRRGGBB` to linear-ish rgb in [0, 1]
pub const fn hex_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Scene colors
pub mod colors {
    use super::hex_rgb;

    pub const WATER: [f32; 3] = hex_rgb(0x1a368a);
    pub const AMBIENT: [f32; 3] = hex_rgb(0xffffff);
    pub const SUN: [f32; 3] = hex_rgb(0xbfb58f);
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    pub const AMBIENT_INTENSITY: f32 = 0.5;
    pub const SUN_INTENSITY: f32 = 1.0;
}
