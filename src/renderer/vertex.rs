//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
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
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Attach an alpha channel to an RGB color
#[inline]
pub const fn rgba(rgb: [f32; 3], alpha: f32) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], alpha]
}

/// Colors for game elements (sRGB)
pub mod colors {
    use crate::hex_rgb;

    pub const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
    /// Core cutout (slate-950)
    pub const CORE: [f32; 3] = hex_rgb(0x020617);
    /// Hub dot at low levels (slate-800)
    pub const HUB_DOT: [f32; 3] = hex_rgb(0x1E293B);
    /// Hexagon hub fill and ring (slate-600)
    pub const HUB_STEEL: [f32; 3] = hex_rgb(0x475569);
    /// Hexagon hub edge and indicator outline (slate-400)
    pub const HUB_EDGE: [f32; 3] = hex_rgb(0x94A3B8);
    /// Glowing hub at high levels (sky-400)
    pub const HUB_GLOW: [f32; 3] = hex_rgb(0x38BDF8);
    /// Square tier core frame (pink-400)
    pub const CORE_FRAME: [f32; 3] = hex_rgb(0xF472B6);
    /// Target indicator, mid levels (slate-200)
    pub const INDICATOR_MID: [f32; 3] = hex_rgb(0xE2E8F0);
    /// Target indicator, high levels (sky-100)
    pub const INDICATOR_HIGH: [f32; 3] = hex_rgb(0xE0F2FE);

    /// Background per level, cycling
    pub const LEVEL_THEMES: [[f32; 3]; 7] = [
        hex_rgb(0x0F172A), // slate-900
        hex_rgb(0x1E1B4B), // indigo-950
        hex_rgb(0x4C0519), // rose-950
        hex_rgb(0x022C22), // emerald-950
        hex_rgb(0x083344), // cyan-950
        hex_rgb(0x451A03), // amber-950
        hex_rgb(0x4A044E), // fuchsia-950
    ];
    /// Background after a mismatch (red-950)
    pub const GAME_OVER: [f32; 3] = hex_rgb(0x450A0A);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_stride() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(Vertex::desc().array_stride, 24);
    }

    #[test]
    fn test_rgba() {
        assert_eq!(rgba([0.1, 0.2, 0.3], 0.5), [0.1, 0.2, 0.3, 0.5]);
    }
}
