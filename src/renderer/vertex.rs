//! Vertex types for 2D rendering
//!
//! Shapes are built in playfield units: an 800 x 600 field with the origin
//! at the top-left corner and y growing downward, the same space the
//! simulation uses. `to_clip_space` is applied once per frame just before
//! upload, so the shader receives clip-space positions and only passes
//! them through.

use bytemuck::{Pod, Zeroable};

use super::pipeline::playfield_to_ndc;

/// One corner of a filled triangle. Layout matches `shader.wgsl`'s
/// `VertexInput`: location 0 is the position, location 1 the color.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Playfield units while tessellating, clip space once uploaded
    pub position: [f32; 2],
    /// RGBA in 0..=1, straight alpha
    pub color: [f32; 4],
}

impl Vertex {
    /// Vertex at playfield position `(x, y)`
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Map a playfield-unit vertex into clip space, keeping its color
    pub fn to_clip_space(self) -> Self {
        Self {
            position: playfield_to_ndc(self.position[0], self.position[1]),
            color: self.color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const PLATFORM: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
    pub const GOAL: [f32; 4] = [0.0, 0.8, 0.0, 1.0];
    pub const OBSTACLE: [f32; 4] = [0.9, 0.1, 0.1, 1.0];
    pub const MOVING_OBSTACLE: [f32; 4] = [1.0, 0.55, 0.0, 1.0];
    pub const COLLECTIBLE: [f32; 4] = [1.0, 0.84, 0.0, 1.0]; // Gold
    pub const BALL: [f32; 4] = [0.1, 0.3, 0.95, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_space_flips_y() {
        let top_left = Vertex::new(0.0, 0.0, colors::BALL).to_clip_space();
        assert_eq!(top_left.position, [-1.0, 1.0]);
        assert_eq!(top_left.color, colors::BALL);

        let bottom_right = Vertex::new(800.0, 600.0, colors::GOAL).to_clip_space();
        assert_eq!(bottom_right.position, [1.0, -1.0]);
    }

    #[test]
    fn test_layout_matches_struct() {
        let layout = Vertex::desc();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes[1].offset, 8);
    }
}
