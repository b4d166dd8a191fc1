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

    /// Byte stride of one vertex in a buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// Colors for simulation elements
pub mod colors {
    pub const BODY: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const BODY_COLLIDED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const TREE_OUTLINE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const HUD_TEXT: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_tightly_packed() {
        assert_eq!(Vertex::STRIDE, 6 * 4);
        let verts = [Vertex::new(1.0, 2.0, colors::BODY); 2];
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), 2 * Vertex::STRIDE);
    }
}
