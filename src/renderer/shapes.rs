//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Segments used for a circle of the given on-screen radius
pub fn circle_segments(radius: f32) -> u32 {
    ((radius * 2.0) as u32).clamp(6, 48)
}

/// Generate vertices for a filled circle (triangle list)
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a line segment (line list)
pub fn line(a: Vec2, b: Vec2, color: [f32; 4]) -> [Vertex; 2] {
    [Vertex::new(a.x, a.y, color), Vertex::new(b.x, b.y, color)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertices_on_rim() {
        let center = Vec2::new(5.0, 5.0);
        let verts = circle(center, 2.0, [1.0; 4], 8);
        assert_eq!(verts.len(), 24);
        for tri in verts.chunks(3) {
            assert_eq!(tri[0].position, [5.0, 5.0]);
            for v in &tri[1..] {
                let d = Vec2::from(v.position).distance(center);
                assert!((d - 2.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_segment_count_bounds() {
        assert_eq!(circle_segments(0.5), 6);
        assert_eq!(circle_segments(100.0), 48);
    }
}
