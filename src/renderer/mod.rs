//! Rendering seam
//!
//! The simulation never draws. A platform renderer implements [`Canvas`] and
//! [`draw_world`] tells it what to put on screen after each step.

pub mod shapes;
pub mod vertex;

use glam::Vec2;

use crate::sim::{BodyKey, CollisionStrategy, Quadtree, Session, World};
pub use vertex::{Vertex, colors};

/// Drawing primitives supplied by the platform
pub trait Canvas {
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]);
    fn draw_line(&mut self, a: Vec2, b: Vec2, color: [f32; 4]);
    fn draw_text(&mut self, pos: Vec2, text: &str, color: [f32; 4]);
}

/// HUD counter lines, top to bottom
pub fn hud_lines(world: &World, session: &Session) -> [String; 2] {
    [
        format!("Total Balls: {}", world.len()),
        format!("Time Scale: {:.1}x", session.time_scale),
    ]
}

/// Draw bodies, the index outline (indexed mode only) and the HUD
pub fn draw_world(world: &World, session: &Session, canvas: &mut impl Canvas) {
    for body in world.bodies() {
        let color = if body.collided() {
            colors::BODY_COLLIDED
        } else {
            colors::BODY
        };
        canvas.draw_circle(body.pos(), body.radius(), color);
    }

    if world.strategy() == CollisionStrategy::Indexed {
        world.index().tree().for_each_node(&mut |node: &Quadtree<BodyKey>| {
            let [a, b, c, d] = node.bounds().corners();
            canvas.draw_line(a, b, colors::TREE_OUTLINE);
            canvas.draw_line(b, c, colors::TREE_OUTLINE);
            canvas.draw_line(c, d, colors::TREE_OUTLINE);
            canvas.draw_line(d, a, colors::TREE_OUTLINE);
        });
    }

    let arena = world.arena();
    let right = arena.width as f32 - 10.0;
    for (i, line) in hud_lines(world, session).iter().enumerate() {
        canvas.draw_text(Vec2::new(right, 10.0 + i as f32 * 45.0), line, colors::HUD_TEXT);
    }
}

/// Canvas that tessellates into vertex lists for a GPU backend
#[derive(Debug, Default)]
pub struct VertexCanvas {
    /// Filled shapes, triangle list
    pub triangles: Vec<Vertex>,
    /// Outlines, line list
    pub lines: Vec<Vertex>,
    /// Text is left to the platform's font renderer
    pub text: Vec<(Vec2, String)>,
}

impl VertexCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.triangles.clear();
        self.lines.clear();
        self.text.clear();
    }

    /// Triangle data ready for upload
    pub fn triangle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }

    pub fn line_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.lines)
    }
}

impl Canvas for VertexCanvas {
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        if radius <= 0.0 {
            return;
        }
        let segments = shapes::circle_segments(radius);
        self.triangles
            .extend(shapes::circle(center, radius, color, segments));
    }

    fn draw_line(&mut self, a: Vec2, b: Vec2, color: [f32; 4]) {
        self.lines.extend(shapes::line(a, b, color));
    }

    fn draw_text(&mut self, pos: Vec2, text: &str, _color: [f32; 4]) {
        self.text.push((pos, text.to_string()));
    }
}
