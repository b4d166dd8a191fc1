//! Circular bodies and the arena that bounds them
//!
//! A body is a point mass with a fixed integer radius. Its centre always stays
//! at least one radius away from every arena wall.

use glam::Vec2;

use crate::consts::DECAY_FACTOR;

/// The bounded world all bodies live in, anchored at the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arena {
    pub width: u32,
    pub height: u32,
}

impl Arena {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Arena centre
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    /// Clamp a centre position so a circle of `radius` stays inside the walls
    pub fn clamp_center(&self, pos: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            clamp_axis(pos.x, radius, self.width as f32),
            clamp_axis(pos.y, radius, self.height as f32),
        )
    }
}

// Not f32::clamp: a radius wider than half the arena must not panic.
#[inline]
fn clamp_axis(value: f32, radius: f32, extent: f32) -> f32 {
    if value < radius {
        radius
    } else if value > extent - radius {
        extent - radius
    } else {
        value
    }
}

/// A simulated circle
#[derive(Debug, Clone)]
pub struct Body {
    pos: Vec2,
    /// Position at the start of the last `advance`
    prev_pos: Vec2,
    vel: Vec2,
    radius: u32,
    /// Set when the body took part in a collision; read by the renderer
    collided: bool,
}

impl Body {
    /// Create a body, clamping its position into the arena
    pub fn new(pos: Vec2, vel: Vec2, radius: u32, arena: Arena) -> Self {
        let pos = arena.clamp_center(pos, radius as f32);
        Self {
            pos,
            prev_pos: pos,
            vel,
            radius,
            collided: false,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn prev_pos(&self) -> Vec2 {
        self.prev_pos
    }

    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius as f32
    }

    #[inline]
    pub fn collided(&self) -> bool {
        self.collided
    }

    /// Distance covered during the last `advance`
    pub fn displacement(&self) -> Vec2 {
        self.pos - self.prev_pos
    }

    /// Integrate one step and reflect off the walls
    ///
    /// Wall bounces are perfectly elastic: the position is clamped to the wall
    /// (offset by the radius) and the matching velocity component flips sign.
    pub fn advance(&mut self, arena: Arena, time_scale: f32) {
        self.prev_pos = self.pos;
        self.pos += self.vel * time_scale;

        let r = self.radius();
        let (w, h) = (arena.width as f32, arena.height as f32);

        if self.pos.x - r < 0.0 {
            self.pos.x = r;
            self.vel.x = -self.vel.x;
        } else if self.pos.x + r > w {
            self.pos.x = w - r;
            self.vel.x = -self.vel.x;
        }

        if self.pos.y - r < 0.0 {
            self.pos.y = r;
            self.vel.y = -self.vel.y;
        } else if self.pos.y + r > h {
            self.pos.y = h - r;
            self.vel.y = -self.vel.y;
        }
    }

    /// Whether the two circles overlap (touching does not count)
    #[inline]
    pub fn collides_with(&self, other: &Body) -> bool {
        let radius_sum = self.radius() + other.radius();
        self.pos.distance_squared(other.pos) < radius_sum * radius_sum
    }

    /// Equal-mass elastic response along the contact normal
    ///
    /// Exchanges the normal components of velocity, damps both velocities by
    /// [`DECAY_FACTOR`], then pushes the pair apart by half the penetration
    /// each. Both the exchange and the separation are scaled by `time_scale`.
    pub fn resolve_collision(&mut self, other: &mut Body, time_scale: f32) {
        let mut delta = other.pos - self.pos;
        let mut distance = delta.length();

        // Coincident centres: fall back to the x axis
        if distance == 0.0 {
            delta = Vec2::X;
            distance = 1.0;
        }

        let normal = delta / distance;

        let dot = self.vel.dot(normal);
        let other_dot = other.vel.dot(normal);

        self.vel += (other_dot - dot) * normal * time_scale;
        other.vel += (dot - other_dot) * normal * time_scale;

        self.vel *= DECAY_FACTOR;
        other.vel *= DECAY_FACTOR;

        let overlap = (self.radius() + other.radius() - distance) / 2.0;
        self.pos -= overlap * normal * time_scale;
        other.pos += overlap * normal * time_scale;
    }

    /// Add an impulse straight to the velocity (unbounded)
    #[inline]
    pub fn move_by_force(&mut self, force: Vec2) {
        self.vel += force;
    }

    #[inline]
    pub fn set_collided(&mut self, state: bool) {
        self.collided = state;
    }
}
