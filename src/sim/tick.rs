//! Per-frame driver
//!
//! Applies one frame of player commands to the world and, unless paused,
//! advances the simulation by one step.

use glam::Vec2;

use super::engine::StepStats;
use super::world::{ForceMode, World};
use crate::consts::*;

/// Commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Add a batch of bodies near the centre
    pub add_batch: bool,
    /// Remove a batch of random bodies
    pub remove_batch: bool,
    /// Switch collision strategy
    pub toggle_strategy: bool,
    /// Pause toggle
    pub toggle_pause: bool,
    /// Raise / lower the time scale by one notch
    pub speed_up: bool,
    pub slow_down: bool,
    /// Pointer position in world coordinates
    pub pointer: Option<Vec2>,
    /// Push bodies away from the pointer (held)
    pub push: bool,
    /// Pull bodies toward the pointer (held)
    pub pull: bool,
}

/// Frame-to-frame state of the interactive session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Session {
    pub paused: bool,
    pub time_scale: f32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            paused: false,
            time_scale: 1.0,
        }
    }
}

impl Session {
    pub fn speed_up(&mut self) {
        self.time_scale = (self.time_scale + TIME_SCALE_STEP).min(TIME_SCALE_MAX);
    }

    pub fn slow_down(&mut self) {
        self.time_scale = (self.time_scale - TIME_SCALE_STEP).max(TIME_SCALE_MIN);
    }
}

/// Apply one frame of input and step the world
///
/// Structural commands and the strategy toggle apply even while paused;
/// pointer forces and the step itself do not. Returns the step's stats, or
/// `None` if the session is paused.
pub fn tick(world: &mut World, session: &mut Session, input: &TickInput) -> Option<StepStats> {
    if input.toggle_pause {
        session.paused = !session.paused;
        log::info!("{}", if session.paused { "Paused" } else { "Resumed" });
    }
    if input.speed_up {
        session.speed_up();
    }
    if input.slow_down {
        session.slow_down();
    }

    if input.add_batch {
        for _ in 0..BATCH_SIZE {
            world.add_body();
        }
        log::debug!("Added {} bodies, {} total", BATCH_SIZE, world.len());
    }
    if input.remove_batch {
        for _ in 0..BATCH_SIZE {
            if world.remove_body().is_none() {
                break;
            }
        }
        log::debug!("Removed up to {} bodies, {} left", BATCH_SIZE, world.len());
    }
    if input.toggle_strategy {
        world.toggle_strategy();
    }

    if session.paused {
        return None;
    }

    if let Some(pointer) = input.pointer {
        if input.push {
            world.apply_point_force(pointer, PUSH_RADIUS, PUSH_STRENGTH, ForceMode::Repel);
        }
        if input.pull {
            world.apply_point_force(pointer, PULL_RADIUS, PULL_STRENGTH, ForceMode::Attract);
        }
    }

    Some(world.step(session.time_scale))
}
