//! Quadsim - thousands of circles bouncing inside a bounded 2D arena
//!
//! Core modules:
//! - `sim`: Simulation core (bodies, quadrant tree, collision passes, world)
//! - `input`: Discrete input events folded into per-frame commands
//! - `render`: Drawing seam for an external renderer
//! - `settings`: Data-driven configuration
//! - `error`: Error types

pub mod error;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SimError};
pub use settings::SimConfig;
pub use sim::{BodyKey, CollisionStrategy, ForceMode, Session, StepStats, TickInput, World, tick};

/// Simulation configuration constants
pub mod consts {
    /// Default arena dimensions
    pub const ARENA_WIDTH: u32 = 1200;
    pub const ARENA_HEIGHT: u32 = 800;

    /// Default body population
    pub const INITIAL_BODIES: usize = 5000;
    pub const BODY_RADIUS: u32 = 2;

    /// Quadrant tree tuning
    pub const SPLIT_THRESHOLD: usize = 4;
    pub const MERGE_THRESHOLD: usize = 8;
    pub const MAX_DEPTH: u32 = 100;

    /// Velocity multiplier applied to both bodies after every resolution
    pub const DECAY_FACTOR: f32 = 0.92;
    /// Fraction of a body's radius it may drift before the index is stale
    pub const STALE_FRACTION: f32 = 0.5;

    /// Time scale limits
    pub const TIME_SCALE_MIN: f32 = 0.1;
    pub const TIME_SCALE_MAX: f32 = 3.0;
    pub const TIME_SCALE_STEP: f32 = 0.1;

    /// Bodies added or removed per batch command
    pub const BATCH_SIZE: usize = 100;
    /// Half-width of the square bodies are spawned into around the centre
    pub const SPAWN_SPREAD: i32 = 100;

    /// Pointer interaction
    pub const PUSH_RADIUS: f32 = 100.0;
    pub const PUSH_STRENGTH: f32 = 10.0;
    pub const PULL_RADIUS: f32 = 150.0;
    pub const PULL_STRENGTH: f32 = 10.0;

    /// Headless run length in frames
    pub const DEFAULT_FRAMES: u32 = 600;
}
