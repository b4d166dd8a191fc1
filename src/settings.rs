//! Simulation configuration
//!
//! Loaded from an optional JSON file; any field left out keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::QuadtreeParams;

/// World and index tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Arena size in world units
    pub width: u32,
    pub height: u32,

    /// Bodies scattered at startup
    pub initial_bodies: usize,
    /// Radius of every spawned body
    pub body_radius: u32,
    /// RNG seed (random if absent)
    pub seed: Option<u64>,

    // === Quadrant tree ===
    pub split_threshold: usize,
    pub merge_threshold: usize,
    pub max_depth: u32,

    /// Frames to run in headless mode
    pub frames: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            initial_bodies: INITIAL_BODIES,
            body_radius: BODY_RADIUS,
            seed: None,
            split_threshold: SPLIT_THRESHOLD,
            merge_threshold: MERGE_THRESHOLD,
            max_depth: MAX_DEPTH,
            frames: DEFAULT_FRAMES,
        }
    }
}

impl SimConfig {
    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON config string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "arena must have a non-zero size, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > i32::MAX as u32 || self.height > i32::MAX as u32 {
            return Err(ConfigError::Invalid("arena is too large".into()));
        }
        if self.body_radius == 0 {
            return Err(ConfigError::Invalid("body_radius must be positive".into()));
        }
        if self.body_radius > self.width.min(self.height) / 2 {
            return Err(ConfigError::Invalid(format!(
                "body_radius {} does not fit a {}x{} arena",
                self.body_radius, self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn quadtree_params(&self) -> QuadtreeParams {
        QuadtreeParams {
            split_threshold: self.split_threshold,
            merge_threshold: self.merge_threshold,
            max_depth: self.max_depth,
        }
    }
}
