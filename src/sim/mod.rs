//! Simulation module
//!
//! Everything that moves bodies lives here. This module must stay free of
//! rendering and platform dependencies:
//! - Seeded RNG only
//! - Every per-body pass walks bodies in insertion order
//! - One step completes fully before anyone reads body state

pub mod body;
pub mod engine;
pub mod index;
pub mod quadtree;
pub mod tick;
pub mod world;

pub use body::{Arena, Body};
pub use engine::{CollisionStrategy, StepStats, resolve_brute_force, resolve_indexed};
pub use index::{IndexView, SpatialIndex};
pub use quadtree::{Extent, Quadrant, Quadtree, QuadtreeParams, Rect, Restructure, classify};
pub use tick::{Session, TickInput, tick};
pub use world::{BodyKey, ForceMode, World};
