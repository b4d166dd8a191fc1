//! The simulated world
//!
//! Owns every body, the spatial index and the collision strategy, and exposes
//! the command surface the frame driver uses.
//!
//! Bodies live in a slot map so their keys survive unrelated removals. Any
//! add or remove bumps the collection generation, which invalidates the index
//! until the next rebuild.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use slotmap::{SecondaryMap, SlotMap, new_key_type};

use super::body::{Arena, Body};
use super::engine::{self, CollisionStrategy, StepStats};
use super::index::SpatialIndex;
use super::quadtree::{QuadtreeParams, Rect};
use crate::consts::{SPAWN_SPREAD, STALE_FRACTION};
use crate::error::{ConfigError, SimError};
use crate::settings::SimConfig;

new_key_type! {
    /// Stable handle to a body
    pub struct BodyKey;
}

/// Direction of a point force
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceMode {
    /// Pull bodies toward the point
    Attract,
    /// Push bodies away from the point
    Repel,
}

/// All bodies plus the machinery that moves them
#[derive(Debug)]
pub struct World {
    arena: Arena,
    body_radius: u32,
    bodies: SlotMap<BodyKey, Body>,
    /// Insertion order, used for iteration and drawing
    order: Vec<BodyKey>,
    index: SpatialIndex,
    strategy: CollisionStrategy,
    /// Set when some body drifted too far since the last rebuild
    index_stale: bool,
    /// Positions at the last rebuild
    anchors: SecondaryMap<BodyKey, Vec2>,
    /// Bumped on every add/remove
    generation: u64,
    rng: Pcg32,
}

impl World {
    /// Empty world from a validated configuration
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let arena = Arena::new(config.width, config.height);
        let bounds = Rect::new(0, 0, config.width as i32, config.height as i32);
        let seed = config.seed.unwrap_or_else(rand::random);

        log::info!(
            "World {}x{} created (seed {}, split {}, merge {}, max depth {})",
            arena.width,
            arena.height,
            seed,
            config.split_threshold,
            config.merge_threshold,
            config.max_depth
        );

        Ok(Self {
            arena,
            body_radius: config.body_radius,
            bodies: SlotMap::with_key(),
            order: Vec::new(),
            index: SpatialIndex::new(bounds, config.quadtree_params()),
            strategy: CollisionStrategy::default(),
            index_stale: true,
            anchors: SecondaryMap::new(),
            generation: 0,
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    /// World filled with `config.initial_bodies` random bodies
    pub fn populated(config: &SimConfig) -> Result<Self, ConfigError> {
        let mut world = Self::new(config)?;
        world.populate(config.initial_bodies);
        Ok(world)
    }

    /// Scatter `count` bodies uniformly over the arena
    pub fn populate(&mut self, count: usize) {
        for _ in 0..count {
            let x = self.rng.random_range(0..self.arena.width) as f32;
            let y = self.rng.random_range(0..self.arena.height) as f32;
            let vx = (self.rng.random_range(0..10) - 5) as f32 / 2.0;
            let vy = (self.rng.random_range(0..10) - 5) as f32 / 2.0;
            self.spawn(Vec2::new(x, y), Vec2::new(vx, vy), self.body_radius);
        }
        log::debug!("Populated {} bodies ({} total)", count, self.len());
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn strategy(&self) -> CollisionStrategy {
        self.strategy
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Whether the next indexed step will rebuild the index
    pub fn is_index_stale(&self) -> bool {
        self.index_stale || !self.index.is_valid_for(self.generation)
    }

    pub fn body(&self, key: BodyKey) -> Option<&Body> {
        self.bodies.get(key)
    }

    pub fn keys(&self) -> &[BodyKey] {
        &self.order
    }

    /// Bodies in insertion order
    pub fn bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.order.iter().filter_map(|&key| self.bodies.get(key))
    }

    /// Add a body at an explicit position (clamped into the arena)
    pub fn spawn(&mut self, pos: Vec2, vel: Vec2, radius: u32) -> BodyKey {
        let key = self.bodies.insert(Body::new(pos, vel, radius, self.arena));
        self.order.push(key);
        self.structure_changed();
        key
    }

    /// Add a body near the arena centre with a random velocity
    pub fn add_body(&mut self) -> BodyKey {
        let offset = Vec2::new(
            self.rng.random_range(-SPAWN_SPREAD..SPAWN_SPREAD) as f32,
            self.rng.random_range(-SPAWN_SPREAD..SPAWN_SPREAD) as f32,
        );
        // Deliberately skewed toward positive velocities
        let vel = Vec2::new(
            (self.rng.random_range(0..20) - 5) as f32 / 2.0,
            (self.rng.random_range(0..20) - 5) as f32 / 2.0,
        );
        self.spawn(self.arena.center() + offset, vel, self.body_radius)
    }

    /// Remove a random body
    pub fn remove_body(&mut self) -> Option<Body> {
        if self.order.is_empty() {
            log::info!("No bodies to remove");
            return None;
        }
        let i = self.rng.random_range(0..self.order.len());
        let key = self.order[i];
        self.remove(key)
    }

    /// Remove a specific body
    pub fn remove(&mut self, key: BodyKey) -> Option<Body> {
        let body = self.bodies.remove(key)?;
        if let Some(i) = self.order.iter().position(|&k| k == key) {
            self.order.remove(i);
        }
        self.anchors.remove(key);
        self.structure_changed();
        Some(body)
    }

    /// Switch between indexed and brute-force collision detection
    pub fn toggle_strategy(&mut self) -> CollisionStrategy {
        self.strategy = self.strategy.toggled();
        if self.strategy == CollisionStrategy::Indexed {
            self.index_stale = true;
        }
        log::info!("Switched to {} collision detection", self.strategy.as_str());
        self.strategy
    }

    /// Add a radial impulse to every body within `radius` of `point`
    ///
    /// Bodies exactly at the point are left alone. Returns how many bodies
    /// were affected.
    pub fn apply_point_force(&mut self, point: Vec2, radius: f32, strength: f32, mode: ForceMode) -> usize {
        let mut affected = 0;
        for &key in &self.order {
            let Some(body) = self.bodies.get_mut(key) else {
                continue;
            };
            let delta = match mode {
                ForceMode::Repel => body.pos() - point,
                ForceMode::Attract => point - body.pos(),
            };
            let distance = delta.length();
            if distance < radius && distance > 0.0 {
                body.move_by_force(delta / distance * strength);
                affected += 1;
            }
        }
        affected
    }

    /// Broad-phase candidates for one body against the current index
    pub fn candidates(&self, key: BodyKey) -> Result<Vec<BodyKey>, SimError> {
        let body = self.bodies.get(key).ok_or(SimError::UnknownBody)?;
        let view = self.index.view(self.generation).ok_or(SimError::StaleIndex {
            built: self.index.built_for(),
            current: self.generation,
        })?;
        Ok(view.retrieve(body))
    }

    /// Advance the simulation one step
    ///
    /// Rebuilds the index if needed, resolves collisions with the active
    /// strategy, then integrates every body and decides whether the index
    /// will be stale next step.
    pub fn step(&mut self, time_scale: f32) -> StepStats {
        let mut stats = StepStats {
            strategy: self.strategy,
            ..StepStats::default()
        };

        match self.strategy {
            CollisionStrategy::Indexed => {
                if self.is_index_stale() {
                    self.rebuild_index();
                    stats.rebuilt = true;
                }
                match self.index.view(self.generation) {
                    Some(view) => {
                        engine::resolve_indexed(&mut self.bodies, &self.order, view, time_scale, &mut stats)
                    }
                    None => log::warn!("Index unusable after rebuild, skipping collisions"),
                }
            }
            CollisionStrategy::BruteForce => {
                engine::resolve_brute_force(&mut self.bodies, &self.order, time_scale, &mut stats);
            }
        }

        self.integrate(time_scale);

        log::trace!(
            "Step ({}): {} tests, {} resolutions, rebuilt {}",
            stats.strategy.as_str(),
            stats.tests,
            stats.resolutions,
            stats.rebuilt
        );
        stats
    }

    /// Build the index from current positions and reset collision flags
    pub fn rebuild_index(&mut self) {
        self.index.rebuild(self.generation, &self.bodies, &self.order);
        self.anchors.clear();
        for &key in &self.order {
            if let Some(body) = self.bodies.get_mut(key) {
                body.set_collided(false);
                self.anchors.insert(key, body.pos());
            }
        }
        self.index_stale = false;
    }

    fn integrate(&mut self, time_scale: f32) {
        let arena = self.arena;
        let mut stale = false;
        for &key in &self.order {
            let Some(body) = self.bodies.get_mut(key) else {
                continue;
            };
            body.advance(arena, time_scale);

            let limit = body.radius() * STALE_FRACTION;
            let drift = match self.anchors.get(key) {
                Some(&anchor) => (body.pos() - anchor).abs(),
                None => Vec2::INFINITY,
            };
            if drift.x > limit || drift.y > limit {
                stale = true;
            }
        }
        self.index_stale |= stale;
    }

    fn structure_changed(&mut self) {
        self.generation += 1;
        self.index_stale = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::DECAY_FACTOR;

    fn config() -> SimConfig {
        SimConfig {
            width: 100,
            height: 100,
            initial_bodies: 0,
            seed: Some(7),
            ..SimConfig::default()
        }
    }

    fn still(world: &mut World, x: f32, y: f32) -> BodyKey {
        world.spawn(Vec2::new(x, y), Vec2::ZERO, 2)
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let flat = SimConfig {
            width: 0,
            initial_bodies: 1,
            ..config()
        };
        assert!(matches!(World::populated(&flat), Err(ConfigError::Invalid(_))));
        assert!(World::new(&flat).is_err());

        let huge = SimConfig {
            width: u32::MAX,
            ..config()
        };
        assert!(World::new(&huge).is_err());
    }

    #[test]
    fn test_spawn_and_remove_bump_generation() {
        let mut world = World::new(&config()).unwrap();
        let a = still(&mut world, 10.0, 10.0);
        let b = still(&mut world, 20.0, 20.0);
        assert_eq!(world.generation(), 2);
        assert_eq!(world.keys(), &[a, b]);

        assert!(world.remove(a).is_some());
        assert!(world.remove(a).is_none());
        assert_eq!(world.generation(), 3);
        assert_eq!(world.keys(), &[b]);
        assert!(world.body(a).is_none());
    }

    #[test]
    fn test_remove_body_when_empty() {
        let mut world = World::new(&config()).unwrap();
        assert!(world.remove_body().is_none());
        assert_eq!(world.generation(), 0);
    }

    #[test]
    fn test_reused_slot_keeps_insertion_order() {
        let mut world = World::new(&config()).unwrap();
        let a = still(&mut world, 10.0, 10.0);
        let b = still(&mut world, 30.0, 10.0);
        let c = still(&mut world, 50.0, 10.0);
        world.remove(a);
        let d = world.spawn(Vec2::new(70.0, 10.0), Vec2::new(1.0, 0.0), 2);

        // The freed slot comes first in the slot map
        assert_eq!(world.bodies.keys().next(), Some(d));
        assert_eq!(world.keys(), &[b, c, d]);

        world.toggle_strategy();
        world.step(1.0);
        world.apply_point_force(Vec2::new(40.0, 10.0), 100.0, 1.0, ForceMode::Attract);
        let xs: Vec<f32> = world.bodies().map(|body| body.pos().x).collect();
        assert_eq!(xs, vec![30.0, 50.0, 71.0]);
    }

    #[test]
    fn test_remove_body_preserves_order_of_rest() {
        let mut world = World::new(&config()).unwrap();
        let keys: Vec<_> = (0..10).map(|i| still(&mut world, 5.0 + i as f32 * 9.0, 50.0)).collect();
        world.remove_body().unwrap();
        let remaining = world.keys();
        assert_eq!(remaining.len(), 9);
        let positions: Vec<_> = remaining
            .iter()
            .map(|k| keys.iter().position(|x| x == k).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_add_body_spawns_near_centre() {
        let mut world = World::new(&SimConfig {
            width: 1000,
            height: 1000,
            ..config()
        })
        .unwrap();
        for _ in 0..50 {
            let key = world.add_body();
            let body = world.body(key).unwrap();
            let offset = body.pos() - Vec2::splat(500.0);
            assert!(offset.x >= -100.0 && offset.x < 100.0);
            assert!(offset.y >= -100.0 && offset.y < 100.0);
            assert!(body.vel().x >= -2.5 && body.vel().x <= 7.0);
        }
    }

    #[test]
    fn test_populate_stays_inside_arena() {
        let mut world = World::new(&config()).unwrap();
        world.populate(300);
        assert_eq!(world.len(), 300);
        for body in world.bodies() {
            assert!(body.pos().x >= 2.0 && body.pos().x <= 98.0);
            assert!(body.pos().y >= 2.0 && body.pos().y <= 98.0);
        }
    }

    #[test]
    fn test_candidates_rejects_stale_index() {
        let mut world = World::new(&config()).unwrap();
        let a = still(&mut world, 10.0, 10.0);
        assert!(matches!(world.candidates(a), Err(SimError::StaleIndex { built: None, .. })));

        world.step(1.0);
        assert_eq!(world.candidates(a).unwrap(), vec![a]);

        // A structural change invalidates the index until the next step
        let b = still(&mut world, 11.0, 10.0);
        assert!(matches!(world.candidates(b), Err(SimError::StaleIndex { .. })));
        world.remove(b);
        assert!(matches!(world.candidates(b), Err(SimError::UnknownBody)));
    }

    #[test]
    fn test_structural_change_forces_rebuild() {
        let mut world = World::new(&config()).unwrap();
        still(&mut world, 10.0, 10.0);
        assert!(world.step(1.0).rebuilt);
        // Nothing moved, so the index is reused
        assert!(!world.step(1.0).rebuilt);

        still(&mut world, 80.0, 80.0);
        assert!(world.is_index_stale());
        let stats = world.step(1.0);
        assert!(stats.rebuilt);
        assert_eq!(world.index().tree().len(), 2);
    }

    #[test]
    fn test_drift_marks_index_stale() {
        let mut world = World::new(&config()).unwrap();
        world.spawn(Vec2::new(50.0, 50.0), Vec2::new(0.6, 0.0), 2);
        assert!(world.step(1.0).rebuilt);
        // 0.6 < radius / 2
        assert!(!world.is_index_stale());
        // 1.2 > radius / 2
        world.step(1.0);
        assert!(world.is_index_stale());
        assert!(world.step(1.0).rebuilt);
    }

    #[test]
    fn test_indexed_step_resolves_overlap() {
        let mut world = World::new(&config()).unwrap();
        let a = world.spawn(Vec2::new(10.0, 50.0), Vec2::new(1.0, 0.0), 2);
        let b = world.spawn(Vec2::new(13.0, 50.0), Vec2::new(-1.0, 0.0), 2);
        let stats = world.step(1.0);

        assert!(stats.resolutions >= 1);
        let (a, b) = (world.body(a).unwrap(), world.body(b).unwrap());
        assert!(a.collided() && b.collided());
        assert!(a.vel().length() < 1.0 && b.vel().length() < 1.0);
    }

    #[test]
    fn test_brute_force_matches_single_resolution() {
        let mut world = World::new(&config()).unwrap();
        let a = world.spawn(Vec2::new(10.0, 50.0), Vec2::new(1.0, 0.0), 2);
        world.spawn(Vec2::new(13.0, 50.0), Vec2::new(-1.0, 0.0), 2);
        assert_eq!(world.toggle_strategy(), CollisionStrategy::BruteForce);

        let stats = world.step(1.0);
        assert_eq!(stats.strategy, CollisionStrategy::BruteForce);
        assert_eq!(stats.resolutions, 1);
        assert!(!stats.rebuilt);
        assert!((world.body(a).unwrap().vel().x + DECAY_FACTOR).abs() < 1e-6);
    }

    #[test]
    fn test_toggle_back_marks_stale() {
        let mut world = World::new(&config()).unwrap();
        still(&mut world, 10.0, 10.0);
        world.step(1.0);
        world.toggle_strategy();
        world.toggle_strategy();
        assert!(world.is_index_stale());
    }

    #[test]
    fn test_point_force_modes() {
        let mut world = World::new(&config()).unwrap();
        let near = still(&mut world, 60.0, 50.0);
        let far = still(&mut world, 95.0, 95.0);
        let centre = still(&mut world, 50.0, 50.0);

        let n = world.apply_point_force(Vec2::new(50.0, 50.0), 20.0, 10.0, ForceMode::Repel);
        assert_eq!(n, 1);
        assert_eq!(world.body(near).unwrap().vel(), Vec2::new(10.0, 0.0));
        assert_eq!(world.body(far).unwrap().vel(), Vec2::ZERO);
        assert_eq!(world.body(centre).unwrap().vel(), Vec2::ZERO);

        world.apply_point_force(Vec2::new(50.0, 50.0), 20.0, 10.0, ForceMode::Attract);
        assert_eq!(world.body(near).unwrap().vel(), Vec2::ZERO);
    }

    #[test]
    fn test_no_loss_after_many_steps() {
        let mut world = World::populated(&SimConfig {
            initial_bodies: 400,
            ..config()
        })
        .unwrap();
        for _ in 0..20 {
            world.step(1.0);
        }
        world.rebuild_index();
        assert_eq!(world.index().tree().len(), 400);
        for body in world.bodies() {
            let r = body.radius();
            assert!(body.pos().x >= r && body.pos().x <= 100.0 - r);
        }
    }
}
