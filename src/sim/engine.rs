//! Collision passes
//!
//! Two interchangeable strategies: an indexed pass that asks the spatial index
//! for candidates, and an all-pairs reference pass. Both run narrow-phase
//! `collides_with` before resolving.

use slotmap::SlotMap;

use super::body::Body;
use super::index::IndexView;
use super::world::BodyKey;

/// How candidate pairs are generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionStrategy {
    /// Query the quadrant tree per body
    #[default]
    Indexed,
    /// Test every pair, O(n^2)
    BruteForce,
}

impl CollisionStrategy {
    pub fn toggled(self) -> Self {
        match self {
            CollisionStrategy::Indexed => CollisionStrategy::BruteForce,
            CollisionStrategy::BruteForce => CollisionStrategy::Indexed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionStrategy::Indexed => "quadtree",
            CollisionStrategy::BruteForce => "brute-force",
        }
    }
}

/// Per-step counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub strategy: CollisionStrategy,
    /// Whether the index was rebuilt this step
    pub rebuilt: bool,
    /// Narrow-phase tests performed
    pub tests: usize,
    /// Resolutions applied (an indexed pair usually counts twice)
    pub resolutions: usize,
}

/// Resolve overlaps using index candidates
///
/// Every body queries the index and resolves against each overlapping
/// candidate, so a pair found from both sides is resolved twice per step.
pub fn resolve_indexed(
    bodies: &mut SlotMap<BodyKey, Body>,
    order: &[BodyKey],
    view: IndexView<'_>,
    time_scale: f32,
    stats: &mut StepStats,
) {
    let mut candidates = Vec::new();

    for &key in order {
        let Some(body) = bodies.get(key) else {
            continue;
        };
        view.retrieve_into(body, &mut candidates);

        for &other in &candidates {
            if other == key {
                continue;
            }
            stats.tests += 1;
            if resolve_pair(bodies, key, other, time_scale) {
                stats.resolutions += 1;
            }
        }
    }
}

/// Resolve overlaps by testing every unordered pair once
pub fn resolve_brute_force(
    bodies: &mut SlotMap<BodyKey, Body>,
    order: &[BodyKey],
    time_scale: f32,
    stats: &mut StepStats,
) {
    for &key in order {
        if let Some(body) = bodies.get_mut(key) {
            body.set_collided(false);
        }
    }

    for (i, &a) in order.iter().enumerate() {
        for &b in &order[i + 1..] {
            stats.tests += 1;
            if resolve_pair(bodies, a, b, time_scale) {
                stats.resolutions += 1;
            }
        }
    }
}

/// Narrow-phase test and response for one pair; `true` if they overlapped
fn resolve_pair(bodies: &mut SlotMap<BodyKey, Body>, a: BodyKey, b: BodyKey, time_scale: f32) -> bool {
    let Some([a, b]) = bodies.get_disjoint_mut([a, b]) else {
        return false;
    };
    if !a.collides_with(b) {
        return false;
    }

    a.resolve_collision(b, time_scale);
    a.set_collided(true);
    b.set_collided(true);
    true
}
