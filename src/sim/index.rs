//! Spatial index over the world's bodies
//!
//! Wraps a [`Quadtree`] of body keys and remembers which generation of the
//! body collection it was built from. Queries go through an [`IndexView`],
//! which can only be obtained for the generation the index was built against,
//! so entries left over from before an add/remove are never handed out.

use slotmap::SlotMap;

use super::body::Body;
use super::quadtree::{Extent, Quadtree, QuadtreeParams, Rect};
use super::world::BodyKey;

/// Broad-phase index rebuilt from scratch whenever it goes stale
#[derive(Debug)]
pub struct SpatialIndex {
    tree: Quadtree<BodyKey>,
    /// Body collection generation of the last rebuild
    built_for: Option<u64>,
}

impl SpatialIndex {
    pub fn new(bounds: Rect, params: QuadtreeParams) -> Self {
        Self {
            tree: Quadtree::new(bounds, params),
            built_for: None,
        }
    }

    /// Generation the index currently reflects, if it has been built
    pub fn built_for(&self) -> Option<u64> {
        self.built_for
    }

    pub fn is_valid_for(&self, generation: u64) -> bool {
        self.built_for == Some(generation)
    }

    pub fn tree(&self) -> &Quadtree<BodyKey> {
        &self.tree
    }

    /// Clear and reinsert every body in `order`
    pub fn rebuild(
        &mut self,
        generation: u64,
        bodies: &SlotMap<BodyKey, Body>,
        order: &[BodyKey],
    ) {
        self.tree.clear();
        for &key in order {
            if let Some(body) = bodies.get(key) {
                self.tree.insert(key, extent_of(body));
            }
        }
        self.built_for = Some(generation);

        log::trace!(
            "Index rebuilt: {} bodies, {} nodes, depth {}",
            self.tree.len(),
            self.tree.node_count(),
            self.tree.depth()
        );
    }

    /// Forget the current contents
    pub fn clear(&mut self) {
        self.tree.clear();
        self.built_for = None;
    }

    /// Query access, only for the generation the index was built from
    pub fn view(&self, generation: u64) -> Option<IndexView<'_>> {
        self.is_valid_for(generation)
            .then_some(IndexView { tree: &self.tree })
    }
}

/// Read access to an index known to match the current body collection
#[derive(Debug, Clone, Copy)]
pub struct IndexView<'a> {
    tree: &'a Quadtree<BodyKey>,
}

impl IndexView<'_> {
    /// Broad-phase candidates for `body`, written into `out` (cleared first)
    pub fn retrieve_into(&self, body: &Body, out: &mut Vec<BodyKey>) {
        out.clear();
        self.tree.retrieve(extent_of(body), out);
    }

    pub fn retrieve(&self, body: &Body) -> Vec<BodyKey> {
        let mut out = Vec::new();
        self.retrieve_into(body, &mut out);
        out
    }
}

#[inline]
pub(crate) fn extent_of(body: &Body) -> Extent {
    Extent::new(body.pos(), body.radius())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Arena;
    use glam::Vec2;

    fn setup(points: &[(f32, f32)]) -> (SlotMap<BodyKey, Body>, Vec<BodyKey>) {
        let arena = Arena::new(100, 100);
        let mut bodies = SlotMap::with_key();
        let order = points
            .iter()
            .map(|&(x, y)| bodies.insert(Body::new(Vec2::new(x, y), Vec2::ZERO, 2, arena)))
            .collect();
        (bodies, order)
    }

    #[test]
    fn test_view_requires_matching_generation() {
        let (bodies, order) = setup(&[(10.0, 10.0), (50.0, 50.0)]);
        let mut index = SpatialIndex::new(Rect::new(0, 0, 100, 100), QuadtreeParams::default());
        assert!(index.view(0).is_none());

        index.rebuild(3, &bodies, &order);
        assert!(index.view(3).is_some());
        assert!(index.view(4).is_none());

        index.clear();
        assert!(index.view(3).is_none());
        assert!(index.tree().is_empty());
    }

    #[test]
    fn test_rebuild_replaces_contents() {
        let (bodies, order) = setup(&[(10.0, 10.0), (90.0, 10.0), (10.0, 90.0)]);
        let mut index = SpatialIndex::new(Rect::new(0, 0, 100, 100), QuadtreeParams::default());
        index.rebuild(0, &bodies, &order);
        index.rebuild(1, &bodies, &order[..1]);
        assert_eq!(index.tree().len(), 1);
        assert_eq!(index.built_for(), Some(1));
    }

    #[test]
    fn test_retrieve_includes_self_and_neighbour() {
        let points = [(10.0, 10.0), (12.0, 11.0), (90.0, 90.0), (80.0, 80.0), (85.0, 20.0), (20.0, 85.0)];
        let (bodies, order) = setup(&points);
        let mut index = SpatialIndex::new(Rect::new(0, 0, 100, 100), QuadtreeParams::default());
        index.rebuild(0, &bodies, &order);

        let view = index.view(0).unwrap();
        let found = view.retrieve(&bodies[order[0]]);
        assert!(found.contains(&order[0]));
        assert!(found.contains(&order[1]));
        assert!(!found.contains(&order[2]));
    }
}
