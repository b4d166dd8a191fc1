//! Quadrant tree for broad-phase collision queries
//!
//! Each node owns the entries that straddle one of its midpoints; everything
//! that fits a single quadrant is pushed down into that child. Nodes split
//! lazily once their own list grows past the split threshold and merge back
//! when a subtree of leaves holds few enough entries.

use glam::Vec2;

use crate::consts::{MAX_DEPTH, MERGE_THRESHOLD, SPLIT_THRESHOLD};

/// Integer axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Vertical and horizontal midlines
    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.w as f32 / 2.0,
            self.y as f32 + self.h as f32 / 2.0,
        )
    }

    /// Four equal sub-rectangles in [`Quadrant`] order
    ///
    /// Halving is integer division, so an odd width or height drops its last
    /// unit. Returns `None` once a side would collapse to zero.
    pub fn quadrants(&self) -> Option<[Rect; 4]> {
        let sub_w = self.w / 2;
        let sub_h = self.h / 2;
        if sub_w <= 0 || sub_h <= 0 {
            return None;
        }

        let (x, y) = (self.x, self.y);
        Some([
            Rect::new(x, y, sub_w, sub_h),
            Rect::new(x + sub_w, y, sub_w, sub_h),
            Rect::new(x, y + sub_h, sub_w, sub_h),
            Rect::new(x + sub_w, y + sub_h, sub_w, sub_h),
        ])
    }

    /// Corner points clockwise from top-left
    pub fn corners(&self) -> [Vec2; 4] {
        let (x0, y0) = (self.x as f32, self.y as f32);
        let (x1, y1) = ((self.x + self.w) as f32, (self.y + self.h) as f32);
        [
            Vec2::new(x0, y0),
            Vec2::new(x1, y0),
            Vec2::new(x1, y1),
            Vec2::new(x0, y1),
        ]
    }
}

/// Child slot of a split node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl Quadrant {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Circle footprint used for classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub center: Vec2,
    pub radius: f32,
}

impl Extent {
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Which quadrant of `bounds` fully contains `extent`, if any
///
/// `None` means the extent reaches across a midline and must stay with the
/// node itself.
pub fn classify(bounds: Rect, extent: Extent) -> Option<Quadrant> {
    let mid = bounds.midpoint();
    let Extent { center, radius } = extent;

    let top = center.y + radius < mid.y;
    let bottom = center.y - radius >= mid.y;
    let left = center.x + radius < mid.x;
    let right = center.x - radius >= mid.x;

    match (top, bottom, left, right) {
        (true, _, true, _) => Some(Quadrant::TopLeft),
        (true, _, _, true) => Some(Quadrant::TopRight),
        (_, true, true, _) => Some(Quadrant::BottomLeft),
        (_, true, _, true) => Some(Quadrant::BottomRight),
        _ => None,
    }
}

/// Split/merge tuning shared by every node of a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadtreeParams {
    /// A leaf splits once its own list is longer than this
    pub split_threshold: usize,
    /// A node of leaves merges once the subtree holds at most this many
    pub merge_threshold: usize,
    /// Nodes at this level never split
    pub max_depth: u32,
}

impl Default for QuadtreeParams {
    fn default() -> Self {
        Self {
            split_threshold: SPLIT_THRESHOLD,
            merge_threshold: MERGE_THRESHOLD,
            max_depth: MAX_DEPTH,
        }
    }
}

/// What the post-insert hook did to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restructure {
    Unchanged,
    Split,
    Merged,
}

#[derive(Debug, Clone, Copy)]
struct Entry<K> {
    key: K,
    extent: Extent,
}

/// A quadrant tree node; the root is just the node at level 0
#[derive(Debug)]
pub struct Quadtree<K> {
    level: u32,
    bounds: Rect,
    entries: Vec<Entry<K>>,
    children: Option<Box<[Quadtree<K>; 4]>>,
    params: QuadtreeParams,
}

impl<K: Copy> Quadtree<K> {
    pub fn new(bounds: Rect, params: QuadtreeParams) -> Self {
        Self::node(0, bounds, params)
    }

    fn node(level: u32, bounds: Rect, params: QuadtreeParams) -> Self {
        Self {
            level,
            bounds,
            entries: Vec::new(),
            children: None,
            params,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn children(&self) -> Option<&[Quadtree<K>; 4]> {
        self.children.as_deref()
    }

    /// Keys held by this node only
    pub fn own_keys(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.iter().map(|e| e.key)
    }

    pub fn own_len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in the whole subtree
    pub fn len(&self) -> usize {
        self.entries.len()
            + self
                .children()
                .map_or(0, |c| c.iter().map(Quadtree::len).sum::<usize>())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .map_or(0, |c| c.iter().map(Quadtree::node_count).sum::<usize>())
    }

    /// Deepest level reached below (and including) this node
    pub fn depth(&self) -> u32 {
        self.children()
            .and_then(|c| c.iter().map(Quadtree::depth).max())
            .unwrap_or(self.level)
    }

    /// Visit every node, parents before children
    pub fn for_each_node<F: FnMut(&Quadtree<K>)>(&self, f: &mut F) {
        f(self);
        if let Some(children) = self.children() {
            for child in children {
                child.for_each_node(f);
            }
        }
    }

    /// Insert an entry, descending while it fits a single quadrant
    pub fn insert(&mut self, key: K, extent: Extent) {
        if let Some(children) = self.children.as_mut() {
            if let Some(quadrant) = classify(self.bounds, extent) {
                children[quadrant.index()].insert(key, extent);
                return;
            }
        }

        self.entries.push(Entry { key, extent });
        self.post_insert();
    }

    /// Rebalance after an entry landed in this node's own list
    ///
    /// A leaf past the split threshold splits; a node that already has
    /// children tries to merge them back. Nothing happens at max depth.
    pub fn post_insert(&mut self) -> Restructure {
        if self.level >= self.params.max_depth {
            return Restructure::Unchanged;
        }

        if self.children.is_none() {
            if self.entries.len() > self.params.split_threshold && self.split() {
                return Restructure::Split;
            }
        } else if self.merge() {
            return Restructure::Merged;
        }

        Restructure::Unchanged
    }

    /// Create four children and push down every entry that fits one of them
    ///
    /// Returns `false` if the node is already split or too small to halve.
    pub fn split(&mut self) -> bool {
        if self.children.is_some() {
            return false;
        }
        let Some(quadrants) = self.bounds.quadrants() else {
            return false;
        };

        let level = self.level + 1;
        let params = self.params;
        let mut children = quadrants.map(|rect| Quadtree::node(level, rect, params));

        let mut straddling = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            match classify(self.bounds, entry.extent) {
                Some(quadrant) => children[quadrant.index()].insert(entry.key, entry.extent),
                None => straddling.push(entry),
            }
        }

        self.entries = straddling;
        self.children = Some(Box::new(children));
        true
    }

    /// Fold four leaf children back into this node if the subtree is small
    ///
    /// Returns `true` if the children were absorbed.
    pub fn merge(&mut self) -> bool {
        let Some(children) = self.children.as_deref() else {
            return false;
        };
        if children.iter().any(|c| !c.is_leaf()) {
            return false;
        }

        let total = self.entries.len() + children.iter().map(|c| c.entries.len()).sum::<usize>();
        if total > self.params.merge_threshold {
            return false;
        }

        if let Some(children) = self.children.take() {
            for child in *children {
                self.entries.extend(child.entries);
            }
        }
        true
    }

    /// Append every key that might overlap `extent`
    ///
    /// The result is a superset of the true overlaps; callers still need an
    /// exact test.
    pub fn retrieve(&self, extent: Extent, out: &mut Vec<K>) {
        out.extend(self.own_keys());

        let Some(children) = self.children() else {
            return;
        };
        match classify(self.bounds, extent) {
            Some(quadrant) => children[quadrant.index()].retrieve(extent, out),
            None => {
                for child in children {
                    child.retrieve(extent, out);
                }
            }
        }
    }

    /// Drop all children and entries
    pub fn clear(&mut self) {
        self.entries.clear();
        self.children = None;
    }
}
