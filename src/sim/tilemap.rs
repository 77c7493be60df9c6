//! Static collision geometry for a loaded level
//!
//! Built once by the level loader and read-only during gameplay, with one
//! scripted exception: plank tiles are bulk-removed when the boss dies.

use super::geom::{Rect, rects_intersect};

/// How a tile rectangle collides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    /// Full collision from every direction
    Solid,
    /// Blocks descent from above only
    OneWay,
}

/// Collision rectangles for one level.
///
/// Rectangles may overlap each other; queries report every overlapping
/// rect, never just the first.
#[derive(Debug, Clone, Default)]
pub struct TileMap {
    solids: Vec<Rect>,
    /// Solid until [`TileMap::remove_planks`] runs
    planks: Vec<Rect>,
    one_ways: Vec<Rect>,
    /// Level pixel bounds
    pub width: f32,
    pub height: f32,
}

impl TileMap {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn push_solid(&mut self, rect: Rect) {
        self.solids.push(rect);
    }

    pub fn push_plank(&mut self, rect: Rect) {
        self.planks.push(rect);
    }

    pub fn push_one_way(&mut self, rect: Rect) {
        self.one_ways.push(rect);
    }

    /// Every tile rect overlapping `region`, with its collision kind.
    /// Planks count as solid while they exist.
    pub fn overlaps<'a>(&'a self, region: &'a Rect) -> impl Iterator<Item = (Rect, TileKind)> + 'a {
        self.solids
            .iter()
            .chain(self.planks.iter())
            .filter(|r| rects_intersect(region, r))
            .map(|r| (*r, TileKind::Solid))
            .chain(
                self.one_ways
                    .iter()
                    .filter(|r| rects_intersect(region, r))
                    .map(|r| (*r, TileKind::OneWay)),
            )
    }

    /// Scripted bulk removal of all plank tiles (boss defeat). Returns the
    /// number of rects removed.
    pub fn remove_planks(&mut self) -> usize {
        let n = self.planks.len();
        self.planks.clear();
        n
    }

    pub fn has_planks(&self) -> bool {
        !self.planks.is_empty()
    }

    pub fn solid_count(&self) -> usize {
        self.solids.len() + self.planks.len()
    }
}
