//! Axis-aligned rectangle geometry and directional overlap resolution
//!
//! The contact side is decided from the moving rectangle's *previous*
//! position relative to the obstacle: a body that was above the obstacle
//! last tick landed on top of it, one that was below hit its head, anything
//! else is a side block. This tie-break keeps corner hits unambiguous.

use glam::Vec2;

/// Axis-aligned box in world-pixel coordinates (+y is down)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Which side of the obstacle was contacted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Moving rect landed on the obstacle's top edge
    Top,
    /// Moving rect hit the obstacle's underside
    Bottom,
    /// Moving rect hit the obstacle's left face
    Left,
    /// Moving rect hit the obstacle's right face
    Right,
}

/// Result of a resolved overlap: the contacted side and the corrected
/// top-left position that puts the moving rect just outside the obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub side: Side,
    pub pos: Vec2,
}

#[inline]
pub fn rects_intersect(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Resolve an overlap between a moving rect and a static obstacle.
///
/// `prev` is the moving rect's position on the previous tick, `cur` its
/// tentative position after integration. Returns `None` when there is no
/// overlap. Pure function; callers apply the correction themselves.
pub fn resolve_contact(prev: &Rect, cur: &Rect, obstacle: &Rect) -> Option<Contact> {
    if !rects_intersect(cur, obstacle) {
        return None;
    }

    let (side, pos) = if prev.bottom() <= obstacle.y {
        (Side::Top, Vec2::new(cur.x, obstacle.y - cur.h))
    } else if prev.y >= obstacle.bottom() {
        (Side::Bottom, Vec2::new(cur.x, obstacle.bottom()))
    } else if prev.center().x < obstacle.center().x {
        (Side::Left, Vec2::new(obstacle.x - cur.w, cur.y))
    } else {
        (Side::Right, Vec2::new(obstacle.right(), cur.y))
    };

    Some(Contact { side, pos })
}
