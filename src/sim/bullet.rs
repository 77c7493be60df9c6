//! Player projectiles: straight horizontal flight, culled on the first
//! solid tile or on leaving the level bounds.

use glam::Vec2;

use super::geom::{Rect, rects_intersect};
use super::tilemap::{TileKind, TileMap};
use crate::consts::*;

#[derive(Debug, Clone)]
pub struct Bullet {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub active: bool,
}

impl Bullet {
    /// Fired from `muzzle` (center of the shooter's leading edge)
    pub fn fired_from(muzzle: Vec2, facing_right: bool) -> Self {
        let dir = if facing_right { 1.0 } else { -1.0 };
        Self {
            pos: muzzle - Vec2::new(BULLET_WIDTH, BULLET_HEIGHT) / 2.0,
            vel: Vec2::new(dir * BULLET_SPEED, 0.0),
            active: true,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, BULLET_WIDTH, BULLET_HEIGHT)
    }

    /// Advance one step; deactivates on a solid tile or out of bounds.
    /// One-way platforms never stop bullets.
    pub fn update(&mut self, map: &TileMap, dt: f32) {
        if !self.active {
            return;
        }
        self.pos += self.vel * dt;
        let r = self.rect();
        if r.right() < 0.0 || r.x > map.width || r.bottom() < 0.0 || r.y > map.height {
            self.active = false;
            return;
        }
        if map
            .overlaps(&r)
            .any(|(_, kind)| kind == TileKind::Solid)
        {
            self.active = false;
        }
    }

    pub fn hits(&self, target: &Rect) -> bool {
        self.active && rects_intersect(&self.rect(), target)
    }
}
