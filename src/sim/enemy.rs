//! Enemy AI: four behavior variants over one shared movement body
//!
//! Every variant patrols horizontally and reverses on a solid side-collision
//! or a level edge. Jumping enemies add a re-randomized countdown jump;
//! ambush enemies drop onto the player from above; the boss is a slow,
//! durable patroller whose death unlocks the plank tiles.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::body::{Body, MoveIntent, StepEvents};
use super::tilemap::TileMap;
use crate::consts::*;

/// Behavior variant plus its per-variant state
#[derive(Debug, Clone)]
pub enum Behavior {
    Basic,
    Jumping {
        /// Counts down by dt; on firing it is re-drawn uniformly from
        /// [ENEMY_JUMP_INTERVAL_MIN, ENEMY_JUMP_INTERVAL_MAX)
        jump_timer: f32,
    },
    Ambush {
        /// Ready to drop. Cleared on drop, re-set once the player leaves
        /// the detection radius (range-based re-arm).
        armed: bool,
        /// Mid-drop: horizontal velocity zeroed, gravity does the rest
        dropping: bool,
    },
    Boss,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub body: Body,
    pub behavior: Behavior,
    pub health: u8,
}

impl Enemy {
    /// Spawn centered on `center` (spawn tiles give a tile-center position)
    fn at_center(id: u32, center: Vec2, size: f32, behavior: Behavior, health: u8) -> Self {
        let size = Vec2::splat(size);
        Self {
            id,
            body: Body::new(center - size / 2.0, size),
            behavior,
            health,
        }
    }

    pub fn basic(id: u32, center: Vec2) -> Self {
        Self::at_center(id, center, ENEMY_SIZE, Behavior::Basic, 1)
    }

    pub fn jumping(id: u32, center: Vec2, rng: &mut Pcg32) -> Self {
        let jump_timer = rng.random_range(ENEMY_JUMP_INTERVAL_MIN..ENEMY_JUMP_INTERVAL_MAX);
        Self::at_center(id, center, ENEMY_SIZE, Behavior::Jumping { jump_timer }, 1)
    }

    pub fn ambush(id: u32, center: Vec2) -> Self {
        let behavior = Behavior::Ambush {
            armed: true,
            dropping: false,
        };
        Self::at_center(id, center, ENEMY_SIZE, behavior, 2)
    }

    pub fn boss(id: u32, center: Vec2) -> Self {
        Self::at_center(id, center, BOSS_SIZE, Behavior::Boss, BOSS_HEALTH)
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.behavior, Behavior::Boss)
    }

    pub fn alive(&self) -> bool {
        self.health > 0
    }

    /// Returns true if this hit killed the enemy
    pub fn take_damage(&mut self, amount: u8) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }

    /// One AI decision + physics step. `player_center` is the player's
    /// previous-tick position; one-tick-stale perception is fine.
    pub fn update(
        &mut self,
        map: &TileMap,
        player_center: Vec2,
        rng: &mut Pcg32,
        dt: f32,
    ) -> StepEvents {
        let center = self.body.rect().center();
        let mut patrol_speed = ENEMY_PATROL_SPEED;
        let mut patrolling = true;
        let mut jump = false;

        match &mut self.behavior {
            Behavior::Basic => {}
            Behavior::Boss => patrol_speed = BOSS_PATROL_SPEED,
            Behavior::Jumping { jump_timer } => {
                *jump_timer -= dt;
                // Small tolerance so accumulated dt rounding cannot push the
                // firing tick one step late
                if *jump_timer < 1e-3 {
                    *jump_timer = rng.random_range(ENEMY_JUMP_INTERVAL_MIN..ENEMY_JUMP_INTERVAL_MAX);
                    jump = self.body.grounded;
                }
            }
            Behavior::Ambush { armed, dropping } => {
                let dist = center.distance(player_center);
                if *dropping {
                    patrolling = false;
                    if self.body.grounded {
                        // Drop finished; stay disarmed until the player
                        // leaves detection range again
                        *dropping = false;
                    }
                } else {
                    let in_reach = dist <= AMBUSH_DETECTION_RADIUS
                        && (player_center.x - center.x).abs() <= AMBUSH_ATTACK_RANGE
                        && center.y < player_center.y;
                    if *armed && in_reach {
                        *armed = false;
                        *dropping = true;
                        patrolling = false;
                        self.body.vel.x = 0.0;
                    } else if !*armed && dist > AMBUSH_DETECTION_RADIUS {
                        *armed = true;
                    }
                }
            }
        }

        let dir = if !patrolling {
            0.0
        } else if self.body.facing_right {
            1.0
        } else {
            -1.0
        };
        let intent = MoveIntent {
            dir,
            max_speed: patrol_speed,
            accel: PLAYER_ACCEL,
            friction: PLAYER_FRICTION,
            jump,
            drop_through: matches!(self.behavior, Behavior::Ambush { dropping: true, .. }),
        };
        let ev = self.body.step(map, intent, dt);

        // Patrol reversal on a solid side block or a level edge
        if ev.hit_wall {
            self.body.facing_right = !self.body.facing_right;
        }
        ev
    }
}
