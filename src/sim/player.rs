//! Player controller: input-driven movement plus the health state machine
//!
//! Phases: Normal -> (contact damage) -> Invulnerable -> Normal, or Dead at
//! zero health. Physics run identically in Normal and Invulnerable; Dead
//! freezes the body until a restart.

use glam::Vec2;

use super::body::{Body, MoveIntent, StepEvents};
use super::tilemap::TileMap;
use crate::consts::*;

/// Player damage state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPhase {
    Normal,
    /// Damage is ignored while the timer runs
    Invulnerable,
    Dead,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub phase: PlayerPhase,
    pub health: u8,
    /// Counts down by dt while invulnerable
    pub invuln_timer: f32,
    /// Jump input grace: a press shortly before landing still jumps
    pub jump_buffer: f32,
    pub fire_cooldown: f32,
    spawn: Vec2,
}

impl Player {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            body: Body::new(spawn, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)),
            phase: PlayerPhase::Normal,
            health: PLAYER_MAX_HEALTH,
            invuln_timer: 0.0,
            jump_buffer: 0.0,
            fire_cooldown: 0.0,
            spawn,
        }
    }

    pub fn alive(&self) -> bool {
        self.phase != PlayerPhase::Dead
    }

    /// Advance one tick: timers, input-driven body step, phase transitions.
    pub fn update(&mut self, map: &TileMap, move_dir: f32, jump_pressed: bool, dt: f32) -> StepEvents {
        if self.phase == PlayerPhase::Dead {
            return StepEvents::default();
        }

        if self.phase == PlayerPhase::Invulnerable {
            self.invuln_timer = (self.invuln_timer - dt).max(0.0);
            if self.invuln_timer == 0.0 {
                self.phase = PlayerPhase::Normal;
            }
        }

        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);

        if jump_pressed {
            self.jump_buffer = JUMP_BUFFER;
        } else {
            self.jump_buffer = (self.jump_buffer - dt).max(0.0);
        }

        if move_dir > 0.0 {
            self.body.facing_right = true;
        } else if move_dir < 0.0 {
            self.body.facing_right = false;
        }

        let intent = MoveIntent {
            dir: move_dir,
            max_speed: PLAYER_RUN_SPEED,
            accel: PLAYER_ACCEL,
            friction: PLAYER_FRICTION,
            jump: self.jump_buffer > 0.0,
            drop_through: false,
        };
        let ev = self.body.step(map, intent, dt);
        if ev.jumped {
            self.jump_buffer = 0.0;
        }
        ev
    }

    /// Apply one point of contact damage with a knockback impulse away from
    /// `source_center`. Ignored while invulnerable or dead. Returns true if
    /// the damage landed.
    pub fn take_damage(&mut self, source_center: Vec2) -> bool {
        if self.phase != PlayerPhase::Normal {
            return false;
        }
        self.health = self.health.saturating_sub(1);
        if self.health == 0 {
            self.phase = PlayerPhase::Dead;
            self.body.vel = Vec2::ZERO;
        } else {
            self.phase = PlayerPhase::Invulnerable;
            self.invuln_timer = INVULN_DURATION;
            let away = if self.body.rect().center().x < source_center.x {
                -1.0
            } else {
                1.0
            };
            self.body.vel = Vec2::new(away * KNOCKBACK_X, -KNOCKBACK_Y);
            self.body.grounded = false;
        }
        true
    }

    pub fn heal(&mut self, amount: u8) {
        if self.alive() {
            self.health = (self.health + amount).min(PLAYER_MAX_HEALTH);
        }
    }

    pub fn can_fire(&self) -> bool {
        self.alive() && self.fire_cooldown == 0.0
    }

    pub fn mark_fired(&mut self) {
        self.fire_cooldown = FIRE_COOLDOWN;
    }

    /// Reset to the spawn point with full health (restart request)
    pub fn respawn(&mut self) {
        self.body = Body::new(self.spawn, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT));
        self.phase = PlayerPhase::Normal;
        self.health = PLAYER_MAX_HEALTH;
        self.invuln_timer = 0.0;
        self.jump_buffer = 0.0;
        self.fire_cooldown = 0.0;
    }
}
