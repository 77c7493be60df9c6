//! tilevault - a tile-based 2D platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, enemy AI, game state)
//! - `level`: CSV level loading (tile grid -> collision rects and spawn points)
//! - `progress`: Level-completion persistence

pub mod level;
pub mod progress;
pub mod sim;

pub use level::{Level, LoadError};
pub use progress::Progress;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// World cell size for the level grid
    pub const TILE_SIZE: f32 = 64.0;
    /// One-way platforms only occupy the top slice of their cell
    pub const PLATFORM_THICKNESS: f32 = 8.0;

    /// Shared vertical physics (world units are pixels, +y is down)
    pub const GRAVITY: f32 = 2880.0;
    pub const MAX_FALL_SPEED: f32 = 900.0;
    pub const JUMP_VELOCITY: f32 = 900.0;

    /// Player movement
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 48.0;
    pub const PLAYER_RUN_SPEED: f32 = 300.0;
    pub const PLAYER_ACCEL: f32 = 2400.0;
    pub const PLAYER_FRICTION: f32 = 3000.0;
    pub const COYOTE_TIME: f32 = 0.1;
    pub const JUMP_BUFFER: f32 = 0.1;

    /// Player health / damage
    pub const PLAYER_MAX_HEALTH: u8 = 3;
    pub const INVULN_DURATION: f32 = 1.0;
    pub const KNOCKBACK_X: f32 = 240.0;
    pub const KNOCKBACK_Y: f32 = 300.0;

    /// Enemies
    pub const ENEMY_SIZE: f32 = 32.0;
    pub const ENEMY_PATROL_SPEED: f32 = 60.0;
    pub const ENEMY_JUMP_INTERVAL_MIN: f32 = 1.5;
    pub const ENEMY_JUMP_INTERVAL_MAX: f32 = 2.5;
    pub const AMBUSH_DETECTION_RADIUS: f32 = 320.0;
    pub const AMBUSH_ATTACK_RANGE: f32 = 48.0;
    pub const BOSS_SIZE: f32 = 64.0;
    pub const BOSS_PATROL_SPEED: f32 = 30.0;
    pub const BOSS_HEALTH: u8 = 10;

    /// Bullets
    pub const BULLET_WIDTH: f32 = 16.0;
    pub const BULLET_HEIGHT: f32 = 12.0;
    pub const BULLET_SPEED: f32 = 600.0;
    pub const FIRE_COOLDOWN: f32 = 0.25;

    /// Scoring
    pub const SCORE_COLLECTIBLE: u32 = 100;
    pub const SCORE_KILL: u32 = 50;
    pub const SCORE_BOSS: u32 = 500;
}

/// Move `value` toward zero by `amount`, without overshooting
#[inline]
pub fn decay_toward_zero(value: f32, amount: f32) -> f32 {
    if value.abs() <= amount {
        0.0
    } else {
        value - value.signum() * amount
    }
}

/// Move `value` toward `target` by at most `step`
#[inline]
pub fn approach(value: f32, target: f32, step: f32) -> f32 {
    if value < target {
        (value + step).min(target)
    } else {
        (value - step).max(target)
    }
}
