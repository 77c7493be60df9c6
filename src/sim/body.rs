//! Shared movement body: the physics step used by the player and every enemy
//!
//! One fixed-timestep step per tick: horizontal acceleration/friction,
//! gravity, optional jump impulse, axis-separated integration with push-out
//! resolution against the tile map, then level boundary clamping.

use glam::Vec2;

use super::geom::{Contact, Rect, Side, resolve_contact};
use super::tilemap::{TileKind, TileMap};
use crate::consts::*;
use crate::{approach, decay_toward_zero};

/// Horizontal intent for one step
#[derive(Debug, Clone, Copy)]
pub struct MoveIntent {
    /// -1..1 desired direction
    pub dir: f32,
    pub max_speed: f32,
    /// Acceleration while `dir != 0`
    pub accel: f32,
    /// Deceleration while `dir == 0`
    pub friction: f32,
    /// Jump requested this tick
    pub jump: bool,
    /// Fall through one-way platforms this tick
    pub drop_through: bool,
}

/// What happened during a step
#[derive(Debug, Clone, Copy, Default)]
pub struct StepEvents {
    pub jumped: bool,
    pub landed: bool,
    pub bonked: bool,
    /// Blocked sideways by a solid tile or a level edge
    pub hit_wall: bool,
}

/// Physics state shared by all moving entities.
///
/// Invariant: after [`Body::step`] the body's rect overlaps no solid tile,
/// and overlaps a one-way platform only when it passed through from below.
#[derive(Debug, Clone)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub grounded: bool,
    pub facing_right: bool,
    /// Post-leaving-ground jump grace, counts down by dt
    pub coyote: f32,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            grounded: false,
            facing_right: true,
            coyote: 0.0,
        }
    }

    /// Bounding box recomputed from position
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Advance one fixed timestep against the tile map.
    pub fn step(&mut self, map: &TileMap, intent: MoveIntent, dt: f32) -> StepEvents {
        let mut ev = StepEvents::default();
        let was_grounded = self.grounded;

        // Horizontal acceleration toward max speed, friction when idle
        if intent.dir != 0.0 {
            let target = intent.dir.clamp(-1.0, 1.0) * intent.max_speed;
            self.vel.x = approach(self.vel.x, target, intent.accel * dt);
        } else {
            self.vel.x = decay_toward_zero(self.vel.x, intent.friction * dt);
        }

        // Gravity, clamped to terminal fall speed
        self.vel.y = (self.vel.y + GRAVITY * dt).min(MAX_FALL_SPEED);

        // Coyote window
        if was_grounded {
            self.coyote = COYOTE_TIME;
        } else {
            self.coyote = (self.coyote - dt).max(0.0);
        }

        // Jump
        if intent.jump && (was_grounded || self.coyote > 0.0) {
            self.vel.y = -JUMP_VELOCITY;
            self.grounded = false;
            self.coyote = 0.0;
            ev.jumped = true;
        }

        // X axis: move, then push out of solids. One-way platforms never
        // block horizontal movement.
        let prev = self.rect();
        self.pos.x += self.vel.x * dt;
        // A handful of rounds resolves chains of overlapping rects
        for _ in 0..4 {
            let cur = self.rect();
            let contact = map
                .overlaps(&cur)
                .filter(|(_, kind)| *kind == TileKind::Solid)
                .find_map(|(r, _)| resolve_contact(&prev, &cur, &r));
            match contact {
                Some(c) => self.apply_contact(&c, &mut ev),
                None => break,
            }
        }

        // Y axis
        let prev = self.rect();
        self.grounded = false;
        self.pos.y += self.vel.y * dt;
        for _ in 0..4 {
            let cur = self.rect();
            let contact = map.overlaps(&cur).find_map(|(r, kind)| match kind {
                TileKind::Solid => resolve_contact(&prev, &cur, &r),
                TileKind::OneWay => {
                    // Only collides when falling onto it from above
                    if !intent.drop_through && self.vel.y >= 0.0 && prev.bottom() <= r.y {
                        resolve_contact(&prev, &cur, &r)
                    } else {
                        None
                    }
                }
            });
            match contact {
                Some(c) => self.apply_contact(&c, &mut ev),
                None => break,
            }
        }

        // Level boundaries: clamp, zero the blocked velocity component.
        // The bottom edge behaves as ground.
        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
            self.vel.x = 0.0;
            ev.hit_wall = true;
        } else if self.pos.x + self.size.x > map.width {
            self.pos.x = map.width - self.size.x;
            self.vel.x = 0.0;
            ev.hit_wall = true;
        }
        if self.pos.y < 0.0 {
            self.pos.y = 0.0;
            self.vel.y = 0.0;
        } else if self.pos.y + self.size.y > map.height {
            self.pos.y = map.height - self.size.y;
            self.vel.y = 0.0;
            self.grounded = true;
        }

        if self.grounded && !was_grounded {
            ev.landed = true;
        }

        ev
    }

    fn apply_contact(&mut self, contact: &Contact, ev: &mut StepEvents) {
        self.pos = contact.pos;
        match contact.side {
            Side::Top => {
                self.vel.y = 0.0;
                self.grounded = true;
            }
            Side::Bottom => {
                self.vel.y = 0.0;
                ev.bonked = true;
            }
            Side::Left | Side::Right => {
                self.vel.x = 0.0;
                ev.hit_wall = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const IDLE: MoveIntent = MoveIntent {
        dir: 0.0,
        max_speed: PLAYER_RUN_SPEED,
        accel: PLAYER_ACCEL,
        friction: PLAYER_FRICTION,
        jump: false,
        drop_through: false,
    };

    fn flat_map() -> TileMap {
        // One solid row at y=640 spanning the full level width
        let mut map = TileMap::new(5120.0, 704.0);
        for col in 0..80 {
            map.push_solid(Rect::new(col as f32 * 64.0, 640.0, 64.0, 64.0));
        }
        map
    }

    #[test]
    fn dropped_body_rests_exactly_on_solid_top() {
        let map = flat_map();
        let mut body = Body::new(Vec2::new(100.0, 400.0), Vec2::new(32.0, 48.0));
        for _ in 0..120 {
            body.step(&map, IDLE, SIM_DT);
        }
        assert_eq!(body.pos.y, 640.0 - 48.0);
        assert!(body.grounded);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn landing_raises_landed_event_once() {
        let map = flat_map();
        let mut body = Body::new(Vec2::new(100.0, 500.0), Vec2::new(32.0, 48.0));
        let mut landings = 0;
        for _ in 0..120 {
            if body.step(&map, IDLE, SIM_DT).landed {
                landings += 1;
            }
        }
        assert_eq!(landings, 1);
    }

    #[test]
    fn one_way_platform_passes_upward_blocks_downward() {
        let mut map = TileMap::new(640.0, 640.0);
        map.push_one_way(Rect::new(0.0, 320.0, 640.0, 8.0));

        // Moving up through the platform: never collides
        let mut body = Body::new(Vec2::new(100.0, 400.0), Vec2::new(32.0, 48.0));
        body.vel.y = -JUMP_VELOCITY;
        let mut min_y = body.pos.y;
        for _ in 0..30 {
            let ev = body.step(&map, IDLE, SIM_DT);
            assert!(!ev.bonked);
            min_y = min_y.min(body.pos.y);
        }
        assert!(min_y < 320.0 - 48.0, "body should rise past the platform");

        // Falling back down: stopped at the platform's top edge
        for _ in 0..240 {
            body.step(&map, IDLE, SIM_DT);
        }
        assert_eq!(body.pos.y, 320.0 - 48.0);
        assert!(body.grounded);
    }

    #[test]
    fn jump_clears_grounded_same_tick() {
        let map = flat_map();
        let mut body = Body::new(Vec2::new(100.0, 592.0), Vec2::new(32.0, 48.0));
        // settle
        for _ in 0..10 {
            body.step(&map, IDLE, SIM_DT);
        }
        assert!(body.grounded);

        let ev = body.step(&map, MoveIntent { jump: true, ..IDLE }, SIM_DT);
        assert!(ev.jumped);
        assert!(!body.grounded);
        assert!(body.vel.y < 0.0);
    }

    #[test]
    fn coyote_window_allows_late_jump() {
        let map = flat_map();
        let mut body = Body::new(Vec2::new(100.0, 592.0), Vec2::new(32.0, 48.0));
        for _ in 0..10 {
            body.step(&map, IDLE, SIM_DT);
        }
        // Fake walking off a ledge: lose grounding without landing again
        body.grounded = false;
        body.coyote = COYOTE_TIME;
        body.pos.y = 400.0;

        let ev = body.step(&map, MoveIntent { jump: true, ..IDLE }, SIM_DT);
        assert!(ev.jumped);
    }

    #[test]
    fn side_collision_zeroes_vx_and_reports_wall() {
        let mut map = flat_map();
        map.push_solid(Rect::new(256.0, 576.0, 64.0, 64.0));
        let mut body = Body::new(Vec2::new(180.0, 592.0), Vec2::new(32.0, 48.0));
        let run = MoveIntent { dir: 1.0, ..IDLE };
        let mut hit = false;
        for _ in 0..120 {
            let ev = body.step(&map, run, SIM_DT);
            if ev.hit_wall {
                hit = true;
                assert_eq!(body.vel.x, 0.0);
                assert_eq!(body.pos.x, 256.0 - 32.0);
                break;
            }
        }
        assert!(hit);
    }

    #[test]
    fn level_edges_clamp_position() {
        let map = flat_map();
        let mut body = Body::new(Vec2::new(4.0, 592.0), Vec2::new(32.0, 48.0));
        let run_left = MoveIntent { dir: -1.0, ..IDLE };
        for _ in 0..30 {
            body.step(&map, run_left, SIM_DT);
        }
        assert_eq!(body.pos.x, 0.0);
        assert_eq!(body.vel.x, 0.0);
    }

    proptest! {
        /// After a step the body never overlaps any solid rect, whatever
        /// the starting position and velocity.
        #[test]
        fn never_rests_inside_solids(
            x in 0.0f32..600.0,
            y in 0.0f32..600.0,
            vx in -400.0f32..400.0,
            vy in -900.0f32..900.0,
            dir in -1i32..=1,
        ) {
            let mut map = TileMap::new(640.0, 640.0);
            for col in 0..10 {
                map.push_solid(Rect::new(col as f32 * 64.0, 512.0, 64.0, 64.0));
            }
            map.push_solid(Rect::new(320.0, 448.0, 64.0, 64.0));

            let mut body = Body::new(Vec2::new(x, y), Vec2::new(32.0, 48.0));
            prop_assume!(!map.overlaps(&body.rect()).any(|(_, k)| k == TileKind::Solid));
            body.vel = Vec2::new(vx, vy);

            for _ in 0..60 {
                body.step(&map, MoveIntent { dir: dir as f32, ..IDLE }, SIM_DT);
                let r = body.rect();
                prop_assert!(
                    !map.overlaps(&r).any(|(_, k)| k == TileKind::Solid),
                    "body at {:?} overlaps a solid tile",
                    r
                );
            }
        }
    }
}
