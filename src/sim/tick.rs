//! One fixed-timestep simulation tick
//!
//! The whole game advances through [`tick`]: player step, enemy AI, bullet
//! flight, damage resolution, dead-entity removal, then the collectible and
//! exit checks. Randomness comes only from the seeded RNG inside
//! [`GameState`], so a seed plus an input sequence replays exactly.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::bullet::Bullet;
use super::enemy::Enemy;
use super::geom::{Rect, rects_intersect};
use super::player::{Player, PlayerPhase};
use super::tilemap::TileMap;
use crate::consts::*;
use crate::level::{EnemyKind, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    Paused,
    LevelComplete,
    GameOver,
}

/// Input intent for one tick. `jump` and `fire` may be held (the jump
/// buffer and the fire cooldown pace re-triggering); `pause` and `restart`
/// are press events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// -1..1 horizontal movement
    pub move_dir: f32,
    pub jump: bool,
    pub fire: bool,
    pub pause: bool,
    pub restart: bool,
}

/// What happened during a tick, for the caller to log or render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jumped,
    PlayerDamaged { remaining: u8 },
    PlayerDied,
    EnemyDied { id: u32 },
    BossDefeated,
    CollectibleTaken,
    ExitOpened,
    LevelComplete,
}

#[derive(Debug)]
pub struct GameState {
    pub map: TileMap,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    /// Remaining (uncollected) pickups
    pub collectibles: Vec<Rect>,
    pub exit: Option<Rect>,
    pub exit_open: bool,
    pub boss_defeated: bool,
    pub score: u32,
    pub phase: GamePhase,
    pub tick_count: u64,
    rng: Pcg32,
    boss_present: bool,
    // Pristine level data, kept so a restart can rebuild the world wholesale
    start_map: TileMap,
    enemy_spawns: Vec<(EnemyKind, Vec2)>,
    start_collectibles: Vec<Rect>,
}

impl GameState {
    pub fn new(level: &Level, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let player_size = Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT);
        let player = Player::new(level.player_spawn() - player_size / 2.0);
        let enemy_spawns = level.enemy_spawns().to_vec();
        let enemies = spawn_enemies(&enemy_spawns, &mut rng);

        Self {
            map: level.tile_map().clone(),
            player,
            enemies,
            bullets: Vec::new(),
            collectibles: level.collectibles().to_vec(),
            exit: level.exit(),
            exit_open: false,
            boss_defeated: false,
            score: 0,
            phase: GamePhase::Playing,
            tick_count: 0,
            rng,
            boss_present: level.has_boss(),
            start_map: level.tile_map().clone(),
            enemy_spawns,
            start_collectibles: level.collectibles().to_vec(),
        }
    }

    /// Rebuild the level wholesale: pristine tile map (planks back in
    /// place), fresh enemies and collectibles at their spawn tiles, player
    /// at the spawn point with full health, score cleared.
    fn restart(&mut self) {
        self.map = self.start_map.clone();
        self.enemies = spawn_enemies(&self.enemy_spawns, &mut self.rng);
        self.bullets.clear();
        self.collectibles = self.start_collectibles.clone();
        self.exit_open = false;
        self.boss_defeated = false;
        self.score = 0;
        self.player.respawn();
        self.phase = GamePhase::Playing;
    }

    fn exit_unlocked(&self) -> bool {
        self.collectibles.is_empty() && (!self.boss_present || self.boss_defeated)
    }
}

fn spawn_enemies(spawns: &[(EnemyKind, Vec2)], rng: &mut Pcg32) -> Vec<Enemy> {
    spawns
        .iter()
        .enumerate()
        .map(|(id, (kind, center))| {
            let id = id as u32;
            match kind {
                EnemyKind::Basic => Enemy::basic(id, *center),
                EnemyKind::Jumping => Enemy::jumping(id, *center, rng),
                EnemyKind::Ambush => Enemy::ambush(id, *center),
                EnemyKind::Boss => Enemy::boss(id, *center),
            }
        })
        .collect()
}

/// Advance the simulation by one fixed step (`SIM_DT`).
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match state.phase {
        GamePhase::Paused => {
            if input.pause {
                state.phase = GamePhase::Playing;
            }
            return events;
        }
        GamePhase::GameOver => {
            if input.restart {
                state.restart();
            }
            return events;
        }
        GamePhase::LevelComplete => return events,
        GamePhase::Playing => {
            if input.pause {
                state.phase = GamePhase::Paused;
                return events;
            }
        }
    }

    // Enemies perceive the player's position from the start of the tick
    let player_center = state.player.body.rect().center();

    let ev = state
        .player
        .update(&state.map, input.move_dir, input.jump, SIM_DT);
    if ev.jumped {
        events.push(GameEvent::Jumped);
    }

    if input.fire && state.player.can_fire() {
        let r = state.player.body.rect();
        let muzzle = if state.player.body.facing_right {
            Vec2::new(r.right(), r.y + r.h / 2.0)
        } else {
            Vec2::new(r.x, r.y + r.h / 2.0)
        };
        state
            .bullets
            .push(Bullet::fired_from(muzzle, state.player.body.facing_right));
        state.player.mark_fired();
    }

    for enemy in &mut state.enemies {
        enemy.update(&state.map, player_center, &mut state.rng, SIM_DT);
    }

    for bullet in &mut state.bullets {
        bullet.update(&state.map, SIM_DT);
    }

    // Bullets vs enemies: each bullet spends itself on the first enemy it
    // overlaps this tick
    let mut boss_killed = false;
    for bullet in &mut state.bullets {
        for enemy in &mut state.enemies {
            if enemy.alive() && bullet.hits(&enemy.body.rect()) {
                bullet.active = false;
                if enemy.take_damage(1) {
                    events.push(GameEvent::EnemyDied { id: enemy.id });
                    if enemy.is_boss() {
                        boss_killed = true;
                        state.score += SCORE_BOSS;
                    } else {
                        state.score += SCORE_KILL;
                    }
                }
                break;
            }
        }
    }

    // Contact damage: at most one hit per tick, invulnerability gates the rest
    if state.player.phase == PlayerPhase::Normal {
        let player_rect = state.player.body.rect();
        let hit = state
            .enemies
            .iter()
            .find(|e| e.alive() && rects_intersect(&player_rect, &e.body.rect()))
            .map(|e| e.body.rect().center());
        if let Some(source) = hit
            && state.player.take_damage(source)
        {
            if state.player.alive() {
                events.push(GameEvent::PlayerDamaged {
                    remaining: state.player.health,
                });
            } else {
                events.push(GameEvent::PlayerDied);
                state.phase = GamePhase::GameOver;
            }
        }
    }

    // Copy-and-filter removal after the update pass
    state.bullets.retain(|b| b.active);
    state.enemies.retain(Enemy::alive);
    if boss_killed {
        state.boss_defeated = true;
        state.map.remove_planks();
        events.push(GameEvent::BossDefeated);
    }

    // Pickups heal one point, capped at full health
    let player_rect = state.player.body.rect();
    let before = state.collectibles.len();
    state
        .collectibles
        .retain(|c| !rects_intersect(&player_rect, c));
    for _ in state.collectibles.len()..before {
        state.score += SCORE_COLLECTIBLE;
        state.player.heal(1);
        events.push(GameEvent::CollectibleTaken);
    }

    if !state.exit_open && state.exit_unlocked() {
        state.exit_open = true;
        events.push(GameEvent::ExitOpened);
    }
    if state.exit_open
        && state.player.alive()
        && let Some(exit) = state.exit
        && rects_intersect(&player_rect, &exit)
    {
        state.phase = GamePhase::LevelComplete;
        events.push(GameEvent::LevelComplete);
    }

    state.tick_count += 1;
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUN_RIGHT: TickInput = TickInput {
        move_dir: 1.0,
        jump: false,
        fire: false,
        pause: false,
        restart: false,
    };

    fn run(state: &mut GameState, input: TickInput, ticks: usize) -> Vec<GameEvent> {
        let mut all = Vec::new();
        for _ in 0..ticks {
            all.extend(tick(state, &input));
        }
        all
    }

    fn flat_level() -> Level {
        Level::parse(
            "X,.,.,.,.,.,.,.,E\n\
             G,G,G,G,G,G,G,G,G\n",
        )
        .unwrap()
    }

    #[test]
    fn running_right_on_open_exit_completes_the_level() {
        let level = flat_level();
        let mut state = GameState::new(&level, 1);

        // No collectibles and no boss: the exit opens on the first tick
        let first = tick(&mut state, &RUN_RIGHT);
        assert!(first.contains(&GameEvent::ExitOpened));

        let events = run(&mut state, RUN_RIGHT, 600);
        assert!(events.contains(&GameEvent::LevelComplete));
        assert_eq!(state.phase, GamePhase::LevelComplete);
        // Resting on the floor row: the player's feet sit on the tile tops
        assert_eq!(state.player.body.rect().bottom(), 64.0);
    }

    #[test]
    fn exit_stays_shut_until_all_collectibles_taken() {
        let level = Level::parse(
            "X,.,C,.,E\n\
             G,G,G,G,G\n",
        )
        .unwrap();
        let mut state = GameState::new(&level, 1);

        let events = run(&mut state, RUN_RIGHT, 600);
        let open_at = events
            .iter()
            .position(|e| *e == GameEvent::ExitOpened)
            .expect("exit should open");
        let taken_at = events
            .iter()
            .position(|e| *e == GameEvent::CollectibleTaken)
            .expect("collectible should be taken");
        assert!(taken_at <= open_at);
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert_eq!(state.score, SCORE_COLLECTIBLE);
    }

    #[test]
    fn contact_damage_is_gated_by_invulnerability() {
        let level = Level::parse(
            "X,B,.,.,.\n\
             G,G,G,G,G\n",
        )
        .unwrap();
        let mut state = GameState::new(&level, 1);

        let events = run(&mut state, RUN_RIGHT, 30);
        let hits = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerDamaged { .. }))
            .count();
        assert_eq!(hits, 1);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH - 1);
        assert_eq!(state.player.phase, PlayerPhase::Invulnerable);
    }

    #[test]
    fn repeated_contact_drains_health_to_game_over() {
        let level = Level::parse(
            "X,B,.,.,.\n\
             G,G,G,G,G\n",
        )
        .unwrap();
        let mut state = GameState::new(&level, 1);

        // Walk into the enemy until every health point is gone
        let events = run(&mut state, RUN_RIGHT, 60 * 20);
        assert!(events.contains(&GameEvent::PlayerDied));
        assert_eq!(state.phase, GamePhase::GameOver);

        // Restart respawns at the spawn tile with full health
        let restart = TickInput {
            restart: true,
            ..TickInput::default()
        };
        tick(&mut state, &restart);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
    }

    #[test]
    fn restart_rebuilds_the_whole_level() {
        let level = Level::parse(
            "X,C,B,.,R,Z,E\n\
             G,G,G,G,G,G,G\n",
        )
        .unwrap();
        let mut state = GameState::new(&level, 3);

        // Run into the enemy until the collectible is taken and the player
        // is dead
        let events = run(&mut state, RUN_RIGHT, 60 * 30);
        assert!(events.contains(&GameEvent::CollectibleTaken));
        assert!(events.contains(&GameEvent::PlayerDied));
        assert!(state.collectibles.is_empty());
        assert_eq!(state.score, SCORE_COLLECTIBLE);
        // Stand in for a boss kill earlier in the run
        state.map.remove_planks();
        state.boss_defeated = true;

        let restart = TickInput {
            restart: true,
            ..TickInput::default()
        };
        tick(&mut state, &restart);

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
        assert_eq!(state.collectibles.len(), 1);
        assert_eq!(state.enemies.len(), 2);
        // Enemies back at their spawn tiles, not mid-patrol
        assert_eq!(state.enemies[0].body.pos, Vec2::new(144.0, 16.0));
        assert!(state.map.has_planks());
        assert!(!state.boss_defeated);
        assert!(!state.exit_open);
        assert_eq!(state.score, 0);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn bullet_kills_enemy_and_scores() {
        let level = Level::parse(
            "X,.,.,B,.\n\
             G,G,G,G,G\n",
        )
        .unwrap();
        let mut state = GameState::new(&level, 1);

        let fire_once = TickInput {
            fire: true,
            ..TickInput::default()
        };
        let mut events = tick(&mut state, &fire_once);
        for _ in 0..60 {
            events.extend(tick(&mut state, &TickInput::default()));
        }
        assert!(events.iter().any(|e| matches!(e, GameEvent::EnemyDied { .. })));
        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, SCORE_KILL);
    }

    #[test]
    fn fire_cooldown_limits_rate() {
        let level = flat_level();
        let mut state = GameState::new(&level, 1);
        let fire = TickInput {
            fire: true,
            ..TickInput::default()
        };
        for _ in 0..10 {
            tick(&mut state, &fire);
        }
        // 10 ticks is well inside one cooldown window
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn boss_death_removes_planks_and_opens_exit() {
        // The exit sits behind a plank wall; the path clears only once the
        // boss is dead
        let level = Level::parse(
            "X,.,Z,.,R,.,E\n\
             G,G,G,G,G,G,G\n",
        )
        .unwrap();
        let mut state = GameState::new(&level, 7);
        assert!(state.map.has_planks());

        let fire = TickInput {
            fire: true,
            ..TickInput::default()
        };
        let mut events = Vec::new();
        for _ in 0..60 * 30 {
            events.extend(tick(&mut state, &fire));
            if state.boss_defeated {
                break;
            }
        }
        assert!(events.contains(&GameEvent::BossDefeated));
        assert!(!state.map.has_planks());
        assert!(events.contains(&GameEvent::ExitOpened));
        assert_eq!(state.score, SCORE_BOSS);
    }

    #[test]
    fn pause_freezes_the_simulation() {
        let level = flat_level();
        let mut state = GameState::new(&level, 1);
        run(&mut state, RUN_RIGHT, 10);
        let x = state.player.body.pos.x;

        let pause = TickInput {
            pause: true,
            ..TickInput::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);
        run(&mut state, RUN_RIGHT, 30);
        assert_eq!(state.player.body.pos.x, x);

        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn same_seed_and_inputs_replay_identically() {
        let level = Level::parse(
            "X,.,J,.,A,.,.,.,E\n\
             .,.,.,P,P,.,.,.,.\n\
             G,G,G,G,G,G,G,G,G\n",
        )
        .unwrap();
        let mut a = GameState::new(&level, 42);
        let mut b = GameState::new(&level, 42);

        for i in 0..600u32 {
            let input = TickInput {
                move_dir: if i % 120 < 60 { 1.0 } else { -1.0 },
                jump: i % 90 == 0,
                fire: i % 45 == 0,
                ..TickInput::default()
            };
            let ea = tick(&mut a, &input);
            let eb = tick(&mut b, &input);
            assert_eq!(ea, eb);
        }
        assert_eq!(a.player.body.pos, b.player.body.pos);
        assert_eq!(a.enemies.len(), b.enemies.len());
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.body.pos, eb.body.pos);
        }
    }
}
