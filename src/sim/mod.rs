//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (entities in spawn order)
//! - No rendering or platform dependencies

pub mod body;
pub mod bullet;
pub mod enemy;
pub mod geom;
pub mod player;
pub mod tick;
pub mod tilemap;

pub use body::Body;
pub use bullet::Bullet;
pub use enemy::{Behavior, Enemy};
pub use geom::{Contact, Rect, Side, rects_intersect, resolve_contact};
pub use player::{Player, PlayerPhase};
pub use tick::{GameEvent, GamePhase, GameState, TickInput, tick};
pub use tilemap::{TileKind, TileMap};
