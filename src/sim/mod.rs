//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (layers in file order, projectiles in spawn order)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod collision;
pub mod map;
pub mod player;
pub mod projectile;
pub mod sprite;
pub mod state;
pub mod tick;
pub mod tile;

pub use aabb::{Aabb, Contact, contact, overlaps};
pub use collision::{
    resolve_player_vs_projectiles, resolve_player_vs_statics, resolve_projectile_vs_statics,
};
pub use map::{Layer, Map, StaticHandle};
pub use player::{MovementState, Player};
pub use projectile::{Projectile, ProjectileKind};
pub use sprite::{SpriteRef, SrcRect, TextureId};
pub use state::{GameEvent, GameState};
pub use tick::{TickInput, tick};
pub use tile::{DisappearingPlatform, PlatformPhase, Tile, TileKind};
