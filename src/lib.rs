//! Trapland - a tile-based trap-land platformer runtime
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collision, player physics, entities)
//! - `map_source`: Pre-parsed tile-map data model (the map-file boundary)
//! - `render`: Sprite quad snapshots for an external renderer
//! - `audio`: Sound trigger identifiers for an external mixer
//! - `tuning`: Data-driven gameplay balance

pub mod audio;
pub mod map_source;
pub mod render;
pub mod sim;
pub mod tuning;

pub use map_source::MapSource;
pub use tuning::Tuning;

/// Gameplay constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Default tile dimensions (pixels)
    pub const TILE_WIDTH: f32 = 32.0;
    pub const TILE_HEIGHT: f32 = 32.0;

    /// Player sprite box
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 48.0;

    /// Horizontal run speed (px/s)
    pub const PLAYER_SPEED: f32 = 180.0;
    /// Constant downward velocity while airborne (px/s)
    pub const GRAVITY_SPEED: f32 = 400.0;
    /// Upward velocity while the jump hold window is open (px/s)
    pub const JUMP_FORCE: f32 = 420.0;
    /// Seconds the jump hold can extend the jump
    pub const JUMP_DURATION: f32 = 0.35;
    /// Jump hold strength multiplier for the second half of the window
    pub const JUMP_TAPER: f32 = 0.5;
    /// Extra downward velocity from fast-fall (px/s)
    pub const FAST_FALL_SPEED: f32 = 220.0;

    /// Dash burst speed (px/s)
    pub const DASH_SPEED: f32 = 600.0;
    /// Seconds a dash lasts
    pub const DASH_DURATION: f32 = 0.18;
    /// Seconds before another dash may start
    pub const DASH_COOLDOWN: f32 = 0.8;

    /// Speed/jump multiplier while on a slow layer
    pub const SLOW_MULTIPLIER: f32 = 0.5;

    /// Height of the probe rect used for the grounded re-check (px)
    pub const GROUND_CHECK_HEIGHT: f32 = 2.0;

    /// Fraction of a trap tile's visual box removed from its hitbox
    pub const TRAP_HITBOX_REDUCTION: f32 = 0.3;

    /// Disappearing platform delays (seconds)
    pub const DISAPPEAR_DELAY: f32 = 0.5;
    pub const REAPPEAR_DELAY: f32 = 3.0;

    /// Arrow projectile
    pub const ARROW_SPEED: f32 = 150.0;
    pub const ARROW_WIDTH: f32 = 24.0;
    pub const ARROW_HEIGHT: f32 = 8.0;
    /// Gravity applied to bullets, px/s^2 (coins and arrows are exempt)
    pub const PROJECTILE_GRAVITY: f32 = 300.0;

    /// Coin bob animation (render-only)
    pub const COIN_BOB_AMPLITUDE: f32 = 16.0;
    pub const COIN_BOB_FREQUENCY: f32 = 2.0;

    /// Velocity retained by a coin bouncing off a static object
    pub const COIN_BOUNCE_DAMPING: f32 = 0.7;

    /// Layer names with load-time semantics
    pub const BACKGROUND_LAYER: &str = "background";
    pub const COINS_LAYER: &str = "coins";
    pub const TRAPS_LAYER: &str = "traps";
    pub const DISAPPEAR_LAYER: &str = "disappearing";
    pub const ARROWS_LAYER: &str = "arrows";
    pub const SLOW_LAYER: &str = "slow";
}
