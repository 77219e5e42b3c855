//! Gameplay tuning
//!
//! Every knob the simulation reads, gathered in one serializable struct so
//! embedders can load overrides from JSON instead of recompiling. Defaults
//! come from [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Player movement knobs. Distances in pixels, speeds in pixels per
/// second, durations in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Sprite width
    pub width: f32,
    /// Sprite height
    pub height: f32,
    /// Horizontal run speed
    pub speed: f32,
    /// Downward speed applied every airborne tick
    pub gravity_speed: f32,
    /// Upward speed while the jump window is held
    pub jump_force: f32,
    /// Maximum jump window
    pub jump_duration: f32,
    /// Fraction of the window at full force; the rest tapers linearly
    pub jump_taper: f32,
    /// Extra downward speed while fast-fall is held airborne
    pub fast_fall_speed: f32,
    /// Horizontal dash speed (replaces run speed)
    pub dash_speed: f32,
    /// How long a dash lasts
    pub dash_duration: f32,
    /// Time after a dash ends before the next may start
    pub dash_cooldown: f32,
    /// Horizontal speed multiplier while on a slow tile
    pub slow_multiplier: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            speed: PLAYER_SPEED,
            gravity_speed: GRAVITY_SPEED,
            jump_force: JUMP_FORCE,
            jump_duration: JUMP_DURATION,
            jump_taper: JUMP_TAPER,
            fast_fall_speed: FAST_FALL_SPEED,
            dash_speed: DASH_SPEED,
            dash_duration: DASH_DURATION,
            dash_cooldown: DASH_COOLDOWN,
            slow_multiplier: SLOW_MULTIPLIER,
        }
    }
}

/// Top-level tuning handed to [`crate::sim::GameState::new`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    /// Whether an arrow disappears after hitting the player. When false the
    /// arrow keeps flying and can kill again after the respawn.
    pub arrow_consumed_on_hit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_overrides_single_field() {
        let t: Tuning = serde_json::from_str(r#"{"player":{"speed":240.0}}"#).unwrap();
        assert_eq!(t.player.speed, 240.0);
        assert_eq!(t.player.jump_force, JUMP_FORCE);
        assert!(!t.arrow_consumed_on_hit);
    }
}
