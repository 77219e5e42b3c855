//! Static tiles and the disappearing platform state machine

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::sprite::SpriteRef;
use crate::consts::{DISAPPEAR_DELAY, REAPPEAR_DELAY, TRAP_HITBOX_REDUCTION};

/// What a static tile does to the player on contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileKind {
    /// Inert platform, no collision response of its own
    #[default]
    Plain,
    /// Lethal tile with a permanently shrunk hitbox
    Trap,
}

/// A static collider occupying one grid cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    /// Visual bounds, always the full tile cell
    pub bounds: Aabb,
    pub kind: TileKind,
    pub sprite: Option<SpriteRef>,
}

impl Tile {
    pub fn plain(bounds: Aabb, sprite: Option<SpriteRef>) -> Self {
        Self {
            bounds,
            kind: TileKind::Plain,
            sprite,
        }
    }

    pub fn trap(bounds: Aabb, sprite: Option<SpriteRef>) -> Self {
        Self {
            bounds,
            kind: TileKind::Trap,
            sprite,
        }
    }

    /// Hitbox used by the resolver. Traps collide with a centered sub-box
    /// so the player only dies on a real touch, not a corner graze.
    pub fn collision_bounds(&self) -> Aabb {
        match self.kind {
            TileKind::Plain => self.bounds,
            TileKind::Trap => self.bounds.shrunk_by(TRAP_HITBOX_REDUCTION),
        }
    }
}

/// Lifecycle of a disappearing platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlatformPhase {
    #[default]
    Visible,
    Disappearing,
    Disappeared,
    Reappearing,
}

/// A platform that vanishes shortly after being landed on and comes back
///
/// Stored outside the tile grid; the spatial query scans these linearly with
/// a `can_collide` filter since there are few of them relative to the grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisappearingPlatform {
    pub bounds: Aabb,
    pub sprite: Option<SpriteRef>,
    phase: PlatformPhase,
    /// Seconds since the last phase transition
    timer: f32,
    /// Latched on the triggering landing, cleared when fully reappeared
    triggered: bool,
    disappear_delay: f32,
    reappear_delay: f32,
}

impl DisappearingPlatform {
    pub fn new(bounds: Aabb, sprite: Option<SpriteRef>) -> Self {
        Self {
            bounds,
            sprite,
            phase: PlatformPhase::Visible,
            timer: 0.0,
            triggered: false,
            disappear_delay: DISAPPEAR_DELAY,
            reappear_delay: REAPPEAR_DELAY,
        }
    }

    pub fn phase(&self) -> PlatformPhase {
        self.phase
    }

    /// Solid only while fully visible
    pub fn can_collide(&self) -> bool {
        self.phase == PlatformPhase::Visible
    }

    pub fn is_visible(&self) -> bool {
        matches!(
            self.phase,
            PlatformPhase::Visible | PlatformPhase::Disappearing
        )
    }

    /// Empty whenever the platform cannot collide, so the spatial query and
    /// the strict overlap test exclude it naturally. A player standing inside
    /// when it vanishes simply stops colliding; they are never pushed out.
    pub fn collision_bounds(&self) -> Aabb {
        if self.can_collide() {
            self.bounds
        } else {
            Aabb::EMPTY
        }
    }

    /// Player contact callback. `normal` is the mirrored normal (pointing
    /// from the player toward this platform), so a landing from above
    /// arrives with normal.y > 0. Side and underside hits never trigger.
    pub fn on_player_collision(&mut self, normal: Vec2) {
        if self.phase != PlatformPhase::Visible {
            return;
        }
        if normal.y > 0.0 && !self.triggered {
            log::debug!("disappearing platform triggered at {:?}", self.bounds.pos);
            self.triggered = true;
            self.phase = PlatformPhase::Disappearing;
            self.timer = 0.0;
        }
    }

    /// Advance the time-driven phase machine
    pub fn update(&mut self, dt: f32) {
        if self.phase != PlatformPhase::Visible {
            self.timer += dt;
        }
        match self.phase {
            PlatformPhase::Visible => {}
            PlatformPhase::Disappearing => {
                if self.timer >= self.disappear_delay {
                    self.phase = PlatformPhase::Disappeared;
                    self.timer = 0.0;
                }
            }
            PlatformPhase::Disappeared => {
                if self.timer >= self.reappear_delay {
                    self.phase = PlatformPhase::Reappearing;
                    self.timer = 0.0;
                }
            }
            PlatformPhase::Reappearing => {
                // Single-tick transition; the latch clears so the platform
                // can be triggered again
                self.phase = PlatformPhase::Visible;
                self.triggered = false;
                self.timer = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{DISAPPEAR_DELAY, REAPPEAR_DELAY, SIM_DT};

    fn platform() -> DisappearingPlatform {
        DisappearingPlatform::new(Aabb::new(64.0, 128.0, 32.0, 32.0), None)
    }

    #[test]
    fn trap_hitbox_is_reduced() {
        let tile = Tile::trap(Aabb::new(0.0, 0.0, 32.0, 32.0), None);
        let hit = tile.collision_bounds();
        assert!(hit.size.x < 32.0 && hit.size.y < 32.0);
        assert_eq!(hit.center(), tile.bounds.center());
    }

    #[test]
    fn side_hit_does_not_trigger() {
        let mut p = platform();
        p.on_player_collision(Vec2::new(1.0, 0.0));
        p.on_player_collision(Vec2::new(0.0, -1.0)); // underside
        assert_eq!(p.phase(), PlatformPhase::Visible);
    }

    #[test]
    fn full_cycle_and_retrigger() {
        let mut p = platform();

        // Landing from above: mirrored normal points down into the platform
        p.on_player_collision(Vec2::new(0.0, 1.0));
        assert_eq!(p.phase(), PlatformPhase::Disappearing);

        p.update(DISAPPEAR_DELAY);
        assert_eq!(p.phase(), PlatformPhase::Disappeared);
        assert!(p.collision_bounds().is_empty());

        p.update(REAPPEAR_DELAY);
        assert_eq!(p.phase(), PlatformPhase::Reappearing);

        // One extra tick returns to Visible with the latch cleared
        p.update(SIM_DT);
        assert_eq!(p.phase(), PlatformPhase::Visible);
        assert!(!p.collision_bounds().is_empty());

        p.on_player_collision(Vec2::new(0.0, 1.0));
        assert_eq!(p.phase(), PlatformPhase::Disappearing);
    }

    #[test]
    fn retrigger_blocked_while_latched() {
        let mut p = platform();
        p.on_player_collision(Vec2::new(0.0, 1.0));
        // Still disappearing: further landings are ignored
        p.on_player_collision(Vec2::new(0.0, 1.0));
        assert_eq!(p.phase(), PlatformPhase::Disappearing);
    }
}
