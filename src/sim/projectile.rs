//! Projectiles: coins to collect, arrows that kill, bullets in reserve

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::sprite::SpriteRef;
use crate::consts::{COIN_BOB_AMPLITUDE, COIN_BOB_FREQUENCY, PROJECTILE_GRAVITY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Collectible, stationary, render-only bob
    Coin,
    /// Perpetual hazard that respawns at its spawn point
    Arrow,
    /// Gravity-affected hazard; no map content spawns one today
    Bullet,
}

/// A dynamic non-player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub bounds: Aabb,
    pub vel: Vec2,
    pub sprite: Option<SpriteRef>,
    /// Spawn position, used for arrow respawn and coin scoring context
    origin: Vec2,
    /// Drives the coin's cosmetic bob; never touches collision bounds
    bob_timer: f32,
    /// Sprite animation clock for the render boundary
    anim_timer: f32,
    should_remove: bool,
}

impl Projectile {
    pub fn new(kind: ProjectileKind, bounds: Aabb, sprite: Option<SpriteRef>) -> Self {
        Self {
            kind,
            bounds,
            vel: Vec2::ZERO,
            sprite,
            origin: bounds.pos,
            bob_timer: 0.0,
            anim_timer: 0.0,
            should_remove: false,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn anim_timer(&self) -> f32 {
        self.anim_timer
    }

    /// Collision always uses the stable bounds; the coin bob is render-only
    pub fn collision_bounds(&self) -> Aabb {
        self.bounds
    }

    /// Where the renderer should draw this projectile this frame
    pub fn render_bounds(&self) -> Aabb {
        match self.kind {
            ProjectileKind::Coin => {
                let bob = (self.bob_timer * COIN_BOB_FREQUENCY * std::f32::consts::TAU).sin()
                    * COIN_BOB_AMPLITUDE
                    * 0.5;
                self.bounds.translated(Vec2::new(0.0, bob))
            }
            _ => self.bounds,
        }
    }

    pub fn mark_for_removal(&mut self) {
        self.should_remove = true;
    }

    pub fn should_be_removed(&self) -> bool {
        self.should_remove
    }

    /// Reset an arrow to its spawn point instead of destroying it
    pub fn respawn_at_origin(&mut self) {
        self.bounds.pos = self.origin;
        self.should_remove = false;
    }

    /// Per-tick update: variant physics, integration, animation clock,
    /// world-bounds check. Order matters; the bounds check runs on the
    /// freshly integrated position.
    pub fn update(&mut self, dt: f32, world_bounds: &Aabb) {
        match self.kind {
            ProjectileKind::Coin => {
                // Coins never move; only the bob clock advances
                self.bob_timer += dt;
            }
            ProjectileKind::Arrow => {
                self.bounds.pos += self.vel * dt;
            }
            ProjectileKind::Bullet => {
                self.vel.y += PROJECTILE_GRAVITY * dt;
                self.bounds.pos += self.vel * dt;
            }
        }

        self.anim_timer += dt;

        if !super::aabb::overlaps(&self.bounds, world_bounds) {
            match self.kind {
                // Infinite arrow trap: back to the spawn point, same tick
                ProjectileKind::Arrow => self.respawn_at_origin(),
                _ => self.mark_for_removal(),
            }
        }
    }

    /// Reaction to striking a static object. Returns true when the resolver
    /// should still push this projectile out of the static box.
    pub fn on_static_collision(&mut self, normal: Vec2) -> bool {
        match self.kind {
            ProjectileKind::Coin => {
                // Bounce with damping on the contact axis
                if normal.x != 0.0 {
                    self.vel.x = -self.vel.x * crate::consts::COIN_BOUNCE_DAMPING;
                }
                if normal.y != 0.0 {
                    self.vel.y = -self.vel.y * crate::consts::COIN_BOUNCE_DAMPING;
                }
                true
            }
            ProjectileKind::Arrow => {
                // Respawn replaces the push-out entirely
                self.respawn_at_origin();
                false
            }
            ProjectileKind::Bullet => {
                // Bullets stick where they land
                self.vel = Vec2::ZERO;
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{ARROW_SPEED, SIM_DT};

    fn world() -> Aabb {
        Aabb::new(0.0, 0.0, 640.0, 480.0)
    }

    #[test]
    fn coin_bounds_stable_under_bobbing() {
        let mut coin = Projectile::new(ProjectileKind::Coin, Aabb::new(96.0, 96.0, 32.0, 32.0), None);
        let before = coin.collision_bounds();
        let mut moved_render = false;
        for _ in 0..200 {
            coin.update(SIM_DT, &world());
            assert_eq!(coin.collision_bounds(), before);
            if coin.render_bounds() != before {
                moved_render = true;
            }
        }
        assert!(moved_render);
        assert!(!coin.should_be_removed());
    }

    #[test]
    fn arrow_respawns_past_world_bounds() {
        let mut arrow = Projectile::new(
            ProjectileKind::Arrow,
            Aabb::new(600.0, 100.0, 24.0, 8.0),
            None,
        )
        .with_velocity(Vec2::new(ARROW_SPEED, 0.0));

        // Long step carries it fully outside the world on a single tick
        arrow.update(1.0, &world());
        assert_eq!(arrow.bounds.pos, Vec2::new(600.0, 100.0));
        assert!(!arrow.should_be_removed());
    }

    #[test]
    fn arrow_respawns_on_static_hit() {
        let mut arrow = Projectile::new(
            ProjectileKind::Arrow,
            Aabb::new(64.0, 100.0, 24.0, 8.0),
            None,
        )
        .with_velocity(Vec2::new(ARROW_SPEED, 0.0));
        arrow.update(SIM_DT, &world());
        assert!(arrow.bounds.pos.x > 64.0);

        let push_out = arrow.on_static_collision(Vec2::new(-1.0, 0.0));
        assert!(!push_out);
        assert_eq!(arrow.bounds.pos, Vec2::new(64.0, 100.0));
    }

    #[test]
    fn bullet_falls_and_is_removed_outside_world() {
        let mut bullet = Projectile::new(
            ProjectileKind::Bullet,
            Aabb::new(100.0, 470.0, 8.0, 8.0),
            None,
        );
        for _ in 0..240 {
            bullet.update(SIM_DT, &world());
            if bullet.should_be_removed() {
                break;
            }
        }
        assert!(bullet.should_be_removed());
        assert!(bullet.vel.y > 0.0);
    }

    #[test]
    fn bullet_sticks_on_static_hit() {
        let mut bullet = Projectile::new(
            ProjectileKind::Bullet,
            Aabb::new(100.0, 100.0, 8.0, 8.0),
            None,
        )
        .with_velocity(Vec2::new(50.0, 80.0));
        assert!(bullet.on_static_collision(Vec2::new(0.0, -1.0)));
        assert_eq!(bullet.vel, Vec2::ZERO);
    }
}
