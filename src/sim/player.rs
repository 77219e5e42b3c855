//! Player movement, jump/dash/crouch state and the state-dependent hitbox
//!
//! The float `pos` is the physics source of truth; the sprite `rect` is
//! synced from it after every movement. Movement state is strictly derived
//! from the physics flags once per tick, never set from outside.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::state::GameEvent;
use super::tick::TickInput;
use crate::tuning::PlayerTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MovementState {
    #[default]
    Idle,
    Moving,
    Jumping,
    Crouching,
}

/// Per-state hitbox shrink parameters, as fractions of the sprite box.
/// Hand-tuned so the collision box hugs the drawn character; the horizontal
/// offset leans into the facing direction.
#[derive(Debug, Clone, Copy)]
struct HitboxProfile {
    shrink_w: f32,
    shrink_h: f32,
    offset_x: f32,
    offset_y: f32,
}

fn hitbox_profile(state: MovementState) -> HitboxProfile {
    match state {
        MovementState::Idle => HitboxProfile {
            shrink_w: 0.30,
            shrink_h: 0.08,
            offset_x: 0.02,
            offset_y: 0.08,
        },
        MovementState::Moving => HitboxProfile {
            shrink_w: 0.24,
            shrink_h: 0.08,
            offset_x: 0.05,
            offset_y: 0.08,
        },
        MovementState::Jumping => HitboxProfile {
            shrink_w: 0.28,
            shrink_h: 0.14,
            offset_x: 0.04,
            offset_y: 0.14,
        },
        // Crouch folds the top of the box down; feet stay planted
        MovementState::Crouching => HitboxProfile {
            shrink_w: 0.22,
            shrink_h: 0.38,
            offset_x: 0.02,
            offset_y: 0.38,
        },
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Precise physics position (top-left of the sprite box)
    pub pos: Vec2,
    pub vel: Vec2,
    /// Sprite box synced from `pos` every tick
    rect: Aabb,
    state: MovementState,
    /// Seconds spent in the current movement state (animation clock)
    state_time: f32,
    /// +1 facing right, -1 facing left
    facing: i32,

    grounded: bool,
    jumping: bool,
    jump_timer: f32,
    crouching: bool,

    dashing: bool,
    dash_dir: i32,
    dash_timer: f32,
    dash_cooldown_timer: f32,

    slowed: bool,
    dead: bool,

    start_pos: Vec2,
    tuning: PlayerTuning,
}

impl Player {
    pub fn new(start: Vec2, tuning: PlayerTuning) -> Self {
        Self {
            pos: start,
            vel: Vec2::ZERO,
            rect: Aabb {
                pos: start,
                size: Vec2::new(tuning.width, tuning.height),
            },
            state: MovementState::Idle,
            state_time: 0.0,
            facing: 1,
            grounded: false,
            jumping: false,
            jump_timer: 0.0,
            crouching: false,
            dashing: false,
            dash_dir: 1,
            dash_timer: 0.0,
            dash_cooldown_timer: 0.0,
            slowed: false,
            dead: false,
            start_pos: start,
            tuning,
        }
    }

    pub fn state(&self) -> MovementState {
        self.state
    }

    pub fn state_time(&self) -> f32 {
        self.state_time
    }

    pub fn facing(&self) -> i32 {
        self.facing
    }

    /// Sprite box in world space (render destination)
    pub fn rect(&self) -> Aabb {
        self.rect
    }

    pub fn grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn is_dashing(&self) -> bool {
        self.dashing
    }

    pub fn is_crouching(&self) -> bool {
        self.crouching
    }

    pub fn dash_cooldown_remaining(&self) -> f32 {
        self.dash_cooldown_timer
    }

    pub fn is_slowed(&self) -> bool {
        self.slowed
    }

    pub fn set_slowed(&mut self, slowed: bool) {
        self.slowed = slowed;
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn set_dead(&mut self, dead: bool) {
        self.dead = dead;
    }

    pub fn start_pos(&self) -> Vec2 {
        self.start_pos
    }

    fn effective_speed(&self) -> f32 {
        if self.slowed {
            self.tuning.speed * self.tuning.slow_multiplier
        } else {
            self.tuning.speed
        }
    }

    fn effective_jump_force(&self) -> f32 {
        if self.slowed {
            self.tuning.jump_force * self.tuning.slow_multiplier
        } else {
            self.tuning.jump_force
        }
    }

    /// Collision box: a state-dependent sub-rectangle of the sprite box,
    /// looked up fresh every tick. The bottom edge stays flush with the
    /// sprite's feet; the horizontal lean follows facing.
    pub fn collision_bounds(&self) -> Aabb {
        let p = hitbox_profile(self.state);
        let w = self.rect.size.x * (1.0 - p.shrink_w);
        let h = self.rect.size.y * (1.0 - p.shrink_h);
        let x = self.rect.pos.x
            + (self.rect.size.x - w) * 0.5
            + self.facing as f32 * p.offset_x * self.rect.size.x;
        let y = self.rect.pos.y + p.offset_y * self.rect.size.y;
        Aabb::new(x, y, w, h)
    }

    /// Thin probe just below the collision box for the grounded re-check
    pub fn ground_probe(&self, probe_height: f32) -> Aabb {
        let b = self.collision_bounds();
        Aabb::new(b.left(), b.bottom(), b.size.x, probe_height)
    }

    pub fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
        self.rect.pos = pos;
    }

    fn sync_rect(&mut self) {
        self.rect.pos = self.pos;
    }

    fn reset_jump(&mut self) {
        self.jumping = false;
        self.jump_timer = 0.0;
    }

    fn reset_dash(&mut self) {
        self.dashing = false;
        self.dash_timer = 0.0;
        self.dash_cooldown_timer = 0.0;
    }

    pub fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
        if grounded {
            self.reset_jump();
        }
    }

    /// Single movement pass: resolve intents into velocity and integrate.
    /// Order is load-bearing; see each step.
    pub fn update(&mut self, dt: f32, input: &TickInput, events: &mut Vec<GameEvent>) {
        // 1. Grounded crouch freezes the player entirely, gravity included
        if input.crouch && self.grounded {
            self.crouching = true;
            self.vel = Vec2::ZERO;
            self.sync_rect();
            return;
        }
        self.crouching = false;

        // 2. Dash: gated on cooldown, suppresses ordinary movement while
        // active, moves at a fixed burst speed in the facing direction
        if input.dash && self.dash_cooldown_timer <= 0.0 && !self.dashing {
            self.dashing = true;
            self.dash_timer = 0.0;
            self.dash_dir = self.facing;
            self.jumping = false;
            events.push(GameEvent::Dash);
        }
        if self.dashing {
            self.pos.x += self.tuning.dash_speed * self.dash_dir as f32 * dt;
            self.dash_timer += dt;
            if self.dash_timer >= self.tuning.dash_duration {
                self.dashing = false;
                self.dash_timer = 0.0;
                self.dash_cooldown_timer = self.tuning.dash_cooldown;
            }
            self.sync_rect();
            return;
        }
        if self.dash_cooldown_timer > 0.0 {
            self.dash_cooldown_timer -= dt;
            if self.dash_cooldown_timer <= 0.0 {
                self.reset_dash();
            }
        }

        // 3. Horizontal intent, slow status applied
        let axis = input.move_right as i32 - input.move_left as i32;
        if axis != 0 {
            self.facing = axis;
            self.vel.x = axis as f32 * self.effective_speed();
        } else {
            self.vel.x = 0.0;
        }

        // 4. Vertical: semi-impulse model. Velocity is reset from the
        // gravity constant each tick, then jump/fast-fall layer on top.
        self.vel.y = self.tuning.gravity_speed;
        if self.grounded && input.jump {
            self.vel.y = -self.effective_jump_force();
            self.jumping = true;
            self.grounded = false;
            self.jump_timer = 0.0;
            events.push(GameEvent::Jump);
        } else if self.jumping {
            if input.jump && self.jump_timer < self.tuning.jump_duration {
                // Variable-height jump: full strength for the first half of
                // the hold window, tapered for the second half
                self.jump_timer += dt;
                let strength = if self.jump_timer < self.tuning.jump_duration * 0.5 {
                    1.0
                } else {
                    self.tuning.jump_taper
                };
                self.vel.y = -self.effective_jump_force() * strength;
            } else if !input.jump {
                // Releasing jump ends the hold extension for this jump
                self.jump_timer = self.tuning.jump_duration;
            }
        }
        if input.fast_fall && !self.grounded {
            self.vel.y += self.tuning.fast_fall_speed;
        }

        // 5. Integrate. A grounded player never accumulates downward motion.
        if self.grounded && self.vel.y > 0.0 {
            self.vel.y = 0.0;
        }
        self.pos += self.vel * dt;
        self.sync_rect();
    }

    /// Resolver callback. The normal points from the static object toward
    /// the player, so y < 0 is a landing and y > 0 a ceiling hit.
    pub fn on_collision(&mut self, normal: Vec2, _penetration: f32) {
        if normal.y.abs() > 0.5 {
            if normal.y < 0.0 {
                self.vel.y = 0.0;
                self.set_grounded(true);
            } else {
                if self.vel.y < 0.0 {
                    self.vel.y = 0.0;
                }
                self.grounded = false;
            }
        } else if normal.x.abs() > 0.5 {
            self.vel.x = 0.0;
            self.grounded = false;
        }
    }

    /// Recompute the derived movement state. Priority: crouching > jumping >
    /// dashing-or-moving > idle. A state change restarts the animation clock.
    pub fn derive_state(&mut self, dt: f32) {
        let next = if self.crouching {
            MovementState::Crouching
        } else if self.jumping {
            MovementState::Jumping
        } else if self.dashing || self.vel.x != 0.0 {
            MovementState::Moving
        } else {
            MovementState::Idle
        };
        if next != self.state {
            self.state = next;
            self.state_time = 0.0;
        } else {
            self.state_time += dt;
        }
    }

    /// Soft reset after death; the player entity itself is never destroyed
    pub fn respawn(&mut self) {
        self.set_pos(self.start_pos);
        self.vel = Vec2::ZERO;
        self.dead = false;
        self.grounded = false;
        self.reset_jump();
        self.reset_dash();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn player() -> Player {
        Player::new(Vec2::new(100.0, 100.0), PlayerTuning::default())
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn hold_jump() -> TickInput {
        TickInput {
            jump: true,
            ..TickInput::default()
        }
    }

    /// Simulate in a vacuum (no collisions) and return the peak height
    /// gained relative to the start, holding jump for `hold` seconds.
    fn peak_height(hold: f32) -> f32 {
        let mut p = player();
        p.set_grounded(true);
        let start_y = p.pos.y;
        let mut events = Vec::new();
        let mut peak = 0.0f32;
        let mut t = 0.0;
        while t < 2.0 {
            let input = if t < hold { hold_jump() } else { idle() };
            p.update(SIM_DT, &input, &mut events);
            peak = peak.max(start_y - p.pos.y);
            t += SIM_DT;
        }
        peak
    }

    #[test]
    fn jump_height_monotonic_with_hold() {
        let short = peak_height(0.05);
        let mid = peak_height(0.2);
        let full = peak_height(0.4);
        assert!(short > 0.0);
        assert!(mid >= short);
        assert!(full >= mid);
        // The cap actually binds: holding past the window adds nothing
        let over = peak_height(1.0);
        assert!((over - full).abs() < 1.0);
    }

    #[test]
    fn dash_cooldown_gates_restart() {
        let mut p = player();
        p.set_grounded(true);
        let mut events = Vec::new();
        let dash = TickInput {
            dash: true,
            ..TickInput::default()
        };

        p.update(SIM_DT, &dash, &mut events);
        assert!(p.is_dashing());

        // Run the dash out
        let mut guard = 0;
        while p.is_dashing() {
            p.update(SIM_DT, &dash, &mut events);
            guard += 1;
            assert!(guard < 1000);
        }
        assert!(p.dash_cooldown_remaining() > 0.0);

        // Requesting a dash while cooling down must not start one
        p.update(SIM_DT, &dash, &mut events);
        assert!(!p.is_dashing());
    }

    #[test]
    fn dash_moves_in_facing_direction() {
        let mut p = player();
        p.set_grounded(true);
        let mut events = Vec::new();
        let left = TickInput {
            move_left: true,
            ..TickInput::default()
        };
        p.update(SIM_DT, &left, &mut events);
        let x_before = p.pos.x;

        let dash = TickInput {
            dash: true,
            ..TickInput::default()
        };
        p.update(SIM_DT, &dash, &mut events);
        assert!(p.pos.x < x_before);
    }

    #[test]
    fn grounded_crouch_freezes_everything() {
        let mut p = player();
        p.set_grounded(true);
        let mut events = Vec::new();
        let input = TickInput {
            crouch: true,
            move_right: true,
            ..TickInput::default()
        };
        let before = p.pos;
        p.update(SIM_DT, &input, &mut events);
        assert_eq!(p.pos, before);
        assert_eq!(p.vel, Vec2::ZERO);
        p.derive_state(SIM_DT);
        assert_eq!(p.state(), MovementState::Crouching);
    }

    #[test]
    fn airborne_crouch_is_ignored() {
        let mut p = player();
        let mut events = Vec::new();
        let input = TickInput {
            crouch: true,
            ..TickInput::default()
        };
        let before_y = p.pos.y;
        p.update(SIM_DT, &input, &mut events);
        assert!(p.pos.y > before_y); // gravity still applies
        assert!(!p.is_crouching());
    }

    #[test]
    fn state_priority_order() {
        let mut p = player();
        p.vel.x = 10.0;
        p.derive_state(SIM_DT);
        assert_eq!(p.state(), MovementState::Moving);

        p.jumping = true;
        p.derive_state(SIM_DT);
        assert_eq!(p.state(), MovementState::Jumping);

        p.crouching = true;
        p.derive_state(SIM_DT);
        assert_eq!(p.state(), MovementState::Crouching);
    }

    #[test]
    fn state_change_resets_animation_clock() {
        let mut p = player();
        p.derive_state(SIM_DT);
        p.derive_state(SIM_DT);
        assert!(p.state_time() > 0.0);
        p.vel.x = 10.0;
        p.derive_state(SIM_DT);
        assert_eq!(p.state_time(), 0.0);
    }

    #[test]
    fn hitbox_tracks_state_and_facing() {
        let mut p = player();
        p.derive_state(SIM_DT);
        let idle_box = p.collision_bounds();
        assert!(idle_box.size.x < p.rect().size.x);
        assert!(idle_box.size.y < p.rect().size.y);

        p.facing = -1;
        let left_box = p.collision_bounds();
        assert!(left_box.left() < idle_box.left());

        p.facing = 1;
        p.crouching = true;
        p.derive_state(SIM_DT);
        let crouch_box = p.collision_bounds();
        assert!(crouch_box.size.y < idle_box.size.y);
        // Feet stay planted: bottom edges match the sprite box
        assert!((crouch_box.bottom() - p.rect().bottom()).abs() < 1e-4);
    }

    #[test]
    fn landing_callback_grounds_and_resets_jump() {
        let mut p = player();
        p.jumping = true;
        p.vel.y = 120.0;
        p.on_collision(Vec2::new(0.0, -1.0), 3.0);
        assert!(p.grounded());
        assert!(!p.is_jumping());
        assert_eq!(p.vel.y, 0.0);
    }

    #[test]
    fn ceiling_callback_stops_ascent_only() {
        let mut p = player();
        p.vel.y = -200.0;
        p.on_collision(Vec2::new(0.0, 1.0), 3.0);
        assert_eq!(p.vel.y, 0.0);
        assert!(!p.grounded());

        // Already descending: untouched
        p.vel.y = 50.0;
        p.on_collision(Vec2::new(0.0, 1.0), 3.0);
        assert_eq!(p.vel.y, 50.0);
    }

    #[test]
    fn wall_callback_stops_horizontal() {
        let mut p = player();
        p.vel.x = 180.0;
        p.on_collision(Vec2::new(-1.0, 0.0), 2.0);
        assert_eq!(p.vel.x, 0.0);
    }

    #[test]
    fn slow_status_halves_speed() {
        let mut p = player();
        p.set_grounded(true);
        let mut events = Vec::new();
        let right = TickInput {
            move_right: true,
            ..TickInput::default()
        };
        p.update(SIM_DT, &right, &mut events);
        let full = p.vel.x;

        p.set_slowed(true);
        p.update(SIM_DT, &right, &mut events);
        assert!(p.vel.x < full);
    }

    #[test]
    fn respawn_is_a_soft_reset() {
        let mut p = player();
        p.set_pos(Vec2::new(500.0, 500.0));
        p.set_dead(true);
        p.respawn();
        assert_eq!(p.pos, p.start_pos());
        assert!(!p.is_dead());
        assert!(!p.grounded());
    }
}
