//! Fixed timestep simulation tick
//!
//! Single-threaded, frame-stepped pipeline: move, probe, resolve, dispatch,
//! then bookkeeping. Two feedings of the same inputs produce the same state.

use super::collision::{
    resolve_player_vs_projectiles, resolve_player_vs_statics, resolve_projectile_vs_statics,
};
use super::state::{GameEvent, GameState};
use crate::consts::{GROUND_CHECK_HEIGHT, SLOW_LAYER};
use crate::sim::aabb::overlaps;

/// Debounced input intents for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub fast_fall: bool,
    pub dash: bool,
    pub crouch: bool,
}

/// Points awarded per coin
const COIN_SCORE: u64 = 100;

/// Advance the simulation by one fixed timestep.
///
/// Events from the previous tick are discarded; drain them before calling
/// this again if you need them.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    // 1. Player movement pass: intents to velocity, then integration
    state.player.update(dt, input, &mut state.events);

    // 2. Ground re-check, clear-only: grounded is granted by the landing
    // callback and nowhere else. The probe detects support that walked away
    // (ledges, vanished platforms); a probe hit without a landing must not
    // ground an airborne player short of contact.
    if state.player.grounded() {
        let probe = state.player.ground_probe(GROUND_CHECK_HEIGHT);
        let supported = state
            .map
            .statics_in_rect(&probe)
            .into_iter()
            .filter_map(|h| state.map.static_bounds(h))
            .any(|b| overlaps(&probe, &b));
        if !supported {
            state.player.set_grounded(false);
        }
    }

    // 3. Player vs nearby statics
    let candidates = state.map.statics_in_rect(&state.player.collision_bounds());
    resolve_player_vs_statics(
        &mut state.player,
        &mut state.map,
        &candidates,
        &mut state.events,
    );

    // 4. Player vs projectiles
    resolve_player_vs_projectiles(
        &mut state.player,
        &mut state.map.projectiles,
        state.tuning.arrow_consumed_on_hit,
        &mut state.events,
    );

    // 5. Projectile motion, then each surviving projectile against the
    // statics near it. The vector is detached so the map stays borrowable.
    state.map.update_projectiles(dt);
    let mut projectiles = std::mem::take(&mut state.map.projectiles);
    for projectile in &mut projectiles {
        if projectile.should_be_removed() {
            continue;
        }
        let nearby = state.map.statics_in_rect(&projectile.collision_bounds());
        resolve_projectile_vs_statics(projectile, &state.map, &nearby);
    }
    state.map.projectiles = projectiles;

    // 6. Disappearing platform timers
    state.map.update_disappearing(dt);

    // 7. Layer status effects. The trap re-check covers traps reached by
    // push-out rather than by direct contact.
    let player_box = state.player.collision_bounds();
    state
        .player
        .set_slowed(state.map.rect_on_layer(&player_box, SLOW_LAYER));
    if !state.player.is_dead() && state.map.rect_on_trap(&player_box) {
        state.player.set_dead(true);
        state.events.push(GameEvent::TrapDeath);
    }

    // 8. Death and win handling
    let coins_this_tick = state
        .events
        .iter()
        .filter(|e| **e == GameEvent::CoinCollected)
        .count() as u32;
    state.coins_collected += coins_this_tick;
    state.score += coins_this_tick as u64 * COIN_SCORE;
    if !state.won && state.total_coins > 0 && state.coins_collected >= state.total_coins {
        state.won = true;
        state.events.push(GameEvent::Win);
    }
    if state.player.is_dead() {
        state.deaths += 1;
        state.player.respawn();
        state.events.push(GameEvent::Respawn);
    }

    // 9. Prune, strictly after all dispatch so removal flags are settled
    state.map.remove_dead_projectiles();

    // 10. Derived animation state
    state.player.derive_state(dt);

    state.time_ticks += 1;
}
