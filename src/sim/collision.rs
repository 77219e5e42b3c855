//! Pairwise collision resolution
//!
//! The tricky part of the runtime: every colliding pair computes its contact
//! once and fires callbacks on both participants with mirrored normals.
//! Only pairs with a static participant get a push-out, applied to the
//! dynamic side. Bounds are re-read per pair so a push-out from one pair is
//! visible to the next.


use super::aabb::{contact, overlaps};
use super::map::{Map, StaticHandle};
use super::player::Player;
use super::projectile::{Projectile, ProjectileKind};
use super::state::GameEvent;
use super::tile::TileKind;

/// Resolve the player against nearby static colliders.
///
/// Per colliding pair: contact, player callback with the normal pointing
/// toward the player, static-side reaction with the mirrored normal, then
/// the player is pushed out. Handles whose slot emptied since the query are
/// skipped, never fatal.
pub fn resolve_player_vs_statics(
    player: &mut Player,
    map: &mut Map,
    candidates: &[StaticHandle],
    events: &mut Vec<GameEvent>,
) {
    for &handle in candidates {
        let Some(bounds) = map.static_bounds(handle) else {
            continue;
        };
        if bounds.is_empty() {
            continue;
        }
        // Fresh read: an earlier pair may have moved the player
        let player_box = player.collision_bounds();
        if !overlaps(&player_box, &bounds) {
            continue;
        }
        let c = contact(&player_box, &bounds);

        player.on_collision(c.normal, c.penetration);
        match handle {
            StaticHandle::Tile { .. } => {
                if map.tile_kind(handle) == Some(TileKind::Trap) && !player.is_dead() {
                    player.set_dead(true);
                    events.push(GameEvent::TrapDeath);
                }
            }
            StaticHandle::Platform(i) => {
                if let Some(platform) = map.disappearing.get_mut(i) {
                    platform.on_player_collision(-c.normal);
                }
            }
        }

        player.set_pos(player.pos + c.normal * c.penetration);
    }
}

/// Resolve the player against every live projectile. Both are dynamic, so
/// there is no push-out; the projectile's reaction is the durable contract
/// (coin collected, arrow/bullet kill).
pub fn resolve_player_vs_projectiles(
    player: &mut Player,
    projectiles: &mut [Projectile],
    consume_arrows: bool,
    events: &mut Vec<GameEvent>,
) {
    for projectile in projectiles.iter_mut() {
        if projectile.should_be_removed() {
            continue;
        }
        let player_box = player.collision_bounds();
        let bounds = projectile.collision_bounds();
        if bounds.is_empty() || !overlaps(&player_box, &bounds) {
            continue;
        }
        // Both participants get their callback; neither is displaced
        let c = contact(&player_box, &bounds);
        player.on_collision(c.normal, c.penetration);

        match projectile.kind {
            ProjectileKind::Coin => {
                projectile.mark_for_removal();
                events.push(GameEvent::CoinCollected);
            }
            ProjectileKind::Arrow | ProjectileKind::Bullet => {
                if !player.is_dead() {
                    player.set_dead(true);
                    events.push(GameEvent::ArrowHit);
                }
                if consume_arrows {
                    projectile.mark_for_removal();
                }
            }
        }
    }
}

/// Resolve one projectile against nearby statics via the same pairwise
/// protocol: callback on the projectile (bounce/respawn/stick), then a
/// push-out unless the projectile respawned away from the contact.
pub fn resolve_projectile_vs_statics(
    projectile: &mut Projectile,
    map: &Map,
    candidates: &[StaticHandle],
) {
    for &handle in candidates {
        let Some(bounds) = map.static_bounds(handle) else {
            continue;
        };
        if bounds.is_empty() {
            continue;
        }
        let proj_box = projectile.collision_bounds();
        if !overlaps(&proj_box, &bounds) {
            continue;
        }
        let c = contact(&proj_box, &bounds);

        if projectile.on_static_collision(c.normal) {
            projectile.bounds.pos += c.normal * c.penetration;
        }
    }
}
