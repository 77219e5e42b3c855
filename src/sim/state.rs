//! Game state and simulation events
//!
//! Everything the tick mutates lives here: the world, the player, and the
//! per-tick event queue the embedder drains for audio/UI.

use glam::Vec2;

use super::map::Map;
use super::player::Player;
use super::projectile::ProjectileKind;
use crate::tuning::Tuning;

/// Things that happened during a tick that the embedder may care about
/// (sound effects, HUD updates). Drained by the caller after each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Player left the ground under their own power
    Jump,
    /// A dash started
    Dash,
    /// A coin was collected
    CoinCollected,
    /// An arrow or bullet hit the player
    ArrowHit,
    /// The player touched a trap tile
    TrapDeath,
    /// The player was reset to the start position
    Respawn,
    /// The last coin was collected
    Win,
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// The world: layers, projectiles, disappearing platforms
    pub map: Map,
    /// The player entity
    pub player: Player,
    /// Gameplay tuning, shared with the player at construction
    pub tuning: Tuning,
    /// Score, currently driven by coin pickups
    pub score: u64,
    /// Coins collected so far
    pub coins_collected: u32,
    /// Coins present when the map was loaded
    pub total_coins: u32,
    /// Death counter across respawns
    pub deaths: u32,
    /// Set once all coins are collected
    pub won: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events produced by the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Build a run from a loaded map. The player spawns at the map's
    /// start position, or the origin if the map does not name one.
    pub fn new(map: Map, tuning: Tuning) -> Self {
        let start = map.player_start().unwrap_or(Vec2::ZERO);
        let total_coins = map
            .projectiles
            .iter()
            .filter(|p| p.kind == ProjectileKind::Coin)
            .count() as u32;
        Self {
            map,
            player: Player::new(start, tuning.player),
            tuning,
            score: 0,
            coins_collected: 0,
            total_coins,
            deaths: 0,
            won: false,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Take the events queued by the most recent tick.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::aabb::Aabb;
    use crate::sim::projectile::Projectile;

    #[test]
    fn total_coins_counts_only_coins() {
        let mut map = Map::new(4, 4, 32.0, 32.0);
        map.projectiles.push(Projectile::new(
            ProjectileKind::Coin,
            Aabb::new(0.0, 0.0, 16.0, 16.0),
            None,
        ));
        map.projectiles.push(Projectile::new(
            ProjectileKind::Arrow,
            Aabb::new(64.0, 0.0, 24.0, 8.0),
            None,
        ));
        let state = GameState::new(map, Tuning::default());
        assert_eq!(state.total_coins, 1);
    }

    #[test]
    fn drain_events_empties_queue() {
        let map = Map::new(4, 4, 32.0, 32.0);
        let mut state = GameState::new(map, Tuning::default());
        state.events.push(GameEvent::Jump);
        let drained = state.drain_events();
        assert_eq!(drained, vec![GameEvent::Jump]);
        assert!(state.events.is_empty());
    }
}
