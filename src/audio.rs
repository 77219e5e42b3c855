//! Audio trigger mapping
//!
//! The sim emits [`GameEvent`]s; this module maps them to stable sound
//! identifiers and hands them to whatever sink the embedder provides.
//! Playback failure is the sink's problem and never touches sim state.

use crate::sim::state::GameEvent;

/// Map a game event to its sound identifier, or `None` for silent events.
/// The identifiers are the asset keys embedders register sounds under;
/// respawn plays the generic death sound.
pub fn sound_id(event: GameEvent) -> Option<&'static str> {
    match event {
        GameEvent::Jump => Some("player_jump"),
        GameEvent::Dash => Some("player_dash"),
        GameEvent::CoinCollected => Some("player_collect_coin"),
        GameEvent::ArrowHit => Some("player_hit_by_arrow"),
        GameEvent::TrapDeath => Some("player_dead_by_trap"),
        GameEvent::Respawn => Some("player_death"),
        GameEvent::Win => Some("player_win"),
    }
}

/// Playback backend supplied by the embedder.
pub trait AudioSink {
    fn play(&mut self, id: &str);
}

/// Sink that discards everything. Used headless and in tests.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _id: &str) {}
}

/// Drain a tick's events into the sink.
pub fn play_events(sink: &mut dyn AudioSink, events: &[GameEvent]) {
    for &event in events {
        if let Some(id) = sound_id(event) {
            sink.play(id);
        }
    }
}
