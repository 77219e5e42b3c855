//! Headless demo runner
//!
//! Loads a map from JSON, runs a scripted input sequence at the fixed
//! timestep, and logs the events the sim produces. Useful for smoke-testing
//! maps without a renderer; real embedders drive `sim::tick` themselves.

use std::fs;
use std::process::ExitCode;

use trapland::audio::{AudioSink, play_events};
use trapland::consts::SIM_DT;
use trapland::sim::{GameState, Map, TickInput, tick};
use trapland::{MapSource, Tuning};

/// Sink that logs instead of playing, so headless runs show triggers.
#[derive(Default)]
struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, id: &str) {
        log::info!("sound: {id}");
    }
}

fn load_map(path: &str) -> Map {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            log::error!("failed to read '{path}': {err}, using empty map");
            return Map::default();
        }
    };
    match MapSource::from_json(&text) {
        Ok(source) => Map::from_source(&source),
        Err(err) => {
            log::error!("failed to parse '{path}': {err}, using empty map");
            Map::default()
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(map_path) = args.next() else {
        eprintln!("usage: trapland <map.json> [seconds]");
        return ExitCode::FAILURE;
    };
    let seconds: f32 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10.0);

    let map = load_map(&map_path);
    let mut state = GameState::new(map, Tuning::default());
    log::info!(
        "map {}x{} tiles, {} projectiles, {} disappearing platforms",
        state.map.width(),
        state.map.height(),
        state.map.projectiles.len(),
        state.map.disappearing.len()
    );

    let mut audio = LogAudio;
    let ticks = (seconds / SIM_DT) as u64;
    for i in 0..ticks {
        // Scripted walk: hold right, hop once a second
        let input = TickInput {
            move_right: true,
            jump: i % 120 < 30,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        let events = state.drain_events();
        play_events(&mut audio, &events);
        if state.won {
            break;
        }
    }

    log::info!(
        "done after {} ticks: score {}, {}/{} coins, {} deaths{}",
        state.time_ticks,
        state.score,
        state.coins_collected,
        state.total_coins,
        state.deaths,
        if state.won { ", won" } else { "" }
    );
    ExitCode::SUCCESS
}
