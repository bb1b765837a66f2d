//! Headless host: runs a scripted session against the simulation and
//! prints the HUD state once per second. Useful for profiling the core
//! and for eyeballing wave pacing without a renderer.

use std::env;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::info;

use starfighter_app::game_loop::spawn_game_loop;
use starfighter_app::state::GameLoopCommand;
use starfighter_core::commands::SessionCommand;
use starfighter_core::config::default_config;
use starfighter_core::enums::GameState;
use starfighter_progress::{JsonFileStore, ProgressTracker};
use starfighter_sim::engine::{SessionEngine, SimConfig};
use starfighter_sim::input::InputState;

fn main() {
    env_logger::init();

    let progress_path = env::var("STARFIGHTER_PROGRESS")
        .unwrap_or_else(|_| "starfighter_progress.json".into());
    let tracker = match ProgressTracker::new(JsonFileStore::new(&progress_path)) {
        Ok(tracker) => tracker,
        Err(err) => {
            eprintln!("cannot open progress store {progress_path:?}: {err}");
            std::process::exit(1);
        }
    };

    let seed = env::var("STARFIGHTER_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);
    let sim = SimConfig {
        seed,
        config: default_config(),
        bonus: tracker.active_bonus(),
    };
    let engine = match SessionEngine::new(sim) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            std::process::exit(1);
        }
    };
    info!("seed {seed}, progress at {progress_path:?}");

    let latest = Arc::new(Mutex::new(None));
    let tx = spawn_game_loop(engine, tracker, Arc::clone(&latest));

    tx.send(GameLoopCommand::Session(SessionCommand::StartSession {
        archetype: "balanced".into(),
    }))
    .expect("game loop thread alive");
    tx.send(GameLoopCommand::Input(InputState {
        firing: true,
        ..Default::default()
    }))
    .expect("game loop thread alive");

    loop {
        std::thread::sleep(Duration::from_secs(1));
        let Some(snapshot) = latest.lock().unwrap().clone() else {
            continue;
        };
        println!(
            "t={:.1}s wave {} (ch {}) score {} x{:.1} enemies {} state {:?}",
            snapshot.time.elapsed_secs,
            snapshot.wave.wave_number,
            snapshot.wave.chapter,
            snapshot.score.score,
            snapshot.score.multiplier,
            snapshot.enemies.len(),
            snapshot.state,
        );
        if snapshot.state == GameState::GameOver {
            println!(
                "game over: score {} max combo {}",
                snapshot.score.score, snapshot.score.max_combo
            );
            break;
        }
    }

    let _ = tx.send(GameLoopCommand::Shutdown);
}
