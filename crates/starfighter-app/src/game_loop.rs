//! Game loop thread — feeds wall-clock time into the simulation at
//! 60Hz and publishes snapshots.
//!
//! Commands arrive via `mpsc` channel; the latest snapshot is stored
//! in shared state for synchronous polling. End-of-session progress
//! (milestones, lifetime totals) is merged here, on the edge into the
//! game-over state.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use log::error;

use starfighter_core::constants::TICK_RATE;
use starfighter_core::enums::GameState;
use starfighter_core::events::GameEvent;
use starfighter_core::state::SessionSnapshot;
use starfighter_progress::{ProgressStore, ProgressTracker};
use starfighter_sim::engine::SessionEngine;

use crate::state::GameLoopCommand;

/// Nominal duration of one frame.
const FRAME_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// The engine and progress tracker move into the thread; the returned
/// sender is the host's only handle on them.
pub fn spawn_game_loop<S>(
    engine: SessionEngine,
    tracker: ProgressTracker<S>,
    latest_snapshot: Arc<Mutex<Option<SessionSnapshot>>>,
) -> mpsc::Sender<GameLoopCommand>
where
    S: ProgressStore + Send + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    std::thread::Builder::new()
        .name("starfighter-game-loop".into())
        .spawn(move || {
            run_game_loop(engine, tracker, cmd_rx, &latest_snapshot);
        })
        .expect("Failed to spawn game loop thread");

    cmd_tx
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop<S: ProgressStore>(
    mut engine: SessionEngine,
    mut tracker: ProgressTracker<S>,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<SessionSnapshot>>,
) {
    let mut next_frame_time = Instant::now();
    let mut last_frame = Instant::now();
    let mut prev_state = engine.state();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Session(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Input(input)) => engine.set_input(input),
                Ok(GameLoopCommand::Shutdown) => return,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Feed elapsed wall time into the fixed-step accumulator
        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;
        let mut snapshot = engine.advance(dt);

        // 3. Merge progress on the edge into game over
        if snapshot.state == GameState::GameOver && prev_state != GameState::GameOver {
            match tracker.on_game_end(snapshot.wave.wave_number, snapshot.score.score) {
                Ok(unlocked) => {
                    for milestone in unlocked {
                        snapshot.events.push(GameEvent::MilestoneUnlocked {
                            id: milestone.id.to_string(),
                            name: milestone.name.to_string(),
                        });
                    }
                    engine.set_bonus(tracker.active_bonus());
                }
                Err(err) => error!("failed to persist progress: {err}"),
            }
        }
        prev_state = snapshot.state;

        // 4. Store latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Sleep until the next frame
        next_frame_time += FRAME_DURATION;
        let now = Instant::now();
        if next_frame_time > now {
            std::thread::sleep(next_frame_time - now);
        } else if now - next_frame_time > FRAME_DURATION * 2 {
            // Too far behind — reset to avoid catch-up spiral
            next_frame_time = now;
        }
    }
}
