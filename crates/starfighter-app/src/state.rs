//! Application state shared between the host and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use starfighter_core::commands::SessionCommand;
use starfighter_core::state::SessionSnapshot;
use starfighter_sim::input::InputState;

/// Commands sent from the host to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A session command to forward to the simulation engine.
    Session(SessionCommand),
    /// Replace the engine's input state for subsequent ticks.
    Input(InputState),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Shared host state.
///
/// `mpsc::Sender` is Send but not Sync, so it sits behind a `Mutex`;
/// the latest snapshot is shared with the game loop thread through an
/// `Arc<Mutex<...>>` for synchronous polling.
pub struct AppState {
    /// `None` until the game loop is spawned.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Latest snapshot, updated by the game loop after each frame.
    pub latest_snapshot: Arc<Mutex<Option<SessionSnapshot>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.command_tx.lock().unwrap().is_none());
        assert!(state.latest_snapshot.lock().unwrap().is_none());
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::Session(SessionCommand::StartSession {
            archetype: "balanced".into(),
        }))
        .unwrap();
        tx.send(GameLoopCommand::Session(SessionCommand::Pause))
            .unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let mut commands = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            commands.push(cmd);
        }

        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            GameLoopCommand::Session(SessionCommand::StartSession { .. })
        ));
        assert!(matches!(
            commands[1],
            GameLoopCommand::Session(SessionCommand::Pause)
        ));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }
}
