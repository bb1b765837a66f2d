//! Session commands sent from the host (UI/input layer) to the simulation.
//!
//! Commands are queued and validated against the current state at the
//! next tick boundary; invalid transitions are ignored.

use serde::{Deserialize, Serialize};

/// All session-level state transition requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionCommand {
    /// Open the ship selection screen (valid from Menu).
    OpenShipSelect,
    /// Start a new session with the given player archetype key.
    StartSession { archetype: String },
    /// Pause the simulation (valid from Playing).
    Pause,
    /// Resume a paused simulation.
    Resume,
    /// Dismiss the chapter transition banner early.
    DismissTransition,
    /// Abandon the session and return to the menu.
    QuitToMenu,
}
