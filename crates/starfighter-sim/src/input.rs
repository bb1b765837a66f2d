//! Per-tick input state supplied by the host's input capture layer.

use glam::Vec2;

/// Snapshot of player intent for one tick. The host sets this between
/// ticks; the simulation only reads it.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    /// Keyboard direction, -1..1 per axis (normalized on use).
    pub move_x: f32,
    pub move_y: f32,
    /// Touch seek target in playfield coordinates, if any.
    pub touch_target: Option<Vec2>,
    pub firing: bool,
}

impl InputState {
    /// Whether any fire intent is active (touch implies firing).
    pub fn wants_fire(&self) -> bool {
        self.firing || self.touch_target.is_some()
    }
}
