//! Fundamental geometric and simulation types.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned hit-box extents, centered on an entity's position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HitBox {
    pub w: f32,
    pub h: f32,
}

impl HitBox {
    pub fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }
}

/// AABB overlap test between two centered hit-boxes.
///
/// Standard separating-axis check; pure and symmetric in its arguments.
pub fn check_aabb(a_pos: Vec2, a: HitBox, b_pos: Vec2, b: HitBox) -> bool {
    let ax = a_pos.x - a.w / 2.0;
    let ay = a_pos.y - a.h / 2.0;
    let bx = b_pos.x - b.w / 2.0;
    let by = b_pos.y - b.h / 2.0;
    ax < bx + b.w && ax + a.w > bx && ay < by + b.h && ay + a.h > by
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Fixed steps executed since session start.
    pub tick: u64,
    /// Simulated seconds (sums the effective, time-scaled dt).
    pub elapsed_secs: f32,
}

impl SimTime {
    /// Advance by one fixed step that simulated `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}
