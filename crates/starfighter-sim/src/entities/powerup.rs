//! Falling powerup pickups.

use glam::Vec2;

use starfighter_core::constants::*;
use starfighter_core::enums::PowerUpKind;
use starfighter_core::types::HitBox;

#[derive(Debug, Clone)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub hit: HitBox,
    pub lifetime: f32,
    pub alive: bool,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            hit: HitBox::new(POWERUP_HIT, POWERUP_HIT),
            lifetime: POWERUP_LIFETIME_SECS,
            alive: true,
        }
    }

    /// Fall, age out, and drift toward a magnetized player.
    pub fn update(&mut self, dt: f32, magnet_target: Option<(Vec2, f32)>) {
        self.pos.y += POWERUP_FALL_SPEED * dt;

        if let Some((target, range)) = magnet_target {
            let delta = target - self.pos;
            let dist = delta.length();
            if dist < range && dist > 1.0 {
                self.pos += delta / dist * MAGNET_ATTRACT_SPEED * dt;
            }
        }

        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            self.alive = false;
        }
    }

    pub fn off_screen(&self) -> bool {
        self.pos.y > VIEW_H + POWERUP_OFFSCREEN_PAD
    }
}
