//! Projectiles, friendly and hostile.

use glam::Vec2;

use starfighter_core::constants::*;
use starfighter_core::types::HitBox;

#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub hit: HitBox,
    pub alive: bool,
    pub hostile: bool,
    /// Visual tier for friendly bullets (cosmetic only).
    pub fire_level: u8,
}

impl Bullet {
    pub fn friendly(pos: Vec2, vel: Vec2, damage: f32, fire_level: u8) -> Self {
        Self {
            pos,
            vel,
            damage,
            hit: HitBox::new(PLAYER_BULLET_HIT_W, PLAYER_BULLET_HIT_H),
            alive: true,
            hostile: false,
            fire_level,
        }
    }

    pub fn hostile(pos: Vec2, vel: Vec2, damage: f32) -> Self {
        Self {
            pos,
            vel,
            damage,
            hit: HitBox::new(ENEMY_BULLET_HIT, ENEMY_BULLET_HIT),
            alive: true,
            hostile: true,
            fire_level: 0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    pub fn off_screen(&self) -> bool {
        let pad = BULLET_OFFSCREEN_PAD;
        self.pos.x < -pad
            || self.pos.x > VIEW_W + pad
            || self.pos.y < -pad
            || self.pos.y > VIEW_H + pad
    }
}
