//! Scripted enemies: movement patterns and aimed fire.

use glam::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use starfighter_core::config::EnemySpec;
use starfighter_core::constants::*;
use starfighter_core::enums::MovePattern;
use starfighter_core::types::HitBox;

use crate::entities::Bullet;

#[derive(Debug, Clone)]
pub struct Enemy {
    pub kind: String,
    pub pos: Vec2,
    pub hit: HitBox,
    pub hp: f32,
    pub max_hp: f32,
    pub score_value: u32,
    pub drop_rate: f32,
    pub size: f32,
    pub color: String,
    pub alive: bool,

    pattern: MovePattern,
    speed: f32,
    fire_rate: f32,
    fire_timer: f32,
    /// Seconds since spawn, drives the movement patterns.
    time: f32,
    start_x: f32,
    sine_amp: f32,
    sine_freq: f32,
}

impl Enemy {
    /// Spawn an enemy scaled by the current difficulty. The rng seeds
    /// per-enemy variation (fire delay, sine shape).
    pub fn spawn(
        kind: &str,
        spec: &EnemySpec,
        x: f32,
        y: f32,
        pattern: MovePattern,
        difficulty: f32,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let hp = (spec.hp * difficulty).ceil();
        Self {
            kind: kind.to_string(),
            pos: Vec2::new(x, y),
            hit: HitBox::new(spec.hit_w, spec.hit_h),
            hp,
            max_hp: hp,
            score_value: spec.score_value,
            drop_rate: spec.drop_rate,
            size: spec.size,
            color: spec.color.clone(),
            alive: true,
            pattern,
            speed: spec.speed * (1.0 + (difficulty - 1.0) * DIFFICULTY_SPEED_FACTOR),
            fire_rate: spec.fire_rate,
            fire_timer: 1.0 + rng.gen::<f32>() * 2.0,
            time: 0.0,
            start_x: x,
            sine_amp: 40.0 + rng.gen::<f32>() * 40.0,
            sine_freq: 1.5 + rng.gen::<f32>(),
        }
    }

    pub fn update(&mut self, dt: f32, player_pos: Option<Vec2>, bullets: &mut Vec<Bullet>) {
        self.time += dt;
        match self.pattern {
            MovePattern::Straight => {
                self.pos.y += self.speed * dt;
            }
            MovePattern::Sine => {
                self.pos.y += self.speed * dt;
                self.pos.x = self.start_x + (self.time * self.sine_freq).sin() * self.sine_amp;
            }
            MovePattern::Zigzag => {
                self.pos.y += self.speed * dt;
                self.pos.x += (self.time * 2.0).sin().signum() * self.speed * 0.5 * dt;
            }
            MovePattern::Dive => {
                self.pos.y += self.speed * dt * (1.0 + self.time * 0.3);
            }
        }

        if self.fire_rate > 0.0 {
            // The timer always runs; only the shot itself waits for
            // the enemy to be inside the combat band, so an enemy with
            // an expired timer fires as soon as it enters.
            self.fire_timer -= dt;
            let in_band = self.pos.y > 0.0 && self.pos.y < VIEW_H * ENEMY_COMBAT_BAND_FRAC;
            if self.fire_timer <= 0.0 && in_band {
                if let Some(target) = player_pos {
                    self.fire_at(target, bullets);
                }
                self.fire_timer = self.fire_rate;
            }
        }
    }

    fn fire_at(&self, target: Vec2, bullets: &mut Vec<Bullet>) {
        let muzzle = Vec2::new(self.pos.x, self.pos.y + self.size / 2.0);
        let delta = target - muzzle;
        let dist = delta.length();
        if dist < f32::EPSILON {
            return;
        }
        let vel = delta / dist * ENEMY_BULLET_SPEED;
        bullets.push(Bullet::hostile(muzzle, vel, ENEMY_CONTACT_DAMAGE as f32));
    }

    pub fn off_screen(&self) -> bool {
        let pad = ENEMY_OFFSCREEN_PAD;
        self.pos.y > VIEW_H + pad || self.pos.x < -pad || self.pos.x > VIEW_W + pad
    }
}
