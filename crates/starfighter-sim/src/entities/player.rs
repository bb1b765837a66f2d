//! Player ship: movement, fire patterns, damage and status timers.

use glam::Vec2;

use starfighter_core::config::{SessionBonus, ShipSpec};
use starfighter_core::constants::*;
use starfighter_core::events::GameEvent;
use starfighter_core::types::HitBox;

use crate::entities::Bullet;
use crate::input::InputState;

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub hit: HitBox,
    pub archetype: String,
    pub speed: f32,
    pub fire_rate: f32,
    pub bullet_damage: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub fire_level: u8,
    pub alive: bool,

    pub invincible_timer: f32,
    pub shield: bool,
    pub shield_timer: f32,
    pub magnet: bool,
    pub magnet_timer: f32,
    pub spread: bool,
    pub spread_timer: f32,

    pub magnet_range: f32,
    shield_duration_bonus: f32,
    fire_timer: f32,
}

impl Player {
    pub fn new(archetype: &str, spec: &ShipSpec, bonus: &SessionBonus) -> Self {
        let max_hp = spec.max_hp + bonus.max_hp_bonus;
        Self {
            pos: Vec2::new(VIEW_W / 2.0, VIEW_H * PLAYER_SPAWN_Y_FRAC),
            hit: HitBox::new(PLAYER_HIT_W, PLAYER_HIT_H),
            archetype: archetype.to_string(),
            speed: spec.speed,
            fire_rate: spec.fire_rate,
            bullet_damage: spec.bullet_damage * bonus.damage_multiplier,
            hp: max_hp,
            max_hp,
            fire_level: (1 + bonus.start_fire_level).min(MAX_FIRE_LEVEL),
            alive: true,
            invincible_timer: 0.0,
            shield: false,
            shield_timer: 0.0,
            magnet: false,
            magnet_timer: 0.0,
            spread: false,
            spread_timer: 0.0,
            magnet_range: MAGNET_RANGE * bonus.magnet_range_multiplier,
            shield_duration_bonus: bonus.shield_duration_bonus,
            fire_timer: 0.0,
        }
    }

    pub fn invincible(&self) -> bool {
        self.invincible_timer > 0.0
    }

    /// Effective duration for a collected shield powerup.
    pub fn shield_duration(&self, base: f32) -> f32 {
        base + self.shield_duration_bonus
    }

    pub fn update(&mut self, dt: f32, input: &InputState, bullets: &mut Vec<Bullet>) {
        if let Some(target) = input.touch_target {
            let delta = target - self.pos;
            let dist = delta.length();
            if dist > 2.0 {
                let step = dist.min(self.speed * dt);
                self.pos += delta / dist * step;
            }
        } else {
            let mut dir = Vec2::new(input.move_x, input.move_y);
            if dir.length_squared() > 1.0 {
                dir = dir.normalize();
            }
            self.pos += dir * self.speed * dt;
        }
        self.pos.x = self.pos.x.clamp(PLAYER_MARGIN, VIEW_W - PLAYER_MARGIN);
        self.pos.y = self.pos.y.clamp(PLAYER_MARGIN, VIEW_H - PLAYER_MARGIN);

        self.fire_timer -= dt;
        if input.wants_fire() && self.fire_timer <= 0.0 {
            self.shoot(bullets);
            self.fire_timer = self.fire_rate;
        }

        if self.invincible_timer > 0.0 {
            self.invincible_timer -= dt;
        }
        if self.shield {
            self.shield_timer -= dt;
            if self.shield_timer <= 0.0 {
                self.shield = false;
            }
        }
        if self.magnet {
            self.magnet_timer -= dt;
            if self.magnet_timer <= 0.0 {
                self.magnet = false;
            }
        }
        if self.spread {
            self.spread_timer -= dt;
            if self.spread_timer <= 0.0 {
                self.spread = false;
            }
        }
    }

    /// Emit one volley at the current fire level.
    fn shoot(&self, bullets: &mut Vec<Bullet>) {
        let x = self.pos.x;
        let y = self.pos.y - MUZZLE_OFFSET;
        let dmg = self.bullet_damage;
        let lvl = self.fire_level;

        if self.spread {
            let count = ((lvl + 2).min(MAX_FIRE_LEVEL)) as usize;
            let start = (SPREAD_ANGLES.len() - count) / 2;
            for &angle in &SPREAD_ANGLES[start..start + count] {
                let vel = Vec2::new(
                    angle.sin() * SPREAD_BULLET_SPEED,
                    -angle.cos() * SPREAD_BULLET_SPEED,
                );
                bullets.push(Bullet::friendly(Vec2::new(x, y), vel, dmg, lvl));
            }
            return;
        }

        match lvl {
            1 => {
                bullets.push(Bullet::friendly(
                    Vec2::new(x, y),
                    Vec2::new(0.0, -450.0),
                    dmg,
                    lvl,
                ));
            }
            2 => {
                for dx in [-6.0, 6.0] {
                    bullets.push(Bullet::friendly(
                        Vec2::new(x + dx, y),
                        Vec2::new(0.0, -450.0),
                        dmg,
                        lvl,
                    ));
                }
            }
            3 => {
                bullets.push(Bullet::friendly(
                    Vec2::new(x, y),
                    Vec2::new(0.0, -460.0),
                    dmg,
                    lvl,
                ));
                for dx in [-10.0, 10.0] {
                    bullets.push(Bullet::friendly(
                        Vec2::new(x + dx, y + 4.0),
                        Vec2::new(0.0, -440.0),
                        dmg * 0.8,
                        lvl,
                    ));
                }
            }
            4 => {
                for dx in [-5.0, 5.0] {
                    bullets.push(Bullet::friendly(
                        Vec2::new(x + dx, y),
                        Vec2::new(0.0, -460.0),
                        dmg,
                        lvl,
                    ));
                }
                for dx in [-14.0, 14.0] {
                    let vx = if dx < 0.0 { -20.0 } else { 20.0 };
                    bullets.push(Bullet::friendly(
                        Vec2::new(x + dx, y + 4.0),
                        Vec2::new(vx, -440.0),
                        dmg * 0.7,
                        lvl,
                    ));
                }
            }
            _ => {
                bullets.push(Bullet::friendly(
                    Vec2::new(x, y - 2.0),
                    Vec2::new(0.0, -480.0),
                    dmg * 1.2,
                    lvl,
                ));
                for dx in [-8.0, 8.0] {
                    bullets.push(Bullet::friendly(
                        Vec2::new(x + dx, y),
                        Vec2::new(0.0, -460.0),
                        dmg,
                        lvl,
                    ));
                }
                for dx in [-16.0, 16.0] {
                    let vx = if dx < 0.0 { -30.0 } else { 30.0 };
                    bullets.push(Bullet::friendly(
                        Vec2::new(x + dx, y + 4.0),
                        Vec2::new(vx, -440.0),
                        dmg * 0.7,
                        lvl,
                    ));
                }
            }
        }
    }

    /// Apply `amount` hp of damage. Shields absorb one hit entirely.
    pub fn take_damage(&mut self, amount: i32, events: &mut Vec<GameEvent>) {
        if self.invincible() {
            return;
        }
        if self.shield {
            self.shield = false;
            self.shield_timer = 0.0;
            self.invincible_timer = SHIELD_GRACE_SECS;
            events.push(GameEvent::ShieldBroken {
                x: self.pos.x,
                y: self.pos.y,
            });
            return;
        }
        self.hp -= amount;
        events.push(GameEvent::PlayerHit {
            x: self.pos.x,
            y: self.pos.y,
            hp: self.hp,
        });
        if self.hp <= 0 {
            self.alive = false;
            events.push(GameEvent::PlayerDied {
                x: self.pos.x,
                y: self.pos.y,
                intensity: 1.0,
            });
        } else {
            self.invincible_timer = PLAYER_INVINCIBLE_SECS;
        }
    }
}
