//! Boss encounter: phase machine, attack patterns, and mechanics
//! (teleport, summon timer, alternating shield).

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use starfighter_core::config::BossSpec;
use starfighter_core::constants::*;
use starfighter_core::enums::{AttackPattern, BossMechanic};
use starfighter_core::events::GameEvent;
use starfighter_core::types::HitBox;

use crate::entities::Bullet;

#[derive(Debug, Clone)]
pub struct Boss {
    pub spec: BossSpec,
    pub pos: Vec2,
    pub hit: HitBox,
    pub hp: f32,
    pub max_hp: f32,
    pub phase: usize,
    pub alive: bool,

    pub shielded: bool,
    pub teleporting: bool,
    /// Render opacity, < 1 while teleporting.
    pub alpha: f32,

    time: f32,
    fire_timer: f32,
    spiral_angle: f32,
    cross_angle: f32,
    laser_angle: f32,
    laser_burst: u32,
    laser_timer: f32,
    teleport_time: f32,
    teleport_relocated: bool,
    teleport_cooldown: f32,
    summon_cooldown: f32,
    shield_timer: f32,
}

impl Boss {
    /// Create a boss above the playfield. `hp` is pre-scaled by the
    /// wave difficulty.
    pub fn new(spec: &BossSpec, hp: f32) -> Self {
        Self {
            pos: Vec2::new(VIEW_W / 2.0, BOSS_SPAWN_Y),
            hit: HitBox::new(spec.hit_w, spec.hit_h),
            hp,
            max_hp: hp,
            phase: 0,
            alive: true,
            shielded: false,
            teleporting: false,
            alpha: 1.0,
            time: 0.0,
            // Primed so the first active tick fires immediately.
            fire_timer: 0.0,
            spiral_angle: 0.0,
            cross_angle: 0.0,
            laser_angle: 0.0,
            laser_burst: 0,
            laser_timer: 0.0,
            teleport_time: 0.0,
            teleport_relocated: false,
            teleport_cooldown: BOSS_TELEPORT_COOLDOWN,
            summon_cooldown: BOSS_SUMMON_COOLDOWN,
            shield_timer: BOSS_SHIELD_COOLDOWN,
            spec: spec.clone(),
        }
    }

    /// Advance the entry animation. `progress` runs 0..1 over the
    /// intro window; the boss descends with a back-ease overshoot.
    pub fn update_intro(&mut self, progress: f32) {
        let p = progress.clamp(0.0, 1.0);
        let c1 = 1.70158_f32;
        let c3 = c1 + 1.0;
        let eased = 1.0 + c3 * (p - 1.0).powi(3) + c1 * (p - 1.0).powi(2);
        self.pos.y = BOSS_SPAWN_Y + (BOSS_TARGET_Y - BOSS_SPAWN_Y) * eased;
    }

    /// Current phase given the hp ratio: the first phase whose
    /// threshold the ratio still exceeds, otherwise the last.
    fn select_phase(&self) -> usize {
        let ratio = self.hp / self.max_hp;
        for (i, phase) in self.spec.phases.iter().enumerate() {
            if ratio > phase.hp_threshold {
                return i;
            }
        }
        self.spec.phases.len() - 1
    }

    pub fn update(
        &mut self,
        dt: f32,
        rng: &mut ChaCha8Rng,
        bullets: &mut Vec<Bullet>,
        summons: &mut Vec<Vec2>,
        events: &mut Vec<GameEvent>,
    ) {
        self.time += dt;

        let phase = self.select_phase();
        if phase > self.phase {
            self.phase = phase;
            events.push(GameEvent::BossPhaseStarted {
                phase,
                x: self.pos.x,
                y: self.pos.y,
                color: self.spec.glow_color.clone(),
            });
        }

        self.update_mechanics(dt, rng, summons);

        if !self.teleporting {
            self.pos.x = VIEW_W / 2.0 + (self.time * 0.8).sin() * VIEW_W * BOSS_MOVE_RANGE_FRAC;
            self.pos.y = BOSS_TARGET_Y + (self.time * 0.5).sin() * 20.0;
        }

        // The laser burst keeps sweeping even mid-teleport.
        if self.laser_burst > 0 {
            self.laser_timer -= dt;
            if self.laser_timer <= 0.0 {
                let vel = Vec2::new(self.laser_angle.cos(), self.laser_angle.sin())
                    * BOSS_LASER_SPEED;
                bullets.push(Bullet::hostile(self.muzzle(), vel, 1.0));
                self.laser_angle += BOSS_LASER_ANGLE_STEP;
                self.laser_burst -= 1;
                self.laser_timer = BOSS_LASER_INTERVAL;
            }
        }

        if !self.teleporting {
            self.fire_timer -= dt;
            if self.fire_timer <= 0.0 {
                self.fire_pattern(rng, bullets, summons);
                self.fire_timer = self.spec.phases[self.phase].fire_rate;
            }
        }
    }

    fn update_mechanics(&mut self, dt: f32, rng: &mut ChaCha8Rng, summons: &mut Vec<Vec2>) {
        if self.teleporting {
            self.teleport_time += dt;
            let t = self.teleport_time;
            if t < 0.3 {
                self.alpha = 1.0 - t / 0.3;
            } else if t < 0.4 {
                self.alpha = 0.0;
                if !self.teleport_relocated {
                    self.pos = Vec2::new(
                        60.0 + rng.gen::<f32>() * (VIEW_W - 120.0),
                        60.0 + rng.gen::<f32>() * 80.0,
                    );
                    self.teleport_relocated = true;
                }
            } else if t < 0.7 {
                self.alpha = (t - 0.4) / 0.3;
            } else {
                self.teleporting = false;
                self.alpha = 1.0;
                self.teleport_cooldown = BOSS_TELEPORT_COOLDOWN;
            }
        } else if self.has_mechanic(BossMechanic::Teleport) {
            self.teleport_cooldown -= dt;
            if self.teleport_cooldown <= 0.0 {
                self.teleporting = true;
                self.teleport_time = 0.0;
                self.teleport_relocated = false;
            }
        }

        if self.has_mechanic(BossMechanic::SummonTimer) {
            self.summon_cooldown -= dt;
            if self.summon_cooldown <= 0.0 {
                self.emit_summons(rng, summons);
                self.summon_cooldown = BOSS_SUMMON_COOLDOWN;
            }
        }

        if self.has_mechanic(BossMechanic::Shield) {
            self.shield_timer -= dt;
            if self.shield_timer <= 0.0 {
                if self.shielded {
                    self.shielded = false;
                    self.shield_timer = BOSS_SHIELD_COOLDOWN;
                } else {
                    self.shielded = true;
                    self.shield_timer = BOSS_SHIELD_DURATION;
                }
            }
        }
    }

    fn has_mechanic(&self, mechanic: BossMechanic) -> bool {
        self.spec.mechanics.contains(&mechanic)
    }

    fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y + self.spec.size / 2.0)
    }

    fn emit_summons(&self, rng: &mut ChaCha8Rng, summons: &mut Vec<Vec2>) {
        let count = 2 + rng.gen_range(0..2);
        for i in 0..count {
            let offset = (i as f32 - (count - 1) as f32 / 2.0) * 50.0;
            summons.push(Vec2::new(self.pos.x + offset, self.pos.y + 30.0));
        }
    }

    fn fire_pattern(
        &mut self,
        rng: &mut ChaCha8Rng,
        bullets: &mut Vec<Bullet>,
        summons: &mut Vec<Vec2>,
    ) {
        let speed = BOSS_BULLET_SPEED;
        match self.spec.phases[self.phase].pattern {
            AttackPattern::Spread => {
                for i in 0..5 {
                    let angle = PI / 2.0 + (i as f32 - 2.0) * 0.3;
                    let vel = Vec2::new(angle.cos(), angle.sin()) * speed;
                    bullets.push(Bullet::hostile(self.muzzle(), vel, 1.0));
                }
            }
            AttackPattern::Spiral => {
                self.spiral_angle += 0.5;
                for i in 0..3 {
                    let angle = self.spiral_angle + i as f32 * (2.0 * PI / 3.0);
                    let vel = Vec2::new(angle.cos(), angle.sin()) * speed;
                    bullets.push(Bullet::hostile(self.muzzle(), vel, 1.0));
                }
            }
            AttackPattern::Barrage => {
                for i in 0..8 {
                    let angle = (2.0 * PI / 8.0) * i as f32 + self.time * 0.5;
                    let vel = Vec2::new(angle.cos(), angle.sin()) * speed * 0.9;
                    bullets.push(Bullet::hostile(self.pos, vel, 1.0));
                }
            }
            AttackPattern::Laser => {
                self.laser_angle = PI / 2.0 + (self.time * 0.6).sin() * 0.8;
                self.laser_burst = BOSS_LASER_BURST;
                self.laser_timer = 0.0;
            }
            AttackPattern::Summon => {
                self.emit_summons(rng, summons);
                for i in 0..3 {
                    let angle = PI / 2.0 + (i as f32 - 1.0) * 0.5;
                    let vel = Vec2::new(angle.cos(), angle.sin()) * speed;
                    bullets.push(Bullet::hostile(self.muzzle(), vel, 1.0));
                }
            }
            AttackPattern::Cross => {
                self.cross_angle += 0.15;
                for i in 0..4 {
                    let angle = self.cross_angle + i as f32 * PI / 2.0;
                    let dir = Vec2::new(angle.cos(), angle.sin());
                    for j in 0..3 {
                        let vel = dir * speed * (0.7 + 0.2 * j as f32);
                        bullets.push(Bullet::hostile(self.pos, vel, 1.0));
                    }
                }
            }
        }
    }

    /// Apply bullet or bomb damage. Returns false when a shield
    /// absorbed the hit.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.shielded {
            return false;
        }
        self.hp -= amount;
        if self.hp <= 0.0 {
            self.alive = false;
        }
        true
    }
}
