//! The session engine: command queue in, fixed steps through, snapshot
//! out. Owns every entity container and the session state machine.

use std::collections::VecDeque;
use std::mem;

use glam::Vec2;
use log::{debug, error, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use starfighter_core::commands::SessionCommand;
use starfighter_core::config::{ConfigError, GameConfig, SessionBonus};
use starfighter_core::constants::*;
use starfighter_core::enums::{GameState, MovePattern, PowerUpKind};
use starfighter_core::events::GameEvent;
use starfighter_core::state::{
    BossView, BulletView, EnemyView, PlayerView, PowerUpView, SessionSnapshot,
};
use starfighter_core::types::{check_aabb, SimTime};

use crate::entities::{Boss, Bullet, Enemy, Player, PowerUp};
use crate::input::InputState;
use crate::systems::{DropTable, ScoreSystem, WaveAction, WaveDirector};
use crate::timefx::TimeFx;

/// Everything needed to construct a deterministic session engine.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub seed: u64,
    pub config: GameConfig,
    pub bonus: SessionBonus,
}

pub struct SessionEngine {
    config: GameConfig,
    bonus: SessionBonus,
    seed: u64,
    rng: ChaCha8Rng,

    pub(crate) state: GameState,
    pub(crate) time: SimTime,
    input: InputState,
    commands: VecDeque<SessionCommand>,
    timefx: TimeFx,
    accumulator: f32,

    pub(crate) player: Option<Player>,
    pub(crate) boss: Option<Boss>,
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) bullets: Vec<Bullet>,
    pub(crate) enemy_bullets: Vec<Bullet>,
    pub(crate) powerups: Vec<PowerUp>,
    events: Vec<GameEvent>,

    score: ScoreSystem,
    waves: WaveDirector,
    drops: DropTable,

    intro_timer: f32,
    death_timer: f32,
    transition_timer: f32,
}

impl SessionEngine {
    /// Validate the configuration and build an idle engine in the menu
    /// state. Configuration faults are fatal here, never during play.
    pub fn new(sim: SimConfig) -> Result<Self, ConfigError> {
        sim.config.validate()?;
        let drops = DropTable::new(&sim.config.powerup_weights);
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(sim.seed),
            seed: sim.seed,
            score: ScoreSystem::new(sim.bonus.score_multiplier),
            waves: WaveDirector::new(),
            drops,
            bonus: sim.bonus,
            config: sim.config,
            state: GameState::Menu,
            time: SimTime::default(),
            input: InputState::default(),
            commands: VecDeque::new(),
            timefx: TimeFx::default(),
            accumulator: 0.0,
            player: None,
            boss: None,
            enemies: Vec::new(),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            powerups: Vec::new(),
            events: Vec::new(),
            intro_timer: 0.0,
            death_timer: 0.0,
            transition_timer: 0.0,
        })
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u64 {
        self.score.score()
    }

    /// Replace the milestone bonus applied to subsequent sessions.
    /// Has no effect on a session already in progress.
    pub fn set_bonus(&mut self, bonus: SessionBonus) {
        self.bonus = bonus;
    }

    pub fn queue_command(&mut self, command: SessionCommand) {
        self.commands.push_back(command);
    }

    pub fn set_input(&mut self, input: InputState) {
        self.input = input;
    }

    /// Run exactly one fixed step and snapshot. Test and scripting
    /// entry point.
    pub fn tick(&mut self) -> SessionSnapshot {
        self.drain_commands();
        self.step();
        self.snapshot()
    }

    /// Feed wall-clock time into the fixed-step accumulator, running
    /// as many steps as it covers. The delta is clamped so a stall
    /// cannot snowball into a catch-up spiral.
    pub fn advance(&mut self, wall_dt: f32) -> SessionSnapshot {
        self.drain_commands();
        self.accumulator += wall_dt.min(MAX_FRAME_DELTA);
        while self.accumulator >= DT {
            self.accumulator -= DT;
            self.step();
        }
        self.snapshot()
    }

    fn drain_commands(&mut self) {
        while let Some(command) = self.commands.pop_front() {
            self.apply_command(command);
        }
    }

    fn apply_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::OpenShipSelect => {
                if self.state == GameState::Menu {
                    self.state = GameState::ShipSelect;
                }
            }
            SessionCommand::StartSession { archetype } => {
                if matches!(
                    self.state,
                    GameState::Menu | GameState::ShipSelect | GameState::GameOver
                ) {
                    self.start_session(&archetype);
                }
            }
            SessionCommand::Pause => {
                if self.state == GameState::Playing {
                    self.state = GameState::Paused;
                    debug!("session paused at tick {}", self.time.tick);
                }
            }
            SessionCommand::Resume => {
                if self.state == GameState::Paused {
                    self.state = GameState::Playing;
                }
            }
            SessionCommand::DismissTransition => {
                if self.state == GameState::ChapterTransition {
                    self.finish_transition();
                }
            }
            SessionCommand::QuitToMenu => {
                if self.state != GameState::Menu {
                    self.clear_session();
                    self.state = GameState::Menu;
                    info!("session abandoned, returning to menu");
                }
            }
        }
    }

    fn start_session(&mut self, archetype: &str) {
        let Some(spec) = self.config.ships.get(archetype) else {
            error!("unknown ship archetype {archetype:?}, session not started");
            return;
        };
        let player = Player::new(archetype, spec, &self.bonus);
        self.clear_session();
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.player = Some(player);
        self.score = ScoreSystem::new(self.bonus.score_multiplier);
        self.waves = WaveDirector::new();
        self.state = GameState::Playing;
        let mut actions = Vec::new();
        self.waves
            .begin(&self.config, &mut self.rng, &mut actions, &mut self.events);
        for action in actions {
            self.apply_wave_action(action);
        }
        let chapter = self.waves.chapter();
        self.events.push(GameEvent::ChapterEntered {
            chapter,
            name: self.config.chapters[chapter].name.clone(),
        });
        info!("session started with archetype {archetype:?}");
    }

    fn clear_session(&mut self) {
        self.player = None;
        self.boss = None;
        self.enemies.clear();
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.powerups.clear();
        self.events.clear();
        self.time = SimTime::default();
        self.timefx.reset();
        self.accumulator = 0.0;
        self.intro_timer = 0.0;
        self.death_timer = 0.0;
        self.transition_timer = 0.0;
    }

    fn step(&mut self) {
        match self.state {
            GameState::Playing => {
                let dt = self.timefx.begin_step(DT);
                if dt > 0.0 {
                    self.time.advance(dt);
                    self.update_playing(dt);
                }
            }
            GameState::BossIntro => {
                self.time.advance(DT);
                self.intro_timer += DT;
                let progress = self.intro_timer / BOSS_INTRO_SECS;
                if let Some(boss) = self.boss.as_mut() {
                    boss.update_intro(progress);
                }
                if self.intro_timer >= BOSS_INTRO_SECS {
                    self.state = GameState::Playing;
                }
            }
            GameState::DeathSequence => {
                let dt = self.timefx.begin_step(DT);
                self.time.advance(dt);
                self.update_drift(dt);
                // The sequence runs on wall steps so slow motion does
                // not stretch the fade.
                self.death_timer += DT;
                if self.death_timer >= DEATH_SEQUENCE_SECS {
                    self.state = GameState::GameOver;
                    self.timefx.reset();
                    info!(
                        "game over: score {} wave {}",
                        self.score.score(),
                        self.waves.wave_number()
                    );
                }
            }
            GameState::ChapterTransition => {
                self.time.advance(DT);
                self.transition_timer += DT;
                if self.transition_timer >= CHAPTER_TRANSITION_SECS {
                    self.finish_transition();
                }
            }
            GameState::Menu
            | GameState::ShipSelect
            | GameState::Paused
            | GameState::GameOver => {}
        }
    }

    fn finish_transition(&mut self) {
        self.transition_timer = 0.0;
        self.state = GameState::Playing;
        let mut actions = Vec::new();
        self.waves
            .resume_after_chapter(&self.config, &mut self.rng, &mut actions, &mut self.events);
        for action in actions {
            self.apply_wave_action(action);
        }
    }

    /// Passive motion while the death fade plays. No firing, no
    /// collisions, no spawning.
    fn update_drift(&mut self, dt: f32) {
        for bullet in &mut self.bullets {
            bullet.update(dt);
        }
        for bullet in &mut self.enemy_bullets {
            bullet.update(dt);
        }
        for enemy in &mut self.enemies {
            enemy.update(dt, None, &mut self.enemy_bullets);
        }
        for powerup in &mut self.powerups {
            powerup.update(dt, None);
        }
        self.bullets.retain(|b| b.alive && !b.off_screen());
        self.enemy_bullets.retain(|b| b.alive && !b.off_screen());
        self.enemies.retain(|e| e.alive && !e.off_screen());
        self.powerups.retain(|p| p.alive && !p.off_screen());
    }

    fn update_playing(&mut self, dt: f32) {
        let input = self.input;
        if let Some(player) = self.player.as_mut() {
            player.update(dt, &input, &mut self.bullets);
        }
        let player_pos = self.player.as_ref().map(|p| p.pos);

        for bullet in &mut self.bullets {
            bullet.update(dt);
        }
        for bullet in &mut self.enemy_bullets {
            bullet.update(dt);
        }

        for enemy in &mut self.enemies {
            enemy.update(dt, player_pos, &mut self.enemy_bullets);
        }

        let mut summons = Vec::new();
        if let Some(boss) = self.boss.as_mut() {
            boss.update(
                dt,
                &mut self.rng,
                &mut self.enemy_bullets,
                &mut summons,
                &mut self.events,
            );
        }
        self.spawn_summons(&summons);

        let magnet = self.player.as_ref().and_then(|p| {
            if p.magnet {
                Some((p.pos, p.magnet_range))
            } else {
                None
            }
        });
        for powerup in &mut self.powerups {
            powerup.update(dt, magnet);
        }

        self.score.update(dt);
        self.update_waves(dt);
        self.resolve_collisions();

        self.bullets.retain(|b| b.alive && !b.off_screen());
        self.enemy_bullets.retain(|b| b.alive && !b.off_screen());
        self.enemies.retain(|e| e.alive && !e.off_screen());
        self.powerups.retain(|p| p.alive && !p.off_screen());

        if self.player.as_ref().is_some_and(|p| !p.alive) {
            self.state = GameState::DeathSequence;
            self.death_timer = 0.0;
            self.timefx.slow_mo(0.2, 1.0);
            self.timefx.hit_stop(0.1);
        }
    }

    /// Boss summons materialize as the lightest configured enemy type.
    fn spawn_summons(&mut self, summons: &[Vec2]) {
        if summons.is_empty() {
            return;
        }
        let difficulty = self.waves.difficulty(&self.config);
        let Some((kind, spec)) = self
            .config
            .enemies
            .iter()
            .min_by(|a, b| a.1.hp.total_cmp(&b.1.hp))
        else {
            return;
        };
        for &pos in summons {
            self.enemies.push(Enemy::spawn(
                kind,
                spec,
                pos.x,
                pos.y,
                MovePattern::Sine,
                difficulty,
                &mut self.rng,
            ));
        }
    }

    fn update_waves(&mut self, dt: f32) {
        let live = self.enemies.iter().filter(|e| e.alive).count();
        let boss_active = self.boss.is_some();
        let mut actions = Vec::new();
        self.waves.update(
            dt,
            &self.config,
            live,
            boss_active,
            &mut self.rng,
            &mut actions,
            &mut self.events,
        );
        for action in actions {
            self.apply_wave_action(action);
        }
    }

    fn apply_wave_action(&mut self, action: WaveAction) {
        match action {
            WaveAction::Spawn {
                enemy,
                pos,
                pattern,
            } => {
                let difficulty = self.waves.difficulty(&self.config);
                if let Some(spec) = self.config.enemies.get(&enemy) {
                    self.enemies.push(Enemy::spawn(
                        &enemy,
                        spec,
                        pos.x,
                        pos.y,
                        pattern,
                        difficulty,
                        &mut self.rng,
                    ));
                }
            }
            WaveAction::StartBoss { boss } => {
                if let Some(spec) = self.config.bosses.get(&boss) {
                    let hp = (spec.hp * self.waves.difficulty(&self.config)).floor();
                    self.boss = Some(Boss::new(spec, hp));
                    self.state = GameState::BossIntro;
                    self.intro_timer = 0.0;
                    self.events.push(GameEvent::BossIntroStarted {
                        name: spec.name.clone(),
                    });
                    info!("boss encounter: {} ({hp} hp)", spec.name);
                }
            }
            WaveAction::EnterChapter { chapter } => {
                self.state = GameState::ChapterTransition;
                self.transition_timer = 0.0;
                self.events.push(GameEvent::ChapterEntered {
                    chapter,
                    name: self.config.chapters[chapter].name.clone(),
                });
            }
        }
    }

    fn resolve_collisions(&mut self) {
        self.collide_bullets_enemies();
        self.collide_bullets_boss();

        if !self.player.as_ref().is_some_and(|p| p.alive) {
            return;
        }

        self.collide_enemy_bullets_player();
        self.collide_enemies_player();
        self.collide_boss_player();
        self.collect_powerups();
    }

    fn collide_bullets_enemies(&mut self) {
        for b in 0..self.bullets.len() {
            if !self.bullets[b].alive {
                continue;
            }
            for e in 0..self.enemies.len() {
                if !self.enemies[e].alive {
                    continue;
                }
                let (bp, bh) = (self.bullets[b].pos, self.bullets[b].hit);
                let (ep, eh) = (self.enemies[e].pos, self.enemies[e].hit);
                if !check_aabb(bp, bh, ep, eh) {
                    continue;
                }
                self.bullets[b].alive = false;
                self.enemies[e].hp -= self.bullets[b].damage;
                if self.enemies[e].hp <= 0.0 {
                    self.kill_enemy(e, true);
                } else {
                    self.events.push(GameEvent::EnemyHit { x: ep.x, y: ep.y });
                }
                break;
            }
        }
    }

    /// Kill with score credit. Bomb clears pass `roll_drop = false`;
    /// only direct bullet kills roll the drop table.
    fn kill_enemy(&mut self, e: usize, roll_drop: bool) {
        self.enemies[e].alive = false;
        let pos = self.enemies[e].pos;
        let points = self.score.add_kill(self.enemies[e].score_value);
        self.events.push(GameEvent::EnemyKilled {
            x: pos.x,
            y: pos.y,
            points,
            combo: self.score.combo(),
            color: self.enemies[e].color.clone(),
            intensity: self.enemies[e].size / 20.0,
        });
        if roll_drop {
            self.drops.try_spawn(
                self.enemies[e].drop_rate,
                pos,
                &mut self.rng,
                &mut self.powerups,
            );
        }
    }

    fn collide_bullets_boss(&mut self) {
        let Some(boss) = self.boss.as_mut() else {
            return;
        };
        if boss.teleporting {
            return;
        }
        for bullet in &mut self.bullets {
            if !bullet.alive || !boss.alive {
                continue;
            }
            if !check_aabb(bullet.pos, bullet.hit, boss.pos, boss.hit) {
                continue;
            }
            bullet.alive = false;
            let landed = boss.take_damage(bullet.damage);
            self.events.push(GameEvent::BossHit {
                x: bullet.pos.x,
                y: bullet.pos.y,
                absorbed: !landed,
            });
        }
        if !boss.alive {
            self.defeat_boss();
        }
    }

    fn defeat_boss(&mut self) {
        let Some(boss) = self.boss.take() else {
            return;
        };
        let points = self.score.add_score(boss.spec.score_value as u64);
        self.events.push(GameEvent::BossDefeated {
            x: boss.pos.x,
            y: boss.pos.y,
            points,
            intensity: 1.0,
        });
        self.drops
            .spawn_boss_drops(boss.pos, &mut self.rng, &mut self.powerups);
        self.timefx.slow_mo(0.15, 2.5);
        self.timefx.hit_stop(0.1);
        info!("boss defeated: {} (+{points})", boss.spec.name);
    }

    fn collide_enemy_bullets_player(&mut self) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        for bullet in &mut self.enemy_bullets {
            if !bullet.alive || !player.alive {
                continue;
            }
            if check_aabb(bullet.pos, bullet.hit, player.pos, player.hit) {
                bullet.alive = false;
                player.take_damage(bullet.damage as i32, &mut self.events);
            }
        }
    }

    fn collide_enemies_player(&mut self) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        for enemy in &mut self.enemies {
            if !enemy.alive || !player.alive {
                continue;
            }
            if check_aabb(enemy.pos, enemy.hit, player.pos, player.hit) {
                enemy.alive = false;
                player.take_damage(ENEMY_CONTACT_DAMAGE, &mut self.events);
            }
        }
    }

    fn collide_boss_player(&mut self) {
        let (Some(player), Some(boss)) = (self.player.as_mut(), self.boss.as_ref()) else {
            return;
        };
        if boss.teleporting || !player.alive {
            return;
        }
        if check_aabb(boss.pos, boss.hit, player.pos, player.hit) {
            player.take_damage(BOSS_CONTACT_DAMAGE, &mut self.events);
        }
    }

    fn collect_powerups(&mut self) {
        for p in 0..self.powerups.len() {
            if !self.powerups[p].alive {
                continue;
            }
            let hit = {
                let Some(player) = self.player.as_ref() else {
                    return;
                };
                check_aabb(
                    self.powerups[p].pos,
                    self.powerups[p].hit,
                    player.pos,
                    player.hit,
                )
            };
            if !hit {
                continue;
            }
            self.powerups[p].alive = false;
            let kind = self.powerups[p].kind;
            let pos = self.powerups[p].pos;
            self.events.push(GameEvent::PowerUpCollected {
                x: pos.x,
                y: pos.y,
                kind,
                color: kind.color().to_string(),
            });
            self.apply_powerup(kind, pos);
        }
    }

    pub(crate) fn apply_powerup(&mut self, kind: PowerUpKind, pos: Vec2) {
        match kind {
            PowerUpKind::FireUp => {
                if let Some(player) = self.player.as_mut() {
                    player.fire_level = (player.fire_level + 1).min(MAX_FIRE_LEVEL);
                }
            }
            PowerUpKind::Spread => {
                if let Some(player) = self.player.as_mut() {
                    player.spread = true;
                    player.spread_timer = kind.duration();
                }
            }
            PowerUpKind::Shield => {
                if let Some(player) = self.player.as_mut() {
                    player.shield = true;
                    player.shield_timer = player.shield_duration(kind.duration());
                }
            }
            PowerUpKind::Magnet => {
                if let Some(player) = self.player.as_mut() {
                    player.magnet = true;
                    player.magnet_timer = kind.duration();
                }
            }
            PowerUpKind::Heal => {
                if let Some(player) = self.player.as_mut() {
                    player.hp = (player.hp + HEAL_AMOUNT).min(player.max_hp);
                }
            }
            PowerUpKind::Bomb => {
                self.events.push(GameEvent::BombDetonated {
                    x: pos.x,
                    y: pos.y,
                    intensity: 1.0,
                });
                for e in 0..self.enemies.len() {
                    if self.enemies[e].alive {
                        self.kill_enemy(e, false);
                    }
                }
                self.enemy_bullets.clear();
                if let Some(boss) = self.boss.as_mut() {
                    boss.take_damage(BOMB_BOSS_DAMAGE);
                    if !boss.alive {
                        self.defeat_boss();
                    }
                }
            }
        }
    }

    /// Assemble the per-tick snapshot, draining accumulated events.
    pub fn snapshot(&mut self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            time: self.time,
            score: self.score.view(),
            wave: self.waves.view(&self.config),
            player: self.player.as_ref().map(|p| PlayerView {
                x: p.pos.x,
                y: p.pos.y,
                hp: p.hp,
                max_hp: p.max_hp,
                fire_level: p.fire_level,
                archetype: p.archetype.clone(),
                invincible: p.invincible(),
                shield: p.shield,
                magnet: p.magnet,
                spread: p.spread,
            }),
            boss: self.boss.as_ref().map(|b| BossView {
                name: b.spec.name.clone(),
                x: b.pos.x,
                y: b.pos.y,
                hp: b.hp,
                max_hp: b.max_hp,
                phase: b.phase,
                shielded: b.shielded,
                teleporting: b.teleporting,
                alpha: b.alpha,
            }),
            enemies: self
                .enemies
                .iter()
                .map(|e| EnemyView {
                    x: e.pos.x,
                    y: e.pos.y,
                    hp: e.hp,
                    max_hp: e.max_hp,
                    kind: e.kind.clone(),
                    color: e.color.clone(),
                    size: e.size,
                })
                .collect(),
            bullets: self
                .bullets
                .iter()
                .map(|b| BulletView {
                    x: b.pos.x,
                    y: b.pos.y,
                    hostile: false,
                    fire_level: b.fire_level,
                })
                .collect(),
            enemy_bullets: self
                .enemy_bullets
                .iter()
                .map(|b| BulletView {
                    x: b.pos.x,
                    y: b.pos.y,
                    hostile: true,
                    fire_level: 0,
                })
                .collect(),
            powerups: self
                .powerups
                .iter()
                .map(|p| PowerUpView {
                    x: p.pos.x,
                    y: p.pos.y,
                    kind: p.kind,
                    lifetime: p.lifetime,
                })
                .collect(),
            events: mem::take(&mut self.events),
        }
    }
}
