use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use starfighter_core::commands::SessionCommand;
use starfighter_core::config::{default_config, EnemySpec, SessionBonus};
use starfighter_core::constants::*;
use starfighter_core::enums::{GameState, MovePattern};
use starfighter_core::events::GameEvent;

use crate::engine::{SessionEngine, SimConfig};
use crate::entities::{Boss, Bullet, Enemy, Player};
use crate::input::InputState;

fn engine_with_seed(seed: u64) -> SessionEngine {
    SessionEngine::new(SimConfig {
        seed,
        config: default_config(),
        bonus: SessionBonus::default(),
    })
    .expect("default config validates")
}

fn engine() -> SessionEngine {
    engine_with_seed(7)
}

fn start(engine: &mut SessionEngine) {
    engine.queue_command(SessionCommand::StartSession {
        archetype: "balanced".into(),
    });
    engine.tick();
}

fn run_secs(engine: &mut SessionEngine, secs: f32) {
    let steps = (secs * TICK_RATE as f32).ceil() as u32;
    for _ in 0..steps {
        engine.tick();
    }
}

#[test]
fn test_starts_in_menu() {
    let mut engine = engine();
    let snapshot = engine.tick();
    assert_eq!(snapshot.state, GameState::Menu);
    assert!(snapshot.player.is_none());
    assert_eq!(snapshot.time.tick, 0);
}

#[test]
fn test_ship_select_flow() {
    let mut engine = engine();
    engine.queue_command(SessionCommand::OpenShipSelect);
    assert_eq!(engine.tick().state, GameState::ShipSelect);
    engine.queue_command(SessionCommand::StartSession {
        archetype: "speed".into(),
    });
    let snapshot = engine.tick();
    assert_eq!(snapshot.state, GameState::Playing);
    assert_eq!(snapshot.player.as_ref().map(|p| p.archetype.as_str()), Some("speed"));
}

#[test]
fn test_start_session_announces_wave_and_chapter() {
    let mut engine = engine();
    engine.queue_command(SessionCommand::StartSession {
        archetype: "balanced".into(),
    });
    let snapshot = engine.tick();
    assert_eq!(snapshot.state, GameState::Playing);
    assert!(snapshot.wave.announcing);
    assert_eq!(snapshot.wave.wave_number, 1);
    assert!(snapshot
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::WaveAnnounced { wave: 1, .. })));
    assert!(snapshot
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::ChapterEntered { chapter: 0, .. })));
}

#[test]
fn test_unknown_archetype_is_rejected() {
    let mut engine = engine();
    engine.queue_command(SessionCommand::StartSession {
        archetype: "battlestar".into(),
    });
    let snapshot = engine.tick();
    assert_eq!(snapshot.state, GameState::Menu);
    assert!(snapshot.player.is_none());
}

#[test]
fn test_firing_produces_bullets() {
    let mut engine = engine();
    start(&mut engine);
    engine.set_input(InputState {
        firing: true,
        ..Default::default()
    });
    run_secs(&mut engine, 0.5);
    let snapshot = engine.tick();
    assert!(!snapshot.bullets.is_empty());
    assert!(snapshot.bullets.iter().all(|b| !b.hostile));
}

#[test]
fn test_wave_spawns_enemies_after_announce() {
    let mut engine = engine();
    start(&mut engine);
    run_secs(&mut engine, WAVE_ANNOUNCE_SECS + 2.0);
    let snapshot = engine.tick();
    assert!(!snapshot.enemies.is_empty());
    assert!(!snapshot.wave.announcing);
}

#[test]
fn test_enemies_spawn_during_wave_banner() {
    let mut engine = engine();
    start(&mut engine);
    // Wave 1's first group has no start delay, so enemies appear
    // while the banner is still up.
    run_secs(&mut engine, WAVE_ANNOUNCE_SECS - 0.1);
    let snapshot = engine.tick();
    assert!(snapshot.wave.announcing);
    assert!(!snapshot.enemies.is_empty());
}

#[test]
fn test_pause_freezes_time_and_rng() {
    let mut engine = engine();
    start(&mut engine);
    run_secs(&mut engine, 1.0);
    engine.queue_command(SessionCommand::Pause);
    let frozen = engine.tick();
    assert_eq!(frozen.state, GameState::Paused);
    let tick_before = frozen.time.tick;
    run_secs(&mut engine, 1.0);
    let still = engine.tick();
    assert_eq!(still.time.tick, tick_before);
    engine.queue_command(SessionCommand::Resume);
    run_secs(&mut engine, 0.5);
    assert!(engine.tick().time.tick > tick_before);
}

#[test]
fn test_same_seed_same_inputs_same_run() {
    let mut a = engine_with_seed(42);
    let mut b = engine_with_seed(42);
    for engine in [&mut a, &mut b] {
        start(engine);
        engine.set_input(InputState {
            move_x: 0.7,
            firing: true,
            ..Default::default()
        });
    }
    let mut last = (String::new(), String::new());
    for _ in 0..600 {
        let sa = a.tick();
        let sb = b.tick();
        last = (
            serde_json::to_string(&sa).unwrap(),
            serde_json::to_string(&sb).unwrap(),
        );
    }
    assert_eq!(last.0, last.1);
}

#[test]
fn test_different_seeds_diverge() {
    let mut a = engine_with_seed(1);
    let mut b = engine_with_seed(2);
    for engine in [&mut a, &mut b] {
        start(engine);
    }
    let mut diverged = false;
    for _ in 0..900 {
        let sa = a.tick();
        let sb = b.tick();
        if serde_json::to_string(&sa.enemies).unwrap() != serde_json::to_string(&sb.enemies).unwrap()
        {
            diverged = true;
            break;
        }
    }
    assert!(diverged);
}

#[test]
fn test_accumulator_runs_whole_steps_only() {
    let mut engine = engine();
    start(&mut engine);
    let before = engine.tick().time.tick;
    let snapshot = engine.advance(DT * 2.5);
    assert_eq!(snapshot.time.tick, before + 2);
    // leftover half step carries into the next call
    let snapshot = engine.advance(DT * 0.6);
    assert_eq!(snapshot.time.tick, before + 3);
}

#[test]
fn test_frame_delta_is_clamped() {
    let mut engine = engine();
    start(&mut engine);
    let before = engine.tick().time.tick;
    let snapshot = engine.advance(10.0);
    let max_steps = (MAX_FRAME_DELTA / DT) as u64 + 1;
    assert!(snapshot.time.tick - before <= max_steps);
}

#[test]
fn test_quit_to_menu_clears_session() {
    let mut engine = engine();
    start(&mut engine);
    run_secs(&mut engine, 4.0);
    engine.queue_command(SessionCommand::QuitToMenu);
    let snapshot = engine.tick();
    assert_eq!(snapshot.state, GameState::Menu);
    assert!(snapshot.player.is_none());
    assert!(snapshot.enemies.is_empty());
    assert!(snapshot.bullets.is_empty());
}

#[test]
fn test_player_death_runs_sequence_then_game_over() {
    let mut engine = engine();
    start(&mut engine);
    {
        let player = engine.player.as_mut().unwrap();
        player.hp = 1;
        player.invincible_timer = 0.0;
        let mut events = Vec::new();
        player.take_damage(1, &mut events);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::PlayerDied { .. })));
    }
    let snapshot = engine.tick();
    assert_eq!(snapshot.state, GameState::DeathSequence);
    run_secs(&mut engine, DEATH_SEQUENCE_SECS + 0.1);
    assert_eq!(engine.tick().state, GameState::GameOver);
}

#[test]
fn test_death_transition_freezes_drift_briefly() {
    let mut engine = engine();
    start(&mut engine);
    engine.enemy_bullets.push(Bullet::hostile(
        Vec2::new(200.0, 400.0),
        Vec2::new(0.0, 50.0),
        1.0,
    ));
    engine.player.as_mut().unwrap().hp = 0;
    engine.player.as_mut().unwrap().alive = false;
    let snapshot = engine.tick();
    assert_eq!(snapshot.state, GameState::DeathSequence);
    // Death lands a hit-stop: the field holds still for an instant
    // before the slow-motion drift begins.
    let held = engine.enemy_bullets[0].pos;
    engine.tick();
    assert_eq!(engine.enemy_bullets[0].pos, held);
    run_secs(&mut engine, 0.2);
    assert!(engine.enemy_bullets[0].pos.y > held.y);
}

#[test]
fn test_restart_from_game_over() {
    let mut engine = engine();
    start(&mut engine);
    engine.player.as_mut().unwrap().hp = 0;
    engine.player.as_mut().unwrap().alive = false;
    engine.tick();
    run_secs(&mut engine, DEATH_SEQUENCE_SECS + 0.1);
    assert_eq!(engine.state(), GameState::GameOver);
    start(&mut engine);
    let snapshot = engine.tick();
    assert_eq!(snapshot.state, GameState::Playing);
    assert_eq!(snapshot.score.score, 0);
    assert_eq!(snapshot.wave.wave_number, 1);
}

#[test]
fn test_heal_is_capped_at_max_hp() {
    let mut engine = engine();
    start(&mut engine);
    let max_hp = engine.player.as_ref().unwrap().max_hp;
    engine.player.as_mut().unwrap().hp = max_hp - 1;
    engine.apply_powerup(starfighter_core::enums::PowerUpKind::Heal, Vec2::ZERO);
    assert_eq!(engine.player.as_ref().unwrap().hp, max_hp);
}

#[test]
fn test_fire_level_caps() {
    let mut engine = engine();
    start(&mut engine);
    for _ in 0..10 {
        engine.apply_powerup(starfighter_core::enums::PowerUpKind::FireUp, Vec2::ZERO);
    }
    assert_eq!(engine.player.as_ref().unwrap().fire_level, MAX_FIRE_LEVEL);
}

#[test]
fn test_bomb_clears_field_with_kill_credit() {
    let mut engine = engine();
    start(&mut engine);
    run_secs(&mut engine, WAVE_ANNOUNCE_SECS + 2.0);
    let live = engine.enemies.iter().filter(|e| e.alive).count();
    assert!(live > 0);
    engine.apply_powerup(
        starfighter_core::enums::PowerUpKind::Bomb,
        Vec2::new(VIEW_W / 2.0, VIEW_H / 2.0),
    );
    assert!(engine.enemies.iter().all(|e| !e.alive));
    assert!(engine.enemy_bullets.is_empty());
    assert!(engine.score() > 0);
}

#[test]
fn test_bomb_kills_never_roll_drops() {
    let mut engine = engine();
    start(&mut engine);
    run_secs(&mut engine, WAVE_ANNOUNCE_SECS + 2.0);
    assert!(engine.enemies.iter().any(|e| e.alive));
    for enemy in &mut engine.enemies {
        enemy.drop_rate = 1.0;
    }
    engine.powerups.clear();
    let before = engine.score();
    engine.apply_powerup(
        starfighter_core::enums::PowerUpKind::Bomb,
        Vec2::new(VIEW_W / 2.0, VIEW_H / 2.0),
    );
    assert!(engine.enemies.iter().all(|e| !e.alive));
    assert!(engine.score() > before);
    // Screen clears grant kill credit but never powerups.
    assert!(engine.powerups.is_empty());
}

#[test]
fn test_shield_absorbs_one_hit() {
    let config = default_config();
    let spec = &config.ships["balanced"];
    let mut player = Player::new("balanced", spec, &SessionBonus::default());
    player.shield = true;
    player.shield_timer = 10.0;
    let hp = player.hp;
    let mut events = Vec::new();
    player.take_damage(1, &mut events);
    assert_eq!(player.hp, hp);
    assert!(!player.shield);
    assert!(player.invincible());
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::ShieldBroken { .. })));
}

#[test]
fn test_invincibility_window_blocks_damage() {
    let config = default_config();
    let spec = &config.ships["balanced"];
    let mut player = Player::new("balanced", spec, &SessionBonus::default());
    let mut events = Vec::new();
    player.take_damage(1, &mut events);
    let hp = player.hp;
    player.take_damage(1, &mut events);
    assert_eq!(player.hp, hp);
}

#[test]
fn test_session_bonus_shapes_player() {
    let config = default_config();
    let spec = &config.ships["balanced"];
    let bonus = SessionBonus {
        start_fire_level: 1,
        damage_multiplier: 1.15,
        max_hp_bonus: 2,
        score_multiplier: 1.1,
        magnet_range_multiplier: 1.25,
        shield_duration_bonus: 5.0,
    };
    let player = Player::new("balanced", spec, &bonus);
    assert_eq!(player.fire_level, 2);
    assert_eq!(player.max_hp, spec.max_hp + 2);
    assert_eq!(player.bullet_damage, spec.bullet_damage * 1.15);
    assert_eq!(player.magnet_range, MAGNET_RANGE * 1.25);
    assert_eq!(player.shield_duration(10.0), 15.0);
}

#[test]
fn test_spread_fire_fans_out() {
    let config = default_config();
    let spec = &config.ships["balanced"];
    let mut player = Player::new("balanced", spec, &SessionBonus::default());
    player.spread = true;
    player.spread_timer = 8.0;
    let mut bullets = Vec::new();
    player.update(
        DT,
        &InputState {
            firing: true,
            ..Default::default()
        },
        &mut bullets,
    );
    // fire level 1 with spread fans 3 bullets
    assert_eq!(bullets.len(), 3);
    assert!(bullets.iter().any(|b| b.vel.x < 0.0));
    assert!(bullets.iter().any(|b| b.vel.x > 0.0));
}

fn turret_spec() -> EnemySpec {
    EnemySpec {
        hp: 1.0,
        speed: 0.0,
        score_value: 10,
        drop_rate: 0.0,
        fire_rate: 1.0,
        size: 20.0,
        hit_w: 20.0,
        hit_h: 20.0,
        color: "#ffffff".into(),
    }
}

#[test]
fn test_enemy_fires_on_entering_combat_band() {
    let spec = turret_spec();
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut enemy = Enemy::spawn("turret", &spec, 200.0, -40.0, MovePattern::Straight, 1.0, &mut rng);
    let target = Some(Vec2::new(200.0, 700.0));
    let mut bullets = Vec::new();
    // Long enough above the screen for the fire timer to lapse.
    for _ in 0..(4.0 * TICK_RATE as f32) as u32 {
        enemy.update(DT, target, &mut bullets);
    }
    assert!(bullets.is_empty());
    enemy.pos.y = 100.0;
    enemy.update(DT, target, &mut bullets);
    assert_eq!(bullets.len(), 1, "lapsed timer must fire on band entry");
}

#[test]
fn test_enemy_shots_leave_from_lower_edge() {
    let spec = turret_spec();
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut enemy = Enemy::spawn("turret", &spec, 150.0, 120.0, MovePattern::Straight, 1.0, &mut rng);
    let target = Some(Vec2::new(150.0, 700.0));
    let mut bullets = Vec::new();
    let mut steps = 0;
    while bullets.is_empty() {
        enemy.update(DT, target, &mut bullets);
        steps += 1;
        assert!(steps < 60 * 10, "enemy never fired");
    }
    assert_eq!(bullets[0].pos, Vec2::new(150.0, 120.0 + spec.size / 2.0));
    assert!(bullets[0].vel.y > 0.0);
}

#[test]
fn test_boss_intro_lands_on_target() {
    let config = default_config();
    let spec = &config.bosses["boss1"];
    let mut boss = Boss::new(spec, spec.hp);
    boss.update_intro(0.0);
    assert_eq!(boss.pos.y, BOSS_SPAWN_Y);
    boss.update_intro(1.0);
    assert!((boss.pos.y - BOSS_TARGET_Y).abs() < 0.001);
}

#[test]
fn test_boss_phase_follows_hp_ratio() {
    let config = default_config();
    let spec = &config.bosses["boss1"];
    let mut boss = Boss::new(spec, 100.0);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut bullets = Vec::new();
    let mut summons = Vec::new();
    let mut events = Vec::new();

    // thresholds 0.6 / 0.3 / 0.0
    boss.update(DT, &mut rng, &mut bullets, &mut summons, &mut events);
    assert_eq!(boss.phase, 0);

    boss.hp = 59.0;
    boss.update(DT, &mut rng, &mut bullets, &mut summons, &mut events);
    assert_eq!(boss.phase, 1);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::BossPhaseStarted { phase: 1, .. }))
            .count(),
        1
    );

    boss.hp = 29.0;
    boss.update(DT, &mut rng, &mut bullets, &mut summons, &mut events);
    assert_eq!(boss.phase, 2);

    boss.hp = 1.0;
    boss.update(DT, &mut rng, &mut bullets, &mut summons, &mut events);
    assert_eq!(boss.phase, 2);
}

#[test]
fn test_boss_fires_on_first_active_tick() {
    let config = default_config();
    let spec = &config.bosses["boss1"];
    let mut boss = Boss::new(spec, spec.hp);
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let mut bullets = Vec::new();
    let mut summons = Vec::new();
    let mut events = Vec::new();
    boss.update(DT, &mut rng, &mut bullets, &mut summons, &mut events);
    assert!(!bullets.is_empty(), "boss held fire on its opening tick");
}

#[test]
fn test_eight_hits_destroy_balanced_ship() {
    let config = default_config();
    let spec = &config.ships["balanced"];
    let mut player = Player::new("balanced", spec, &SessionBonus::default());
    assert_eq!(player.max_hp, 8);
    let mut events = Vec::new();
    for hit in 1..=8 {
        player.invincible_timer = 0.0;
        player.take_damage(1, &mut events);
        if hit < 8 {
            assert!(player.alive, "alive after hit {hit}");
        }
    }
    assert!(!player.alive);
}

#[test]
fn test_boss_shield_absorbs_damage() {
    let config = default_config();
    let spec = &config.bosses["boss1"];
    let mut boss = Boss::new(spec, 100.0);
    boss.shielded = true;
    assert!(!boss.take_damage(10.0));
    assert_eq!(boss.hp, 100.0);
    boss.shielded = false;
    assert!(boss.take_damage(10.0));
    assert_eq!(boss.hp, 90.0);
}

#[test]
fn test_boss_wave_enters_intro_state() {
    let mut engine = engine();
    start(&mut engine);
    // fast-forward the director to the first boss wave
    while !matches!(engine.state(), GameState::BossIntro) {
        engine.enemies.clear();
        engine.enemy_bullets.clear();
        if let Some(player) = engine.player.as_mut() {
            player.hp = player.max_hp;
            player.invincible_timer = 10.0;
        }
        engine.tick();
        assert!(engine.time.tick < 60 * 600, "boss wave never arrived");
    }
    let snapshot = engine.tick();
    assert_eq!(snapshot.state, GameState::BossIntro);
    assert!(snapshot.boss.is_some());
    run_secs(&mut engine, BOSS_INTRO_SECS + 0.1);
    assert_eq!(engine.state(), GameState::Playing);
    assert!(engine.boss.is_some());
}

#[test]
fn test_chapter_transition_can_be_dismissed() {
    let mut engine = engine();
    start(&mut engine);
    engine.state = GameState::ChapterTransition;
    engine.queue_command(SessionCommand::DismissTransition);
    let snapshot = engine.tick();
    assert_eq!(snapshot.state, GameState::Playing);
    assert!(snapshot
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::WaveAnnounced { .. })));
}

#[test]
fn test_events_drain_once() {
    let mut engine = engine();
    engine.queue_command(SessionCommand::StartSession {
        archetype: "balanced".into(),
    });
    let first = engine.tick();
    assert!(!first.events.is_empty());
    let second = engine.tick();
    assert!(second.events.is_empty());
}
