//! Wave scripting: announce, spawn from a timed queue, detect the
//! clear, advance. Boss waves and chapter crossings are handed back to
//! the engine as actions since they change the session state.

use glam::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use starfighter_core::config::{GameConfig, WaveSpec};
use starfighter_core::constants::*;
use starfighter_core::enums::{Formation, MovePattern};
use starfighter_core::events::GameEvent;
use starfighter_core::state::WaveView;

/// Directive the engine must act on this tick.
#[derive(Debug, Clone)]
pub enum WaveAction {
    Spawn {
        enemy: String,
        pos: Vec2,
        pattern: MovePattern,
    },
    /// Begin a boss encounter (engine enters the intro state).
    StartBoss { boss: String },
    /// The next wave starts a new chapter (engine shows the banner).
    EnterChapter { chapter: usize },
}

#[derive(Debug, Clone)]
struct QueuedSpawn {
    at: f32,
    enemy: String,
    pos: Vec2,
    pattern: MovePattern,
}

#[derive(Debug, Clone)]
enum Phase {
    /// Draining the spawn queue, then waiting for the field to clear.
    Running,
    /// Field cleared, short breather before the next wave.
    Clearing { timer: f32 },
    /// Waiting for the engine to finish a chapter transition.
    ChapterHold,
}

/// Drives wave progression. The wave table loops forever; each full
/// cycle raises the difficulty multiplier.
#[derive(Debug, Clone)]
pub struct WaveDirector {
    /// Total waves started, 0-based, monotonically increasing across
    /// table loops.
    current: usize,
    chapter: usize,
    phase: Phase,
    queue: Vec<QueuedSpawn>,
    spawn_clock: f32,
    /// Banner countdown. Runs alongside the spawn queue; it never
    /// delays spawning.
    announce_timer: f32,
    cleared_announced: bool,
}

impl WaveDirector {
    pub fn new() -> Self {
        Self {
            current: 0,
            chapter: 0,
            phase: Phase::Running,
            queue: Vec::new(),
            spawn_clock: 0.0,
            announce_timer: 0.0,
            cleared_announced: false,
        }
    }

    /// Difficulty multiplier for the current wave. Grows by a fixed
    /// step per completed cycle of the wave table.
    pub fn difficulty(&self, config: &GameConfig) -> f32 {
        1.0 + (self.current / config.waves.len()) as f32 * DIFFICULTY_STEP
    }

    pub fn wave_number(&self) -> u32 {
        self.current as u32 + 1
    }

    pub fn chapter(&self) -> usize {
        self.chapter
    }

    pub fn view(&self, config: &GameConfig) -> WaveView {
        WaveView {
            wave_number: self.wave_number(),
            chapter: self.chapter,
            announcing: self.announce_timer > 0.0,
            difficulty: self.difficulty(config),
        }
    }

    /// Announce and start the first wave. Called once when the session
    /// enters play.
    pub fn begin(
        &mut self,
        config: &GameConfig,
        rng: &mut ChaCha8Rng,
        actions: &mut Vec<WaveAction>,
        events: &mut Vec<GameEvent>,
    ) {
        self.chapter = config.chapter_for_wave(self.current);
        self.announce(events);
        self.start_wave(config, rng, actions);
    }

    /// Called by the engine once a chapter banner is dismissed.
    pub fn resume_after_chapter(
        &mut self,
        config: &GameConfig,
        rng: &mut ChaCha8Rng,
        actions: &mut Vec<WaveAction>,
        events: &mut Vec<GameEvent>,
    ) {
        self.phase = Phase::Running;
        self.announce(events);
        self.start_wave(config, rng, actions);
    }

    fn announce(&mut self, events: &mut Vec<GameEvent>) {
        self.announce_timer = WAVE_ANNOUNCE_SECS;
        events.push(GameEvent::WaveAnnounced {
            wave: self.wave_number(),
            chapter: self.chapter,
        });
    }

    pub fn update(
        &mut self,
        dt: f32,
        config: &GameConfig,
        live_enemies: usize,
        boss_active: bool,
        rng: &mut ChaCha8Rng,
        actions: &mut Vec<WaveAction>,
        events: &mut Vec<GameEvent>,
    ) {
        if self.announce_timer > 0.0 {
            self.announce_timer -= dt;
        }
        match &mut self.phase {
            Phase::Running => {
                self.spawn_clock += dt;
                while let Some(next) = self.queue.first() {
                    if next.at > self.spawn_clock {
                        break;
                    }
                    let spawn = self.queue.remove(0);
                    actions.push(WaveAction::Spawn {
                        enemy: spawn.enemy,
                        pos: spawn.pos,
                        pattern: spawn.pattern,
                    });
                }
                if self.queue.is_empty()
                    && live_enemies == 0
                    && !boss_active
                    && self.announce_timer <= 0.0
                {
                    if !self.cleared_announced {
                        self.cleared_announced = true;
                        events.push(GameEvent::WaveCleared {
                            wave: self.wave_number(),
                        });
                    }
                    self.phase = Phase::Clearing {
                        timer: WAVE_CLEAR_SECS,
                    };
                }
            }
            Phase::Clearing { timer } => {
                // Late stragglers (boss summons mid-despawn) restart
                // the breather.
                if live_enemies > 0 || boss_active {
                    self.phase = Phase::Running;
                    return;
                }
                *timer -= dt;
                if *timer <= 0.0 {
                    self.advance(config, rng, actions, events);
                }
            }
            Phase::ChapterHold => {}
        }
    }

    fn start_wave(
        &mut self,
        config: &GameConfig,
        rng: &mut ChaCha8Rng,
        actions: &mut Vec<WaveAction>,
    ) {
        self.cleared_announced = false;
        let spec = &config.waves[self.current % config.waves.len()];
        match spec {
            WaveSpec::Boss { boss } => {
                self.queue.clear();
                self.phase = Phase::Running;
                actions.push(WaveAction::StartBoss { boss: boss.clone() });
            }
            WaveSpec::Groups { groups } => {
                self.queue.clear();
                for group in groups {
                    for i in 0..group.count {
                        self.queue.push(QueuedSpawn {
                            at: group.delay + i as f32 * group.interval,
                            enemy: group.enemy.clone(),
                            pos: Vec2::new(
                                formation_x(group.formation, i, group.count, rng),
                                ENEMY_SPAWN_Y,
                            ),
                            pattern: group.pattern,
                        });
                    }
                }
                self.queue
                    .sort_by(|a, b| a.at.partial_cmp(&b.at).unwrap_or(std::cmp::Ordering::Equal));
                self.spawn_clock = 0.0;
                self.phase = Phase::Running;
            }
        }
    }

    fn advance(
        &mut self,
        config: &GameConfig,
        rng: &mut ChaCha8Rng,
        actions: &mut Vec<WaveAction>,
        events: &mut Vec<GameEvent>,
    ) {
        self.current += 1;
        let next_chapter = config.chapter_for_wave(self.current);
        if next_chapter != self.chapter {
            self.chapter = next_chapter;
            self.phase = Phase::ChapterHold;
            actions.push(WaveAction::EnterChapter {
                chapter: next_chapter,
            });
        } else {
            self.phase = Phase::Running;
            self.announce(events);
            self.start_wave(config, rng, actions);
        }
    }
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self::new()
    }
}

/// Horizontal spawn position for slot `i` of `count` in a formation.
fn formation_x(formation: Formation, i: u32, count: u32, rng: &mut ChaCha8Rng) -> f32 {
    let usable = VIEW_W - 2.0 * FORMATION_MARGIN;
    match formation {
        Formation::Line => {
            FORMATION_MARGIN + usable / (count + 1) as f32 * (i + 1) as f32
        }
        Formation::Left => FORMATION_MARGIN + rng.gen::<f32>() * VIEW_W * 0.3,
        Formation::Right => VIEW_W * 0.7 + rng.gen::<f32>() * (VIEW_W * 0.3 - FORMATION_MARGIN),
        Formation::Center => VIEW_W / 2.0 + (rng.gen::<f32>() - 0.5) * 40.0,
        Formation::Spread => FORMATION_MARGIN + rng.gen::<f32>() * usable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use starfighter_core::config::default_config;

    #[test]
    fn test_group_wave_schedules_every_spawn() {
        let config = default_config();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut actions = Vec::new();
        for (i, wave) in config.waves.iter().enumerate() {
            let WaveSpec::Groups { groups } = wave else {
                continue;
            };
            let expected: u32 = groups.iter().map(|g| g.count).sum();
            let mut director = WaveDirector::new();
            director.current = i;
            director.start_wave(&config, &mut rng, &mut actions);
            assert_eq!(director.queue.len() as u32, expected, "wave {i}");
            assert!(director
                .queue
                .windows(2)
                .all(|w| w[0].at <= w[1].at));
        }
    }

    #[test]
    fn test_formations_stay_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for formation in [
            Formation::Line,
            Formation::Left,
            Formation::Right,
            Formation::Center,
            Formation::Spread,
        ] {
            for i in 0..8 {
                let x = formation_x(formation, i, 8, &mut rng);
                assert!(x >= 0.0 && x <= VIEW_W, "{formation:?} produced {x}");
            }
        }
    }

    #[test]
    fn test_difficulty_rises_per_cycle() {
        let config = default_config();
        let mut director = WaveDirector::new();
        assert_eq!(director.difficulty(&config), 1.0);
        director.current = config.waves.len() - 1;
        assert_eq!(director.difficulty(&config), 1.0);
        director.current = config.waves.len();
        assert_eq!(director.difficulty(&config), 1.25);
        director.current = config.waves.len() * 2;
        assert_eq!(director.difficulty(&config), 1.5);
    }

    #[test]
    fn test_spawn_queue_drains_while_banner_shows() {
        let config = default_config();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut actions = Vec::new();
        let mut events = Vec::new();
        let mut director = WaveDirector::new();
        director.begin(&config, &mut rng, &mut actions, &mut events);
        assert!(director.view(&config).announcing);
        // Wave 1's first group has no start delay; its spawns must not
        // wait for the banner.
        let mut steps = 0;
        while director.view(&config).announcing {
            director.update(DT, &config, 0, false, &mut rng, &mut actions, &mut events);
            steps += 1;
            assert!(steps < 200, "banner never expired");
        }
        assert!(
            actions
                .iter()
                .any(|a| matches!(a, WaveAction::Spawn { .. })),
            "no spawns emitted during the announce banner"
        );
    }

    #[test]
    fn test_clear_breather_restarts_when_enemies_return() {
        let config = default_config();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut actions = Vec::new();
        let mut events = Vec::new();
        let mut director = WaveDirector::new();
        director.phase = Phase::Clearing { timer: 1.0 };
        director.update(0.1, &config, 2, false, &mut rng, &mut actions, &mut events);
        assert!(matches!(director.phase, Phase::Running));
    }
}
