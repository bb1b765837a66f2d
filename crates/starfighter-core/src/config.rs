//! External configuration tables consumed by the simulation.
//!
//! The tables are supplied by value at session start and validated
//! once, up front. Malformed or missing entries (unknown enemy/boss
//! keys, bad phase lists, empty weight tables) are fatal configuration
//! errors — the simulation never substitutes defaults during play.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::{AttackPattern, BossMechanic, Formation, MovePattern, PowerUpKind};

/// Player archetype stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipSpec {
    pub name: String,
    /// Movement speed, units/s.
    pub speed: f32,
    /// Seconds between shots.
    pub fire_rate: f32,
    pub bullet_damage: f32,
    pub max_hp: i32,
    pub color: String,
    pub glow_color: String,
}

/// Enemy type stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpec {
    pub hp: f32,
    pub speed: f32,
    pub score_value: u32,
    /// Powerup drop probability, 0..1.
    pub drop_rate: f32,
    /// Seconds between aimed shots; 0 disables shooting.
    pub fire_rate: f32,
    pub size: f32,
    pub hit_w: f32,
    pub hit_h: f32,
    pub color: String,
}

/// One hp-threshold-gated boss behavior profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossPhaseSpec {
    /// Phase is active while hp/maxHp exceeds this fraction (the final
    /// phase carries 0).
    pub hp_threshold: f32,
    pub pattern: AttackPattern,
    /// Seconds between attack volleys.
    pub fire_rate: f32,
    pub move_speed: f32,
}

/// Boss definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossSpec {
    pub name: String,
    pub hp: f32,
    pub score_value: u32,
    pub size: f32,
    pub hit_w: f32,
    pub hit_h: f32,
    pub color: String,
    pub glow_color: String,
    #[serde(default)]
    pub mechanics: Vec<BossMechanic>,
    pub phases: Vec<BossPhaseSpec>,
}

/// One spawn group within a wave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnGroup {
    /// Enemy type key.
    pub enemy: String,
    pub count: u32,
    pub pattern: MovePattern,
    /// Seconds after wave start before the first spawn.
    pub delay: f32,
    /// Seconds between consecutive spawns in this group.
    pub interval: f32,
    pub formation: Formation,
}

/// A wave is either a boss encounter or a list of spawn groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WaveSpec {
    Boss { boss: String },
    Groups { groups: Vec<SpawnGroup> },
}

/// A contiguous run of waves sharing a theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterSpec {
    pub name: String,
    /// First wave index (0-based, inclusive).
    pub wave_start: usize,
    /// Last wave index (inclusive).
    pub wave_end: usize,
}

/// Permanent bonuses unlocked through milestones, applied at session
/// start. Multiplicative fields compose by product, additive by sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionBonus {
    pub start_fire_level: u8,
    pub damage_multiplier: f32,
    pub max_hp_bonus: i32,
    pub score_multiplier: f32,
    pub magnet_range_multiplier: f32,
    pub shield_duration_bonus: f32,
}

impl Default for SessionBonus {
    fn default() -> Self {
        Self {
            start_fire_level: 0,
            damage_multiplier: 1.0,
            max_hp_bonus: 0,
            score_multiplier: 1.0,
            magnet_range_multiplier: 1.0,
            shield_duration_bonus: 0.0,
        }
    }
}

/// The complete configuration consumed at session start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub ships: BTreeMap<String, ShipSpec>,
    pub enemies: BTreeMap<String, EnemySpec>,
    pub bosses: BTreeMap<String, BossSpec>,
    pub waves: Vec<WaveSpec>,
    pub chapters: Vec<ChapterSpec>,
    /// Weighted powerup type distribution, keyed per type.
    pub powerup_weights: BTreeMap<PowerUpKind, u32>,
}

/// Fatal configuration error detected during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NoShips,
    NoWaves,
    UnknownArchetype(String),
    UnknownEnemy { wave: usize, key: String },
    UnknownBoss { wave: usize, key: String },
    EmptyWave(usize),
    EmptyPhases(String),
    BadThresholds(String),
    BadChapterCoverage,
    NoPowerUpWeights,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoShips => write!(f, "no player archetypes defined"),
            ConfigError::NoWaves => write!(f, "wave table is empty"),
            ConfigError::UnknownArchetype(key) => {
                write!(f, "unknown player archetype '{key}'")
            }
            ConfigError::UnknownEnemy { wave, key } => {
                write!(f, "wave {wave} references unknown enemy type '{key}'")
            }
            ConfigError::UnknownBoss { wave, key } => {
                write!(f, "wave {wave} references unknown boss '{key}'")
            }
            ConfigError::EmptyWave(wave) => {
                write!(f, "wave {wave} has no spawn groups")
            }
            ConfigError::EmptyPhases(boss) => {
                write!(f, "boss '{boss}' has no phases")
            }
            ConfigError::BadThresholds(boss) => write!(
                f,
                "boss '{boss}' phase thresholds must descend strictly to 0"
            ),
            ConfigError::BadChapterCoverage => {
                write!(f, "chapters must contiguously cover the wave table")
            }
            ConfigError::NoPowerUpWeights => {
                write!(f, "powerup weight table is empty or all-zero")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl GameConfig {
    /// Validate the tables. Called once at session start; per-tick code
    /// assumes a validated config and is total.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ships.is_empty() {
            return Err(ConfigError::NoShips);
        }
        if self.waves.is_empty() {
            return Err(ConfigError::NoWaves);
        }
        for (i, wave) in self.waves.iter().enumerate() {
            match wave {
                WaveSpec::Boss { boss } => {
                    if !self.bosses.contains_key(boss) {
                        return Err(ConfigError::UnknownBoss {
                            wave: i,
                            key: boss.clone(),
                        });
                    }
                }
                WaveSpec::Groups { groups } => {
                    if groups.is_empty() {
                        return Err(ConfigError::EmptyWave(i));
                    }
                    for group in groups {
                        if !self.enemies.contains_key(&group.enemy) {
                            return Err(ConfigError::UnknownEnemy {
                                wave: i,
                                key: group.enemy.clone(),
                            });
                        }
                    }
                }
            }
        }
        for (key, boss) in &self.bosses {
            if boss.phases.is_empty() {
                return Err(ConfigError::EmptyPhases(key.clone()));
            }
            let mut prev = f32::INFINITY;
            for phase in &boss.phases {
                if phase.hp_threshold >= prev || phase.hp_threshold < 0.0 {
                    return Err(ConfigError::BadThresholds(key.clone()));
                }
                prev = phase.hp_threshold;
            }
            if boss.phases.last().map(|p| p.hp_threshold) != Some(0.0) {
                return Err(ConfigError::BadThresholds(key.clone()));
            }
        }
        let mut next_start = 0usize;
        for chapter in &self.chapters {
            if chapter.wave_start != next_start || chapter.wave_end < chapter.wave_start {
                return Err(ConfigError::BadChapterCoverage);
            }
            next_start = chapter.wave_end + 1;
        }
        if self.chapters.is_empty() || next_start != self.waves.len() {
            return Err(ConfigError::BadChapterCoverage);
        }
        if self.powerup_weights.values().sum::<u32>() == 0 {
            return Err(ConfigError::NoPowerUpWeights);
        }
        Ok(())
    }

    /// Chapter index for a wave index within one campaign cycle.
    pub fn chapter_for_wave(&self, wave_index: usize) -> usize {
        let idx = wave_index % self.waves.len();
        self.chapters
            .iter()
            .position(|c| idx >= c.wave_start && idx <= c.wave_end)
            .unwrap_or(0)
    }
}

/// The stock campaign: 3 archetypes, 3 enemy types, 6 bosses, and a
/// 30-wave cycle split into 3 chapters of 10 (a mid-chapter and an
/// end-of-chapter boss each).
pub fn default_config() -> GameConfig {
    let mut ships = BTreeMap::new();
    ships.insert(
        "balanced".into(),
        ShipSpec {
            name: "Falcon".into(),
            speed: 300.0,
            fire_rate: 0.09,
            bullet_damage: 1.0,
            max_hp: 8,
            color: "#00e5ff".into(),
            glow_color: "#00bcd4".into(),
        },
    );
    ships.insert(
        "speed".into(),
        ShipSpec {
            name: "Phantom".into(),
            speed: 400.0,
            fire_rate: 0.07,
            bullet_damage: 0.8,
            max_hp: 5,
            color: "#76ff03".into(),
            glow_color: "#64dd17".into(),
        },
    );
    ships.insert(
        "heavy".into(),
        ShipSpec {
            name: "Bastion".into(),
            speed: 220.0,
            fire_rate: 0.12,
            bullet_damage: 1.8,
            max_hp: 12,
            color: "#ff6e40".into(),
            glow_color: "#ff3d00".into(),
        },
    );

    let mut enemies = BTreeMap::new();
    enemies.insert(
        "small".into(),
        EnemySpec {
            hp: 1.0,
            speed: 100.0,
            score_value: 100,
            drop_rate: 0.18,
            fire_rate: 0.0,
            size: 12.0,
            hit_w: 20.0,
            hit_h: 20.0,
            color: "#ff5252".into(),
        },
    );
    enemies.insert(
        "medium".into(),
        EnemySpec {
            hp: 3.0,
            speed: 70.0,
            score_value: 250,
            drop_rate: 0.35,
            fire_rate: 2.0,
            size: 18.0,
            hit_w: 30.0,
            hit_h: 30.0,
            color: "#ff9100".into(),
        },
    );
    enemies.insert(
        "elite".into(),
        EnemySpec {
            hp: 6.0,
            speed: 55.0,
            score_value: 500,
            drop_rate: 0.55,
            fire_rate: 1.2,
            size: 20.0,
            hit_w: 34.0,
            hit_h: 34.0,
            color: "#e040fb".into(),
        },
    );

    let bosses = default_bosses();

    let mut waves = Vec::with_capacity(30);
    waves.extend(chapter_waves("boss1", "boss2"));
    waves.extend(chapter_waves("boss3", "boss4"));
    waves.extend(chapter_waves("boss5", "boss6"));

    let chapters = vec![
        ChapterSpec {
            name: "Deep Space".into(),
            wave_start: 0,
            wave_end: 9,
        },
        ChapterSpec {
            name: "Nebula Zone".into(),
            wave_start: 10,
            wave_end: 19,
        },
        ChapterSpec {
            name: "Inferno Core".into(),
            wave_start: 20,
            wave_end: 29,
        },
    ];

    let mut powerup_weights = BTreeMap::new();
    powerup_weights.insert(PowerUpKind::FireUp, 30);
    powerup_weights.insert(PowerUpKind::Spread, 15);
    powerup_weights.insert(PowerUpKind::Shield, 12);
    powerup_weights.insert(PowerUpKind::Bomb, 8);
    powerup_weights.insert(PowerUpKind::Heal, 20);
    powerup_weights.insert(PowerUpKind::Magnet, 15);

    GameConfig {
        ships,
        enemies,
        bosses,
        waves,
        chapters,
        powerup_weights,
    }
}

/// The 10-wave chapter template: 4 escalating group waves, a
/// mid-chapter boss, 4 heavier group waves, the chapter boss.
fn chapter_waves(mid_boss: &str, end_boss: &str) -> Vec<WaveSpec> {
    use Formation::*;
    use MovePattern::*;

    fn group(
        enemy: &str,
        count: u32,
        pattern: MovePattern,
        delay: f32,
        interval: f32,
        formation: Formation,
    ) -> SpawnGroup {
        SpawnGroup {
            enemy: enemy.into(),
            count,
            pattern,
            delay,
            interval,
            formation,
        }
    }

    vec![
        WaveSpec::Groups {
            groups: vec![group("small", 5, Straight, 0.0, 0.6, Line)],
        },
        WaveSpec::Groups {
            groups: vec![
                group("small", 4, Straight, 0.0, 0.4, Left),
                group("small", 4, Straight, 1.5, 0.4, Right),
            ],
        },
        WaveSpec::Groups {
            groups: vec![
                group("small", 6, Sine, 0.0, 0.5, Line),
                group("medium", 1, Straight, 2.0, 0.0, Center),
            ],
        },
        WaveSpec::Groups {
            groups: vec![
                group("medium", 3, Sine, 0.0, 0.8, Spread),
                group("small", 6, Zigzag, 1.0, 0.3, Line),
            ],
        },
        WaveSpec::Boss {
            boss: mid_boss.into(),
        },
        WaveSpec::Groups {
            groups: vec![
                group("small", 8, Straight, 0.0, 0.3, Line),
                group("medium", 3, Sine, 1.0, 0.6, Spread),
            ],
        },
        WaveSpec::Groups {
            groups: vec![
                group("elite", 1, Sine, 0.0, 0.0, Center),
                group("small", 6, Straight, 0.5, 0.4, Spread),
            ],
        },
        WaveSpec::Groups {
            groups: vec![
                group("small", 10, Dive, 0.0, 0.25, Line),
                group("medium", 4, Zigzag, 1.5, 0.5, Spread),
            ],
        },
        WaveSpec::Groups {
            groups: vec![
                group("elite", 2, Sine, 0.0, 1.0, Spread),
                group("medium", 4, Straight, 0.5, 0.5, Line),
                group("small", 8, Zigzag, 2.0, 0.2, Spread),
            ],
        },
        WaveSpec::Boss {
            boss: end_boss.into(),
        },
    ]
}

fn default_bosses() -> BTreeMap<String, BossSpec> {
    use AttackPattern::*;

    fn phase(hp_threshold: f32, pattern: AttackPattern, fire_rate: f32, move_speed: f32) -> BossPhaseSpec {
        BossPhaseSpec {
            hp_threshold,
            pattern,
            fire_rate,
            move_speed,
        }
    }

    let mut bosses = BTreeMap::new();
    bosses.insert(
        "boss1".into(),
        BossSpec {
            name: "Sentinel".into(),
            hp: 80.0,
            score_value: 3000,
            size: 50.0,
            hit_w: 80.0,
            hit_h: 60.0,
            color: "#ff3d00".into(),
            glow_color: "#ff6e40".into(),
            mechanics: vec![],
            phases: vec![
                phase(0.6, Spread, 1.0, 60.0),
                phase(0.3, Spiral, 0.6, 90.0),
                phase(0.0, Barrage, 0.3, 120.0),
            ],
        },
    );
    bosses.insert(
        "boss2".into(),
        BossSpec {
            name: "Annihilator".into(),
            hp: 140.0,
            score_value: 6000,
            size: 55.0,
            hit_w: 90.0,
            hit_h: 65.0,
            color: "#aa00ff".into(),
            glow_color: "#d500f9".into(),
            mechanics: vec![],
            phases: vec![
                phase(0.7, Spread, 0.8, 70.0),
                phase(0.4, Spiral, 0.5, 100.0),
                phase(0.0, Barrage, 0.2, 130.0),
            ],
        },
    );
    bosses.insert(
        "boss3".into(),
        BossSpec {
            name: "Mirage".into(),
            hp: 100.0,
            score_value: 8000,
            size: 48.0,
            hit_w: 78.0,
            hit_h: 58.0,
            color: "#00e5ff".into(),
            glow_color: "#18ffff".into(),
            mechanics: vec![BossMechanic::Teleport],
            phases: vec![
                phase(0.6, Spread, 0.9, 80.0),
                phase(0.3, Laser, 0.4, 100.0),
                phase(0.0, Spiral, 0.3, 120.0),
            ],
        },
    );
    bosses.insert(
        "boss4".into(),
        BossSpec {
            name: "Abyss Lord".into(),
            hp: 180.0,
            score_value: 12000,
            size: 58.0,
            hit_w: 95.0,
            hit_h: 70.0,
            color: "#7b1fa2".into(),
            glow_color: "#ce93d8".into(),
            mechanics: vec![BossMechanic::SummonTimer],
            phases: vec![
                phase(0.6, Spiral, 0.7, 65.0),
                phase(0.3, Summon, 0.5, 85.0),
                phase(0.0, Barrage, 0.2, 110.0),
            ],
        },
    );
    bosses.insert(
        "boss5".into(),
        BossSpec {
            name: "Flame General".into(),
            hp: 140.0,
            score_value: 15000,
            size: 52.0,
            hit_w: 85.0,
            hit_h: 62.0,
            color: "#ff6d00".into(),
            glow_color: "#ffab40".into(),
            mechanics: vec![BossMechanic::Shield],
            phases: vec![
                phase(0.6, Cross, 0.8, 75.0),
                phase(0.3, Spread, 0.4, 95.0),
                phase(0.0, Barrage, 0.2, 125.0),
            ],
        },
    );
    bosses.insert(
        "boss6".into(),
        BossSpec {
            name: "Terminus".into(),
            hp: 250.0,
            score_value: 25000,
            size: 60.0,
            hit_w: 100.0,
            hit_h: 75.0,
            color: "#e0e0e0".into(),
            glow_color: "#ffffff".into(),
            mechanics: vec![
                BossMechanic::Teleport,
                BossMechanic::SummonTimer,
                BossMechanic::Shield,
            ],
            phases: vec![
                phase(0.7, Laser, 0.6, 70.0),
                phase(0.4, Summon, 0.4, 90.0),
                phase(0.0, Cross, 0.15, 130.0),
            ],
        },
    );
    bosses
}
