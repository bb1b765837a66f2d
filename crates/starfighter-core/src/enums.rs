//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Session state (top-level state machine).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Menu,
    ShipSelect,
    Playing,
    Paused,
    /// Boss entry animation; combat suspended.
    BossIntro,
    /// Chapter banner; wave setup deferred until dismissed.
    ChapterTransition,
    /// Player destroyed, slow fade before GameOver.
    DeathSequence,
    GameOver,
}

/// Enemy movement pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovePattern {
    /// Constant descent.
    #[default]
    Straight,
    /// Descent plus lateral sine wave (randomized amplitude/frequency).
    Sine,
    /// Descent plus sign-alternating lateral drift.
    Zigzag,
    /// Descent that accelerates over time.
    Dive,
}

/// Rule mapping a spawn index within a group to an x coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formation {
    /// Evenly spaced across the playfield.
    #[default]
    Line,
    /// Random position in the left 30%.
    Left,
    /// Random position in the right 30%.
    Right,
    /// Jittered around the center.
    Center,
    /// Random across the full width.
    Spread,
}

/// Boss attack pattern, selected per phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackPattern {
    /// Fan of bullets around the downward axis.
    Spread,
    /// Persistent rotating 3-arm spiral.
    Spiral,
    /// Full-circle ring offset by elapsed time.
    Barrage,
    /// Rapid burst along a slowly sweeping axis.
    Laser,
    /// Summons minions plus a small fan.
    Summon,
    /// Rotating 4-way cross with 3 speed tiers.
    Cross,
}

/// Optional boss behavior module, layered onto the phase system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossMechanic {
    /// Fade out, relocate randomly, fade back in on a fixed cooldown.
    Teleport,
    /// Spawn 2-3 minions near the boss on a fixed cooldown.
    SummonTimer,
    /// Alternate damage-immune windows with vulnerable cooldowns.
    Shield,
}

/// Collectible powerup type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    FireUp,
    Spread,
    Shield,
    Bomb,
    Heal,
    Magnet,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::FireUp,
        PowerUpKind::Spread,
        PowerUpKind::Shield,
        PowerUpKind::Bomb,
        PowerUpKind::Heal,
        PowerUpKind::Magnet,
    ];

    /// Status duration in seconds; 0 for instant effects.
    pub fn duration(self) -> f32 {
        match self {
            PowerUpKind::Spread => 8.0,
            PowerUpKind::Shield | PowerUpKind::Magnet => 10.0,
            PowerUpKind::FireUp | PowerUpKind::Bomb | PowerUpKind::Heal => 0.0,
        }
    }

    /// Semantic color hint for pickup/collection feedback.
    pub fn color(self) -> &'static str {
        match self {
            PowerUpKind::FireUp => "#ff6d00",
            PowerUpKind::Spread => "#ffab00",
            PowerUpKind::Shield => "#40c4ff",
            PowerUpKind::Bomb => "#ff1744",
            PowerUpKind::Heal => "#69f0ae",
            PowerUpKind::Magnet => "#e040fb",
        }
    }
}
