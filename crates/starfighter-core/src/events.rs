//! Discrete events emitted by the simulation for rendering and audio
//! feedback. Each event is a one-shot carrying a position and a
//! semantic color/intensity hint.

use serde::{Deserialize, Serialize};

use crate::enums::PowerUpKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Player bullet struck an enemy without killing it.
    EnemyHit { x: f32, y: f32 },
    /// Enemy destroyed; `points` already include the combo multiplier.
    EnemyKilled {
        x: f32,
        y: f32,
        points: u64,
        combo: u32,
        color: String,
        intensity: f32,
    },
    /// Player bullet struck the boss (absorbed hits included).
    BossHit { x: f32, y: f32, absorbed: bool },
    /// Boss crossed into a more severe phase. Fires exactly once per
    /// threshold crossing.
    BossPhaseStarted {
        phase: usize,
        x: f32,
        y: f32,
        color: String,
    },
    /// Boss entry animation began.
    BossIntroStarted { name: String },
    BossDefeated {
        x: f32,
        y: f32,
        points: u64,
        intensity: f32,
    },
    /// Player took hp damage.
    PlayerHit { x: f32, y: f32, hp: i32 },
    /// A shield absorbed a hit and broke.
    ShieldBroken { x: f32, y: f32 },
    PlayerDied { x: f32, y: f32, intensity: f32 },
    PowerUpCollected {
        x: f32,
        y: f32,
        kind: PowerUpKind,
        color: String,
    },
    /// Bomb powerup cleared the screen.
    BombDetonated { x: f32, y: f32, intensity: f32 },
    WaveAnnounced { wave: u32, chapter: usize },
    WaveCleared { wave: u32 },
    ChapterEntered { chapter: usize, name: String },
    /// Emitted by the host layer after end-of-session progress merge.
    MilestoneUnlocked { id: String, name: String },
}
