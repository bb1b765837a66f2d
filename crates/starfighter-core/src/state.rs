//! Session snapshot — the complete visible state produced each tick
//! for rendering, audio, and HUD collaborators.

use serde::{Deserialize, Serialize};

use crate::enums::{GameState, PowerUpKind};
use crate::events::GameEvent;
use crate::types::SimTime;

/// Complete per-tick view of a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: GameState,
    pub time: SimTime,
    pub score: ScoreView,
    pub wave: WaveView,
    pub player: Option<PlayerView>,
    pub boss: Option<BossView>,
    pub enemies: Vec<EnemyView>,
    pub bullets: Vec<BulletView>,
    pub enemy_bullets: Vec<BulletView>,
    pub powerups: Vec<PowerUpView>,
    /// One-shot events since the previous snapshot.
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub score: u64,
    pub combo: u32,
    pub multiplier: f32,
    pub max_combo: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    /// 1-based wave number for HUD display.
    pub wave_number: u32,
    pub chapter: usize,
    pub announcing: bool,
    pub difficulty: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub fire_level: u8,
    pub archetype: String,
    pub invincible: bool,
    pub shield: bool,
    pub magnet: bool,
    pub spread: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub x: f32,
    pub y: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub kind: String,
    pub color: String,
    pub size: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossView {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub phase: usize,
    pub shielded: bool,
    pub teleporting: bool,
    /// Render alpha during teleport fades.
    pub alpha: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletView {
    pub x: f32,
    pub y: f32,
    pub hostile: bool,
    /// Visual tier for friendly bullets (cosmetic).
    pub fire_level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpView {
    pub x: f32,
    pub y: f32,
    pub kind: PowerUpKind,
    /// Remaining seconds before the pickup despawns.
    pub lifetime: f32,
}
