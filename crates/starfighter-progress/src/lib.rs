//! Persistent progression across sessions.
//!
//! Tracks best wave, lifetime score, and games played; evaluates
//! milestone unlocks at the end of each session and folds the unlocked
//! rewards into the [`SessionBonus`] applied at the next session start.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use starfighter_core::config::SessionBonus;

/// Lifetime statistics persisted between sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressData {
    pub highest_wave: u32,
    pub total_score: u64,
    pub games_played: u32,
    pub unlocked: BTreeSet<String>,
}

/// Milestone unlock requirement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Requirement {
    /// Best wave reached in any single session.
    HighestWave(u32),
    /// Lifetime score across all sessions.
    TotalScore(u64),
}

impl Requirement {
    fn met(self, data: &ProgressData) -> bool {
        match self {
            Requirement::HighestWave(wave) => data.highest_wave >= wave,
            Requirement::TotalScore(score) => data.total_score >= score,
        }
    }
}

/// Permanent reward granted by a milestone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reward {
    StartFireLevel(u8),
    DamageMultiplier(f32),
    MaxHpBonus(i32),
    ScoreMultiplier(f32),
    MagnetRangeMultiplier(f32),
    ShieldDurationBonus(f32),
}

#[derive(Debug, Clone, Copy)]
pub struct Milestone {
    pub id: &'static str,
    pub name: &'static str,
    pub requirement: Requirement,
    pub reward: Reward,
}

/// Milestones in evaluation order.
pub static MILESTONES: [Milestone; 6] = [
    Milestone {
        id: "fire_start",
        name: "Hot Start",
        requirement: Requirement::HighestWave(10),
        reward: Reward::StartFireLevel(1),
    },
    Milestone {
        id: "damage_up",
        name: "Heavy Ordnance",
        requirement: Requirement::HighestWave(20),
        reward: Reward::DamageMultiplier(1.15),
    },
    Milestone {
        id: "hp_up",
        name: "Reinforced Hull",
        requirement: Requirement::HighestWave(29),
        reward: Reward::MaxHpBonus(2),
    },
    Milestone {
        id: "score_mult",
        name: "Ace Bounty",
        requirement: Requirement::TotalScore(50_000),
        reward: Reward::ScoreMultiplier(1.1),
    },
    Milestone {
        id: "magnet_range",
        name: "Wide Net",
        requirement: Requirement::TotalScore(150_000),
        reward: Reward::MagnetRangeMultiplier(1.25),
    },
    Milestone {
        id: "shield_dur",
        name: "Aegis Training",
        requirement: Requirement::TotalScore(300_000),
        reward: Reward::ShieldDurationBonus(5.0),
    },
];

#[derive(Debug)]
pub enum ProgressError {
    Io(io::Error),
    Format(serde_json::Error),
}

impl fmt::Display for ProgressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressError::Io(err) => write!(f, "progress storage i/o error: {err}"),
            ProgressError::Format(err) => write!(f, "progress data malformed: {err}"),
        }
    }
}

impl std::error::Error for ProgressError {}

impl From<io::Error> for ProgressError {
    fn from(err: io::Error) -> Self {
        ProgressError::Io(err)
    }
}

impl From<serde_json::Error> for ProgressError {
    fn from(err: serde_json::Error) -> Self {
        ProgressError::Format(err)
    }
}

/// Storage backend for progression data.
pub trait ProgressStore {
    fn load(&self) -> Result<ProgressData, ProgressError>;
    fn save(&mut self, data: &ProgressData) -> Result<(), ProgressError>;
}

/// Volatile store for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: ProgressData,
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> Result<ProgressData, ProgressError> {
        Ok(self.data.clone())
    }

    fn save(&mut self, data: &ProgressData) -> Result<(), ProgressError> {
        self.data = data.clone();
        Ok(())
    }
}

/// JSON file store. A missing file reads as fresh progress; a corrupt
/// file is treated the same way with a warning rather than wedging the
/// game behind an unreadable save.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&self) -> Result<ProgressData, ProgressError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(ProgressData::default())
            }
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(data) => Ok(data),
            Err(err) => {
                warn!("discarding corrupt progress file {:?}: {err}", self.path);
                Ok(ProgressData::default())
            }
        }
    }

    fn save(&mut self, data: &ProgressData) -> Result<(), ProgressError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(data)?)?;
        Ok(())
    }
}

/// Owns the progression data and its store.
pub struct ProgressTracker<S: ProgressStore> {
    store: S,
    data: ProgressData,
}

impl<S: ProgressStore> ProgressTracker<S> {
    pub fn new(store: S) -> Result<Self, ProgressError> {
        let data = store.load()?;
        Ok(Self { store, data })
    }

    pub fn data(&self) -> &ProgressData {
        &self.data
    }

    /// Merge one finished session, persist, and return the milestones
    /// newly unlocked by it.
    pub fn on_game_end(
        &mut self,
        wave_reached: u32,
        score: u64,
    ) -> Result<Vec<&'static Milestone>, ProgressError> {
        self.data.highest_wave = self.data.highest_wave.max(wave_reached);
        self.data.total_score += score;
        self.data.games_played += 1;

        let mut unlocked = Vec::new();
        for milestone in &MILESTONES {
            if self.data.unlocked.contains(milestone.id) {
                continue;
            }
            if milestone.requirement.met(&self.data) {
                self.data.unlocked.insert(milestone.id.to_string());
                info!("milestone unlocked: {} ({})", milestone.name, milestone.id);
                unlocked.push(milestone);
            }
        }
        self.store.save(&self.data)?;
        Ok(unlocked)
    }

    /// Fold every unlocked reward into the bonus applied at session
    /// start. Multipliers compose by product, flat rewards by sum.
    pub fn active_bonus(&self) -> SessionBonus {
        let mut bonus = SessionBonus::default();
        for milestone in &MILESTONES {
            if !self.data.unlocked.contains(milestone.id) {
                continue;
            }
            match milestone.reward {
                Reward::StartFireLevel(levels) => bonus.start_fire_level += levels,
                Reward::DamageMultiplier(m) => bonus.damage_multiplier *= m,
                Reward::MaxHpBonus(hp) => bonus.max_hp_bonus += hp,
                Reward::ScoreMultiplier(m) => bonus.score_multiplier *= m,
                Reward::MagnetRangeMultiplier(m) => bonus.magnet_range_multiplier *= m,
                Reward::ShieldDurationBonus(secs) => bonus.shield_duration_bonus += secs,
            }
        }
        bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ProgressTracker<MemoryStore> {
        ProgressTracker::new(MemoryStore::default()).unwrap()
    }

    #[test]
    fn test_fresh_progress_has_no_bonus() {
        let tracker = tracker();
        assert_eq!(tracker.active_bonus(), SessionBonus::default());
    }

    #[test]
    fn test_wave_milestone_unlocks_once() {
        let mut tracker = tracker();
        let unlocked = tracker.on_game_end(10, 100).unwrap();
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].id, "fire_start");
        // already unlocked, must not fire again
        let unlocked = tracker.on_game_end(12, 100).unwrap();
        assert!(unlocked.is_empty());
    }

    #[test]
    fn test_lifetime_score_accumulates_across_games() {
        let mut tracker = tracker();
        assert!(tracker.on_game_end(3, 30_000).unwrap().is_empty());
        let unlocked = tracker.on_game_end(3, 25_000).unwrap();
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].id, "score_mult");
        assert_eq!(tracker.data().total_score, 55_000);
        assert_eq!(tracker.data().games_played, 2);
    }

    #[test]
    fn test_one_game_can_unlock_several() {
        let mut tracker = tracker();
        let unlocked = tracker.on_game_end(29, 400_000).unwrap();
        let ids: Vec<_> = unlocked.iter().map(|m| m.id).collect();
        assert_eq!(
            ids,
            [
                "fire_start",
                "damage_up",
                "hp_up",
                "score_mult",
                "magnet_range",
                "shield_dur"
            ]
        );
    }

    #[test]
    fn test_bonus_composition() {
        let mut tracker = tracker();
        tracker.on_game_end(29, 400_000).unwrap();
        let bonus = tracker.active_bonus();
        assert_eq!(bonus.start_fire_level, 1);
        assert_eq!(bonus.damage_multiplier, 1.15);
        assert_eq!(bonus.max_hp_bonus, 2);
        assert_eq!(bonus.score_multiplier, 1.1);
        assert_eq!(bonus.magnet_range_multiplier, 1.25);
        assert_eq!(bonus.shield_duration_bonus, 5.0);
    }

    #[test]
    fn test_highest_wave_keeps_best() {
        let mut tracker = tracker();
        tracker.on_game_end(15, 0).unwrap();
        tracker.on_game_end(4, 0).unwrap();
        assert_eq!(tracker.data().highest_wave, 15);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        {
            let store = JsonFileStore::new(&path);
            let mut tracker = ProgressTracker::new(store).unwrap();
            tracker.on_game_end(12, 60_000).unwrap();
        }
        let store = JsonFileStore::new(&path);
        let tracker = ProgressTracker::new(store).unwrap();
        assert_eq!(tracker.data().highest_wave, 12);
        assert!(tracker.data().unlocked.contains("fire_start"));
        assert!(tracker.data().unlocked.contains("score_mult"));
    }

    #[test]
    fn test_missing_file_reads_as_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        let tracker = ProgressTracker::new(store).unwrap();
        assert_eq!(tracker.data().games_played, 0);
    }

    #[test]
    fn test_corrupt_file_reads_as_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = JsonFileStore::new(&path);
        let tracker = ProgressTracker::new(store).unwrap();
        assert_eq!(tracker.data().total_score, 0);
    }
}
