//! Score and combo tracking.
//!
//! Kills inside a rolling window build a combo; the multiplier steps
//! up every few combo kills and caps out. The session-wide score
//! multiplier from progress bonuses applies on top.

use starfighter_core::constants::*;
use starfighter_core::state::ScoreView;

#[derive(Debug, Clone)]
pub struct ScoreSystem {
    score: u64,
    combo: u32,
    max_combo: u32,
    combo_timer: f32,
    multiplier: f32,
    bonus_multiplier: f32,
}

impl ScoreSystem {
    pub fn new(bonus_multiplier: f32) -> Self {
        Self {
            score: 0,
            combo: 0,
            max_combo: 0,
            combo_timer: 0.0,
            multiplier: 1.0,
            bonus_multiplier,
        }
    }

    /// Credit a kill worth `base` points and return the points
    /// actually awarded after multipliers.
    pub fn add_kill(&mut self, base: u32) -> u64 {
        self.combo += 1;
        self.combo_timer = COMBO_WINDOW_SECS;
        self.multiplier = (1.0 + (self.combo / COMBO_STEP) as f32 * MULTIPLIER_STEP)
            .min(MULTIPLIER_CAP);
        self.max_combo = self.max_combo.max(self.combo);
        let points = (base as f32 * self.multiplier * self.bonus_multiplier).floor() as u64;
        self.score += points;
        points
    }

    /// Credit flat points outside the combo system (boss bounty).
    pub fn add_score(&mut self, points: u64) -> u64 {
        let points = (points as f32 * self.bonus_multiplier).floor() as u64;
        self.score += points;
        points
    }

    /// Expire the combo when the window lapses.
    pub fn update(&mut self, dt: f32) {
        if self.combo > 0 {
            self.combo_timer -= dt;
            if self.combo_timer <= 0.0 {
                self.combo = 0;
                self.multiplier = 1.0;
            }
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn view(&self) -> ScoreView {
        ScoreView {
            score: self.score,
            combo: self.combo,
            multiplier: self.multiplier,
            max_combo: self.max_combo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_steps_every_five_kills() {
        let mut score = ScoreSystem::new(1.0);
        for _ in 0..4 {
            score.add_kill(10);
        }
        assert_eq!(score.view().multiplier, 1.0);
        score.add_kill(10);
        assert_eq!(score.view().multiplier, 1.5);
        for _ in 0..19 {
            score.add_kill(10);
        }
        // combo 24 -> floor(24/5) = 4 steps above base
        assert_eq!(score.view().multiplier, 3.0);
    }

    #[test]
    fn test_multiplier_caps() {
        let mut score = ScoreSystem::new(1.0);
        for _ in 0..100 {
            score.add_kill(10);
        }
        assert_eq!(score.view().multiplier, MULTIPLIER_CAP);
    }

    #[test]
    fn test_combo_expires_after_window() {
        let mut score = ScoreSystem::new(1.0);
        score.add_kill(10);
        score.add_kill(10);
        assert_eq!(score.combo(), 2);
        for _ in 0..121 {
            score.update(1.0 / 60.0);
        }
        assert_eq!(score.combo(), 0);
        assert_eq!(score.view().multiplier, 1.0);
    }

    #[test]
    fn test_bonus_multiplier_applies_to_kills_and_bounties() {
        let mut score = ScoreSystem::new(1.1);
        let p = score.add_kill(100);
        assert_eq!(p, 110);
        let p = score.add_score(1000);
        assert_eq!(p, 1100);
        assert_eq!(score.score(), 1210);
    }
}
