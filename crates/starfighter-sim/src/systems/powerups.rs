//! Weighted powerup drops.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use starfighter_core::enums::PowerUpKind;

use crate::entities::PowerUp;

/// Cumulative weight table built once per session from the config.
#[derive(Debug, Clone)]
pub struct DropTable {
    entries: Vec<(PowerUpKind, u32)>,
    total: u32,
}

impl DropTable {
    /// Build from per-type weights. Zero-weight types never drop;
    /// types absent from the map are treated as zero.
    pub fn new(weights: &BTreeMap<PowerUpKind, u32>) -> Self {
        let mut entries = Vec::new();
        let mut total = 0;
        for (&kind, &weight) in weights {
            if weight > 0 {
                total += weight;
                entries.push((kind, total));
            }
        }
        Self { entries, total }
    }

    /// Pick one type proportional to its weight.
    pub fn pick(&self, rng: &mut ChaCha8Rng) -> PowerUpKind {
        let roll = rng.gen_range(0..self.total);
        for &(kind, cumulative) in &self.entries {
            if roll < cumulative {
                return kind;
            }
        }
        self.entries[self.entries.len() - 1].0
    }

    /// Roll a drop chance for a killed enemy.
    pub fn try_spawn(
        &self,
        drop_rate: f32,
        pos: Vec2,
        rng: &mut ChaCha8Rng,
        out: &mut Vec<PowerUp>,
    ) {
        if rng.gen::<f32>() < drop_rate {
            out.push(PowerUp::new(self.pick(rng), pos));
        }
    }

    /// Guaranteed burst of 3-4 drops when a boss falls, uniformly
    /// random in type and jittered around the death position.
    pub fn spawn_boss_drops(&self, pos: Vec2, rng: &mut ChaCha8Rng, out: &mut Vec<PowerUp>) {
        let count = 3 + rng.gen_range(0..2);
        for _ in 0..count {
            let kind = PowerUpKind::ALL[rng.gen_range(0..PowerUpKind::ALL.len())];
            let jitter = Vec2::new(
                (rng.gen::<f32>() - 0.5) * 60.0,
                (rng.gen::<f32>() - 0.5) * 40.0,
            );
            out.push(PowerUp::new(kind, pos + jitter));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn weights(pairs: &[(PowerUpKind, u32)]) -> BTreeMap<PowerUpKind, u32> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_zero_weight_types_never_picked() {
        let table = DropTable::new(&weights(&[
            (PowerUpKind::Heal, 10),
            (PowerUpKind::Bomb, 0),
        ]));
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            assert_eq!(table.pick(&mut rng), PowerUpKind::Heal);
        }
    }

    #[test]
    fn test_picks_follow_weights_roughly() {
        let table = DropTable::new(&weights(&[
            (PowerUpKind::FireUp, 90),
            (PowerUpKind::Shield, 10),
        ]));
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut fire = 0;
        for _ in 0..1000 {
            if table.pick(&mut rng) == PowerUpKind::FireUp {
                fire += 1;
            }
        }
        assert!(fire > 800 && fire < 980, "fire={fire}");
    }

    #[test]
    fn test_drop_rate_zero_never_spawns() {
        let table = DropTable::new(&weights(&[(PowerUpKind::Heal, 1)]));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut out = Vec::new();
        for _ in 0..10_000 {
            table.try_spawn(0.0, Vec2::ZERO, &mut rng, &mut out);
        }
        assert!(out.is_empty());
    }

    #[test]
    fn test_drop_rate_one_always_spawns() {
        let table = DropTable::new(&weights(&[(PowerUpKind::Heal, 1)]));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut out = Vec::new();
        for _ in 0..10_000 {
            table.try_spawn(1.0, Vec2::ZERO, &mut rng, &mut out);
        }
        assert_eq!(out.len(), 10_000);
    }

    #[test]
    fn test_boss_drops_burst_near_position() {
        let table = DropTable::new(&weights(&[(PowerUpKind::Heal, 1)]));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut out = Vec::new();
        table.spawn_boss_drops(Vec2::new(100.0, 100.0), &mut rng, &mut out);
        assert!((3..=4).contains(&out.len()));
        for drop in &out {
            assert!((drop.pos.x - 100.0).abs() <= 30.0);
            assert!((drop.pos.y - 100.0).abs() <= 20.0);
        }
    }
}
