//! Global time-scale effects: slow motion and hit-stop.
//!
//! Each fixed step asks for its effective dt before touching the
//! simulation. Hit-stop freezes a few steps entirely; slow motion
//! scales dt and eases back to real time over its duration.

/// Time-scale state owned by the engine.
#[derive(Debug, Clone)]
pub struct TimeFx {
    slow_mo_target: f32,
    slow_mo_duration: f32,
    slow_mo_timer: f32,
    hit_stop_timer: f32,
}

impl Default for TimeFx {
    fn default() -> Self {
        Self {
            slow_mo_target: 1.0,
            slow_mo_duration: 0.0,
            slow_mo_timer: 0.0,
            hit_stop_timer: 0.0,
        }
    }
}

impl TimeFx {
    /// Enter slow motion at `scale` for `duration` seconds.
    pub fn slow_mo(&mut self, scale: f32, duration: f32) {
        self.slow_mo_target = scale;
        self.slow_mo_duration = duration;
        self.slow_mo_timer = duration;
    }

    /// Freeze the simulation for `duration` seconds of fixed steps.
    pub fn hit_stop(&mut self, duration: f32) {
        self.hit_stop_timer = duration;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Current time scale (1.0 outside slow motion). Eases back toward
    /// real time as the slow-mo window expires.
    pub fn scale(&self) -> f32 {
        if self.slow_mo_timer <= 0.0 || self.slow_mo_duration <= 0.0 {
            return 1.0;
        }
        let progress = 1.0 - self.slow_mo_timer / self.slow_mo_duration;
        self.slow_mo_target + (1.0 - self.slow_mo_target) * progress
    }

    /// Consume one fixed step of `raw_dt` seconds and return the
    /// effective dt the simulation should integrate.
    pub fn begin_step(&mut self, raw_dt: f32) -> f32 {
        if self.hit_stop_timer > 0.0 {
            self.hit_stop_timer -= raw_dt;
            return 0.0;
        }
        let effective = raw_dt * self.scale();
        if self.slow_mo_timer > 0.0 {
            self.slow_mo_timer -= raw_dt;
        }
        effective
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_stop_freezes_then_releases() {
        let mut fx = TimeFx::default();
        fx.hit_stop(0.05);
        let dt = 1.0 / 60.0;
        assert_eq!(fx.begin_step(dt), 0.0);
        assert_eq!(fx.begin_step(dt), 0.0);
        assert_eq!(fx.begin_step(dt), 0.0);
        assert!(fx.begin_step(dt) > 0.0);
    }

    #[test]
    fn test_slow_mo_eases_back_to_real_time() {
        let mut fx = TimeFx::default();
        fx.slow_mo(0.2, 1.0);
        let dt = 1.0 / 60.0;
        let first = fx.begin_step(dt);
        assert!(first < dt * 0.25);
        for _ in 0..70 {
            fx.begin_step(dt);
        }
        assert_eq!(fx.begin_step(dt), dt);
    }
}
