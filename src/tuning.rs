//! Game balance tuning
//!
//! Every gameplay number lives here so a UI layer can hand in a JSON blob
//! to rebalance without recompiling. Missing keys fall back to [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, GameResult};

/// Runtime-tunable gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Session ===
    /// Seconds between clock ticks
    pub second_tick_period: f64,
    /// Session length in clock ticks
    pub session_seconds: u32,
    pub max_hp: u32,
    pub low_hp_fraction: f32,
    pub breach_damage: u32,
    pub breach_z: f32,

    // === Scoring ===
    pub combo_window_secs: f64,
    pub combo_multiplier_cap: u32,
    pub heavy_points: u64,
    pub light_points: u64,

    // === Difficulty ===
    pub level_seconds: u32,
    pub base_spawn_rate: u32,
    pub min_spawn_rate: u32,
    pub spawn_rate_step: u32,
    pub speed_step_per_level: f32,

    // === Spawning ===
    pub population_cap: usize,
    pub heavy_spawn_threshold: f32,
    pub spawn_x: (f32, f32),
    pub spawn_y: (f32, f32),
    pub spawn_z: (f32, f32),
    pub heavy_speed: f32,
    pub light_speed: f32,

    // === Combat ===
    pub hit_tolerance: f32,
    pub overclock_hit_tolerance: f32,
    pub miss_range: f32,
    pub kill_burst: usize,
    pub emp_burst: usize,

    // === Skills ===
    pub emp_cooldown: u32,
    pub overclock_cooldown: u32,
    pub overclock_duration: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            second_tick_period: SECOND_TICK_PERIOD,
            session_seconds: SESSION_SECONDS,
            max_hp: MAX_HP,
            low_hp_fraction: LOW_HP_FRACTION,
            breach_damage: BREACH_DAMAGE,
            breach_z: BREACH_Z,

            combo_window_secs: COMBO_WINDOW_SECS,
            combo_multiplier_cap: COMBO_MULTIPLIER_CAP,
            heavy_points: HEAVY_POINTS,
            light_points: LIGHT_POINTS,

            level_seconds: LEVEL_SECONDS,
            base_spawn_rate: BASE_SPAWN_RATE,
            min_spawn_rate: MIN_SPAWN_RATE,
            spawn_rate_step: SPAWN_RATE_STEP,
            speed_step_per_level: SPEED_STEP_PER_LEVEL,

            population_cap: POPULATION_CAP,
            heavy_spawn_threshold: HEAVY_SPAWN_THRESHOLD,
            spawn_x: SPAWN_X,
            spawn_y: SPAWN_Y,
            spawn_z: SPAWN_Z,
            heavy_speed: HEAVY_SPEED,
            light_speed: LIGHT_SPEED,

            hit_tolerance: HIT_TOLERANCE,
            overclock_hit_tolerance: OVERCLOCK_HIT_TOLERANCE,
            miss_range: MISS_RANGE,
            kill_burst: KILL_BURST,
            emp_burst: EMP_BURST,

            emp_cooldown: EMP_COOLDOWN,
            overclock_cooldown: OVERCLOCK_COOLDOWN,
            overclock_duration: OVERCLOCK_DURATION,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON (partial documents allowed)
    pub fn from_json(json: &str) -> GameResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    pub fn to_json(&self) -> GameResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would stall or break the session
    pub fn validate(&self) -> GameResult<()> {
        fn invalid(field: &'static str, reason: &'static str) -> GameResult<()> {
            Err(GameError::InvalidTuning { field, reason })
        }

        if !self.second_tick_period.is_finite() || self.second_tick_period <= 0.0 {
            return invalid("second_tick_period", "must be positive");
        }
        if self.session_seconds == 0 {
            return invalid("session_seconds", "must be at least one tick");
        }
        if self.max_hp == 0 {
            return invalid("max_hp", "must be non-zero");
        }
        if !(0.0..=1.0).contains(&self.low_hp_fraction) {
            return invalid("low_hp_fraction", "must be within [0, 1]");
        }
        if !self.combo_window_secs.is_finite() || self.combo_window_secs <= 0.0 {
            return invalid("combo_window_secs", "must be positive");
        }
        if self.combo_multiplier_cap == 0 {
            return invalid("combo_multiplier_cap", "must be at least 1");
        }
        if self.level_seconds == 0 {
            return invalid("level_seconds", "must be non-zero");
        }
        if self.min_spawn_rate > self.base_spawn_rate {
            return invalid("min_spawn_rate", "must not exceed base_spawn_rate");
        }
        if self.population_cap == 0 {
            return invalid("population_cap", "must allow at least one hostile");
        }
        if !(0.0..=1.0).contains(&self.heavy_spawn_threshold) {
            return invalid("heavy_spawn_threshold", "must be within [0, 1]");
        }
        for (field, range) in [
            ("spawn_x", self.spawn_x),
            ("spawn_y", self.spawn_y),
            ("spawn_z", self.spawn_z),
        ] {
            if range.0.is_nan() || range.1.is_nan() || range.0 > range.1 {
                return invalid(field, "range is empty");
            }
        }
        for (field, speed) in [
            ("heavy_speed", self.heavy_speed),
            ("light_speed", self.light_speed),
        ] {
            if !speed.is_finite() || speed <= 0.0 {
                return invalid(field, "must be positive");
            }
        }
        if !self.speed_step_per_level.is_finite() || self.speed_step_per_level < 0.0 {
            return invalid("speed_step_per_level", "must not be negative");
        }
        if !self.breach_z.is_finite() {
            return invalid("breach_z", "must be finite");
        }
        if !self.miss_range.is_finite() || self.miss_range <= 0.0 {
            return invalid("miss_range", "must be positive");
        }
        for (field, tolerance) in [
            ("hit_tolerance", self.hit_tolerance),
            ("overclock_hit_tolerance", self.overclock_hit_tolerance),
        ] {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return invalid(field, "must not be negative");
            }
        }
        if self.emp_cooldown == 0 || self.overclock_cooldown == 0 {
            return invalid("cooldown", "must be at least one tick");
        }
        if self.overclock_duration == 0 {
            return invalid("overclock_duration", "must be at least one tick");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "max_hp": 150, "population_cap": 10 }"#).unwrap();
        assert_eq!(tuning.max_hp, 150);
        assert_eq!(tuning.population_cap, 10);
        assert_eq!(tuning.session_seconds, SESSION_SECONDS);
        assert_eq!(tuning.spawn_z, SPAWN_Z);
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning {
            emp_cooldown: 9,
            ..Default::default()
        };
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_rejects_zero_hp() {
        let err = Tuning::from_json(r#"{ "max_hp": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidTuning {
                field: "max_hp",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_empty_spawn_box() {
        let tuning = Tuning {
            spawn_y: (5.0, 1.0),
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(GameError::InvalidTuning {
                field: "spawn_y",
                ..
            })
        ));
    }

    fn rejected_field(tuning: Tuning) -> Option<&'static str> {
        match tuning.validate() {
            Err(GameError::InvalidTuning { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn test_rejects_negative_speed_step() {
        let err = Tuning::from_json(r#"{ "speed_step_per_level": -0.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidTuning {
                field: "speed_step_per_level",
                ..
            }
        ));
        let tuning = Tuning {
            speed_step_per_level: f32::NAN,
            ..Default::default()
        };
        assert_eq!(rejected_field(tuning), Some("speed_step_per_level"));
    }

    #[test]
    fn test_rejects_retreating_hostiles() {
        let err = Tuning::from_json(r#"{ "heavy_speed": -0.35, "light_speed": -0.25 }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidTuning {
                field: "heavy_speed",
                ..
            }
        ));
        for light_speed in [0.0, -0.25, f32::NAN, f32::INFINITY] {
            let tuning = Tuning {
                light_speed,
                ..Default::default()
            };
            assert_eq!(rejected_field(tuning), Some("light_speed"));
        }
    }

    #[test]
    fn test_rejects_non_finite_breach_plane() {
        let tuning = Tuning {
            breach_z: f32::NAN,
            ..Default::default()
        };
        assert_eq!(rejected_field(tuning), Some("breach_z"));
    }

    #[test]
    fn test_rejects_bad_miss_range() {
        for miss_range in [f32::NAN, 0.0, -10.0] {
            let tuning = Tuning {
                miss_range,
                ..Default::default()
            };
            assert_eq!(rejected_field(tuning), Some("miss_range"));
        }
    }

    #[test]
    fn test_rejects_bad_tolerances() {
        let tuning = Tuning {
            hit_tolerance: f32::NAN,
            ..Default::default()
        };
        assert_eq!(rejected_field(tuning), Some("hit_tolerance"));

        let tuning = Tuning {
            overclock_hit_tolerance: -1.0,
            ..Default::default()
        };
        assert_eq!(rejected_field(tuning), Some("overclock_hit_tolerance"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            Tuning::from_json("[1, 2"),
            Err(GameError::TuningParse(_))
        ));
    }
}
