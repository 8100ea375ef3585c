//! Session state and core simulation types

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::skills::SkillKind;
use crate::consts::*;
use crate::hud::HudSnapshot;
use crate::tuning::Tuning;

/// Opaque entity key shared by hostiles and particles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for the start command
    #[default]
    Idle,
    /// Active gameplay, both ticks running
    Playing,
    /// Run ended, waiting for replay
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameOverReason {
    /// Survived until the timer expired
    TimeUp,
    /// HP reached zero
    Infected,
}

impl GameOverReason {
    /// Machine-readable tag
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverReason::TimeUp => "time-up",
            GameOverReason::Infected => "infected",
        }
    }

    /// Human-readable headline for the game over screen
    pub fn headline(&self) -> &'static str {
        match self {
            GameOverReason::TimeUp => "Mission complete! Time's up!",
            GameOverReason::Infected => "Warning! Virus infection!",
        }
    }
}

/// Hostile types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostileKind {
    /// Large red virus: faster, worth more
    Heavy,
    /// Small green virus
    Light,
}

impl HostileKind {
    pub fn base_points(&self, tuning: &Tuning) -> u64 {
        match self {
            HostileKind::Heavy => tuning.heavy_points,
            HostileKind::Light => tuning.light_points,
        }
    }

    pub fn base_speed(&self, tuning: &Tuning) -> f32 {
        match self {
            HostileKind::Heavy => tuning.heavy_speed,
            HostileKind::Light => tuning.light_speed,
        }
    }

    /// Body radius used for hit testing
    pub fn radius(&self) -> f32 {
        match self {
            HostileKind::Heavy => HEAVY_RADIUS,
            HostileKind::Light => LIGHT_RADIUS,
        }
    }

    /// Explosion color for a kill
    pub fn burst_color(&self) -> ParticleColor {
        match self {
            HostileKind::Heavy => ParticleColor::Crimson,
            HostileKind::Light => ParticleColor::Emerald,
        }
    }
}

/// A hostile advancing on the player along +z
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hostile {
    pub id: EntityId,
    pub kind: HostileKind,
    pub pos: Vec3,
    /// Accumulated Euler angles (radians)
    pub orientation: Vec3,
    /// Per-frame Euler increment
    pub spin: Vec3,
    /// Phase offset for the vertical bob
    pub float_phase: f32,
    /// Forward distance per frame (kind base speed x speed multiplier)
    pub speed: f32,
    pub alive: bool,
}

/// Particle color tags (renderer maps these to materials)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    Crimson,
    Emerald,
    /// EMP discharge
    Cyan,
}

/// A debris particle from an explosion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: EntityId,
    pub pos: Vec3,
    /// Per-frame displacement
    pub vel: Vec3,
    pub orientation: Vec3,
    /// Per-frame rotation about x
    pub spin: f32,
    pub color: ParticleColor,
    /// 0-1, decreases every frame; doubles as visual scale
    pub life: f32,
}

/// Notifications queued for the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Started,
    /// Fresh HUD values (after kills, damage, skills and every clock tick)
    Hud(HudSnapshot),
    HostileDestroyed {
        id: EntityId,
        kind: HostileKind,
        points: u64,
    },
    /// A hostile slipped past the camera plane
    Breach { id: EntityId },
    Damaged { amount: u32, hp: u32 },
    LevelUp { level: u32 },
    SkillActivated(SkillKind),
    SkillReady(SkillKind),
    OverclockEnded,
    /// Terminal event, emitted once per run
    GameOver {
        reason: GameOverReason,
        final_score: u64,
        best_combo: u32,
    },
}

/// Score, health and clock for a single run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u64,
    pub combo: u32,
    /// Highest combo reached this run
    pub best_combo: u32,
    /// Clock time of the previous kill (`None` until the first kill)
    pub last_kill_time: Option<f64>,
    pub time_left: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub level: u32,
    pub is_playing: bool,
    /// Frames between spawns
    pub spawn_rate: u32,
    pub speed_multiplier: f32,
}

impl SessionState {
    /// Fresh state for a new run
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            combo: 0,
            best_combo: 0,
            last_kill_time: None,
            time_left: tuning.session_seconds,
            hp: tuning.max_hp,
            max_hp: tuning.max_hp,
            level: 1,
            is_playing: false,
            spawn_rate: tuning.base_spawn_rate,
            speed_multiplier: 1.0,
        }
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.hp as f32 / self.max_hp as f32
    }

    /// Subtract damage, clamped at zero. Breaks the combo.
    pub fn apply_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount).min(self.max_hp);
        self.combo = 0;
    }

    /// Register a kill at `now` and return the points awarded
    pub fn register_kill(&mut self, base_points: u64, now: f64, tuning: &Tuning) -> u64 {
        let in_window = self
            .last_kill_time
            .is_some_and(|last| now - last < tuning.combo_window_secs);
        self.combo = if in_window { self.combo + 1 } else { 1 };
        self.last_kill_time = Some(now);
        self.best_combo = self.best_combo.max(self.combo);

        let points = base_points * self.combo.min(tuning.combo_multiplier_cap) as u64;
        self.score += points;
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_state_matches_tuning() {
        let tuning = Tuning::default();
        let state = SessionState::new(&tuning);
        assert_eq!(state.time_left, 60);
        assert_eq!(state.hp, 100);
        assert_eq!(state.level, 1);
        assert_eq!(state.spawn_rate, 60);
        assert_eq!(state.speed_multiplier, 1.0);
        assert!(!state.is_playing);
    }

    #[test]
    fn test_combo_within_window() {
        let tuning = Tuning::default();
        let mut state = SessionState::new(&tuning);

        assert_eq!(state.register_kill(50, 10.0, &tuning), 50);
        assert_eq!(state.combo, 1);

        // 1.2s later: still in window, doubled
        assert_eq!(state.register_kill(50, 11.2, &tuning), 100);
        assert_eq!(state.combo, 2);
        assert_eq!(state.score, 150);
    }

    #[test]
    fn test_combo_resets_outside_window() {
        let tuning = Tuning::default();
        let mut state = SessionState::new(&tuning);

        state.register_kill(100, 1.0, &tuning);
        state.register_kill(100, 2.0, &tuning);
        assert_eq!(state.combo, 2);

        // Exactly 1.5s is outside the window
        assert_eq!(state.register_kill(100, 3.5, &tuning), 100);
        assert_eq!(state.combo, 1);
        assert_eq!(state.best_combo, 2);
    }

    #[test]
    fn test_first_kill_at_time_zero_starts_fresh() {
        let tuning = Tuning::default();
        let mut state = SessionState::new(&tuning);
        state.register_kill(100, 0.0, &tuning);
        assert_eq!(state.combo, 1);
    }

    #[test]
    fn test_damage_breaks_combo() {
        let tuning = Tuning::default();
        let mut state = SessionState::new(&tuning);
        state.register_kill(100, 0.0, &tuning);
        state.register_kill(100, 0.5, &tuning);
        state.apply_damage(15);
        assert_eq!(state.combo, 0);
        assert_eq!(state.hp, 85);
    }

    #[test]
    fn test_reason_tags() {
        assert_eq!(GameOverReason::TimeUp.as_str(), "time-up");
        assert_eq!(GameOverReason::Infected.as_str(), "infected");
        assert_eq!(
            serde_json::to_string(&GameOverReason::TimeUp).unwrap(),
            "\"time-up\""
        );
    }

    proptest! {
        #[test]
        fn prop_damage_keeps_hp_in_range(hp in 0u32..=100, amount in any::<u32>()) {
            let tuning = Tuning::default();
            let mut state = SessionState::new(&tuning);
            state.hp = hp;
            state.combo = 3;
            state.apply_damage(amount);
            prop_assert!(state.hp <= state.max_hp);
            prop_assert_eq!(state.hp, hp.saturating_sub(amount));
            prop_assert_eq!(state.combo, 0);
        }

        #[test]
        fn prop_multiplier_never_exceeds_cap(kills in 1usize..20, gap in 0.0f64..1.4) {
            let tuning = Tuning::default();
            let mut state = SessionState::new(&tuning);
            let mut now = 0.0;
            for _ in 0..kills {
                let points = state.register_kill(50, now, &tuning);
                prop_assert!(points <= 50 * tuning.combo_multiplier_cap as u64);
                now += gap;
            }
            prop_assert_eq!(state.combo as usize, kills);
        }
    }
}
