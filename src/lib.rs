//! Virus Purge - A timed arcade survival shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, kinematics, combat, skills, session)
//! - `world`: Render/world collaborator seam plus a headless reference world
//! - `hud`: Read model handed to the UI layer
//! - `tuning`: Data-driven game balance
//! - `error`: Construction and configuration faults

pub mod error;
pub mod hud;
pub mod sim;
pub mod tuning;
pub mod world;

pub use error::{GameError, GameResult};
pub use hud::{HudSnapshot, SkillHud};
pub use sim::{GameEvent, GameOverReason, Session, SessionBuilder, SessionPhase, SkillKind};
pub use tuning::Tuning;
pub use world::{Effect, HeadlessWorld, Ray, World};

use glam::{EulerRot, Quat, Vec3};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    use glam::Vec3;

    /// Period of the session clock tick (seconds)
    pub const SECOND_TICK_PERIOD: f64 = 1.0;
    /// Session length in whole seconds
    pub const SESSION_SECONDS: u32 = 60;

    /// Player health
    pub const MAX_HP: u32 = 100;
    /// HP bar turns red below this fraction
    pub const LOW_HP_FRACTION: f32 = 0.3;
    /// Damage dealt when a hostile breaches the camera plane
    pub const BREACH_DAMAGE: u32 = 15;
    /// Forward coordinate past which a hostile counts as a breach
    pub const BREACH_Z: f32 = 5.0;

    /// Scoring
    pub const COMBO_WINDOW_SECS: f64 = 1.5;
    pub const COMBO_MULTIPLIER_CAP: u32 = 5;
    pub const HEAVY_POINTS: u64 = 100;
    pub const LIGHT_POINTS: u64 = 50;

    /// Difficulty ramp
    pub const LEVEL_SECONDS: u32 = 15;
    pub const BASE_SPAWN_RATE: u32 = 60;
    pub const MIN_SPAWN_RATE: u32 = 20;
    pub const SPAWN_RATE_STEP: u32 = 8;
    pub const SPEED_STEP_PER_LEVEL: f32 = 0.2;

    /// Spawning
    pub const POPULATION_CAP: usize = 35;
    /// Uniform draw above this picks a Heavy (35% Heavy, 65% Light)
    pub const HEAVY_SPAWN_THRESHOLD: f32 = 0.65;
    pub const SPAWN_X: (f32, f32) = (-15.0, 15.0);
    pub const SPAWN_Y: (f32, f32) = (1.0, 11.0);
    pub const SPAWN_Z: (f32, f32) = (-65.0, -45.0);
    pub const HEAVY_SPEED: f32 = 0.35;
    pub const LIGHT_SPEED: f32 = 0.25;
    pub const HEAVY_RADIUS: f32 = 1.5;
    pub const LIGHT_RADIUS: f32 = 1.2;
    pub const MAX_HOSTILE_SPIN: f32 = 0.02;
    pub const MAX_FLOAT_PHASE: f32 = 10.0;
    pub const BOB_FREQUENCY: f32 = 2.0;
    pub const BOB_AMPLITUDE: f32 = 0.02;

    /// Particles (per-frame units, not time-scaled)
    pub const PARTICLE_DECAY: f32 = 0.03;
    pub const KILL_BURST: usize = 8;
    pub const EMP_BURST: usize = 10;
    pub const PARTICLE_SPEED: (f32, f32) = (0.3, 0.6);
    pub const MAX_PARTICLE_SPIN: f32 = 0.1;

    /// Hit testing
    pub const HIT_TOLERANCE: f32 = 0.8;
    pub const OVERCLOCK_HIT_TOLERANCE: f32 = 2.0;
    pub const MISS_RANGE: f32 = 50.0;
    pub const CAMERA_FAR: f32 = 100.0;
    pub const RETICLE_IDLE_RANGE: f32 = 25.0;
    pub const RETICLE_LOCKED_SCALE: f32 = 0.7;
    pub const RETICLE_PULSE_FREQUENCY: f32 = 5.0;
    pub const RETICLE_PULSE_AMPLITUDE: f32 = 0.1;

    /// Skills (seconds)
    pub const EMP_COOLDOWN: u32 = 15;
    pub const OVERCLOCK_COOLDOWN: u32 = 20;
    pub const OVERCLOCK_DURATION: u32 = 5;

    /// Camera-local anchors for beams
    pub const LASER_MUZZLE_OFFSET: Vec3 = Vec3::new(0.3, -0.6, -1.0);
    pub const OVERCLOCK_BEAM_TARGET: Vec3 = Vec3::new(0.0, 0.0, -15.0);

    /// Transient visual lifetimes (seconds)
    pub const LASER_LIFETIME: f32 = 0.06;
    pub const DAMAGE_FLASH_SECS: f32 = 0.2;
    pub const EMP_FLASH_SECS: f32 = 0.3;
}

/// Convert accumulated XYZ Euler angles (radians) into a rotation
#[inline]
pub fn orientation_quat(euler: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z)
}

/// Map a uniform draw in [0, 1) onto the range `(lo, hi)`
#[inline]
pub fn lerp_range(range: (f32, f32), t: f32) -> f32 {
    range.0 + (range.1 - range.0) * t
}
