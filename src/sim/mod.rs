//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - Time comes from the session clock, never the wall clock
//! - No rendering or platform dependencies (those sit behind [`crate::world::World`])

pub mod clock;
pub mod combat;
pub mod difficulty;
pub mod kinematics;
pub mod registry;
pub mod schedule;
pub mod session;
pub mod skills;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::Clock;
pub use combat::{RayHit, cast_ray};
pub use registry::EntityRegistry;
pub use schedule::{Schedule, TaskKind};
pub use session::{DEFAULT_SEED, Session, SessionBuilder};
pub use skills::{Skill, SkillKind, Skills};
pub use state::{
    EntityId, GameEvent, GameOverReason, Hostile, HostileKind, Particle, ParticleColor,
    SessionPhase, SessionState,
};
