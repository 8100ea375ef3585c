//! Hostile spawning policy

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::registry::EntityRegistry;
use super::state::{EntityId, Hostile, HostileKind, SessionState};
use crate::consts::{MAX_FLOAT_PHASE, MAX_HOSTILE_SPIN};
use crate::lerp_range;
use crate::tuning::Tuning;

/// Frame counter gating spawns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spawner {
    counter: u32,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.counter = 0;
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Count one frame. Spawns once the counter passes `spawn_rate` and the
    /// population is below the cap; the counter keeps climbing while capped.
    pub fn on_frame<R: Rng>(
        &mut self,
        rng: &mut R,
        state: &SessionState,
        registry: &mut EntityRegistry,
        tuning: &Tuning,
    ) -> Option<EntityId> {
        self.counter += 1;
        if self.counter <= state.spawn_rate || registry.hostile_count() >= tuning.population_cap {
            return None;
        }

        self.counter = 0;
        let id = registry.next_entity_id();
        let hostile = roll_hostile(rng, id, state.speed_multiplier, tuning);
        log::debug!(
            "Spawned {:?} #{} at ({:.1}, {:.1}, {:.1})",
            hostile.kind,
            id.0,
            hostile.pos.x,
            hostile.pos.y,
            hostile.pos.z
        );
        registry.insert_hostile(hostile);
        Some(id)
    }
}

/// Pick a kind from one uniform draw
pub fn pick_kind(roll: f32, tuning: &Tuning) -> HostileKind {
    if roll > tuning.heavy_spawn_threshold {
        HostileKind::Heavy
    } else {
        HostileKind::Light
    }
}

/// Build a hostile with randomized position and cosmetic motion
pub fn roll_hostile<R: Rng>(
    rng: &mut R,
    id: EntityId,
    speed_multiplier: f32,
    tuning: &Tuning,
) -> Hostile {
    let kind = pick_kind(rng.random::<f32>(), tuning);
    let pos = Vec3::new(
        lerp_range(tuning.spawn_x, rng.random()),
        lerp_range(tuning.spawn_y, rng.random()),
        lerp_range(tuning.spawn_z, rng.random()),
    );
    let spin = Vec3::new(rng.random(), rng.random(), rng.random()) * MAX_HOSTILE_SPIN;

    Hostile {
        id,
        kind,
        pos,
        orientation: Vec3::ZERO,
        spin,
        float_phase: rng.random::<f32>() * MAX_FLOAT_PHASE,
        speed: kind.base_speed(tuning) * speed_multiplier,
        alive: true,
    }
}
