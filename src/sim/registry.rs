//! Arena of live hostiles and particles, keyed by [`EntityId`]
//!
//! Both collections stay sorted by id so iteration order is deterministic.

use serde::{Deserialize, Serialize};

use super::state::{EntityId, Hostile, Particle};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRegistry {
    hostiles: Vec<Hostile>,
    particles: Vec<Particle>,
    /// Never reset, so ids are unique across replays
    next_id: u32,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self {
            hostiles: Vec::new(),
            particles: Vec::new(),
            next_id: 1,
        }
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn hostiles(&self) -> &[Hostile] {
        &self.hostiles
    }

    pub fn hostiles_mut(&mut self) -> &mut [Hostile] {
        &mut self.hostiles
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Number of live hostiles
    pub fn hostile_count(&self) -> usize {
        self.hostiles.len()
    }

    pub fn hostile(&self, id: EntityId) -> Option<&Hostile> {
        self.hostiles
            .binary_search_by_key(&id, |h| h.id)
            .ok()
            .map(|i| &self.hostiles[i])
    }

    /// Ids are allocated in increasing order, so pushing keeps the sort
    pub fn insert_hostile(&mut self, hostile: Hostile) {
        debug_assert!(self.hostiles.last().is_none_or(|h| h.id < hostile.id));
        self.hostiles.push(hostile);
    }

    pub fn insert_particle(&mut self, particle: Particle) {
        debug_assert!(self.particles.last().is_none_or(|p| p.id < particle.id));
        self.particles.push(particle);
    }

    /// Take a hostile out of the registry. `None` if it is already gone.
    pub fn remove_hostile(&mut self, id: EntityId) -> Option<Hostile> {
        self.hostiles
            .binary_search_by_key(&id, |h| h.id)
            .ok()
            .map(|i| self.hostiles.remove(i))
    }

    /// Remove every hostile flagged dead, returning them in id order
    pub fn take_dead_hostiles(&mut self) -> Vec<Hostile> {
        let (dead, alive): (Vec<_>, Vec<_>) = self.hostiles.drain(..).partition(|h| !h.alive);
        self.hostiles = alive;
        dead
    }

    /// Remove every expired particle, returning their ids
    pub fn take_expired_particles(&mut self) -> Vec<EntityId> {
        let mut expired = Vec::new();
        self.particles.retain(|p| {
            if p.life <= 0.0 {
                expired.push(p.id);
                false
            } else {
                true
            }
        });
        expired
    }

    /// Empty the hostile list, returning what was live
    pub fn drain_hostiles(&mut self) -> Vec<Hostile> {
        std::mem::take(&mut self.hostiles)
    }

    /// Empty both collections, returning every id that was live
    pub fn clear(&mut self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.hostiles.iter().map(|h| h.id).collect();
        ids.extend(self.particles.iter().map(|p| p.id));
        self.hostiles.clear();
        self.particles.clear();
        ids
    }
}
