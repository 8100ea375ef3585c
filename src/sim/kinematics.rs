//! Per-frame motion for hostiles and particles
//!
//! Displacements are per frame, not scaled by dt: faster displays run the
//! action faster, matching the arcade feel the balance numbers assume.

use super::registry::EntityRegistry;
use super::state::EntityId;
use crate::consts::{BOB_AMPLITUDE, BOB_FREQUENCY, PARTICLE_DECAY};
use crate::tuning::Tuning;

/// Move every live hostile one frame downrange. Hostiles that cross the
/// breach plane are flagged dead and returned in id order.
pub fn advance_hostiles(
    registry: &mut EntityRegistry,
    elapsed: f32,
    tuning: &Tuning,
) -> Vec<EntityId> {
    let mut breached = Vec::new();
    for hostile in registry.hostiles_mut().iter_mut().filter(|h| h.alive) {
        hostile.pos.z += hostile.speed;
        hostile.orientation += hostile.spin;
        hostile.pos.y += (elapsed * BOB_FREQUENCY + hostile.float_phase).sin() * BOB_AMPLITUDE;

        if hostile.pos.z > tuning.breach_z {
            hostile.alive = false;
            breached.push(hostile.id);
        }
    }
    breached
}

/// Drift, spin and fade every particle one frame
pub fn advance_particles(registry: &mut EntityRegistry) {
    for particle in registry.particles_mut() {
        particle.pos += particle.vel;
        particle.orientation.x += particle.spin;
        particle.life -= PARTICLE_DECAY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Hostile, HostileKind, Particle, ParticleColor};
    use glam::Vec3;

    fn push_hostile(registry: &mut EntityRegistry, z: f32, speed: f32) -> EntityId {
        let id = registry.next_entity_id();
        registry.insert_hostile(Hostile {
            id,
            kind: HostileKind::Heavy,
            pos: Vec3::new(0.0, 5.0, z),
            orientation: Vec3::ZERO,
            spin: Vec3::splat(0.01),
            float_phase: 0.0,
            speed,
            alive: true,
        });
        id
    }

    #[test]
    fn test_hostile_moves_forward_and_bobs() {
        let tuning = Tuning::default();
        let mut registry = EntityRegistry::new();
        push_hostile(&mut registry, -50.0, 0.35);

        let elapsed = 0.4;
        assert!(advance_hostiles(&mut registry, elapsed, &tuning).is_empty());
        let h = &registry.hostiles()[0];
        assert!((h.pos.z - (-49.65)).abs() < 1e-4);
        let bob = (elapsed * 2.0).sin() * 0.02;
        assert!((h.pos.y - (5.0 + bob)).abs() < 1e-6);
        assert_eq!(h.orientation, Vec3::splat(0.01));
    }

    #[test]
    fn test_breach_flags_once() {
        let tuning = Tuning::default();
        let mut registry = EntityRegistry::new();
        let near = push_hostile(&mut registry, 4.9, 0.35);
        push_hostile(&mut registry, -40.0, 0.35);

        assert_eq!(advance_hostiles(&mut registry, 0.0, &tuning), vec![near]);
        // Dead hostiles don't move or breach again
        assert!(advance_hostiles(&mut registry, 0.0, &tuning).is_empty());
        assert_eq!(registry.take_dead_hostiles().len(), 1);
        assert_eq!(registry.hostile_count(), 1);
    }

    #[test]
    fn test_exactly_on_plane_is_not_breach() {
        let tuning = Tuning::default();
        let mut registry = EntityRegistry::new();
        push_hostile(&mut registry, 5.0, 0.0);
        assert!(advance_hostiles(&mut registry, 0.0, &tuning).is_empty());
    }

    #[test]
    fn test_particle_fades_out_in_34_frames() {
        let mut registry = EntityRegistry::new();
        let id = registry.next_entity_id();
        registry.insert_particle(Particle {
            id,
            pos: Vec3::ZERO,
            vel: Vec3::new(0.1, 0.0, 0.0),
            orientation: Vec3::ZERO,
            spin: 0.05,
            color: ParticleColor::Emerald,
            life: 1.0,
        });

        for _ in 0..33 {
            advance_particles(&mut registry);
            assert!(registry.take_expired_particles().is_empty());
        }
        advance_particles(&mut registry);
        assert_eq!(registry.take_expired_particles(), vec![id]);
    }
}
