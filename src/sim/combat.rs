//! Hit resolution and explosion debris
//!
//! Hostiles are treated as spheres (body radius inflated by the current hit
//! tolerance) for ray tests.

use std::f32::consts::PI;

use glam::Vec3;
use rand::Rng;

use super::registry::EntityRegistry;
use super::state::{EntityId, Hostile, Particle, ParticleColor};
use crate::consts::{MAX_PARTICLE_SPIN, PARTICLE_SPEED};
use crate::lerp_range;
use crate::world::Ray;

/// Nearest hostile along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub id: EntityId,
    pub point: Vec3,
    /// Distance from the ray origin to `point`
    pub distance: f32,
}

/// Distance along `ray` at which it enters a sphere, if it does
pub fn ray_sphere_entry(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let to_center = center - ray.origin;
    let r2 = radius * radius;
    // Origin inside the sphere: hit immediately
    if to_center.length_squared() <= r2 {
        return Some(0.0);
    }
    let t_closest = to_center.dot(ray.dir);
    if t_closest < 0.0 {
        return None;
    }
    let d2 = to_center.length_squared() - t_closest * t_closest;
    if d2 > r2 {
        return None;
    }
    Some((t_closest - (r2 - d2).sqrt()).max(0.0))
}

/// Find the nearest live hostile hit by `ray` within `max_range`.
/// Ties go to the lower id.
pub fn cast_ray(
    hostiles: &[Hostile],
    ray: &Ray,
    tolerance: f32,
    max_range: f32,
) -> Option<RayHit> {
    let mut best: Option<RayHit> = None;
    for hostile in hostiles.iter().filter(|h| h.alive) {
        let Some(t) = ray_sphere_entry(ray, hostile.pos, hostile.kind.radius() + tolerance) else {
            continue;
        };
        if t > max_range {
            continue;
        }
        if best.is_none_or(|b| t < b.distance) {
            best = Some(RayHit {
                id: hostile.id,
                point: ray.at(t),
                distance: t,
            });
        }
    }
    best
}

/// Uniformly-ish random direction (unit length)
fn random_direction<R: Rng>(rng: &mut R) -> Vec3 {
    let v = Vec3::new(
        rng.random::<f32>() - 0.5,
        rng.random::<f32>() - 0.5,
        rng.random::<f32>() - 0.5,
    );
    v.normalize_or(Vec3::Y)
}

/// Spawn `count` debris particles at `at`, returning their ids
pub fn spawn_burst<R: Rng>(
    rng: &mut R,
    registry: &mut EntityRegistry,
    at: Vec3,
    color: ParticleColor,
    count: usize,
) -> Vec<EntityId> {
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let id = registry.next_entity_id();
        let speed = lerp_range(PARTICLE_SPEED, rng.random());
        let vel = random_direction(rng) * speed;
        let orientation = Vec3::new(rng.random::<f32>() * PI, rng.random::<f32>() * PI, 0.0);
        let spin = (rng.random::<f32>() - 0.5) * 2.0 * MAX_PARTICLE_SPIN;

        registry.insert_particle(Particle {
            id,
            pos: at,
            vel,
            orientation,
            spin,
            color,
            life: 1.0,
        });
        ids.push(id);
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::HostileKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn hostile_at(id: u32, kind: HostileKind, pos: Vec3) -> Hostile {
        Hostile {
            id: EntityId(id),
            kind,
            pos,
            orientation: Vec3::ZERO,
            spin: Vec3::ZERO,
            float_phase: 0.0,
            speed: 0.0,
            alive: true,
        }
    }

    fn forward_ray() -> Ray {
        Ray::new(Vec3::ZERO, Vec3::NEG_Z)
    }

    #[test]
    fn test_direct_hit_reports_entry_point() {
        let hostiles = [hostile_at(1, HostileKind::Heavy, Vec3::new(0.0, 0.0, -20.0))];
        let hit = cast_ray(&hostiles, &forward_ray(), 0.8, 100.0).unwrap();
        assert_eq!(hit.id, EntityId(1));
        // Heavy radius 1.5 + tolerance 0.8
        assert!((hit.distance - 17.7).abs() < 1e-4);
        assert!((hit.point.z + 17.7).abs() < 1e-4);
    }

    #[test]
    fn test_nearest_wins() {
        let hostiles = [
            hostile_at(1, HostileKind::Light, Vec3::new(0.0, 0.0, -40.0)),
            hostile_at(2, HostileKind::Light, Vec3::new(0.0, 0.0, -10.0)),
        ];
        let hit = cast_ray(&hostiles, &forward_ray(), 0.8, 100.0).unwrap();
        assert_eq!(hit.id, EntityId(2));
    }

    #[test]
    fn test_tolerance_widens_hits() {
        // Light radius 1.2: offset 2.5 misses at 0.8 tolerance, hits at 2.0
        let hostiles = [hostile_at(1, HostileKind::Light, Vec3::new(2.5, 0.0, -20.0))];
        assert!(cast_ray(&hostiles, &forward_ray(), 0.8, 100.0).is_none());
        assert!(cast_ray(&hostiles, &forward_ray(), 2.0, 100.0).is_some());
    }

    #[test]
    fn test_behind_and_out_of_range_ignored() {
        let hostiles = [
            hostile_at(1, HostileKind::Heavy, Vec3::new(0.0, 0.0, 10.0)),
            hostile_at(2, HostileKind::Heavy, Vec3::new(0.0, 0.0, -150.0)),
        ];
        assert!(cast_ray(&hostiles, &forward_ray(), 0.8, 100.0).is_none());
    }

    #[test]
    fn test_origin_inside_inflated_body_hits_at_zero() {
        // Just behind the origin and off-axis, but within 1.5 + 0.8
        let hostiles = [hostile_at(1, HostileKind::Heavy, Vec3::new(0.0, 1.0, 0.5))];
        let hit = cast_ray(&hostiles, &forward_ray(), 0.8, 100.0).unwrap();
        assert_eq!(hit.id, EntityId(1));
        assert_eq!(hit.distance, 0.0);
        assert_eq!(hit.point, Vec3::ZERO);
    }

    #[test]
    fn test_dead_hostiles_ignored() {
        let mut h = hostile_at(1, HostileKind::Heavy, Vec3::new(0.0, 0.0, -20.0));
        h.alive = false;
        assert!(cast_ray(&[h], &forward_ray(), 0.8, 100.0).is_none());
    }

    #[test]
    fn test_burst_particles() {
        let mut registry = EntityRegistry::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let at = Vec3::new(1.0, 2.0, -30.0);
        let ids = spawn_burst(&mut rng, &mut registry, at, ParticleColor::Crimson, 8);
        assert_eq!(ids.len(), 8);
        for p in registry.particles() {
            assert_eq!(p.pos, at);
            assert_eq!(p.life, 1.0);
            let speed = p.vel.length();
            assert!((0.3 - 1e-4..0.6 + 1e-4).contains(&speed));
            assert!(p.spin.abs() <= 0.1);
        }
    }
}
