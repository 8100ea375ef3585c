//! Render/world collaborator
//!
//! The simulation never touches a scene graph. It pushes entity transforms and
//! transient effects through [`World`], and asks it for camera rays. The
//! registry stays the source of truth; the world only mirrors it.
//!
//! [`HeadlessWorld`] is a complete implementation with a perspective camera
//! and no output, used by the native demo and the tests.

use std::collections::BTreeMap;

use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::consts::CAMERA_FAR;
use crate::sim::state::{EntityId, HostileKind, ParticleColor};

/// A half-line from the camera into the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or(Vec3::NEG_Z),
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// What a placed entity should look like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visual {
    Hostile(HostileKind),
    Particle(ParticleColor),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

/// Laser material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamStyle {
    Normal,
    Overclock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashKind {
    Damage,
    Emp,
}

/// Short-lived visuals the core asks the world to show
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    LaserBeam {
        from: Vec3,
        to: Vec3,
        style: BeamStyle,
        /// Seconds before the beam is removed
        lifetime: f32,
    },
    ScreenFlash {
        kind: FlashKind,
        duration: f32,
    },
    /// Aim feedback, refreshed every frame
    Reticle {
        position: Vec3,
        /// Aim ray currently over a hostile
        locked: bool,
        scale: f32,
    },
}

/// Operations the simulation needs from a renderer
pub trait World {
    /// Create or move the visual for `id`
    fn place_entity(&mut self, id: EntityId, visual: Visual, transform: Transform);

    /// Remove the visual for `id` (unknown ids are ignored)
    fn remove_entity(&mut self, id: EntityId);

    /// Camera ray through a point in normalized device coordinates
    fn screen_ray(&self, screen: Vec2) -> Ray;

    /// Transform a camera-local point into world space
    fn camera_to_world(&self, local: Vec3) -> Vec3;

    fn present(&mut self, effect: Effect);

    /// Pointer moved; worlds may sway the camera
    fn on_aim(&mut self, _screen: Vec2) {}
}

/// Pinhole camera matching a 75 degree perspective view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 5.0),
            target: Vec3::new(0.0, 0.0, -10.0),
            fov_y: 75f32.to_radians(),
            aspect: 4.0 / 3.0,
            near: 0.1,
            far: CAMERA_FAR,
        }
    }
}

impl PerspectiveCamera {
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Ray from the camera through an NDC point
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let inv = (self.projection() * self.view()).inverse();
        let on_far = inv.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(self.position, on_far - self.position)
    }

    /// World point to NDC, `None` when behind the camera
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.projection() * self.view() * Vec4::from((point, 1.0));
        if clip.w <= 0.0 {
            return None;
        }
        Some(Vec2::new(clip.x / clip.w, clip.y / clip.w))
    }

    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.view().inverse().transform_point3(local)
    }

    /// Pointer sway: the camera drifts with the aim and keeps looking downrange
    pub fn sway(&mut self, ndc: Vec2) {
        self.position = Vec3::new(ndc.x * 1.5, 2.0 + ndc.y * 0.8, 5.0);
        self.target = Vec3::new(0.0, 0.0, -10.0);
    }
}

/// Pixel coordinates (origin top-left) to NDC
pub fn pixels_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    if width <= 0.0 || height <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new((x / width) * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedEntity {
    pub visual: Visual,
    pub transform: Transform,
}

/// World with a real camera that records instead of drawing
#[derive(Debug, Clone, Default)]
pub struct HeadlessWorld {
    pub camera: PerspectiveCamera,
    entities: BTreeMap<EntityId, PlacedEntity>,
    effects: Vec<Effect>,
    reticle: Option<Effect>,
}

impl HeadlessWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity(&self, id: EntityId) -> Option<&PlacedEntity> {
        self.entities.get(&id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Placed hostiles (id, position) in id order
    pub fn hostiles(&self) -> impl Iterator<Item = (EntityId, Vec3)> + '_ {
        self.entities.iter().filter_map(|(id, e)| match e.visual {
            Visual::Hostile(_) => Some((*id, e.transform.translation)),
            Visual::Particle(_) => None,
        })
    }

    /// Effects presented since the last call (reticle excluded)
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Most recent reticle update
    pub fn reticle(&self) -> Option<Effect> {
        self.reticle
    }
}

impl World for HeadlessWorld {
    fn place_entity(&mut self, id: EntityId, visual: Visual, transform: Transform) {
        self.entities.insert(id, PlacedEntity { visual, transform });
    }

    fn remove_entity(&mut self, id: EntityId) {
        self.entities.remove(&id);
    }

    fn screen_ray(&self, screen: Vec2) -> Ray {
        self.camera.ray_through(screen)
    }

    fn camera_to_world(&self, local: Vec3) -> Vec3 {
        self.camera.local_to_world(local)
    }

    fn present(&mut self, effect: Effect) {
        match effect {
            Effect::Reticle { .. } => self.reticle = Some(effect),
            _ => self.effects.push(effect),
        }
    }

    fn on_aim(&mut self, screen: Vec2) {
        self.camera.sway(screen);
    }
}
