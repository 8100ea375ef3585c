//! Session state machine: Idle -> Playing -> GameOver -> (replay) Playing
//!
//! The session owns every piece of gameplay state plus the world
//! collaborator. UI commands land here; the tick handlers live in `tick.rs`.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::Clock;
use super::combat::{cast_ray, spawn_burst};
use super::registry::EntityRegistry;
use super::schedule::Schedule;
use super::skills::{SkillKind, Skills};
use super::spawner::Spawner;
use super::state::{
    EntityId, GameEvent, GameOverReason, Hostile, Particle, ParticleColor, SessionPhase,
    SessionState,
};
use crate::consts::*;
use crate::error::{GameError, GameResult};
use crate::hud::HudSnapshot;
use crate::orientation_quat;
use crate::tuning::Tuning;
use crate::world::{BeamStyle, Effect, FlashKind, Transform, Visual, World};

/// Seed used when the host doesn't pick one
pub const DEFAULT_SEED: u64 = 0x5EED_C0DE;

/// Collects collaborators and configuration for a [`Session`]
pub struct SessionBuilder<W> {
    world: Option<W>,
    tuning: Tuning,
    seed: u64,
}

impl<W: World> Default for SessionBuilder<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: World> SessionBuilder<W> {
    pub fn new() -> Self {
        Self {
            world: None,
            tuning: Tuning::default(),
            seed: DEFAULT_SEED,
        }
    }

    pub fn world(mut self, world: W) -> Self {
        self.world = Some(world);
        self
    }

    pub fn tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> GameResult<Session<W>> {
        let Some(world) = self.world else {
            log::error!("Cannot initialize session: no world/render collaborator");
            return Err(GameError::InitializationFault {
                collaborator: "world",
            });
        };
        if let Err(err) = self.tuning.validate() {
            log::error!("Cannot initialize session: {}", err);
            return Err(err);
        }

        log::info!("Session initialized with seed: {}", self.seed);
        Ok(Session {
            world,
            state: SessionState::new(&self.tuning),
            skills: Skills::new(&self.tuning),
            tuning: self.tuning,
            seed: self.seed,
            rng: Pcg32::seed_from_u64(self.seed),
            clock: Clock::new(),
            schedule: Schedule::new(),
            phase: SessionPhase::Idle,
            registry: EntityRegistry::new(),
            spawner: Spawner::new(),
            aim: Vec2::ZERO,
            events: Vec::new(),
        })
    }
}

/// One player's game, from the start prompt through any number of replays
pub struct Session<W: World> {
    pub(super) world: W,
    pub(super) tuning: Tuning,
    pub(super) seed: u64,
    pub(super) rng: Pcg32,
    pub(super) clock: Clock,
    pub(super) schedule: Schedule,
    pub(super) phase: SessionPhase,
    pub(super) state: SessionState,
    pub(super) registry: EntityRegistry,
    pub(super) spawner: Spawner,
    pub(super) skills: Skills,
    /// Last pointer position (NDC)
    pub(super) aim: Vec2,
    pub(super) events: Vec<GameEvent>,
}

impl<W: World> Session<W> {
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == SessionPhase::Playing
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn skills(&self) -> &Skills {
        &self.skills
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn aim(&self) -> Vec2 {
        self.aim
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot::capture(
            &self.state,
            [&self.skills.emp, &self.skills.overclock],
            &self.tuning,
        )
    }

    /// Take all queued events (oldest first)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Begin a new run (also the replay command). Cancels any running ticks
    /// before clearing state, so nothing from the previous run can fire.
    pub fn start(&mut self) {
        self.schedule.cancel_all();

        for id in self.registry.clear() {
            self.world.remove_entity(id);
        }
        self.state = SessionState::new(&self.tuning);
        self.state.is_playing = true;
        self.spawner.reset();
        self.skills.reset();
        self.phase = SessionPhase::Playing;
        self.schedule
            .start(self.clock.now(), self.tuning.second_tick_period);

        log::info!(
            "Session started: {}s on the clock, {} HP",
            self.state.time_left,
            self.state.hp
        );
        self.events.push(GameEvent::Started);
        self.emit_hud();
    }

    /// End the run. Only the first call per run has any effect.
    pub fn game_over(&mut self, reason: GameOverReason) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        self.phase = SessionPhase::GameOver;
        self.state.is_playing = false;
        self.schedule.cancel_all();

        log::info!(
            "Game over ({}): score {}, best combo x{}",
            reason.as_str(),
            self.state.score,
            self.state.best_combo
        );
        self.events.push(GameEvent::GameOver {
            reason,
            final_score: self.state.score,
            best_combo: self.state.best_combo,
        });
    }

    /// Track the pointer (NDC). Out-of-range positions are clamped.
    pub fn on_pointer_move(&mut self, screen: Vec2) {
        if !self.is_playing() {
            return;
        }
        let clamped = screen.clamp(Vec2::NEG_ONE, Vec2::ONE);
        if clamped != screen {
            log::warn!("Pointer outside viewport: {:?}", screen);
        }
        self.aim = clamped;
        self.world.on_aim(clamped);
    }

    /// Current hit tolerance (wider while overclocked)
    pub fn hit_tolerance(&self) -> f32 {
        if self.skills.overclocked() {
            self.tuning.overclock_hit_tolerance
        } else {
            self.tuning.hit_tolerance
        }
    }

    /// Fire through a screen point (NDC). Returns the destroyed hostile, if any.
    pub fn shoot(&mut self, screen: Vec2) -> Option<EntityId> {
        if !self.is_playing() {
            log::debug!("Ignoring shot while {:?}", self.phase);
            return None;
        }

        let ray = self.world.screen_ray(screen);
        let hit = cast_ray(
            self.registry.hostiles(),
            &ray,
            self.hit_tolerance(),
            CAMERA_FAR,
        );
        let target = match hit {
            Some(hit) => {
                self.destroy_enemy(hit.id);
                hit.point
            }
            None => ray.at(self.tuning.miss_range),
        };

        let style = if self.skills.overclocked() {
            BeamStyle::Overclock
        } else {
            BeamStyle::Normal
        };
        self.fire_beam(target, style);
        hit.map(|h| h.id)
    }

    /// Score a kill, burst it into debris and remove it.
    /// Returns the points awarded, `None` if the hostile is not live.
    pub fn destroy_enemy(&mut self, id: EntityId) -> Option<u64> {
        if !self.is_playing() {
            return None;
        }
        let hostile = self.registry.remove_hostile(id)?;
        let kind = hostile.kind;
        let points = self.state.register_kill(
            kind.base_points(&self.tuning),
            self.clock.now(),
            &self.tuning,
        );

        self.world.remove_entity(id);
        self.explode(hostile.pos, kind.burst_color(), self.tuning.kill_burst);
        log::debug!(
            "Destroyed {:?} #{} for {} (combo x{})",
            kind,
            id.0,
            points,
            self.state.combo
        );

        self.events
            .push(GameEvent::HostileDestroyed { id, kind, points });
        self.emit_hud();
        Some(points)
    }

    /// Apply damage to the player. Ends the run when HP hits zero.
    pub fn take_damage(&mut self, amount: u32) {
        if !self.is_playing() {
            return;
        }
        self.state.apply_damage(amount);
        self.world.present(Effect::ScreenFlash {
            kind: FlashKind::Damage,
            duration: DAMAGE_FLASH_SECS,
        });
        self.events.push(GameEvent::Damaged {
            amount,
            hp: self.state.hp,
        });
        self.emit_hud();

        if self.state.hp == 0 {
            self.game_over(GameOverReason::Infected);
        }
    }

    /// Activate a skill by name (`"emp"`, `"overclock"`, or its key).
    /// Unknown names and skills on cooldown are ignored.
    pub fn use_skill(&mut self, name: &str) -> bool {
        match SkillKind::parse(name) {
            Some(kind) => self.activate_skill(kind),
            None => {
                log::debug!("Ignoring unknown skill: {:?}", name);
                false
            }
        }
    }

    pub fn activate_skill(&mut self, kind: SkillKind) -> bool {
        if !self.is_playing() {
            log::debug!("Ignoring {} while {:?}", kind.as_str(), self.phase);
            return false;
        }
        if !self.skills.get_mut(kind).try_activate() {
            return false;
        }

        match kind {
            SkillKind::Emp => {
                let purged = self.registry.drain_hostiles();
                for hostile in &purged {
                    self.world.remove_entity(hostile.id);
                    self.explode(hostile.pos, ParticleColor::Cyan, self.tuning.emp_burst);
                }
                self.world.present(Effect::ScreenFlash {
                    kind: FlashKind::Emp,
                    duration: EMP_FLASH_SECS,
                });
                log::info!("EMP purged {} hostiles", purged.len());
            }
            SkillKind::Overclock => {
                let target = self.world.camera_to_world(OVERCLOCK_BEAM_TARGET);
                self.fire_beam(target, BeamStyle::Overclock);
                log::info!("Overclock engaged for {}s", self.skills.overclock.remaining_active);
            }
        }

        self.events.push(GameEvent::SkillActivated(kind));
        self.emit_hud();
        true
    }

    pub(super) fn emit_hud(&mut self) {
        let hud = self.hud();
        self.events.push(GameEvent::Hud(hud));
    }

    fn fire_beam(&mut self, target: Vec3, style: BeamStyle) {
        let from = self.world.camera_to_world(LASER_MUZZLE_OFFSET);
        self.world.present(Effect::LaserBeam {
            from,
            to: target,
            style,
            lifetime: LASER_LIFETIME,
        });
    }

    fn explode(&mut self, at: Vec3, color: ParticleColor, count: usize) {
        let ids = spawn_burst(&mut self.rng, &mut self.registry, at, color, count);
        let fresh = &self.registry.particles()[self.registry.particles().len() - ids.len()..];
        for particle in fresh {
            place_particle(&mut self.world, particle);
        }
    }

    /// Drop a hostile into the registry directly (scripted scenarios)
    #[cfg(test)]
    pub(super) fn insert_hostile_at(
        &mut self,
        kind: super::state::HostileKind,
        pos: Vec3,
    ) -> EntityId {
        let id = self.registry.next_entity_id();
        let hostile = Hostile {
            id,
            kind,
            pos,
            orientation: Vec3::ZERO,
            spin: Vec3::ZERO,
            float_phase: 0.0,
            speed: kind.base_speed(&self.tuning) * self.state.speed_multiplier,
            alive: true,
        };
        place_hostile(&mut self.world, &hostile);
        self.registry.insert_hostile(hostile);
        id
    }
}

pub(super) fn place_hostile<W: World>(world: &mut W, hostile: &Hostile) {
    world.place_entity(
        hostile.id,
        Visual::Hostile(hostile.kind),
        Transform {
            translation: hostile.pos,
            rotation: orientation_quat(hostile.orientation),
            scale: 1.0,
        },
    );
}

pub(super) fn place_particle<W: World>(world: &mut W, particle: &Particle) {
    world.place_entity(
        particle.id,
        Visual::Particle(particle.color),
        Transform {
            translation: particle.pos,
            rotation: orientation_quat(particle.orientation),
            scale: particle.life.max(0.0),
        },
    );
}
