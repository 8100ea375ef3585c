//! Clock tick and frame tick
//!
//! The host calls [`Session::advance`] once per displayed frame. Due clock
//! ticks run first (catching up after a stall), then one frame tick.

use super::combat::cast_ray;
use super::difficulty;
use super::kinematics::{advance_hostiles, advance_particles};
use super::schedule::TaskKind;
use super::session::{Session, place_hostile, place_particle};
use super::skills::SkillKind;
use super::state::{GameEvent, GameOverReason};
use crate::consts::*;
use crate::world::{Effect, World};

impl<W: World> Session<W> {
    /// Advance the clock by `dt` seconds and run whatever ticks are due
    pub fn advance(&mut self, dt: f64) {
        self.clock.advance(dt);
        self.schedule.begin_frame();

        while let Some((task, generation)) = self.schedule.pop_due(self.clock.now()) {
            if !self.schedule.is_current(generation) {
                continue;
            }
            match task {
                TaskKind::SecondTick => self.second_tick(),
                TaskKind::FrameTick => self.frame_tick(),
            }
        }
    }

    /// One-second tick: timer, cooldowns, overclock, difficulty, HUD
    pub fn second_tick(&mut self) {
        if !self.is_playing() {
            return;
        }

        self.state.time_left = self.state.time_left.saturating_sub(1);
        if self.state.time_left == 0 {
            self.game_over(GameOverReason::TimeUp);
            return;
        }

        for kind in SkillKind::ALL {
            if self.skills.get_mut(kind).tick_cooldown() {
                log::info!("{} ready", kind.as_str());
                self.events.push(GameEvent::SkillReady(kind));
            }
        }

        if self.skills.overclock.tick_active() {
            log::info!("Overclock disengaged");
            self.events.push(GameEvent::OverclockEnded);
        }

        if let Some(level) = difficulty::recompute(&mut self.state, &self.tuning) {
            self.events.push(GameEvent::LevelUp { level });
        }

        self.emit_hud();
    }

    /// Render-cadence tick: spawn, move, breach, particles, reticle
    pub fn frame_tick(&mut self) {
        if !self.is_playing() {
            return;
        }
        let elapsed = self.clock.now() as f32;

        self.spawner
            .on_frame(&mut self.rng, &self.state, &mut self.registry, &self.tuning);

        let breached = advance_hostiles(&mut self.registry, elapsed, &self.tuning);
        for hostile in self.registry.hostiles().iter().filter(|h| h.alive) {
            place_hostile(&mut self.world, hostile);
        }
        for hostile in self.registry.take_dead_hostiles() {
            self.world.remove_entity(hostile.id);
        }
        for id in breached {
            log::debug!("Hostile #{} breached", id.0);
            self.events.push(GameEvent::Breach { id });
            self.take_damage(self.tuning.breach_damage);
        }
        if !self.is_playing() {
            return;
        }

        advance_particles(&mut self.registry);
        for particle in self.registry.particles() {
            if particle.life > 0.0 {
                place_particle(&mut self.world, particle);
            }
        }
        for id in self.registry.take_expired_particles() {
            self.world.remove_entity(id);
        }

        self.update_reticle(elapsed);
    }

    /// Red and tight over a hostile, breathing cyan otherwise
    fn update_reticle(&mut self, elapsed: f32) {
        let ray = self.world.screen_ray(self.aim);
        let hit = cast_ray(
            self.registry.hostiles(),
            &ray,
            self.hit_tolerance(),
            CAMERA_FAR,
        );
        let effect = match hit {
            Some(hit) => Effect::Reticle {
                position: hit.point,
                locked: true,
                scale: RETICLE_LOCKED_SCALE,
            },
            None => Effect::Reticle {
                position: ray.at(RETICLE_IDLE_RANGE),
                locked: false,
                scale: 1.0 + (elapsed * RETICLE_PULSE_FREQUENCY).sin() * RETICLE_PULSE_AMPLITUDE,
            },
        };
        self.world.present(effect);
    }
}
