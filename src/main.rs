//! Virus Purge entry point
//!
//! Runs one headless session with a simple autopilot and prints the result.
//! Usage: `virus-purge [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Virus Purge (headless) starting...");

    if let Err(err) = native::run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives the library directly
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;

    use virus_purge::sim::{DEFAULT_SEED, GameEvent, HostileKind, SkillKind};
    use virus_purge::{HeadlessWorld, Session, SessionBuilder, Tuning};

    const FRAME_DT: f64 = 1.0 / 60.0;
    /// Frames between autopilot shots
    const FIRE_INTERVAL: u64 = 12;
    /// Give up if a run somehow never ends
    const MAX_FRAMES: u64 = 60 * 120;

    pub fn run() -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args().skip(1);
        let seed = match args.next() {
            Some(arg) => arg.parse::<u64>()?,
            None => DEFAULT_SEED,
        };
        let tuning = match args.next() {
            Some(path) => Tuning::from_json(&std::fs::read_to_string(&path)?)?,
            None => Tuning::default(),
        };

        let mut session = SessionBuilder::new()
            .world(HeadlessWorld::new())
            .tuning(tuning)
            .seed(seed)
            .build()?;
        session.start();

        let mut kills = 0u32;
        let mut breaches = 0u32;
        for frame in 0..MAX_FRAMES {
            session.advance(FRAME_DT);
            autopilot(&mut session, frame);
            session.world_mut().take_effects();

            for event in session.drain_events() {
                match event {
                    GameEvent::HostileDestroyed { .. } => kills += 1,
                    GameEvent::Breach { .. } => breaches += 1,
                    GameEvent::LevelUp { level } => println!("Level {}", level),
                    GameEvent::GameOver {
                        reason,
                        final_score,
                        best_combo,
                    } => {
                        println!("{}", reason.headline());
                        println!("Final score: {}", final_score);
                        println!("Best combo: x{}", best_combo);
                        println!("Kills: {}, breaches: {}", kills, breaches);
                        return Ok(());
                    }
                    _ => {}
                }
            }
        }

        log::warn!("Run did not finish within {} frames", MAX_FRAMES);
        Ok(())
    }

    /// Track the closest hostile, fire on a fixed cadence, burn skills on crowds
    fn autopilot(session: &mut Session<HeadlessWorld>, frame: u64) {
        if !session.is_playing() {
            return;
        }

        let count = session.registry().hostile_count();
        if count >= 8 && session.skills().emp.ready {
            session.activate_skill(SkillKind::Emp);
            return;
        }
        if count >= 4 && session.skills().overclock.ready {
            session.activate_skill(SkillKind::Overclock);
        }

        // Closest to the breach plane first; heavies break ties
        let target = session
            .registry()
            .hostiles()
            .iter()
            .filter(|h| h.alive)
            .max_by(|a, b| {
                let heavy = |kind: HostileKind| kind == HostileKind::Heavy;
                a.pos
                    .z
                    .total_cmp(&b.pos.z)
                    .then_with(|| heavy(a.kind).cmp(&heavy(b.kind)))
            })
            .map(|h| h.pos);
        let Some(target) = target else {
            return;
        };
        let Some(screen) = session.world().camera.project(target) else {
            return;
        };

        session.on_pointer_move(screen);
        if frame % FIRE_INTERVAL == 0 {
            // Aim swayed the camera; re-project before pulling the trigger
            if let Some(screen) = session.world().camera.project(target) {
                session.shoot(screen);
            }
        }
    }
}
