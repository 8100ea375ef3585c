//! Difficulty ramp derived from elapsed session time

use super::state::SessionState;
use crate::tuning::Tuning;

/// Level for the given remaining time (1 at the start, +1 every `level_seconds`)
pub fn level_for(time_left: u32, tuning: &Tuning) -> u32 {
    let elapsed = tuning.session_seconds.saturating_sub(time_left);
    elapsed / tuning.level_seconds + 1
}

/// Frames between spawns at `level` (lower is harder)
pub fn spawn_rate_for(level: u32, tuning: &Tuning) -> u32 {
    tuning
        .base_spawn_rate
        .saturating_sub(level.saturating_mul(tuning.spawn_rate_step))
        .max(tuning.min_spawn_rate)
}

/// Hostile speed multiplier at `level`
pub fn speed_multiplier_for(level: u32, tuning: &Tuning) -> f32 {
    1.0 + level as f32 * tuning.speed_step_per_level
}

/// Recompute the level and apply its parameters if it strictly increased.
/// Returns the new level on a level-up.
pub fn recompute(state: &mut SessionState, tuning: &Tuning) -> Option<u32> {
    let level = level_for(state.time_left, tuning);
    if level <= state.level {
        return None;
    }

    state.level = level;
    state.spawn_rate = spawn_rate_for(level, tuning);
    state.speed_multiplier = speed_multiplier_for(level, tuning);
    log::info!(
        "Level {}: spawn every {} frames, speed x{:.1}",
        level,
        state.spawn_rate,
        state.speed_multiplier
    );
    Some(level)
}
