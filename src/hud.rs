//! HUD read model
//!
//! Everything the UI layer draws, as one serializable snapshot.

use serde::Serialize;

use crate::sim::skills::{Skill, SkillKind};
use crate::sim::state::SessionState;
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillHud {
    pub kind: SkillKind,
    pub ready: bool,
    /// Remaining cooldown, 1.0 just after use down to 0.0 when ready
    pub cooldown_fraction: f32,
    pub active: bool,
}

impl From<&Skill> for SkillHud {
    fn from(skill: &Skill) -> Self {
        Self {
            kind: skill.kind,
            ready: skill.ready,
            cooldown_fraction: skill.cooldown_fraction(),
            active: skill.active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    /// Score with the combo suffix, e.g. `"1250 (x3)"`
    pub score_text: String,
    pub score: u64,
    pub combo: u32,
    pub time_left: u32,
    pub level: u32,
    pub hp_fraction: f32,
    /// Bar switches to the warning color
    pub low_hp: bool,
    pub skills: Vec<SkillHud>,
}

impl HudSnapshot {
    pub fn capture(state: &SessionState, skills: [&Skill; 2], tuning: &Tuning) -> Self {
        let hp_fraction = state.hp_fraction().clamp(0.0, 1.0);
        Self {
            score_text: score_text(state.score, state.combo),
            score: state.score,
            combo: state.combo,
            time_left: state.time_left,
            level: state.level,
            hp_fraction,
            low_hp: hp_fraction < tuning.low_hp_fraction,
            skills: skills.into_iter().map(SkillHud::from).collect(),
        }
    }

    pub fn skill(&self, kind: SkillKind) -> Option<&SkillHud> {
        self.skills.iter().find(|s| s.kind == kind)
    }

    pub fn to_json(&self) -> String {
        // Plain data with string keys; serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Score text, with the multiplier shown once a streak is going
pub fn score_text(score: u64, combo: u32) -> String {
    if combo > 1 {
        format!("{} (x{})", score, combo)
    } else {
        score.to_string()
    }
}
