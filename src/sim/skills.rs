//! Cooldown-gated abilities
//!
//! Each skill is Ready or OnCooldown. Timed skills (Overclock) also carry an
//! Active flag that runs down independently of the cooldown.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillKind {
    /// Clears every live hostile, no score
    Emp,
    /// Wider hit tolerance and a hotter laser for a few seconds
    Overclock,
}

impl SkillKind {
    pub const ALL: [SkillKind; 2] = [SkillKind::Emp, SkillKind::Overclock];

    /// Parse a skill name or its key binding (Q / E)
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "emp" | "q" => Some(SkillKind::Emp),
            "overclock" | "e" => Some(SkillKind::Overclock),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillKind::Emp => "emp",
            SkillKind::Overclock => "overclock",
        }
    }
}

/// One skill's timers (whole seconds, counted on the clock tick)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub kind: SkillKind,
    pub ready: bool,
    pub cooldown: u32,
    pub remaining_cooldown: u32,
    /// Zero for instant skills
    pub duration: u32,
    pub active: bool,
    pub remaining_active: u32,
}

impl Skill {
    pub fn new(kind: SkillKind, cooldown: u32, duration: u32) -> Self {
        Self {
            kind,
            ready: true,
            cooldown,
            remaining_cooldown: 0,
            duration,
            active: false,
            remaining_active: 0,
        }
    }

    pub fn reset(&mut self) {
        self.ready = true;
        self.remaining_cooldown = 0;
        self.active = false;
        self.remaining_active = 0;
    }

    /// Fire the skill if ready. Returns false (and changes nothing) otherwise.
    pub fn try_activate(&mut self) -> bool {
        if !self.ready {
            return false;
        }
        self.ready = false;
        self.remaining_cooldown = self.cooldown;
        if self.duration > 0 {
            self.active = true;
            self.remaining_active = self.duration;
        }
        true
    }

    /// One clock tick of cooldown. Returns true when the skill just became ready.
    pub fn tick_cooldown(&mut self) -> bool {
        if self.ready {
            return false;
        }
        self.remaining_cooldown = self.remaining_cooldown.saturating_sub(1);
        if self.remaining_cooldown == 0 {
            self.ready = true;
            return true;
        }
        false
    }

    /// One clock tick of active time. Returns true when the effect just ended.
    pub fn tick_active(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.remaining_active = self.remaining_active.saturating_sub(1);
        if self.remaining_active == 0 {
            self.active = false;
            return true;
        }
        false
    }

    /// Remaining cooldown as 0-1 (0 when ready)
    pub fn cooldown_fraction(&self) -> f32 {
        if self.ready || self.cooldown == 0 {
            return 0.0;
        }
        self.remaining_cooldown as f32 / self.cooldown as f32
    }
}

/// The session's two skills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    pub emp: Skill,
    pub overclock: Skill,
}

impl Skills {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            emp: Skill::new(SkillKind::Emp, tuning.emp_cooldown, 0),
            overclock: Skill::new(
                SkillKind::Overclock,
                tuning.overclock_cooldown,
                tuning.overclock_duration,
            ),
        }
    }

    pub fn get(&self, kind: SkillKind) -> &Skill {
        match kind {
            SkillKind::Emp => &self.emp,
            SkillKind::Overclock => &self.overclock,
        }
    }

    pub fn get_mut(&mut self, kind: SkillKind) -> &mut Skill {
        match kind {
            SkillKind::Emp => &mut self.emp,
            SkillKind::Overclock => &mut self.overclock,
        }
    }

    pub fn reset(&mut self) {
        self.emp.reset();
        self.overclock.reset();
    }

    pub fn overclocked(&self) -> bool {
        self.overclock.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_keys() {
        assert_eq!(SkillKind::parse("emp"), Some(SkillKind::Emp));
        assert_eq!(SkillKind::parse("Q"), Some(SkillKind::Emp));
        assert_eq!(SkillKind::parse("OverClock"), Some(SkillKind::Overclock));
        assert_eq!(SkillKind::parse("e"), Some(SkillKind::Overclock));
        assert_eq!(SkillKind::parse("nuke"), None);
    }

    #[test]
    fn test_cooldown_gates_activation() {
        let mut emp = Skill::new(SkillKind::Emp, 15, 0);
        assert!(emp.try_activate());
        assert!(!emp.ready);
        assert!(!emp.try_activate());
        assert!(!emp.active);

        for _ in 0..14 {
            assert!(!emp.tick_cooldown());
            assert!(!emp.ready);
        }
        assert!(emp.tick_cooldown());
        assert!(emp.ready);
        assert!(emp.try_activate());
    }

    #[test]
    fn test_overclock_expires_before_cooldown() {
        let mut oc = Skill::new(SkillKind::Overclock, 20, 5);
        assert!(oc.try_activate());
        assert!(oc.active);
        assert_eq!(oc.remaining_active, 5);

        for tick in 1..=5 {
            oc.tick_cooldown();
            let ended = oc.tick_active();
            assert_eq!(ended, tick == 5);
        }
        assert!(!oc.active);
        assert!(!oc.ready);
        assert_eq!(oc.remaining_cooldown, 15);
    }

    #[test]
    fn test_reset_clears_active_timer() {
        let mut oc = Skill::new(SkillKind::Overclock, 20, 5);
        oc.try_activate();
        oc.tick_active();
        oc.reset();
        assert!(oc.ready);
        assert!(!oc.active);
        assert_eq!(oc.remaining_active, 0);
        // Inactive skills never decrement
        assert!(!oc.tick_active());
        assert_eq!(oc.remaining_active, 0);
    }

    #[test]
    fn test_cooldown_fraction() {
        let mut emp = Skill::new(SkillKind::Emp, 10, 0);
        assert_eq!(emp.cooldown_fraction(), 0.0);
        emp.try_activate();
        assert_eq!(emp.cooldown_fraction(), 1.0);
        emp.tick_cooldown();
        assert!((emp.cooldown_fraction() - 0.9).abs() < 1e-6);
    }
}
