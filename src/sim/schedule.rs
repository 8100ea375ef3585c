//! Named periodic tasks with an explicit start/cancel lifecycle
//!
//! The session runs two tasks while playing: a clock tick every
//! `second_tick_period` seconds and one frame tick per host frame. Every task
//! is stamped with the generation it was scheduled under; starting or
//! stopping bumps the generation so nothing from an earlier run can fire
//! into a fresh one.

use serde::{Deserialize, Serialize};

/// Which tick handler a due task maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    SecondTick,
    FrameTick,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScheduledTask {
    kind: TaskKind,
    generation: u32,
    /// Clock time at which the task is next due (frame ticks: once per frame)
    next_due: f64,
    period: f64,
}

/// Task table for one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    tasks: Vec<ScheduledTask>,
    generation: u32,
    /// Frame task already handed out for the current frame
    frame_fired: bool,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation (bumped on every start/cancel)
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Whether any task is scheduled
    pub fn is_running(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Cancel everything, then schedule both ticks starting at `now`
    pub fn start(&mut self, now: f64, second_period: f64) {
        self.cancel_all();
        let generation = self.generation;
        self.tasks.push(ScheduledTask {
            kind: TaskKind::SecondTick,
            generation,
            next_due: now + second_period,
            period: second_period,
        });
        self.tasks.push(ScheduledTask {
            kind: TaskKind::FrameTick,
            generation,
            next_due: now,
            period: 0.0,
        });
        self.frame_fired = false;
    }

    /// Drop all pending tasks and invalidate anything already handed out
    pub fn cancel_all(&mut self) {
        self.tasks.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Mark the start of a host frame so the frame task becomes due again
    pub fn begin_frame(&mut self) {
        self.frame_fired = false;
    }

    /// Pop the next due task, clock ticks before the frame tick.
    /// Returns the task with the generation it was scheduled under.
    pub fn pop_due(&mut self, now: f64) -> Option<(TaskKind, u32)> {
        let current = self.generation;
        self.tasks.retain(|t| t.generation == current);

        if let Some(task) = self
            .tasks
            .iter_mut()
            .find(|t| t.kind == TaskKind::SecondTick && t.next_due <= now)
        {
            task.next_due += task.period;
            return Some((task.kind, task.generation));
        }

        if self.frame_fired {
            return None;
        }
        let frame = self
            .tasks
            .iter()
            .find(|t| t.kind == TaskKind::FrameTick)
            .map(|t| (t.kind, t.generation));
        if frame.is_some() {
            self.frame_fired = true;
        }
        frame
    }

    /// Whether a task handed out under `generation` may still run
    pub fn is_current(&self, generation: u32) -> bool {
        generation == self.generation && self.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(schedule: &mut Schedule, now: f64) -> Vec<TaskKind> {
        let mut out = Vec::new();
        while let Some((kind, _)) = schedule.pop_due(now) {
            out.push(kind);
        }
        out
    }

    #[test]
    fn test_nothing_due_before_start() {
        let mut schedule = Schedule::new();
        schedule.begin_frame();
        assert_eq!(schedule.pop_due(10.0), None);
    }

    #[test]
    fn test_frame_tick_once_per_frame() {
        let mut schedule = Schedule::new();
        schedule.start(0.0, 1.0);
        schedule.begin_frame();
        assert_eq!(drain(&mut schedule, 0.1), vec![TaskKind::FrameTick]);
        assert_eq!(drain(&mut schedule, 0.1), vec![]);
        schedule.begin_frame();
        assert_eq!(drain(&mut schedule, 0.2), vec![TaskKind::FrameTick]);
    }

    #[test]
    fn test_second_ticks_catch_up_before_frame() {
        let mut schedule = Schedule::new();
        schedule.start(0.0, 1.0);
        schedule.begin_frame();
        assert_eq!(
            drain(&mut schedule, 2.5),
            vec![TaskKind::SecondTick, TaskKind::SecondTick, TaskKind::FrameTick]
        );
        schedule.begin_frame();
        assert_eq!(
            drain(&mut schedule, 3.0),
            vec![TaskKind::SecondTick, TaskKind::FrameTick]
        );
    }

    #[test]
    fn test_cancel_invalidates_handed_out_tasks() {
        let mut schedule = Schedule::new();
        schedule.start(0.0, 1.0);
        schedule.begin_frame();
        let (_, stale) = schedule.pop_due(1.0).unwrap();
        assert!(schedule.is_current(stale));

        schedule.cancel_all();
        assert!(!schedule.is_current(stale));
        assert_eq!(schedule.pop_due(5.0), None);

        // Restart: the old generation stays dead
        schedule.start(5.0, 1.0);
        assert!(!schedule.is_current(stale));
        schedule.begin_frame();
        let (_, fresh) = schedule.pop_due(5.0).unwrap();
        assert!(schedule.is_current(fresh));
    }
}
