//! One-shot deferred actions keyed by the session clock
//!
//! Finish and crash both schedule follow-up work (advance the level, restart
//! the car). Actions fire when the clock passes their deadline, regardless of
//! how many steps ran in between, and each fires exactly once.

use serde::{Deserialize, Serialize};

/// Follow-up work the race rules can schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledAction {
    /// Move to the next catalog level (wrapping) and load it
    AdvanceLevel,
    /// Build a fresh endless track from the evolved seed
    RegenerateEndless,
    /// Put the car back on the start pad after a crash
    RestartVehicle,
}

/// An action and the clock time (seconds) it becomes due
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub fire_at: f64,
    pub action: ScheduledAction,
}

/// Pending one-shot timers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    pending: Vec<ScheduledEvent>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire `delay` seconds after `now`
    pub fn schedule(&mut self, now: f64, delay: f64, action: ScheduledAction) {
        let fire_at = now + delay.max(0.0);
        log::debug!("Scheduled {:?} at t={:.3}s", action, fire_at);
        self.pending.push(ScheduledEvent { fire_at, action });
    }

    /// Remove and return every action due at `now`, earliest first
    pub fn pop_due(&mut self, now: f64) -> Vec<ScheduledAction> {
        let mut due: Vec<ScheduledEvent> = Vec::new();
        self.pending.retain(|event| {
            if event.fire_at <= now {
                due.push(*event);
                false
            } else {
                true
            }
        });
        // Stable sort keeps scheduling order for equal deadlines
        due.sort_by(|a, b| a.fire_at.total_cmp(&b.fire_at));
        due.into_iter().map(|event| event.action).collect()
    }

    /// Drop all pending actions
    pub fn clear(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("Discarding {} pending action(s)", self.pending.len());
        }
        self.pending.clear();
    }

    /// Drop pending instances of one action, leaving the others due
    pub fn cancel(&mut self, action: ScheduledAction) {
        let before = self.pending.len();
        self.pending.retain(|event| event.action != action);
        if self.pending.len() != before {
            log::debug!("Cancelled pending {:?}", action);
        }
    }

    pub fn pending(&self) -> &[ScheduledEvent] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Deadline of the next action, if any
    pub fn next_fire_at(&self) -> Option<f64> {
        self.pending
            .iter()
            .map(|event| event.fire_at)
            .min_by(|a, b| a.total_cmp(b))
    }
}
