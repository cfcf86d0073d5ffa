//! Session state
//!
//! Everything one simulation context owns: mode, level selection, endless
//! seed, the active track, the car, the clock and pending follow-up actions.
//! The caller holds the session and hands it to [`super::tick`] each frame.

use serde::{Deserialize, Serialize};

use super::generator::{catalog_len, generate_endless, load_catalog, wrap_level};
use super::race::{RaceEvent, RaceStatus};
use super::schedule::{ScheduledAction, Scheduler};
use super::track::TrackModel;
use super::vehicle::{VehicleSnapshot, VehicleState};
use crate::settings::Settings;
use crate::tuning::VehicleTuning;

/// Where tracks come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackMode {
    /// Hand-authored levels, navigated by index
    Catalog,
    /// Procedural tracks from the endless seed
    Endless,
}

/// One simulation context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub mode: TrackMode,
    /// Current catalog level (kept while in endless mode)
    pub level_index: usize,
    /// Generator state used for the next endless track
    pub endless_seed: i32,
    /// Active terrain
    pub track: TrackModel,
    pub vehicle: VehicleState,
    pub tuning: VehicleTuning,
    /// Frame delta clamp (seconds)
    pub max_frame_dt: f32,
    /// Elapsed simulated time (seconds)
    pub clock: f64,
    /// Ticks since the session started
    pub time_ticks: u64,
    pub(crate) scheduler: Scheduler,
    /// Notifications not yet drained by the UI
    #[serde(skip)]
    pub(crate) events: Vec<RaceEvent>,
}

impl Session {
    /// Start a session and load its first track
    pub fn new(settings: &Settings) -> Self {
        let mode = if settings.start_endless {
            TrackMode::Endless
        } else {
            TrackMode::Catalog
        };
        let level_index = settings.start_level % catalog_len();
        let track = load_catalog(level_index);
        let mut session = Self {
            mode,
            level_index,
            endless_seed: settings.endless_seed,
            vehicle: VehicleState::at_start(track.first()),
            track,
            tuning: settings.tuning.clone(),
            max_frame_dt: settings.frame_dt_limit(),
            clock: 0.0,
            time_ticks: 0,
            scheduler: Scheduler::new(),
            events: Vec::new(),
        };
        session.load_level();
        session
    }

    pub fn is_endless(&self) -> bool {
        self.mode == TrackMode::Endless
    }

    /// Elapsed clock in milliseconds
    pub fn clock_ms(&self) -> f64 {
        self.clock * 1000.0
    }

    /// Build the track for the current mode and put the car on it
    ///
    /// Pending follow-up actions belong to the previous track and are dropped.
    pub fn load_level(&mut self) {
        self.track = match self.mode {
            TrackMode::Catalog => load_catalog(self.level_index),
            TrackMode::Endless => {
                let (track, next_seed) = generate_endless(self.endless_seed);
                self.endless_seed = next_seed;
                track
            }
        };
        self.scheduler.clear();
        self.vehicle.reset(&self.track);
        log::info!(
            "{}: {} points, finish at x={:.1}",
            self.level_label(),
            self.track.len(),
            self.track.finish_x()
        );
        self.events.push(RaceEvent::idle());
    }

    /// Put the car back on the start pad of the current track
    ///
    /// A pending level advance still fires; only the crash auto-restart is
    /// absorbed, since this restart already happened.
    pub fn restart(&mut self) {
        self.scheduler.cancel(ScheduledAction::RestartVehicle);
        self.vehicle.reset(&self.track);
        log::info!("Restarted {}", self.level_label());
        self.events.push(RaceEvent::restarted());
    }

    /// Next catalog level (no-op in endless mode)
    pub fn select_next(&mut self) {
        if self.is_endless() {
            return;
        }
        self.level_index = wrap_level(self.level_index as isize + 1);
        self.load_level();
    }

    /// Previous catalog level (no-op in endless mode)
    pub fn select_previous(&mut self) {
        if self.is_endless() {
            return;
        }
        self.level_index = wrap_level(self.level_index as isize - 1);
        self.load_level();
    }

    /// Switch between catalog and endless mode and load a fresh track
    pub fn toggle_endless(&mut self) {
        self.mode = match self.mode {
            TrackMode::Catalog => TrackMode::Endless,
            TrackMode::Endless => TrackMode::Catalog,
        };
        self.load_level();
    }

    /// Run a due follow-up action
    pub(crate) fn apply(&mut self, action: ScheduledAction) {
        log::debug!("Firing {:?} at t={:.3}s", action, self.clock);
        match action {
            ScheduledAction::AdvanceLevel => {
                self.level_index = wrap_level(self.level_index as isize + 1);
                self.load_level();
            }
            ScheduledAction::RegenerateEndless => self.load_level(),
            ScheduledAction::RestartVehicle => self.restart(),
        }
    }

    pub fn status(&self) -> RaceStatus {
        self.vehicle.status()
    }

    pub fn snapshot(&self) -> VehicleSnapshot {
        self.vehicle.snapshot()
    }

    /// Take all notifications emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<RaceEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// `"Level 3 / 12"` or `"Mode: Endless"`
    pub fn level_label(&self) -> String {
        match self.mode {
            TrackMode::Catalog => format!("Level {} / {}", self.level_index + 1, catalog_len()),
            TrackMode::Endless => "Mode: Endless".to_string(),
        }
    }

    /// Label for the endless toggle
    pub fn endless_label(&self) -> &'static str {
        if self.is_endless() {
            "Endless: On"
        } else {
            "Endless: Off"
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}
