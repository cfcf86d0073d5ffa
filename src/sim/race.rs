//! Race rules: finish and crash detection
//!
//! Status is always derived from the vehicle flags. Finish and crash are
//! terminal until the car is reset; only a driving car is evaluated.

use serde::{Deserialize, Serialize};

use super::track::TrackModel;
use super::vehicle::VehicleState;
use crate::consts::*;

/// Where the run stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaceStatus {
    Driving,
    Finished,
    Crashed,
}

impl RaceStatus {
    pub fn from_flags(finished: bool, crashed: bool) -> Self {
        if finished {
            RaceStatus::Finished
        } else if crashed {
            RaceStatus::Crashed
        } else {
            RaceStatus::Driving
        }
    }
}

/// A terminal transition observed during one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Finished,
    Crashed,
}

/// Status notifications for the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaceEventKind {
    Cleared,
    Crashed,
    Restarted,
    /// Fresh level loaded, status text cleared
    Idle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceEvent {
    pub kind: RaceEventKind,
    pub message: Option<String>,
}

impl RaceEvent {
    pub fn cleared(endless: bool) -> Self {
        let message = if endless {
            "Huge run! Endless track regenerated."
        } else {
            "Level cleared!"
        };
        Self {
            kind: RaceEventKind::Cleared,
            message: Some(message.to_string()),
        }
    }

    pub fn crashed() -> Self {
        Self {
            kind: RaceEventKind::Crashed,
            message: Some("Crashed! Auto-restarting...".to_string()),
        }
    }

    pub fn restarted() -> Self {
        Self {
            kind: RaceEventKind::Restarted,
            message: Some("Restarted!".to_string()),
        }
    }

    pub fn idle() -> Self {
        Self {
            kind: RaceEventKind::Idle,
            message: None,
        }
    }
}

/// Mark the car finished once it passes the finish line
pub fn check_finish(vehicle: &mut VehicleState, track: &TrackModel) -> bool {
    // Crashed cars cannot finish, unlike the browser game where a wreck
    // rolling over the line still cleared the level
    if vehicle.status() != RaceStatus::Driving || vehicle.pos.x <= track.finish_x() {
        return false;
    }
    vehicle.finished = true;
    vehicle.can_control = false;
    true
}

/// Mark the car crashed if it flipped and stalled, or fell off the world
///
/// A car spinning fast enough never satisfies the flip condition; only a
/// stalled upside-down car counts.
pub fn check_crash(vehicle: &mut VehicleState) -> bool {
    if vehicle.status() != RaceStatus::Driving {
        return false;
    }
    let flipped = vehicle.angle.abs() > FLIP_ANGLE && vehicle.vel.x.abs() < FLIP_MAX_SPEED;
    let fell = vehicle.pos.y < FALL_HEIGHT;
    if !(flipped || fell) {
        return false;
    }
    vehicle.crashed = true;
    vehicle.can_control = false;
    true
}

/// Run both checks in order; finish takes precedence
pub fn evaluate(vehicle: &mut VehicleState, track: &TrackModel) -> Option<Transition> {
    if check_finish(vehicle, track) {
        Some(Transition::Finished)
    } else if check_crash(vehicle) {
        Some(Transition::Crashed)
    } else {
        None
    }
}

/// Post-crash restart delay in seconds for a frame of `dt` seconds
pub fn crash_restart_delay(dt: f32) -> f64 {
    let ms = (CRASH_RESTART_BASE_MS - dt as f64 * CRASH_RESTART_DT_FACTOR).max(CRASH_RESTART_MIN_MS);
    ms / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::generator::load_catalog;
    use glam::Vec2;
    use std::f32::consts::PI;

    fn car_at(x: f32, y: f32) -> VehicleState {
        let mut car = VehicleState::at_start(Vec2::ZERO);
        car.pos = Vec2::new(x, y);
        car
    }

    #[test]
    fn test_finish_boundary() {
        let track = load_catalog(0);
        let end = track.last().x;

        let mut car = car_at(end + 1.4, 1.0);
        assert_eq!(evaluate(&mut car, &track), None);
        assert!(!car.finished);

        let mut car = car_at(end + 1.6, 1.0);
        assert_eq!(evaluate(&mut car, &track), Some(Transition::Finished));
        assert!(car.finished);
        assert!(!car.can_control);
        assert_eq!(car.status(), RaceStatus::Finished);

        // Terminal: no second transition
        assert_eq!(evaluate(&mut car, &track), None);
    }

    #[test]
    fn test_flip_crash_needs_low_speed() {
        let track = load_catalog(0);

        let mut car = car_at(5.0, 5.0);
        car.angle = PI * 1.2;
        car.vel.x = 1.0;
        assert_eq!(evaluate(&mut car, &track), Some(Transition::Crashed));
        assert!(car.crashed && !car.can_control);

        let mut car = car_at(5.0, 5.0);
        car.angle = PI * 1.2;
        car.vel.x = 5.0;
        assert_eq!(evaluate(&mut car, &track), None);

        // Negative orientation counts too
        let mut car = car_at(5.0, 5.0);
        car.angle = -PI * 1.2;
        assert_eq!(evaluate(&mut car, &track), Some(Transition::Crashed));
    }

    #[test]
    fn test_fall_crash_boundary() {
        let track = load_catalog(0);

        let mut car = car_at(5.0, -11.0);
        assert_eq!(evaluate(&mut car, &track), Some(Transition::Crashed));

        let mut car = car_at(5.0, -9.0);
        assert_eq!(evaluate(&mut car, &track), None);
        assert!(!car.crashed);
    }

    #[test]
    fn test_crash_not_evaluated_after_finish() {
        let track = load_catalog(0);
        let mut car = car_at(60.0, -50.0);
        assert_eq!(evaluate(&mut car, &track), Some(Transition::Finished));
        assert!(!check_crash(&mut car));
        assert!(!car.crashed);
    }

    #[test]
    fn test_crashed_car_cannot_finish() {
        let track = load_catalog(0);
        let mut car = car_at(60.0, 1.0);
        car.crashed = true;
        car.can_control = false;
        assert_eq!(evaluate(&mut car, &track), None);
        assert_eq!(car.status(), RaceStatus::Crashed);
    }

    #[test]
    fn test_crash_restart_delay() {
        assert!((crash_restart_delay(0.016) - 0.89808).abs() < 1e-9);
        assert!((crash_restart_delay(0.0) - 0.9).abs() < 1e-12);
        // Never shorter than the floor
        assert!((crash_restart_delay(10.0) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_status_from_flags() {
        assert_eq!(RaceStatus::from_flags(false, false), RaceStatus::Driving);
        assert_eq!(RaceStatus::from_flags(true, false), RaceStatus::Finished);
        assert_eq!(RaceStatus::from_flags(false, true), RaceStatus::Crashed);
    }

    #[test]
    fn test_event_messages() {
        assert_eq!(RaceEvent::cleared(false).message.as_deref(), Some("Level cleared!"));
        assert_eq!(RaceEvent::idle().message, None);
        assert_eq!(RaceEvent::crashed().kind, RaceEventKind::Crashed);
    }
}
