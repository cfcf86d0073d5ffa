//! Per-frame simulation tick
//!
//! Advances a session by one caller-supplied time delta: clamp, integrate the
//! car, apply race rules, then fire any follow-up actions that came due.

use super::generator::evolve_seed;
use super::race::{self, RaceEvent, Transition};
use super::schedule::ScheduledAction;
use super::state::Session;
use super::vehicle::{InputIntent, step_with};
use crate::clamp_frame_dt;
use crate::consts::{CATALOG_ADVANCE_DELAY, ENDLESS_REGEN_DELAY};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held controls
    pub intent: InputIntent,
    /// Restart requested this frame (one-shot)
    pub restart: bool,
}

impl From<InputIntent> for TickInput {
    fn from(intent: InputIntent) -> Self {
        Self {
            intent,
            restart: false,
        }
    }
}

/// Advance the session by one frame of `dt` seconds
pub fn tick(session: &mut Session, input: &TickInput, dt: f32) {
    let dt = clamp_frame_dt(dt, session.max_frame_dt);

    if input.restart {
        session.restart();
    }

    session.time_ticks += 1;
    session.clock += dt as f64;

    step_with(
        &mut session.vehicle,
        &session.track,
        &input.intent,
        dt,
        &session.tuning,
    );

    match race::evaluate(&mut session.vehicle, &session.track) {
        Some(Transition::Finished) => on_finished(session),
        Some(Transition::Crashed) => on_crashed(session, dt),
        None => {}
    }

    for action in session.scheduler.pop_due(session.clock) {
        session.apply(action);
    }
}

fn on_finished(session: &mut Session) {
    let endless = session.is_endless();
    log::info!(
        "{} cleared at t={:.2}s (tick {})",
        session.level_label(),
        session.clock,
        session.time_ticks
    );
    session.events.push(RaceEvent::cleared(endless));

    if endless {
        let seed = evolve_seed(session.endless_seed, session.clock_ms());
        log::info!("Endless seed {} -> {}", session.endless_seed, seed);
        session.endless_seed = seed;
        session
            .scheduler
            .schedule(session.clock, ENDLESS_REGEN_DELAY, ScheduledAction::RegenerateEndless);
    } else {
        session
            .scheduler
            .schedule(session.clock, CATALOG_ADVANCE_DELAY, ScheduledAction::AdvanceLevel);
    }
}

fn on_crashed(session: &mut Session, dt: f32) {
    let pos = session.vehicle.pos;
    log::info!(
        "Crashed on {} at ({:.1}, {:.1}), angle {:.2}, tick {}",
        session.level_label(),
        pos.x,
        pos.y,
        session.vehicle.angle,
        session.time_ticks
    );
    session.events.push(RaceEvent::crashed());
    session.scheduler.schedule(
        session.clock,
        race::crash_restart_delay(dt),
        ScheduledAction::RestartVehicle,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::consts::MAX_FRAME_DT;
    use crate::sim::generator::{catalog_len, generate_endless, load_catalog};
    use crate::sim::race::{RaceEventKind, RaceStatus};
    use crate::sim::state::TrackMode;
    use glam::Vec2;
    use std::f32::consts::PI;

    const DT: f32 = 0.016;

    fn accelerate() -> TickInput {
        InputIntent {
            accelerate: true,
            ..Default::default()
        }
        .into()
    }

    fn kinds(session: &mut Session) -> Vec<RaceEventKind> {
        session.drain_events().into_iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_frame_dt_is_clamped() {
        let mut session = Session::default();
        tick(&mut session, &TickInput::default(), 5.0);
        assert!((session.clock - MAX_FRAME_DT as f64).abs() < 1e-9);
        assert_eq!(session.time_ticks, 1);

        tick(&mut session, &TickInput::default(), f32::NAN);
        assert!((session.clock - MAX_FRAME_DT as f64).abs() < 1e-9);
        assert!(session.vehicle.pos.is_finite());
    }

    #[test]
    fn test_level_zero_end_to_end() {
        let mut session = Session::default();
        session.drain_events();
        let input = accelerate();

        let mut finished = false;
        for _ in 0..2000 {
            tick(&mut session, &input, DT);
            assert!(!session.vehicle.crashed, "crashed at {:?}", session.vehicle.pos);
            if session.vehicle.finished {
                finished = true;
                break;
            }
        }
        assert!(finished, "never reached the finish");
        assert_eq!(kinds(&mut session), vec![RaceEventKind::Cleared]);
        assert!(!session.vehicle.can_control);

        // Advance is deferred, not immediate
        for _ in 0..40 {
            tick(&mut session, &input, DT);
        }
        assert_eq!(session.level_index, 0);
        assert_eq!(session.status(), RaceStatus::Finished);

        for _ in 0..20 {
            tick(&mut session, &input, DT);
        }
        assert_eq!(session.level_index, 1);
        assert_eq!(session.track, load_catalog(1));
        assert_eq!(kinds(&mut session), vec![RaceEventKind::Idle]);
        assert!(session.scheduler().is_empty());
    }

    #[test]
    fn test_flip_crash_within_one_tick() {
        let mut session = Session::default();
        session.vehicle.pos = Vec2::new(5.0, 20.0);
        session.vehicle.angle = PI * 1.2;
        session.vehicle.vel.x = 1.0;
        tick(&mut session, &TickInput::default(), DT);
        assert!(session.vehicle.crashed);

        let mut session = Session::default();
        session.vehicle.pos = Vec2::new(5.0, 20.0);
        session.vehicle.angle = PI * 1.2;
        session.vehicle.vel.x = 5.0;
        tick(&mut session, &TickInput::default(), DT);
        assert!(!session.vehicle.crashed);
    }

    #[test]
    fn test_crash_schedules_single_restart() {
        let mut session = Session::default();
        session.drain_events();
        session.vehicle.pos = Vec2::new(5.0, -30.0);
        tick(&mut session, &TickInput::default(), DT);
        assert_eq!(session.status(), RaceStatus::Crashed);
        assert_eq!(kinds(&mut session), vec![RaceEventKind::Crashed]);
        assert_eq!(session.scheduler().pending().len(), 1);

        // Still crashed before the ~0.9s delay elapses
        for _ in 0..50 {
            tick(&mut session, &TickInput::default(), DT);
        }
        assert!(session.vehicle.crashed);
        assert!(session.drain_events().is_empty());

        for _ in 0..10 {
            tick(&mut session, &TickInput::default(), DT);
        }
        assert_eq!(session.status(), RaceStatus::Driving);
        assert!(session.vehicle.can_control);
        assert_eq!(kinds(&mut session), vec![RaceEventKind::Restarted]);
        assert_eq!(session.level_index, 0);

        // Fired once only
        for _ in 0..100 {
            tick(&mut session, &TickInput::default(), DT);
        }
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_manual_restart_cancels_pending_restart() {
        let mut session = Session::default();
        session.vehicle.pos = Vec2::new(5.0, -30.0);
        tick(&mut session, &TickInput::default(), DT);
        assert!(session.vehicle.crashed);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut session, &restart, DT);
        assert!(!session.vehicle.crashed);
        assert!(session.scheduler().is_empty());

        // The absorbed auto-restart never fires a second time
        session.drain_events();
        for _ in 0..120 {
            tick(&mut session, &TickInput::default(), DT);
        }
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_manual_restart_keeps_pending_advance() {
        let mut session = Session::default();
        session.vehicle.pos = Vec2::new(60.0, 20.0);
        tick(&mut session, &TickInput::default(), DT);
        assert!(session.vehicle.finished);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut session, &restart, DT);
        assert_eq!(session.status(), RaceStatus::Driving);
        assert_eq!(session.level_index, 0);
        assert_eq!(session.scheduler().pending().len(), 1);

        for _ in 0..120 {
            tick(&mut session, &TickInput::default(), DT);
        }
        assert_eq!(session.level_index, 1);
        assert_eq!(session.track, load_catalog(1));
    }

    #[test]
    fn test_endless_finish_evolves_seed_and_regenerates() {
        let mut session = Session::default();
        session.toggle_endless();
        assert_eq!(session.mode, TrackMode::Endless);
        let first_track = session.track.clone();
        let seed_before = session.endless_seed;

        // Run the clock a little so the perturbation is visible
        for _ in 0..10 {
            tick(&mut session, &TickInput::default(), DT);
        }
        session.drain_events();
        session.vehicle.pos = Vec2::new(session.track.finish_x() + 0.5, 20.0);
        tick(&mut session, &TickInput::default(), DT);
        assert!(session.vehicle.finished);

        let events = session.drain_events();
        assert_eq!(events[0].kind, RaceEventKind::Cleared);
        assert_eq!(
            events[0].message.as_deref(),
            Some("Huge run! Endless track regenerated.")
        );
        let evolved = evolve_seed(seed_before, session.clock_ms());
        assert_eq!(session.endless_seed, evolved);

        for _ in 0..60 {
            tick(&mut session, &TickInput::default(), DT);
        }
        assert_eq!(session.track, generate_endless(evolved).0);
        assert_ne!(session.track, first_track);
        assert_eq!(session.status(), RaceStatus::Driving);
    }

    #[test]
    fn test_level_change_drops_pending_advance() {
        let mut session = Session::default();
        session.vehicle.pos = Vec2::new(60.0, 20.0);
        tick(&mut session, &TickInput::default(), DT);
        assert!(session.vehicle.finished);

        session.select_previous();
        for _ in 0..120 {
            tick(&mut session, &TickInput::default(), DT);
        }
        assert_eq!(session.level_index, catalog_len() - 1);
    }

    #[test]
    fn test_same_inputs_same_result() {
        let settings = Settings::default();
        let mut a = Session::new(&settings);
        let mut b = Session::new(&settings);
        let inputs = [
            accelerate(),
            TickInput::default(),
            InputIntent {
                accelerate: true,
                steer_left: true,
                ..Default::default()
            }
            .into(),
        ];
        for i in 0..300 {
            let input = &inputs[i % inputs.len()];
            tick(&mut a, input, DT);
            tick(&mut b, input, DT);
        }
        assert_eq!(a.vehicle, b.vehicle);
        assert_eq!(a.clock, b.clock);
    }
}
