//! Hill Climb headless runner
//!
//! Drives the simulation with a simple autopilot at a fixed 60 Hz frame time
//! and logs what happens. Useful for balancing tracks without a renderer.
//!
//! Usage: `hill-climb [settings.json] [levels]`

use std::path::Path;

use hill_climb::Settings;
use hill_climb::sim::{InputIntent, RaceEventKind, Session, TickInput, VehicleState, tick};

/// Frame time fed to the simulation
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up on a level after this many frames (two minutes)
const MAX_FRAMES_PER_LEVEL: u32 = 60 * 120;

/// Hold the throttle and level the car out while airborne
fn autopilot(vehicle: &VehicleState) -> InputIntent {
    let airborne = !vehicle.on_ground;
    InputIntent {
        accelerate: true,
        brake: false,
        steer_left: airborne && vehicle.angle < -0.35,
        steer_right: airborne && vehicle.angle > 0.35,
    }
}

/// Outcome of one level
#[derive(Debug, Default)]
struct LevelRun {
    label: String,
    frames: u32,
    /// Frame the finish line was crossed
    cleared_at: u32,
    crashes: u32,
    cleared: bool,
}

fn run_level(session: &mut Session) -> LevelRun {
    let mut run = LevelRun {
        label: session.level_label(),
        ..Default::default()
    };

    while run.frames < MAX_FRAMES_PER_LEVEL {
        let input = TickInput::from(autopilot(&session.vehicle));
        tick(session, &input, FRAME_DT);
        run.frames += 1;

        for event in session.drain_events() {
            if let Some(message) = &event.message {
                log::debug!("[{}] {}", run.label, message);
            }
            match event.kind {
                RaceEventKind::Crashed => run.crashes += 1,
                RaceEventKind::Cleared => {
                    run.cleared = true;
                    run.cleared_at = run.frames;
                }
                // A fresh track after a clear ends this level
                RaceEventKind::Idle if run.cleared => return run,
                _ => {}
            }
        }
    }
    run
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Hill Climb (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(Path::new(&path)),
        None => Settings::default(),
    };
    let levels: usize = match args.next() {
        Some(n) => n.parse()?,
        None => hill_climb::sim::catalog_len(),
    };

    let mut session = Session::new(&settings);
    session.drain_events();

    let mut cleared = 0;
    for _ in 0..levels {
        let run = run_level(&mut session);
        if run.cleared {
            cleared += 1;
            println!(
                "{:<16} cleared in {:>6.2}s ({} crash(es))",
                run.label,
                run.cleared_at as f32 * FRAME_DT,
                run.crashes
            );
        } else {
            println!(
                "{:<16} gave up after {:>6.2}s ({} crash(es))",
                run.label,
                run.frames as f32 * FRAME_DT,
                run.crashes
            );
            // Move on so one stuck level does not end the run
            if session.is_endless() {
                session.load_level();
            } else {
                session.select_next();
            }
            session.drain_events();
        }
    }

    println!("{cleared}/{levels} levels cleared");
    Ok(())
}
