//! Hill Climb - a 2D hill-climb driving simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, vehicle dynamics, race rules)
//! - `tuning`: Data-driven vehicle handling constants
//! - `settings`: Session options (starting mode, seed, frame clamp)
//!
//! Rendering, camera, input polling and the frame loop live outside this
//! crate. Callers feed a time delta and an [`sim::InputIntent`] into
//! [`sim::tick`] and read back the vehicle snapshot and race events.

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::VehicleTuning;

/// Simulation configuration constants
pub mod consts {
    use std::f32::consts::PI;

    /// Largest frame delta (seconds) fed into integration
    pub const MAX_FRAME_DT: f32 = 0.033;

    /// Distance between the front and rear ground sample points
    pub const WHEEL_BASE: f32 = 1.6;
    /// Vertical offset from chassis centre to suspension rest
    pub const HALF_HEIGHT: f32 = 0.55;

    /// Spawn offset from the track's first control point
    pub const START_OFFSET_X: f32 = 1.0;
    pub const START_OFFSET_Y: f32 = 3.0;

    /// The finish line sits this far past the last control point
    pub const FINISH_OFFSET: f32 = 1.5;
    /// Height of the finish marker above the last control point
    pub const FINISH_MARKER_HEIGHT: f32 = 2.1;
    /// Track slabs hang this far below the driving surface
    pub const SLAB_DROP: f32 = 0.55;

    /// Flip crash: orientation beyond this while nearly stopped
    pub const FLIP_ANGLE: f32 = PI * 1.15;
    pub const FLIP_MAX_SPEED: f32 = 2.0;
    /// Fell off the world
    pub const FALL_HEIGHT: f32 = -10.0;
    /// Ground height reported when a query matches no segment
    pub const OFF_TERRAIN_HEIGHT: f32 = -20.0;

    /// Delay before advancing to the next catalog level (seconds)
    pub const CATALOG_ADVANCE_DELAY: f64 = 0.85;
    /// Delay before regenerating the endless track (seconds)
    pub const ENDLESS_REGEN_DELAY: f64 = 0.9;
    /// Post-crash restart pacing (milliseconds)
    pub const CRASH_RESTART_BASE_MS: f64 = 900.0;
    pub const CRASH_RESTART_MIN_MS: f64 = 700.0;
    pub const CRASH_RESTART_DT_FACTOR: f64 = 120.0;
}

/// Clamp a caller-supplied frame delta into `[0, max_dt]`
///
/// Non-finite or negative deltas count as a zero-length frame.
#[inline]
pub fn clamp_frame_dt(dt: f32, max_dt: f32) -> f32 {
    if !dt.is_finite() || dt <= 0.0 {
        0.0
    } else {
        dt.min(max_dt)
    }
}
