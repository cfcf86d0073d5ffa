//! Vehicle state and the per-step dynamics integrator
//!
//! The car is a single body sampled against the ground at a front and a rear
//! point. Suspension is an exponential approach to a rest height rather than
//! a contact solve, which keeps the integrator stable at any clamped dt.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::race::RaceStatus;
use super::terrain::sample;
use super::track::TrackModel;
use crate::consts::{HALF_HEIGHT, START_OFFSET_X, START_OFFSET_Y, WHEEL_BASE};
use crate::tuning::VehicleTuning;

/// Player intent for a single step (sampled once, never queued)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputIntent {
    pub accelerate: bool,
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
}

/// The player's car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// Chassis centre (y is height)
    pub pos: Vec2,
    pub vel: Vec2,
    /// Orientation (radians, counter-clockwise, unbounded)
    pub angle: f32,
    pub angular_vel: f32,
    /// Distance between the front and rear ground samples
    pub wheel_base: f32,
    /// Chassis centre height above the suspension base
    pub half_height: f32,
    pub finished: bool,
    pub crashed: bool,
    pub can_control: bool,
    /// Ground contact as of the last step (presentation only)
    #[serde(default)]
    pub on_ground: bool,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::at_start(Vec2::ZERO)
    }
}

impl VehicleState {
    /// Canonical start pose relative to a track's first point
    pub fn at_start(first_point: Vec2) -> Self {
        Self {
            pos: Vec2::new(first_point.x + START_OFFSET_X, first_point.y + START_OFFSET_Y),
            vel: Vec2::ZERO,
            angle: 0.0,
            angular_vel: 0.0,
            wheel_base: WHEEL_BASE,
            half_height: HALF_HEIGHT,
            finished: false,
            crashed: false,
            can_control: true,
            on_ground: false,
        }
    }

    /// Put the car back on the start pad of `track`
    pub fn reset(&mut self, track: &TrackModel) {
        *self = Self::at_start(track.first());
    }

    /// Race status derived from the flags
    pub fn status(&self) -> RaceStatus {
        RaceStatus::from_flags(self.finished, self.crashed)
    }

    /// Read-only view for the rendering side
    pub fn snapshot(&self) -> VehicleSnapshot {
        VehicleSnapshot {
            pos: self.pos,
            vel: self.vel,
            angle: self.angle,
            on_ground: self.on_ground,
            status: self.status(),
        }
    }
}

/// What a renderer needs to place the car
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub on_ground: bool,
    pub status: RaceStatus,
}

/// Advance the car by one step with the standard handling
pub fn step(state: &mut VehicleState, track: &TrackModel, input: &InputIntent, dt: f32) {
    step_with(state, track, input, dt, &VehicleTuning::STANDARD);
}

/// Advance the car by one step
///
/// `dt` is expected to be clamped by the caller (see [`crate::clamp_frame_dt`]).
pub fn step_with(
    state: &mut VehicleState,
    track: &TrackModel,
    input: &InputIntent,
    dt: f32,
    tuning: &VehicleTuning,
) {
    // Ground under the front and rear of the chassis
    let half_span = state.angle.cos() * state.wheel_base * 0.5;
    let front_x = state.pos.x + half_span;
    let rear_x = state.pos.x - half_span;
    let front = sample(track, front_x);
    let rear = sample(track, rear_x);

    let ground_y = (front.y + rear.y) * 0.5;
    let mut span = front_x - rear_x;
    if span == 0.0 {
        // Car standing on its nose or tail
        span = tuning.min_axle_span;
    }
    let ground_angle = (front.y - rear.y).atan2(span);

    let rest_height = ground_y + state.half_height + tuning.suspension_offset;
    let on_ground = state.pos.y <= rest_height + tuning.contact_band;

    if state.can_control {
        if on_ground {
            let mut throttle = 0.0;
            if input.accelerate {
                throttle += tuning.engine_accel;
            }
            if input.brake {
                throttle -= tuning.brake_decel;
            }
            state.vel.x += throttle * ground_angle.cos() * dt;
            state.vel.x -= ground_angle.sin() * tuning.slope_gravity * dt;
            state.angular_vel += (ground_angle - state.angle) * tuning.ground_align_rate * dt;
        } else {
            if input.steer_left {
                state.angular_vel += tuning.air_spin_impulse * dt;
            }
            if input.steer_right {
                state.angular_vel -= tuning.air_spin_impulse * dt;
            }
            if input.accelerate {
                state.vel.x += tuning.air_thrust * dt;
            }
        }
    }

    state.vel.y -= tuning.gravity * dt;

    if on_ground {
        state.pos.y += (rest_height - state.pos.y) * tuning.spring_rate * dt;
        state.vel.y = state.vel.y.max(-tuning.max_sink_speed);
        state.angle += (ground_angle - state.angle) * tuning.ground_settle_rate * dt;
        state.angular_vel *= tuning.ground_spin_friction;
    }

    state.vel.x *= if on_ground {
        tuning.ground_drag
    } else {
        tuning.air_drag
    };
    state.vel.y *= tuning.vertical_drag;

    state.pos += state.vel * dt;
    state.angle += state.angular_vel * dt;

    // Soft cap: scale down while over the limit
    if state.vel.x.abs() > tuning.speed_cap {
        state.vel.x *= tuning.speed_cap_scale;
    }

    state.on_ground = on_ground;
}
