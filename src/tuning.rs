//! Data-driven vehicle handling
//!
//! Every multiplicative rate here is a tuned gameplay constant, not a
//! physical property. The defaults reproduce the shipped handling exactly.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Handling constants consumed by [`crate::sim::step_with`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Ground thrust while accelerating
    pub engine_accel: f32,
    /// Ground deceleration while braking
    pub brake_decel: f32,
    /// Gravity component pulling the car back down slopes
    pub slope_gravity: f32,
    /// Rate at which angular velocity chases the ground angle
    pub ground_align_rate: f32,
    /// Airborne rotation impulse per steering input
    pub air_spin_impulse: f32,
    /// Airborne forward impulse while accelerating
    pub air_thrust: f32,

    // === Suspension ===
    /// Fixed offset added on top of `half_height` for the rest height
    pub suspension_offset: f32,
    /// Tolerance above rest height still counted as ground contact
    pub contact_band: f32,
    /// Exponential approach rate toward rest height
    pub spring_rate: f32,
    /// Floor for vertical velocity while grounded (positive magnitude)
    pub max_sink_speed: f32,
    /// Orientation settle rate toward the ground angle
    pub ground_settle_rate: f32,
    /// Per-step angular velocity retention on the ground
    pub ground_spin_friction: f32,

    // === Damping ===
    pub ground_drag: f32,
    pub air_drag: f32,
    pub vertical_drag: f32,

    // === Speed cap ===
    /// Longitudinal speed above which the soft cap engages
    pub speed_cap: f32,
    /// Per-step scale applied while over the cap
    pub speed_cap_scale: f32,

    /// Substitute for a zero front/rear x difference
    pub min_axle_span: f32,
}

impl VehicleTuning {
    /// The shipped handling model
    pub const STANDARD: Self = Self {
        gravity: 24.0,
        engine_accel: 16.0,
        brake_decel: 13.0,
        slope_gravity: 8.0,
        ground_align_rate: 10.0,
        air_spin_impulse: 4.2,
        air_thrust: 3.5,
        suspension_offset: 0.35,
        contact_band: 0.18,
        spring_rate: 9.5,
        max_sink_speed: 1.4,
        ground_settle_rate: 7.0,
        ground_spin_friction: 0.87,
        ground_drag: 0.987,
        air_drag: 0.996,
        vertical_drag: 0.998,
        speed_cap: 27.0,
        speed_cap_scale: 0.97,
        min_axle_span: 1e-4,
    };

    /// Parse tuning from JSON; missing fields keep their standard values
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid vehicle tuning JSON")
    }

    /// Load tuning from a JSON file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read tuning file {}", path.display()))?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded vehicle tuning from {}", path.display());
        Ok(tuning)
    }
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_standard_values() {
        let tuning = VehicleTuning::from_json(r#"{ "gravity": 30.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 30.0);
        assert_eq!(tuning.engine_accel, VehicleTuning::STANDARD.engine_accel);
        assert_eq!(tuning.speed_cap_scale, 0.97);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(VehicleTuning::from_json("{ gravity: ").is_err());
    }

    #[test]
    fn test_json_roundtrip_preserves_constants() {
        let json = serde_json::to_string(&VehicleTuning::default()).unwrap();
        assert_eq!(VehicleTuning::from_json(&json).unwrap(), VehicleTuning::STANDARD);
    }
}
