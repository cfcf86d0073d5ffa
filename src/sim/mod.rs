//! Deterministic simulation module
//!
//! All driving logic lives here. This module must stay pure and deterministic:
//! - Time only advances through the caller's frame delta
//! - Seeded track generation only
//! - No rendering or input device dependencies

pub mod generator;
pub mod race;
pub mod schedule;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod track;
pub mod vehicle;

pub use generator::{
    ParkMiller, catalog_len, evolve_seed, generate_endless, load_catalog, wrap_level,
};
pub use race::{RaceEvent, RaceEventKind, RaceStatus, Transition};
pub use schedule::{ScheduledAction, ScheduledEvent, Scheduler};
pub use state::{Session, TrackMode};
pub use terrain::{TerrainSample, sample};
pub use tick::{TickInput, tick};
pub use track::{TrackError, TrackModel, TrackSlab};
pub use vehicle::{InputIntent, VehicleSnapshot, VehicleState, step, step_with};
