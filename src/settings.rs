//! Session settings
//!
//! Stored as a single JSON document. A missing or broken file never stops a
//! session from starting; it falls back to defaults with a warning.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_FRAME_DT;
use crate::tuning::VehicleTuning;

/// Options a session starts from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Start in endless mode instead of the level catalog
    pub start_endless: bool,
    /// Catalog level to start on (wraps around the catalog)
    pub start_level: usize,
    /// Initial endless generator seed
    pub endless_seed: i32,
    /// Upper bound for a single frame delta (seconds)
    pub max_frame_dt: f32,
    /// Vehicle handling
    pub tuning: VehicleTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_endless: false,
            start_level: 0,
            endless_seed: 1,
            max_frame_dt: MAX_FRAME_DT,
            tuning: VehicleTuning::default(),
        }
    }
}

impl Settings {
    /// Effective frame clamp (never above the stability limit)
    pub fn frame_dt_limit(&self) -> f32 {
        if self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0 {
            self.max_frame_dt.min(MAX_FRAME_DT)
        } else {
            MAX_FRAME_DT
        }
    }

    /// Load settings from a JSON file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let settings = serde_json::from_str(&json)
            .with_context(|| format!("invalid settings JSON in {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Using default settings: {err:#}");
                Self::default()
            }
        }
    }

    /// Save settings as pretty-printed JSON
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to encode settings")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write settings file {}", path.display()))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
