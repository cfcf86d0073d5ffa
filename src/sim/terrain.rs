//! Terrain sampling
//!
//! Ground height and slope at an arbitrary x. Pure function of the track;
//! before the first point and past the last point the ground is a flat pad.

use super::track::TrackModel;
use crate::consts::OFF_TERRAIN_HEIGHT;

/// Ground height and local slope angle (radians) at a query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainSample {
    pub y: f32,
    pub slope: f32,
}

impl TerrainSample {
    const fn flat(y: f32) -> Self {
        Self { y, slope: 0.0 }
    }
}

/// Sample the terrain under `x`
///
/// At a shared control point the earlier segment wins. A query that matches
/// no segment (NaN x) reports [`OFF_TERRAIN_HEIGHT`] so the vehicle falls
/// and the fall check ends the run.
pub fn sample(track: &TrackModel, x: f32) -> TerrainSample {
    let points = track.points();
    let first = track.first();
    let last = track.last();

    if x <= first.x {
        return TerrainSample::flat(first.y);
    }
    if x > last.x {
        return TerrainSample::flat(last.y);
    }

    // First point with p.x >= x closes the enclosing segment
    let end = points.partition_point(|p| p.x < x);
    if end == 0 || end >= points.len() {
        return TerrainSample::flat(OFF_TERRAIN_HEIGHT);
    }

    let a = points[end - 1];
    let b = points[end];
    let t = (x - a.x) / (b.x - a.x);
    TerrainSample {
        y: a.y + (b.y - a.y) * t,
        slope: (b.y - a.y).atan2(b.x - a.x),
    }
}
