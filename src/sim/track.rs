//! Track model: a polyline terrain, strictly increasing in x
//!
//! Tracks are validated once at construction and are immutable afterwards,
//! so they can be shared freely between the stepper and any reader.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{FINISH_MARKER_HEIGHT, FINISH_OFFSET, SLAB_DROP};

/// Why a point sequence cannot be used as a track
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackError {
    #[error("a track needs at least 2 control points, got {0}")]
    TooFewPoints(usize),
    #[error("control point {index} does not advance in x ({x} after {prev_x})")]
    NonMonotonic { index: usize, prev_x: f32, x: f32 },
    #[error("control point {index} has a non-finite coordinate")]
    NonFinite { index: usize },
    #[error("flat coordinate list has odd length {0}")]
    OddCoordinateCount(usize),
}

/// One rendered track segment, laid out for direct GPU upload
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TrackSlab {
    /// Slab centre (already dropped below the driving surface)
    pub center: Vec2,
    /// Segment length along the surface
    pub length: f32,
    /// Rotation about z (radians)
    pub angle: f32,
}

/// Immutable terrain definition for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec2>", into = "Vec<Vec2>")]
pub struct TrackModel {
    points: Vec<Vec2>,
}

impl TrackModel {
    /// Build a track, rejecting malformed point sequences
    pub fn new(points: Vec<Vec2>) -> Result<Self, TrackError> {
        if points.len() < 2 {
            return Err(TrackError::TooFewPoints(points.len()));
        }
        for (index, p) in points.iter().enumerate() {
            if !p.is_finite() {
                return Err(TrackError::NonFinite { index });
            }
        }
        for (i, pair) in points.windows(2).enumerate() {
            if pair[1].x <= pair[0].x {
                return Err(TrackError::NonMonotonic {
                    index: i + 1,
                    prev_x: pair[0].x,
                    x: pair[1].x,
                });
            }
        }
        Ok(Self { points })
    }

    /// Build a track from interleaved `[x0, y0, x1, y1, ...]` coordinates
    pub fn from_flat(coords: &[f32]) -> Result<Self, TrackError> {
        if coords.len() % 2 != 0 {
            return Err(TrackError::OddCoordinateCount(coords.len()));
        }
        Self::new(
            coords
                .chunks_exact(2)
                .map(|c| Vec2::new(c[0], c[1]))
                .collect(),
        )
    }

    /// Wrap points that are valid by construction (generator output)
    pub(crate) fn from_valid_points(points: Vec<Vec2>) -> Self {
        debug_assert!(Self::new(points.clone()).is_ok());
        Self { points }
    }

    /// Control points, ordered by x
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a valid track has at least two points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Start of the track
    pub fn first(&self) -> Vec2 {
        self.points[0]
    }

    /// Last control point (nominal finish x)
    pub fn last(&self) -> Vec2 {
        self.points[self.points.len() - 1]
    }

    /// X coordinate the vehicle must pass to finish
    pub fn finish_x(&self) -> f32 {
        self.last().x + FINISH_OFFSET
    }

    /// Where the finish marker pole stands
    pub fn finish_marker(&self) -> Vec2 {
        let end = self.last();
        Vec2::new(end.x, end.y + FINISH_MARKER_HEIGHT)
    }

    /// Iterate segments as `(start, end)` pairs
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Renderer-facing geometry: one slab per segment
    pub fn slabs(&self) -> Vec<TrackSlab> {
        self.segments()
            .map(|(a, b)| {
                let d = b - a;
                let mid = (a + b) * 0.5;
                TrackSlab {
                    center: Vec2::new(mid.x, mid.y - SLAB_DROP),
                    length: d.length(),
                    angle: d.y.atan2(d.x),
                }
            })
            .collect()
    }
}

impl TryFrom<Vec<Vec2>> for TrackModel {
    type Error = TrackError;

    fn try_from(points: Vec<Vec2>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<TrackModel> for Vec<Vec2> {
    fn from(track: TrackModel) -> Self {
        track.points
    }
}
