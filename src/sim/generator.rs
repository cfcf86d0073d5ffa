//! Track generation: the hand-authored catalog and endless tracks
//!
//! Endless tracks come from the Park-Miller minimal standard generator. The
//! multiplier/modulus pair is fixed so a seed always rebuilds the same track.

use glam::Vec2;
use rand::rand_core::impls;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use super::track::TrackModel;

/// Park-Miller modulus (2^31 - 1)
pub const PARK_MILLER_MODULUS: i64 = 2_147_483_647;
/// Park-Miller multiplier (7^5)
pub const PARK_MILLER_MULTIPLIER: i64 = 16_807;

/// Segments in an endless track
pub const ENDLESS_SEGMENTS: usize = 36;
/// Segment x advance is `ENDLESS_STEP_MIN + r * ENDLESS_STEP_SPREAD`
pub const ENDLESS_STEP_MIN: f64 = 6.0;
pub const ENDLESS_STEP_SPREAD: f64 = 5.0;
/// Segment y change is `(r - 0.5) * ENDLESS_RISE_SPREAD`
pub const ENDLESS_RISE_SPREAD: f64 = 6.0;
/// Endless heights stay inside this band
pub const ENDLESS_MIN_Y: f64 = -2.5;
pub const ENDLESS_MAX_Y: f64 = 9.5;

/// Hand-authored levels as interleaved `[x0, y0, x1, y1, ...]`
const CATALOG: [&[f32]; 12] = [
    &[0., 0., 12., 0., 24., 2., 38., 3., 48., 1.],
    &[0., 0., 9., 0., 16., 3., 24., -1., 32., 2., 42., 2.],
    &[0., 0., 11., 2., 19., -2., 29., 3., 42., -1., 55., 1.],
    &[0., 0., 8., 0., 13., 4., 17., -3., 23., 5., 33., 0., 42., 2.],
    &[0., 0., 10., 1., 18., 1., 24., 5., 30., -1., 39., 4., 48., 1.],
    &[0., 0., 8., -1., 15., 2., 25., 6., 34., 0., 42., 5., 52., 2.],
    &[0., 0., 7., 3., 15., -2., 22., 4., 29., -3., 38., 5., 50., 1.],
    &[0., 0., 9., 0., 18., 4., 25., 4., 34., -2., 44., 2., 55., 3.],
    &[0., 0., 8., 2., 14., -3., 21., 2., 30., 6., 41., 0., 55., 4.],
    &[0., 0., 10., 0., 18., 5., 25., -1., 32., 6., 41., -2., 52., 3.],
    &[0., 0., 12., 1., 20., 5., 28., -2., 38., 7., 46., 2., 58., 4.],
    &[0., 0., 9., 3., 16., -1., 24., 5., 30., -4., 38., 7., 49., 1., 62., 5.],
];

/// Number of catalog levels
pub const fn catalog_len() -> usize {
    CATALOG.len()
}

/// Wrap a (possibly negative) level index onto the catalog
pub fn wrap_level(index: isize) -> usize {
    index.rem_euclid(CATALOG.len() as isize) as usize
}

/// Load a catalog level; the index wraps modulo the catalog size
pub fn load_catalog(index: usize) -> TrackModel {
    let coords = CATALOG[index % CATALOG.len()];
    TrackModel::from_valid_points(
        coords
            .chunks_exact(2)
            .map(|c| Vec2::new(c[0], c[1]))
            .collect(),
    )
}

/// Reduce an arbitrary integer into the generator's valid state range
///
/// Zero is a fixed point of the recurrence, so it maps to 1.
pub fn normalize_seed(seed: i64) -> i32 {
    match seed.rem_euclid(PARK_MILLER_MODULUS) {
        0 => 1,
        s => s as i32,
    }
}

/// Perturb a seed with the elapsed clock after an endless run
pub fn evolve_seed(seed: i32, clock_ms: f64) -> i32 {
    let offset = if clock_ms.is_finite() {
        clock_ms.floor() as i64
    } else {
        0
    };
    normalize_seed(seed as i64 + offset)
}

/// Park-Miller multiplicative LCG: `s = s * 16807 mod (2^31 - 1)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkMiller {
    state: i32,
}

impl ParkMiller {
    pub fn new(seed: i32) -> Self {
        Self {
            state: normalize_seed(seed as i64),
        }
    }

    /// Current state; feeding it back into `new` resumes the sequence
    pub fn seed(&self) -> i32 {
        self.state
    }

    /// Advance and return the raw state in `[1, 2^31 - 2]`
    pub fn next_raw(&mut self) -> i32 {
        self.state = (self.state as i64 * PARK_MILLER_MULTIPLIER % PARK_MILLER_MODULUS) as i32;
        self.state
    }

    /// Advance and return a draw in `[0, 1)`
    pub fn next_unit(&mut self) -> f64 {
        (self.next_raw() - 1) as f64 / (PARK_MILLER_MODULUS - 1) as f64
    }
}

impl RngCore for ParkMiller {
    /// Upper 16 bits of two consecutive 31-bit draws
    fn next_u32(&mut self) -> u32 {
        let hi = ((self.next_raw() - 1) as u32) >> 15;
        let lo = ((self.next_raw() - 1) as u32) >> 15;
        (hi << 16) | lo
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst)
    }
}

impl SeedableRng for ParkMiller {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(i32::from_le_bytes(seed))
    }
}

/// Build a 36-segment endless track from `seed`
///
/// Returns the track and the generator state after the last draw, which
/// continues the sequence for the next track.
pub fn generate_endless(seed: i32) -> (TrackModel, i32) {
    let mut rng = ParkMiller::new(seed);
    let mut points = Vec::with_capacity(ENDLESS_SEGMENTS + 1);
    points.push(Vec2::ZERO);

    let mut x = 0.0f64;
    let mut y = 0.0f64;
    for _ in 0..ENDLESS_SEGMENTS {
        x += ENDLESS_STEP_MIN + rng.next_unit() * ENDLESS_STEP_SPREAD;
        y += (rng.next_unit() - 0.5) * ENDLESS_RISE_SPREAD;
        y = y.clamp(ENDLESS_MIN_Y, ENDLESS_MAX_Y);
        points.push(Vec2::new(x as f32, y as f32));
    }

    (TrackModel::from_valid_points(points), rng.seed())
}
