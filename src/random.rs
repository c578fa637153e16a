//! Random helpers shared by the construction and perturbation steps.
//!
//! Generators come from [`u_numflow::random::create_rng`]; everything here
//! is generic over [`Rng`] so a fixed seed reproduces a run exactly.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Draws a half-normal deviate: `|N(0, sigma²)|`.
///
/// `sigma == 0` always yields 0.
pub fn half_normal<R: Rng>(rng: &mut R, sigma: f64) -> f64 {
    let z: f64 = StandardNormal.sample(rng);
    (z * sigma).abs()
}

/// Draws an index in `0..len` biased toward the front.
///
/// Uses a half-normal deviate with `σ = len / 2` (integer division),
/// truncated and clamped to the last index. `len` must be positive.
pub fn front_biased_index<R: Rng>(rng: &mut R, len: usize) -> usize {
    debug_assert!(len > 0);
    let sigma = (len / 2) as f64;
    let idx = half_normal(rng, sigma) as usize;
    idx.min(len - 1)
}

/// Resolves an optional seed; `None` draws a fresh one.
pub(crate) fn seed_value(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}
