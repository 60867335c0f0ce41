//! Deterministic random source for the simulator.
//!
//! The engine never reaches for `rand::thread_rng()` or the wall clock;
//! every probabilistic decision (the false-negative draw in
//! `diagnosis::single_test`) goes through a `DeterministicRng` seeded once
//! from `SimulationConfig::seed`. This is what makes an identical seed
//! and configuration reproduce an identical result record.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded, reproducible source of randomness.
pub struct DeterministicRng {
    inner: ChaCha8Rng,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        DeterministicRng {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draws a boolean that is `true` with the given probability.
    /// `probability` is clamped to `[0.0, 1.0]`.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        let probability = probability.clamp(0.0, 1.0);
        if probability >= 1.0 {
            return true;
        }
        if probability <= 0.0 {
            return false;
        }
        // next_u64() / 2^64 is uniform on [0, 1); compare against the threshold.
        let threshold = (probability * u64::MAX as f64) as u64;
        self.inner.next_u64() < threshold
    }
}
