//! Pluggable uniform randomness.
//!
//! Noise and bar scheduling draw all their randomness through [`UniformSource`], so hosts use an
//! entropy-seeded generator while tests inject a seeded or constant one.

use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};

/// A source of uniformly distributed samples.
pub trait UniformSource {
    /// Uniform sample in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform intensity sample over the full `0..=255` range.
    fn next_byte(&mut self) -> u8 {
        (self.next_unit() * 256.0).clamp(0.0, 255.0) as u8
    }

    /// Uniform sample in `[min, max)`; returns `min` when the range is empty.
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        min + self.next_unit() * (max - min)
    }

    /// Fair coin.
    fn coin(&mut self) -> bool {
        self.next_unit() >= 0.5
    }
}

impl<R: RngCore + ?Sized> UniformSource for R {
    fn next_unit(&mut self) -> f64 {
        self.gen_range(0.0..1.0)
    }

    fn next_byte(&mut self) -> u8 {
        (self.next_u32() >> 24) as u8
    }
}

/// Returns the same unit sample forever. Useful to pin down delays and durations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantSource(pub f64);

impl UniformSource for ConstantSource {
    fn next_unit(&mut self) -> f64 {
        self.0.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// Entropy-seeded generator used by layers unless a source is injected.
pub fn entropy_source() -> StdRng {
    StdRng::from_entropy()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/random.rs"]
mod tests;
