use std::f64::consts::TAU;

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The single random source threaded through every firework and particle.
///
/// A [`Dice`] is seeded once; the same seed and the same sequence of calls always yield the same show.
#[derive(Clone)]
pub struct Dice(ChaCha8Rng);

impl Dice {
    /// Instantiates a [`Dice`] from a seed.
    pub fn new(seed: u64) -> Dice {
        Dice(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Uniform sample in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.0.gen()
    }

    /// Uniform sample in `[low, high)`. An empty range yields `low`.
    pub fn range(&mut self, low: f64, high: f64) -> f64 {
        if low < high {
            self.0.gen_range(low..high)
        } else {
            low
        }
    }

    /// Uniform angle in `[0, 2π)`.
    pub fn angle(&mut self) -> f64 {
        self.0.gen_range(0.0..TAU)
    }

    /// Uniform index in `0..n`. Returns 0 for an empty range.
    pub fn below(&mut self, n: usize) -> usize {
        if n == 0 {
            0
        } else {
            self.0.gen_range(0..n)
        }
    }

    /// Picks one element of a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        items
            .choose(&mut self.0)
            .expect("cannot pick from an empty slice")
    }

    /// `true` with probability `p`, clamped into `[0, 1]`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}

impl Default for Dice {
    fn default() -> Self {
        Dice::new(0)
    }
}
