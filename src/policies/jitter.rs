//! # Jitter sources for retry delays.
//!
//! [`JitterSource`] is the randomness capability a [`Backoff`](crate::Backoff)
//! draws its additive jitter from. Jitter only ever **adds** to the capped delay,
//! so a source returns a value in `[0, upper]`.
//!
//! - [`ThreadJitter`] uniform draw from the thread-local generator (default)
//! - [`FixedJitter`] fixed fraction of the range (deterministic, for tests and replays)
//! - any [`rand::RngCore`] e.g. a seeded `StdRng` for reproducible sequences
//!
//! ## Example
//! ```rust
//! use rand::{SeedableRng, rngs::StdRng};
//! use rebound::{FixedJitter, JitterSource};
//!
//! let mut seeded = StdRng::seed_from_u64(7);
//! let j = seeded.sample_jitter(0.5);
//! assert!((0.0..=0.5).contains(&j));
//!
//! let mut half = FixedJitter::new(0.5);
//! assert_eq!(half.sample_jitter(0.5), 0.25);
//! ```

use rand::{Rng, RngCore};

/// Source of additive jitter, in seconds.
///
/// Implementations must return a value uniformly distributed over `[0, upper]`
/// (or a deterministic point inside it) and must return `0.0` when `upper` is
/// zero, negative or not finite.
pub trait JitterSource {
    /// Draws one jitter value in `[0, upper]`.
    fn sample_jitter(&mut self, upper: f64) -> f64;
}

/// Uniform jitter from `rand::rng()`.
///
/// Zero-sized; every instance shares the calling thread's generator but each
/// draw is independent, so two policies built at the same instant still
/// decorrelate after the first attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThreadJitter;

impl JitterSource for ThreadJitter {
    fn sample_jitter(&mut self, upper: f64) -> f64 {
        if !has_room(upper) {
            return 0.0;
        }
        rand::rng().random_range(0.0..=upper)
    }
}

/// Jitter pinned to a fixed fraction of the available range.
///
/// `FixedJitter::new(0.0)` disables jitter, `FixedJitter::new(1.0)` always picks
/// the upper bound. The fraction is clamped to `[0, 1]`; `NaN` counts as `0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FixedJitter {
    fraction: f64,
}

impl FixedJitter {
    /// Creates a source returning `upper * fraction` on every draw.
    pub fn new(fraction: f64) -> Self {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        Self { fraction }
    }

    /// The clamped fraction used for each draw.
    pub fn fraction(&self) -> f64 {
        self.fraction
    }
}

impl JitterSource for FixedJitter {
    fn sample_jitter(&mut self, upper: f64) -> f64 {
        if !has_room(upper) {
            return 0.0;
        }
        upper * self.fraction
    }
}

/// Any `rand` generator is a jitter source (seeded `StdRng`, `SmallRng`, ...).
impl<R: RngCore> JitterSource for R {
    fn sample_jitter(&mut self, upper: f64) -> f64 {
        if !has_room(upper) {
            return 0.0;
        }
        self.random_range(0.0..=upper)
    }
}

#[inline]
fn has_room(upper: f64) -> bool {
    upper.is_finite() && upper > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_thread_jitter_stays_in_range() {
        let mut src = ThreadJitter;
        for _ in 0..1_000 {
            let j = src.sample_jitter(0.75);
            assert!((0.0..=0.75).contains(&j), "jitter {j} out of range");
        }
    }

    #[test]
    fn test_degenerate_upper_yields_zero() {
        let mut thread = ThreadJitter;
        let mut fixed = FixedJitter::new(1.0);
        let mut seeded = StdRng::seed_from_u64(1);

        for upper in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(thread.sample_jitter(upper), 0.0);
            assert_eq!(fixed.sample_jitter(upper), 0.0);
            assert_eq!(seeded.sample_jitter(upper), 0.0);
        }
    }

    #[test]
    fn test_fixed_fraction_is_clamped() {
        assert_eq!(FixedJitter::new(2.0).fraction(), 1.0);
        assert_eq!(FixedJitter::new(-0.5).fraction(), 0.0);
        assert_eq!(FixedJitter::new(f64::NAN).fraction(), 0.0);
        assert_eq!(FixedJitter::new(0.5).sample_jitter(4.0), 2.0);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..32 {
            assert_eq!(a.sample_jitter(3.0), b.sample_jitter(3.0));
        }
    }

    #[test]
    fn test_independent_sources_diverge() {
        let mut a = StdRng::seed_from_u64(1);
        let mut b = StdRng::seed_from_u64(2);
        let draws_a: Vec<f64> = (0..8).map(|_| a.sample_jitter(1.0)).collect();
        let draws_b: Vec<f64> = (0..8).map(|_| b.sample_jitter(1.0)).collect();
        assert_ne!(draws_a, draws_b);
    }
}
