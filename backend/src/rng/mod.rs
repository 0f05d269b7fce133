//! Deterministic random number generation
//!
//! All randomness in the race core is drawn through the [`RandomSource`]
//! trait. The engine never reaches for a global generator, so a race is
//! fully replayable from its seed (or from a scripted sequence in tests).

mod sequence;
mod xorshift;

pub use sequence::SequenceRng;
pub use xorshift::RngManager;

/// Source of uniform random draws consumed by the simulation
///
/// Implementors must be deterministic for a given internal state.
pub trait RandomSource {
    /// Uniform draw in `[0.0, 1.0)`
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `[min, max)`
    ///
    /// # Panics
    /// Panics if `min >= max`
    fn range(&mut self, min: i64, max: i64) -> i64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }

    fn range(&mut self, min: i64, max: i64) -> i64 {
        (**self).range(min, max)
    }
}
