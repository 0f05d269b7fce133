//! xorshift64* random number generator
//!
//! Fast, deterministic PRNG with 64-bit state. Same seed produces the same
//! sequence of draws, which is what makes a race replayable.

use serde::{Deserialize, Serialize};

use super::RandomSource;

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use horse_race_core::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let value = rng.next();
/// let lane = rng.range(0, 8); // [0, 8)
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// A zero seed is coerced to 1 (xorshift has no zero state).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate random value in range [min, max)
    ///
    /// # Panics
    /// Panics if min >= max
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");

        let value = self.next();
        let range_size = (max - min) as u64;
        min + (value % range_size) as i64
    }

    /// Get current RNG state (for checkpointing/replay)
    ///
    /// # Example
    /// ```
    /// use horse_race_core::RngManager;
    ///
    /// let mut rng = RngManager::new(12345);
    /// rng.next();
    /// let mut replay = RngManager::new(rng.get_state());
    /// assert_eq!(rng.next(), replay.next());
    /// ```
    pub fn get_state(&self) -> u64 {
        self.state
    }

    /// Generate random f64 in range [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        // Top 53 bits scaled into [0.0, 1.0)
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }
}

impl RandomSource for RngManager {
    fn next_f64(&mut self) -> f64 {
        RngManager::next_f64(self)
    }

    fn range(&mut self, min: i64, max: i64) -> i64 {
        RngManager::range(self, min, max)
    }
}
