//! Scripted random source
//!
//! Replays a fixed list of draws, wrapping around at the end. Used to drive
//! the engine through an exact sequence of move/fall decisions.

use super::RandomSource;

/// Random source that replays a fixed sequence of `f64` draws
///
/// `range` consumes one draw and maps it onto `[min, max)` the same way a
/// uniform draw would, so scripted values in `[0, 1)` stay meaningful.
///
/// # Example
/// ```
/// use horse_race_core::rng::{RandomSource, SequenceRng};
///
/// let mut rng = SequenceRng::new(vec![0.1, 0.9]);
/// assert_eq!(rng.next_f64(), 0.1);
/// assert_eq!(rng.next_f64(), 0.9);
/// assert_eq!(rng.next_f64(), 0.1); // wraps
/// ```
#[derive(Debug, Clone)]
pub struct SequenceRng {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceRng {
    /// # Panics
    /// Panics if `values` is empty
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "sequence must not be empty");
        Self { values, cursor: 0 }
    }

    /// Number of draws consumed so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceRng {
    fn next_f64(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }

    fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");
        let span = (max - min) as f64;
        let offset = (self.next_f64().clamp(0.0, 1.0) * span) as i64;
        min + offset.min(max - min - 1)
    }
}
