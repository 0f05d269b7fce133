//! Race clock
//!
//! A race advances in discrete ticks. The clock counts ticks within the
//! current race and numbers races across the session. It carries no notion
//! of wall-clock time: display pacing belongs to the driver.

use serde::{Deserialize, Serialize};

/// Tracks the current tick and race number
///
/// # Example
/// ```
/// use horse_race_core::RaceClock;
///
/// let mut clock = RaceClock::new();
/// clock.start_race();
/// assert_eq!(clock.race_number(), 1);
/// assert_eq!(clock.current_tick(), 0);
///
/// clock.advance_tick();
/// assert_eq!(clock.current_tick(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceClock {
    /// Ticks elapsed in the current race
    current_tick: usize,
    /// Races started this session (1-based once the first race starts)
    race_number: usize,
}

impl RaceClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a session after `race_number` completed races
    pub fn resume(race_number: usize) -> Self {
        Self {
            current_tick: 0,
            race_number,
        }
    }

    /// Begin a new race: tick counter back to zero, race number advances
    pub fn start_race(&mut self) {
        self.current_tick = 0;
        self.race_number += 1;
    }

    pub fn advance_tick(&mut self) {
        self.current_tick += 1;
    }

    pub fn current_tick(&self) -> usize {
        self.current_tick
    }

    pub fn race_number(&self) -> usize {
        self.race_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_race_resets_tick() {
        let mut clock = RaceClock::new();
        clock.start_race();
        for _ in 0..7 {
            clock.advance_tick();
        }
        assert_eq!(clock.current_tick(), 7);

        clock.start_race();
        assert_eq!(clock.current_tick(), 0);
        assert_eq!(clock.race_number(), 2);
    }
}
