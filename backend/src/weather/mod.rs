//! Weather conditions
//!
//! Before a race the driver may cycle the weather. A new condition is drawn
//! uniformly from a fixed set. If it differs from the current one, every
//! horse's confidence is scaled by the new condition's factor once; drawing
//! the same condition again is a no-op, so repeated draws never compound
//! the penalty.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::roster::LaneRoster;
use crate::rng::RandomSource;

/// Enumerated track weather
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCondition {
    Raining,
    Wet,
    Sunny,
    Snow,
}

impl WeatherCondition {
    /// Draw order used by [`WeatherModifier::cycle`]
    pub const ALL: [WeatherCondition; 4] = [
        WeatherCondition::Raining,
        WeatherCondition::Wet,
        WeatherCondition::Sunny,
        WeatherCondition::Snow,
    ];

    /// Multiplicative confidence effect, in (0, 1]
    pub fn factor(self) -> f64 {
        match self {
            WeatherCondition::Raining => 0.75,
            WeatherCondition::Wet => 0.85,
            WeatherCondition::Sunny => 1.0,
            WeatherCondition::Snow => 0.50,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WeatherCondition::Raining => "Raining",
            WeatherCondition::Wet => "Wet",
            WeatherCondition::Sunny => "Sunny",
            WeatherCondition::Snow => "Snow",
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one weather transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeatherChange {
    /// Same condition drawn again; no horse was touched
    Unchanged(WeatherCondition),

    /// Condition changed and `factor` was applied to every horse
    Changed {
        from: WeatherCondition,
        to: WeatherCondition,
        factor: f64,
    },
}

/// Single-state machine holding the current weather
///
/// # Example
/// ```
/// use horse_race_core::{Horse, LaneRoster, WeatherChange, WeatherCondition, WeatherModifier};
/// use horse_race_core::rng::SequenceRng;
///
/// let mut roster = LaneRoster::new(2).unwrap();
/// roster.add_horse(Horse::new("Royal king", 'R', 0.8), 1).unwrap();
///
/// let mut weather = WeatherModifier::new();
/// // 0.9 * 4 = index 3 -> Snow
/// let mut rng = SequenceRng::new(vec![0.9]);
/// let change = weather.cycle(&mut roster, &mut rng);
///
/// assert!(matches!(change, WeatherChange::Changed { to: WeatherCondition::Snow, .. }));
/// assert_eq!(roster.get(1).unwrap().confidence(), 0.4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherModifier {
    current: WeatherCondition,
}

impl Default for WeatherModifier {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherModifier {
    /// Start in sunny weather
    pub fn new() -> Self {
        Self::with_condition(WeatherCondition::Sunny)
    }

    pub fn with_condition(current: WeatherCondition) -> Self {
        Self { current }
    }

    pub fn current(&self) -> WeatherCondition {
        self.current
    }

    pub fn factor(&self) -> f64 {
        self.current.factor()
    }

    /// Draw a new condition and apply it if it changed
    pub fn cycle<R: RandomSource>(&mut self, roster: &mut LaneRoster, rng: &mut R) -> WeatherChange {
        let index = rng.range(0, WeatherCondition::ALL.len() as i64) as usize;
        self.transition_to(WeatherCondition::ALL[index], roster)
    }

    /// Move to `next`, scaling every horse's confidence if it differs
    pub fn transition_to(&mut self, next: WeatherCondition, roster: &mut LaneRoster) -> WeatherChange {
        if next == self.current {
            info!(weather = %self.current, "weather unchanged");
            return WeatherChange::Unchanged(self.current);
        }

        let factor = next.factor();
        for horse in roster.horses_mut() {
            horse.set_confidence(horse.confidence() * factor);
        }

        let from = self.current;
        self.current = next;
        info!(%from, to = %next, factor, "weather changed");

        WeatherChange::Changed {
            from,
            to: next,
            factor,
        }
    }
}
