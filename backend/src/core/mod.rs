//! Core primitives shared by every component: race clock and numeric policy

pub mod clock;

pub use clock::RaceClock;

/// Round to two decimal places
///
/// Confidence, payouts and win rates are all stored at this precision.
///
/// # Example
/// ```
/// use horse_race_core::core::round_to_hundredths;
///
/// assert_eq!(round_to_hundredths(0.456), 0.46);
/// assert_eq!(round_to_hundredths(0.454), 0.45);
/// ```
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
