//! Horse model
//!
//! Represents a single racer in the roster. Each horse has:
//! - A confidence rating in [0.0, 1.0] driving both movement and fall odds
//! - Per-race state (distance, fallen flag), reset at every race start
//! - Career statistics (wins, races, win rate), updated once per race
//! - Transient betting state (bet flag, pending winnings), reset every race
//!
//! # Critical Invariants
//!
//! 1. Confidence is always clamped to [0.0, 1.0] and rounded to 2 decimals
//! 2. `total_wins <= total_races`
//! 3. `win_rate == total_wins / total_races` (0.0 when no races)
//!
//! Confidence normalization is silent; counter violations are errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::round_to_hundredths;
use crate::models::record::HorseRecord;

/// Multiplier applied to the winner's confidence after a race
pub const WINNER_CONFIDENCE_FACTOR: f64 = 1.1;

/// Multiplier applied to every other horse's confidence after a race
pub const LOSER_CONFIDENCE_FACTOR: f64 = 0.9;

/// Errors that can occur when mutating horse statistics
#[derive(Debug, Error, PartialEq, Clone)]
pub enum HorseError {
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Clamp to [0.0, 1.0] and round to 2 decimals
///
/// NaN normalizes to 0.0.
///
/// # Example
/// ```
/// use horse_race_core::models::horse::normalize_confidence;
///
/// assert_eq!(normalize_confidence(1.7), 1.0);
/// assert_eq!(normalize_confidence(-0.2), 0.0);
/// assert_eq!(normalize_confidence(0.333), 0.33);
/// ```
pub fn normalize_confidence(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    round_to_hundredths(value.clamp(0.0, 1.0))
}

/// A racer occupying a lane
///
/// # Example
/// ```
/// use horse_race_core::Horse;
///
/// let mut horse = Horse::new("Thunder hoof", 'T', 0.5);
/// horse.move_forward();
/// horse.fall();
/// assert_eq!(horse.distance(), 1);
/// assert!(horse.has_fallen());
///
/// horse.reset_for_new_race();
/// assert_eq!(horse.distance(), 0);
/// assert!(!horse.has_fallen());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Horse {
    /// Unique within a roster, immutable after creation
    name: String,

    /// Display glyph
    symbol: char,

    /// Movement/fall probability weight, see [`normalize_confidence`]
    confidence: f64,

    /// Progress along the track this race
    distance: u32,

    /// Sticky for the rest of the race once set
    fallen: bool,

    /// 1-based lane position, maintained by the roster
    lane: usize,

    total_wins: u32,
    total_races: u32,
    win_rate: f64,

    /// Set on the single horse the bettor backed this race
    bet_placed: bool,

    /// Payout credited if this horse wins while backed
    pending_winnings: f64,
}

impl Horse {
    /// Create a horse with no racing history
    ///
    /// Confidence goes through the same normalization as [`Horse::set_confidence`].
    /// The lane is assigned when the horse is added to a roster.
    pub fn new(name: impl Into<String>, symbol: char, confidence: f64) -> Self {
        Self {
            name: name.into(),
            symbol,
            confidence: normalize_confidence(confidence),
            distance: 0,
            fallen: false,
            lane: 0,
            total_wins: 0,
            total_races: 0,
            win_rate: 0.0,
            bet_placed: false,
            pending_winnings: 0.0,
        }
    }

    /// Rebuild a horse from a persisted record
    ///
    /// Counters are validated (`wins <= races`); the win rate is recomputed
    /// from the counters rather than trusted from the record.
    pub fn from_record(record: &HorseRecord) -> Result<Self, HorseError> {
        if record.wins > record.races {
            return Err(HorseError::Validation(format!(
                "wins ({}) cannot exceed races ({}) for {}",
                record.wins, record.races, record.name
            )));
        }

        let mut horse = Self::new(record.name.clone(), record.symbol, record.confidence);
        horse.total_wins = record.wins;
        horse.total_races = record.races;
        horse.recompute_win_rate();
        Ok(horse)
    }

    /// Export the persistent part of this horse
    pub fn to_record(&self) -> HorseRecord {
        HorseRecord {
            name: self.name.clone(),
            confidence: self.confidence,
            symbol: self.symbol,
            wins: self.total_wins,
            races: self.total_races,
            win_rate: self.win_rate,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn distance(&self) -> u32 {
        self.distance
    }

    pub fn has_fallen(&self) -> bool {
        self.fallen
    }

    pub fn lane(&self) -> usize {
        self.lane
    }

    pub fn total_wins(&self) -> u32 {
        self.total_wins
    }

    pub fn total_races(&self) -> u32 {
        self.total_races
    }

    pub fn win_rate(&self) -> f64 {
        self.win_rate
    }

    pub fn is_bet_placed(&self) -> bool {
        self.bet_placed
    }

    pub fn pending_winnings(&self) -> f64 {
        self.pending_winnings
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Store a new confidence, clamped to [0, 1] and rounded to 2 decimals
    ///
    /// Out-of-range input is normalized silently, never rejected.
    pub fn set_confidence(&mut self, value: f64) {
        self.confidence = normalize_confidence(value);
    }

    pub fn set_symbol(&mut self, symbol: char) {
        self.symbol = symbol;
    }

    pub(crate) fn set_lane(&mut self, lane: usize) {
        self.lane = lane;
    }

    /// Advance one unit. Performs no fallen check; callers must.
    pub fn move_forward(&mut self) {
        self.distance += 1;
    }

    /// Idempotent
    pub fn fall(&mut self) {
        self.fallen = true;
    }

    pub fn reset_for_new_race(&mut self) {
        self.distance = 0;
        self.fallen = false;
    }

    /// Count one finished race, and a win if `won`
    pub fn record_race_outcome(&mut self, won: bool) {
        self.total_races += 1;
        if won {
            self.total_wins += 1;
        }
        self.recompute_win_rate();
    }

    /// Winner ×1.1, everyone else (fallen included) ×0.9
    pub fn apply_post_race_confidence_adjustment(&mut self, won: bool) {
        let factor = if won {
            WINNER_CONFIDENCE_FACTOR
        } else {
            LOSER_CONFIDENCE_FACTOR
        };
        self.set_confidence(self.confidence * factor);
    }

    /// Overwrite the win counter
    ///
    /// Rejected if it would exceed the race count.
    pub fn set_total_wins(&mut self, wins: u32) -> Result<(), HorseError> {
        if wins > self.total_races {
            return Err(HorseError::Validation(format!(
                "win count {} cannot exceed race count {}",
                wins, self.total_races
            )));
        }
        self.total_wins = wins;
        self.recompute_win_rate();
        Ok(())
    }

    /// Overwrite the race counter
    ///
    /// Rejected if it would drop below the win count.
    pub fn set_total_races(&mut self, races: u32) -> Result<(), HorseError> {
        if races < self.total_wins {
            return Err(HorseError::Validation(format!(
                "race count {} cannot be less than win count {}",
                races, self.total_wins
            )));
        }
        self.total_races = races;
        self.recompute_win_rate();
        Ok(())
    }

    pub(crate) fn set_bet_placed(&mut self, placed: bool) {
        self.bet_placed = placed;
    }

    pub(crate) fn set_pending_winnings(&mut self, amount: f64) {
        self.pending_winnings = round_to_hundredths(amount);
    }

    pub(crate) fn clear_bet(&mut self) {
        self.bet_placed = false;
        self.pending_winnings = 0.0;
    }

    fn recompute_win_rate(&mut self) {
        self.win_rate = if self.total_races == 0 {
            0.0
        } else {
            self.total_wins as f64 / self.total_races as f64
        };
    }
}
