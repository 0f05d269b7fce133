//! Persisted horse record
//!
//! The opaque tuple exchanged with the persistence collaborator. The core
//! never knows how (or whether) records are written to disk.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by record validation and record stores
#[derive(Debug, Error, PartialEq, Clone)]
pub enum RecordError {
    #[error("Horse record not found: {0}")]
    NotFound(String),

    #[error("Invalid horse record: {0}")]
    Invalid(String),
}

/// Career snapshot of a horse: (confidence, symbol, wins, races, win rate)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorseRecord {
    pub name: String,
    pub confidence: f64,
    pub symbol: char,
    pub wins: u32,
    pub races: u32,
    pub win_rate: f64,
}

impl HorseRecord {
    /// Reject records a store should never hold
    ///
    /// # Example
    /// ```
    /// use horse_race_core::HorseRecord;
    ///
    /// let record = HorseRecord {
    ///     name: "Silver star".to_string(),
    ///     confidence: 0.4,
    ///     symbol: 'S',
    ///     wins: 3,
    ///     races: 2,
    ///     win_rate: 1.0,
    /// };
    /// assert!(record.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.name.trim().is_empty() {
            return Err(RecordError::Invalid(
                "horse name cannot be empty".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(RecordError::Invalid(format!(
                "confidence {} outside [0.0, 1.0]",
                self.confidence
            )));
        }
        if self.wins > self.races {
            return Err(RecordError::Invalid(format!(
                "wins ({}) exceed races ({})",
                self.wins, self.races
            )));
        }
        if !(0.0..=1.0).contains(&self.win_rate) {
            return Err(RecordError::Invalid(format!(
                "win rate {} outside [0.0, 1.0]",
                self.win_rate
            )));
        }
        Ok(())
    }
}
