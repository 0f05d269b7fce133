//! Race configuration
//!
//! Everything the input/config collaborator supplies before a session
//! starts. Loadable from JSON; every field has a default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::betting::STARTING_BALANCE;
use crate::models::roster::{MAX_LANES, MIN_LANES};

/// Shortest allowed track
pub const MIN_TRACK_LENGTH: u32 = 25;

/// Longest allowed track
pub const MAX_TRACK_LENGTH: u32 = 100;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Track length {value} outside [{min}, {max}]")]
    TrackLength { value: u32, min: u32, max: u32 },

    #[error("Lane count {value} outside [{min}, {max}]")]
    LaneCount { value: usize, min: usize, max: usize },

    #[error("Starting balance must be finite and non-negative, got {0}")]
    StartingBalance(f64),

    #[error("Config parse error: {0}")]
    Parse(String),
}

/// Session configuration
///
/// # Example
/// ```
/// use horse_race_core::RaceConfig;
///
/// let config = RaceConfig::from_json_str(r#"{ "track_length": 40, "rng_seed": 7 }"#).unwrap();
/// assert_eq!(config.track_length, 40);
/// assert_eq!(config.lane_count, 2);
/// assert_eq!(config.starting_balance, 100.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Distance a horse must cover to win
    pub track_length: u32,

    /// Lanes the roster starts with
    pub lane_count: usize,

    /// Bettor's balance at session start
    pub starting_balance: f64,

    /// Seed for the engine's RNG
    pub rng_seed: u64,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            track_length: 50,
            lane_count: MIN_LANES,
            starting_balance: STARTING_BALANCE,
            rng_seed: 12345,
        }
    }
}

impl RaceConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_track_length(self.track_length)?;

        if !(MIN_LANES..=MAX_LANES).contains(&self.lane_count) {
            return Err(ConfigError::LaneCount {
                value: self.lane_count,
                min: MIN_LANES,
                max: MAX_LANES,
            });
        }

        if !self.starting_balance.is_finite() || self.starting_balance < 0.0 {
            return Err(ConfigError::StartingBalance(self.starting_balance));
        }

        Ok(())
    }
}

pub fn validate_track_length(track_length: u32) -> Result<(), ConfigError> {
    if !(MIN_TRACK_LENGTH..=MAX_TRACK_LENGTH).contains(&track_length) {
        return Err(ConfigError::TrackLength {
            value: track_length,
            min: MIN_TRACK_LENGTH,
            max: MAX_TRACK_LENGTH,
        });
    }
    Ok(())
}
