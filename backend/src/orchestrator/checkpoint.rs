//! Checkpoint - Save/Load Session State
//!
//! Captures everything needed to resume a session between races: roster,
//! weather, balance, RNG position and race count.
//!
//! # Critical Invariants
//!
//! - **Determinism**: a restored session draws the same numbers the original
//!   would have drawn next
//! - **Config Matching**: a snapshot only restores under the config it was
//!   taken with (SHA-256 of the canonical JSON config)
//! - **Roster Integrity**: restored lanes pass every roster invariant

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::record::HorseRecord;
use crate::orchestrator::engine::EngineError;
use crate::weather::WeatherCondition;

/// Complete session snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Races started so far
    pub race_number: usize,

    pub track_length: u32,

    pub weather: WeatherCondition,

    pub balance: f64,

    /// RNG state at time of snapshot (CRITICAL for determinism)
    pub rng_state: u64,

    /// One entry per lane, `None` for empty lanes
    pub lanes: Vec<Option<HorseRecord>>,

    /// SHA256 hash of the session config
    pub config_hash: String,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String, EngineError> {
        serde_json::to_string(self).map_err(|e| {
            EngineError::Serialization(format!("Snapshot serialization failed: {}", e))
        })
    }

    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|e| {
            EngineError::Serialization(format!("Snapshot deserialization failed: {}", e))
        })
    }
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Compute deterministic SHA256 hash of config
///
/// Uses canonical JSON serialization with sorted keys so the hash does not
/// depend on field order.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, EngineError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config).map_err(|e| {
        EngineError::Serialization(format!("Config serialization failed: {}", e))
    })?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        EngineError::Serialization(format!("Config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
