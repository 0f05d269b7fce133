//! Orchestrator - race loop, configuration and collaborator interfaces
//!
//! See `engine.rs` for the tick algorithm.

pub mod checkpoint;
pub mod config;
pub mod engine;
pub mod observer;

// Re-export main types for convenience
pub use checkpoint::{compute_config_hash, SessionSnapshot};
pub use config::{ConfigError, RaceConfig, MAX_TRACK_LENGTH, MIN_TRACK_LENGTH};
pub use engine::{
    EngineError, RaceEngine, RaceOutcome, RacePhase, RaceResult, Standing, TickResult,
    FALL_FACTOR, MIN_RACERS,
};
pub use observer::{LaneSnapshot, NoopObserver, RaceFrame, RaceObserver};
