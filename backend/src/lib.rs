//! Horse Race Simulator Core - Rust Engine
//!
//! Multi-lane horse race simulation with deterministic execution.
//!
//! # Architecture
//!
//! - **core**: Race clock and numeric rounding policy
//! - **models**: Domain types (Horse, LaneRoster, HorseRecord, events)
//! - **weather**: Weather conditions and confidence modifier
//! - **betting**: Betting ledger (stake, payout projection, settlement)
//! - **generation**: Random horses and breed-profile confidence seeding
//! - **persistence**: Record store interface for the persistence collaborator
//! - **orchestrator**: Race engine, config, display interface, checkpoints
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. Confidence is always in [0.0, 1.0], rounded to 2 decimals
//! 2. All randomness is injected (seeded or scripted), never global
//! 3. The core never performs I/O; displays and stores plug in via traits

// Module declarations
pub mod betting;
pub mod core;
pub mod generation;
pub mod models;
pub mod orchestrator;
pub mod persistence;
pub mod rng;
pub mod weather;

// Re-exports for convenience
pub use betting::{projected_payout, BetSettlement, BettingLedger, LedgerError, ProjectedPayout};
pub use crate::core::RaceClock;
pub use models::{
    event::{EventLog, RaceEvent},
    horse::{Horse, HorseError},
    record::{HorseRecord, RecordError},
    roster::{LaneRoster, RosterError},
};
pub use orchestrator::{
    ConfigError, EngineError, LaneSnapshot, NoopObserver, RaceConfig, RaceEngine, RaceFrame,
    RaceObserver, RaceOutcome, RacePhase, RaceResult, SessionSnapshot, Standing, TickResult,
};
pub use rng::{RandomSource, RngManager, SequenceRng};
pub use weather::{WeatherChange, WeatherCondition, WeatherModifier};
