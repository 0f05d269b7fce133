//! Domain models for the race simulator

pub mod event;
pub mod horse;
pub mod record;
pub mod roster;

// Re-exports
pub use event::{EventLog, RaceEvent};
pub use horse::{Horse, HorseError};
pub use record::{HorseRecord, RecordError};
pub use roster::{LaneRoster, RosterError, MAX_LANES, MIN_LANES};
