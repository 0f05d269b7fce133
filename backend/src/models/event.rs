//! Event logging for race replay and auditing.
//!
//! Every significant state change during a session is captured as a
//! [`RaceEvent`]. The log lets a driver replay a race, and lets tests assert
//! on what happened and when without inspecting intermediate state.
//!
//! # Event Types
//!
//! - **Race lifecycle**: started, finished (won / all fallen / stalled)
//! - **Movement**: horse moved, horse fell
//! - **Weather**: condition changed
//! - **Betting**: bet placed, bet settled
//!
//! # Example
//!
//! ```rust
//! use horse_race_core::models::event::{EventLog, RaceEvent};
//!
//! let mut log = EventLog::new();
//! log.log(RaceEvent::HorseFell {
//!     race: 1,
//!     tick: 4,
//!     lane: 2,
//!     name: "Wild star".to_string(),
//!     distance: 3,
//! });
//!
//! assert_eq!(log.events_for_horse("Wild star").len(), 1);
//! assert_eq!(log.events_at_tick(4)[0].event_type(), "HorseFell");
//! ```

use crate::weather::WeatherCondition;

/// Session event capturing a state change.
///
/// Events are logged in the order they occur. Events outside a race
/// (weather, betting) carry tick 0.
#[derive(Debug, Clone, PartialEq)]
pub enum RaceEvent {
    RaceStarted {
        race: usize,
        track_length: u32,
        horses: usize,
        weather: WeatherCondition,
    },

    HorseMoved {
        race: usize,
        tick: usize,
        lane: usize,
        name: String,
        distance: u32,
    },

    HorseFell {
        race: usize,
        tick: usize,
        lane: usize,
        name: String,
        distance: u32,
    },

    WeatherChanged {
        from: WeatherCondition,
        to: WeatherCondition,
        factor: f64,
    },

    BetPlaced {
        stake: f64,
        balance_after: f64,
    },

    HorseBackedForBet {
        name: String,
        projected_payout: f64,
    },

    BetSettled {
        name: String,
        won: bool,
        payout: f64,
        balance_after: f64,
    },

    RaceWon {
        race: usize,
        tick: usize,
        lane: usize,
        name: String,
    },

    /// Every horse fell
    RaceAborted { race: usize, tick: usize },

    /// No standing horse can move any more
    RaceStalled { race: usize, tick: usize },
}

impl RaceEvent {
    /// Tick within the race (0 for events outside a race)
    pub fn tick(&self) -> usize {
        match self {
            RaceEvent::HorseMoved { tick, .. }
            | RaceEvent::HorseFell { tick, .. }
            | RaceEvent::RaceWon { tick, .. }
            | RaceEvent::RaceAborted { tick, .. }
            | RaceEvent::RaceStalled { tick, .. } => *tick,
            _ => 0,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            RaceEvent::RaceStarted { .. } => "RaceStarted",
            RaceEvent::HorseMoved { .. } => "HorseMoved",
            RaceEvent::HorseFell { .. } => "HorseFell",
            RaceEvent::WeatherChanged { .. } => "WeatherChanged",
            RaceEvent::BetPlaced { .. } => "BetPlaced",
            RaceEvent::HorseBackedForBet { .. } => "HorseBackedForBet",
            RaceEvent::BetSettled { .. } => "BetSettled",
            RaceEvent::RaceWon { .. } => "RaceWon",
            RaceEvent::RaceAborted { .. } => "RaceAborted",
            RaceEvent::RaceStalled { .. } => "RaceStalled",
        }
    }

    /// Horse name, for events about a specific horse
    pub fn horse_name(&self) -> Option<&str> {
        match self {
            RaceEvent::HorseMoved { name, .. }
            | RaceEvent::HorseFell { name, .. }
            | RaceEvent::HorseBackedForBet { name, .. }
            | RaceEvent::BetSettled { name, .. }
            | RaceEvent::RaceWon { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Append-only log of session events
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<RaceEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: RaceEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[RaceEvent] {
        &self.events
    }

    pub fn events_at_tick(&self, tick: usize) -> Vec<&RaceEvent> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&RaceEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn events_for_horse(&self, name: &str) -> Vec<&RaceEvent> {
        self.events
            .iter()
            .filter(|e| e.horse_name() == Some(name))
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
