//! Display collaborator interface
//!
//! After every tick the engine hands a read-only [`RaceFrame`] to a
//! [`RaceObserver`]. Rendering (text, GUI canvas, nothing) is entirely the
//! observer's business; the engine only waits for the callback to return.

use crate::models::roster::LaneRoster;
use crate::weather::WeatherCondition;

/// One occupied lane as seen by a display
#[derive(Debug, Clone, PartialEq)]
pub struct LaneSnapshot {
    pub lane: usize,
    pub name: String,
    pub symbol: char,
    pub distance: u32,
    pub fallen: bool,
    pub confidence: f64,
}

/// Read-only view of the race after a tick
#[derive(Debug, Clone, PartialEq)]
pub struct RaceFrame {
    pub race: usize,
    pub tick: usize,
    pub track_length: u32,
    pub weather: WeatherCondition,
    /// One entry per lane, `None` for empty lanes
    pub lanes: Vec<Option<LaneSnapshot>>,
}

impl RaceFrame {
    pub(crate) fn capture(
        race: usize,
        tick: usize,
        track_length: u32,
        weather: WeatherCondition,
        roster: &LaneRoster,
    ) -> Self {
        let lanes = roster
            .slots()
            .iter()
            .map(|slot| {
                slot.as_ref().map(|horse| LaneSnapshot {
                    lane: horse.lane(),
                    name: horse.name().to_string(),
                    symbol: horse.symbol(),
                    distance: horse.distance(),
                    fallen: horse.has_fallen(),
                    confidence: horse.confidence(),
                })
            })
            .collect();

        Self {
            race,
            tick,
            track_length,
            weather,
            lanes,
        }
    }

    /// Occupied lanes only
    pub fn horses(&self) -> impl Iterator<Item = &LaneSnapshot> {
        self.lanes.iter().flatten()
    }
}

/// Receives a frame after every tick
pub trait RaceObserver {
    fn on_tick(&mut self, frame: &RaceFrame);
}

impl<F: FnMut(&RaceFrame)> RaceObserver for F {
    fn on_tick(&mut self, frame: &RaceFrame) {
        self(frame)
    }
}

/// Observer that ignores every frame
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RaceObserver for NoopObserver {
    fn on_tick(&mut self, _frame: &RaceFrame) {}
}
