//! Race Engine
//!
//! Main race loop integrating all components:
//! - Roster (lane slots and horses)
//! - Weather (pre-race confidence modifier)
//! - Betting ledger (stake before the race, settlement after)
//! - Event logging (complete session history)
//!
//! # Architecture
//!
//! ```text
//! CONFIGURED --start_race--> RUNNING --tick (win / all fallen / stalled)--> FINISHED
//!      ^                        |                                            |
//!      +------abandon_race------+<-------------start_race-------------------+
//!
//! For each tick t (one synchronous pass, lanes in ascending order):
//! 1. Every standing horse: r1 < confidence            -> move forward
//! 2.                       r2 < 0.1 * confidence^2    -> fall
//! 3. First horse (lane order) at track_length         -> won
//!    Every horse fallen                               -> aborted
//!    No standing horse can still move                 -> stalled
//! ```
//!
//! On finish every horse records the outcome and gets its post-race
//! confidence adjustment, then the ledger settles once.
//!
//! # Determinism
//!
//! All randomness comes from the injected [`RandomSource`]. Same draws in,
//! same race out, regardless of how fast the driver calls `tick()`.
//!
//! # Example
//!
//! ```rust
//! use horse_race_core::{Horse, NoopObserver, RaceConfig, RaceEngine};
//!
//! let config = RaceConfig { track_length: 30, rng_seed: 7, ..Default::default() };
//! let mut engine = RaceEngine::new(config).unwrap();
//! engine.roster_mut().unwrap().add_horse(Horse::new("Silver wind", 'S', 0.6), 1).unwrap();
//! engine.roster_mut().unwrap().add_horse(Horse::new("Black star", 'B', 0.4), 2).unwrap();
//!
//! let outcome = engine.run_race(&mut NoopObserver).unwrap();
//! assert_eq!(outcome.race_number, 1);
//! assert!(engine.roster().horses().all(|h| h.total_races() == 1));
//! ```

use thiserror::Error;
use tracing::{debug, info};

use crate::betting::{BetSettlement, BettingLedger, LedgerError, ProjectedPayout};
use crate::core::RaceClock;
use crate::generation::{self, GenerationError};
use crate::models::event::{EventLog, RaceEvent};
use crate::models::horse::Horse;
use crate::models::record::HorseRecord;
use crate::models::roster::{LaneRoster, RosterError};
use crate::orchestrator::checkpoint::{compute_config_hash, SessionSnapshot};
use crate::orchestrator::config::{validate_track_length, ConfigError, RaceConfig};
use crate::orchestrator::observer::{RaceFrame, RaceObserver};
use crate::rng::{RandomSource, RngManager};
use crate::weather::{WeatherChange, WeatherCondition, WeatherModifier};

/// Scale of the per-tick fall probability: `FALL_FACTOR * confidence^2`
pub const FALL_FACTOR: f64 = 0.1;

/// Fewest horses a race can start with
pub const MIN_RACERS: usize = 2;

// ============================================================================
// Result Types
// ============================================================================

/// Engine error types
#[derive(Debug, Error, PartialEq, Clone)]
pub enum EngineError {
    /// Engine used out of order (caller programming error)
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Checkpoint error: {0}")]
    Checkpoint(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Lifecycle of the current race
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RacePhase {
    Configured,
    Running,
    Finished,
}

/// How a race ended
#[derive(Debug, Clone, PartialEq)]
pub enum RaceResult {
    Won { lane: usize, name: String },
    /// Every horse fell
    AllFallen,
    /// Every standing horse has zero confidence and can never move again
    Stalled,
}

impl RaceResult {
    pub fn winner(&self) -> Option<&str> {
        match self {
            RaceResult::Won { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Final placing of one horse
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    /// 1-based placing
    pub position: usize,
    pub lane: usize,
    pub name: String,
    pub distance: u32,
    pub fallen: bool,
}

/// Summary of a finished race
#[derive(Debug, Clone, PartialEq)]
pub struct RaceOutcome {
    pub race_number: usize,
    /// Ticks taken to finish
    pub ticks: usize,
    pub result: RaceResult,
    /// Distance descending, ties by lane ascending
    pub standings: Vec<Standing>,
    /// Present when a bet was open for this race
    pub settlement: Option<BetSettlement>,
}

/// Result of a single tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    pub tick: usize,
    /// Lanes whose horse moved this tick
    pub moved: Vec<usize>,
    /// Lanes whose horse fell this tick
    pub fell: Vec<usize>,
    /// Set on the tick that finished the race
    pub outcome: Option<RaceOutcome>,
}

impl TickResult {
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Owns the roster, weather, ledger and RNG for a session
///
/// Generic over the random source so tests can script exact draws.
pub struct RaceEngine<R: RandomSource = RngManager> {
    config: RaceConfig,
    track_length: u32,
    roster: LaneRoster,
    weather: WeatherModifier,
    ledger: BettingLedger,
    rng: R,
    clock: RaceClock,
    phase: RacePhase,
    event_log: EventLog,
    /// Set when a race ends; the next logged event starts a fresh log
    log_stale: bool,
    last_outcome: Option<RaceOutcome>,
}

impl RaceEngine<RngManager> {
    /// Create an engine seeded from `config.rng_seed`
    pub fn new(config: RaceConfig) -> Result<Self, EngineError> {
        let rng = RngManager::new(config.rng_seed);
        Self::with_rng(config, rng)
    }

    /// Capture the session outside a race
    ///
    /// Rejected while a race is running or a bet is open.
    pub fn snapshot(&self) -> Result<SessionSnapshot, EngineError> {
        self.require_not_running("snapshot")?;
        if let Some(stake) = self.ledger.stake() {
            return Err(EngineError::Precondition(format!(
                "cannot snapshot with an open bet of {}",
                stake
            )));
        }

        Ok(SessionSnapshot {
            race_number: self.clock.race_number(),
            track_length: self.track_length,
            weather: self.weather.current(),
            balance: self.ledger.balance(),
            rng_state: self.rng.get_state(),
            lanes: self
                .roster
                .slots()
                .iter()
                .map(|slot| slot.as_ref().map(Horse::to_record))
                .collect(),
            config_hash: compute_config_hash(&self.config)?,
        })
    }

    /// Rebuild an engine from a snapshot taken under the same `config`
    pub fn restore(config: RaceConfig, snapshot: SessionSnapshot) -> Result<Self, EngineError> {
        config.validate()?;
        let expected = compute_config_hash(&config)?;
        if expected != snapshot.config_hash {
            return Err(EngineError::Checkpoint(format!(
                "config hash mismatch: expected {}, snapshot has {}",
                expected, snapshot.config_hash
            )));
        }
        validate_track_length(snapshot.track_length)?;
        if !snapshot.balance.is_finite() || snapshot.balance < 0.0 {
            return Err(EngineError::Checkpoint(format!(
                "snapshot balance {} must be finite and non-negative",
                snapshot.balance
            )));
        }

        let slots = snapshot
            .lanes
            .iter()
            .map(|slot| slot.as_ref().map(restore_horse).transpose())
            .collect::<Result<Vec<_>, _>>()?;

        let mut ledger = BettingLedger::new(config.starting_balance);
        ledger.restore_balance(snapshot.balance);

        info!(
            race_number = snapshot.race_number,
            balance = snapshot.balance,
            "session restored from snapshot"
        );

        Ok(Self {
            config,
            track_length: snapshot.track_length,
            roster: LaneRoster::from_slots(slots)?,
            weather: WeatherModifier::with_condition(snapshot.weather),
            ledger,
            rng: RngManager::new(snapshot.rng_state),
            clock: RaceClock::resume(snapshot.race_number),
            phase: RacePhase::Configured,
            event_log: EventLog::new(),
            log_stale: false,
            last_outcome: None,
        })
    }
}

fn restore_horse(record: &HorseRecord) -> Result<Horse, EngineError> {
    record
        .validate()
        .map_err(|e| EngineError::Checkpoint(e.to_string()))?;
    Horse::from_record(record).map_err(|e| EngineError::Checkpoint(e.to_string()))
}

impl<R: RandomSource> RaceEngine<R> {
    /// Create an engine drawing from `rng`
    pub fn with_rng(config: RaceConfig, rng: R) -> Result<Self, EngineError> {
        config.validate()?;

        Ok(Self {
            track_length: config.track_length,
            roster: LaneRoster::new(config.lane_count)?,
            weather: WeatherModifier::new(),
            ledger: BettingLedger::new(config.starting_balance),
            rng,
            clock: RaceClock::new(),
            phase: RacePhase::Configured,
            event_log: EventLog::new(),
            log_stale: false,
            last_outcome: None,
            config,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    pub fn track_length(&self) -> u32 {
        self.track_length
    }

    pub fn roster(&self) -> &LaneRoster {
        &self.roster
    }

    /// Mutable roster access, refused while a race is running or a bet is open
    pub fn roster_mut(&mut self) -> Result<&mut LaneRoster, EngineError> {
        self.require_not_running("modify the roster")?;
        self.require_no_open_bet("modify the roster")?;
        Ok(&mut self.roster)
    }

    pub fn weather(&self) -> &WeatherModifier {
        &self.weather
    }

    pub fn ledger(&self) -> &BettingLedger {
        &self.ledger
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn current_tick(&self) -> usize {
        self.clock.current_tick()
    }

    pub fn race_number(&self) -> usize {
        self.clock.race_number()
    }

    /// Events of the current (or most recent) race, including the pre-race
    /// setup logged since the race before it ended
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn last_outcome(&self) -> Option<&RaceOutcome> {
        self.last_outcome.as_ref()
    }

    /// Read-only view of the current race state
    pub fn frame(&self) -> RaceFrame {
        RaceFrame::capture(
            self.clock.race_number(),
            self.clock.current_tick(),
            self.track_length,
            self.weather.current(),
            &self.roster,
        )
    }

    // ========================================================================
    // Pre-race setup
    // ========================================================================

    pub fn set_track_length(&mut self, track_length: u32) -> Result<(), EngineError> {
        self.require_not_running("change the track length")?;
        validate_track_length(track_length)?;
        self.track_length = track_length;
        Ok(())
    }

    /// Add up to `count` random horses to empty lanes, using the engine RNG
    pub fn add_random_horses(&mut self, count: usize) -> Result<usize, EngineError> {
        self.require_not_running("add horses")?;
        self.require_no_open_bet("add horses")?;
        Ok(generation::fill_roster(&mut self.roster, count, &mut self.rng)?)
    }

    /// Draw new weather, scaling confidences if it changed
    pub fn cycle_weather(&mut self) -> Result<WeatherChange, EngineError> {
        self.require_not_running("change the weather")?;
        self.require_no_open_bet("change the weather")?;
        let change = self.weather.cycle(&mut self.roster, &mut self.rng);
        if let WeatherChange::Changed { from, to, factor } = change {
            self.log_event(RaceEvent::WeatherChanged { from, to, factor });
        }
        Ok(change)
    }

    /// Force a weather condition (same no-op rule as a random draw)
    pub fn set_weather(&mut self, condition: WeatherCondition) -> Result<WeatherChange, EngineError> {
        self.require_not_running("change the weather")?;
        self.require_no_open_bet("change the weather")?;
        let change = self.weather.transition_to(condition, &mut self.roster);
        if let WeatherChange::Changed { from, to, factor } = change {
            self.log_event(RaceEvent::WeatherChanged { from, to, factor });
        }
        Ok(change)
    }

    /// Commit a stake for the next race; returns the balance after deduction
    ///
    /// Until the race settles, the roster and weather are frozen so every
    /// quoted payout stays the amount paid.
    pub fn place_bet(&mut self, amount: f64) -> Result<f64, EngineError> {
        self.require_not_running("place a bet")?;
        let balance_after = self.ledger.place_bet(amount, &mut self.roster)?;
        self.log_event(RaceEvent::BetPlaced {
            stake: amount,
            balance_after,
        });
        Ok(balance_after)
    }

    /// Projected payout of every horse for the open stake
    pub fn projected_payouts(&self) -> Result<Vec<ProjectedPayout>, EngineError> {
        Ok(self.ledger.projected_payouts(&self.roster)?)
    }

    /// Back `name` with the open stake; returns its projected payout
    pub fn select_horse(&mut self, name: &str) -> Result<f64, EngineError> {
        self.require_not_running("select a horse")?;
        let projected_payout = self.ledger.select_horse(name, &mut self.roster)?;
        self.log_event(RaceEvent::HorseBackedForBet {
            name: name.to_string(),
            projected_payout,
        });
        Ok(projected_payout)
    }

    // ========================================================================
    // Race loop
    // ========================================================================

    /// CONFIGURED/FINISHED -> RUNNING
    ///
    /// Requires at least two horses. Every horse goes back to the start.
    pub fn start_race(&mut self) -> Result<(), EngineError> {
        self.require_not_running("start a race")?;
        let horses = self.roster.occupied_count();
        if horses < MIN_RACERS {
            return Err(EngineError::Precondition(format!(
                "a race needs at least {} horses, roster has {}",
                MIN_RACERS, horses
            )));
        }

        for horse in self.roster.horses_mut() {
            horse.reset_for_new_race();
        }
        self.clock.start_race();
        self.refresh_log();
        self.phase = RacePhase::Running;

        info!(
            race = self.clock.race_number(),
            track_length = self.track_length,
            horses,
            weather = %self.weather.current(),
            "race started"
        );
        self.log_event(RaceEvent::RaceStarted {
            race: self.clock.race_number(),
            track_length: self.track_length,
            horses,
            weather: self.weather.current(),
        });
        Ok(())
    }

    /// Advance the running race by one tick
    ///
    /// Errors only when no race is running.
    pub fn tick(&mut self) -> Result<TickResult, EngineError> {
        if self.phase != RacePhase::Running {
            return Err(EngineError::Precondition(
                "tick called while no race is running".to_string(),
            ));
        }

        self.clock.advance_tick();
        let race = self.clock.race_number();
        let tick = self.clock.current_tick();
        let mut moved = Vec::new();
        let mut fell = Vec::new();

        for horse in self.roster.horses_mut() {
            if horse.has_fallen() {
                continue;
            }
            let confidence = horse.confidence();

            // Move before the fall check: a horse can do both in one tick
            if self.rng.next_f64() < confidence {
                horse.move_forward();
                moved.push(horse.lane());
                self.event_log.log(RaceEvent::HorseMoved {
                    race,
                    tick,
                    lane: horse.lane(),
                    name: horse.name().to_string(),
                    distance: horse.distance(),
                });
            }

            if self.rng.next_f64() < FALL_FACTOR * confidence * confidence {
                horse.fall();
                fell.push(horse.lane());
                self.event_log.log(RaceEvent::HorseFell {
                    race,
                    tick,
                    lane: horse.lane(),
                    name: horse.name().to_string(),
                    distance: horse.distance(),
                });
            }
        }

        debug!(race, tick, moved = moved.len(), fell = fell.len(), "tick");

        let outcome = self.evaluate_termination().map(|result| self.finish_race(result));

        Ok(TickResult {
            tick,
            moved,
            fell,
            outcome,
        })
    }

    /// Start a race and tick it to completion, reporting every frame
    pub fn run_race<O: RaceObserver + ?Sized>(
        &mut self,
        observer: &mut O,
    ) -> Result<RaceOutcome, EngineError> {
        self.start_race()?;
        loop {
            let result = self.tick()?;
            observer.on_tick(&self.frame());
            if let Some(outcome) = result.outcome {
                return Ok(outcome);
            }
        }
    }

    /// Drop the running race without touching statistics or the ledger
    ///
    /// Horses go back to the start; an open bet stays open for the next race.
    pub fn abandon_race(&mut self) -> Result<(), EngineError> {
        if self.phase != RacePhase::Running {
            return Err(EngineError::Precondition(
                "no race is running".to_string(),
            ));
        }
        for horse in self.roster.horses_mut() {
            horse.reset_for_new_race();
        }
        self.phase = RacePhase::Configured;
        self.log_stale = true;
        info!(race = self.clock.race_number(), "race abandoned");
        Ok(())
    }

    // ========================================================================
    // Internal
    // ========================================================================

    fn evaluate_termination(&self) -> Option<RaceResult> {
        if let Some(winner) = self
            .roster
            .horses()
            .find(|horse| horse.distance() == self.track_length)
        {
            return Some(RaceResult::Won {
                lane: winner.lane(),
                name: winner.name().to_string(),
            });
        }

        if self.roster.horses().all(Horse::has_fallen) {
            return Some(RaceResult::AllFallen);
        }

        let stalled = self
            .roster
            .horses()
            .filter(|horse| !horse.has_fallen())
            .all(|horse| horse.confidence() <= 0.0);
        if stalled {
            return Some(RaceResult::Stalled);
        }

        None
    }

    fn finish_race(&mut self, result: RaceResult) -> RaceOutcome {
        let race_number = self.clock.race_number();
        let ticks = self.clock.current_tick();
        let winner = result.winner().map(str::to_string);

        let mut standings: Vec<Standing> = self
            .roster
            .horses()
            .map(|horse| Standing {
                position: 0,
                lane: horse.lane(),
                name: horse.name().to_string(),
                distance: horse.distance(),
                fallen: horse.has_fallen(),
            })
            .collect();
        standings.sort_by(|a, b| b.distance.cmp(&a.distance).then(a.lane.cmp(&b.lane)));
        for (index, standing) in standings.iter_mut().enumerate() {
            standing.position = index + 1;
        }

        for horse in self.roster.horses_mut() {
            let won = winner.as_deref() == Some(horse.name());
            horse.record_race_outcome(won);
            horse.apply_post_race_confidence_adjustment(won);
        }

        let settlement = self.ledger.settle(winner.as_deref(), &mut self.roster);
        if let Some(settled) = &settlement {
            self.log_event(RaceEvent::BetSettled {
                name: settled.horse.clone().unwrap_or_default(),
                won: settled.won,
                payout: settled.payout,
                balance_after: settled.balance_after,
            });
        }

        match &result {
            RaceResult::Won { lane, name } => {
                info!(race = race_number, ticks, lane, winner = %name, "race won");
                self.log_event(RaceEvent::RaceWon {
                    race: race_number,
                    tick: ticks,
                    lane: *lane,
                    name: name.clone(),
                });
            }
            RaceResult::AllFallen => {
                info!(race = race_number, ticks, "race aborted: every horse fell");
                self.log_event(RaceEvent::RaceAborted {
                    race: race_number,
                    tick: ticks,
                });
            }
            RaceResult::Stalled => {
                info!(race = race_number, ticks, "race stalled: no horse can move");
                self.log_event(RaceEvent::RaceStalled {
                    race: race_number,
                    tick: ticks,
                });
            }
        }

        self.phase = RacePhase::Finished;
        self.log_stale = true;
        let outcome = RaceOutcome {
            race_number,
            ticks,
            result,
            standings,
            settlement,
        };
        self.last_outcome = Some(outcome.clone());
        outcome
    }

    fn require_not_running(&self, action: &str) -> Result<(), EngineError> {
        if self.phase == RacePhase::Running {
            return Err(EngineError::Precondition(format!(
                "cannot {} while a race is running",
                action
            )));
        }
        Ok(())
    }

    fn require_no_open_bet(&self, action: &str) -> Result<(), EngineError> {
        if let Some(stake) = self.ledger.stake() {
            return Err(EngineError::Precondition(format!(
                "cannot {} while a bet of {} is open",
                action, stake
            )));
        }
        Ok(())
    }

    /// Drop the previous race's events before logging anything new
    fn refresh_log(&mut self) {
        if self.log_stale {
            self.event_log.clear();
            self.log_stale = false;
        }
    }

    fn log_event(&mut self, event: RaceEvent) {
        self.refresh_log();
        self.event_log.log(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceRng;

    fn engine_with(values: Vec<f64>, confidences: &[f64]) -> RaceEngine<SequenceRng> {
        let config = RaceConfig {
            track_length: 25,
            lane_count: confidences.len().max(2),
            ..Default::default()
        };
        let mut engine = RaceEngine::with_rng(config, SequenceRng::new(values)).unwrap();
        for (i, confidence) in confidences.iter().enumerate() {
            let horse = Horse::new(format!("H{}", i + 1), 'h', *confidence);
            engine.roster_mut().unwrap().add_horse(horse, i + 1).unwrap();
        }
        engine
    }

    #[test]
    fn test_tick_before_start_is_precondition_error() {
        let mut engine = engine_with(vec![0.5], &[0.5, 0.5]);
        assert!(matches!(engine.tick(), Err(EngineError::Precondition(_))));
    }

    #[test]
    fn test_start_race_needs_two_horses() {
        let mut engine = engine_with(vec![0.5], &[0.5]);
        assert!(matches!(
            engine.start_race(),
            Err(EngineError::Precondition(_))
        ));
        assert_eq!(engine.phase(), RacePhase::Configured);
    }

    #[test]
    fn test_roster_locked_while_running() {
        let mut engine = engine_with(vec![0.99], &[0.5, 0.5]);
        engine.start_race().unwrap();
        assert!(engine.roster_mut().is_err());

        engine.abandon_race().unwrap();
        assert!(engine.roster_mut().is_ok());
    }

    #[test]
    fn test_zero_confidence_field_stalls() {
        // Draws never matter: zero confidence can neither move nor fall
        let mut engine = engine_with(vec![0.0], &[0.0, 0.0]);
        engine.start_race().unwrap();

        let result = engine.tick().unwrap();
        let outcome = result.outcome.expect("race should stall on first tick");
        assert_eq!(outcome.result, RaceResult::Stalled);
        assert_eq!(outcome.ticks, 1);
    }

    #[test]
    fn test_move_and_fall_same_tick_keeps_distance() {
        // H1: move (0.0 < 0.5), fall (0.0 < 0.025); H2: no move, no fall
        let mut engine = engine_with(vec![0.0, 0.0, 0.99, 0.99], &[0.5, 0.5]);
        engine.start_race().unwrap();

        let result = engine.tick().unwrap();
        assert_eq!(result.moved, vec![1]);
        assert_eq!(result.fell, vec![1]);
        let h1 = engine.roster().get(1).unwrap();
        assert_eq!(h1.distance(), 1);
        assert!(h1.has_fallen());
    }
}
