//! Integration tests for RaceEngine
//!
//! Scripted draws pin every move/fall decision so outcomes are exact.
//! Per tick, each standing horse consumes two draws in lane order:
//! the move draw, then the fall draw.

use horse_race_core::rng::SequenceRng;
use horse_race_core::{
    EngineError, Horse, LedgerError, NoopObserver, RaceConfig, RaceEngine, RaceEvent, RaceFrame,
    RacePhase, RaceResult, WeatherCondition,
};

// ============================================================================
// Test Helpers
// ============================================================================

const MOVE: f64 = 0.0;
const STAY: f64 = 0.99;
const FALL: f64 = 0.0;
const STAND: f64 = 0.99;

fn scripted_engine(draws: Vec<f64>) -> RaceEngine<SequenceRng> {
    let config = RaceConfig {
        track_length: 25,
        lane_count: 2,
        ..Default::default()
    };
    let mut engine = RaceEngine::with_rng(config, SequenceRng::new(draws)).unwrap();
    let roster = engine.roster_mut().unwrap();
    roster.add_horse(Horse::new("A", 'A', 0.5), 1).unwrap();
    roster.add_horse(Horse::new("B", 'B', 0.3), 2).unwrap();
    engine
}

/// A moves every tick, B never moves, nobody falls
fn a_runs_alone() -> Vec<f64> {
    vec![MOVE, STAND, STAY, STAND]
}

// ============================================================================
// Race outcomes
// ============================================================================

#[test]
fn test_leader_wins_and_stats_update() {
    let mut engine = scripted_engine(a_runs_alone());

    let outcome = engine.run_race(&mut NoopObserver).unwrap();

    assert_eq!(
        outcome.result,
        RaceResult::Won {
            lane: 1,
            name: "A".to_string()
        }
    );
    assert_eq!(outcome.ticks, 25);
    assert_eq!(outcome.race_number, 1);
    assert!(outcome.settlement.is_none());

    let a = engine.roster().get(1).unwrap();
    assert_eq!(a.distance(), 25);
    assert_eq!(a.total_wins(), 1);
    assert_eq!(a.total_races(), 1);
    assert_eq!(a.win_rate(), 1.0);
    assert_eq!(a.confidence(), 0.55);

    let b = engine.roster().get(2).unwrap();
    assert_eq!(b.distance(), 0);
    assert_eq!(b.total_wins(), 0);
    assert_eq!(b.total_races(), 1);
    assert_eq!(b.win_rate(), 0.0);
    assert_eq!(b.confidence(), 0.27);

    assert_eq!(engine.phase(), RacePhase::Finished);
}

#[test]
fn test_intermittent_mover_wins_on_exact_tick() {
    // A moves on ticks 1, 3, 4 of every five; B never moves
    let mut draws = Vec::new();
    for a_moves in [true, false, true, true, false] {
        draws.extend([if a_moves { MOVE } else { STAY }, STAND, STAY, STAND]);
    }
    let mut engine = scripted_engine(draws);

    let outcome = engine.run_race(&mut NoopObserver).unwrap();

    // 3 moves per 5 ticks: 24 after tick 40, 25 on tick 41
    assert_eq!(outcome.ticks, 41);
    assert_eq!(outcome.result.winner(), Some("A"));
}

#[test]
fn test_simultaneous_finish_goes_to_lower_lane() {
    let mut engine = scripted_engine(vec![MOVE, STAND, MOVE, STAND]);

    let outcome = engine.run_race(&mut NoopObserver).unwrap();

    assert_eq!(outcome.ticks, 25);
    assert_eq!(outcome.result.winner(), Some("A"));
    assert_eq!(engine.roster().get(2).unwrap().distance(), 25);
    assert_eq!(engine.roster().get(2).unwrap().total_wins(), 0);

    let order: Vec<(usize, &str)> = outcome
        .standings
        .iter()
        .map(|s| (s.position, s.name.as_str()))
        .collect();
    assert_eq!(order, vec![(1, "A"), (2, "B")]);
}

#[test]
fn test_all_fallen_aborts_without_winner() {
    let mut engine = scripted_engine(vec![STAY, FALL, STAY, FALL]);

    let outcome = engine.run_race(&mut NoopObserver).unwrap();

    assert_eq!(outcome.result, RaceResult::AllFallen);
    assert_eq!(outcome.ticks, 1);
    for horse in engine.roster().horses() {
        assert!(horse.has_fallen());
        assert_eq!(horse.total_races(), 1);
        assert_eq!(horse.total_wins(), 0);
    }
    assert_eq!(engine.roster().get(1).unwrap().confidence(), 0.45);
    assert_eq!(engine.roster().get(2).unwrap().confidence(), 0.27);
}

#[test]
fn test_fallen_horse_stops_consuming_draws() {
    // Tick 1: A stays and falls, B moves and stands.
    // Tick 2: only B draws, taking the wrapped [STAY, FALL] pair.
    let mut engine = scripted_engine(vec![STAY, FALL, MOVE, STAND]);
    engine.start_race().unwrap();

    let first = engine.tick().unwrap();
    assert_eq!(first.moved, vec![2]);
    assert_eq!(first.fell, vec![1]);
    assert!(!first.is_finished());

    let second = engine.tick().unwrap();
    assert!(second.moved.is_empty());
    assert_eq!(second.fell, vec![2]);

    let outcome = second.outcome.unwrap();
    assert_eq!(outcome.result, RaceResult::AllFallen);
    assert_eq!(outcome.ticks, 2);
    assert_eq!(outcome.standings[0].name, "B");
    assert_eq!(outcome.standings[0].distance, 1);
}

#[test]
fn test_bounded_termination_across_seeds() {
    for seed in 0..50u64 {
        let config = RaceConfig {
            track_length: 100,
            lane_count: 4,
            rng_seed: seed,
            ..Default::default()
        };
        let mut engine = RaceEngine::new(config).unwrap();
        engine.add_random_horses(4).unwrap();
        engine.start_race().unwrap();

        let mut ticks = 0;
        loop {
            let result = engine.tick().unwrap();
            ticks += 1;
            assert!(ticks < 100_000, "seed {} never finished", seed);
            if let Some(outcome) = result.outcome {
                assert_eq!(outcome.ticks, ticks);
                if let Some(name) = outcome.result.winner() {
                    let winner = engine.roster().find_by_name(name).unwrap();
                    assert_eq!(winner.distance(), 100);
                }
                break;
            }
        }
        assert!(engine
            .roster()
            .horses()
            .all(|h| h.distance() <= engine.track_length()));
    }
}

// ============================================================================
// Betting through the engine
// ============================================================================

#[test]
fn test_winning_bet_pays_out() {
    let mut engine = scripted_engine(a_runs_alone());

    assert_eq!(engine.place_bet(10.0).unwrap(), 90.0);
    assert_eq!(engine.select_horse("A").unwrap(), 16.0);

    let outcome = engine.run_race(&mut NoopObserver).unwrap();

    let settlement = outcome.settlement.unwrap();
    assert!(settlement.won);
    assert_eq!(settlement.payout, 16.0);
    assert_eq!(engine.ledger().balance(), 106.0);
    assert!(engine.roster().horses().all(|h| !h.is_bet_placed()));
}

#[test]
fn test_losing_bet_forfeits_stake() {
    let mut engine = scripted_engine(a_runs_alone());
    engine.place_bet(10.0).unwrap();
    engine.select_horse("B").unwrap();

    let outcome = engine.run_race(&mut NoopObserver).unwrap();

    assert!(!outcome.settlement.unwrap().won);
    assert_eq!(engine.ledger().balance(), 90.0);
}

#[test]
fn test_overdrawn_bet_leaves_balance() {
    let mut engine = scripted_engine(a_runs_alone());
    let err = engine.place_bet(150.0).unwrap_err();

    assert!(matches!(
        err,
        EngineError::Ledger(LedgerError::InsufficientFunds { .. })
    ));
    assert_eq!(engine.ledger().balance(), 100.0);
}

#[test]
fn test_projected_payouts_follow_weather() {
    let mut engine = scripted_engine(a_runs_alone());
    engine.set_weather(WeatherCondition::Snow).unwrap();
    engine.place_bet(10.0).unwrap();

    let payouts: Vec<f64> = engine
        .projected_payouts()
        .unwrap()
        .into_iter()
        .map(|p| p.payout)
        .collect();
    // A: (0.25 + 1.1) * 10, B: (0.15 + 1.1) * 10
    assert_eq!(payouts, vec![13.5, 12.5]);
}

#[test]
fn test_roster_and_weather_frozen_while_bet_open() {
    let config = RaceConfig {
        track_length: 25,
        lane_count: 3,
        ..Default::default()
    };
    let mut engine = RaceEngine::with_rng(config, SequenceRng::new(a_runs_alone())).unwrap();
    let roster = engine.roster_mut().unwrap();
    roster.add_horse(Horse::new("A", 'A', 0.5), 1).unwrap();
    roster.add_horse(Horse::new("B", 'B', 0.3), 2).unwrap();

    engine.place_bet(10.0).unwrap();

    assert!(matches!(engine.roster_mut(), Err(EngineError::Precondition(_))));
    assert!(matches!(engine.add_random_horses(1), Err(EngineError::Precondition(_))));
    assert!(matches!(
        engine.set_weather(WeatherCondition::Snow),
        Err(EngineError::Precondition(_))
    ));
    assert!(matches!(engine.cycle_weather(), Err(EngineError::Precondition(_))));
    assert_eq!(engine.weather().current(), WeatherCondition::Sunny);
    assert_eq!(engine.roster().occupied_count(), 2);

    // Settlement lifts the freeze
    engine.select_horse("A").unwrap();
    engine.run_race(&mut NoopObserver).unwrap();
    assert!(engine.roster_mut().is_ok());
    assert!(engine.set_weather(WeatherCondition::Snow).is_ok());
}

#[test]
fn test_quoted_payout_is_paid() {
    let mut engine = scripted_engine(a_runs_alone());
    engine.set_weather(WeatherCondition::Snow).unwrap();
    engine.place_bet(10.0).unwrap();

    let quoted = engine
        .projected_payouts()
        .unwrap()
        .into_iter()
        .find(|p| p.name == "A")
        .map(|p| p.payout)
        .unwrap();
    let selected = engine.select_horse("A").unwrap();
    let outcome = engine.run_race(&mut NoopObserver).unwrap();

    // (0.25 + 1.1) * 10
    assert_eq!(quoted, 13.5);
    assert_eq!(selected, quoted);
    assert_eq!(outcome.settlement.unwrap().payout, quoted);
    assert_eq!(engine.ledger().balance(), 90.0 + quoted);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_observer_sees_every_tick() {
    let mut engine = scripted_engine(a_runs_alone());
    let mut frames: Vec<(usize, u32)> = Vec::new();
    let mut observer = |frame: &RaceFrame| {
        let leader = frame.horses().map(|h| h.distance).max().unwrap_or(0);
        frames.push((frame.tick, leader));
    };

    let outcome = engine.run_race(&mut observer).unwrap();

    assert_eq!(frames.len(), outcome.ticks);
    assert_eq!(frames.first(), Some(&(1, 1)));
    assert_eq!(frames.last(), Some(&(25, 25)));
}

#[test]
fn test_operations_refused_while_running() {
    let mut engine = scripted_engine(a_runs_alone());
    engine.start_race().unwrap();

    assert!(matches!(engine.start_race(), Err(EngineError::Precondition(_))));
    assert!(matches!(engine.place_bet(5.0), Err(EngineError::Precondition(_))));
    assert!(matches!(engine.cycle_weather(), Err(EngineError::Precondition(_))));
    assert!(matches!(engine.set_track_length(30), Err(EngineError::Precondition(_))));
    assert!(matches!(engine.add_random_horses(1), Err(EngineError::Precondition(_))));
}

#[test]
fn test_tick_after_finish_is_precondition_error() {
    let mut engine = scripted_engine(a_runs_alone());
    engine.run_race(&mut NoopObserver).unwrap();
    assert!(matches!(engine.tick(), Err(EngineError::Precondition(_))));
}

#[test]
fn test_next_race_resets_positions_and_counts() {
    let mut engine = scripted_engine(a_runs_alone());
    engine.run_race(&mut NoopObserver).unwrap();

    engine.start_race().unwrap();
    assert_eq!(engine.race_number(), 2);
    assert_eq!(engine.current_tick(), 0);
    assert!(engine
        .roster()
        .horses()
        .all(|h| h.distance() == 0 && !h.has_fallen()));
}

#[test]
fn test_abandon_keeps_statistics() {
    let mut engine = scripted_engine(a_runs_alone());
    engine.start_race().unwrap();
    engine.tick().unwrap();

    engine.abandon_race().unwrap();

    assert_eq!(engine.phase(), RacePhase::Configured);
    for horse in engine.roster().horses() {
        assert_eq!(horse.distance(), 0);
        assert_eq!(horse.total_races(), 0);
    }
    assert!(engine.last_outcome().is_none());
}

#[test]
fn test_track_length_bounds() {
    let mut engine = scripted_engine(a_runs_alone());
    assert!(matches!(engine.set_track_length(24), Err(EngineError::Config(_))));
    assert!(matches!(engine.set_track_length(101), Err(EngineError::Config(_))));
    engine.set_track_length(100).unwrap();
    assert_eq!(engine.track_length(), 100);
}

#[test]
fn test_event_log_records_race() {
    let mut engine = scripted_engine(a_runs_alone());
    engine.place_bet(10.0).unwrap();
    engine.select_horse("A").unwrap();
    engine.run_race(&mut NoopObserver).unwrap();

    let log = engine.event_log();
    assert_eq!(log.events_of_type("RaceStarted").len(), 1);
    assert_eq!(log.events_of_type("HorseMoved").len(), 25);
    assert_eq!(log.events_of_type("HorseFell").len(), 0);
    assert_eq!(log.events_of_type("BetPlaced").len(), 1);
    assert_eq!(log.events_of_type("BetSettled").len(), 1);
    assert_eq!(log.events_of_type("RaceWon").len(), 1);
    assert!(log.events_for_horse("B").iter().all(|e| e.event_type() != "HorseMoved"));
    assert_eq!(log.events_at_tick(25).len(), 2);
}

#[test]
fn test_event_log_keeps_latest_race_only() {
    let mut engine = scripted_engine(a_runs_alone());
    engine.run_race(&mut NoopObserver).unwrap();

    engine.place_bet(10.0).unwrap();
    engine.select_horse("A").unwrap();
    engine.run_race(&mut NoopObserver).unwrap();

    let log = engine.event_log();
    let started = log.events_of_type("RaceStarted");
    assert_eq!(started.len(), 1);
    assert!(matches!(started[0], RaceEvent::RaceStarted { race: 2, .. }));
    // Pre-race betting for race 2 survives; race 1 is gone
    assert_eq!(log.events_of_type("BetPlaced").len(), 1);
    assert_eq!(log.events_of_type("RaceWon").len(), 1);
    assert_eq!(log.events_of_type("HorseMoved").len(), 25);
}
