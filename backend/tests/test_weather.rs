//! Tests for WeatherModifier
//!
//! A repeated draw of the current condition must never touch confidences.

use horse_race_core::rng::SequenceRng;
use horse_race_core::{Horse, LaneRoster, WeatherChange, WeatherCondition, WeatherModifier};

/// Draw values selecting each condition via `range(0, 4)`
const RAINING: f64 = 0.1;
const WET: f64 = 0.3;
const SUNNY: f64 = 0.6;
const SNOW: f64 = 0.9;

fn roster() -> LaneRoster {
    let mut roster = LaneRoster::new(3).unwrap();
    roster.add_horse(Horse::new("Alpha", 'A', 0.8), 1).unwrap();
    roster.add_horse(Horse::new("Bravo", 'B', 0.4), 3).unwrap();
    roster
}

fn confidence_bits(roster: &LaneRoster) -> Vec<u64> {
    roster.horses().map(|h| h.confidence().to_bits()).collect()
}

#[test]
fn test_starts_sunny() {
    assert_eq!(WeatherModifier::new().current(), WeatherCondition::Sunny);
    assert_eq!(WeatherModifier::default().factor(), 1.0);
}

#[test]
fn test_same_condition_drawn_is_noop() {
    let mut roster = roster();
    let before = confidence_bits(&roster);
    let mut weather = WeatherModifier::new();
    let mut rng = SequenceRng::new(vec![SUNNY]);

    let change = weather.cycle(&mut roster, &mut rng);

    assert_eq!(change, WeatherChange::Unchanged(WeatherCondition::Sunny));
    assert_eq!(confidence_bits(&roster), before);
}

#[test]
fn test_same_condition_twice_in_a_row_applies_once() {
    let mut roster = roster();
    let mut weather = WeatherModifier::new();
    let mut rng = SequenceRng::new(vec![RAINING, RAINING]);

    let first = weather.cycle(&mut roster, &mut rng);
    assert_eq!(
        first,
        WeatherChange::Changed {
            from: WeatherCondition::Sunny,
            to: WeatherCondition::Raining,
            factor: 0.75
        }
    );
    let after_first = confidence_bits(&roster);
    assert_eq!(roster.get(1).unwrap().confidence(), 0.6);
    assert_eq!(roster.get(3).unwrap().confidence(), 0.3);

    let second = weather.cycle(&mut roster, &mut rng);
    assert_eq!(second, WeatherChange::Unchanged(WeatherCondition::Raining));
    assert_eq!(confidence_bits(&roster), after_first);
}

#[test]
fn test_change_applies_new_factor_not_ratio() {
    let mut roster = roster();
    let mut weather = WeatherModifier::new();
    let mut rng = SequenceRng::new(vec![SNOW, WET]);

    weather.cycle(&mut roster, &mut rng);
    assert_eq!(roster.get(1).unwrap().confidence(), 0.4);

    // Snow -> Wet multiplies by 0.85 again; it does not undo the snow
    weather.cycle(&mut roster, &mut rng);
    assert_eq!(weather.current(), WeatherCondition::Wet);
    assert_eq!(roster.get(1).unwrap().confidence(), 0.34);
}

#[test]
fn test_empty_lanes_are_skipped() {
    let mut roster = LaneRoster::new(4).unwrap();
    roster.add_horse(Horse::new("Alpha", 'A', 0.5), 4).unwrap();
    let mut weather = WeatherModifier::new();

    weather.transition_to(WeatherCondition::Snow, &mut roster);

    assert_eq!(roster.get(4).unwrap().confidence(), 0.25);
    assert_eq!(roster.occupied_count(), 1);
}
